//! Observable capability contracts.
//!
//! A value can take part in binding by implementing one of three protocols:
//! - [`PropertyObservable`]: single-property change notification
//! - [`ListObservable`]: list mutation notification with range semantics
//! - [`MapObservable`]: keyed-map mutation notification
//!
//! Every callback receives the sender, so a listener can tell a notification
//! from its current target apart from a late one delivered by a target it
//! has already let go of.
//!
//! The module also provides a [`CallbackRegistry`] for implementing the
//! protocols and three ready-made observables built on it.

mod field;
mod list;
mod map;
mod registry;

use std::any::Any;
use std::fmt;
use std::rc::Rc;

pub use field::ObservableField;
pub use list::ObservableVec;
pub use map::ObservableMap;
pub use registry::CallbackRegistry;

/// Identifier of a property within a [`PropertyObservable`].
pub type FieldId = u32;

/// Field id meaning "every property of the sender changed".
pub const ALL_FIELDS: FieldId = 0;

/// Conversion of an `Rc` handle into an `Rc<dyn Any>`.
///
/// Implemented for every `'static` type, so observable implementors never
/// write it by hand. It lets a binder hand a target back to domain code as
/// its concrete type.
pub trait AsAnyRc {
    /// Erase the handle's type.
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAnyRc for T {
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Receives property change notifications.
pub trait OnPropertyChangedCallback {
    /// `field_id` is [`ALL_FIELDS`] when every property of `sender` changed.
    fn on_property_changed(&self, sender: &dyn PropertyObservable, field_id: FieldId);
}

/// An object whose properties announce their changes.
pub trait PropertyObservable: AsAnyRc {
    fn add_on_property_changed_callback(&self, callback: Rc<dyn OnPropertyChangedCallback>);
    fn remove_on_property_changed_callback(&self, callback: &Rc<dyn OnPropertyChangedCallback>);
}

/// Receives list mutation notifications.
pub trait OnListChangedCallback {
    /// The list changed in a way not described by a range.
    fn on_changed(&self, sender: &dyn ListObservable);

    fn on_item_range_changed(
        &self,
        sender: &dyn ListObservable,
        position_start: usize,
        item_count: usize,
    );

    fn on_item_range_inserted(
        &self,
        sender: &dyn ListObservable,
        position_start: usize,
        item_count: usize,
    );

    fn on_item_range_moved(
        &self,
        sender: &dyn ListObservable,
        from_position: usize,
        to_position: usize,
        item_count: usize,
    );

    fn on_item_range_removed(
        &self,
        sender: &dyn ListObservable,
        position_start: usize,
        item_count: usize,
    );
}

/// A list that announces its mutations.
pub trait ListObservable: AsAnyRc {
    fn add_on_list_changed_callback(&self, callback: Rc<dyn OnListChangedCallback>);
    fn remove_on_list_changed_callback(&self, callback: &Rc<dyn OnListChangedCallback>);
}

/// Receives map mutation notifications.
pub trait OnMapChangedCallback {
    /// `key` is the key that was inserted, replaced or removed.
    fn on_map_changed(&self, sender: &dyn MapObservable, key: &dyn Any);
}

/// A keyed map that announces its mutations.
pub trait MapObservable: AsAnyRc {
    fn add_on_map_changed_callback(&self, callback: Rc<dyn OnMapChangedCallback>);
    fn remove_on_map_changed_callback(&self, callback: &Rc<dyn OnMapChangedCallback>);
}

/// Which of the three protocols a bound value speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservableKind {
    Property,
    List,
    Map,
}

impl fmt::Display for ObservableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObservableKind::Property => "property",
            ObservableKind::List => "list",
            ObservableKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A shared handle to a value bound into a binder slot.
///
/// Equality between handles is reference identity, never value equality:
/// two distinct lists with the same contents are different targets.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use bindery::observable::{ObservableField, ObservableKind, Observed};
///
/// let name = Rc::new(ObservableField::new("Ada".to_string()));
/// let observed = Observed::property(Rc::clone(&name));
///
/// assert_eq!(observed.kind(), ObservableKind::Property);
/// assert!(observed.ptr_eq(&Observed::property(Rc::clone(&name))));
///
/// let back = observed.downcast::<ObservableField<String>>().unwrap();
/// assert_eq!(back.get(), "Ada");
/// ```
#[derive(Clone)]
pub enum Observed {
    Property(Rc<dyn PropertyObservable>),
    List(Rc<dyn ListObservable>),
    Map(Rc<dyn MapObservable>),
}

impl Observed {
    pub fn property<T: PropertyObservable + 'static>(target: Rc<T>) -> Self {
        Observed::Property(target)
    }

    pub fn list<T: ListObservable + 'static>(target: Rc<T>) -> Self {
        Observed::List(target)
    }

    pub fn map<T: MapObservable + 'static>(target: Rc<T>) -> Self {
        Observed::Map(target)
    }

    /// The protocol this handle speaks.
    pub fn kind(&self) -> ObservableKind {
        match self {
            Observed::Property(_) => ObservableKind::Property,
            Observed::List(_) => ObservableKind::List,
            Observed::Map(_) => ObservableKind::Map,
        }
    }

    /// Whether both handles point at the same object through the same protocol.
    pub fn ptr_eq(&self, other: &Observed) -> bool {
        self.kind() == other.kind() && self.addr() == other.addr()
    }

    /// Whether the target is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.clone().into_any().is::<T>()
    }

    /// Recover the concrete type of the target.
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        self.clone().into_any().downcast::<T>().ok()
    }

    pub fn into_any(self) -> Rc<dyn Any> {
        match self {
            Observed::Property(target) => AsAnyRc::into_any_rc(target),
            Observed::List(target) => AsAnyRc::into_any_rc(target),
            Observed::Map(target) => AsAnyRc::into_any_rc(target),
        }
    }

    fn addr(&self) -> *const () {
        match self {
            Observed::Property(target) => Rc::as_ptr(target) as *const (),
            Observed::List(target) => Rc::as_ptr(target) as *const (),
            Observed::Map(target) => Rc::as_ptr(target) as *const (),
        }
    }
}

impl fmt::Debug for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observed")
            .field("kind", &self.kind())
            .field("addr", &self.addr())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_not_equality() {
        let a = Rc::new(ObservableVec::from_vec(vec![1, 2, 3]));
        let b = Rc::new(ObservableVec::from_vec(vec![1, 2, 3]));

        let oa = Observed::list(Rc::clone(&a));
        assert!(oa.ptr_eq(&Observed::list(Rc::clone(&a))));
        assert!(!oa.ptr_eq(&Observed::list(b)));
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        let field = Rc::new(ObservableField::new(5_i32));
        let observed = Observed::property(field);

        assert!(observed.is::<ObservableField<i32>>());
        assert!(observed.downcast::<ObservableField<String>>().is_none());
        assert_eq!(observed.downcast::<ObservableField<i32>>().unwrap().get(), 5);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ObservableKind::Property.to_string(), "property");
        assert_eq!(ObservableKind::List.to_string(), "list");
        assert_eq!(ObservableKind::Map.to_string(), "map");
    }
}
