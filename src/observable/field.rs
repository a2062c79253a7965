use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{CallbackRegistry, FieldId, OnPropertyChangedCallback, PropertyObservable, ALL_FIELDS};

/// A single observable value.
///
/// Setting an equal value is a no-op; any other write notifies every
/// callback with [`ALL_FIELDS`].
///
/// # Examples
///
/// ```
/// use bindery::observable::ObservableField;
///
/// let title = ObservableField::new("draft".to_string());
/// title.set("final".to_string());
/// assert_eq!(title.get(), "final");
/// ```
pub struct ObservableField<T> {
    value: RefCell<T>,
    callbacks: CallbackRegistry<dyn OnPropertyChangedCallback>,
}

impl<T: 'static> ObservableField<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Store a new value, notifying only if it differs from the current one.
    pub fn set(&self, value: T)
    where
        T: PartialEq,
    {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.notify_change();
    }

    /// Mutate the value in place. Always notifies.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.value.borrow_mut());
        self.notify_change();
    }

    /// Notify that every property changed.
    pub fn notify_change(&self) {
        self.notify_property_changed(ALL_FIELDS);
    }

    pub fn notify_property_changed(&self, field_id: FieldId) {
        self.callbacks
            .notify(|callback| callback.on_property_changed(self, field_id));
    }

    /// Number of callbacks currently registered.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl<T: Default + 'static> Default for ObservableField<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> PropertyObservable for ObservableField<T> {
    fn add_on_property_changed_callback(&self, callback: Rc<dyn OnPropertyChangedCallback>) {
        self.callbacks.add(callback);
    }

    fn remove_on_property_changed_callback(&self, callback: &Rc<dyn OnPropertyChangedCallback>) {
        self.callbacks.remove(callback);
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableField")
            .field("value", &self.value.borrow())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
