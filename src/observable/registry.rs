use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An ordered list of callbacks, deduplicated by identity.
///
/// Delivery walks a snapshot of the list, so a callback may add or remove
/// callbacks (itself included) while a notification is in flight. A callback
/// removed mid-delivery is not called for the rest of that delivery.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use bindery::observable::{
///     CallbackRegistry, OnPropertyChangedCallback, PropertyObservable, ALL_FIELDS,
/// };
///
/// struct Person {
///     callbacks: CallbackRegistry<dyn OnPropertyChangedCallback>,
/// }
///
/// impl PropertyObservable for Person {
///     fn add_on_property_changed_callback(&self, callback: Rc<dyn OnPropertyChangedCallback>) {
///         self.callbacks.add(callback);
///     }
///
///     fn remove_on_property_changed_callback(&self, callback: &Rc<dyn OnPropertyChangedCallback>) {
///         self.callbacks.remove(callback);
///     }
/// }
///
/// impl Person {
///     fn rename(&self) {
///         self.callbacks.notify(|cb| cb.on_property_changed(self, ALL_FIELDS));
///     }
/// }
///
/// let person = Person { callbacks: CallbackRegistry::new() };
/// person.rename(); // nobody listening, nothing happens
/// assert!(person.callbacks.is_empty());
/// ```
pub struct CallbackRegistry<C: ?Sized> {
    callbacks: RefCell<Vec<Rc<C>>>,
}

impl<C: ?Sized> CallbackRegistry<C> {
    pub fn new() -> Self {
        Self {
            callbacks: RefCell::new(Vec::new()),
        }
    }

    /// Register a callback. Returns false if it was already registered.
    pub fn add(&self, callback: Rc<C>) -> bool {
        if self.contains(&callback) {
            return false;
        }
        self.callbacks.borrow_mut().push(callback);
        true
    }

    /// Unregister a callback. Returns false if it was not registered.
    pub fn remove(&self, callback: &Rc<C>) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|existing| !same_callback(existing, callback));
        callbacks.len() != before
    }

    pub fn contains(&self, callback: &Rc<C>) -> bool {
        self.callbacks
            .borrow()
            .iter()
            .any(|existing| same_callback(existing, callback))
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.callbacks.borrow_mut().clear();
    }

    /// Deliver a notification to every registered callback, in registration order.
    pub fn notify(&self, mut deliver: impl FnMut(&C)) {
        let snapshot = self.callbacks.borrow().clone();
        for callback in &snapshot {
            // Skip callbacks removed by an earlier callback in this delivery.
            if self.contains(callback) {
                deliver(&**callback);
            }
        }
    }
}

impl<C: ?Sized> Default for CallbackRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for CallbackRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("len", &self.len())
            .finish()
    }
}

fn same_callback<C: ?Sized>(a: &Rc<C>, b: &Rc<C>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    trait Ping {
        fn ping(&self);
    }

    struct Counter(Cell<usize>);

    impl Ping for Counter {
        fn ping(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn add_is_deduplicated() {
        let registry: CallbackRegistry<dyn Ping> = CallbackRegistry::new();
        let counter = Rc::new(Counter(Cell::new(0)));
        let callback: Rc<dyn Ping> = counter.clone();

        assert!(registry.add(Rc::clone(&callback)));
        assert!(!registry.add(Rc::clone(&callback)));
        assert_eq!(registry.len(), 1);

        registry.notify(|cb| cb.ping());
        assert_eq!(counter.0.get(), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let registry: CallbackRegistry<dyn Ping> = CallbackRegistry::new();
        let callback: Rc<dyn Ping> = Rc::new(Counter(Cell::new(0)));

        assert!(!registry.remove(&callback));
        registry.add(Rc::clone(&callback));
        assert!(registry.remove(&callback));
        assert!(registry.is_empty());
    }

    #[test]
    fn removal_during_delivery_skips_removed() {
        struct Remover {
            registry: Rc<CallbackRegistry<dyn Ping>>,
            victim: Rc<dyn Ping>,
        }

        impl Ping for Remover {
            fn ping(&self) {
                self.registry.remove(&self.victim);
            }
        }

        let registry: Rc<CallbackRegistry<dyn Ping>> = Rc::new(CallbackRegistry::new());
        let victim_counter = Rc::new(Counter(Cell::new(0)));
        let victim: Rc<dyn Ping> = victim_counter.clone();

        registry.add(Rc::new(Remover {
            registry: Rc::clone(&registry),
            victim: Rc::clone(&victim),
        }));
        registry.add(victim);

        registry.notify(|cb| cb.ping());
        assert_eq!(victim_counter.0.get(), 0);
        assert_eq!(registry.len(), 1);
    }
}
