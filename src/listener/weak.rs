use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::ChangeSink;
use crate::observable::{
    ListObservable, MapObservable, OnListChangedCallback, OnMapChangedCallback,
    OnPropertyChangedCallback, PropertyObservable,
};

/// How a listener attaches to one observable capability.
pub(crate) trait Subscribe {
    type Callback: ?Sized;

    fn subscribe(&self, callback: Rc<Self::Callback>);
    fn unsubscribe(&self, callback: &Rc<Self::Callback>);
}

impl Subscribe for dyn PropertyObservable {
    type Callback = dyn OnPropertyChangedCallback;

    fn subscribe(&self, callback: Rc<Self::Callback>) {
        self.add_on_property_changed_callback(callback);
    }

    fn unsubscribe(&self, callback: &Rc<Self::Callback>) {
        self.remove_on_property_changed_callback(callback);
    }
}

impl Subscribe for dyn ListObservable {
    type Callback = dyn OnListChangedCallback;

    fn subscribe(&self, callback: Rc<Self::Callback>) {
        self.add_on_list_changed_callback(callback);
    }

    fn unsubscribe(&self, callback: &Rc<Self::Callback>) {
        self.remove_on_list_changed_callback(callback);
    }
}

impl Subscribe for dyn MapObservable {
    type Callback = dyn OnMapChangedCallback;

    fn subscribe(&self, callback: Rc<Self::Callback>) {
        self.add_on_map_changed_callback(callback);
    }

    fn unsubscribe(&self, callback: &Rc<Self::Callback>) {
        self.remove_on_map_changed_callback(callback);
    }
}

/// Subscription state shared by every listener variant.
///
/// Holds the binder weakly and the target strongly. `callback` is the
/// variant itself, as registered with the target; it only fails to upgrade
/// while the variant is being dropped, and by then no target holds it.
///
/// Invariant: subscribed to `target` iff `target` is `Some`.
pub(crate) struct WeakListener<T: ?Sized + Subscribe> {
    binder: Weak<dyn ChangeSink>,
    callback: Weak<T::Callback>,
    local_field_id: usize,
    target: RefCell<Option<Rc<T>>>,
}

impl<T: ?Sized + Subscribe> WeakListener<T> {
    pub(crate) fn new(
        binder: Weak<dyn ChangeSink>,
        callback: Weak<T::Callback>,
        local_field_id: usize,
    ) -> Self {
        Self {
            binder,
            callback,
            local_field_id,
            target: RefCell::new(None),
        }
    }

    pub(crate) fn local_field_id(&self) -> usize {
        self.local_field_id
    }

    pub(crate) fn target(&self) -> Option<Rc<T>> {
        self.target.borrow().clone()
    }

    /// Replace the target, moving the subscription along with it.
    pub(crate) fn set_target(&self, target: Option<Rc<T>>) {
        self.unregister();
        *self.target.borrow_mut() = target.clone();
        if let (Some(target), Some(callback)) = (target, self.callback.upgrade()) {
            target.subscribe(callback);
        }
    }

    /// Drop the target. Returns whether there was one to drop.
    pub(crate) fn unregister(&self) -> bool {
        let Some(target) = self.target.borrow_mut().take() else {
            return false;
        };
        if let Some(callback) = self.callback.upgrade() {
            target.unsubscribe(&callback);
        }
        true
    }

    /// The current target, if `sender` is it.
    pub(crate) fn target_if_sender<S: ?Sized>(&self, sender: &S) -> Option<Rc<T>> {
        self.target
            .borrow()
            .as_ref()
            .filter(|target| std::ptr::addr_eq(Rc::as_ptr(target), sender as *const S))
            .cloned()
    }

    /// Resolve the binder, unsubscribing if it is gone.
    pub(crate) fn binder(&self) -> Option<Rc<dyn ChangeSink>> {
        let binder = self.binder.upgrade();
        if binder.is_none() && self.unregister() {
            trace!(
                local_field_id = self.local_field_id,
                "binder dropped, listener unsubscribed itself"
            );
        }
        binder
    }
}
