use std::rc::{Rc, Weak};

use tracing::trace;

use super::{kind_mismatch, ChangeSink, FieldListener, WeakListener};
use crate::binder::BindingError;
use crate::observable::{
    ListObservable, ObservableKind, Observed, OnListChangedCallback, ALL_FIELDS,
};

/// Listens to a [`ListObservable`].
///
/// Range details are discarded: any mutation of a bound list invalidates
/// the whole field.
pub(crate) struct ListListener {
    listener: WeakListener<dyn ListObservable>,
}

impl ListListener {
    pub(crate) fn new(binder: Weak<dyn ChangeSink>, local_field_id: usize) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let callback: Weak<dyn OnListChangedCallback> = this.clone();
            Self {
                listener: WeakListener::new(binder, callback, local_field_id),
            }
        })
    }

    fn list_changed(&self, sender: &dyn ListObservable) {
        let Some(binder) = self.listener.binder() else {
            return;
        };
        let Some(target) = self.listener.target_if_sender(sender) else {
            trace!(
                local_field_id = self.listener.local_field_id(),
                "dropping list notification from a stale sender"
            );
            return;
        };
        binder.handle_field_change(
            self.listener.local_field_id(),
            &Observed::List(target),
            ALL_FIELDS,
        );
    }
}

impl OnListChangedCallback for ListListener {
    fn on_changed(&self, sender: &dyn ListObservable) {
        self.list_changed(sender);
    }

    fn on_item_range_changed(&self, sender: &dyn ListObservable, _start: usize, _count: usize) {
        self.list_changed(sender);
    }

    fn on_item_range_inserted(&self, sender: &dyn ListObservable, _start: usize, _count: usize) {
        self.list_changed(sender);
    }

    fn on_item_range_moved(
        &self,
        sender: &dyn ListObservable,
        _from: usize,
        _to: usize,
        _count: usize,
    ) {
        self.list_changed(sender);
    }

    fn on_item_range_removed(&self, sender: &dyn ListObservable, _start: usize, _count: usize) {
        self.list_changed(sender);
    }
}

impl FieldListener for ListListener {
    fn kind(&self) -> ObservableKind {
        ObservableKind::List
    }

    fn target(&self) -> Option<Observed> {
        self.listener.target().map(Observed::List)
    }

    fn set_target(&self, target: Observed) -> Result<(), BindingError> {
        match target {
            Observed::List(target) => {
                self.listener.set_target(Some(target));
                Ok(())
            }
            other => Err(kind_mismatch(
                self.listener.local_field_id(),
                ObservableKind::List,
                &other,
            )),
        }
    }

    fn unregister(&self) -> bool {
        self.listener.unregister()
    }
}
