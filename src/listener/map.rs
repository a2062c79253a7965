use std::any::Any;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::{kind_mismatch, ChangeSink, FieldListener, WeakListener};
use crate::binder::BindingError;
use crate::observable::{MapObservable, ObservableKind, Observed, OnMapChangedCallback, ALL_FIELDS};

/// Listens to a [`MapObservable`]. The changed key is not forwarded.
pub(crate) struct MapListener {
    listener: WeakListener<dyn MapObservable>,
}

impl MapListener {
    pub(crate) fn new(binder: Weak<dyn ChangeSink>, local_field_id: usize) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let callback: Weak<dyn OnMapChangedCallback> = this.clone();
            Self {
                listener: WeakListener::new(binder, callback, local_field_id),
            }
        })
    }
}

impl OnMapChangedCallback for MapListener {
    fn on_map_changed(&self, sender: &dyn MapObservable, _key: &dyn Any) {
        let Some(binder) = self.listener.binder() else {
            return;
        };
        let Some(target) = self.listener.target_if_sender(sender) else {
            trace!(
                local_field_id = self.listener.local_field_id(),
                "dropping map notification from a stale sender"
            );
            return;
        };
        binder.handle_field_change(
            self.listener.local_field_id(),
            &Observed::Map(target),
            ALL_FIELDS,
        );
    }
}

impl FieldListener for MapListener {
    fn kind(&self) -> ObservableKind {
        ObservableKind::Map
    }

    fn target(&self) -> Option<Observed> {
        self.listener.target().map(Observed::Map)
    }

    fn set_target(&self, target: Observed) -> Result<(), BindingError> {
        match target {
            Observed::Map(target) => {
                self.listener.set_target(Some(target));
                Ok(())
            }
            other => Err(kind_mismatch(
                self.listener.local_field_id(),
                ObservableKind::Map,
                &other,
            )),
        }
    }

    fn unregister(&self) -> bool {
        self.listener.unregister()
    }
}
