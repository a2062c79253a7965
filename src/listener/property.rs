use std::rc::{Rc, Weak};

use tracing::trace;

use super::{kind_mismatch, ChangeSink, FieldListener, WeakListener};
use crate::binder::BindingError;
use crate::observable::{
    FieldId, ObservableKind, Observed, OnPropertyChangedCallback, PropertyObservable,
};

/// Listens to a [`PropertyObservable`] and forwards its field ids unchanged.
pub(crate) struct PropertyListener {
    listener: WeakListener<dyn PropertyObservable>,
}

impl PropertyListener {
    pub(crate) fn new(binder: Weak<dyn ChangeSink>, local_field_id: usize) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let callback: Weak<dyn OnPropertyChangedCallback> = this.clone();
            Self {
                listener: WeakListener::new(binder, callback, local_field_id),
            }
        })
    }
}

impl OnPropertyChangedCallback for PropertyListener {
    fn on_property_changed(&self, sender: &dyn PropertyObservable, field_id: FieldId) {
        let Some(binder) = self.listener.binder() else {
            return;
        };
        let Some(target) = self.listener.target_if_sender(sender) else {
            trace!(
                local_field_id = self.listener.local_field_id(),
                "dropping property notification from a stale sender"
            );
            return;
        };
        binder.handle_field_change(
            self.listener.local_field_id(),
            &Observed::Property(target),
            field_id,
        );
    }
}

impl FieldListener for PropertyListener {
    fn kind(&self) -> ObservableKind {
        ObservableKind::Property
    }

    fn target(&self) -> Option<Observed> {
        self.listener.target().map(Observed::Property)
    }

    fn set_target(&self, target: Observed) -> Result<(), BindingError> {
        match target {
            Observed::Property(target) => {
                self.listener.set_target(Some(target));
                Ok(())
            }
            other => Err(kind_mismatch(
                self.listener.local_field_id(),
                ObservableKind::Property,
                &other,
            )),
        }
    }

    fn unregister(&self) -> bool {
        self.listener.unregister()
    }
}
