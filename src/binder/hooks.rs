use std::any::Any;

use super::Binder;
use crate::observable::{FieldId, Observed, ALL_FIELDS};

/// A normalized change notification for one bound field.
#[derive(Debug, Clone, Copy)]
pub struct FieldChange<'a> {
    /// Slot the notifying listener occupies.
    pub local_field_id: usize,
    /// The slot's current target, which sent the notification.
    pub source: &'a Observed,
    /// Property id for property targets, [`ALL_FIELDS`] otherwise.
    pub field_id: FieldId,
}

impl FieldChange<'_> {
    pub fn is_all_fields(&self) -> bool {
        self.field_id == ALL_FIELDS
    }
}

/// Domain logic plugged into a [`Binder`].
///
/// This is what generated binding code implements: deciding which changes
/// matter and pushing current values into the presentation tree.
pub trait BindingHooks<R: 'static> {
    /// Decide whether a change should schedule a rebind.
    ///
    /// Subscription bookkeeping has already happened by the time this runs
    /// and does not depend on the answer.
    fn on_field_change(&self, binder: &Binder<R>, change: &FieldChange<'_>) -> bool;

    /// Recompute and apply bound values. Runs once per coalesced burst of
    /// accepted changes, with the binder already marked clean.
    fn rebind_dirty(&self, binder: &Binder<R>);

    /// Accept a layout variable by id. Returns whether the id is known.
    fn set_variable(&self, binder: &Binder<R>, variable_id: u32, value: &dyn Any) -> bool {
        let _ = (binder, variable_id, value);
        false
    }
}
