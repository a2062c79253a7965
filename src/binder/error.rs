use thiserror::Error;

use crate::observable::ObservableKind;

/// Contract violations in the calls generated binding code makes.
///
/// These indicate a bug in the caller rather than a runtime condition, so
/// most entry points panic with this message instead of returning it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("slot {slot} is out of range for a binder with {field_count} bound fields")]
    SlotOutOfRange { slot: usize, field_count: usize },

    #[error("slot {slot} holds a {expected} listener and cannot observe a {found} target")]
    KindMismatch {
        slot: usize,
        expected: ObservableKind,
        found: ObservableKind,
    },
}
