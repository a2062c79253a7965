//! # Bindery
//!
//! Dirty tracking for declarative data binding.
//!
//! A [`Binder`] sits between a presentation tree and the observable values
//! bound into it. It keeps one slot per bound field, listens to whatever each
//! slot currently points at, and turns a burst of change notifications into a
//! single deferred rebind on the next frame.
//!
//! ## Observables
//!
//! Values take part in binding through one of three protocols:
//! - [`PropertyObservable`] - property change notification by field id
//! - [`ListObservable`] - list mutations with range semantics
//! - [`MapObservable`] - keyed-map mutations
//!
//! [`ObservableField`], [`ObservableVec`] and [`ObservableMap`] implement them
//! for the common cases.
//!
//! ## Binders
//!
//! Domain logic lives in a [`BindingHooks`] implementation: it decides which
//! changes matter and recomputes bound values when the frame comes around.
//! Frames come from a [`FrameScheduler`]; [`FrameQueue`] is a manual one for
//! hosts that drive their own loop, and for tests.
//!
//! Listeners hold their binder weakly, so dropping the [`BinderHandle`] is
//! all it takes to tear a binding down.

pub mod binder;
pub mod discovery;
mod listener;
pub mod observable;
pub mod scheduler;

// Re-export main types for convenience
pub use binder::{Binder, BinderHandle, BindingError, BindingHooks, BindingLayout, FieldChange};
pub use observable::{
    FieldId, ListObservable, MapObservable, ObservableField, ObservableKind, ObservableMap,
    ObservableVec, Observed, OnListChangedCallback, OnMapChangedCallback,
    OnPropertyChangedCallback, PropertyObservable, ALL_FIELDS,
};
pub use scheduler::{FrameQueue, FrameScheduler};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Always;

    impl BindingHooks<()> for Always {
        fn on_field_change(&self, _: &Binder<()>, _: &FieldChange<'_>) -> bool {
            true
        }

        fn rebind_dirty(&self, _: &Binder<()>) {}
    }

    #[test]
    fn it_works() {
        // Basic smoke test
        let frames = Rc::new(FrameQueue::new());
        let binder = Binder::new((), BindingLayout::new(1), Rc::clone(&frames), Always);
        let count = Rc::new(ObservableField::new(0));

        assert!(binder.update_property(0, Some(Rc::clone(&count))));
        count.set(42);
        assert!(binder.has_pending_rebind());
        assert_eq!(frames.run_frame(), 1);
        assert!(!binder.has_pending_rebind());
    }
}
