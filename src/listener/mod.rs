//! Weak listener adapters.
//!
//! One adapter occupies each populated binder slot. It subscribes to the
//! slot's current target, turns that target's native notifications into a
//! single field-changed event, and forwards the event to its binder through
//! a `Weak` reference so that an observable never keeps a binder alive.
//!
//! The variants differ only in how they subscribe and in the shape of the
//! notifications they receive:
//! - [`PropertyListener`] for [`PropertyObservable`] targets
//! - [`ListListener`] for [`ListObservable`] targets
//! - [`MapListener`] for [`MapObservable`] targets
//!
//! [`PropertyObservable`]: crate::observable::PropertyObservable
//! [`ListObservable`]: crate::observable::ListObservable
//! [`MapObservable`]: crate::observable::MapObservable

mod list;
mod map;
mod property;
mod weak;

use std::rc::{Rc, Weak};

use crate::binder::BindingError;
use crate::observable::{FieldId, ObservableKind, Observed};

pub(crate) use list::ListListener;
pub(crate) use map::MapListener;
pub(crate) use property::PropertyListener;
pub(crate) use weak::WeakListener;

/// Where listeners deliver normalized field-changed events.
pub(crate) trait ChangeSink {
    fn handle_field_change(&self, local_field_id: usize, source: &Observed, field_id: FieldId);
}

/// The slot-table view of a listener, independent of its variant.
pub(crate) trait FieldListener {
    fn kind(&self) -> ObservableKind;

    fn target(&self) -> Option<Observed>;

    /// Move the subscription to `target`. Fails without touching the current
    /// subscription when `target` speaks a different protocol.
    fn set_target(&self, target: Observed) -> Result<(), BindingError>;

    /// Drop the target. Returns whether there was one.
    fn unregister(&self) -> bool;
}

/// Allocate the listener variant for `kind`.
pub(crate) fn create_listener(
    kind: ObservableKind,
    binder: Weak<dyn ChangeSink>,
    local_field_id: usize,
) -> Rc<dyn FieldListener> {
    match kind {
        ObservableKind::Property => PropertyListener::new(binder, local_field_id),
        ObservableKind::List => ListListener::new(binder, local_field_id),
        ObservableKind::Map => MapListener::new(binder, local_field_id),
    }
}

fn kind_mismatch(slot: usize, expected: ObservableKind, found: &Observed) -> BindingError {
    BindingError::KindMismatch {
        slot,
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::{ObservableField, ObservableMap, ObservableVec};
    use std::cell::RefCell;

    /// Records every event it receives.
    #[derive(Default)]
    struct Sink {
        events: RefCell<Vec<(usize, FieldId)>>,
    }

    impl ChangeSink for Sink {
        fn handle_field_change(&self, local_field_id: usize, _source: &Observed, field_id: FieldId) {
            self.events.borrow_mut().push((local_field_id, field_id));
        }
    }

    fn sink() -> (Rc<Sink>, Weak<dyn ChangeSink>) {
        let sink = Rc::new(Sink::default());
        let as_dyn: Rc<dyn ChangeSink> = sink.clone();
        let weak = Rc::downgrade(&as_dyn);
        (sink, weak)
    }

    #[test]
    fn property_listener_forwards_field_id() {
        let (sink, weak) = sink();
        let field = Rc::new(ObservableField::new(1));
        let listener = create_listener(ObservableKind::Property, weak, 2);

        listener.set_target(Observed::property(Rc::clone(&field))).unwrap();
        field.notify_property_changed(9);

        assert_eq!(*sink.events.borrow(), vec![(2, 9)]);
    }

    #[test]
    fn list_ranges_collapse_to_one_event_each() {
        let (sink, weak) = sink();
        let list = Rc::new(ObservableVec::from_vec(vec![1, 2, 3]));
        let listener = create_listener(ObservableKind::List, weak, 0);

        listener.set_target(Observed::list(Rc::clone(&list))).unwrap();
        list.push(4);
        list.remove(0);
        list.move_item(0, 1);
        list.set(0, 9);
        list.replace_all(vec![]);

        assert_eq!(sink.events.borrow().len(), 5);
        assert!(sink.events.borrow().iter().all(|&(slot, field)| slot == 0 && field == 0));
    }

    #[test]
    fn map_keys_collapse_to_all_fields() {
        let (sink, weak) = sink();
        let map: Rc<ObservableMap<&'static str, i32>> = Rc::new(ObservableMap::new());
        let listener = create_listener(ObservableKind::Map, weak, 1);

        listener.set_target(Observed::map(Rc::clone(&map))).unwrap();
        map.insert("a", 1);
        map.insert("b", 2);

        assert_eq!(*sink.events.borrow(), vec![(1, 0), (1, 0)]);
    }

    #[test]
    fn wrong_kind_leaves_subscription_alone() {
        let (_sink, weak) = sink();
        let field = Rc::new(ObservableField::new(0));
        let list: Rc<ObservableVec<i32>> = Rc::new(ObservableVec::new());
        let listener = create_listener(ObservableKind::Property, weak, 4);

        listener.set_target(Observed::property(Rc::clone(&field))).unwrap();
        let err = listener.set_target(Observed::list(list)).unwrap_err();

        assert_eq!(
            err,
            BindingError::KindMismatch {
                slot: 4,
                expected: ObservableKind::Property,
                found: ObservableKind::List,
            }
        );
        assert_eq!(field.callback_count(), 1);
    }

    #[test]
    fn dead_binder_unsubscribes_on_next_notification() {
        let (sink, weak) = sink();
        let field = Rc::new(ObservableField::new(0));
        let listener = create_listener(ObservableKind::Property, weak, 0);
        listener.set_target(Observed::property(Rc::clone(&field))).unwrap();
        assert_eq!(field.callback_count(), 1);

        drop(sink);
        field.set(1);

        assert_eq!(field.callback_count(), 0);
        assert!(listener.target().is_none());
    }

    #[test]
    fn unregister_reports_whether_target_existed() {
        let (_sink, weak) = sink();
        let field = Rc::new(ObservableField::new(0));
        let listener = create_listener(ObservableKind::Property, weak, 0);

        assert!(!listener.unregister());
        listener.set_target(Observed::property(Rc::clone(&field))).unwrap();
        assert!(listener.unregister());
        assert!(!listener.unregister());
        assert_eq!(field.callback_count(), 0);
    }
}
