use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::{BindingError, BindingHooks, BindingLayout, FieldChange};
use crate::listener::{create_listener, ChangeSink, FieldListener};
use crate::observable::{
    FieldId, ListObservable, MapObservable, Observed, PropertyObservable,
};
use crate::scheduler::FrameScheduler;

/// One bound presentation unit.
///
/// Created through [`Binder::new`], which hands back the owning
/// [`BinderHandle`]. Everything else in the crate, listeners and scheduled
/// frame callbacks included, only holds the binder weakly.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use bindery::{Binder, BindingHooks, BindingLayout, FieldChange, FrameQueue, ObservableField};
///
/// #[derive(Default)]
/// struct Label {
///     text: Rc<std::cell::RefCell<String>>,
/// }
///
/// impl BindingHooks<()> for Label {
///     fn on_field_change(&self, _: &Binder<()>, _: &FieldChange<'_>) -> bool {
///         true
///     }
///
///     fn rebind_dirty(&self, binder: &Binder<()>) {
///         if let Some(name) = binder.observed::<ObservableField<String>>(0) {
///             *self.text.borrow_mut() = format!("Hello, {}", name.get());
///         }
///     }
/// }
///
/// let frames = Rc::new(FrameQueue::new());
/// let label = Label::default();
/// let text = Rc::clone(&label.text);
/// let binder = Binder::new((), BindingLayout::new(1), Rc::clone(&frames), label);
///
/// let name = Rc::new(ObservableField::new("Ada".to_string()));
/// binder.update_property(0, Some(Rc::clone(&name)));
///
/// name.set("Grace".to_string());
/// name.set("Linus".to_string());
/// assert_eq!(frames.pending(), 1);
///
/// frames.run_frame();
/// assert_eq!(*text.borrow(), "Hello, Linus");
/// ```
pub struct Binder<R: 'static> {
    root: R,
    layout: BindingLayout,
    fields: RefCell<Box<[Option<Rc<dyn FieldListener>>]>>,
    pending_rebind: Cell<bool>,
    scheduler: Rc<dyn FrameScheduler>,
    hooks: Box<dyn BindingHooks<R>>,
    this: Weak<Binder<R>>,
}

impl<R: 'static> Binder<R> {
    /// Create a binder for `root` with one empty slot per bound field.
    pub fn new<S, H>(root: R, layout: BindingLayout, scheduler: Rc<S>, hooks: H) -> BinderHandle<R>
    where
        S: FrameScheduler + 'static,
        H: BindingHooks<R> + 'static,
    {
        let fields: Box<[Option<Rc<dyn FieldListener>>]> =
            (0..layout.field_count()).map(|_| None).collect();
        let binder = Rc::new_cyclic(|this| Binder {
            root,
            layout,
            fields: RefCell::new(fields),
            pending_rebind: Cell::new(false),
            scheduler,
            hooks: Box::new(hooks),
            this: this.clone(),
        });
        debug!(field_count = binder.field_count(), "binder created");
        BinderHandle { binder }
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn layout(&self) -> &BindingLayout {
        &self.layout
    }

    pub fn field_count(&self) -> usize {
        self.layout.field_count()
    }

    /// Whether a rebind has been scheduled and has not started yet.
    pub fn has_pending_rebind(&self) -> bool {
        self.pending_rebind.get()
    }

    /// Whether a listener has ever been allocated for `local_field_id`.
    ///
    /// # Panics
    ///
    /// If `local_field_id` is out of range.
    pub fn has_listener(&self, local_field_id: usize) -> bool {
        contract(self.listener(local_field_id)).is_some()
    }

    /// The target currently observed in `local_field_id`.
    ///
    /// # Panics
    ///
    /// If `local_field_id` is out of range.
    pub fn observed_field(&self, local_field_id: usize) -> Option<Observed> {
        contract(self.listener(local_field_id)).and_then(|listener| listener.target())
    }

    /// The target currently observed in `local_field_id`, as its concrete type.
    ///
    /// Returns `None` when the slot is empty or holds some other type.
    ///
    /// # Panics
    ///
    /// If `local_field_id` is out of range.
    pub fn observed<T: Any>(&self, local_field_id: usize) -> Option<Rc<T>> {
        self.observed_field(local_field_id)
            .and_then(|target| target.downcast::<T>())
    }

    /// Point `local_field_id` at `target`. Returns whether anything changed.
    ///
    /// # Panics
    ///
    /// On the contract violations [`try_update_registration`] reports.
    ///
    /// [`try_update_registration`]: Binder::try_update_registration
    pub fn update_registration(&self, local_field_id: usize, target: Option<Observed>) -> bool {
        contract(self.try_update_registration(local_field_id, target))
    }

    /// Point `local_field_id` at `target`, reporting contract violations.
    ///
    /// - `None` unsubscribes the slot's listener, if any, and returns whether
    ///   it had a target.
    /// - An empty slot gets a listener for the target's kind.
    /// - The target the slot already observes is a no-op returning false.
    /// - Anything else moves the listener's subscription to `target`.
    ///
    /// A populated slot keeps the kind of its first target; observing a
    /// different kind there is [`BindingError::KindMismatch`].
    pub fn try_update_registration(
        &self,
        local_field_id: usize,
        target: Option<Observed>,
    ) -> Result<bool, BindingError> {
        let existing = self.listener(local_field_id)?;
        let Some(target) = target else {
            return Ok(existing.is_some_and(|listener| listener.unregister()));
        };

        match existing {
            None => {
                let listener = create_listener(target.kind(), self.sink(), local_field_id);
                self.fields.borrow_mut()[local_field_id] = Some(Rc::clone(&listener));
                trace!(local_field_id, kind = %target.kind(), "listener allocated");
                listener.set_target(target)?;
                Ok(true)
            }
            Some(listener) => {
                let unchanged = listener
                    .target()
                    .is_some_and(|current| current.ptr_eq(&target));
                if unchanged {
                    return Ok(false);
                }
                listener.set_target(target)?;
                Ok(true)
            }
        }
    }

    pub fn update_property<T: PropertyObservable + 'static>(
        &self,
        local_field_id: usize,
        target: Option<Rc<T>>,
    ) -> bool {
        self.update_registration(local_field_id, target.map(Observed::property))
    }

    pub fn update_list<T: ListObservable + 'static>(
        &self,
        local_field_id: usize,
        target: Option<Rc<T>>,
    ) -> bool {
        self.update_registration(local_field_id, target.map(Observed::list))
    }

    pub fn update_map<T: MapObservable + 'static>(
        &self,
        local_field_id: usize,
        target: Option<Rc<T>>,
    ) -> bool {
        self.update_registration(local_field_id, target.map(Observed::map))
    }

    /// Stop observing `local_field_id`. Returns whether it had a target.
    pub fn unregister_from(&self, local_field_id: usize) -> bool {
        self.update_registration(local_field_id, None)
    }

    /// Forward a layout variable to the hooks.
    pub fn set_variable(&self, variable_id: u32, value: &dyn Any) -> bool {
        self.hooks.set_variable(self, variable_id, value)
    }

    /// Schedule a rebind on the next frame unless one is already pending.
    pub fn request_rebind(&self) {
        if self.pending_rebind.replace(true) {
            trace!("rebind already pending");
            return;
        }
        debug!("scheduling rebind");
        let this = self.this.clone();
        self.scheduler.post_frame_callback(Box::new(move || match this.upgrade() {
            Some(binder) => {
                binder.execute_pending_bindings();
            }
            None => {
                trace!("binder dropped before its rebind frame");
            }
        }));
    }

    /// Run a pending rebind now instead of waiting for the frame.
    ///
    /// Returns false if nothing was pending. The frame callback that was
    /// scheduled for it later finds the binder clean and does nothing.
    pub fn execute_pending_bindings(&self) -> bool {
        if !self.pending_rebind.replace(false) {
            return false;
        }
        debug!("rebinding dirty fields");
        self.hooks.rebind_dirty(self);
        true
    }

    fn listener(
        &self,
        local_field_id: usize,
    ) -> Result<Option<Rc<dyn FieldListener>>, BindingError> {
        let fields = self.fields.borrow();
        fields
            .get(local_field_id)
            .cloned()
            .ok_or(BindingError::SlotOutOfRange {
                slot: local_field_id,
                field_count: fields.len(),
            })
    }

    fn sink(&self) -> Weak<dyn ChangeSink> {
        self.this.clone()
    }
}

impl<R: 'static> ChangeSink for Binder<R> {
    fn handle_field_change(&self, local_field_id: usize, source: &Observed, field_id: FieldId) {
        let change = FieldChange {
            local_field_id,
            source,
            field_id,
        };
        if self.hooks.on_field_change(self, &change) {
            self.request_rebind();
        } else {
            trace!(local_field_id, field_id, "field change ignored by hooks");
        }
    }
}

impl<R: 'static> Drop for Binder<R> {
    fn drop(&mut self) {
        let fields = std::mem::take(self.fields.get_mut());
        let released = fields
            .iter()
            .flatten()
            .filter(|listener| listener.unregister())
            .count();
        debug!(released, "binder torn down");
    }
}

impl<R: fmt::Debug + 'static> fmt::Debug for Binder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.borrow();
        let observed: Vec<Option<Observed>> = fields
            .iter()
            .map(|slot| slot.as_ref().and_then(|listener| listener.target()))
            .collect();
        f.debug_struct("Binder")
            .field("root", &self.root)
            .field("fields", &observed)
            .field("pending_rebind", &self.pending_rebind.get())
            .finish()
    }
}

/// Owning handle to a [`Binder`]. Dropping it tears the binder down.
pub struct BinderHandle<R: 'static> {
    binder: Rc<Binder<R>>,
}

impl<R: 'static> BinderHandle<R> {
    /// A non-owning reference, for hosts that need to check liveness.
    pub fn downgrade(&self) -> Weak<Binder<R>> {
        Rc::downgrade(&self.binder)
    }
}

impl<R: 'static> Deref for BinderHandle<R> {
    type Target = Binder<R>;

    fn deref(&self) -> &Binder<R> {
        &self.binder
    }
}

impl<R: fmt::Debug + 'static> fmt::Debug for BinderHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.binder, f)
    }
}

fn contract<T>(result: Result<T, BindingError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
