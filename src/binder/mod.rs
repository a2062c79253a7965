//! The binder core.
//!
//! A [`Binder`] owns a fixed table of listener slots, one per bound field,
//! and the clean/pending state machine that turns any number of accepted
//! field changes into a single deferred rebind.
//!
//! # Registration
//!
//! [`Binder::update_registration`] moves a slot's subscription to a new
//! target. Assigning the target a slot already observes is a no-op, and
//! assigning `None` leaves the slot's listener in place without a target.
//!
//! # Scheduling
//!
//! ```text
//!            accepted change                 frame callback starts
//!   clean ─────────────────────▶ pending ────────────────────────▶ clean
//!                                  │  ▲                             then rebind_dirty()
//!                                  └──┘ accepted change (absorbed)
//! ```
//!
//! The flag is cleared before [`BindingHooks::rebind_dirty`] runs, so a
//! change that arrives while rebinding schedules a fresh pass.
//!
//! # Teardown
//!
//! Dropping the [`BinderHandle`] drops the binder, which unsubscribes every
//! slot that still has a target.

mod binder;
mod error;
mod hooks;
mod layout;

pub use binder::{Binder, BinderHandle};
pub use error::BindingError;
pub use hooks::{BindingHooks, FieldChange};
pub use layout::BindingLayout;
