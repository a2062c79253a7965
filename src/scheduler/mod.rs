//! Deferred, frame-aligned callback scheduling.
//!
//! The binder needs exactly one primitive from its host: run a callback
//! once, on the next rendering tick. [`FrameScheduler`] is that primitive.
//! [`FrameQueue`] implements it for hosts that drive their own loop, and for
//! tests.

mod frame;

pub use frame::FrameQueue;

/// The host's "run this on the next frame" primitive.
///
/// Implementations may or may not de-duplicate repeated requests; the binder
/// keeps its own pending flag and never posts twice for one dirty period.
pub trait FrameScheduler {
    fn post_frame_callback(&self, callback: Box<dyn FnOnce()>);
}
