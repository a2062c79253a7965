use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

use super::FrameScheduler;

type FrameCallback = Box<dyn FnOnce()>;

/// A single-threaded queue of frame callbacks.
///
/// Each [`run_frame`](FrameQueue::run_frame) runs the callbacks that were
/// queued before it started. Callbacks posted while a frame is running wait
/// for the next one.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use bindery::{FrameQueue, FrameScheduler};
///
/// let frames = FrameQueue::new();
/// let ran = Rc::new(Cell::new(0));
///
/// let counter = Rc::clone(&ran);
/// frames.post_frame_callback(Box::new(move || counter.set(counter.get() + 1)));
/// assert_eq!(ran.get(), 0);
///
/// assert_eq!(frames.run_frame(), 1);
/// assert_eq!(ran.get(), 1);
/// ```
pub struct FrameQueue {
    queue: RefCell<VecDeque<FrameCallback>>,
    frames_run: Cell<u64>,
    posted: Cell<u64>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            frames_run: Cell::new(0),
            posted: Cell::new(0),
        }
    }

    /// Callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Total callbacks ever posted.
    pub fn posted(&self) -> u64 {
        self.posted.get()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }

    /// Run one frame. Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        self.frames_run.set(self.frames_run.get() + 1);
        trace!(
            frame = self.frames_run.get(),
            callbacks = batch.len(),
            "running frame"
        );
        let ran = batch.len();
        for callback in batch {
            callback();
        }
        ran
    }

    /// Run frames until nothing is queued or `max_frames` have run.
    /// Returns how many frames ran.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending() > 0 {
            self.run_frame();
            frames += 1;
        }
        frames
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for FrameQueue {
    fn post_frame_callback(&self, callback: Box<dyn FnOnce()>) {
        self.posted.set(self.posted.get() + 1);
        self.queue.borrow_mut().push_back(callback);
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .field("posted", &self.posted.get())
            .field("frames_run", &self.frames_run.get())
            .finish()
    }
}
