//! Host services: clocks and frame sources
//!
//! A motion never sleeps or spawns anything itself. It reads time from a
//! [`Clock`] and asks a [`FrameSource`] for the next refresh callback. The
//! host delivers that callback by calling [`Motion::on_frame`] with the
//! handle it handed out.
//!
//! [`Motion::on_frame`]: crate::motion::Motion::on_frame

use slotmap::{new_key_type, SlotMap};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

new_key_type! {
    /// Handle to a requested animation frame
    pub struct FrameHandle;
}

/// Monotonic time source, in milliseconds
pub trait Clock {
    /// Current time; never smaller than a previous reading
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`], counting from its creation
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-advanced clock for simulations and tests
///
/// Clones share the same time, so a driver loop can advance the clock the
/// motion reads from.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Per-refresh callback scheduling, as offered by a windowing host
pub trait FrameSource {
    /// Request one callback at the next refresh
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request; unknown or already delivered handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// FIFO of requested frames
///
/// Hosts pop one handle per display refresh with [`FrameQueue::next_frame`]
/// and route it to the motion that requested it. Cancelled requests are never
/// returned.
#[derive(Debug, Default)]
pub struct FrameQueue {
    requested: SlotMap<FrameHandle, ()>,
    order: VecDeque<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest live request
    pub fn next_frame(&mut self) -> Option<FrameHandle> {
        while let Some(handle) = self.order.pop_front() {
            if self.requested.remove(handle).is_some() {
                return Some(handle);
            }
        }
        None
    }

    /// Number of requests still waiting for delivery
    pub fn pending(&self) -> usize {
        self.requested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }
}

impl FrameSource for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.requested.insert(());
        self.order.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requested.remove(handle);
    }
}
