//! Frame scheduler
//!
//! A [`Motion`] animates one [`TargetStyle`] at a fixed physics rate while
//! being sampled at whatever cadence the host's refresh callback delivers.
//!
//! Each delivered frame:
//! - stops if every property is exactly at rest on its target
//! - adds the elapsed wall-clock time to a backlog, dropping it entirely if
//!   the host was suspended for more than `max_catch_up_frames`
//! - runs as many whole spring steps as the backlog covers
//! - interpolates between the last whole step and one step ahead, so the
//!   published style moves smoothly between physics boundaries
//!
//! At most one frame is outstanding per motion. Requesting a second one is a
//! contract violation and panics.

use crate::config::MotionConfig;
use crate::convergence::should_stop;
use crate::error::Result;
use crate::frame::{Clock, FrameHandle, FrameQueue, FrameSource};
use crate::spring::Spring;
use crate::style::{lerp, strip_style, MotionState, Style, Target, TargetStyle, Velocity};
use std::fmt;

/// Receives the published style after every tick that advanced physics
pub type StyleCallback = Box<dyn FnMut(&Style)>;

/// What a delivered frame did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Not the frame this motion is waiting for (cancelled or foreign)
    Ignored,
    /// Everything is at rest; no further frame was requested
    Stopped,
    /// No time was consumed; another frame was requested
    Deferred,
    /// Physics advanced by `frames` whole steps and a new style was published
    Advanced { frames: u32, completion: f64 },
}

/// Spring animation of a set of named properties
pub struct Motion {
    config: MotionConfig,
    target: TargetStyle,
    state: MotionState,
    /// Wall-clock time (ms) not yet consumed by a whole step
    accumulated_time: f64,
    prev_time: f64,
    pending_frame: Option<FrameHandle>,
    /// Set when the target changes, cleared once a tick has stepped against it
    has_unread_target: bool,
    unmounted: bool,
    listener: Option<StyleCallback>,
}

impl Motion {
    /// Create a motion resting on `default_style`, or on the target's own
    /// values when no default is given
    ///
    /// Fails if `config` is invalid or any spring in `target` would diverge
    /// at `config`'s frame rate.
    pub fn new(
        config: MotionConfig,
        target: TargetStyle,
        default_style: Option<Style>,
    ) -> Result<Self> {
        config.validate()?;
        target.validate_for(&config)?;

        let seed = default_style.unwrap_or_else(|| strip_style(&target));
        let mut state = MotionState::at_rest(seed);
        state.adopt_keys(&target);

        Ok(Self {
            config,
            target,
            state,
            accumulated_time: 0.0,
            prev_time: 0.0,
            pending_frame: None,
            has_unread_target: false,
            unmounted: false,
            listener: None,
        })
    }

    /// Register the per-tick output callback, replacing any previous one
    pub fn on_style<F>(&mut self, listener: F)
    where
        F: FnMut(&Style) + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Start animating: take the current time as the reference point and
    /// request the first frame
    pub fn mount<C, F>(&mut self, clock: &C, frames: &mut F)
    where
        C: Clock + ?Sized,
        F: FrameSource + ?Sized,
    {
        self.prev_time = clock.now();
        self.start_if_necessary(frames);
        tracing::debug!(keys = self.target.len(), "motion mounted");
    }

    /// Cancel the outstanding frame and never request another
    pub fn unmount<F: FrameSource + ?Sized>(&mut self, frames: &mut F) {
        self.cancel(frames);
        self.unmounted = true;
    }

    /// Request the next frame
    ///
    /// # Panics
    ///
    /// Panics if a frame is already outstanding. A motion is armed either
    /// from inside its own frame or from outside when idle, never both.
    pub fn start_if_necessary<F: FrameSource + ?Sized>(&mut self, frames: &mut F) {
        if let Some(pending) = self.pending_frame {
            panic!("start_if_necessary() called while frame {pending:?} is outstanding");
        }
        if self.unmounted {
            return;
        }
        self.pending_frame = Some(frames.request_frame());
    }

    /// Withdraw the outstanding frame, if any
    pub fn cancel<F: FrameSource + ?Sized>(&mut self, frames: &mut F) {
        if let Some(handle) = self.pending_frame.take() {
            frames.cancel_frame(handle);
            tracing::debug!(?handle, "motion frame cancelled");
        }
    }

    /// Replace the target
    ///
    /// If the previous target was never consumed by a tick, its literal
    /// properties are written into the state first, so a value that was set
    /// and replaced between two frames is not lost. Spring properties keep
    /// their in-flight position and velocity.
    ///
    /// `target` is expected to be validated already (see
    /// [`TargetStyle::validate_for`]); use [`try_set_target`] for input that
    /// is not.
    ///
    /// [`try_set_target`]: Self::try_set_target
    pub fn set_target<C, F>(&mut self, target: TargetStyle, clock: &C, frames: &mut F)
    where
        C: Clock + ?Sized,
        F: FrameSource + ?Sized,
    {
        if self.has_unread_target {
            tracing::trace!("target replaced before any tick read it; applying its literals");
            self.state.apply_literals(&self.target);
        }

        self.state.adopt_keys(&target);
        self.target = target;
        self.has_unread_target = true;

        if self.pending_frame.is_none() && !self.unmounted {
            self.prev_time = clock.now();
            self.start_if_necessary(frames);
        }
    }

    /// Validate `target` against this motion's frame rate, then
    /// [`set_target`](Self::set_target)
    ///
    /// On error nothing changes: the old target keeps animating.
    pub fn try_set_target<C, F>(
        &mut self,
        target: TargetStyle,
        clock: &C,
        frames: &mut F,
    ) -> Result<()>
    where
        C: Clock + ?Sized,
        F: FrameSource + ?Sized,
    {
        if let Err(err) = target.validate_for(&self.config) {
            tracing::warn!(%err, "rejected new target");
            return Err(err);
        }
        self.set_target(target, clock, frames);
        Ok(())
    }

    /// Run the body of a delivered frame
    pub fn on_frame<C, F>(
        &mut self,
        handle: FrameHandle,
        clock: &C,
        frames: &mut F,
    ) -> FrameOutcome
    where
        C: Clock + ?Sized,
        F: FrameSource + ?Sized,
    {
        if self.pending_frame != Some(handle) {
            tracing::trace!(?handle, "ignoring frame this motion is not waiting for");
            return FrameOutcome::Ignored;
        }

        if should_stop(
            &self.state.current_style,
            &self.target,
            &self.state.current_velocity,
        ) {
            self.pending_frame = None;
            self.accumulated_time = 0.0;
            tracing::debug!("motion at rest");
            return FrameOutcome::Stopped;
        }

        let now = clock.now();
        let mut time_delta = now - self.prev_time;
        if time_delta < 0.0 {
            tracing::warn!(time_delta, "clock went backwards; treating as no elapsed time");
            time_delta = 0.0;
        }
        self.prev_time = now;
        self.accumulated_time += time_delta;

        if self.accumulated_time > self.config.max_backlog_ms() {
            tracing::debug!(
                backlog_ms = self.accumulated_time,
                "frame backlog too large, dropping it"
            );
            self.accumulated_time = 0.0;
        }

        if self.accumulated_time == 0.0 {
            self.pending_frame = None;
            self.start_if_necessary(frames);
            return FrameOutcome::Deferred;
        }

        let frame_ms = self.config.frame_duration_ms();
        let dt = self.config.frame_duration_secs();
        let catch_up = (self.accumulated_time / frame_ms).floor();
        let completion = (self.accumulated_time - catch_up * frame_ms) / frame_ms;
        let frames_to_catch_up = catch_up as u32;

        for (key, target) in self.target.iter() {
            match *target {
                Target::Literal(value) => self.state.snap(key, value),
                Target::Spring { value, config } => {
                    let (x, v) = self.state.ideal(key).unwrap_or((value, 0.0));
                    let mut spring = Spring::from_state(config, x, v, value);
                    spring.advance(frames_to_catch_up, dt);
                    let (next_x, next_v) = spring.peek(dt);

                    self.state.set_ideal(key, spring.value(), spring.velocity());
                    self.state.set_current(
                        key,
                        lerp(spring.value(), next_x, completion),
                        lerp(spring.velocity(), next_v, completion),
                    );
                }
            }
        }

        self.pending_frame = None;
        self.accumulated_time -= catch_up * frame_ms;

        tracing::trace!(
            frames = frames_to_catch_up,
            completion,
            remainder_ms = self.accumulated_time,
            "motion tick"
        );

        if let Some(listener) = self.listener.as_mut() {
            listener(&self.state.current_style);
        }

        self.has_unread_target = false;
        self.start_if_necessary(frames);

        FrameOutcome::Advanced {
            frames: frames_to_catch_up,
            completion,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn target(&self) -> &TargetStyle {
        &self.target
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Style currently exposed to the host
    pub fn current_style(&self) -> &Style {
        &self.state.current_style
    }

    pub fn current_velocity(&self) -> &Velocity {
        &self.state.current_velocity
    }

    pub fn last_ideal_style(&self) -> &Style {
        &self.state.last_ideal_style
    }

    pub fn last_ideal_velocity(&self) -> &Velocity {
        &self.state.last_ideal_velocity
    }

    pub fn accumulated_time(&self) -> f64 {
        self.accumulated_time
    }

    /// Whether a frame is outstanding
    pub fn is_animating(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted
    }
}

impl fmt::Debug for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Motion")
            .field("config", &self.config)
            .field("target", &self.target)
            .field("state", &self.state)
            .field("accumulated_time", &self.accumulated_time)
            .field("prev_time", &self.prev_time)
            .field("pending_frame", &self.pending_frame)
            .field("has_unread_target", &self.has_unread_target)
            .field("unmounted", &self.unmounted)
            .finish_non_exhaustive()
    }
}

/// Deliver frames from `frames` to `motion` until it stops asking for them
/// or `max_frames` have been delivered
///
/// `before_frame` runs ahead of each delivery with the frame's index, which
/// is where a simulation advances its [`ManualClock`]. Returns the number of
/// frames delivered. The queue must only hold frames requested by `motion`.
///
/// [`ManualClock`]: crate::frame::ManualClock
pub fn drive<C, B>(
    motion: &mut Motion,
    clock: &C,
    frames: &mut FrameQueue,
    max_frames: usize,
    mut before_frame: B,
) -> usize
where
    C: Clock + ?Sized,
    B: FnMut(usize),
{
    let mut delivered = 0;
    while delivered < max_frames {
        let Some(handle) = frames.next_frame() else {
            break;
        };
        before_frame(delivered);
        motion.on_frame(handle, clock, frames);
        delivered += 1;
    }
    delivered
}
