//! Blinc Motion
//!
//! Spring animation of named style properties, sampled at an irregular
//! refresh rate.
//!
//! # Features
//!
//! - **Fixed-Timestep Physics**: springs always step at 1/60 s, however
//!   unevenly the host's frames arrive, so runs are deterministic
//! - **Sub-Frame Interpolation**: published values blend between the last
//!   whole step and the next one
//! - **Exact Rest**: springs snap onto their target, and a motion stops
//!   requesting frames once every property is at rest
//! - **Backlog Clamp**: time lost while the host was suspended is dropped
//!   instead of replayed
//! - **Stale-Target Guard**: literal values replaced before any frame read
//!   them still land
//!
//! # Example
//!
//! ```rust
//! use blinc_motion::{
//!     drive, FrameQueue, ManualClock, Motion, MotionConfig, SpringConfig, Target, TargetStyle,
//! };
//!
//! let target = TargetStyle::new()
//!     .with("opacity", 1.0)
//!     .with("x", Target::spring(100.0, SpringConfig::no_wobble()));
//! let start = [("opacity".to_string(), 0.0), ("x".to_string(), 0.0)]
//!     .into_iter()
//!     .collect();
//!
//! let clock = ManualClock::new(0.0);
//! let mut frames = FrameQueue::new();
//! let mut motion = Motion::new(MotionConfig::default(), target, Some(start)).unwrap();
//! motion.mount(&clock, &mut frames);
//!
//! let ticker = clock.clone();
//! drive(&mut motion, &clock, &mut frames, 600, |_| ticker.advance(16.0));
//!
//! assert!(!motion.is_animating());
//! assert_eq!(motion.current_style()["x"], 100.0);
//! ```

pub mod config;
pub mod convergence;
pub mod error;
pub mod frame;
pub mod motion;
pub mod spring;
pub mod style;

pub use config::MotionConfig;
pub use convergence::should_stop;
pub use error::{MotionError, Result};
pub use frame::{Clock, FrameHandle, FrameQueue, FrameSource, ManualClock, SystemClock};
pub use motion::{drive, FrameOutcome, Motion, StyleCallback};
pub use spring::{step, Spring, SpringConfig, DEFAULT_PRECISION};
pub use style::{strip_style, zero_velocity, MotionState, Style, Target, TargetStyle, Velocity};
