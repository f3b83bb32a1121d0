//! Spring physics
//!
//! Semi-implicit Euler springs stepped at a fixed timestep. A spring that is
//! close enough to its target (in both displacement and velocity) snaps onto
//! it, so motions reach an exact rest state instead of approaching it forever.

use serde::{Deserialize, Serialize};

/// Default rest threshold for displacement and velocity
pub const DEFAULT_PRECISION: f64 = 0.01;

fn default_precision() -> f64 {
    DEFAULT_PRECISION
}

/// Configuration for a spring animation
///
/// Springs have unit mass, so `stiffness` and `damping` fully determine the
/// dynamics. `precision` is the snap threshold used by [`step`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    #[serde(default = "default_precision")]
    pub precision: f64,
}

impl SpringConfig {
    /// Create a new spring configuration with the default precision
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Override the snap threshold
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Settles quickly without visible overshoot (the default)
    pub fn no_wobble() -> Self {
        Self::new(170.0, 26.0)
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(210.0, 20.0)
    }

    /// Calculate critical damping for this spring's stiffness
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }

    /// Reason this configuration cannot drive a spring, if any
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        if !self.stiffness.is_finite() || self.stiffness <= 0.0 {
            return Err("stiffness must be a positive finite number");
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err("damping must be a non-negative finite number");
        }
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err("precision must be a positive finite number");
        }
        Ok(())
    }

    /// Whether fixed steps of `dt` seconds keep this spring bounded
    ///
    /// A semi-implicit Euler step only decays while `damping·dt < 2` and
    /// `stiffness·dt² + 2·damping·dt < 4`. Outside that region the position
    /// grows without bound and ends up NaN.
    pub fn is_stable_at(&self, dt: f64) -> bool {
        let damping = self.damping * dt;
        let stiffness = self.stiffness * dt * dt;
        damping < 2.0 && stiffness + 2.0 * damping < 4.0
    }

    /// Like [`check`](Self::check), and also rejects springs that diverge
    /// when stepped every `dt` seconds
    pub(crate) fn check_at(&self, dt: f64) -> Result<(), &'static str> {
        self.check()?;
        if !self.is_stable_at(dt) {
            return Err("stiffness and damping are too large for the frame rate");
        }
        Ok(())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::no_wobble()
    }
}

/// Advance one spring by a single step of `dt` seconds
///
/// Returns the new `(position, velocity)`. When both the remaining
/// displacement and the velocity fall under `config.precision`, the result is
/// exactly `(target, 0.0)`, which is also a fixed point of this function.
pub fn step(dt: f64, x: f64, v: f64, target: f64, config: &SpringConfig) -> (f64, f64) {
    let spring_force = -config.stiffness * (x - target);
    let damping_force = -config.damping * v;
    let acceleration = spring_force + damping_force;

    let new_v = v + acceleration * dt;
    let new_x = x + new_v * dt;

    if (new_x - target).abs() < config.precision && new_v.abs() < config.precision {
        return (target, 0.0);
    }

    (new_x, new_v)
}

/// A spring-based animator
///
/// Wraps [`step`] with owned state so a run of catch-up frames can be
/// expressed as a loop over one value.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    /// Resume a spring from a known position and velocity
    pub fn from_state(config: SpringConfig, value: f64, velocity: f64, target: f64) -> Self {
        Self {
            config,
            value,
            velocity,
            target,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Step the simulation once
    pub fn step(&mut self, dt: f64) {
        (self.value, self.velocity) = self.peek(dt);
    }

    /// Step the simulation `frames` times
    pub fn advance(&mut self, frames: u32, dt: f64) {
        for _ in 0..frames {
            self.step(dt);
        }
    }

    /// State one step ahead, without moving the spring
    pub fn peek(&self, dt: f64) -> (f64, f64) {
        step(dt, self.value, self.velocity, self.target, &self.config)
    }
}
