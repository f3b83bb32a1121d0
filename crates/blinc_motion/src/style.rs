//! Style vectors
//!
//! A style is a set of named numeric properties. Targets say where each
//! property should end up: either snapped to a literal value or driven there
//! by a spring. Maps preserve insertion order so that every pass over a style
//! visits keys in the same sequence.

use crate::config::MotionConfig;
use crate::error::{MotionError, Result};
use crate::spring::{SpringConfig, DEFAULT_PRECISION};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property values keyed by name
pub type Style = IndexMap<String, f64>;

/// Per-property velocities, keyed like [`Style`]
pub type Velocity = IndexMap<String, f64>;

/// Where a single property is headed
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTarget", into = "RawTarget")]
pub enum Target {
    /// Jump straight to the value with zero velocity
    Literal(f64),
    /// Converge on `value` under spring-damper dynamics
    Spring { value: f64, config: SpringConfig },
}

impl Target {
    pub fn literal(value: f64) -> Self {
        Target::Literal(value)
    }

    pub fn spring(value: f64, config: SpringConfig) -> Self {
        Target::Spring { value, config }
    }

    /// The scalar this target resolves to at rest
    pub fn value(&self) -> f64 {
        match *self {
            Target::Literal(value) | Target::Spring { value, .. } => value,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Target::Literal(_))
    }

    fn check(&self) -> std::result::Result<(), &'static str> {
        match self {
            Target::Literal(value) if !value.is_finite() => Err("value must be finite"),
            Target::Literal(_) => Ok(()),
            Target::Spring { value, .. } if !value.is_finite() => Err("value must be finite"),
            Target::Spring { config, .. } => config.check(),
        }
    }

    fn check_at(&self, dt: f64) -> std::result::Result<(), &'static str> {
        self.check()?;
        match self {
            Target::Literal(_) => Ok(()),
            Target::Spring { config, .. } => config.check_at(dt),
        }
    }
}

impl From<f64> for Target {
    fn from(value: f64) -> Self {
        Target::Literal(value)
    }
}

/// Wire shape of a target: a bare number or a spring object
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Literal(f64),
    Spring(RawSpring),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpring {
    value: f64,
    stiffness: f64,
    damping: f64,
    #[serde(default = "default_precision")]
    precision: f64,
}

fn default_precision() -> f64 {
    DEFAULT_PRECISION
}

impl From<RawTarget> for Target {
    fn from(raw: RawTarget) -> Self {
        match raw {
            RawTarget::Literal(value) => Target::Literal(value),
            RawTarget::Spring(spring) => Target::Spring {
                value: spring.value,
                config: SpringConfig::new(spring.stiffness, spring.damping)
                    .with_precision(spring.precision),
            },
        }
    }
}

impl From<Target> for RawTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Literal(value) => RawTarget::Literal(value),
            Target::Spring { value, config } => RawTarget::Spring(RawSpring {
                value,
                stiffness: config.stiffness,
                damping: config.damping,
                precision: config.precision,
            }),
        }
    }
}

/// Desired end state for every animated property
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetStyle(IndexMap<String, Target>);

impl TargetStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, target: impl Into<Target>) -> Self {
        self.insert(key, target);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, target: impl Into<Target>) -> Option<Target> {
        self.0.insert(key.into(), target.into())
    }

    pub fn get(&self, key: &str) -> Option<&Target> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.0.iter().map(|(key, target)| (key.as_str(), target))
    }

    /// Only the entries that snap rather than animate
    pub fn literals(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().filter_map(|(key, target)| match *target {
            Target::Literal(value) => Some((key.as_str(), value)),
            Target::Spring { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject entries with non-finite values or impossible spring parameters
    pub fn validate(&self) -> Result<()> {
        self.check_each(Target::check)
    }

    /// [`validate`](Self::validate), and also reject springs that would
    /// diverge when stepped at `config`'s frame rate
    pub fn validate_for(&self, config: &MotionConfig) -> Result<()> {
        let dt = config.frame_duration_secs();
        self.check_each(|target| target.check_at(dt))
    }

    fn check_each<F>(&self, check: F) -> Result<()>
    where
        F: Fn(&Target) -> std::result::Result<(), &'static str>,
    {
        for (key, target) in &self.0 {
            check(target).map_err(|reason| MotionError::InvalidTarget {
                key: key.clone(),
                reason: reason.to_string(),
            })?;
        }
        Ok(())
    }

    /// Parse a JSON object of numbers and spring objects, then validate it
    pub fn from_json(source: &str) -> Result<Self> {
        let style: TargetStyle = serde_json::from_str(source)?;
        style.validate()?;
        Ok(style)
    }
}

impl<K: Into<String>, T: Into<Target>> FromIterator<(K, T)> for TargetStyle {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, target)| (key.into(), target.into()))
                .collect(),
        )
    }
}

/// Resolve every target to its resting value
pub fn strip_style(target: &TargetStyle) -> Style {
    target
        .iter()
        .map(|(key, target)| (key.to_string(), target.value()))
        .collect()
}

/// A velocity map with the same keys as `style`, all zero
pub fn zero_velocity(style: &Style) -> Velocity {
    style.keys().map(|key| (key.clone(), 0.0)).collect()
}

pub(crate) fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Displayed and ideal physics state of a motion
///
/// All four maps always share the same key set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionState {
    /// Values handed to the host, possibly interpolated between steps
    pub current_style: Style,
    pub current_velocity: Velocity,
    /// Output of the last whole physics step
    pub last_ideal_style: Style,
    pub last_ideal_velocity: Velocity,
}

impl MotionState {
    /// Start at rest on `style`
    pub fn at_rest(style: Style) -> Self {
        let velocity = zero_velocity(&style);
        Self {
            current_style: style.clone(),
            current_velocity: velocity.clone(),
            last_ideal_style: style,
            last_ideal_velocity: velocity,
        }
    }

    /// Add any keys of `target` this state has never seen, at rest on their
    /// resting value
    pub fn adopt_keys(&mut self, target: &TargetStyle) {
        for (key, target) in target.iter() {
            if !self.last_ideal_style.contains_key(key) {
                self.snap(key, target.value());
            }
        }
    }

    /// Force every literal of `target` into all four maps
    pub fn apply_literals(&mut self, target: &TargetStyle) {
        for (key, value) in target.literals() {
            self.snap(key, value);
        }
    }

    /// Put `key` at rest on `value`, both displayed and ideal
    pub fn snap(&mut self, key: &str, value: f64) {
        self.set_ideal(key, value, 0.0);
        self.set_current(key, value, 0.0);
    }

    /// Last whole-step position and velocity for `key`
    pub fn ideal(&self, key: &str) -> Option<(f64, f64)> {
        let value = self.last_ideal_style.get(key)?;
        let velocity = self.last_ideal_velocity.get(key)?;
        Some((*value, *velocity))
    }

    pub fn set_ideal(&mut self, key: &str, value: f64, velocity: f64) {
        set(&mut self.last_ideal_style, key, value);
        set(&mut self.last_ideal_velocity, key, velocity);
    }

    pub fn set_current(&mut self, key: &str, value: f64, velocity: f64) {
        set(&mut self.current_style, key, value);
        set(&mut self.current_velocity, key, velocity);
    }
}

fn set(map: &mut IndexMap<String, f64>, key: &str, value: f64) {
    match map.get_mut(key) {
        Some(slot) => *slot = value,
        None => {
            map.insert(key.to_string(), value);
        }
    }
}
