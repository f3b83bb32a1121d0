//! Scheduler configuration
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! frame_rate = 60.0
//! max_catch_up_frames = 10
//! ```

use crate::error::{MotionError, Result};
use serde::{Deserialize, Serialize};

/// Fixed-timestep settings shared by every motion
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Physics steps per second
    pub frame_rate: f64,
    /// Backlog (in whole frames) above which accumulated time is dropped
    pub max_catch_up_frames: u32,
}

impl MotionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: MotionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(MotionError::InvalidConfig(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if self.max_catch_up_frames == 0 {
            return Err(MotionError::InvalidConfig(
                "max_catch_up_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Length of one physics step in milliseconds
    pub fn frame_duration_ms(&self) -> f64 {
        1000.0 / self.frame_rate
    }

    /// Length of one physics step in seconds, as fed to the stepper
    pub fn frame_duration_secs(&self) -> f64 {
        self.frame_duration_ms() / 1000.0
    }

    /// Largest accumulated time (ms) that is still caught up rather than dropped
    pub fn max_backlog_ms(&self) -> f64 {
        self.frame_duration_ms() * f64::from(self.max_catch_up_frames)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_catch_up_frames: 10,
        }
    }
}
