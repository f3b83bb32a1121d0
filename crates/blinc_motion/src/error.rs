//! Motion error types

use thiserror::Error;

/// Errors raised at the boundary of the motion system
///
/// Contract breaches inside the scheduler (arming a frame while one is
/// outstanding) are panics, not variants of this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A target entry that cannot drive a property
    #[error("Invalid target for `{key}`: {reason}")]
    InvalidTarget { key: String, reason: String },

    /// Scheduler configuration out of range
    #[error("Invalid motion config: {0}")]
    InvalidConfig(String),

    /// Failed to decode a target style or configuration
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        MotionError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for MotionError {
    fn from(err: toml::de::Error) -> Self {
        MotionError::Parse(err.to_string())
    }
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
