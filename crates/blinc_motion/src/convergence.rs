//! Rest detection

use crate::style::{Style, TargetStyle, Velocity};

/// Whether every property of `target` is exactly at rest on its value
///
/// Relies on the stepper snapping converged springs onto their target, so an
/// exact comparison is meaningful. A property missing from `current_style` or
/// `current_velocity` is not at rest.
pub fn should_stop(
    current_style: &Style,
    target: &TargetStyle,
    current_velocity: &Velocity,
) -> bool {
    target.iter().all(|(key, target)| {
        current_style.get(key) == Some(&target.value())
            && current_velocity.get(key) == Some(&0.0)
    })
}
