//! Spring Motion Demo
//!
//! Animates a card sliding in and fading up, sampled by a simulated display
//! whose refresh interval jitters between 8 and 33ms. Halfway through, the
//! target is replaced and the slide reverses without losing its velocity.
//!
//! Run with: cargo run -p blinc_motion --example spring_demo
//! Set RUST_LOG=blinc_motion=trace to see every tick.

use anyhow::Result;
use blinc_motion::{
    Clock, FrameOutcome, FrameQueue, ManualClock, Motion, MotionConfig, Style, TargetStyle,
};

const CONFIG: &str = r#"
frame_rate = 60.0
max_catch_up_frames = 10
"#;

const SLIDE_IN: &str = r#"{
    "x": { "value": 320, "stiffness": 180, "damping": 12 },
    "opacity": { "value": 1, "stiffness": 170, "damping": 26 },
    "z_index": 10
}"#;

const SLIDE_BACK: &str = r#"{
    "x": { "value": 0, "stiffness": 120, "damping": 14 },
    "opacity": { "value": 1, "stiffness": 170, "damping": 26 },
    "z_index": 1
}"#;

/// Refresh intervals of a display that occasionally drops frames
const INTERVALS_MS: [f64; 8] = [16.7, 16.6, 8.3, 33.4, 16.7, 16.7, 25.0, 16.6];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = MotionConfig::from_toml_str(CONFIG)?;
    let start: Style = [("x", 0.0), ("opacity", 0.0), ("z_index", 0.0)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let mut motion = Motion::new(config, TargetStyle::from_json(SLIDE_IN)?, Some(start))?;
    motion.on_style(|style| {
        tracing::info!(
            x = style["x"],
            opacity = style["opacity"],
            z_index = style["z_index"],
            "frame"
        );
    });
    motion.mount(&clock, &mut frames);

    let mut delivered = 0usize;
    while let Some(handle) = frames.next_frame() {
        clock.advance(INTERVALS_MS[delivered % INTERVALS_MS.len()]);
        if delivered == 12 {
            tracing::info!("reversing");
            motion.try_set_target(TargetStyle::from_json(SLIDE_BACK)?, &clock, &mut frames)?;
        }

        if motion.on_frame(handle, &clock, &mut frames) == FrameOutcome::Stopped {
            break;
        }
        delivered += 1;
    }

    tracing::info!(frames = delivered, elapsed_ms = clock.now(), "motion settled");
    Ok(())
}
