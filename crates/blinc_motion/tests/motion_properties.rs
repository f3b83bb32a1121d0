//! End-to-end behaviour of motions driven by a manual clock

use blinc_motion::{
    drive, FrameOutcome, FrameQueue, ManualClock, Motion, MotionConfig, SpringConfig, Style,
    Target, TargetStyle,
};
use std::cell::RefCell;
use std::rc::Rc;

const FRAME: f64 = 1000.0 / 60.0;

fn style(entries: &[(&str, f64)]) -> Style {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Mount a motion and feed it one frame per delta, returning every published style
fn record(target: TargetStyle, start: Style, deltas: &[f64]) -> Vec<Style> {
    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let mut motion = Motion::new(MotionConfig::default(), target, Some(start)).unwrap();

    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = published.clone();
    motion.on_style(move |style| sink.borrow_mut().push(style.clone()));
    motion.mount(&clock, &mut frames);

    let ticker = clock.clone();
    drive(&mut motion, &clock, &mut frames, deltas.len(), |i| {
        ticker.advance(deltas[i])
    });

    let styles = published.borrow().clone();
    styles
}

#[test]
fn test_identical_inputs_give_identical_output() {
    let target = TargetStyle::new()
        .with("x", Target::spring(250.0, SpringConfig::wobbly()))
        .with("y", Target::spring(-40.0, SpringConfig::gentle()))
        .with("opacity", 1.0);
    let start = style(&[("x", 0.0), ("y", 10.0), ("opacity", 0.0)]);
    let deltas: Vec<f64> = (0..120)
        .map(|i| [16.0, 17.3, 33.4, 8.2, 0.0, 50.1][i % 6])
        .collect();

    let first = record(target.clone(), start.clone(), &deltas);
    let second = record(target, start, &deltas);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_no_wobble_spring_reaches_target_and_stops() {
    let spring = SpringConfig::new(170.0, 26.0);
    let target = TargetStyle::new().with("x", Target::spring(100.0, spring));
    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let mut motion = Motion::new(MotionConfig::default(), target, Some(style(&[("x", 0.0)])))
        .unwrap();
    motion.mount(&clock, &mut frames);

    let mut values = Vec::new();
    let mut stopped_after = None;
    for tick in 0..200 {
        clock.advance(16.67);
        let handle = match frames.next_frame() {
            Some(handle) => handle,
            None => break,
        };
        match motion.on_frame(handle, &clock, &mut frames) {
            FrameOutcome::Stopped => {
                stopped_after = Some(tick);
                break;
            }
            FrameOutcome::Advanced { .. } => values.push(motion.current_style()["x"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    let stopped_after = stopped_after.expect("motion never came to rest");
    assert!(stopped_after <= 120, "took {stopped_after} ticks");
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(values.iter().all(|x| *x <= 100.0));
    assert_eq!(motion.current_style()["x"], 100.0);
    assert_eq!(motion.current_velocity()["x"], 0.0);
    assert_eq!(motion.accumulated_time(), 0.0);
    assert!(frames.is_empty());
}

#[test]
fn test_backlog_clamp_after_suspend() {
    let target = TargetStyle::new().with("x", Target::spring(100.0, SpringConfig::stiff()));
    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let mut motion = Motion::new(MotionConfig::default(), target, Some(style(&[("x", 0.0)])))
        .unwrap();
    motion.mount(&clock, &mut frames);

    clock.advance(FRAME);
    let handle = frames.next_frame().unwrap();
    motion.on_frame(handle, &clock, &mut frames);
    let before = motion.last_ideal_style().clone();

    // Host suspended for 20 frames
    clock.advance(20.0 * FRAME);
    let handle = frames.next_frame().unwrap();
    assert_eq!(motion.on_frame(handle, &clock, &mut frames), FrameOutcome::Deferred);
    assert_eq!(motion.accumulated_time(), 0.0);
    assert_eq!(motion.last_ideal_style(), &before);
    assert!(motion.is_animating());
}

#[test]
fn test_literal_replaced_before_first_tick() {
    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let target = TargetStyle::new().with("a", 0.0);
    let mut motion = Motion::new(MotionConfig::default(), target, None).unwrap();
    motion.mount(&clock, &mut frames);

    motion.set_target(TargetStyle::new().with("a", 400.0), &clock, &mut frames);
    assert_eq!(frames.pending(), 1);

    clock.advance(FRAME);
    let handle = frames.next_frame().unwrap();
    assert!(matches!(
        motion.on_frame(handle, &clock, &mut frames),
        FrameOutcome::Advanced { .. }
    ));
    assert_eq!(motion.current_style()["a"], 400.0);
    assert_eq!(motion.current_velocity()["a"], 0.0);
}

#[test]
fn test_retarget_mid_flight_keeps_velocity() {
    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let target = TargetStyle::new().with("x", Target::spring(100.0, SpringConfig::wobbly()));
    let mut motion = Motion::new(MotionConfig::default(), target, Some(style(&[("x", 0.0)])))
        .unwrap();
    motion.mount(&clock, &mut frames);

    let ticker = clock.clone();
    drive(&mut motion, &clock, &mut frames, 10, |_| ticker.advance(FRAME));
    let velocity = motion.last_ideal_velocity()["x"];
    assert!(velocity > 0.0);

    let back = TargetStyle::new().with("x", Target::spring(0.0, SpringConfig::wobbly()));
    motion.set_target(back, &clock, &mut frames);
    assert_eq!(motion.last_ideal_velocity()["x"], velocity);

    let ticker = clock.clone();
    drive(&mut motion, &clock, &mut frames, 1000, |_| ticker.advance(FRAME));
    assert!(!motion.is_animating());
    assert_eq!(motion.current_style()["x"], 0.0);
}

#[test]
fn test_higher_frame_rate_config() {
    let config = MotionConfig::from_toml_str("frame_rate = 120.0").unwrap();
    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let target =
        TargetStyle::from_json(r#"{ "x": { "value": 10, "stiffness": 210, "damping": 20 } }"#)
            .unwrap();
    let mut motion = Motion::new(config, target, Some(style(&[("x", 0.0)]))).unwrap();
    motion.mount(&clock, &mut frames);

    // One 60Hz frame covers two 120Hz steps
    clock.advance(1000.0 / 60.0 + 0.001);
    let handle = frames.next_frame().unwrap();
    assert!(matches!(
        motion.on_frame(handle, &clock, &mut frames),
        FrameOutcome::Advanced { frames: 2, .. }
    ));
}

#[test]
fn test_unmount_mid_flight() {
    let clock = ManualClock::new(0.0);
    let mut frames = FrameQueue::new();
    let target = TargetStyle::new().with("x", Target::spring(100.0, SpringConfig::gentle()));
    let mut motion = Motion::new(MotionConfig::default(), target, Some(style(&[("x", 0.0)])))
        .unwrap();
    motion.mount(&clock, &mut frames);

    let ticker = clock.clone();
    drive(&mut motion, &clock, &mut frames, 5, |_| ticker.advance(FRAME));
    let frozen = motion.current_style()["x"];

    motion.unmount(&mut frames);
    let ticker = clock.clone();
    assert_eq!(
        drive(&mut motion, &clock, &mut frames, 100, |_| ticker.advance(FRAME)),
        0
    );
    assert_eq!(motion.current_style()["x"], frozen);
}
