use super::*;

use pullrefresh_core::Runtime;
use std::cell::RefCell;
use std::rc::Rc;

const FRAME: u64 = 16_666_667;

fn pump(runtime: &Runtime, frames: usize, time: &mut u64) {
    let handle = runtime.handle();
    for _ in 0..frames {
        if !runtime.needs_frame() {
            break;
        }
        *time += FRAME;
        handle.drain_frame_callbacks(*time);
    }
}

#[test]
fn animate_to_interpolates_over_time() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let state = animatable.state();

    animatable.animateTo(1.0, AnimationSpec::linear(250));
    assert!(animatable.is_running());
    assert_eq!(state.get(), 0.0);

    let mut samples = Vec::new();
    let mut time = 0;
    let handle = runtime.handle();
    for _ in 0..32 {
        if !runtime.needs_frame() {
            break;
        }
        time += FRAME;
        handle.drain_frame_callbacks(time);
        samples.push(state.get());
    }

    assert!(samples.iter().any(|value| *value > 0.0 && *value < 1.0));
    assert!(samples.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(*samples.last().expect("frames ran"), 1.0);
    assert!(!animatable.is_running());
    assert!(!runtime.needs_frame());
}

#[test]
fn run_reaches_target_within_duration() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(-25.0f32, runtime.handle());
    animatable.animateTo(15.0, AnimationSpec::linear(250));

    let handle = runtime.handle();
    // First frame anchors the run at t=0.
    handle.drain_frame_callbacks(1_000_000_000);
    handle.drain_frame_callbacks(1_125_000_000);
    assert!((animatable.value() - (-5.0)).abs() < 1e-3);
    handle.drain_frame_callbacks(1_250_000_000);
    assert_eq!(animatable.value(), 15.0);
    assert!(!animatable.is_running());
}

#[test]
fn finished_listener_fires_once_per_run() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let finished = Rc::new(RefCell::new(Vec::new()));
    {
        let finished = Rc::clone(&finished);
        animatable.set_finished_listener(move |value| finished.borrow_mut().push(*value));
    }

    let mut time = 0;
    animatable.animateTo(10.0, AnimationSpec::linear(100));
    pump(&runtime, 32, &mut time);
    animatable.animateTo(-5.0, AnimationSpec::linear(100));
    pump(&runtime, 32, &mut time);

    assert_eq!(finished.borrow().as_slice(), &[10.0, -5.0]);
}

#[test]
fn retargeting_restarts_from_current_value() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let handle = runtime.handle();

    animatable.animateTo(100.0, AnimationSpec::linear(100));
    handle.drain_frame_callbacks(0);
    handle.drain_frame_callbacks(50_000_000);
    let midway = animatable.value();
    assert!((midway - 50.0).abs() < 1e-3);

    animatable.animateTo(0.0, AnimationSpec::linear(100));
    handle.drain_frame_callbacks(60_000_000);
    assert!((animatable.value() - midway).abs() < 1e-3);
    handle.drain_frame_callbacks(110_000_000);
    assert!((animatable.value() - 25.0).abs() < 1e-3);
    handle.drain_frame_callbacks(160_000_000);
    assert_eq!(animatable.value(), 0.0);
}

#[test]
fn animate_to_current_value_is_noop() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(3.0f32, runtime.handle());
    let finished = Rc::new(RefCell::new(0));
    {
        let finished = Rc::clone(&finished);
        animatable.set_finished_listener(move |_| *finished.borrow_mut() += 1);
    }

    animatable.animateTo(3.0, AnimationSpec::linear(100));

    assert!(!animatable.is_running());
    assert!(!runtime.needs_frame());
    assert_eq!(*finished.borrow(), 0);
}

#[test]
fn listener_may_start_a_new_run() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    {
        let chained = animatable.clone();
        animatable.set_finished_listener(move |value| {
            if *value == 10.0 {
                chained.animateTo(20.0, AnimationSpec::linear(50));
            }
        });
    }

    let mut time = 0;
    animatable.animateTo(10.0, AnimationSpec::linear(50));
    pump(&runtime, 64, &mut time);

    assert_eq!(animatable.value(), 20.0);
    assert!(!animatable.is_running());
}

#[test]
fn snap_to_cancels_run() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    animatable.animateTo(10.0, AnimationSpec::linear(100));

    animatable.snapTo(-25.0);

    assert!(!animatable.is_running());
    assert_eq!(animatable.value(), -25.0);
    assert_eq!(animatable.state().get(), -25.0);
    assert!(!runtime.handle().has_frame_callbacks());
}

#[test]
fn delay_holds_start_value() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let handle = runtime.handle();
    animatable.animateTo(1.0, AnimationSpec::linear(100).with_delay(50));

    handle.drain_frame_callbacks(0);
    handle.drain_frame_callbacks(40_000_000);
    assert_eq!(animatable.value(), 0.0);
    handle.drain_frame_callbacks(100_000_000);
    assert!((animatable.value() - 0.5).abs() < 1e-3);
}

#[test]
fn huge_durations_saturate_instead_of_overflowing() {
    let spec = AnimationSpec::linear(u64::MAX / 2).with_delay(u64::MAX / 2);
    assert_eq!(spec.duration_nanos(), u64::MAX);
    assert_eq!(spec.delay_nanos(), u64::MAX);

    let runtime = Runtime::default();
    let animatable = Animatable::new(-25.0f32, runtime.handle());
    animatable.animateTo(40.0, AnimationSpec::linear(u64::MAX / 2));
    let mut time = 0;
    pump(&runtime, 4, &mut time);

    assert!(animatable.is_running());
    assert!(animatable.value() >= -25.0 && animatable.value() < -24.9);
}

#[test]
fn easing_linear_is_identity() {
    assert_eq!(Easing::LinearEasing.transform(0.0), 0.0);
    assert_eq!(Easing::LinearEasing.transform(0.5), 0.5);
    assert_eq!(Easing::LinearEasing.transform(1.0), 1.0);
}

#[test]
fn easing_bounds_are_correct() {
    let easings = [
        Easing::LinearEasing,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowInEasing,
        Easing::LinearOutSlowInEasing,
        Easing::FastOutLinearEasing,
    ];

    for easing in easings {
        let start = easing.transform(0.0);
        let end = easing.transform(1.0);
        assert!((start - 0.0).abs() < 0.01, "Start should be ~0 for {:?}", easing);
        assert!((end - 1.0).abs() < 0.01, "End should be ~1 for {:?}", easing);
    }
}

#[test]
fn easing_curves_are_monotonic() {
    for easing in [Easing::EaseInOut, Easing::FastOutSlowInEasing] {
        let mut previous = 0.0;
        for step in 1..=20 {
            let value = easing.transform(step as f32 / 20.0);
            assert!(value + 1e-4 >= previous, "{:?} decreased at step {}", easing, step);
            previous = value;
        }
    }
}

#[test]
fn animation_spec_default_has_reasonable_values() {
    let spec = AnimationSpec::default();
    assert_eq!(spec.duration_millis, 300);
    assert_eq!(spec.easing, Easing::FastOutSlowInEasing);
    assert_eq!(spec.delay_millis, 0);
}
