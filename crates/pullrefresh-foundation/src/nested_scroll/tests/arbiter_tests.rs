use super::*;

fn arbiter(threshold: f32) -> (GestureArbiter, MutableState<f32>) {
    let target = MutableState::new(-25.0f32);
    (GestureArbiter::new(threshold, target.clone()), target)
}

#[test]
fn positive_overscroll_is_claimed_and_tracked() {
    let (mut arbiter, target) = arbiter(150.0);

    assert_eq!(arbiter.on_scroll_delta(40.0), 40.0);
    assert_eq!(arbiter.on_scroll_delta(12.5), 12.5);

    assert_eq!(arbiter.accumulated_distance(), 52.5);
    assert_eq!(target.get(), 12.5);
}

#[test]
fn non_positive_deltas_are_ignored() {
    let (mut arbiter, target) = arbiter(150.0);

    assert_eq!(arbiter.on_scroll_delta(0.0), 0.0);
    assert_eq!(arbiter.on_scroll_delta(-30.0), 0.0);
    assert_eq!(arbiter.on_scroll_delta(f32::NAN), 0.0);

    assert_eq!(arbiter.accumulated_distance(), 0.0);
    assert_eq!(target.get(), -25.0);
}

#[test]
fn drag_target_freezes_at_threshold() {
    let (mut arbiter, target) = arbiter(150.0);

    for delta in [40.0, 40.0, 40.0] {
        arbiter.on_scroll_delta(delta);
    }
    assert_eq!(target.get(), 40.0);

    // 120 + 35 crosses the threshold: accumulator grows, target stays.
    arbiter.on_scroll_delta(35.0);
    assert_eq!(target.get(), 40.0);
    arbiter.on_scroll_delta(5.0);
    assert_eq!(target.get(), 40.0);
    assert_eq!(arbiter.accumulated_distance(), 160.0);
}

#[test]
fn fling_release_returns_and_resets_distance() {
    let (mut arbiter, _) = arbiter(150.0);
    for delta in [40.0, 40.0, 40.0, 40.0] {
        arbiter.on_scroll_delta(delta);
    }

    assert_eq!(arbiter.on_fling_release(900.0), 160.0);
    assert_eq!(arbiter.accumulated_distance(), 0.0);
    assert_eq!(arbiter.on_fling_release(0.0), 0.0);
}

#[test]
fn release_without_drag_yields_zero() {
    let (mut arbiter, _) = arbiter(150.0);
    assert_eq!(arbiter.on_fling_release(-300.0), 0.0);
}
