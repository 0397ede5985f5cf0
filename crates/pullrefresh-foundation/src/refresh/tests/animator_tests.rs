use super::*;

use pullrefresh_core::Runtime;

use crate::refresh::config::RefreshConfig;

struct Fixture {
    runtime: Runtime,
    refresh: MutableState<RefreshState>,
    drag: MutableState<f32>,
    animator: IndicatorAnimator,
}

fn fixture() -> Fixture {
    let runtime = Runtime::default();
    let config = RefreshConfig::default().validate().expect("default config");
    let refresh = MutableState::new(RefreshState::Idle);
    let drag = MutableState::new(config.initial_offset());
    let animator = IndicatorAnimator::new(
        &config,
        refresh.as_state(),
        drag.clone(),
        runtime.handle(),
    );
    Fixture {
        runtime,
        refresh,
        drag,
        animator,
    }
}

impl Fixture {
    fn frame(&self, millis: u64) {
        self.runtime.handle().drain_frame_callbacks(millis * 1_000_000);
    }

    fn frames(&self, from_ms: u64, to_ms: u64) {
        let mut t = from_ms;
        while t <= to_ms {
            self.frame(t);
            t += 10;
        }
    }
}

fn assert_near(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn idle_rotation_boundaries() {
    assert_eq!(idle_rotation(150.0, 150.0), 720.0);
    assert_eq!(idle_rotation(0.0, 150.0), 0.0);
    assert_eq!(idle_rotation(-75.0, 150.0), 360.0);
}

#[test]
fn rests_at_initial_offset() {
    let f = fixture();
    assert_eq!(f.animator.position_y(), -25.0);
    assert_eq!(f.animator.target(), -25.0);
    assert!(!f.animator.is_animating());
    assert!(!f.runtime.handle().has_frame_callbacks());
}

#[test]
fn tweens_linearly_toward_drag_target() {
    let f = fixture();
    f.drag.set(40.0);
    assert!(f.animator.is_animating());

    f.frame(0);
    assert_near(f.animator.position_y(), -25.0);
    f.frame(125);
    assert_near(f.animator.position_y(), 7.5);
    f.frame(250);
    assert_near(f.animator.position_y(), 40.0);
    assert!(!f.animator.is_animating());
}

#[test]
fn retargeting_mid_run_continues_from_current_value() {
    let f = fixture();
    f.drag.set(40.0);
    f.frame(0);
    f.frame(125);

    f.drag.set(60.0);
    f.frame(200);
    assert_near(f.animator.position_y(), 7.5);
    f.frame(450);
    assert_near(f.animator.position_y(), 60.0);
}

#[test]
fn refreshing_moves_to_loading_offset_and_spins() {
    let f = fixture();
    f.refresh.set(RefreshState::Refreshing);
    assert!(f.animator.is_spinning());

    f.frame(0);
    assert_near(f.animator.rotation_deg(), 0.0);
    f.frame(250);
    assert_near(f.animator.position_y(), 15.0);
    f.frame(500);
    assert_near(f.animator.rotation_deg(), 180.0);
    f.frame(1250);
    assert_near(f.animator.rotation_deg(), 90.0);
    assert!(f.animator.is_spinning());
}

#[test]
fn settling_while_refreshing_resets_drag_target() {
    let f = fixture();
    f.drag.set(40.0);
    f.frames(0, 250);

    f.refresh.set(RefreshState::Refreshing);
    f.frames(300, 550);

    assert_near(f.animator.position_y(), 15.0);
    assert_eq!(f.drag.get(), -25.0);
}

#[test]
fn drag_target_is_held_while_refreshing() {
    let f = fixture();
    f.refresh.set(RefreshState::Refreshing);
    f.frame(0);

    f.drag.set(80.0);
    assert_eq!(f.animator.target(), 15.0);
}

#[test]
fn idle_cancels_spin_and_returns_to_rest() {
    let f = fixture();
    f.refresh.set(RefreshState::Refreshing);
    f.frames(0, 600);

    f.refresh.set(RefreshState::Idle);
    assert!(!f.animator.is_spinning());
    assert!(f.animator.is_returning());
    assert_eq!(f.animator.target(), -25.0);

    f.frames(610, 900);
    assert_near(f.animator.position_y(), -25.0);
    assert!(!f.animator.is_returning());
    assert!(!f.animator.is_animating());
    assert!(!f.runtime.handle().has_frame_callbacks());
}

#[test]
fn drag_during_refresh_does_not_detour_on_completion() {
    let f = fixture();
    f.drag.set(40.0);
    f.frames(0, 250);
    f.refresh.set(RefreshState::Refreshing);
    f.frames(300, 600);
    assert_eq!(f.drag.get(), -25.0);

    f.drag.set(80.0);
    f.frames(610, 700);
    f.refresh.set(RefreshState::Idle);

    assert_eq!(f.drag.get(), -25.0);
    assert_eq!(f.animator.target(), -25.0);
    let mut highest = f.animator.position_y();
    let mut t = 710;
    while t <= 1000 {
        f.frame(t);
        highest = highest.max(f.animator.position_y());
        t += 10;
    }
    assert_near(highest, 15.0);
    assert_near(f.animator.position_y(), -25.0);
    assert!(!f.animator.is_returning());
}

#[test]
fn early_completion_still_ends_at_rest() {
    let f = fixture();
    f.drag.set(40.0);
    f.frames(0, 250);

    f.refresh.set(RefreshState::Refreshing);
    f.frame(300);
    f.frame(400);
    f.refresh.set(RefreshState::Idle);
    assert_eq!(f.drag.get(), 40.0);

    f.frames(410, 1200);
    assert_near(f.animator.position_y(), -25.0);
    assert_eq!(f.drag.get(), -25.0);
    assert!(!f.animator.is_returning());
}

#[test]
fn idle_rotation_follows_position() {
    let f = fixture();
    f.drag.set(150.0);
    f.frames(0, 250);

    assert_near(f.animator.rotation_deg(), 720.0);
}

#[test]
fn dropping_animator_releases_frame_callbacks() {
    let f = fixture();
    f.refresh.set(RefreshState::Refreshing);
    assert!(f.runtime.handle().has_frame_callbacks());

    let Fixture {
        runtime,
        refresh,
        animator,
        ..
    } = f;
    drop(animator);

    assert!(!runtime.handle().has_frame_callbacks());
    refresh.set(RefreshState::Idle);
    assert!(!runtime.handle().has_frame_callbacks());
}
