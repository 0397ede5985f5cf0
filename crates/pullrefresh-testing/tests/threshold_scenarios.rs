use pullrefresh_foundation::{idle_rotation, FlingDecision, RefreshConfig};
use pullrefresh_testing::{assert_near, RefreshHarness};

/// Deterministic delta sequences: `count` steps of varied, non-negative size.
fn sequences() -> Vec<Vec<f32>> {
    let mut out = Vec::new();
    for count in 0..8usize {
        for seed in 0..6u32 {
            let deltas = (0..count)
                .map(|i| ((i as u32 * 7 + seed * 13) % 23) as f32 * 2.5)
                .collect();
            out.push(deltas);
        }
    }
    out
}

#[test]
fn pulls_below_threshold_never_refresh() {
    for deltas in sequences() {
        let sum: f32 = deltas.iter().sum();
        if sum >= 150.0 {
            continue;
        }
        let harness = RefreshHarness::new();

        let decision = harness.pull(&deltas);

        assert!(
            matches!(decision, FlingDecision::BelowThreshold { .. }),
            "{deltas:?} -> {decision:?}"
        );
        harness.assert_idle();
        assert_eq!(harness.state().accumulated_distance(), 0.0);
        assert_eq!(harness.refresh_calls(), 0);
    }
}

#[test]
fn pulls_at_or_past_threshold_refresh_once() {
    for deltas in sequences() {
        let sum: f32 = deltas.iter().sum();
        if sum < 150.0 {
            continue;
        }
        let harness = RefreshHarness::new();

        let decision = harness.pull(&deltas);

        assert_eq!(decision, FlingDecision::Refresh, "{deltas:?}");
        harness.assert_refreshing();
        assert_eq!(harness.refresh_calls(), 1);
        assert_eq!(harness.pending_refreshes(), 1);
        assert_eq!(harness.state().accumulated_distance(), 0.0);
    }
}

#[test]
fn releases_while_refreshing_start_nothing() {
    let harness = RefreshHarness::new();
    harness.pull(&[200.0]);

    for deltas in sequences() {
        let decision = harness.pull(&deltas);
        assert_eq!(decision, FlingDecision::IgnoredWhileRefreshing);
    }

    assert_eq!(harness.refresh_calls(), 1);
    assert_eq!(harness.pending_refreshes(), 1);
    harness.assert_refreshing();
}

#[test]
fn four_forty_deltas_trigger_a_refresh() {
    let harness = RefreshHarness::with_config(RefreshConfig::default().with_threshold(150.0))
        .expect("valid config");

    harness.drag(&[40.0, 40.0, 40.0, 40.0]);
    assert_eq!(harness.state().accumulated_distance(), 160.0);
    harness.assert_idle();

    assert_eq!(harness.fling(0.0), FlingDecision::Refresh);
    harness.assert_refreshing();
    assert_eq!(harness.refresh_calls(), 1);
    assert_eq!(harness.state().accumulated_distance(), 0.0);
}

#[test]
fn three_forty_deltas_do_not_trigger() {
    let harness = RefreshHarness::with_config(RefreshConfig::default().with_threshold(150.0))
        .expect("valid config");

    harness.drag(&[40.0, 40.0, 40.0]);
    let decision = harness.fling(0.0);

    assert_eq!(decision, FlingDecision::BelowThreshold { distance: 120.0 });
    harness.assert_idle();
    assert_eq!(harness.refresh_calls(), 0);
    assert_eq!(harness.state().accumulated_distance(), 0.0);
}

#[test]
fn release_without_drag_is_a_plain_no_op() {
    let harness = RefreshHarness::new();

    let decision = harness.fling(1200.0);

    assert_eq!(decision, FlingDecision::BelowThreshold { distance: 0.0 });
    harness.assert_idle();
}

#[test]
fn drag_target_freezes_at_threshold() {
    let harness = RefreshHarness::new();

    harness.drag(&[40.0, 40.0, 40.0]);
    assert_eq!(harness.state().drag_target(), 40.0);
    harness.drag(&[60.0]);
    assert_eq!(harness.state().drag_target(), 40.0);
    assert_eq!(harness.state().accumulated_distance(), 180.0);
}

#[test]
fn idle_rotation_reaches_two_turns_at_threshold() {
    assert_eq!(idle_rotation(150.0, 150.0), 720.0);
    assert_eq!(idle_rotation(0.0, 150.0), 0.0);

    let mut harness = RefreshHarness::with_config(
        RefreshConfig::default()
            .with_threshold(150.0)
            .with_initial_offset(pullrefresh_ui_graphics::Dp(0.0)),
    )
    .expect("valid config");
    assert_eq!(harness.frame().rotation_deg, 0.0);

    harness.drag(&[75.0]);
    harness.settle();
    assert_near(harness.frame().rotation_deg, 360.0);
}
