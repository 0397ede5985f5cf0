use super::*;

#[test]
fn fresh_harness_is_idle_at_rest() {
    let harness = RefreshHarness::new();
    harness.assert_idle();
    assert_eq!(harness.frame().position_y, Dp(-25.0));
    assert_eq!(harness.pending_refreshes(), 0);
    assert_eq!(harness.now_millis(), 0);
}

#[test]
fn advance_millis_lands_on_target_time() {
    let mut harness = RefreshHarness::new().with_frame_interval_millis(16);
    harness.advance_millis(250);
    assert_eq!(harness.now_millis(), 250);
}

#[test]
fn complete_without_pending_refresh_reports_false() {
    let harness = RefreshHarness::new();
    assert!(!harness.complete_refresh(Ok(())));
}

#[test]
fn settle_runs_position_to_rest() {
    run_refresh_test(|harness| {
        harness.drag(&[30.0]);
        let frames = harness.settle();
        assert!(frames > 0);
        assert_near(harness.frame().position_y.value(), 30.0);
        assert_eq!(harness.settle(), 0);
    });
}

#[test]
fn invalid_config_is_reported() {
    let result = RefreshHarness::with_config(RefreshConfig::default().with_rotation_period_ms(0));
    assert_eq!(result.err(), Some(ConfigError::ZeroRotationPeriod));
}
