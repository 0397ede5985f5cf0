use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use pullrefresh_core::{Runtime, RuntimeHandle};
use pullrefresh_foundation::{
    ConfigError, FlingDecision, IndicatorFrame, PullRefreshState, RefreshCompletion,
    RefreshConfig, RefreshResult, RefreshState,
};
use pullrefresh_ui_graphics::Dp;

/// Default frame interval, roughly 60 Hz.
pub const DEFAULT_FRAME_INTERVAL_NANOS: u64 = 16_666_667;

const SETTLE_FRAME_LIMIT: usize = 10_000;

type PendingCompletions = Rc<RefCell<VecDeque<RefreshCompletion>>>;

/// Headless harness for exercising a [`PullRefreshState`] in tests.
///
/// `RefreshHarness` owns its runtime and a virtual frame clock. Refresh
/// operations started by the controller are parked until the test finishes
/// them with [`complete_refresh`](Self::complete_refresh), so every step of
/// the lifecycle is observable.
pub struct RefreshHarness {
    state: PullRefreshState,
    pending: PendingCompletions,
    runtime: Runtime,
    now_nanos: u64,
    frame_interval_nanos: u64,
    max_width: Dp,
}

impl RefreshHarness {
    /// Harness with the default configuration.
    pub fn new() -> Self {
        match Self::with_config(RefreshConfig::default()) {
            Ok(harness) => harness,
            Err(err) => unreachable!("default configuration rejected: {err}"),
        }
    }

    pub fn with_config(config: RefreshConfig) -> Result<Self, ConfigError> {
        let runtime = Runtime::default();
        let pending: PendingCompletions = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&pending);
        let state = PullRefreshState::new(
            config,
            move |completion: RefreshCompletion| sink.borrow_mut().push_back(completion),
            runtime.handle(),
        )?;
        Ok(Self {
            state,
            pending,
            runtime,
            now_nanos: 0,
            frame_interval_nanos: DEFAULT_FRAME_INTERVAL_NANOS,
            max_width: Dp(400.0),
        })
    }

    pub fn with_frame_interval_millis(mut self, millis: u64) -> Self {
        self.frame_interval_nanos = millis.saturating_mul(1_000_000).max(1);
        self
    }

    pub fn with_max_width(mut self, max_width: Dp) -> Self {
        self.max_width = max_width;
        self
    }

    /// Offers each delta as overscroll. Returns the total the indicator claimed.
    pub fn drag(&self, deltas: &[f32]) -> f32 {
        deltas
            .iter()
            .map(|delta| self.state.on_scroll_delta(*delta))
            .sum()
    }

    pub fn fling(&self, velocity_y: f32) -> FlingDecision {
        let decision = self.state.on_fling_release(velocity_y);
        self.runtime.handle().drain_ui();
        decision
    }

    /// One full gesture: the deltas, then a release.
    pub fn pull(&self, deltas: &[f32]) -> FlingDecision {
        self.drag(deltas);
        self.fling(0.0)
    }

    /// Runs one frame at the current time without advancing it.
    pub fn pump(&mut self) {
        let handle = self.runtime.handle();
        handle.drain_frame_callbacks(self.now_nanos);
        handle.drain_ui();
    }

    pub fn advance_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.now_nanos += self.frame_interval_nanos;
            self.pump();
        }
    }

    /// Advances virtual time by `millis`, one frame interval at a time. The
    /// last frame lands exactly on the target time.
    pub fn advance_millis(&mut self, millis: u64) {
        let target = self.now_nanos + millis * 1_000_000;
        while self.now_nanos < target {
            self.now_nanos = (self.now_nanos + self.frame_interval_nanos).min(target);
            self.pump();
        }
    }

    /// Advances frames until the indicator position stops moving.
    ///
    /// Returns the number of frames run.
    pub fn settle(&mut self) -> usize {
        let mut frames = 0;
        while self.state.animator().is_moving() {
            assert!(
                frames < SETTLE_FRAME_LIMIT,
                "indicator still moving after {SETTLE_FRAME_LIMIT} frames"
            );
            self.advance_frames(1);
            frames += 1;
        }
        frames
    }

    /// Finishes the oldest parked refresh with `result`. Returns `false` if
    /// no refresh was waiting.
    pub fn complete_refresh(&self, result: RefreshResult) -> bool {
        let completion = self.pending.borrow_mut().pop_front();
        match completion {
            Some(completion) => {
                completion.complete(result);
                self.runtime.handle().drain_ui();
                true
            }
            None => false,
        }
    }

    pub fn pending_refreshes(&self) -> usize {
        self.pending.borrow().len()
    }

    /// How many times the refresh operation was invoked.
    pub fn refresh_calls(&self) -> u64 {
        self.state.refresh_count()
    }

    pub fn frame(&self) -> IndicatorFrame {
        self.state.frame(self.max_width)
    }

    pub fn now_millis(&self) -> u64 {
        self.now_nanos / 1_000_000
    }

    pub fn state(&self) -> &PullRefreshState {
        &self.state
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    #[track_caller]
    pub fn assert_idle(&self) {
        assert_eq!(
            self.state.refresh_state(),
            RefreshState::Idle,
            "expected Idle"
        );
    }

    #[track_caller]
    pub fn assert_refreshing(&self) {
        assert_eq!(
            self.state.refresh_state(),
            RefreshState::Refreshing,
            "expected Refreshing"
        );
    }
}

impl Default for RefreshHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Asserts `actual` is within `1e-3` of `expected`.
#[track_caller]
pub fn assert_near(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

/// Convenience helper for tests that only need temporary access to a
/// `RefreshHarness`.
pub fn run_refresh_test<R>(f: impl FnOnce(&mut RefreshHarness) -> R) -> R {
    let mut harness = RefreshHarness::new();
    f(&mut harness)
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;
