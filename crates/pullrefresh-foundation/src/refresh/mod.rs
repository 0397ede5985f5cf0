//! Threshold state machine, refresh lifecycle and indicator animation.

mod animator;
mod config;
mod controller;
mod lifecycle;
mod render;
mod state_machine;

pub use animator::{idle_rotation, IndicatorAnimator, FULL_PULL_ROTATION_DEG};
pub use config::{
    ConfigError, RefreshConfig, ValidatedConfig, DEFAULT_ICON_SIZE, DEFAULT_LOADING_OFFSET,
    DEFAULT_POSITION_DURATION_MS, DEFAULT_ROTATION_PERIOD_MS, DEFAULT_THRESHOLD,
};
pub use controller::{GestureOutcome, PullRefreshState};
pub use lifecycle::{
    AsyncRefresh, RefreshCompletion, RefreshError, RefreshLifecycle, RefreshOperation,
    RefreshResult, SendCompletion, SimulatedRefresh, ThreadedRefresh, SIMULATED_REFRESH_DELAY,
};
pub use render::{
    IndicatorFrame, IndicatorFramePx, IndicatorRenderer, IndicatorStyle, REFRESHING_BORDER_WIDTH,
};
pub use state_machine::{FlingDecision, RefreshState, ThresholdStateMachine};
