//! Pull-to-refresh behavior
//!
//! Splits nested vertical overscroll between an inner list and a refresh
//! indicator, decides on release whether a refresh fires, runs the host's
//! refresh operation and animates the indicator.

pub mod nested_scroll;
pub mod refresh;

pub use nested_scroll::*;
pub use refresh::*;

pub mod prelude {
    pub use crate::nested_scroll::{GestureSample, NestedScrollConnection, NestedScrollSource};
    pub use crate::refresh::{
        FlingDecision, IndicatorFrame, IndicatorRenderer, IndicatorStyle, PullRefreshState,
        RefreshCompletion, RefreshConfig, RefreshOperation, RefreshState, SimulatedRefresh,
    };
}
