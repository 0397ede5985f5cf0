use std::cell::RefCell;

use pullrefresh_core::{MutableState, RuntimeHandle, State};
use pullrefresh_ui_graphics::Dp;

use crate::nested_scroll::{
    GesturePhase, GestureArbiter, GestureSample, NestedScrollConnection, NestedScrollSource,
};

use super::animator::IndicatorAnimator;
use super::config::{ConfigError, RefreshConfig, ValidatedConfig};
use super::lifecycle::{RefreshLifecycle, RefreshOperation, RefreshResult};
use super::render::{IndicatorFrame, IndicatorStyle};
use super::state_machine::{FlingDecision, RefreshState, ThresholdStateMachine};

/// Result of feeding one [`GestureSample`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// A drag delta; carries the part the indicator claimed.
    Consumed(f32),
    /// A release; carries the refresh decision.
    Released(FlingDecision),
}

/// One pull-to-refresh region.
///
/// Feed it overscroll through [`on_scroll_delta`](Self::on_scroll_delta) and
/// [`on_fling_release`](Self::on_fling_release), or through its
/// [`NestedScrollConnection`] impl, and read an [`IndicatorFrame`] each frame.
pub struct PullRefreshState {
    config: ValidatedConfig,
    style: IndicatorStyle,
    arbiter: RefCell<GestureArbiter>,
    drag_target: MutableState<f32>,
    machine: ThresholdStateMachine,
    animator: IndicatorAnimator,
}

impl PullRefreshState {
    pub fn new(
        config: RefreshConfig,
        operation: impl RefreshOperation + 'static,
        runtime: RuntimeHandle,
    ) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let drag_target = MutableState::new(config.initial_offset());
        let arbiter = GestureArbiter::new(config.threshold(), drag_target.clone());
        let lifecycle = RefreshLifecycle::new(operation, runtime.clone());
        let machine = ThresholdStateMachine::new(config.threshold(), lifecycle);
        let animator =
            IndicatorAnimator::new(&config, machine.state(), drag_target.clone(), runtime);
        log::debug!(
            "pull-to-refresh ready: threshold {:.1}, rest {:.1}, loading {:.1}",
            config.threshold(),
            config.initial_offset(),
            config.loading_offset()
        );
        Ok(Self {
            style: IndicatorStyle::from_config(&config),
            config,
            arbiter: RefCell::new(arbiter),
            drag_target,
            machine,
            animator,
        })
    }

    /// Offers overscroll the inner content could not absorb. Returns the part
    /// the indicator claims.
    pub fn on_scroll_delta(&self, available_y: f32) -> f32 {
        self.arbiter.borrow_mut().on_scroll_delta(available_y)
    }

    /// Ends the current gesture and decides whether to refresh.
    pub fn on_fling_release(&self, available_velocity_y: f32) -> FlingDecision {
        let distance = self
            .arbiter
            .borrow_mut()
            .on_fling_release(available_velocity_y);
        let decision = self.machine.on_fling_result(distance);
        if matches!(decision, FlingDecision::BelowThreshold { .. })
            && self.config.retract_on_cancel()
        {
            self.drag_target.set(self.config.initial_offset());
        }
        decision
    }

    pub fn on_gesture(&self, sample: GestureSample) -> GestureOutcome {
        match sample.phase {
            GesturePhase::Drag => GestureOutcome::Consumed(self.on_scroll_delta(sample.delta_y)),
            GesturePhase::Fling => GestureOutcome::Released(self.on_fling_release(sample.delta_y)),
        }
    }

    /// Current values for a host `max_width` wide.
    pub fn frame(&self, max_width: Dp) -> IndicatorFrame {
        IndicatorFrame::new(
            max_width,
            self.animator.position_y(),
            self.animator.rotation_deg(),
            self.machine.refresh_state(),
            self.config.icon_size(),
        )
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.machine.refresh_state()
    }

    pub fn state(&self) -> State<RefreshState> {
        self.machine.state()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_state().is_refreshing()
    }

    pub fn accumulated_distance(&self) -> f32 {
        self.arbiter.borrow().accumulated_distance()
    }

    pub fn drag_target(&self) -> f32 {
        self.drag_target.get()
    }

    pub fn animator(&self) -> &IndicatorAnimator {
        &self.animator
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn style(&self) -> &IndicatorStyle {
        &self.style
    }

    /// How many refreshes were started.
    pub fn refresh_count(&self) -> u64 {
        self.machine.lifecycle().started_count()
    }

    pub fn last_refresh_result(&self) -> Option<RefreshResult> {
        self.machine.lifecycle().last_result()
    }
}

impl NestedScrollConnection for PullRefreshState {
    fn on_post_scroll(
        &self,
        _consumed_y: f32,
        available_y: f32,
        _source: NestedScrollSource,
    ) -> f32 {
        self.on_scroll_delta(available_y)
    }

    fn on_post_fling(&self, _consumed_velocity_y: f32, available_velocity_y: f32) -> f32 {
        self.on_fling_release(available_velocity_y);
        0.0
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
