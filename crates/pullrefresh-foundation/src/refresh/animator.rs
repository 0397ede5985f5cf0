//! Indicator position and rotation.
//!
//! The position tweens toward the drag target while idle and toward the
//! loading offset while refreshing. Rotation spins continuously while
//! refreshing and otherwise follows the position: two full turns at a full
//! pull.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use pullrefresh_animation::{Animatable, AnimationSpec, InfiniteAnimation};
use pullrefresh_core::{MutableState, RuntimeHandle, State, SubscriptionId};

use super::config::ValidatedConfig;
use super::state_machine::RefreshState;

/// Degrees of rotation at a pull of exactly one threshold.
pub const FULL_PULL_ROTATION_DEG: f32 = 720.0;

/// Idle rotation for an indicator at `position_y`.
pub fn idle_rotation(position_y: f32, threshold: f32) -> f32 {
    (position_y / threshold).abs() * FULL_PULL_ROTATION_DEG
}

pub struct IndicatorAnimator {
    shared: Rc<AnimatorShared>,
    state_subscription: SubscriptionId,
    drag_subscription: SubscriptionId,
}

struct AnimatorShared {
    threshold: f32,
    initial_offset: f32,
    loading_offset: f32,
    position_spec: AnimationSpec,
    refresh_state: State<RefreshState>,
    drag_target: MutableState<f32>,
    position: Animatable<f32>,
    rotation: InfiniteAnimation<f32>,
    /// Set on Refreshing -> Idle, cleared once the indicator is back at the
    /// initial offset.
    returning: Cell<bool>,
    /// Set once the position reaches the loading offset during a refresh.
    /// A drag target written after that point is stale on completion.
    loading_settled: Cell<bool>,
}

impl IndicatorAnimator {
    pub fn new(
        config: &ValidatedConfig,
        refresh_state: State<RefreshState>,
        drag_target: MutableState<f32>,
        runtime: RuntimeHandle,
    ) -> Self {
        let initial_offset = config.initial_offset();
        let shared = Rc::new(AnimatorShared {
            threshold: config.threshold(),
            initial_offset,
            loading_offset: config.loading_offset(),
            position_spec: config.position_spec(),
            refresh_state: refresh_state.clone(),
            drag_target: drag_target.clone(),
            position: Animatable::new(initial_offset, runtime.clone()),
            rotation: InfiniteAnimation::new(0.0, 360.0, config.rotation_spec(), runtime),
            returning: Cell::new(false),
            loading_settled: Cell::new(false),
        });

        let weak = Rc::downgrade(&shared);
        let state_subscription = refresh_state.subscribe(move |state| {
            if let Some(shared) = weak.upgrade() {
                shared.on_refresh_state(*state);
            }
        });

        let weak = Rc::downgrade(&shared);
        let drag_subscription = drag_target.as_state().subscribe(move |target| {
            if let Some(shared) = weak.upgrade() {
                shared.on_drag_target(*target);
            }
        });

        let weak: Weak<AnimatorShared> = Rc::downgrade(&shared);
        shared.position.set_finished_listener(move |value| {
            if let Some(shared) = weak.upgrade() {
                shared.on_position_settled(*value);
            }
        });

        let initial_target = drag_target.get();
        if refresh_state.get().is_refreshing() {
            shared.on_refresh_state(RefreshState::Refreshing);
        } else if initial_target != initial_offset {
            shared.on_drag_target(initial_target);
        }

        Self {
            shared,
            state_subscription,
            drag_subscription,
        }
    }

    pub fn position_y(&self) -> f32 {
        self.shared.position.value()
    }

    pub fn rotation_deg(&self) -> f32 {
        let shared = &self.shared;
        if shared.refresh_state.get().is_refreshing() {
            shared.rotation.value()
        } else {
            idle_rotation(shared.position.value(), shared.threshold)
        }
    }

    /// Value the position is currently approaching.
    pub fn target(&self) -> f32 {
        self.shared.position.target()
    }

    pub fn is_animating(&self) -> bool {
        self.shared.position.is_running() || self.shared.rotation.is_running()
    }

    /// True while the position tween has frames left.
    pub fn is_moving(&self) -> bool {
        self.shared.position.is_running()
    }

    pub fn is_spinning(&self) -> bool {
        self.shared.rotation.is_running()
    }

    pub fn is_returning(&self) -> bool {
        self.shared.returning.get()
    }

    pub fn position_state(&self) -> State<f32> {
        self.shared.position.state()
    }

    pub fn initial_offset(&self) -> f32 {
        self.shared.initial_offset
    }
}

impl Drop for IndicatorAnimator {
    fn drop(&mut self) {
        self.shared.refresh_state.unsubscribe(self.state_subscription);
        self.shared
            .drag_target
            .as_state()
            .unsubscribe(self.drag_subscription);
        self.shared.rotation.stop();
    }
}

impl AnimatorShared {
    fn on_refresh_state(&self, state: RefreshState) {
        match state {
            RefreshState::Refreshing => {
                self.returning.set(false);
                self.loading_settled.set(false);
                self.position
                    .animateTo(self.loading_offset, self.position_spec);
                self.rotation.start();
            }
            RefreshState::Idle => {
                self.rotation.stop();
                self.returning.set(true);
                if self.loading_settled.replace(false)
                    && self.drag_target.get() != self.initial_offset
                {
                    log::trace!("dropping drag target written during refresh");
                    self.drag_target.set(self.initial_offset);
                }
                self.position
                    .animateTo(self.drag_target.get(), self.position_spec);
            }
        }
        if !self.position.is_running() {
            // Already at the target: no run will finish, so settle now.
            self.on_position_settled(self.position.value());
        }
    }

    fn on_drag_target(&self, target: f32) {
        if self.refresh_state.get().is_refreshing() {
            log::trace!("drag target {target:.2} held while refreshing");
            return;
        }
        if target != self.initial_offset {
            self.returning.set(false);
        }
        self.position.animateTo(target, self.position_spec);
    }

    fn on_position_settled(&self, value: f32) {
        log::trace!("indicator settled at {value:.2}");
        if self.refresh_state.get().is_refreshing() {
            // The next drag starts from off-screen once this refresh ends.
            self.drag_target.set(self.initial_offset);
            self.loading_settled.set(true);
            return;
        }
        if !self.returning.get() {
            return;
        }
        if self.drag_target.get() != self.initial_offset {
            self.drag_target.set(self.initial_offset);
        } else if value == self.initial_offset {
            self.returning.set(false);
            log::debug!("indicator back at rest ({value:.2})");
        }
    }
}

#[cfg(test)]
#[path = "tests/animator_tests.rs"]
mod tests;
