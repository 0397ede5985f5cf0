use std::cell::Cell;
use std::rc::{Rc, Weak};

use pullrefresh_core::{MutableState, State};

use super::lifecycle::RefreshLifecycle;

/// Refresh status of one region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

impl RefreshState {
    pub fn is_refreshing(self) -> bool {
        matches!(self, RefreshState::Refreshing)
    }
}

/// What a fling release resolved to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlingDecision {
    /// The threshold was met while idle; a refresh was started.
    Refresh,
    /// Not enough accumulated drag.
    BelowThreshold { distance: f32 },
    /// A refresh is already running; the release changed nothing.
    IgnoredWhileRefreshing,
}

impl FlingDecision {
    pub fn started_refresh(self) -> bool {
        matches!(self, FlingDecision::Refresh)
    }
}

/// Owns [`RefreshState`].
///
/// Enters `Refreshing` only from a fling release at or past the threshold,
/// and leaves it only when the lifecycle reports the operation finished.
#[derive(Clone)]
pub struct ThresholdStateMachine {
    inner: Rc<MachineInner>,
}

struct MachineInner {
    threshold: f32,
    state: MutableState<RefreshState>,
    lifecycle: RefreshLifecycle,
    /// Bumped on every refresh start; a completion carrying an older value
    /// is stale.
    generation: Cell<u64>,
}

impl ThresholdStateMachine {
    pub fn new(threshold: f32, lifecycle: RefreshLifecycle) -> Self {
        Self {
            inner: Rc::new(MachineInner {
                threshold,
                state: MutableState::new(RefreshState::Idle),
                lifecycle,
                generation: Cell::new(0),
            }),
        }
    }

    /// Decides on the distance accumulated by the gesture that just ended.
    pub fn on_fling_result(&self, distance: f32) -> FlingDecision {
        let inner = &self.inner;
        if inner.state.get().is_refreshing() {
            log::debug!("fling release ignored while refreshing (accumulated {distance:.2})");
            return FlingDecision::IgnoredWhileRefreshing;
        }
        if distance.is_nan() || distance < inner.threshold {
            log::debug!(
                "fling release below threshold: {distance:.2} < {:.2}",
                inner.threshold
            );
            return FlingDecision::BelowThreshold { distance };
        }

        let generation = inner.generation.get() + 1;
        inner.generation.set(generation);
        log::debug!("refresh state Idle -> Refreshing (accumulated {distance:.2})");
        inner.state.set(RefreshState::Refreshing);

        let weak: Weak<MachineInner> = Rc::downgrade(inner);
        inner.lifecycle.start(move || {
            if let Some(inner) = weak.upgrade() {
                MachineInner::finish(&inner, generation);
            }
        });
        FlingDecision::Refresh
    }

    /// Forces the current refresh, if any, back to idle.
    pub fn on_refresh_complete(&self) {
        MachineInner::finish(&self.inner, self.inner.generation.get());
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.inner.state.get()
    }

    pub fn state(&self) -> State<RefreshState> {
        self.inner.state.as_state()
    }

    pub fn threshold(&self) -> f32 {
        self.inner.threshold
    }

    pub fn lifecycle(&self) -> &RefreshLifecycle {
        &self.inner.lifecycle
    }
}

impl MachineInner {
    fn finish(&self, generation: u64) {
        if generation != self.generation.get() {
            log::trace!("stale refresh completion {generation} dropped");
            return;
        }
        if self.state.set(RefreshState::Idle) {
            log::debug!("refresh state Refreshing -> Idle");
        }
    }
}

#[cfg(test)]
#[path = "tests/state_machine_tests.rs"]
mod tests;
