//! Nested vertical scroll input.
//!
//! The host scroll container reports what its inner scrollable could not
//! consume. Everything here is single-axis: only vertical motion reaches the
//! refresh indicator.

mod arbiter;

pub use arbiter::{DragAccumulator, GestureArbiter};

/// Whether a sample belongs to an ongoing drag or to its release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Drag,
    Fling,
}

/// One unit of scroll input.
///
/// For [`GesturePhase::Drag`] `delta_y` is a distance; for
/// [`GesturePhase::Fling`] it is the release velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub delta_y: f32,
    pub phase: GesturePhase,
}

impl GestureSample {
    pub fn drag(delta_y: f32) -> Self {
        Self {
            delta_y,
            phase: GesturePhase::Drag,
        }
    }

    pub fn fling(velocity_y: f32) -> Self {
        Self {
            delta_y: velocity_y,
            phase: GesturePhase::Fling,
        }
    }
}

/// Where a scroll delta came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NestedScrollSource {
    /// Direct pointer or touch drag.
    Drag,
    /// Deltas produced by the inner scrollable's own fling animation.
    Fling,
}

/// Host-facing adapter for frameworks with a four-hook nested scroll model.
///
/// Each hook returns the part of the offered value that was consumed. The
/// defaults consume nothing, so implementors only override the hooks they
/// care about.
pub trait NestedScrollConnection {
    /// Offered before the inner scrollable sees a delta.
    fn on_pre_scroll(&self, _available_y: f32, _source: NestedScrollSource) -> f32 {
        0.0
    }

    /// Offered after the inner scrollable consumed `consumed_y`, with the rest
    /// in `available_y`.
    fn on_post_scroll(
        &self,
        _consumed_y: f32,
        _available_y: f32,
        _source: NestedScrollSource,
    ) -> f32 {
        0.0
    }

    /// Offered before the inner scrollable flings.
    fn on_pre_fling(&self, _available_velocity_y: f32) -> f32 {
        0.0
    }

    /// Offered after the inner scrollable finished its fling.
    fn on_post_fling(&self, _consumed_velocity_y: f32, _available_velocity_y: f32) -> f32 {
        0.0
    }
}
