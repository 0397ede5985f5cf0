use pullrefresh_core::MutableState;

/// Running sum of the positive overscroll since the last fling release.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragAccumulator {
    distance: f32,
}

impl DragAccumulator {
    pub fn distance(&self) -> f32 {
        self.distance
    }

    fn add(&mut self, delta: f32) -> f32 {
        self.distance += delta;
        self.distance
    }

    fn take(&mut self) -> f32 {
        std::mem::take(&mut self.distance)
    }
}

/// Splits vertical overscroll between the inner list and the indicator.
///
/// Only positive deltas the inner scrollable could not absorb belong to the
/// indicator. Below the threshold each such delta becomes the indicator's
/// drag target; at or past it the target freezes while the accumulator keeps
/// counting.
pub struct GestureArbiter {
    threshold: f32,
    accumulator: DragAccumulator,
    drag_target: MutableState<f32>,
}

impl GestureArbiter {
    pub fn new(threshold: f32, drag_target: MutableState<f32>) -> Self {
        Self {
            threshold,
            accumulator: DragAccumulator::default(),
            drag_target,
        }
    }

    /// Returns the part of `available_y` the indicator claims.
    pub fn on_scroll_delta(&mut self, available_y: f32) -> f32 {
        if available_y.is_nan() || available_y <= 0.0 {
            return 0.0;
        }

        let distance = self.accumulator.add(available_y);
        if distance < self.threshold {
            self.drag_target.set(available_y);
        }
        log::trace!(
            "overscroll {available_y:.2} claimed, accumulated {distance:.2} / {:.2}",
            self.threshold
        );
        available_y
    }

    /// Ends the gesture: returns the accumulated distance and resets it.
    pub fn on_fling_release(&mut self, available_velocity_y: f32) -> f32 {
        let distance = self.accumulator.take();
        log::trace!("fling release at {available_velocity_y:.2}, accumulated {distance:.2}");
        distance
    }

    pub fn accumulated_distance(&self) -> f32 {
        self.accumulator.distance()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

#[cfg(test)]
#[path = "tests/arbiter_tests.rs"]
mod tests;
