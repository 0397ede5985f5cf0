//! Infinitely repeating animations.
//!
//! Unlike [`Animatable`](crate::Animatable), an infinite animation never
//! settles. It keeps a frame callback registered from `start` until `stop`,
//! and its value is a pure function of the time elapsed since `start`.

use std::cell::RefCell;
use std::rc::Rc;

use pullrefresh_core::{FrameCallbackRegistration, MutableState, RuntimeHandle, State};

use crate::animation::{Animated, AnimationSpec};

/// What happens at the end of each iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Jump back to the initial value and play forward again.
    #[default]
    Restart,
    /// Play backward to the initial value, then forward again.
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfiniteRepeatableSpec {
    pub animation: AnimationSpec,
    pub repeat_mode: RepeatMode,
}

impl InfiniteRepeatableSpec {
    pub fn new(animation: AnimationSpec, repeat_mode: RepeatMode) -> Self {
        Self {
            animation,
            repeat_mode,
        }
    }

    /// Fraction of the current iteration after easing, for `elapsed_nanos`
    /// since the animation started.
    pub fn fraction_at(&self, elapsed_nanos: u64) -> f32 {
        let delay = self.animation.delay_nanos();
        if elapsed_nanos < delay {
            return 0.0;
        }
        let duration = self.animation.duration_nanos();
        let running = elapsed_nanos - delay;
        let iteration = running / duration;
        let within = (running % duration) as f64 / duration as f64;
        let linear = match self.repeat_mode {
            RepeatMode::Restart => within,
            RepeatMode::Reverse if iteration % 2 == 1 => 1.0 - within,
            RepeatMode::Reverse => within,
        };
        self.animation.easing.transform(linear as f32)
    }
}

/// Runs `initial → target` forever while started.
pub struct InfiniteAnimation<T: Animated> {
    inner: Rc<RefCell<InfiniteInner<T>>>,
}

struct InfiniteInner<T: Animated> {
    state: MutableState<T>,
    runtime: RuntimeHandle,
    initial: T,
    target: T,
    spec: InfiniteRepeatableSpec,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    running: bool,
}

impl<T: Animated> InfiniteAnimation<T> {
    pub fn new(initial: T, target: T, spec: InfiniteRepeatableSpec, runtime: RuntimeHandle) -> Self {
        let inner = InfiniteInner {
            state: MutableState::new(initial.clone()),
            runtime,
            initial,
            target,
            spec,
            start_time_nanos: None,
            registration: None,
            running: false,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Start from the initial value. Calling `start` while running is a no-op.
    pub fn start(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.running {
                return;
            }
            inner.running = true;
            inner.start_time_nanos = None;
        }
        Self::schedule_frame(&self.inner);
    }

    /// Cancel the pending frame callback and return to the initial value.
    ///
    /// The current iteration is abandoned, not played out.
    pub fn stop(&self) {
        let (state, initial) = {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.running = false;
            inner.start_time_nanos = None;
            (inner.state.clone(), inner.initial.clone())
        };
        state.set(initial);
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// True while a frame callback is registered with the runtime.
    pub fn has_pending_frame(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    pub fn value(&self) -> T {
        self.inner.borrow().state.get()
    }

    pub fn state(&self) -> State<T> {
        self.inner.borrow().state.as_state()
    }

    fn schedule_frame(this: &Rc<RefCell<InfiniteInner<T>>>) {
        let clock = {
            let inner = this.borrow();
            if !inner.running || inner.registration.is_some() {
                return;
            }
            inner.runtime.frame_clock()
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        if registration.is_active() {
            this.borrow_mut().registration = Some(registration);
        } else {
            log::debug!("infinite animation has no live runtime; not starting");
            this.borrow_mut().running = false;
        }
    }

    fn on_frame(this: &Rc<RefCell<InfiniteInner<T>>>, frame_time_nanos: u64) {
        let (state, value) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            if !inner.running {
                return;
            }
            let start = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
            let fraction = inner
                .spec
                .fraction_at(frame_time_nanos.saturating_sub(start));
            let value = inner.initial.lerp(&inner.target, fraction);
            (inner.state.clone(), value)
        };
        state.set(value);
        Self::schedule_frame(this);
    }
}

impl<T: Animated> Clone for InfiniteAnimation<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/infinite_tests.rs"]
mod tests;
