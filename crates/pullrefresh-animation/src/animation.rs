//! Time-based tween animations driven by the runtime's frame clock.
//!
//! Note: This module uses camelCase for method names (animateTo, snapTo) to
//! keep API parity with the Compose animation vocabulary the indicator was
//! designed against.

#![allow(non_snake_case)]

use std::cell::RefCell;
use std::rc::Rc;

use pullrefresh_core::{FrameCallbackRegistration, MutableState, RuntimeHandle, State};

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

/// Values an [`Animatable`] can drive.
pub trait Animated: Lerp + Clone + PartialEq + 'static {}

impl<T: Lerp + Clone + PartialEq + 'static> Animated for T {}

/// Easing curves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    #[default]
    LinearEasing,
    /// Ease in using cubic curve.
    EaseIn,
    /// Ease out using cubic curve.
    EaseOut,
    /// Ease in and out using cubic curve.
    EaseInOut,
    /// Fast out, slow in (material design standard).
    FastOutSlowInEasing,
    /// Linear out, slow in (material design).
    LinearOutSlowInEasing,
    /// Fast out, linear in (material design).
    FastOutLinearEasing,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric `t` matching the x fraction, clamped
    // to [0, 1].
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        // Binary subdivision fallback.
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let delta = sample_curve(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
    /// Delay before starting animation in milliseconds.
    pub delay_millis: u64,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    /// Create a linear tween animation.
    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    /// Add a delay before the animation starts.
    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    pub(crate) fn duration_nanos(&self) -> u64 {
        self.duration_millis.saturating_mul(NANOS_PER_MILLI).max(1)
    }

    pub(crate) fn delay_nanos(&self) -> u64 {
        self.delay_millis.saturating_mul(NANOS_PER_MILLI)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

type FinishedListener<T> = Rc<dyn Fn(&T) + 'static>;

/// Value holder that tweens toward a target on every frame.
///
/// The animatable keeps at most one frame callback registered and stops
/// requesting frames once the current value reaches the target.
pub struct Animatable<T: Animated> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: Animated> {
    state: MutableState<T>,
    runtime: RuntimeHandle,
    current: T,
    start: T,
    target: T,
    spec: AnimationSpec,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    finished_listener: Option<FinishedListener<T>>,
}

enum FrameOutcome<T> {
    Delayed,
    Running(T),
    Finished(T),
}

impl<T: Animated> Animatable<T> {
    /// Create a new animatable resting at `initial`.
    pub fn new(initial: T, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            state: MutableState::new(initial.clone()),
            runtime,
            current: initial.clone(),
            start: initial.clone(),
            target: initial,
            spec: AnimationSpec::default(),
            start_time_nanos: None,
            registration: None,
            finished_listener: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Invoked with the final value each time a run reaches its target.
    ///
    /// The listener runs outside any internal borrow, so it may call
    /// [`Animatable::animateTo`] on this same animatable.
    pub fn set_finished_listener(&self, listener: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().finished_listener = Some(Rc::new(listener));
    }

    /// Animate from the current value to `target` using `spec`.
    ///
    /// A run already in flight is replaced; the new run starts from wherever
    /// the value currently is. Asking for the value it already rests at is a
    /// no-op.
    pub fn animateTo(&self, target: T, spec: AnimationSpec) {
        {
            let mut inner = self.inner.borrow_mut();
            let at_rest = inner.registration.is_none() && inner.current == target;
            inner.target = target;
            inner.spec = spec;
            if at_rest {
                return;
            }

            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.start = inner.current.clone();
            inner.start_time_nanos = None;
        }
        Self::schedule_frame(&self.inner);
    }

    /// Snap immediately to `target` without animating.
    pub fn snapTo(&self, target: T) {
        let state = {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.current = target.clone();
            inner.start = target.clone();
            inner.target = target.clone();
            inner.start_time_nanos = None;
            inner.state_handle()
        };
        state.set(target);
    }

    /// Return the current animation target.
    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    /// Return the value produced by the latest frame.
    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    pub fn spec(&self) -> AnimationSpec {
        self.inner.borrow().spec
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    /// Observable view of the animated value.
    pub fn state(&self) -> State<T> {
        self.inner.borrow().state.as_state()
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() {
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
            log::debug!("animatable has no live runtime; snapping to target");
            let (state, target) = {
                let mut inner = this.borrow_mut();
                inner.current = inner.target.clone();
                inner.start = inner.target.clone();
                (inner.state_handle(), inner.target.clone())
            };
            state.set(target);
        }
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64) {
        let (outcome, state, listener) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            let outcome = inner.advance(frame_time_nanos);
            (outcome, inner.state_handle(), inner.finished_listener.clone())
        };

        match outcome {
            FrameOutcome::Delayed => Self::schedule_frame(this),
            FrameOutcome::Running(value) => {
                state.set(value);
                Self::schedule_frame(this);
            }
            FrameOutcome::Finished(value) => {
                state.set(value.clone());
                if let Some(listener) = listener {
                    listener(&value);
                }
            }
        }
    }
}

impl<T: Animated> AnimatableInner<T> {
    fn advance(&mut self, frame_time_nanos: u64) -> FrameOutcome<T> {
        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
        let delay_nanos = self.spec.delay_nanos();
        if elapsed_nanos < delay_nanos {
            return FrameOutcome::Delayed;
        }

        let animation_elapsed = elapsed_nanos - delay_nanos;
        let linear_progress =
            (animation_elapsed as f64 / self.spec.duration_nanos() as f64).clamp(0.0, 1.0) as f32;

        if linear_progress >= 1.0 {
            self.current = self.target.clone();
            self.start = self.target.clone();
            self.start_time_nanos = None;
            return FrameOutcome::Finished(self.current.clone());
        }

        let progress = self.spec.easing.transform(linear_progress);
        self.current = self.start.lerp(&self.target, progress);
        FrameOutcome::Running(self.current.clone())
    }

    fn state_handle(&self) -> MutableState<T> {
        self.state.clone()
    }
}

impl<T: Animated> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
