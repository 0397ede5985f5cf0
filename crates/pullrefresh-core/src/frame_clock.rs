use crate::runtime::{FrameCallbackId, RuntimeHandle, TimerId};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let mut callback_opt = Some(callback);
        let runtime = self.runtime.clone();
        match runtime.register_frame_callback(move |time| {
            if let Some(callback) = callback_opt.take() {
                callback(time);
            }
        }) {
            Some(id) => FrameCallbackRegistration::new(runtime, id),
            None => FrameCallbackRegistration::inactive(runtime),
        }
    }

    pub fn next_frame(&self) -> NextFrame {
        NextFrame::new(self.clone())
    }

    /// Future that resolves once `duration` of frame time has passed.
    pub fn delay(&self, duration: Duration) -> Delay {
        Delay::new(self.runtime.clone(), duration)
    }
}

/// Pending frame callback. Dropping it cancels the callback.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(runtime: RuntimeHandle, id: FrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

struct NextFrameState {
    registration: Option<FrameCallbackRegistration>,
    time: Option<u64>,
    waker: Option<Waker>,
}

impl NextFrameState {
    fn new() -> Self {
        Self {
            registration: None,
            time: None,
            waker: None,
        }
    }
}

pub struct NextFrame {
    clock: FrameClock,
    state: Rc<RefCell<NextFrameState>>,
}

impl NextFrame {
    fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            state: Rc::new(RefCell::new(NextFrameState::new())),
        }
    }
}

impl Future for NextFrame {
    type Output = u64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(time) = self.state.borrow().time {
            return Poll::Ready(time);
        }

        let needs_registration = {
            let mut state = self.state.borrow_mut();
            state.waker = Some(cx.waker().clone());
            state.registration.is_none()
        };
        if needs_registration {
            let weak = Rc::downgrade(&self.state);
            let registration = self.clock.with_frame_nanos(move |time| {
                if let Some(state) = weak.upgrade() {
                    let mut state = state.borrow_mut();
                    state.time = Some(time);
                    state.registration.take();
                    if let Some(waker) = state.waker.take() {
                        waker.wake();
                    }
                }
            });
            self.state.borrow_mut().registration = Some(registration);
        }

        match self.state.borrow().time {
            Some(time) => Poll::Ready(time),
            None => Poll::Pending,
        }
    }
}

impl Drop for NextFrame {
    fn drop(&mut self) {
        if let Some(registration) = self.state.borrow_mut().registration.take() {
            drop(registration);
        }
    }
}

struct DelayState {
    timer: Option<TimerId>,
    fired: bool,
    waker: Option<Waker>,
}

/// Frame-time driven sleep, polled on the UI context.
pub struct Delay {
    runtime: RuntimeHandle,
    duration: Duration,
    state: Rc<RefCell<DelayState>>,
}

impl Delay {
    fn new(runtime: RuntimeHandle, duration: Duration) -> Self {
        Self {
            runtime,
            duration,
            state: Rc::new(RefCell::new(DelayState {
                timer: None,
                fired: false,
                waker: None,
            })),
        }
    }
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let needs_timer = {
            let mut state = self.state.borrow_mut();
            if state.fired {
                return Poll::Ready(());
            }
            state.waker = Some(cx.waker().clone());
            state.timer.is_none()
        };
        if needs_timer {
            let weak = Rc::downgrade(&self.state);
            let timer = self.runtime.post_delayed(self.duration, move || {
                if let Some(state) = weak.upgrade() {
                    let mut state = state.borrow_mut();
                    state.fired = true;
                    state.timer = None;
                    if let Some(waker) = state.waker.take() {
                        waker.wake();
                    }
                }
            });
            match timer {
                Some(id) => self.state.borrow_mut().timer = Some(id),
                // Runtime gone: nothing will ever tick, resolve now.
                None => return Poll::Ready(()),
            }
        }
        Poll::Pending
    }
}

impl Drop for Delay {
    fn drop(&mut self) {
        if let Some(id) = self.state.borrow_mut().timer.take() {
            self.runtime.cancel_timer(id);
        }
    }
}
