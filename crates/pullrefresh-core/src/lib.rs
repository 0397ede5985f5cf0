//! Core runtime for the pull-to-refresh controller.
//!
//! Everything that mutates refresh state runs on one UI thread. This crate
//! provides that serialized context: frame callbacks, delayed timers, local
//! tasks and futures, plus a `Send` dispatcher that background work uses to
//! hand results back.

pub mod collections;
mod frame_clock;
pub mod platform;
mod runtime;
mod state;

pub use frame_clock::{Delay, FrameCallbackRegistration, FrameClock, NextFrame};
pub use platform::{Clock, MonotonicClock, RuntimeScheduler};
pub use runtime::{
    DefaultScheduler, FrameCallbackId, Runtime, RuntimeHandle, TaskHandle, TimerId, UiDispatcher,
};
pub use state::{MutableState, State, SubscriptionId};

pub mod prelude {
    pub use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
    pub use crate::runtime::{Runtime, RuntimeHandle};
    pub use crate::state::{MutableState, State};
}
