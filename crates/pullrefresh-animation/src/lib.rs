//! Animation system for the refresh indicator
//!
//! Provides frame-clock driven tweens with easing curves and infinitely
//! repeating animations.

#![allow(non_snake_case)]

pub mod animation;
pub mod infinite;

pub use animation::*;
pub use infinite::{InfiniteAnimation, InfiniteRepeatableSpec, RepeatMode};

pub mod prelude {
    pub use crate::animation::{Animatable, AnimationSpec, Easing, Lerp};
    pub use crate::infinite::{InfiniteAnimation, InfiniteRepeatableSpec, RepeatMode};
}
