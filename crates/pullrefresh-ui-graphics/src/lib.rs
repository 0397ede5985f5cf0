//! Pure math/data for the refresh indicator
//!
//! Units, colors and the cosmetic icon descriptors a renderer needs to paint
//! the indicator. Nothing here affects refresh behavior.

mod color;
mod icon;
mod unit;

pub use color::*;
pub use icon::*;
pub use unit::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::icon::{IconImage, IconShape};
    pub use crate::unit::{Dp, Px};
}
