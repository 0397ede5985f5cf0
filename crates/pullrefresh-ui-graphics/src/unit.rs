//! Unit types: Dp, Px, and conversions

use std::ops::{Add, Div, Neg, Sub};

/// Density-independent pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Dp(pub f32);

impl Dp {
    pub const ZERO: Dp = Dp(0.0);

    pub fn to_px(&self, density: f32) -> Px {
        Px(self.0 * density)
    }

    pub fn from_px(px: Px, density: f32) -> Self {
        Self(px.0 / density)
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Add for Dp {
    type Output = Dp;

    fn add(self, rhs: Dp) -> Dp {
        Dp(self.0 + rhs.0)
    }
}

impl Sub for Dp {
    type Output = Dp;

    fn sub(self, rhs: Dp) -> Dp {
        Dp(self.0 - rhs.0)
    }
}

impl Neg for Dp {
    type Output = Dp;

    fn neg(self) -> Dp {
        Dp(-self.0)
    }
}

impl Div<f32> for Dp {
    type Output = Dp;

    fn div(self, rhs: f32) -> Dp {
        Dp(self.0 / rhs)
    }
}

/// Raw pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Px(pub f32);
