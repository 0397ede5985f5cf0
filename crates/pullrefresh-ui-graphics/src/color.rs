//! Color representation

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self(r, g, b, 1.0)
    }

    pub const fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    pub fn a(&self) -> f32 {
        self.3
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self(self.0, self.1, self.2, alpha)
    }

    /// Packs the color into `0xAARRGGBB`.
    pub fn to_argb_u32(&self) -> u32 {
        fn channel(value: f32) -> u32 {
            (value.clamp(0.0, 1.0) * 255.0).round() as u32
        }
        (channel(self.3) << 24) | (channel(self.0) << 16) | (channel(self.1) << 8) | channel(self.2)
    }

    pub const BLACK: Color = Color(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color(1.0, 0.0, 0.0, 1.0);
    pub const CYAN: Color = Color::from_rgb_u8(0x00, 0xFF, 0xFF);
    pub const DARK_GRAY: Color = Color::from_rgb_u8(0x44, 0x44, 0x44);
    pub const TRANSPARENT: Color = Color(0.0, 0.0, 0.0, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing_matches_u8_constructor() {
        assert_eq!(Color::CYAN.to_argb_u32(), 0xFF00FFFF);
        assert_eq!(Color::DARK_GRAY.to_argb_u32(), 0xFF444444);
        assert_eq!(Color::TRANSPARENT.to_argb_u32(), 0x00000000);
    }
}
