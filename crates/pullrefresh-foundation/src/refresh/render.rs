//! Renderer-facing contract: plain per-frame values and the cosmetic style.

use pullrefresh_ui_graphics::{Color, Dp, IconImage, IconShape, Px};

use super::config::ValidatedConfig;
use super::state_machine::RefreshState;

/// Border drawn around the indicator while a refresh runs.
pub const REFRESHING_BORDER_WIDTH: Dp = Dp(5.0);

/// Everything a renderer needs to paint the indicator for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorFrame {
    /// Left edge, centering the icon in the host's width.
    pub x: Dp,
    /// Top edge; negative while parked above the content.
    pub position_y: Dp,
    pub rotation_deg: f32,
    pub state: RefreshState,
    pub size: Dp,
    pub border_width: Dp,
}

impl IndicatorFrame {
    pub fn new(
        max_width: Dp,
        position_y: f32,
        rotation_deg: f32,
        state: RefreshState,
        size: Dp,
    ) -> Self {
        let border_width = if state.is_refreshing() {
            REFRESHING_BORDER_WIDTH
        } else {
            Dp::ZERO
        };
        Self {
            x: (max_width - size) / 2.0,
            position_y: Dp(position_y),
            rotation_deg,
            state,
            size,
            border_width,
        }
    }

    pub fn to_px(&self, density: f32) -> IndicatorFramePx {
        IndicatorFramePx {
            x: self.x.to_px(density),
            y: self.position_y.to_px(density),
            rotation_deg: self.rotation_deg,
            state: self.state,
            size: self.size.to_px(density),
            border_width: self.border_width.to_px(density),
        }
    }
}

/// [`IndicatorFrame`] resolved to device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorFramePx {
    pub x: Px,
    pub y: Px,
    pub rotation_deg: f32,
    pub state: RefreshState,
    pub size: Px,
    pub border_width: Px,
}

/// Cosmetic settings copied out of the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorStyle {
    pub color: Color,
    pub background: Color,
    pub shape: IconShape,
    pub image: IconImage,
}

impl IndicatorStyle {
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let settings = config.settings();
        Self {
            color: settings.icon_color,
            background: settings.icon_background,
            shape: settings.icon_shape,
            image: settings.icon_image.clone(),
        }
    }
}

/// Paints the indicator. Implemented by host backends.
pub trait IndicatorRenderer {
    type Error;

    fn paint(&mut self, frame: &IndicatorFrame, style: &IndicatorStyle) -> Result<(), Self::Error>;
}
