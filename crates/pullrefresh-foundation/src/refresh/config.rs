use std::fmt;

use pullrefresh_animation::{AnimationSpec, Easing, InfiniteRepeatableSpec, RepeatMode};
use pullrefresh_ui_graphics::{Color, Dp, IconImage, IconShape};

pub const DEFAULT_THRESHOLD: f32 = 150.0;
pub const DEFAULT_ICON_SIZE: Dp = Dp(25.0);
pub const DEFAULT_LOADING_OFFSET: Dp = Dp(15.0);
pub const DEFAULT_POSITION_DURATION_MS: u64 = 250;
pub const DEFAULT_ROTATION_PERIOD_MS: u64 = 1000;

/// Construction-time settings for one refresh region.
///
/// Distances share one unit (the host's density-independent unit). Only the
/// threshold, icon size, loading offset and the two durations change
/// behavior; the remaining fields are handed to the renderer untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct RefreshConfig {
    pub threshold: f32,
    pub icon_size: Dp,
    /// Rest position of the indicator. Defaults to `-icon_size`.
    pub initial_offset: Option<Dp>,
    pub loading_offset: Dp,
    pub position_animation_duration_ms: u64,
    pub rotation_period_ms: u64,
    pub position_easing: Easing,
    /// Send the indicator back to rest after a release that did not refresh.
    pub retract_on_cancel: bool,
    pub icon_color: Color,
    pub icon_background: Color,
    pub icon_shape: IconShape,
    pub icon_image: IconImage,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            icon_size: DEFAULT_ICON_SIZE,
            initial_offset: None,
            loading_offset: DEFAULT_LOADING_OFFSET,
            position_animation_duration_ms: DEFAULT_POSITION_DURATION_MS,
            rotation_period_ms: DEFAULT_ROTATION_PERIOD_MS,
            position_easing: Easing::LinearEasing,
            retract_on_cancel: false,
            icon_color: Color::CYAN,
            icon_background: Color::DARK_GRAY,
            icon_shape: IconShape::Circle,
            icon_image: IconImage::Refresh,
        }
    }
}

impl RefreshConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_icon_size(mut self, icon_size: Dp) -> Self {
        self.icon_size = icon_size;
        self
    }

    pub fn with_initial_offset(mut self, offset: Dp) -> Self {
        self.initial_offset = Some(offset);
        self
    }

    pub fn with_loading_offset(mut self, offset: Dp) -> Self {
        self.loading_offset = offset;
        self
    }

    pub fn with_position_duration_ms(mut self, millis: u64) -> Self {
        self.position_animation_duration_ms = millis;
        self
    }

    pub fn with_rotation_period_ms(mut self, millis: u64) -> Self {
        self.rotation_period_ms = millis;
        self
    }

    pub fn with_position_easing(mut self, easing: Easing) -> Self {
        self.position_easing = easing;
        self
    }

    pub fn with_retract_on_cancel(mut self, retract: bool) -> Self {
        self.retract_on_cancel = retract;
        self
    }

    pub fn with_icon_color(mut self, color: Color) -> Self {
        self.icon_color = color;
        self
    }

    pub fn with_icon_background(mut self, background: Color, shape: IconShape) -> Self {
        self.icon_background = background;
        self.icon_shape = shape;
        self
    }

    pub fn with_icon_image(mut self, image: IconImage) -> Self {
        self.icon_image = image;
        self
    }

    /// Rejects settings the indicator math cannot work with.
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::NonFiniteValue("threshold"));
        }
        if self.threshold <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold(self.threshold));
        }
        if !self.icon_size.0.is_finite() {
            return Err(ConfigError::NonFiniteValue("icon_size"));
        }
        if self.icon_size.0 <= 0.0 {
            return Err(ConfigError::NonPositiveIconSize(self.icon_size.0));
        }
        if !self.loading_offset.0.is_finite() {
            return Err(ConfigError::NonFiniteValue("loading_offset"));
        }
        if let Some(offset) = self.initial_offset {
            if !offset.0.is_finite() {
                return Err(ConfigError::NonFiniteValue("initial_offset"));
            }
        }
        if self.position_animation_duration_ms == 0 {
            return Err(ConfigError::ZeroPositionDuration);
        }
        if self.rotation_period_ms == 0 {
            return Err(ConfigError::ZeroRotationPeriod);
        }
        Ok(ValidatedConfig { inner: self })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveThreshold(f32),
    NonPositiveIconSize(f32),
    ZeroPositionDuration,
    ZeroRotationPeriod,
    NonFiniteValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveThreshold(value) => {
                write!(f, "refresh threshold must be positive, got {value}")
            }
            ConfigError::NonPositiveIconSize(value) => {
                write!(f, "indicator icon size must be positive, got {value}")
            }
            ConfigError::ZeroPositionDuration => {
                write!(f, "position animation duration must be at least 1ms")
            }
            ConfigError::ZeroRotationPeriod => write!(f, "rotation period must be at least 1ms"),
            ConfigError::NonFiniteValue(field) => write!(f, "{field} must be a finite number"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration that passed [`RefreshConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedConfig {
    inner: RefreshConfig,
}

impl ValidatedConfig {
    pub fn threshold(&self) -> f32 {
        self.inner.threshold
    }

    pub fn icon_size(&self) -> Dp {
        self.inner.icon_size
    }

    pub fn initial_offset(&self) -> f32 {
        self.inner
            .initial_offset
            .unwrap_or(-self.inner.icon_size)
            .value()
    }

    pub fn loading_offset(&self) -> f32 {
        self.inner.loading_offset.value()
    }

    pub fn retract_on_cancel(&self) -> bool {
        self.inner.retract_on_cancel
    }

    pub fn position_spec(&self) -> AnimationSpec {
        AnimationSpec::tween(
            self.inner.position_animation_duration_ms,
            self.inner.position_easing,
        )
    }

    /// Linear 0→360 spin, restarting every period.
    pub fn rotation_spec(&self) -> InfiniteRepeatableSpec {
        InfiniteRepeatableSpec::new(
            AnimationSpec::linear(self.inner.rotation_period_ms),
            RepeatMode::Restart,
        )
    }

    pub fn settings(&self) -> &RefreshConfig {
        &self.inner
    }
}

impl TryFrom<RefreshConfig> for ValidatedConfig {
    type Error = ConfigError;

    fn try_from(config: RefreshConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
