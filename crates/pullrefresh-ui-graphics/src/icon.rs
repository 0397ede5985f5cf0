//! Cosmetic icon descriptors passed through to the renderer.

/// Background shape painted behind the indicator glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum IconShape {
    #[default]
    Circle,
    RoundedSquare {
        corner_radius: f32,
    },
    Square,
}

/// Glyph painted inside the indicator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IconImage {
    /// Circular-arrow refresh glyph.
    #[default]
    Refresh,
    /// Host-provided glyph, e.g. a single character for terminal hosts.
    Glyph(String),
}

impl IconImage {
    /// Text fallback for hosts that paint characters instead of vectors.
    pub fn as_text(&self) -> &str {
        match self {
            IconImage::Refresh => "⟳",
            IconImage::Glyph(glyph) => glyph,
        }
    }
}
