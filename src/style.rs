//! Style configuration for a composite icon.
//!
//! A [`StyleConfig`] is built fresh for every render. All values are assumed
//! to be in range already; clamping happens where the configuration is
//! produced (see [`StyleProfile`](crate::StyleProfile)).

use crate::color::Color;
use crate::layout::round_half_up;

/// Corner radius of the rounded background, as a fraction of canvas size.
pub const ROUNDED_CORNER_FRACTION: f64 = 0.22;

/// Logical canvas size of the editor and of the vector export.
pub const CANVAS_SIZE: u32 = 256;

// ============================================================================
// Shape
// ============================================================================

/// Outline of a background (main or overlay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    Square,
    #[default]
    Rounded,
    Circle,
}

// ============================================================================
// Layer styles
// ============================================================================

/// Primary icon layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryStyle {
    /// Catalog name of the icon. `None` renders no primary icon.
    pub icon: Option<String>,
    pub stroke_color: Color,
    /// Stroke width in design-grid units.
    pub stroke_width: f64,
    /// Multiplier applied to the padded footprint.
    pub scale: f64,
    /// Center X, percent of canvas size.
    pub position_x: f64,
    /// Center Y, percent of canvas size.
    pub position_y: f64,
    /// Padding on each side, in canvas pixels.
    pub padding: u32,
}

impl Default for PrimaryStyle {
    fn default() -> Self {
        Self {
            icon: None,
            stroke_color: Color::rgb(0xfa, 0xfa, 0xfa),
            stroke_width: 1.7,
            scale: 1.0,
            position_x: 50.0,
            position_y: 50.0,
            padding: 28,
        }
    }
}

/// Canvas background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStyle {
    pub color: Color,
    pub shape: Shape,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x26, 0x26, 0x26),
            shape: Shape::Rounded,
        }
    }
}

/// Secondary ("badge") layer drawn over the primary icon.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub icon: String,
    pub stroke_color: Color,
    pub stroke_width: f64,
    /// Fill of the badge shape. `None` draws no badge shape.
    pub background_color: Option<Color>,
    /// Opacity of the badge shape; 0 hides it.
    pub background_alpha: f64,
    pub shape: Shape,
    /// Corner radius as a fraction of the badge size (rounded shape only).
    pub corner_radius_fraction: f64,
    /// Badge size as a fraction of canvas size.
    pub scale_fraction: f64,
    /// Inset of the icon inside the badge, as a fraction of the badge size.
    pub inner_padding_fraction: f64,
    pub position_x: f64,
    pub position_y: f64,
}

impl OverlayStyle {
    /// Creates an overlay for `icon` with the editor's default badge styling.
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            stroke_color: Color::rgb(0xfa, 0xfa, 0xfa),
            stroke_width: 1.7,
            background_color: Some(Color::BLACK),
            background_alpha: 0.2,
            shape: Shape::Rounded,
            corner_radius_fraction: 0.3,
            scale_fraction: 0.34,
            inner_padding_fraction: 0.18,
            position_x: 75.0,
            position_y: 25.0,
        }
    }

    /// Returns true if the badge shape contributes anything visible.
    pub fn has_background(&self) -> bool {
        self.background_color.is_some() && self.background_alpha > 0.0
    }
}

// ============================================================================
// StyleConfig
// ============================================================================

/// Complete description of one composite icon.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Logical square size of the output, in pixels.
    pub canvas_size: u32,
    pub primary: PrimaryStyle,
    pub background: BackgroundStyle,
    /// Only present when a secondary icon is selected.
    pub overlay: Option<OverlayStyle>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            primary: PrimaryStyle::default(),
            background: BackgroundStyle::default(),
            overlay: None,
        }
    }
}

impl StyleConfig {
    /// Creates the default configuration with `icon` as the primary icon.
    pub fn with_primary_icon(icon: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.primary.icon = Some(icon.into());
        config
    }

    /// Sets the overlay layer.
    pub fn with_overlay(mut self, overlay: OverlayStyle) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Removes the overlay layer.
    pub fn without_overlay(mut self) -> Self {
        self.overlay = None;
        self
    }

    /// Returns this configuration re-targeted at a `size` pixel canvas.
    ///
    /// Padding is the only absolute length, so it is rescaled as
    /// `round(padding / canvas_size * size)`; everything else is already
    /// relative to the canvas.
    pub fn at_size(&self, size: u32) -> Self {
        let padding = if self.canvas_size == 0 {
            0
        } else {
            let scaled =
                self.primary.padding as f64 / self.canvas_size as f64 * size as f64;
            round_half_up(scaled).max(0) as u32
        };

        let mut config = self.clone();
        config.canvas_size = size;
        config.primary.padding = padding;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_defaults() {
        let config = StyleConfig::default();
        assert_eq!(config.canvas_size, 256);
        assert_eq!(config.primary.padding, 28);
        assert_eq!(config.background.shape, Shape::Rounded);
        assert_eq!(config.background.color.to_string(), "#262626");
        assert_eq!(config.primary.stroke_color.to_string(), "#fafafa");
        assert!(config.overlay.is_none());
    }

    #[test]
    fn at_size_rescales_padding() {
        let config = StyleConfig::with_primary_icon("House");
        assert_eq!(config.at_size(256).primary.padding, 28);
        assert_eq!(config.at_size(16).primary.padding, 2); // 1.75
        assert_eq!(config.at_size(32).primary.padding, 4); // 3.5
        assert_eq!(config.at_size(48).primary.padding, 5); // 5.25
        assert_eq!(config.at_size(1024).primary.padding, 112);
        assert_eq!(config.at_size(512).canvas_size, 512);
    }

    #[test]
    fn at_size_keeps_relative_fields() {
        let config = StyleConfig::with_primary_icon("House").with_overlay(OverlayStyle::new("Plus"));
        let scaled = config.at_size(48);
        assert_eq!(scaled.primary.position_x, config.primary.position_x);
        assert_eq!(scaled.overlay, config.overlay);
    }

    #[test]
    fn overlay_background_visibility() {
        let mut overlay = OverlayStyle::new("Plus");
        assert!(overlay.has_background());
        overlay.background_alpha = 0.0;
        assert!(!overlay.has_background());
        overlay.background_alpha = 0.5;
        overlay.background_color = None;
        assert!(!overlay.has_background());
    }
}
