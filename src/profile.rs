//! Serializable style profile: the configuration boundary.
//!
//! A [`StyleProfile`] mirrors what an editor holds: raw color text, icon
//! names that may be empty, and slider values that may be out of range. It
//! serializes to camelCase JSON and is turned into a render-ready
//! [`StyleConfig`] by [`StyleProfile::to_style_config`], which is the only
//! place where colors are validated and numbers are clamped.
//!
//! # Example
//!
//! ```
//! use exticon_renderer::StyleProfile;
//!
//! let profile = StyleProfile::new()
//!     .with_primary_icon("House")
//!     .with_overlay_icon("Plus");
//!
//! let json = profile.to_json().unwrap();
//! let restored = StyleProfile::from_json(&json).unwrap();
//!
//! let config = restored.to_style_config();
//! assert!(config.overlay.is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::export::ExportPlan;
use crate::style::{
    BackgroundStyle, OverlayStyle, PrimaryStyle, Shape, StyleConfig, CANVAS_SIZE,
};

const MIN_FRACTION: f64 = 0.01;
const MAX_FRACTION: f64 = 0.99;
const MIN_STROKE_WIDTH: f64 = 0.1;
const MIN_SCALE: f64 = 0.01;

// ============================================================================
// Serializable Shape
// ============================================================================

/// Serializable version of [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SerializableShape {
    Square,
    #[default]
    Rounded,
    Circle,
}

impl From<Shape> for SerializableShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Square => Self::Square,
            Shape::Rounded => Self::Rounded,
            Shape::Circle => Self::Circle,
        }
    }
}

impl From<SerializableShape> for Shape {
    fn from(shape: SerializableShape) -> Self {
        match shape {
            SerializableShape::Square => Self::Square,
            SerializableShape::Rounded => Self::Rounded,
            SerializableShape::Circle => Self::Circle,
        }
    }
}

// ============================================================================
// Layer Settings (Serializable)
// ============================================================================

/// Serializable settings for the canvas background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundSettings {
    /// `#RGB` or `#RRGGBB`.
    pub color: String,
    pub shape: SerializableShape,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        let style = BackgroundStyle::default();
        Self {
            color: style.color.to_string(),
            shape: style.shape.into(),
        }
    }
}

/// Serializable settings for the primary icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PrimarySettings {
    /// Catalog name; empty means no primary icon.
    pub icon: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub scale: f64,
    pub position_x: f64,
    pub position_y: f64,
    /// Padding in pixels of the 256px editor canvas.
    pub padding: i32,
}

impl Default for PrimarySettings {
    fn default() -> Self {
        let style = PrimaryStyle::default();
        Self {
            icon: String::new(),
            stroke_color: style.stroke_color.to_string(),
            stroke_width: style.stroke_width,
            scale: style.scale,
            position_x: style.position_x,
            position_y: style.position_y,
            padding: style.padding as i32,
        }
    }
}

/// Serializable settings for the overlay ("secondary") icon and its badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct OverlaySettings {
    /// Catalog name; empty means no overlay at all.
    pub icon: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    /// Badge color; empty means no badge shape.
    pub background_color: String,
    pub background_alpha: f64,
    pub shape: SerializableShape,
    pub corner_radius: f64,
    pub scale: f64,
    pub inner_padding: f64,
    pub position_x: f64,
    pub position_y: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        let style = OverlayStyle::new("");
        Self {
            icon: String::new(),
            stroke_color: style.stroke_color.to_string(),
            stroke_width: style.stroke_width,
            background_color: style
                .background_color
                .map(|c| c.to_string())
                .unwrap_or_default(),
            background_alpha: style.background_alpha,
            shape: style.shape.into(),
            corner_radius: style.corner_radius_fraction,
            scale: style.scale_fraction,
            inner_padding: style.inner_padding_fraction,
            position_x: style.position_x,
            position_y: style.position_y,
        }
    }
}

/// Serializable export choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// Sizes rendered in addition to the default set.
    pub extra_sizes: Vec<u32>,
}

fn default_canvas_size() -> u32 {
    CANVAS_SIZE
}

// ============================================================================
// StyleProfile
// ============================================================================

/// A serializable profile containing every editor setting.
///
/// Every field has a default, so partial JSON (even `{}`) is accepted.
///
/// # JSON Format
///
/// ```json
/// {
///   "canvasSize": 256,
///   "background": { "color": "#262626", "shape": "rounded" },
///   "primary": {
///     "icon": "House",
///     "strokeColor": "#fafafa",
///     "strokeWidth": 1.7,
///     "scale": 1.0,
///     "positionX": 50.0,
///     "positionY": 50.0,
///     "padding": 28
///   },
///   "overlay": { "icon": "Plus", "shape": "circle", "backgroundAlpha": 0.2 },
///   "export": { "extraSizes": [512] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,

    #[serde(default)]
    pub background: BackgroundSettings,

    #[serde(default)]
    pub primary: PrimarySettings,

    #[serde(default)]
    pub overlay: OverlaySettings,

    #[serde(default)]
    pub export: ExportSettings,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            background: BackgroundSettings::default(),
            primary: PrimarySettings::default(),
            overlay: OverlaySettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl StyleProfile {
    /// Creates a profile with the editor defaults and no icons selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primary icon name.
    pub fn with_primary_icon(mut self, icon: impl Into<String>) -> Self {
        self.primary.icon = icon.into();
        self
    }

    /// Sets the overlay icon name.
    pub fn with_overlay_icon(mut self, icon: impl Into<String>) -> Self {
        self.overlay.icon = icon.into();
        self
    }

    /// Sets the extra export sizes.
    pub fn with_extra_sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.export.extra_sizes = sizes.into_iter().collect();
        self
    }

    /// Validates and clamps the settings into a render-ready configuration.
    ///
    /// Invalid color text falls back to the default color of that field.
    /// An empty primary icon name means no primary icon; an empty overlay
    /// icon name drops the overlay (icon and badge) entirely.
    pub fn to_style_config(&self) -> StyleConfig {
        let defaults = StyleConfig::default();

        let background = BackgroundStyle {
            color: Color::parse_or(&self.background.color, defaults.background.color),
            shape: self.background.shape.into(),
        };

        let p = &self.primary;
        let primary = PrimaryStyle {
            icon: non_empty(&p.icon),
            stroke_color: Color::parse_or(&p.stroke_color, defaults.primary.stroke_color),
            stroke_width: at_least(p.stroke_width, MIN_STROKE_WIDTH, defaults.primary.stroke_width),
            scale: at_least(p.scale, MIN_SCALE, defaults.primary.scale),
            position_x: percent(p.position_x, defaults.primary.position_x),
            position_y: percent(p.position_y, defaults.primary.position_y),
            padding: p.padding.max(0) as u32,
        };

        let overlay = non_empty(&self.overlay.icon).map(|icon| {
            let o = &self.overlay;
            let fallback = OverlayStyle::new("");
            let background_color = if o.background_color.trim().is_empty() {
                None
            } else {
                Some(Color::parse_or(&o.background_color, Color::BLACK))
            };

            OverlayStyle {
                icon,
                stroke_color: Color::parse_or(&o.stroke_color, fallback.stroke_color),
                stroke_width: at_least(o.stroke_width, MIN_STROKE_WIDTH, fallback.stroke_width),
                background_color,
                background_alpha: finite_or(o.background_alpha, fallback.background_alpha)
                    .clamp(0.0, 1.0),
                shape: o.shape.into(),
                corner_radius_fraction: fraction(o.corner_radius, fallback.corner_radius_fraction),
                scale_fraction: fraction(o.scale, fallback.scale_fraction),
                inner_padding_fraction: fraction(o.inner_padding, fallback.inner_padding_fraction),
                position_x: percent(o.position_x, fallback.position_x),
                position_y: percent(o.position_y, fallback.position_y),
            }
        });

        StyleConfig {
            canvas_size: self.canvas_size.max(1),
            primary,
            background,
            overlay,
        }
    }

    /// The export plan: default sizes plus this profile's extra sizes.
    pub fn export_plan(&self) -> ExportPlan {
        ExportPlan::with_extras(self.export.extra_sizes.iter().copied())
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&StyleConfig> for StyleProfile {
    fn from(config: &StyleConfig) -> Self {
        let primary = &config.primary;
        let overlay = match &config.overlay {
            Some(o) => OverlaySettings {
                icon: o.icon.clone(),
                stroke_color: o.stroke_color.to_string(),
                stroke_width: o.stroke_width,
                background_color: o.background_color.map(|c| c.to_string()).unwrap_or_default(),
                background_alpha: o.background_alpha,
                shape: o.shape.into(),
                corner_radius: o.corner_radius_fraction,
                scale: o.scale_fraction,
                inner_padding: o.inner_padding_fraction,
                position_x: o.position_x,
                position_y: o.position_y,
            },
            None => OverlaySettings::default(),
        };

        Self {
            canvas_size: config.canvas_size,
            background: BackgroundSettings {
                color: config.background.color.to_string(),
                shape: config.background.shape.into(),
            },
            primary: PrimarySettings {
                icon: primary.icon.clone().unwrap_or_default(),
                stroke_color: primary.stroke_color.to_string(),
                stroke_width: primary.stroke_width,
                scale: primary.scale,
                position_x: primary.position_x,
                position_y: primary.position_y,
                padding: i32::try_from(primary.padding).unwrap_or(i32::MAX),
            },
            overlay,
            export: ExportSettings::default(),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn at_least(value: f64, min: f64, fallback: f64) -> f64 {
    finite_or(value, fallback).max(min)
}

fn percent(value: f64, fallback: f64) -> f64 {
    finite_or(value, fallback).clamp(0.0, 100.0)
}

fn fraction(value: f64, fallback: f64) -> f64 {
    finite_or(value, fallback).clamp(MIN_FRACTION, MAX_FRACTION)
}

// ============================================================================
// Tests
// ============================================================================
