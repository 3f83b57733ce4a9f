//! Layout engine: resolves a [`StyleConfig`] into pixel geometry.
//!
//! Both compositors consume the same [`Layout`], which is what keeps vector
//! and raster output geometrically identical.

use crate::style::{Shape, StyleConfig};

/// Smallest footprint the primary icon is allowed to shrink to.
pub const MIN_ICON_SIZE: i32 = 4;

/// Rounds to the nearest integer, halves toward positive infinity.
///
/// Every rounding step of the layout goes through this so that e.g. a
/// top-left of `-43.5` lands on `-43` in both output paths.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn round_px(value: f64) -> i32 {
    round_half_up(value).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ============================================================================
// Geometry
// ============================================================================

/// Placement of one square layer: top-left corner and side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerGeometry {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

impl LayerGeometry {
    pub fn new(x: i32, y: i32, size: i32) -> Self {
        Self { x, y, size }
    }

    /// Places a `size` square whose center sits at the given percentages of
    /// the canvas.
    ///
    /// The center and the top-left are each rounded on their own; the
    /// top-left is derived from the rounded center, never from a
    /// pre-rounded half size.
    pub fn centered(canvas_size: u32, position_x: f64, position_y: f64, size: i32) -> Self {
        let canvas = canvas_size as f64;
        let center_x = round_half_up(canvas * (position_x / 100.0)) as f64;
        let center_y = round_half_up(canvas * (position_y / 100.0)) as f64;
        let half = size as f64 / 2.0;
        Self {
            x: round_px(center_x - half),
            y: round_px(center_y - half),
            size,
        }
    }

    /// Center point, possibly on a half pixel.
    pub fn center(&self) -> (f64, f64) {
        let half = self.size as f64 / 2.0;
        (self.x as f64 + half, self.y as f64 + half)
    }

    /// A layer with no area draws nothing.
    pub fn is_visible(&self) -> bool {
        self.size > 0
    }
}

/// Placement of the overlay badge and the icon inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayGeometry {
    /// Outer square of the badge.
    pub frame: LayerGeometry,
    /// Inset applied on every side of the frame.
    pub inner_padding: i32,
    /// Footprint of the overlay icon.
    pub icon: LayerGeometry,
    /// Corner radius of a rounded badge; `None` for other shapes.
    pub corner_radius: Option<i32>,
}

/// Resolved geometry of every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub canvas_size: u32,
    pub primary: LayerGeometry,
    /// `None` when the configuration has no overlay.
    pub overlay: Option<OverlayGeometry>,
}

// ============================================================================
// compute_layout
// ============================================================================

/// Computes the geometry of a composition. Pure; never fails.
pub fn compute_layout(config: &StyleConfig) -> Layout {
    let canvas = config.canvas_size as f64;
    let primary_style = &config.primary;

    let padded = canvas - 2.0 * primary_style.padding as f64;
    let primary_size = round_px(padded * primary_style.scale).max(MIN_ICON_SIZE);
    let primary = LayerGeometry::centered(
        config.canvas_size,
        primary_style.position_x,
        primary_style.position_y,
        primary_size,
    );

    let overlay = config.overlay.as_ref().map(|style| {
        let size = round_px(canvas * style.scale_fraction);
        let frame =
            LayerGeometry::centered(config.canvas_size, style.position_x, style.position_y, size);
        let inner_padding = round_px(size as f64 * style.inner_padding_fraction);
        let icon = LayerGeometry::new(
            frame.x + inner_padding,
            frame.y + inner_padding,
            size - 2 * inner_padding,
        );
        let corner_radius = (style.shape == Shape::Rounded)
            .then(|| round_px(size as f64 * style.corner_radius_fraction));

        OverlayGeometry {
            frame,
            inner_padding,
            icon,
            corner_radius,
        }
    });

    log::debug!(
        "layout at {}px: primary {:?}, overlay {:?}",
        config.canvas_size,
        primary,
        overlay
    );

    Layout {
        canvas_size: config.canvas_size,
        primary,
        overlay,
    }
}
