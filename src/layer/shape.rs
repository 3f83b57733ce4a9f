//! Filled background shapes (canvas background and overlay badge).

use super::{LayerEffect, LayerKind};
use crate::color::Color;
use crate::layout::round_half_up;
use crate::raster::RasterError;
use crate::vector::VectorNode;
use resvg::tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

/// Control point distance for a quarter circle drawn as one cubic bezier.
const KAPPA: f32 = 0.552_284_75;

// ============================================================================
// ShapeOutline
// ============================================================================

/// Geometry of a filled shape, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeOutline {
    Circle { cx: f64, cy: f64, r: f64 },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// Corner radius; `None` for sharp corners.
        radius: Option<f64>,
    },
}

impl ShapeOutline {
    /// The circle inscribed in the `size` square at (`x`, `y`).
    pub fn circle_in(x: f64, y: f64, size: f64) -> Self {
        let r = size / 2.0;
        Self::Circle {
            cx: x + r,
            cy: y + r,
            r,
        }
    }

    /// A `size` square at (`x`, `y`), optionally with rounded corners.
    pub fn rect(x: f64, y: f64, size: f64, radius: Option<f64>) -> Self {
        Self::Rect {
            x,
            y,
            width: size,
            height: size,
            radius,
        }
    }

    /// Builds the fill path. Returns `None` for shapes without area.
    pub fn to_path(&self) -> Option<Path> {
        match *self {
            Self::Circle { cx, cy, r } => {
                if r <= 0.0 {
                    return None;
                }
                PathBuilder::from_circle(cx as f32, cy as f32, r as f32)
            }
            Self::Rect {
                x,
                y,
                width,
                height,
                radius,
            } => {
                let (x, y, w, h) = (x as f32, y as f32, width as f32, height as f32);
                match radius.map(|r| r as f32).filter(|r| *r > 0.0) {
                    Some(r) => rounded_rect(x, y, w, h, r),
                    None => Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect),
                }
            }
        }
    }
}

/// Rectangle with quarter-circle corners. The radius is clamped to half the
/// shorter side, like SVG's `rx`/`ry`.
fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = radius.min(w / 2.0).min(h / 2.0);
    let k = r * KAPPA;
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

// ============================================================================
// ShapeLayer
// ============================================================================

/// A solid shape, optionally translucent.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeLayer {
    pub kind: LayerKind,
    pub outline: ShapeOutline,
    pub fill: Color,
    /// Opacity in `[0, 1]`; `None` is fully opaque and emits no attribute.
    pub opacity: Option<f64>,
}

impl ShapeLayer {
    pub fn new(kind: LayerKind, outline: ShapeOutline, fill: Color, opacity: Option<f64>) -> Self {
        Self {
            kind,
            outline,
            fill,
            opacity,
        }
    }

    fn alpha(&self) -> u8 {
        self.opacity
            .map_or(255, |opacity| round_half_up(opacity * 255.0).clamp(0, 255) as u8)
    }
}

impl LayerEffect for ShapeLayer {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn vector_node(&self) -> VectorNode {
        let node = match self.outline {
            ShapeOutline::Circle { cx, cy, r } => VectorNode::new("circle")
                .num("cx", cx)
                .num("cy", cy)
                .num("r", r)
                .attr("fill", self.fill),
            ShapeOutline::Rect {
                x,
                y,
                width,
                height,
                radius,
            } => {
                let node = VectorNode::new("rect")
                    .num("x", x)
                    .num("y", y)
                    .num("width", width)
                    .num("height", height)
                    .attr("fill", self.fill);
                match radius {
                    Some(r) => node.num("rx", r).num("ry", r),
                    None => node,
                }
            }
        };

        match self.opacity {
            Some(opacity) => node.num("opacity", opacity),
            None => node,
        }
    }

    fn rasterize(&self, pixmap: &mut Pixmap) -> Result<(), RasterError> {
        let path = self
            .outline
            .to_path()
            .ok_or(RasterError::EmptyShape(self.kind))?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(self.fill.red(), self.fill.green(), self.fill.blue(), self.alpha());
        paint.anti_alias = true;

        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = pixmap.pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    fn paint(layer: &ShapeLayer, size: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        layer.rasterize(&mut pixmap).unwrap();
        pixmap
    }

    #[test]
    fn circle_leaves_corners_clear() {
        let red = Color::rgb(255, 0, 0);
        let layer = ShapeLayer::new(
            LayerKind::Background,
            ShapeOutline::circle_in(0.0, 0.0, 64.0),
            red,
            None,
        );
        let pixmap = paint(&layer, 64);
        assert_eq!(pixel(&pixmap, 32, 32), (255, 0, 0, 255));
        assert_eq!(pixel(&pixmap, 0, 0).3, 0);
        assert_eq!(pixel(&pixmap, 63, 63).3, 0);
    }

    #[test]
    fn rounded_rect_clips_corners_only() {
        let layer = ShapeLayer::new(
            LayerKind::Background,
            ShapeOutline::rect(0.0, 0.0, 64.0, Some(64.0 * 0.22)),
            Color::WHITE,
            None,
        );
        let pixmap = paint(&layer, 64);
        assert_eq!(pixel(&pixmap, 0, 0).3, 0);
        assert_eq!(pixel(&pixmap, 32, 0).3, 255);
        assert_eq!(pixel(&pixmap, 0, 32).3, 255);
        assert_eq!(pixel(&pixmap, 32, 32).3, 255);
    }

    #[test]
    fn square_fills_everything() {
        let layer = ShapeLayer::new(
            LayerKind::Background,
            ShapeOutline::rect(0.0, 0.0, 16.0, None),
            Color::WHITE,
            None,
        );
        let pixmap = paint(&layer, 16);
        assert_eq!(pixel(&pixmap, 0, 0), (255, 255, 255, 255));
        assert_eq!(pixel(&pixmap, 15, 15), (255, 255, 255, 255));
    }

    #[test]
    fn opacity_scales_alpha() {
        let layer = ShapeLayer::new(
            LayerKind::OverlayBackground,
            ShapeOutline::rect(0.0, 0.0, 8.0, None),
            Color::BLACK,
            Some(0.2),
        );
        assert_eq!(layer.alpha(), 51);
        let pixmap = paint(&layer, 8);
        assert_eq!(pixel(&pixmap, 4, 4).3, 51);
    }

    #[test]
    fn empty_outline_is_an_error() {
        let layer = ShapeLayer::new(
            LayerKind::OverlayBackground,
            ShapeOutline::circle_in(4.0, 4.0, 0.0),
            Color::BLACK,
            None,
        );
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        assert!(matches!(
            layer.rasterize(&mut pixmap),
            Err(RasterError::EmptyShape(LayerKind::OverlayBackground))
        ));
    }

    #[test]
    fn vector_attributes() {
        let layer = ShapeLayer::new(
            LayerKind::OverlayBackground,
            ShapeOutline::rect(149.0, 21.0, 87.0, Some(26.0)),
            Color::BLACK,
            Some(0.2),
        );
        assert_eq!(
            layer.vector_node().to_markup(),
            "<rect x=\"149\" y=\"21\" width=\"87\" height=\"87\" fill=\"#000000\" rx=\"26\" ry=\"26\" opacity=\"0.2\"/>"
        );
    }
}
