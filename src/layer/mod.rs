//! Paint-ordered layer stack shared by both compositors.
//!
//! A composition is at most four layers, always stacked in the same order:
//!
//! 1. [`LayerKind::Background`]: the canvas shape
//! 2. [`LayerKind::Primary`]: the primary icon
//! 3. [`LayerKind::OverlayBackground`]: the badge shape behind the overlay icon
//! 4. [`LayerKind::OverlayIcon`]: the overlay icon
//!
//! Each layer implements [`LayerEffect`], which knows how to emit itself as a
//! vector node and how to paint itself onto a pixmap. The vector and raster
//! compositors only walk the stack, so they cannot disagree on which layers
//! exist or in which order they paint.

pub mod glyph;
pub mod shape;

pub use glyph::GlyphLayer;
pub use shape::{ShapeLayer, ShapeOutline};

use crate::color::Color;
use crate::icon::IconCatalog;
use crate::layout::{LayerGeometry, Layout};
use crate::raster::RasterError;
use crate::style::{Shape, StyleConfig, ROUNDED_CORNER_FRACTION};
use crate::vector::VectorNode;
use resvg::tiny_skia::Pixmap;
use std::fmt;

// ============================================================================
// LayerKind
// ============================================================================

/// Role of a layer in the composition. Ordering is paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Background,
    Primary,
    OverlayBackground,
    OverlayIcon,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Background => "background",
            Self::Primary => "primary icon",
            Self::OverlayBackground => "overlay background",
            Self::OverlayIcon => "overlay icon",
        };
        f.write_str(name)
    }
}

// ============================================================================
// LayerEffect
// ============================================================================

/// A paintable layer.
pub trait LayerEffect {
    fn kind(&self) -> LayerKind;

    /// Emits the layer as a vector node in canvas coordinates.
    fn vector_node(&self) -> VectorNode;

    /// Paints the layer onto `pixmap`, which has the layout's canvas size.
    ///
    /// A failure leaves the pixmap untouched; callers treat the layer as
    /// contributing nothing.
    fn rasterize(&self, pixmap: &mut Pixmap) -> Result<(), RasterError>;
}

// ============================================================================
// LayerStack
// ============================================================================

/// The layers of one composition, bottom first.
///
/// Built fresh for every render; borrows glyphs from the catalog.
pub struct LayerStack<'a> {
    layers: Vec<Box<dyn LayerEffect + 'a>>,
}

impl<'a> LayerStack<'a> {
    /// Resolves icons and builds the layers for `config` laid out as `layout`.
    ///
    /// Layers that would draw nothing are left out: an unset, unknown or
    /// empty icon, an icon footprint without area, and a badge without a
    /// color or with zero alpha.
    pub fn build(config: &StyleConfig, layout: &Layout, catalog: &'a IconCatalog) -> Self {
        let mut layers: Vec<Box<dyn LayerEffect + 'a>> = Vec::with_capacity(4);
        let canvas = layout.canvas_size as f64;

        let outline = match config.background.shape {
            Shape::Circle => ShapeOutline::circle_in(0.0, 0.0, canvas),
            Shape::Rounded => {
                ShapeOutline::rect(0.0, 0.0, canvas, Some(canvas * ROUNDED_CORNER_FRACTION))
            }
            Shape::Square => ShapeOutline::rect(0.0, 0.0, canvas, None),
        };
        layers.push(Box::new(ShapeLayer::new(
            LayerKind::Background,
            outline,
            config.background.color,
            None,
        )));

        let primary = &config.primary;
        if let Some(layer) = glyph_layer(
            LayerKind::Primary,
            catalog,
            primary.icon.as_deref(),
            layout.primary,
            primary.stroke_color,
            primary.stroke_width,
        ) {
            layers.push(Box::new(layer));
        }

        if let (Some(style), Some(geometry)) = (&config.overlay, &layout.overlay) {
            if let Some(color) = style.background_color.filter(|_| style.has_background()) {
                let frame = geometry.frame;
                let (x, y, size) = (frame.x as f64, frame.y as f64, frame.size as f64);
                let outline = match style.shape {
                    Shape::Circle => ShapeOutline::circle_in(x, y, size),
                    Shape::Rounded => {
                        ShapeOutline::rect(x, y, size, geometry.corner_radius.map(f64::from))
                    }
                    Shape::Square => ShapeOutline::rect(x, y, size, None),
                };
                layers.push(Box::new(ShapeLayer::new(
                    LayerKind::OverlayBackground,
                    outline,
                    color,
                    Some(style.background_alpha),
                )));
            }

            if let Some(layer) = glyph_layer(
                LayerKind::OverlayIcon,
                catalog,
                Some(style.icon.as_str()),
                geometry.icon,
                style.stroke_color,
                style.stroke_width,
            ) {
                layers.push(Box::new(layer));
            }
        }

        Self { layers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn LayerEffect + 'a)> {
        self.layers.iter().map(|layer| layer.as_ref())
    }

    /// Kinds of the layers in paint order.
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.iter().map(|layer| layer.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

fn glyph_layer<'a>(
    kind: LayerKind,
    catalog: &'a IconCatalog,
    icon: Option<&str>,
    geometry: LayerGeometry,
    stroke_color: Color,
    stroke_width: f64,
) -> Option<GlyphLayer<'a>> {
    let glyph = catalog.lookup(icon);
    if glyph.is_empty() {
        if let Some(name) = icon.filter(|name| !name.is_empty()) {
            log::debug!("{kind}: no glyph named {name:?}, skipping");
        }
        return None;
    }
    if !geometry.is_visible() {
        log::debug!("{kind}: footprint {} has no area, skipping", geometry.size);
        return None;
    }
    Some(GlyphLayer::new(kind, glyph, geometry, stroke_color, stroke_width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::style::OverlayStyle;

    fn kinds(config: &StyleConfig) -> Vec<LayerKind> {
        let layout = compute_layout(config);
        LayerStack::build(config, &layout, IconCatalog::bundled()).kinds()
    }

    #[test]
    fn full_stack_is_in_paint_order() {
        let config = StyleConfig::with_primary_icon("House").with_overlay(OverlayStyle::new("Plus"));
        assert_eq!(
            kinds(&config),
            [
                LayerKind::Background,
                LayerKind::Primary,
                LayerKind::OverlayBackground,
                LayerKind::OverlayIcon,
            ]
        );
    }

    #[test]
    fn no_icons_leaves_background() {
        assert_eq!(kinds(&StyleConfig::default()), [LayerKind::Background]);

        let mut overlay = OverlayStyle::new("Missing");
        overlay.background_color = None;
        let config = StyleConfig::default().with_overlay(overlay);
        assert_eq!(kinds(&config), [LayerKind::Background]);
    }

    #[test]
    fn badge_without_icon_still_paints() {
        let config = StyleConfig::with_primary_icon("House").with_overlay(OverlayStyle::new("Missing"));
        assert_eq!(
            kinds(&config),
            [
                LayerKind::Background,
                LayerKind::Primary,
                LayerKind::OverlayBackground,
            ]
        );
    }

    #[test]
    fn clearing_overlay_removes_both_overlay_layers() {
        let with = StyleConfig::with_primary_icon("House").with_overlay(OverlayStyle::new("Plus"));
        let without = with.clone().without_overlay();
        assert_eq!(kinds(&without), [LayerKind::Background, LayerKind::Primary]);
    }

    #[test]
    fn kind_ordering_matches_paint_order() {
        assert!(LayerKind::Background < LayerKind::Primary);
        assert!(LayerKind::Primary < LayerKind::OverlayBackground);
        assert!(LayerKind::OverlayBackground < LayerKind::OverlayIcon);
        assert_eq!(LayerKind::OverlayIcon.to_string(), "overlay icon");
    }
}
