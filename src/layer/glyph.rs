//! Stroked icon layers.
//!
//! The vector form is a `g` element carrying the shared stroke attributes,
//! with one child per glyph primitive. The raster form paints the same
//! primitives through resvg, so both outputs agree at equal sizes.

use super::{LayerEffect, LayerKind};
use crate::color::Color;
use crate::icon::{IconGlyph, DESIGN_GRID};
use crate::layout::LayerGeometry;
use crate::raster::RasterError;
use crate::vector::{format_number, VectorNode};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// One icon placed on the canvas.
#[derive(Debug, Clone)]
pub struct GlyphLayer<'a> {
    pub kind: LayerKind,
    pub glyph: &'a IconGlyph,
    pub geometry: LayerGeometry,
    pub stroke_color: Color,
    /// Stroke width in design-grid units; scaled with the glyph.
    pub stroke_width: f64,
}

impl<'a> GlyphLayer<'a> {
    pub fn new(
        kind: LayerKind,
        glyph: &'a IconGlyph,
        geometry: LayerGeometry,
        stroke_color: Color,
        stroke_width: f64,
    ) -> Self {
        Self {
            kind,
            glyph,
            geometry,
            stroke_color,
            stroke_width,
        }
    }

    /// Ratio between the footprint and the design grid.
    pub fn scale(&self) -> f64 {
        self.geometry.size as f64 / DESIGN_GRID
    }

    /// Adds the inherited stroke attributes to `node`.
    fn with_stroke(&self, node: VectorNode) -> VectorNode {
        node.attr("stroke", self.stroke_color)
            .attr("fill", "none")
            .num("stroke-width", self.stroke_width)
            .attr("stroke-linecap", "round")
            .attr("stroke-linejoin", "round")
    }

    fn primitive_nodes(&self) -> impl Iterator<Item = VectorNode> + '_ {
        self.glyph.iter().map(|primitive| {
            primitive
                .drawing_attributes()
                .fold(VectorNode::new(primitive.kind.tag()), |node, (name, value)| {
                    node.attr(name, value)
                })
        })
    }

    /// The glyph alone as a 24x24 SVG document, stroke attributes on the
    /// root. This is what gets rasterized.
    pub fn standalone_svg(&self) -> String {
        let grid = format_number(DESIGN_GRID);
        let root = VectorNode::new("svg")
            .attr("xmlns", SVG_NAMESPACE)
            .attr("viewBox", format!("0 0 {grid} {grid}"))
            .attr("width", &grid)
            .attr("height", &grid);
        self.with_stroke(root)
            .children(self.primitive_nodes())
            .to_markup()
    }
}

impl LayerEffect for GlyphLayer<'_> {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn vector_node(&self) -> VectorNode {
        let transform = format!(
            "translate({}, {}) scale({})",
            self.geometry.x,
            self.geometry.y,
            format_number(self.scale())
        );
        self.with_stroke(VectorNode::new("g").attr("transform", transform))
            .children(self.primitive_nodes())
    }

    fn rasterize(&self, pixmap: &mut Pixmap) -> Result<(), RasterError> {
        let markup = self.standalone_svg();
        let tree = Tree::from_str(&markup, &Options::default()).map_err(|err| {
            RasterError::Decode {
                layer: self.kind,
                message: err.to_string(),
            }
        })?;

        let scale = self.scale() as f32;
        let transform = Transform::from_row(
            scale,
            0.0,
            0.0,
            scale,
            self.geometry.x as f32,
            self.geometry.y as f32,
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(())
    }
}
