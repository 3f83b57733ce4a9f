//! Vector compositor: renders a composition as SVG markup.
//!
//! The document is built as a plain [`VectorNode`] tree first and serialized
//! afterwards, so callers (and tests) can inspect the structure without
//! parsing markup back.

use crate::icon::IconCatalog;
use crate::layer::LayerStack;
use crate::layout::{compute_layout, Layout};
use crate::style::StyleConfig;
use std::fmt::Write as _;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// VectorNode
// ============================================================================

/// One element of the vector document.
///
/// Attributes keep their insertion order so that serialization is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<VectorNode>,
}

impl VectorNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends an attribute (builder style).
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((name.into(), value.to_string()));
        self
    }

    /// Appends a numeric attribute, formatted with [`format_number`].
    pub fn num(self, name: impl Into<String>, value: f64) -> Self {
        self.attr(name, format_number(value))
    }

    pub fn child(mut self, node: VectorNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = VectorNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Returns the value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Serializes this node and its children. Childless elements are
    /// self-closing.
    pub fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape_xml(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }
}

/// Formats a number the way it should appear in markup: shortest
/// round-trip form, no trailing `.0`, never `-0` or `NaN`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// VectorDocument
// ============================================================================

/// A complete vector composition: an `svg` root whose children are the
/// painted layers in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    pub size: u32,
    pub root: VectorNode,
}

impl VectorDocument {
    /// Direct children of the root, bottom layer first.
    pub fn layers(&self) -> &[VectorNode] {
        &self.root.children
    }

    /// Icon groups (`g` elements) in paint order.
    pub fn icon_groups(&self) -> Vec<&VectorNode> {
        self.layers().iter().filter(|node| node.tag == "g").collect()
    }

    pub fn to_markup(&self) -> String {
        self.root.to_markup()
    }
}

/// Builds the vector document for `config` from an already computed layout.
pub fn render_document(config: &StyleConfig, layout: &Layout, catalog: &IconCatalog) -> VectorDocument {
    let size = layout.canvas_size;
    let stack = LayerStack::build(config, layout, catalog);

    let root = VectorNode::new("svg")
        .attr("xmlns", SVG_NAMESPACE)
        .attr("width", size)
        .attr("height", size)
        .attr("viewBox", format!("0 0 {size} {size}"))
        .children(stack.iter().map(|layer| layer.vector_node()));

    log::debug!("vector document at {size}px with {} layers", stack.len());

    VectorDocument { size, root }
}

/// Renders `config` against the bundled catalog as SVG markup.
///
/// The document is laid out at `config.canvas_size`.
pub fn render_vector(config: &StyleConfig) -> String {
    render_vector_with(config, IconCatalog::bundled())
}

/// Renders `config` against `catalog` as SVG markup.
pub fn render_vector_with(config: &StyleConfig, catalog: &IconCatalog) -> String {
    let layout = compute_layout(config);
    render_document(config, &layout, catalog).to_markup()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::style::{OverlayStyle, Shape};

    fn home_config() -> StyleConfig {
        StyleConfig::with_primary_icon("Home")
    }

    fn document(config: &StyleConfig) -> VectorDocument {
        render_document(config, &compute_layout(config), IconCatalog::bundled())
    }

    #[test]
    fn markup_is_self_closing_and_escaped() {
        let node = VectorNode::new("text").attr("label", "a<b & \"c\"");
        assert_eq!(
            node.to_markup(),
            "<text label=\"a&lt;b &amp; &quot;c&quot;\"/>"
        );

        let nested = VectorNode::new("g").child(VectorNode::new("path").attr("d", "M1 1"));
        assert_eq!(nested.to_markup(), "<g><path d=\"M1 1\"/></g>");
    }

    #[test]
    fn numbers_use_shortest_form() {
        assert_eq!(format_number(200.0), "200");
        assert_eq!(format_number(256.0 * 0.22), "56.32");
        assert_eq!(format_number(200.0 / 24.0), "8.333333333333334");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn rounded_background_and_single_group() {
        let doc = document(&home_config());
        let layers = doc.layers();

        assert_eq!(layers[0].tag, "rect");
        assert_eq!(layers[0].attribute("rx"), Some("56.32"));
        assert_eq!(layers[0].attribute("ry"), Some("56.32"));
        assert_eq!(layers[0].attribute("fill"), Some("#262626"));

        let groups = doc.icon_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].attribute("transform"),
            Some("translate(28, 28) scale(8.333333333333334)")
        );
        assert_eq!(groups[0].attribute("stroke"), Some("#fafafa"));
        assert_eq!(groups[0].attribute("stroke-width"), Some("1.7"));
    }

    #[test]
    fn root_has_canvas_dimensions() {
        let markup = render_vector(&home_config());
        assert!(markup.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"256\" height=\"256\" viewBox=\"0 0 256 256\">"
        ));
        assert!(markup.ends_with("</svg>"));
    }

    #[test]
    fn background_shapes() {
        let mut config = home_config();
        config.background.shape = Shape::Circle;
        let circle = document(&config).layers()[0].clone();
        assert_eq!(circle.tag, "circle");
        assert_eq!(circle.attribute("cx"), Some("128"));
        assert_eq!(circle.attribute("r"), Some("128"));

        config.background.shape = Shape::Square;
        let square = document(&config).layers()[0].clone();
        assert_eq!(square.tag, "rect");
        assert_eq!(square.attribute("rx"), None);
        assert_eq!(square.attribute("width"), Some("256"));
    }

    #[test]
    fn stroke_attributes_live_on_the_group_only() {
        let doc = document(&home_config());
        let group = doc.icon_groups()[0];
        assert!(!group.children.is_empty());
        for primitive in &group.children {
            assert!(primitive.attribute("stroke").is_none());
            assert!(primitive.attribute("stroke-width").is_none());
            assert!(primitive.attribute("children").is_none());
        }
    }

    #[test]
    fn overlay_layers_follow_primary() {
        let mut overlay = OverlayStyle::new("Plus");
        overlay.shape = Shape::Circle;
        overlay.background_color = Some(Color::BLACK);
        let doc = document(&home_config().with_overlay(overlay));
        let tags: Vec<&str> = doc.layers().iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, ["rect", "g", "circle", "g"]);

        let badge = &doc.layers()[2];
        assert_eq!(badge.attribute("cx"), Some("192.5"));
        assert_eq!(badge.attribute("cy"), Some("64.5"));
        assert_eq!(badge.attribute("r"), Some("43.5"));
        assert_eq!(badge.attribute("fill"), Some("#000000"));
        assert_eq!(badge.attribute("opacity"), Some("0.2"));

        let overlay_group = &doc.layers()[3];
        assert_eq!(
            overlay_group.attribute("transform"),
            Some("translate(165, 37) scale(2.2916666666666665)")
        );
    }

    #[test]
    fn transparent_badge_is_omitted() {
        let mut overlay = OverlayStyle::new("Plus");
        overlay.background_alpha = 0.0;
        let doc = document(&home_config().with_overlay(overlay));
        let tags: Vec<&str> = doc.layers().iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, ["rect", "g", "g"]);
    }

    #[test]
    fn unknown_icons_render_background_only() {
        let config = StyleConfig::with_primary_icon("NoSuchIcon")
            .with_overlay({
                let mut overlay = OverlayStyle::new("");
                overlay.background_alpha = 0.0;
                overlay
            });
        let doc = document(&config);
        assert_eq!(doc.layers().len(), 1);
        assert!(doc.icon_groups().is_empty());
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = home_config().with_overlay(OverlayStyle::new("Plus"));
        assert_eq!(render_vector(&config), render_vector(&config));
    }
}
