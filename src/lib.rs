//! exticon-renderer: composite icon renderer
//!
//! This crate composes up to two Lucide glyphs onto a background shape and
//! renders the result as SVG markup or as PNG images of any size. Both
//! outputs are driven by the same layout and the same layer stack, so a
//! vector export and a raster export of one configuration agree.
//!
//! # Example
//!
//! ```
//! use exticon_renderer::{render_raster, render_vector, OverlayStyle, StyleConfig};
//!
//! let config = StyleConfig::with_primary_icon("House")
//!     .with_overlay(OverlayStyle::new("Plus"));
//!
//! let svg = render_vector(&config);
//! assert!(svg.contains("translate(28, 28)"));
//!
//! let image = render_raster(&config, 48);
//! assert_eq!(image.dimensions(), (48, 48));
//! ```
//!
//! # Serializable Profiles
//!
//! Editor state travels as a [`StyleProfile`] (camelCase JSON), which is
//! validated into a [`StyleConfig`] before rendering. [`IconComposer`]
//! wraps a profile with the icon selection rules and export:
//!
//! ```
//! use exticon_renderer::{Configurable, IconComposer, StyleProfile};
//!
//! let mut composer = IconComposer::new();
//! composer.apply_profile(&StyleProfile::from_json(r#"{"primary": {"icon": "Star"}}"#).unwrap());
//!
//! let png = composer.render_png(32).unwrap();
//! let json = composer.export_profile().to_json().unwrap();
//! ```

mod color;
mod composer;
mod export;
mod icon;
mod layer;
mod layout;
mod profile;
mod raster;
mod style;
mod vector;

#[cfg(feature = "cli")]
mod cli;

#[cfg(feature = "cli")]
pub use cli::run;

pub use color::Color;
pub use composer::{Configurable, IconComposer, Selection};
pub use export::{
    export, export_with, raster_file_name, Artifact, ArtifactKind, ArtifactSink, DirectorySink,
    ExportError, ExportPlan, ExportReport, MemorySink, DEFAULT_SIZES, EXTRA_SIZES,
    VECTOR_FILE_NAME,
};
pub use icon::{
    is_valid_icon_name, AttrValue, IconCatalog, IconGlyph, IconPrimitive, PrimitiveKind,
    DESIGN_GRID,
};
pub use layer::{GlyphLayer, LayerEffect, LayerKind, LayerStack, ShapeLayer, ShapeOutline};
pub use layout::{compute_layout, round_half_up, LayerGeometry, Layout, OverlayGeometry};
pub use profile::{
    BackgroundSettings, ExportSettings, OverlaySettings, PrimarySettings, SerializableShape,
    StyleProfile,
};
pub use raster::{
    encode_png, render_layers, render_raster, render_raster_with, try_render_raster_with, RasterError,
};
pub use style::{
    BackgroundStyle, OverlayStyle, PrimaryStyle, Shape, StyleConfig, CANVAS_SIZE,
    ROUNDED_CORNER_FRACTION,
};
pub use vector::{
    format_number, render_document, render_vector, render_vector_with, VectorDocument, VectorNode,
};
