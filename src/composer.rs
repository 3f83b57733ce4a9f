//! Caller-side facade: holds editor state and drives the renderers.

use crate::export::{export_with, ArtifactSink, ExportReport};
use crate::icon::IconCatalog;
use crate::profile::StyleProfile;
use crate::raster::{encode_png, render_raster_with, try_render_raster_with, RasterError};
use crate::style::StyleConfig;
use crate::vector::render_vector_with;
use image::RgbaImage;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`StyleProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &StyleProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> StyleProfile;
}

// ============================================================================
// Selection
// ============================================================================

/// What [`IconComposer::select_icon`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    PrimarySet,
    PrimaryCleared,
    SecondarySet,
    /// The secondary icon was already set and got replaced.
    SecondaryReplaced,
    SecondaryCleared,
    /// The name is not in the catalog; nothing changed.
    Ignored,
}

// ============================================================================
// IconComposer
// ============================================================================

/// Editor state plus the catalog it picks icons from.
///
/// The composer owns a [`StyleProfile`] (the raw editor values) and builds
/// a fresh [`StyleConfig`] for every render.
///
/// # Example
///
/// ```
/// use exticon_renderer::{IconComposer, MemorySink, Selection};
///
/// let mut composer = IconComposer::new();
/// assert_eq!(composer.select_icon("House"), Selection::PrimarySet);
/// assert_eq!(composer.select_icon("Plus"), Selection::SecondarySet);
///
/// let svg = composer.render_svg();
/// assert!(svg.starts_with("<svg"));
///
/// let mut sink = MemorySink::new();
/// let report = composer.export(&mut sink);
/// assert!(report.is_complete());
/// ```
pub struct IconComposer<'c> {
    catalog: &'c IconCatalog,

    /// Current editor values. Edit directly for anything besides icon
    /// selection.
    pub profile: StyleProfile,
}

impl IconComposer<'static> {
    /// Creates a composer over the bundled catalog with default settings.
    pub fn new() -> Self {
        Self::with_catalog(IconCatalog::bundled())
    }
}

impl Default for IconComposer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> IconComposer<'c> {
    pub fn with_catalog(catalog: &'c IconCatalog) -> Self {
        Self {
            catalog,
            profile: StyleProfile::default(),
        }
    }

    pub fn catalog(&self) -> &'c IconCatalog {
        self.catalog
    }

    /// Currently selected primary icon, if any.
    pub fn primary_icon(&self) -> Option<&str> {
        Some(self.profile.primary.icon.as_str()).filter(|name| !name.is_empty())
    }

    /// Currently selected secondary (overlay) icon, if any.
    pub fn secondary_icon(&self) -> Option<&str> {
        Some(self.profile.overlay.icon.as_str()).filter(|name| !name.is_empty())
    }

    /// Toggles `name` in the selection.
    ///
    /// Picking the current primary or secondary icon clears it. Otherwise
    /// the name fills the primary slot if it is empty, then the secondary
    /// slot; when both are taken the secondary is replaced.
    pub fn select_icon(&mut self, name: &str) -> Selection {
        if self.primary_icon() == Some(name) {
            self.clear_primary();
            return Selection::PrimaryCleared;
        }
        if self.secondary_icon() == Some(name) {
            self.clear_secondary();
            return Selection::SecondaryCleared;
        }
        if !self.catalog.contains(name) {
            log::debug!("ignoring selection of unknown icon {name:?}");
            return Selection::Ignored;
        }
        if self.primary_icon().is_none() {
            self.profile.primary.icon = name.to_string();
            return Selection::PrimarySet;
        }
        let replaced = self.secondary_icon().is_some();
        self.profile.overlay.icon = name.to_string();
        if replaced {
            Selection::SecondaryReplaced
        } else {
            Selection::SecondarySet
        }
    }

    pub fn clear_primary(&mut self) {
        self.profile.primary.icon.clear();
    }

    /// Clears the secondary icon, which removes the overlay and its badge.
    pub fn clear_secondary(&mut self) {
        self.profile.overlay.icon.clear();
    }

    /// Catalog names matching `query` (case-insensitive substring).
    pub fn filtered_icons(&self, query: &str) -> Vec<&'c str> {
        self.catalog.search(query)
    }

    /// Validated configuration for the current editor values.
    pub fn style_config(&self) -> StyleConfig {
        self.profile.to_style_config()
    }

    /// Renders the composition as SVG markup at the profile's canvas size.
    pub fn render_svg(&self) -> String {
        render_vector_with(&self.style_config(), self.catalog)
    }

    /// Renders the composition at `size` pixels.
    pub fn render_image(&self, size: u32) -> RgbaImage {
        render_raster_with(&self.style_config(), size, self.catalog)
    }

    /// Renders the composition at `size` pixels as PNG bytes.
    pub fn render_png(&self, size: u32) -> Result<Vec<u8>, RasterError> {
        encode_png(&try_render_raster_with(&self.style_config(), size, self.catalog)?)
    }

    /// Exports the profile's plan (default sizes, extras, SVG) into `sink`.
    pub fn export<S: ArtifactSink + ?Sized>(&self, sink: &mut S) -> ExportReport {
        export_with(
            &self.style_config(),
            &self.profile.export_plan(),
            self.catalog,
            sink,
        )
    }
}

impl Configurable for IconComposer<'_> {
    fn apply_profile(&mut self, profile: &StyleProfile) {
        self.profile = profile.clone();
    }

    fn export_profile(&self) -> StyleProfile {
        self.profile.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
