//! Export orchestration: renders a size set and hands the artifacts to a sink.
//!
//! Sizes are rendered strictly one after another, in plan order; each PNG is
//! encoded and saved before the next size is rendered. The vector artifact
//! comes last. A failure for one artifact is logged and recorded in the
//! [`ExportReport`], never aborting the remaining ones.

use crate::icon::IconCatalog;
use crate::raster::{encode_png, try_render_raster_with, RasterError};
use crate::style::StyleConfig;
use crate::vector::render_vector_with;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sizes every export contains.
pub const DEFAULT_SIZES: [u32; 4] = [16, 32, 48, 128];

/// Larger sizes that can be requested in addition.
pub const EXTRA_SIZES: [u32; 3] = [256, 512, 1024];

/// File name of the vector artifact.
pub const VECTOR_FILE_NAME: &str = "icon.svg";

/// File name of the raster artifact for `size`.
pub fn raster_file_name(size: u32) -> String {
    format!("icon-{size}.png")
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render {file_name}: {source}")]
    Render {
        file_name: String,
        #[source]
        source: RasterError,
    },

    #[error("failed to encode {file_name}: {source}")]
    Encode {
        file_name: String,
        #[source]
        source: RasterError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// ExportPlan
// ============================================================================

/// Ordered, de-duplicated list of raster sizes to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    sizes: Vec<u32>,
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self::new(DEFAULT_SIZES)
    }
}

impl ExportPlan {
    /// A plan with exactly these sizes, in order. Zero sizes and repeats
    /// are dropped.
    pub fn new(sizes: impl IntoIterator<Item = u32>) -> Self {
        let mut plan = Self { sizes: Vec::new() };
        plan.extend(sizes);
        plan
    }

    /// The default sizes followed by `extras`, in request order.
    pub fn with_extras(extras: impl IntoIterator<Item = u32>) -> Self {
        let mut plan = Self::default();
        plan.extend(extras);
        plan
    }

    fn extend(&mut self, sizes: impl IntoIterator<Item = u32>) {
        for size in sizes {
            if size > 0 && !self.sizes.contains(&size) {
                self.sizes.push(size);
            }
        }
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

// ============================================================================
// Artifacts and sinks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// PNG at the given pixel size.
    Raster(u32),
    /// SVG markup.
    Vector,
}

/// A named, fully encoded output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn raster(size: u32, bytes: Vec<u8>) -> Self {
        Self {
            file_name: raster_file_name(size),
            kind: ArtifactKind::Raster(size),
            bytes,
        }
    }

    pub fn vector(markup: String) -> Self {
        Self {
            file_name: VECTOR_FILE_NAME.to_string(),
            kind: ArtifactKind::Vector,
            bytes: markup.into_bytes(),
        }
    }
}

/// Destination for exported artifacts.
pub trait ArtifactSink {
    fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError>;
}

/// Writes artifacts as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates the sink, creating `dir` (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
        let path = self.dir.join(&artifact.file_name);
        fs::write(&path, &artifact.bytes).map_err(|source| ExportError::Io { path, source })
    }
}

/// Keeps artifacts in memory, in save order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }
}

impl ArtifactSink for MemorySink {
    fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

// ============================================================================
// Export
// ============================================================================

/// Outcome of an export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// File names that reached the sink, in save order.
    pub saved: Vec<String>,
    pub failed: Vec<ExportError>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, file_name: String, result: Result<(), ExportError>) {
        match result {
            Ok(()) => self.saved.push(file_name),
            Err(err) => {
                log::warn!("{err}");
                self.failed.push(err);
            }
        }
    }
}

/// Exports `config` with the bundled catalog.
pub fn export<S: ArtifactSink + ?Sized>(
    config: &StyleConfig,
    plan: &ExportPlan,
    sink: &mut S,
) -> ExportReport {
    export_with(config, plan, IconCatalog::bundled(), sink)
}

/// Renders every size of `plan`, then the vector document, saving each
/// artifact to `sink` as soon as it is encoded.
pub fn export_with<S: ArtifactSink + ?Sized>(
    config: &StyleConfig,
    plan: &ExportPlan,
    catalog: &IconCatalog,
    sink: &mut S,
) -> ExportReport {
    let mut report = ExportReport::default();

    for &size in plan.sizes() {
        let file_name = raster_file_name(size);
        log::info!("exporting {file_name}");
        let result = try_render_raster_with(config, size, catalog)
            .map_err(|source| ExportError::Render {
                file_name: file_name.clone(),
                source,
            })
            .and_then(|image| {
                encode_png(&image).map_err(|source| ExportError::Encode {
                    file_name: file_name.clone(),
                    source,
                })
            })
            .and_then(|bytes| sink.save(&Artifact::raster(size, bytes)));
        report.record(file_name, result);
    }

    log::info!("exporting {VECTOR_FILE_NAME} at {}px", config.canvas_size);
    let artifact = Artifact::vector(render_vector_with(config, catalog));
    let result = sink.save(&artifact);
    report.record(artifact.file_name, result);

    log::info!(
        "export finished: {} saved, {} failed",
        report.saved.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::OverlayStyle;

    struct FailingSink {
        fail_on: &'static str,
        saved: Vec<String>,
    }

    impl ArtifactSink for FailingSink {
        fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
            if artifact.file_name == self.fail_on {
                return Err(ExportError::Io {
                    path: PathBuf::from(&artifact.file_name),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.saved.push(artifact.file_name.clone());
            Ok(())
        }
    }

    #[test]
    fn plan_defaults_then_extras() {
        assert_eq!(ExportPlan::default().sizes(), DEFAULT_SIZES);
        let plan = ExportPlan::with_extras([1024, 256, 1024, 0, 32]);
        assert_eq!(plan.sizes(), [16, 32, 48, 128, 1024, 256]);
    }

    #[test]
    fn plan_new_drops_zero_and_repeats() {
        let plan = ExportPlan::new([0, 64, 64, 8]);
        assert_eq!(plan.sizes(), [64, 8]);
        assert!(ExportPlan::new([0]).is_empty());
    }

    #[test]
    fn file_names() {
        assert_eq!(raster_file_name(128), "icon-128.png");
        assert_eq!(Artifact::vector(String::new()).file_name, "icon.svg");
    }

    #[test]
    fn export_saves_in_plan_order() {
        let config = StyleConfig::with_primary_icon("House").with_overlay(OverlayStyle::new("Plus"));
        let plan = ExportPlan::with_extras([256]);
        let mut sink = MemorySink::new();

        let report = export(&config, &plan, &mut sink);

        assert!(report.is_complete());
        assert_eq!(
            sink.file_names(),
            [
                "icon-16.png",
                "icon-32.png",
                "icon-48.png",
                "icon-128.png",
                "icon-256.png",
                "icon.svg",
            ]
        );
        assert_eq!(report.saved.len(), 6);

        let png = sink.get("icon-48.png").unwrap();
        assert_eq!(png.kind, ArtifactKind::Raster(48));
        assert_eq!(&png.bytes[..4], b"\x89PNG");

        let svg = String::from_utf8(sink.get("icon.svg").unwrap().bytes.clone()).unwrap();
        assert!(svg.contains("width=\"256\""));
    }

    #[test]
    fn failed_save_does_not_abort() {
        let config = StyleConfig::with_primary_icon("House");
        let mut sink = FailingSink {
            fail_on: "icon-32.png",
            saved: Vec::new(),
        };

        let report = export(&config, &ExportPlan::default(), &mut sink);

        assert!(!report.is_complete());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(
            sink.saved,
            ["icon-16.png", "icon-48.png", "icon-128.png", "icon.svg"]
        );
    }

    #[test]
    fn unrenderable_size_does_not_abort() {
        let config = StyleConfig::with_primary_icon("House");
        let mut sink = MemorySink::new();

        let report = export(&config, &ExportPlan::new([16, u32::MAX / 2, 32]), &mut sink);

        assert_eq!(sink.file_names(), ["icon-16.png", "icon-32.png", "icon.svg"]);
        assert_eq!(report.saved, ["icon-16.png", "icon-32.png", "icon.svg"]);
        assert!(matches!(
            report.failed.as_slice(),
            [ExportError::Render { file_name, source: RasterError::Allocation(_) }]
                if *file_name == raster_file_name(u32::MAX / 2)
        ));
    }

    #[test]
    fn directory_sink_writes_files() {
        let dir = std::env::temp_dir().join(format!("exticon-export-{}", std::process::id()));
        let mut sink = DirectorySink::create(&dir).unwrap();

        let report = export(
            &StyleConfig::with_primary_icon("House"),
            &ExportPlan::new([16]),
            &mut sink,
        );

        assert!(report.is_complete());
        assert!(dir.join("icon-16.png").is_file());
        assert!(dir.join("icon.svg").is_file());
        fs::remove_dir_all(&dir).unwrap();
    }
}
