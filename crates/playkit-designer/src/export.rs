//! Export pipeline: JSON, SVG and PNG artifacts.
//!
//! Exports read the model and never modify it. Artifacts go to an
//! [`ArtifactSink`]; the serialized play can also be handed to a
//! [`PlaySink`] owned by the host's content store.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use playkit_core::constants::{EXPORT_PNG_HEIGHT, EXPORT_PNG_WIDTH};
use playkit_core::{AppEvent, EventBus, ExportError, ExportEvent, PersistenceError};
use playkit_settings::{ExportSettings, Theme};

use crate::designer_state::DesignerState;
use crate::model::{slugify, PlayDiagram};
use crate::serialization;
use crate::svg_renderer::SvgRenderer;

/// Artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
        }
    }

    /// File name for `diagram`: JSON uses the diagram id, images the
    /// slugified play name.
    pub fn file_name(&self, diagram: &PlayDiagram) -> String {
        let stem = match self {
            ExportFormat::Json => diagram.id.clone(),
            ExportFormat::Svg | ExportFormat::Png => slugify(&diagram.name),
        };
        format!("{}.{}", stem, self.extension())
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// A finished export, ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// The "download" boundary artifacts are delivered to.
pub trait ArtifactSink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<(), ExportError>;
}

/// Writes artifacts into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    delivered: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delivered: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in delivery order.
    pub fn delivered(&self) -> &[PathBuf] {
        &self.delivered
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
        let delivery_error = |e: std::io::Error| ExportError::Delivery {
            file_name: artifact.file_name.clone(),
            reason: e.to_string(),
        };
        std::fs::create_dir_all(&self.dir).map_err(delivery_error)?;
        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes).map_err(delivery_error)?;
        self.delivered.push(path);
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// External "save play" boundary. Receives the serialized diagram as an
/// opaque string.
pub trait PlaySink {
    fn save_play(&mut self, name: &str, payload: &str) -> Result<(), PersistenceError>;
}

/// Keeps handed-off plays in memory as `(name, payload)` pairs.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlaySink {
    pub plays: Vec<(String, String)>,
}

impl PlaySink for MemoryPlaySink {
    fn save_play(&mut self, name: &str, payload: &str) -> Result<(), PersistenceError> {
        self.plays.push((name.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Produces artifacts from diagrams.
#[derive(Clone)]
pub struct Exporter {
    renderer: SvgRenderer,
    png_width: u32,
    png_height: u32,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(SvgRenderer::default())
    }
}

impl Exporter {
    /// Creates an exporter with system fonts for PNG text.
    pub fn new(renderer: SvgRenderer) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self::with_fonts(renderer, Arc::new(fontdb))
    }

    /// Creates an exporter with an explicit font database.
    pub fn with_fonts(renderer: SvgRenderer, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            renderer,
            png_width: EXPORT_PNG_WIDTH,
            png_height: EXPORT_PNG_HEIGHT,
            fontdb,
        }
    }

    /// An exporter that matches a session's view flags.
    pub fn for_session(state: &DesignerState, settings: &ExportSettings, theme: Theme) -> Self {
        Self::new(SvgRenderer::for_session(state, theme))
            .with_png_size(settings.png_width, settings.png_height)
    }

    pub fn with_png_size(mut self, width: u32, height: u32) -> Self {
        self.png_width = width;
        self.png_height = height;
        self
    }

    pub fn renderer(&self) -> &SvgRenderer {
        &self.renderer
    }

    pub fn png_size(&self) -> (u32, u32) {
        (self.png_width, self.png_height)
    }

    /// Produces one artifact.
    pub fn export(
        &self,
        diagram: &PlayDiagram,
        format: ExportFormat,
    ) -> Result<Artifact, ExportError> {
        let bytes = match format {
            ExportFormat::Json => serialization::to_json(diagram)?.into_bytes(),
            ExportFormat::Svg => self.renderer.render_diagram(diagram).into_bytes(),
            ExportFormat::Png => {
                let svg = self.renderer.render_diagram(diagram);
                self.rasterize(&svg)?
            }
        };

        Ok(Artifact {
            file_name: format.file_name(diagram),
            mime_type: format.mime_type(),
            bytes,
        })
    }

    /// Exports and delivers, swallowing failures.
    ///
    /// Returns `true` when the artifact reached the sink. Failures are
    /// logged and published on `events`; nothing propagates.
    pub fn export_to_sink(
        &self,
        diagram: &PlayDiagram,
        format: ExportFormat,
        sink: &mut dyn ArtifactSink,
        events: &EventBus,
    ) -> bool {
        let result = self
            .export(diagram, format)
            .and_then(|artifact| sink.deliver(&artifact).map(|()| artifact));

        match result {
            Ok(artifact) => {
                tracing::info!(
                    "Exported {} ({} bytes)",
                    artifact.file_name,
                    artifact.bytes.len()
                );
                let _ = events.publish(AppEvent::Export(ExportEvent::ArtifactProduced {
                    file_name: artifact.file_name,
                    bytes: artifact.bytes.len(),
                }));
                true
            }
            Err(e) => {
                tracing::warn!("{} export failed: {}", format, e);
                let _ = events.publish(AppEvent::Export(ExportEvent::ExportFailed {
                    format: format.to_string(),
                    reason: e.to_string(),
                }));
                false
            }
        }
    }

    /// Rasterizes SVG markup to PNG bytes at the configured size.
    ///
    /// The markup is fully parsed before the draw; encoding only starts once
    /// the draw has completed.
    pub fn rasterize(&self, svg: &str) -> Result<Vec<u8>, ExportError> {
        let (width, height) = (self.png_width, self.png_height);
        let raster_error = || ExportError::Raster { width, height };

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| ExportError::SvgParse {
            reason: e.to_string(),
        })?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(raster_error)?;
        let size = tree.size();
        if size.width() <= 0.0 || size.height() <= 0.0 {
            return Err(raster_error());
        }
        let sx = width as f32 / size.width();
        let sy = height as f32 / size.height();
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        let rgba = straight_rgba(&pixmap);
        let image = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(raster_error)?;

        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| ExportError::Encode {
                reason: e.to_string(),
            })?;
        Ok(png)
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("renderer", &self.renderer)
            .field("png_width", &self.png_width)
            .field("png_height", &self.png_height)
            .field("fonts", &self.fontdb.len())
            .finish()
    }
}

/// Straight-alpha RGBA8 bytes of a drawn (premultiplied) pixmap.
fn straight_rgba(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
