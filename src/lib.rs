//! # PlayKit
//!
//! Football play diagrams: author them, step through them, export them.
//!
//! ## Architecture
//!
//! PlayKit is organized as a workspace with multiple crates:
//!
//! 1. **playkit-core** - Field constants, error taxonomy, event bus, clocks
//! 2. **playkit-settings** - Configuration file and draft persistence
//! 3. **playkit-designer** - Model, designer session, canvas, playback, rendering, export
//! 4. **playkit** - Command-line binary that ties the crates together
//!
//! ## Features
//!
//! - **Designer Session**: Place, drag and erase players; draw routes and blocks
//! - **Formations**: Built-in offensive and defensive alignments
//! - **Playback**: Step-by-step animation with adjustable speed
//! - **Export**: JSON interchange, SVG diagrams and PNG images
//! - **Drafts**: Debounced autosave to a local draft store

pub use playkit_core as core;
pub use playkit_designer as designer;
pub use playkit_settings as settings;

pub use playkit_core::{
    AppEvent, Clock, DesignerError, Error, EventBus, EventFilter, ExportError, ManualClock,
    PersistenceError, Result, SystemClock,
};

pub use playkit_designer::{
    Artifact, ArtifactSink, CanvasSurface, DesignerState, DesignerTool, DirectorySink,
    ExportFormat, Exporter, FormationLibrary, FormationSource, PlayDiagram, PlaybackEngine,
    Point, Side, SvgRenderer,
};

pub use playkit_settings::{Config, DraftStore, FileDraftStore, MemoryDraftStore, Theme};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty formatted output on stderr, keeping stdout for command output
/// - RUST_LOG environment variable support
/// - `info` as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
