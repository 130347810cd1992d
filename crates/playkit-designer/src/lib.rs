//! # PlayKit Designer
//!
//! Authoring, animation and export for football play diagrams.
//!
//! ## Core Components
//!
//! - **Model**: Players, assignments, timing steps and the diagram document
//! - **Viewport**: Logical field coordinates to display pixels and back
//! - **Formations**: Built-in offensive and defensive alignments
//! - **Designer State**: The session object every edit goes through
//! - **Canvas**: Pointer input mapped onto session operations
//! - **Playback**: Step-by-step animation driven by an injectable clock
//! - **SVG Renderer**: Pure diagram/session/frame to SVG rendering
//! - **Export**: JSON, SVG and PNG artifacts
//!
//! ## Architecture
//!
//! ```text
//! Pointer input
//!   └── Canvas ──> DesignerState ──> PlayDiagram
//!                      │
//!                      ├── EventBus (redraw notifications)
//!                      └── DraftStore (autosave)
//!
//! PlayDiagram ──> SvgRenderer ──> Exporter (json / svg / png)
//!             └── PlaybackEngine ──> PlaybackFrame ──> SvgRenderer
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use playkit_designer::{DesignerState, FormationLibrary, Side};
//!
//! let mut state = DesignerState::new();
//! state.load_formation_from(&FormationLibrary::new(), Side::Offense, "shotgun")?;
//! let diagram = state.export_diagram();
//! ```

pub mod canvas;
pub mod designer_state;
pub mod export;
pub mod formations;
pub mod model;
pub mod playback;
pub mod serialization;
pub mod svg_renderer;
pub mod viewport;

pub use canvas::{CanvasSurface, DesignerTool, HitTarget, ListenerLedger, PlayerRef, PointerEvent};
pub use export::{
    Artifact, ArtifactSink, DirectorySink, ExportFormat, Exporter, MemoryPlaySink, MemorySink,
    PlaySink,
};
pub use formations::{Formation, FormationLibrary, FormationSource};
pub use model::{
    slugify, Assignment, AssignmentType, FormationLabels, PathStyle, PlayDiagram, PlayerPosition,
    Point, Side, SideAssignments, SidePlayers, TimingStep,
};
pub use playback::{PlaybackEngine, PlaybackFrame, PlaybackState, RevealedPath};
pub use svg_renderer::{RenderOptions, SvgRenderer};
pub use viewport::{FieldTransform, SurfaceBounds};

// State
pub use designer_state::DesignerState;
