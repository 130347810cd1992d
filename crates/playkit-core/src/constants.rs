//! Field geometry and timing constants shared by every PlayKit crate.

/// Logical field width (x extent).
pub const FIELD_WIDTH: f64 = 100.0;

/// Logical field height (y extent).
pub const FIELD_HEIGHT: f64 = 75.0;

/// Display pixels per logical unit.
pub const SCALE: f64 = 8.0;

/// Inset from every field edge that dragged or placed players are clamped to.
pub const CLAMP_MARGIN: f64 = 3.0;

/// Radius of a player marker in logical units (also the hit radius).
pub const PLAYER_RADIUS: f64 = 2.5;

/// Line of scrimmage drawn on the field, in logical y.
pub const LINE_OF_SCRIMMAGE_Y: f64 = 40.0;

/// Keep every Nth point of the live drawing buffer when rendering it.
pub const DRAWING_DECIMATION: usize = 3;

/// Playback delay between steps at 1x speed.
pub const BASE_STEP_DELAY_MS: u64 = 1200;

/// Slowest playback multiplier offered.
pub const MIN_PLAYBACK_SPEED: f64 = 0.5;

/// Fastest playback multiplier offered.
pub const MAX_PLAYBACK_SPEED: f64 = 2.0;

/// Path progress at which arrowheads become visible.
pub const ARROW_PROGRESS_THRESHOLD: f64 = 0.95;

/// Idle window before an autosave fires.
pub const AUTOSAVE_IDLE_MS: u64 = 30_000;

/// Local persistence key of the in-progress draft.
pub const DRAFT_KEY: &str = "designer-draft";

/// Default raster export width in pixels.
pub const EXPORT_PNG_WIDTH: u32 = 800;

/// Default raster export height in pixels.
pub const EXPORT_PNG_HEIGHT: u32 = 600;
