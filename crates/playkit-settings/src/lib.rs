//! PlayKit Settings Crate
//!
//! Handles application configuration and the local draft store used by
//! designer autosave.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, DesignerSettings, ExportSettings, PlaybackSettings, Theme, UiSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use persistence::{DraftStore, FileDraftStore, MemoryDraftStore};
