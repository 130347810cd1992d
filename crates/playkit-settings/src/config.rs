//! Configuration and settings management for PlayKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Designer settings (autosave window, draft key, clamp margin)
//! - Playback settings (step delay, speed range)
//! - Export settings (raster size, output directory)
//! - UI preferences (theme, initial view flags)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use playkit_core::constants;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "playkit";

/// Theme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Grass field with white markings
    #[default]
    Field,
    /// White board with dark markings, for printing
    Whiteboard,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field => write!(f, "Field"),
            Self::Whiteboard => write!(f, "Whiteboard"),
        }
    }
}

/// Designer session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerSettings {
    /// Idle seconds before an unsaved draft is written
    pub autosave_idle_secs: u64,
    /// Local persistence key of the draft
    pub draft_key: String,
    /// Inset from field edges that players are clamped to
    pub clamp_margin: f64,
}

impl Default for DesignerSettings {
    fn default() -> Self {
        Self {
            autosave_idle_secs: constants::AUTOSAVE_IDLE_MS / 1000,
            draft_key: constants::DRAFT_KEY.to_string(),
            clamp_margin: constants::CLAMP_MARGIN,
        }
    }
}

/// Playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Delay between steps at 1x
    pub base_step_delay_ms: u64,
    /// Speed multiplier used when an engine is created
    pub default_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            base_step_delay_ms: constants::BASE_STEP_DELAY_MS,
            default_speed: 1.0,
            min_speed: constants::MIN_PLAYBACK_SPEED,
            max_speed: constants::MAX_PLAYBACK_SPEED,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Raster export width in pixels
    pub png_width: u32,
    /// Raster export height in pixels
    pub png_height: u32,
    /// Directory artifacts are written to
    pub output_directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            png_width: constants::EXPORT_PNG_WIDTH,
            png_height: constants::EXPORT_PNG_HEIGHT,
            output_directory: dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// UI preference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub theme: Theme,
    /// Show defensive players when a session starts
    pub show_defense: bool,
    /// Start sessions in the flipped orientation
    pub flipped: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_defense: true,
            flipped: false,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub designer: DesignerSettings,
    pub playback: PlaybackSettings,
    pub export: ExportSettings,
    pub ui: UiSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for PlayKit
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Default location of the config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory used by the file-backed draft store
    pub fn drafts_dir() -> SettingsResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("drafts"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no data directory on this platform".to_string())
            })
    }

    /// Load config from the default location, falling back to defaults when absent
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Ok(path) if path.exists() => match Self::load_from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(ConfigError::UnsupportedFormat(
                path.extension()
                    .map(|ext| ext.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )
            .into());
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(ConfigError::UnsupportedFormat(
                path.extension()
                    .map(|ext| ext.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )
            .into());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
            ConfigError::ValueOutOfRange {
                key: key.to_string(),
                value: value.to_string(),
            }
        }

        if self.designer.autosave_idle_secs == 0 {
            return Err(out_of_range("designer.autosave_idle_secs", 0));
        }
        if self.designer.draft_key.trim().is_empty() {
            return Err(out_of_range("designer.draft_key", "\"\""));
        }
        let max_margin = constants::FIELD_HEIGHT.min(constants::FIELD_WIDTH) / 2.0;
        if !(0.0..max_margin).contains(&self.designer.clamp_margin) {
            return Err(out_of_range(
                "designer.clamp_margin",
                self.designer.clamp_margin,
            ));
        }

        let playback = &self.playback;
        if playback.base_step_delay_ms == 0 {
            return Err(out_of_range("playback.base_step_delay_ms", 0));
        }
        if !(playback.min_speed > 0.0 && playback.min_speed <= playback.max_speed) {
            return Err(out_of_range("playback.min_speed", playback.min_speed));
        }
        if !(playback.min_speed..=playback.max_speed).contains(&playback.default_speed) {
            return Err(out_of_range(
                "playback.default_speed",
                playback.default_speed,
            ));
        }

        if self.export.png_width == 0 || self.export.png_height == 0 {
            return Err(out_of_range(
                "export.png_size",
                format!("{}x{}", self.export.png_width, self.export.png_height),
            ));
        }

        Ok(())
    }
}
