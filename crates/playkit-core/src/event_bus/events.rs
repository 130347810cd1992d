//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so they can be logged or replayed.
//! Sides and tools travel as their lower-case wire names.

use serde::{Deserialize, Serialize};

/// Root event enum for all designer and playback events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Diagram content changed
    Diagram(DiagramEvent),
    /// Tool, selection, drawing buffer or view flags changed
    Tool(ToolEvent),
    /// Playback position or transport changed
    Playback(PlaybackEvent),
    /// Draft storage and save-play hand-off
    Persistence(PersistenceEvent),
    /// Export artifacts
    Export(ExportEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Diagram(_) => EventCategory::Diagram,
            AppEvent::Tool(_) => EventCategory::Tool,
            AppEvent::Playback(_) => EventCategory::Playback,
            AppEvent::Persistence(_) => EventCategory::Persistence,
            AppEvent::Export(_) => EventCategory::Export,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Diagram(e) => e.description(),
            AppEvent::Tool(e) => e.description(),
            AppEvent::Playback(e) => e.description(),
            AppEvent::Persistence(e) => e.description(),
            AppEvent::Export(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Diagram content events.
    Diagram,
    /// Tool and view events.
    Tool,
    /// Playback events.
    Playback,
    /// Persistence events.
    Persistence,
    /// Export events.
    Export,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diagram => write!(f, "Diagram"),
            Self::Tool => write!(f, "Tool"),
            Self::Playback => write!(f, "Playback"),
            Self::Persistence => write!(f, "Persistence"),
            Self::Export => write!(f, "Export"),
        }
    }
}

/// Diagram content events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagramEvent {
    PlayerAdded {
        side: String,
        player_id: String,
        x: f64,
        y: f64,
    },
    PlayerMoved {
        side: String,
        player_id: String,
        x: f64,
        y: f64,
    },
    PlayerUpdated {
        side: String,
        player_id: String,
    },
    PlayerRemoved {
        side: String,
        player_id: String,
    },
    AssignmentCommitted {
        side: String,
        player_id: String,
        kind: String,
        points: usize,
    },
    AssignmentUpdated {
        side: String,
        player_id: String,
    },
    AssignmentRemoved {
        side: String,
        player_id: String,
    },
    FormationLoaded {
        side: String,
        formation_id: String,
        players: usize,
    },
    TimingChanged {
        steps: usize,
    },
    MetadataChanged {
        name: String,
    },
    /// "New play"
    Reset,
    Loaded {
        diagram_id: String,
    },
}

impl DiagramEvent {
    pub fn description(&self) -> String {
        match self {
            Self::PlayerAdded {
                side, player_id, ..
            } => format!("Added {} player {}", side, player_id),
            Self::PlayerMoved {
                side,
                player_id,
                x,
                y,
            } => format!("Moved {} player {} to ({:.1}, {:.1})", side, player_id, x, y),
            Self::PlayerUpdated { side, player_id } => {
                format!("Updated {} player {}", side, player_id)
            }
            Self::PlayerRemoved { side, player_id } => {
                format!("Removed {} player {}", side, player_id)
            }
            Self::AssignmentCommitted {
                side,
                player_id,
                kind,
                points,
            } => format!(
                "Committed {} for {} player {} ({} points)",
                kind, side, player_id, points
            ),
            Self::AssignmentUpdated { side, player_id } => {
                format!("Updated assignment of {} player {}", side, player_id)
            }
            Self::AssignmentRemoved { side, player_id } => {
                format!("Removed assignment of {} player {}", side, player_id)
            }
            Self::FormationLoaded {
                side,
                formation_id,
                players,
            } => format!(
                "Loaded {} formation {} ({} players)",
                side, formation_id, players
            ),
            Self::TimingChanged { steps } => format!("Timeline now has {} steps", steps),
            Self::MetadataChanged { name } => format!("Play renamed to '{}'", name),
            Self::Reset => "New play".to_string(),
            Self::Loaded { diagram_id } => format!("Loaded diagram {}", diagram_id),
        }
    }
}

/// Tool, selection and view events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolEvent {
    ToolChanged {
        tool: String,
    },
    SelectionChanged {
        side: Option<String>,
        player_id: Option<String>,
    },
    DrawingChanged {
        points: usize,
    },
    ViewChanged {
        show_defense: bool,
        flipped: bool,
    },
}

impl ToolEvent {
    pub fn description(&self) -> String {
        match self {
            Self::ToolChanged { tool } => format!("Tool set to {}", tool),
            Self::SelectionChanged { side, player_id } => match (side, player_id) {
                (Some(side), Some(id)) => format!("Selected {} player {}", side, id),
                _ => "Selection cleared".to_string(),
            },
            Self::DrawingChanged { points } => format!("Drawing buffer has {} points", points),
            Self::ViewChanged {
                show_defense,
                flipped,
            } => format!("View: defense={} flipped={}", show_defense, flipped),
        }
    }
}

/// Playback events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    StepChanged { step: usize, total: usize },
    PlayStateChanged { playing: bool },
    SpeedChanged { speed: f64 },
}

impl PlaybackEvent {
    pub fn description(&self) -> String {
        match self {
            Self::StepChanged { step, total } => format!("Step {}/{}", step, total),
            Self::PlayStateChanged { playing } => {
                if *playing {
                    "Playing".to_string()
                } else {
                    "Paused".to_string()
                }
            }
            Self::SpeedChanged { speed } => format!("Speed {:.2}x", speed),
        }
    }
}

/// Persistence events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersistenceEvent {
    DraftSaved { key: String, bytes: usize },
    DraftSaveFailed { key: String, reason: String },
    DraftLoaded { key: String },
    PlayHandedOff { name: String, bytes: usize },
}

impl PersistenceEvent {
    pub fn description(&self) -> String {
        match self {
            Self::DraftSaved { key, bytes } => format!("Draft '{}' saved ({} bytes)", key, bytes),
            Self::DraftSaveFailed { key, reason } => {
                format!("Draft '{}' not saved: {}", key, reason)
            }
            Self::DraftLoaded { key } => format!("Draft '{}' restored", key),
            Self::PlayHandedOff { name, bytes } => {
                format!("Play '{}' handed to store ({} bytes)", name, bytes)
            }
        }
    }
}

/// Export events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportEvent {
    ArtifactProduced { file_name: String, bytes: usize },
    ExportFailed { format: String, reason: String },
}

impl ExportEvent {
    pub fn description(&self) -> String {
        match self {
            Self::ArtifactProduced { file_name, bytes } => {
                format!("Exported {} ({} bytes)", file_name, bytes)
            }
            Self::ExportFailed { format, reason } => format!("{} export failed: {}", format, reason),
        }
    }
}
