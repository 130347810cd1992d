//! Diagram serialization.
//!
//! The JSON interchange format is the serde form of [`PlayDiagram`]:
//! `{id, name, formation, players, assignments, timing, tags}` with camelCase
//! field names. It is used for exports, drafts and the save-play hand-off.

use std::path::Path;

use anyhow::{Context, Result};
use playkit_core::{DesignerError, ExportError};

use crate::model::PlayDiagram;

/// Serializes a diagram to pretty-printed JSON.
pub fn to_json(diagram: &PlayDiagram) -> Result<String, ExportError> {
    serde_json::to_string_pretty(diagram).map_err(|e| ExportError::Serialize {
        reason: e.to_string(),
    })
}

/// Parses a diagram from an outside source.
///
/// The parsed diagram is normalized, then validated; anything that cannot be
/// repaired is reported as [`DesignerError::InvalidDiagram`].
pub fn from_json(text: &str) -> Result<PlayDiagram, DesignerError> {
    let diagram: PlayDiagram =
        serde_json::from_str(text).map_err(|e| DesignerError::InvalidDiagram {
            reason: e.to_string(),
        })?;
    let diagram = diagram.normalized();
    diagram.validate()?;
    Ok(diagram)
}

/// Parses a stored draft, treating anything unusable as "no draft".
pub fn parse_draft(text: Option<&str>) -> Option<PlayDiagram> {
    let text = text?;
    match from_json(text) {
        Ok(diagram) => Some(diagram),
        Err(e) => {
            tracing::warn!("Ignoring unreadable draft: {}", e);
            None
        }
    }
}

/// Loads a diagram file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<PlayDiagram> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read diagram file: {}", path.display()))?;
    let diagram = from_json(&content)
        .with_context(|| format!("Failed to parse diagram file: {}", path.display()))?;
    Ok(diagram)
}

/// Writes a diagram file, creating parent directories as needed.
pub fn save_to_file(diagram: &PlayDiagram, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(diagram).context("Failed to serialize diagram")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write diagram file: {}", path.display()))?;
    Ok(())
}
