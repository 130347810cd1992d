//! Lifecycle and persistence: new, load, export, draft autosave, hand-off.

use std::path::Path;

use playkit_core::{AppEvent, DiagramEvent, PersistenceError, PersistenceEvent, ToolEvent};

use super::{DesignerState, IdCounters};
use crate::canvas::DesignerTool;
use crate::export::PlaySink;
use crate::model::PlayDiagram;
use crate::serialization;

impl DesignerState {
    /// Discards the current play and starts an empty one.
    ///
    /// Id counters restart, UI state resets and any stored draft is removed.
    pub fn new_play(&mut self) {
        self.diagram = PlayDiagram::default();
        self.ids = IdCounters::default();
        self.active_tool = DesignerTool::Select;
        self.selected = None;
        self.drawing_path.clear();
        self.has_unsaved_changes = false;
        self.autosave.cancel();

        if let Some(store) = &self.draft_store {
            if let Err(e) = store.remove(&self.draft_key) {
                tracing::warn!("Failed to remove draft '{}': {}", self.draft_key, e);
            }
        }

        tracing::info!("Started a new play");
        self.publish(AppEvent::Diagram(DiagramEvent::Reset));
        self.publish(AppEvent::Tool(ToolEvent::ToolChanged {
            tool: self.active_tool.to_string(),
        }));
    }

    /// Replaces the working diagram with `diagram` (normalized).
    ///
    /// Id counters move past any generated ids already present so new
    /// players never collide.
    pub fn load_diagram(&mut self, diagram: PlayDiagram) {
        self.diagram = diagram.normalized();
        self.ids = IdCounters::default();
        self.ids.reseed_from(&self.diagram);
        self.selected = None;
        self.drawing_path.clear();
        self.has_unsaved_changes = false;
        self.autosave.cancel();

        tracing::info!("Loaded play '{}'", self.diagram.name);
        self.publish(AppEvent::Diagram(DiagramEvent::Loaded {
            diagram_id: self.diagram.id.clone(),
        }));
    }

    /// A detached copy of the current diagram.
    pub fn export_diagram(&self) -> PlayDiagram {
        self.diagram.clone()
    }

    /// Clears the dirty flag and any pending autosave.
    pub fn mark_saved(&mut self) {
        self.has_unsaved_changes = false;
        self.autosave.cancel();
    }

    /// Whether leaving now would lose changes.
    pub fn needs_unload_confirmation(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Save diagram to file.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        serialization::save_to_file(&self.diagram, path)?;
        self.mark_saved();
        Ok(())
    }

    /// Load diagram from file.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let diagram = serialization::load_from_file(path)?;
        self.load_diagram(diagram);
        Ok(())
    }

    /// When the pending autosave is due, if one is pending.
    pub fn autosave_due_at(&self) -> Option<u64> {
        self.autosave.due_at()
    }

    /// Writes the draft once the idle window has elapsed.
    ///
    /// Returns `true` when a draft was written. Nothing is written while the
    /// session is clean. A failed write is logged and the dirty flag stays
    /// set.
    pub fn poll_autosave(&mut self) -> bool {
        let now = self.clock.now_ms();
        if !self.autosave.fire_if_due(now) || !self.has_unsaved_changes {
            return false;
        }
        self.save_draft()
    }

    /// Writes the draft immediately.
    pub fn save_draft(&mut self) -> bool {
        let Some(store) = &self.draft_store else {
            tracing::debug!("No draft store attached, skipping autosave");
            return false;
        };

        let result = serialization::to_json(&self.diagram)
            .map_err(|e| PersistenceError::Json {
                reason: e.to_string(),
            })
            .and_then(|json| store.write(&self.draft_key, &json).map(|()| json.len()));

        match result {
            Ok(bytes) => {
                self.has_unsaved_changes = false;
                self.autosave.cancel();
                tracing::info!("Draft '{}' saved ({} bytes)", self.draft_key, bytes);
                self.publish(AppEvent::Persistence(PersistenceEvent::DraftSaved {
                    key: self.draft_key.clone(),
                    bytes,
                }));
                true
            }
            Err(e) => {
                tracing::warn!("Draft '{}' not saved: {}", self.draft_key, e);
                self.publish(AppEvent::Persistence(PersistenceEvent::DraftSaveFailed {
                    key: self.draft_key.clone(),
                    reason: e.to_string(),
                }));
                false
            }
        }
    }

    /// Restores the stored draft, if there is a usable one.
    ///
    /// A missing, unreadable or malformed draft leaves the session untouched
    /// and returns `false`.
    pub fn restore_draft(&mut self) -> bool {
        let Some(store) = &self.draft_store else {
            return false;
        };
        let text = match store.read(&self.draft_key) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Draft '{}' unreadable: {}", self.draft_key, e);
                return false;
            }
        };
        let Some(diagram) = serialization::parse_draft(text.as_deref()) else {
            return false;
        };

        self.load_diagram(diagram);
        // A restored draft has not been saved anywhere permanent yet.
        self.has_unsaved_changes = true;
        self.publish(AppEvent::Persistence(PersistenceEvent::DraftLoaded {
            key: self.draft_key.clone(),
        }));
        true
    }

    /// Hands the serialized play to an external save-play boundary.
    pub fn hand_off(&mut self, sink: &mut dyn PlaySink) -> Result<(), PersistenceError> {
        let payload = serialization::to_json(&self.diagram).map_err(|e| {
            PersistenceError::Json {
                reason: e.to_string(),
            }
        })?;
        sink.save_play(&self.diagram.name, &payload)?;
        self.mark_saved();

        tracing::info!("Handed off play '{}'", self.diagram.name);
        self.publish(AppEvent::Persistence(PersistenceEvent::PlayHandedOff {
            name: self.diagram.name.clone(),
            bytes: payload.len(),
        }));
        Ok(())
    }
}
