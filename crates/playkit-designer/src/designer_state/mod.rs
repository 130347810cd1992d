//! Designer session: the single mutation surface for an in-progress play.
//!
//! This module is split into submodules for better organization:
//! - `players`: Placement, drag, erase, labels, formations, hit testing
//! - `drawing`: Freehand path capture and assignment edits
//! - `timing`: Timeline step edits
//! - `file_io`: New/load/export, draft autosave, save-play hand-off
//!
//! Each session owns its diagram, its id counters and its [`EventBus`];
//! sessions never share state.

mod drawing;
mod file_io;
mod players;
mod timing;

use playkit_core::constants::{AUTOSAVE_IDLE_MS, DRAFT_KEY};
use playkit_core::{
    AppEvent, Clock, DiagramEvent, EventBus, EventFilter, OneShotTimer, SubscriptionId,
    SystemClock, ToolEvent,
};
use playkit_settings::{DesignerSettings, DraftStore};

use crate::canvas::{DesignerTool, PlayerRef};
use crate::model::{slugify, PlayDiagram, Point, Side};
use crate::viewport::FieldTransform;

/// Per-side monotonic player id counters. Never reused until `new_play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IdCounters {
    offense: u64,
    defense: u64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            offense: 1,
            defense: 1,
        }
    }
}

impl IdCounters {
    fn next(&mut self, side: Side) -> String {
        let counter = match side {
            Side::Offense => &mut self.offense,
            Side::Defense => &mut self.defense,
        };
        let id = format!("{}{}", side.id_prefix(), counter);
        *counter += 1;
        id
    }

    /// Moves each counter past any generated-style id already in `diagram`.
    fn reseed_from(&mut self, diagram: &PlayDiagram) {
        for side in [Side::Offense, Side::Defense] {
            let highest = diagram
                .players
                .get(side)
                .iter()
                .filter_map(|p| p.id.strip_prefix(side.id_prefix()))
                .filter_map(|n| n.parse::<u64>().ok())
                .max()
                .unwrap_or(0);
            let counter = match side {
                Side::Offense => &mut self.offense,
                Side::Defense => &mut self.defense,
            };
            *counter = (*counter).max(highest + 1);
        }
    }
}

/// Designer session state
pub struct DesignerState {
    diagram: PlayDiagram,
    active_tool: DesignerTool,
    selected: Option<PlayerRef>,
    drawing_path: Vec<Point>,
    show_defense: bool,
    is_flipped: bool,
    has_unsaved_changes: bool,
    ids: IdCounters,
    transform: FieldTransform,
    events: EventBus,
    clock: Box<dyn Clock>,
    autosave: OneShotTimer,
    autosave_idle_ms: u64,
    draft_key: String,
    draft_store: Option<Box<dyn DraftStore>>,
}

impl Default for DesignerState {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignerState {
    /// Creates a new session on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Creates a new session driven by `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            diagram: PlayDiagram::default(),
            active_tool: DesignerTool::Select,
            selected: None,
            drawing_path: Vec::new(),
            show_defense: true,
            is_flipped: false,
            has_unsaved_changes: false,
            ids: IdCounters::default(),
            transform: FieldTransform::new(),
            events: EventBus::new(),
            clock: Box::new(clock),
            autosave: OneShotTimer::new(),
            autosave_idle_ms: AUTOSAVE_IDLE_MS,
            draft_key: DRAFT_KEY.to_string(),
            draft_store: None,
        }
    }

    /// Applies designer settings (autosave window, draft key, clamp margin).
    pub fn with_settings(mut self, settings: &DesignerSettings) -> Self {
        self.autosave_idle_ms = settings.autosave_idle_secs.saturating_mul(1000);
        self.draft_key = settings.draft_key.clone();
        self.transform = self.transform.with_clamp_margin(settings.clamp_margin);
        self
    }

    /// Attaches the local store drafts are autosaved to.
    pub fn with_draft_store(mut self, store: impl DraftStore + 'static) -> Self {
        self.draft_store = Some(Box::new(store));
        self
    }

    pub fn diagram(&self) -> &PlayDiagram {
        &self.diagram
    }

    pub fn active_tool(&self) -> DesignerTool {
        self.active_tool
    }

    pub fn selected_player(&self) -> Option<&PlayerRef> {
        self.selected.as_ref()
    }

    /// The in-progress drawing buffer, in full.
    pub fn drawing_path(&self) -> &[Point] {
        &self.drawing_path
    }

    pub fn is_drawing(&self) -> bool {
        !self.drawing_path.is_empty()
    }

    pub fn show_defense(&self) -> bool {
        self.show_defense
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn transform(&self) -> &FieldTransform {
        &self.transform
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn draft_key(&self) -> &str {
        &self.draft_key
    }

    /// Registers a change listener. See [`EventBus::subscribe`].
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(filter, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Switches tools. Always clears the selection and drawing buffer.
    pub fn set_tool(&mut self, tool: DesignerTool) {
        let had_selection = self.selected.take().is_some();
        let was_drawing = self.is_drawing();
        self.drawing_path.clear();
        self.active_tool = tool;

        tracing::debug!("Tool changed to {}", tool);
        self.publish(AppEvent::Tool(ToolEvent::ToolChanged {
            tool: tool.to_string(),
        }));
        if had_selection {
            self.publish_selection();
        }
        if was_drawing {
            self.publish(AppEvent::Tool(ToolEvent::DrawingChanged { points: 0 }));
        }
    }

    /// Shows or hides defensive players. View state only.
    pub fn toggle_defense(&mut self) {
        self.show_defense = !self.show_defense;
        self.publish_view();
    }

    /// Mirrors the display vertically. View state only.
    pub fn toggle_flip(&mut self) {
        self.is_flipped = !self.is_flipped;
        self.publish_view();
    }

    pub fn set_show_defense(&mut self, show: bool) {
        if self.show_defense != show {
            self.toggle_defense();
        }
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        if self.is_flipped != flipped {
            self.toggle_flip();
        }
    }

    /// Renames the play and re-derives its id.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.diagram.id = slugify(&name);
        self.diagram.name = name;
        self.metadata_changed();
    }

    pub fn set_formation_labels(&mut self, offense: impl Into<String>, defense: impl Into<String>) {
        self.diagram.formation.offense = offense.into();
        self.diagram.formation.defense = defense.into();
        self.metadata_changed();
    }

    /// Adds a tag unless already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || self.diagram.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.diagram.tags.push(tag.to_string());
        self.metadata_changed();
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.diagram.tags.len();
        self.diagram.tags.retain(|t| t != tag);
        if self.diagram.tags.len() == before {
            return false;
        }
        self.metadata_changed();
        true
    }

    /// Flags the diagram dirty and restarts the autosave idle window.
    pub(crate) fn mark_modified(&mut self) {
        self.has_unsaved_changes = true;
        let now = self.clock.now_ms();
        self.autosave.schedule(now, self.autosave_idle_ms);
    }

    pub(crate) fn publish(&self, event: AppEvent) {
        // No listener is a normal state for a headless session.
        let _ = self.events.publish(event);
    }

    pub(crate) fn publish_selection(&self) {
        self.publish(AppEvent::Tool(ToolEvent::SelectionChanged {
            side: self.selected.as_ref().map(|p| p.side.to_string()),
            player_id: self.selected.as_ref().map(|p| p.id.clone()),
        }));
    }

    fn publish_view(&self) {
        self.publish(AppEvent::Tool(ToolEvent::ViewChanged {
            show_defense: self.show_defense,
            flipped: self.is_flipped,
        }));
    }

    fn metadata_changed(&mut self) {
        self.mark_modified();
        self.publish(AppEvent::Diagram(DiagramEvent::MetadataChanged {
            name: self.diagram.name.clone(),
        }));
    }
}

impl std::fmt::Debug for DesignerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignerState")
            .field("diagram", &self.diagram.id)
            .field("active_tool", &self.active_tool)
            .field("selected", &self.selected)
            .field("drawing_points", &self.drawing_path.len())
            .field("show_defense", &self.show_defense)
            .field("is_flipped", &self.is_flipped)
            .field("has_unsaved_changes", &self.has_unsaved_changes)
            .finish()
    }
}
