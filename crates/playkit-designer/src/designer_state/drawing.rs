//! Freehand path capture and assignment edits.

use playkit_core::constants::DRAWING_DECIMATION;
use playkit_core::{AppEvent, DesignerError, DiagramEvent, ToolEvent};

use super::DesignerState;
use crate::model::{Assignment, AssignmentType, PathStyle, Point, Side};

impl DesignerState {
    /// Starts path capture for the selected player.
    ///
    /// Seeds the buffer with the player's current position followed by
    /// `point`. Without a drawing tool or a selected player this is a no-op
    /// and returns `false`.
    pub fn begin_drawing(&mut self, point: Point) -> bool {
        if self.active_tool.draws().is_none() {
            return false;
        }
        let Some(origin) = self
            .selected
            .as_ref()
            .and_then(|s| self.diagram.player(s.side, &s.id))
            .map(|p| p.point())
        else {
            tracing::debug!("Drawing ignored: no player selected");
            return false;
        };

        self.drawing_path.clear();
        self.drawing_path.push(origin);
        self.drawing_path.push(point);
        self.publish_drawing();
        true
    }

    /// Appends a point to an in-progress capture.
    pub fn extend_drawing(&mut self, point: Point) {
        if self.drawing_path.is_empty() {
            return;
        }
        self.drawing_path.push(point);
        self.publish_drawing();
    }

    /// Ends path capture.
    ///
    /// With two or more points the buffer becomes the selected player's
    /// assignment, replacing any earlier one; shorter buffers are dropped.
    /// The buffer is cleared either way. Returns the committed point count.
    pub fn commit_drawing(&mut self) -> Option<usize> {
        let path = std::mem::take(&mut self.drawing_path);
        let committed = self.commit_path(path);
        self.publish_drawing();
        committed
    }

    /// Drops an in-progress capture without committing.
    pub fn cancel_drawing(&mut self) {
        if !self.drawing_path.is_empty() {
            self.drawing_path.clear();
            self.publish_drawing();
        }
    }

    /// The drawing buffer thinned for display: first, last and every Nth point.
    ///
    /// The committed path always uses the full buffer.
    pub fn display_drawing_path(&self) -> Vec<Point> {
        decimate(&self.drawing_path, DRAWING_DECIMATION)
    }

    fn commit_path(&mut self, path: Vec<Point>) -> Option<usize> {
        let kind = self.active_tool.draws()?;
        let selected = self.selected.clone()?;
        if path.len() < 2 {
            tracing::debug!("Discarded {}-point path", path.len());
            return None;
        }
        let points = path.len();

        self.diagram.upsert_assignment(
            selected.side,
            Assignment::new(selected.id.clone(), kind, path),
        );
        self.mark_modified();

        tracing::debug!("Committed {} for {} ({} points)", kind, selected, points);
        self.publish(AppEvent::Diagram(DiagramEvent::AssignmentCommitted {
            side: selected.side.to_string(),
            player_id: selected.id,
            kind: kind.to_string(),
            points,
        }));
        Some(points)
    }

    /// Changes the type of an existing assignment.
    pub fn set_assignment_type(
        &mut self,
        side: Side,
        player_id: &str,
        kind: AssignmentType,
    ) -> Result<(), DesignerError> {
        self.edit_assignment(side, player_id, |a| a.kind = kind)
    }

    pub fn set_assignment_style(
        &mut self,
        side: Side,
        player_id: &str,
        style: Option<PathStyle>,
    ) -> Result<(), DesignerError> {
        self.edit_assignment(side, player_id, |a| a.style = style)
    }

    /// Sets or clears the read-key annotation. Blank text clears it.
    pub fn set_read_key(
        &mut self,
        side: Side,
        player_id: &str,
        read_key: Option<&str>,
    ) -> Result<(), DesignerError> {
        let read_key = read_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        self.edit_assignment(side, player_id, |a| a.read_key = read_key)
    }

    /// Removes a player's assignment. Returns whether one existed.
    pub fn remove_assignment(&mut self, side: Side, player_id: &str) -> bool {
        if !self.diagram.remove_assignment(side, player_id) {
            return false;
        }
        self.mark_modified();
        self.publish(AppEvent::Diagram(DiagramEvent::AssignmentRemoved {
            side: side.to_string(),
            player_id: player_id.to_string(),
        }));
        true
    }

    fn edit_assignment(
        &mut self,
        side: Side,
        player_id: &str,
        edit: impl FnOnce(&mut Assignment),
    ) -> Result<(), DesignerError> {
        let assignment = self
            .diagram
            .assignment_for_mut(side, player_id)
            .ok_or_else(|| DesignerError::UnknownPlayer {
                player_id: player_id.to_string(),
                side: side.to_string(),
            })?;
        edit(assignment);
        self.mark_modified();
        self.publish(AppEvent::Diagram(DiagramEvent::AssignmentUpdated {
            side: side.to_string(),
            player_id: player_id.to_string(),
        }));
        Ok(())
    }

    fn publish_drawing(&self) {
        self.publish(AppEvent::Tool(ToolEvent::DrawingChanged {
            points: self.drawing_path.len(),
        }));
    }
}

/// Keeps the first point, every `every`-th point and the last point.
pub(crate) fn decimate(points: &[Point], every: usize) -> Vec<Point> {
    let every = every.max(1);
    let last = points.len().saturating_sub(1);
    points
        .iter()
        .enumerate()
        .filter(|(i, _)| i % every == 0 || *i == last)
        .map(|(_, p)| *p)
        .collect()
}
