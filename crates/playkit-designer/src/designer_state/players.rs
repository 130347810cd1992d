//! Player operations: add, move, erase, relabel, formations, hit testing.

use playkit_core::constants::PLAYER_RADIUS;
use playkit_core::{AppEvent, DesignerError, DiagramEvent};

use super::DesignerState;
use crate::canvas::PlayerRef;
use crate::formations::{Formation, FormationSource};
use crate::model::{PlayerPosition, Point, Side};

impl DesignerState {
    /// Adds a player with a generated id at `point` (clamped).
    ///
    /// Returns the new player's id.
    pub fn add_player(&mut self, side: Side, point: Point) -> String {
        let point = self.transform.clamp(point);
        let id = self.ids.next(side);
        let role = side.default_role();
        self.diagram.players.get_mut(side).push(PlayerPosition::new(
            id.clone(),
            role,
            point.x,
            point.y,
            role,
        ));
        self.mark_modified();

        tracing::debug!("Added {} player {} at ({:.1}, {:.1})", side, id, point.x, point.y);
        self.publish(AppEvent::Diagram(DiagramEvent::PlayerAdded {
            side: side.to_string(),
            player_id: id.clone(),
            x: point.x,
            y: point.y,
        }));
        id
    }

    /// Moves a player to `point`, clamped to the safe interior.
    pub fn move_player(
        &mut self,
        side: Side,
        player_id: &str,
        point: Point,
    ) -> Result<Point, DesignerError> {
        let point = self.transform.clamp(point);
        let player = self
            .diagram
            .player_mut(side, player_id)
            .ok_or_else(|| unknown_player(side, player_id))?;
        player.x = point.x;
        player.y = point.y;
        self.mark_modified();

        self.publish(AppEvent::Diagram(DiagramEvent::PlayerMoved {
            side: side.to_string(),
            player_id: player_id.to_string(),
            x: point.x,
            y: point.y,
        }));
        Ok(point)
    }

    /// Removes a player and any assignment keyed to them.
    ///
    /// Clears the selection when the removed player was selected. Returns
    /// `false` when no such player exists.
    pub fn remove_player(&mut self, side: Side, player_id: &str) -> bool {
        let players = self.diagram.players.get_mut(side);
        let before = players.len();
        players.retain(|p| p.id != player_id);
        if players.len() == before {
            return false;
        }

        let had_assignment = self.diagram.remove_assignment(side, player_id);
        self.mark_modified();
        tracing::debug!(
            "Removed {} player {} (assignment removed: {})",
            side,
            player_id,
            had_assignment
        );

        self.publish(AppEvent::Diagram(DiagramEvent::PlayerRemoved {
            side: side.to_string(),
            player_id: player_id.to_string(),
        }));
        if had_assignment {
            self.publish(AppEvent::Diagram(DiagramEvent::AssignmentRemoved {
                side: side.to_string(),
                player_id: player_id.to_string(),
            }));
        }

        if self
            .selected
            .as_ref()
            .is_some_and(|s| s.side == side && s.id == player_id)
        {
            self.selected = None;
            self.drawing_path.clear();
            self.publish_selection();
        }
        true
    }

    /// Marks a player selected.
    pub fn select_player(&mut self, side: Side, player_id: &str) -> Result<(), DesignerError> {
        if self.diagram.player(side, player_id).is_none() {
            return Err(unknown_player(side, player_id));
        }
        let selection = PlayerRef::new(side, player_id);
        if self.selected.as_ref() != Some(&selection) {
            self.selected = Some(selection);
            self.publish_selection();
        }
        Ok(())
    }

    /// Sets a player's marker text, trimmed to 3 characters.
    pub fn update_player_label(
        &mut self,
        side: Side,
        player_id: &str,
        label: &str,
    ) -> Result<(), DesignerError> {
        let label: String = label.trim().chars().take(3).collect();
        if label.is_empty() {
            return Err(DesignerError::InvalidDiagram {
                reason: format!("{} player '{}' label must not be empty", side, player_id),
            });
        }
        let player = self
            .diagram
            .player_mut(side, player_id)
            .ok_or_else(|| unknown_player(side, player_id))?;
        player.label = label;
        self.player_updated(side, player_id);
        Ok(())
    }

    /// Sets a player's free-text role.
    pub fn update_player_position_label(
        &mut self,
        side: Side,
        player_id: &str,
        position: &str,
    ) -> Result<(), DesignerError> {
        let player = self
            .diagram
            .player_mut(side, player_id)
            .ok_or_else(|| unknown_player(side, player_id))?;
        player.position = position.trim().to_string();
        self.player_updated(side, player_id);
        Ok(())
    }

    /// Replaces a side's players with `formation` and clears that side's
    /// assignments.
    ///
    /// Previously drawn paths are keyed to ids that no longer exist, so they
    /// are dropped rather than carried over.
    pub fn load_formation(&mut self, formation: &Formation) {
        let side = formation.side;
        *self.diagram.players.get_mut(side) = formation.players.clone();
        if let Some(assignments) = self.diagram.assignments.existing_mut(side) {
            assignments.clear();
        }
        self.diagram.formation.set(side, formation.name.clone());

        if self.selected.as_ref().is_some_and(|s| s.side == side) {
            self.selected = None;
            self.drawing_path.clear();
            self.publish_selection();
        }
        self.ids.reseed_from(&self.diagram);
        self.mark_modified();

        tracing::info!(
            "Loaded {} formation '{}' ({} players)",
            side,
            formation.id,
            formation.players.len()
        );
        self.publish(AppEvent::Diagram(DiagramEvent::FormationLoaded {
            side: side.to_string(),
            formation_id: formation.id.clone(),
            players: formation.players.len(),
        }));
    }

    /// Looks up `formation_id` in `source` and loads it onto `side`.
    pub fn load_formation_from(
        &mut self,
        source: &dyn FormationSource,
        side: Side,
        formation_id: &str,
    ) -> Result<(), DesignerError> {
        let formation = source.formation(side, formation_id)?.clone();
        self.load_formation(&formation);
        Ok(())
    }

    /// Finds the topmost visible player whose marker covers `point`.
    ///
    /// Defense draws above offense and later players above earlier ones;
    /// hidden defense is never hit.
    pub fn hit_test(&self, point: Point) -> Option<PlayerRef> {
        let mut sides = vec![Side::Offense];
        if self.show_defense {
            sides.push(Side::Defense);
        }

        sides.into_iter().rev().find_map(|side| {
            self.diagram
                .players
                .get(side)
                .iter()
                .rev()
                .find(|p| p.point().distance_to(&point) <= PLAYER_RADIUS)
                .map(|p| PlayerRef::new(side, p.id.clone()))
        })
    }

    fn player_updated(&mut self, side: Side, player_id: &str) {
        self.mark_modified();
        self.publish(AppEvent::Diagram(DiagramEvent::PlayerUpdated {
            side: side.to_string(),
            player_id: player_id.to_string(),
        }));
    }
}

fn unknown_player(side: Side, player_id: &str) -> DesignerError {
    DesignerError::UnknownPlayer {
        player_id: player_id.to_string(),
        side: side.to_string(),
    }
}
