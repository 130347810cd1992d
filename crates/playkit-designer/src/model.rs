//! Play diagram data model.
//!
//! Pure schema plus invariant checks. Every mutation of a live diagram goes
//! through [`DesignerState`](crate::DesignerState); these types only know how
//! to describe, validate and repair themselves.

use std::collections::HashSet;
use std::fmt;

use playkit_core::DesignerError;
use serde::{Deserialize, Serialize};

/// Name given to a diagram that has never been named.
pub const UNTITLED_PLAY: &str = "Untitled Play";

/// Description of the timing step every new diagram starts with.
pub const DEFAULT_STEP_DESCRIPTION: &str = "Snap";

const UNTITLED_SLUG: &str = "untitled-play";

/// A point in logical field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`; `t` of 0 is `self`, 1 is `other`.
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Which team a player or assignment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Offense,
    Defense,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Offense => "offense",
            Side::Defense => "defense",
        }
    }

    /// Role and label given to players added by hand.
    pub fn default_role(&self) -> &'static str {
        match self {
            Side::Offense => "WR",
            Side::Defense => "LB",
        }
    }

    /// Prefix of generated player ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Side::Offense => "offense-",
            Side::Defense => "defense-",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    /// Unique within its side only.
    pub id: String,
    /// Free-text role such as "WR" or "LB".
    pub position: String,
    pub x: f64,
    pub y: f64,
    /// 1 to 3 character marker text.
    pub label: String,
}

impl PlayerPosition {
    pub fn new(
        id: impl Into<String>,
        position: impl Into<String>,
        x: f64,
        y: f64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            position: position.into(),
            x,
            y,
            label: label.into(),
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What a player does along their path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Route,
    Block,
    Run,
    Zone,
    Spy,
    Blitz,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::Route => "route",
            AssignmentType::Block => "block",
            AssignmentType::Run => "run",
            AssignmentType::Zone => "zone",
            AssignmentType::Spy => "spy",
            AssignmentType::Blitz => "blitz",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stroke hint for an assignment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl PathStyle {
    /// SVG `stroke-dasharray` value, in display pixels.
    pub fn dash_array(&self) -> Option<&'static str> {
        match self {
            PathStyle::Solid => None,
            PathStyle::Dashed => Some("10 6"),
            PathStyle::Dotted => Some("2 5"),
        }
    }
}

/// The path one player is responsible for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub player_id: String,
    #[serde(rename = "type")]
    pub kind: AssignmentType,
    #[serde(default)]
    pub path: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<PathStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_key: Option<String>,
}

impl Assignment {
    pub fn new(player_id: impl Into<String>, kind: AssignmentType, path: Vec<Point>) -> Self {
        Self {
            player_id: player_id.into(),
            kind,
            path,
            style: None,
            read_key: None,
        }
    }

    /// A path with fewer than two points has nothing to draw.
    pub fn is_drawable(&self) -> bool {
        self.path.len() >= 2
    }

    /// Total polyline length in logical units.
    pub fn path_length(&self) -> f64 {
        self.path
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    pub fn effective_style(&self) -> PathStyle {
        self.style.unwrap_or_default()
    }
}

/// One beat of the play's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStep {
    /// 1-based, dense.
    pub step: u32,
    pub description: String,
    #[serde(default)]
    pub events: Vec<String>,
}

impl TimingStep {
    pub fn new(step: u32, description: impl Into<String>) -> Self {
        Self {
            step,
            description: description.into(),
            events: Vec::new(),
        }
    }
}

/// Free-text formation names for each side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormationLabels {
    #[serde(default)]
    pub offense: String,
    #[serde(default)]
    pub defense: String,
}

impl FormationLabels {
    pub fn get(&self, side: Side) -> &str {
        match side {
            Side::Offense => &self.offense,
            Side::Defense => &self.defense,
        }
    }

    pub fn set(&mut self, side: Side, label: impl Into<String>) {
        match side {
            Side::Offense => self.offense = label.into(),
            Side::Defense => self.defense = label.into(),
        }
    }
}

/// Players keyed by side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SidePlayers {
    #[serde(default)]
    pub offense: Vec<PlayerPosition>,
    #[serde(default)]
    pub defense: Vec<PlayerPosition>,
}

impl SidePlayers {
    pub fn get(&self, side: Side) -> &[PlayerPosition] {
        match side {
            Side::Offense => &self.offense,
            Side::Defense => &self.defense,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut Vec<PlayerPosition> {
        match side {
            Side::Offense => &mut self.offense,
            Side::Defense => &mut self.defense,
        }
    }
}

/// Assignments keyed by side. Defense assignments are optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SideAssignments {
    #[serde(default)]
    pub offense: Vec<Assignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<Vec<Assignment>>,
}

impl SideAssignments {
    pub fn get(&self, side: Side) -> &[Assignment] {
        match side {
            Side::Offense => &self.offense,
            Side::Defense => self.defense.as_deref().unwrap_or(&[]),
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut Vec<Assignment> {
        match side {
            Side::Offense => &mut self.offense,
            Side::Defense => self.defense.get_or_insert_with(Vec::new),
        }
    }

    /// Like `get_mut`, but leaves an absent defense list absent.
    pub fn existing_mut(&mut self, side: Side) -> Option<&mut Vec<Assignment>> {
        match side {
            Side::Offense => Some(&mut self.offense),
            Side::Defense => self.defense.as_mut(),
        }
    }
}

/// The complete serializable description of one play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayDiagram {
    /// Slug derived from `name`.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub formation: FormationLabels,
    #[serde(default)]
    pub players: SidePlayers,
    #[serde(default)]
    pub assignments: SideAssignments,
    #[serde(default)]
    pub timing: Vec<TimingStep>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for PlayDiagram {
    fn default() -> Self {
        Self::new(UNTITLED_PLAY)
    }
}

impl PlayDiagram {
    /// Creates an empty diagram with the single default "Snap" step.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            formation: FormationLabels::default(),
            players: SidePlayers::default(),
            assignments: SideAssignments::default(),
            timing: vec![TimingStep::new(1, DEFAULT_STEP_DESCRIPTION)],
            tags: Vec::new(),
        }
    }

    pub fn total_steps(&self) -> usize {
        self.timing.len()
    }

    pub fn player(&self, side: Side, player_id: &str) -> Option<&PlayerPosition> {
        self.players.get(side).iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, side: Side, player_id: &str) -> Option<&mut PlayerPosition> {
        self.players
            .get_mut(side)
            .iter_mut()
            .find(|p| p.id == player_id)
    }

    pub fn assignment_for(&self, side: Side, player_id: &str) -> Option<&Assignment> {
        self.assignments
            .get(side)
            .iter()
            .find(|a| a.player_id == player_id)
    }

    pub fn assignment_for_mut(&mut self, side: Side, player_id: &str) -> Option<&mut Assignment> {
        self.assignments
            .existing_mut(side)?
            .iter_mut()
            .find(|a| a.player_id == player_id)
    }

    /// Stores `assignment`, replacing any existing one for the same player.
    pub fn upsert_assignment(&mut self, side: Side, assignment: Assignment) {
        let list = self.assignments.get_mut(side);
        list.retain(|a| a.player_id != assignment.player_id);
        list.push(assignment);
    }

    /// Removes the assignment keyed to `player_id`. Returns whether one existed.
    pub fn remove_assignment(&mut self, side: Side, player_id: &str) -> bool {
        let Some(list) = self.assignments.existing_mut(side) else {
            return false;
        };
        let before = list.len();
        list.retain(|a| a.player_id != player_id);
        list.len() != before
    }

    /// Rewrites step numbers to 1..N in list order.
    pub fn renumber_timing(&mut self) {
        for (index, step) in self.timing.iter_mut().enumerate() {
            step.step = index as u32 + 1;
        }
    }

    /// Checks the diagram's structural invariants.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), DesignerError> {
        let invalid = |reason: String| DesignerError::InvalidDiagram { reason };

        if self.timing.is_empty() {
            return Err(invalid("timing has no steps".to_string()));
        }
        for (index, step) in self.timing.iter().enumerate() {
            let expected = index as u32 + 1;
            if step.step != expected {
                return Err(invalid(format!(
                    "timing step at position {} is numbered {}",
                    expected, step.step
                )));
            }
        }

        for side in [Side::Offense, Side::Defense] {
            let mut ids = HashSet::new();
            for player in self.players.get(side) {
                if !ids.insert(player.id.as_str()) {
                    return Err(invalid(format!(
                        "duplicate {} player id '{}'",
                        side, player.id
                    )));
                }
                let label_len = player.label.chars().count();
                if !(1..=3).contains(&label_len) {
                    return Err(invalid(format!(
                        "{} player '{}' label '{}' must be 1-3 characters",
                        side, player.id, player.label
                    )));
                }
            }

            let mut assigned = HashSet::new();
            for assignment in self.assignments.get(side) {
                if !ids.contains(assignment.player_id.as_str()) {
                    return Err(invalid(format!(
                        "{} assignment references unknown player '{}'",
                        side, assignment.player_id
                    )));
                }
                if !assigned.insert(assignment.player_id.as_str()) {
                    return Err(invalid(format!(
                        "{} player '{}' has more than one assignment",
                        side, assignment.player_id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Repairs what can be repaired in a diagram from an outside source.
    ///
    /// Renumbers timing (adding the default step when empty), drops paths
    /// with fewer than two points or without a player, and keeps only the
    /// last assignment per player.
    pub fn normalized(mut self) -> Self {
        if self.timing.is_empty() {
            self.timing
                .push(TimingStep::new(1, DEFAULT_STEP_DESCRIPTION));
        }
        self.renumber_timing();

        if self.id.trim().is_empty() {
            self.id = slugify(&self.name);
        }

        for side in [Side::Offense, Side::Defense] {
            let player_ids: HashSet<String> = self
                .players
                .get(side)
                .iter()
                .map(|p| p.id.clone())
                .collect();

            let mut kept: Vec<Assignment> = Vec::new();
            for assignment in self.assignments.get(side) {
                if !assignment.is_drawable() || !player_ids.contains(&assignment.player_id) {
                    continue;
                }
                kept.retain(|a| a.player_id != assignment.player_id);
                kept.push(assignment.clone());
            }

            match side {
                Side::Offense => self.assignments.offense = kept,
                Side::Defense => {
                    if self.assignments.defense.is_some() {
                        self.assignments.defense = Some(kept);
                    }
                }
            }
        }

        self
    }
}

/// Lower-cases `name` and collapses each run of characters outside
/// `[a-z0-9]` to one hyphen.
///
/// Leading and trailing hyphens are dropped; a name with nothing left maps to
/// `"untitled-play"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        UNTITLED_SLUG.to_string()
    } else {
        slug
    }
}
