//! Canvas type definitions: DesignerTool, PointerEvent, PlayerRef, HitTarget.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AssignmentType, Side};

/// Mutually exclusive authoring tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesignerTool {
    #[default]
    Select,
    AddOffense,
    AddDefense,
    DrawRoute,
    DrawBlock,
    Erase,
}

impl DesignerTool {
    pub const ALL: [DesignerTool; 6] = [
        DesignerTool::Select,
        DesignerTool::AddOffense,
        DesignerTool::AddDefense,
        DesignerTool::DrawRoute,
        DesignerTool::DrawBlock,
        DesignerTool::Erase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignerTool::Select => "select",
            DesignerTool::AddOffense => "addOffense",
            DesignerTool::AddDefense => "addDefense",
            DesignerTool::DrawRoute => "drawRoute",
            DesignerTool::DrawBlock => "drawBlock",
            DesignerTool::Erase => "erase",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == s)
    }

    /// Side a click on empty field adds a player to.
    pub fn adds_to(&self) -> Option<Side> {
        match self {
            DesignerTool::AddOffense => Some(Side::Offense),
            DesignerTool::AddDefense => Some(Side::Defense),
            _ => None,
        }
    }

    /// Assignment type committed by a drawing tool.
    pub fn draws(&self) -> Option<AssignmentType> {
        match self {
            DesignerTool::DrawRoute => Some(AssignmentType::Route),
            DesignerTool::DrawBlock => Some(AssignmentType::Block),
            _ => None,
        }
    }
}

impl fmt::Display for DesignerTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer position in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Identifies one player on one side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerRef {
    pub side: Side,
    pub id: String,
}

impl PlayerRef {
    pub fn new(side: Side, id: impl Into<String>) -> Self {
        Self {
            side,
            id: id.into(),
        }
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.side, self.id)
    }
}

/// What a pointer landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// Empty field, handled at canvas level.
    Field,
    /// A player marker; the canvas-level handler does not see the event.
    Player(PlayerRef),
}
