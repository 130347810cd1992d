//! # Formation Library
//!
//! Read-only catalog of named player layouts used to seed one side of the
//! field. The offense lines up on the line of scrimmage (y = 40) facing
//! toward y = 0; the defense lines up just across it.
//!
//! Hosts that keep formations elsewhere implement [`FormationSource`]; the
//! designer session only ever reads from it.

use playkit_core::DesignerError;
use serde::{Deserialize, Serialize};

use crate::model::{PlayerPosition, Side};

/// A named layout of players for one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    /// Catalog identifier, e.g. "shotgun"
    pub id: String,
    /// Display name, e.g. "Shotgun"
    pub name: String,
    /// Side this formation lines up on
    pub side: Side,
    /// Players in their pre-snap spots
    pub players: Vec<PlayerPosition>,
}

impl Formation {
    fn new(id: &str, name: &str, side: Side, players: Vec<PlayerPosition>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            side,
            players,
        }
    }
}

/// Read-only lookup of formations by side and id.
pub trait FormationSource {
    /// All formations available for a side, in display order.
    fn formations(&self, side: Side) -> &[Formation];

    /// Looks up one formation.
    fn formation(&self, side: Side, formation_id: &str) -> Result<&Formation, DesignerError> {
        self.formations(side)
            .iter()
            .find(|f| f.id == formation_id)
            .ok_or_else(|| DesignerError::UnknownFormation {
                formation_id: formation_id.to_string(),
                side: side.to_string(),
            })
    }
}

/// The built-in formation catalog.
#[derive(Debug, Clone)]
pub struct FormationLibrary {
    offense: Vec<Formation>,
    defense: Vec<Formation>,
}

impl Default for FormationLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FormationLibrary {
    /// Creates the standard catalog.
    pub fn new() -> Self {
        Self {
            offense: offense_formations(),
            defense: defense_formations(),
        }
    }

    /// Ids of every formation for a side.
    pub fn ids(&self, side: Side) -> Vec<&str> {
        self.formations(side).iter().map(|f| f.id.as_str()).collect()
    }
}

impl FormationSource for FormationLibrary {
    fn formations(&self, side: Side) -> &[Formation] {
        match side {
            Side::Offense => &self.offense,
            Side::Defense => &self.defense,
        }
    }
}

fn p(id: &str, position: &str, x: f64, y: f64, label: &str) -> PlayerPosition {
    PlayerPosition::new(id, position, x, y, label)
}

fn offensive_line() -> Vec<PlayerPosition> {
    vec![
        p("lt", "OT", 42.0, 42.0, "LT"),
        p("lg", "OG", 46.0, 42.0, "LG"),
        p("c", "C", 50.0, 42.0, "C"),
        p("rg", "OG", 54.0, 42.0, "RG"),
        p("rt", "OT", 58.0, 42.0, "RT"),
    ]
}

fn offense_formations() -> Vec<Formation> {
    let with_line = |skill: Vec<PlayerPosition>| {
        let mut players = offensive_line();
        players.extend(skill);
        players
    };

    vec![
        Formation::new(
            "i-formation",
            "I-Formation",
            Side::Offense,
            with_line(vec![
                p("te", "TE", 62.0, 42.0, "Y"),
                p("x", "WR", 10.0, 42.0, "X"),
                p("z", "WR", 88.0, 43.5, "Z"),
                p("qb", "QB", 50.0, 45.0, "QB"),
                p("fb", "FB", 50.0, 49.0, "FB"),
                p("tb", "RB", 50.0, 53.0, "TB"),
            ]),
        ),
        Formation::new(
            "shotgun",
            "Shotgun",
            Side::Offense,
            with_line(vec![
                p("te", "TE", 62.0, 42.0, "Y"),
                p("x", "WR", 10.0, 42.0, "X"),
                p("h", "WR", 24.0, 43.5, "H"),
                p("z", "WR", 90.0, 43.5, "Z"),
                p("qb", "QB", 50.0, 49.0, "QB"),
                p("rb", "RB", 45.0, 49.0, "RB"),
            ]),
        ),
        Formation::new(
            "singleback",
            "Singleback",
            Side::Offense,
            with_line(vec![
                p("te", "TE", 62.0, 42.0, "Y"),
                p("x", "WR", 10.0, 42.0, "X"),
                p("h", "WR", 24.0, 43.5, "H"),
                p("z", "WR", 88.0, 43.5, "Z"),
                p("qb", "QB", 50.0, 45.0, "QB"),
                p("rb", "RB", 50.0, 51.0, "RB"),
            ]),
        ),
        Formation::new(
            "pistol",
            "Pistol",
            Side::Offense,
            with_line(vec![
                p("te", "TE", 62.0, 42.0, "Y"),
                p("x", "WR", 10.0, 42.0, "X"),
                p("z", "WR", 88.0, 43.5, "Z"),
                p("h", "WR", 76.0, 43.5, "H"),
                p("qb", "QB", 50.0, 47.0, "QB"),
                p("rb", "RB", 50.0, 51.5, "RB"),
            ]),
        ),
        Formation::new(
            "empty",
            "Empty",
            Side::Offense,
            with_line(vec![
                p("x", "WR", 8.0, 42.0, "X"),
                p("h", "WR", 20.0, 43.5, "H"),
                p("f", "RB", 32.0, 43.5, "F"),
                p("y", "TE", 78.0, 43.5, "Y"),
                p("z", "WR", 92.0, 42.0, "Z"),
                p("qb", "QB", 50.0, 49.0, "QB"),
            ]),
        ),
    ]
}

fn defensive_front(front: &[(&str, &str, f64, &str)]) -> Vec<PlayerPosition> {
    front
        .iter()
        .map(|(id, position, x, label)| p(id, position, *x, 38.0, label))
        .collect()
}

fn defense_formations() -> Vec<Formation> {
    let four_man_front = || {
        defensive_front(&[
            ("de-l", "DE", 40.0, "DE"),
            ("dt-l", "DT", 47.0, "DT"),
            ("dt-r", "DT", 53.0, "DT"),
            ("de-r", "DE", 60.0, "DE"),
        ])
    };
    let corners_and_safeties = || {
        vec![
            p("cb-l", "CB", 10.0, 35.0, "CB"),
            p("cb-r", "CB", 88.0, 35.0, "CB"),
            p("fs", "FS", 40.0, 22.0, "FS"),
            p("ss", "SS", 62.0, 25.0, "SS"),
        ]
    };

    let mut four_three = four_man_front();
    four_three.extend([
        p("sam", "LB", 38.0, 33.0, "S"),
        p("mike", "LB", 50.0, 32.0, "M"),
        p("will", "LB", 62.0, 33.0, "W"),
    ]);
    four_three.extend(corners_and_safeties());

    let mut three_four = defensive_front(&[
        ("de-l", "DE", 44.0, "DE"),
        ("nt", "NT", 50.0, "NT"),
        ("de-r", "DE", 56.0, "DE"),
    ]);
    three_four.extend([
        p("olb-l", "OLB", 36.0, 36.0, "OLB"),
        p("ilb-l", "ILB", 46.0, 32.0, "ILB"),
        p("ilb-r", "ILB", 54.0, 32.0, "ILB"),
        p("olb-r", "OLB", 64.0, 36.0, "OLB"),
    ]);
    three_four.extend(corners_and_safeties());

    let mut nickel = four_man_front();
    nickel.extend([
        p("mike", "LB", 45.0, 32.0, "M"),
        p("will", "LB", 55.0, 32.0, "W"),
        p("nb", "NB", 24.0, 35.0, "NB"),
    ]);
    nickel.extend(corners_and_safeties());

    let mut dime = four_man_front();
    dime.extend([
        p("mike", "LB", 50.0, 32.0, "M"),
        p("nb", "NB", 24.0, 35.0, "NB"),
        p("db", "DB", 76.0, 35.0, "DB"),
    ]);
    dime.extend(corners_and_safeties());

    vec![
        Formation::new("4-3", "4-3 Base", Side::Defense, four_three),
        Formation::new("3-4", "3-4 Base", Side::Defense, three_four),
        Formation::new("nickel", "Nickel", Side::Defense, nickel),
        Formation::new("dime", "Dime", Side::Defense, dime),
    ]
}
