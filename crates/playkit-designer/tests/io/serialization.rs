use playkit_core::{DesignerError, ManualClock};
use playkit_designer::designer_state::DesignerState;
use playkit_designer::formations::FormationLibrary;
use playkit_designer::model::{PlayDiagram, Point, Side};
use playkit_designer::serialization;
use tempfile::TempDir;

#[test]
fn test_json_shape() {
    let mut state = DesignerState::with_clock(ManualClock::new());
    state.set_name("Trips Right");
    state
        .load_formation_from(&FormationLibrary::new(), Side::Offense, "shotgun")
        .expect("formation");
    state.add_tag("3rd-down");

    let json = serialization::to_json(state.diagram()).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("value");
    let object = value.as_object().expect("object");
    for key in ["id", "name", "formation", "players", "assignments", "timing", "tags"] {
        assert!(object.contains_key(key), "missing {}", key);
    }
    assert_eq!(value["id"], "trips-right");
    assert_eq!(value["players"]["offense"].as_array().map(Vec::len), Some(11));
    assert_eq!(value["tags"][0], "3rd-down");
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("plays").join("slant.json");

    let mut state = DesignerState::with_clock(ManualClock::new());
    state.set_name("Slant");
    state.add_player(Side::Offense, Point::new(10.0, 42.0));
    state.save_to_file(&path).expect("save");
    assert!(!state.has_unsaved_changes());

    let mut loaded = DesignerState::with_clock(ManualClock::new());
    loaded.load_from_file(&path).expect("load");
    assert_eq!(loaded.diagram(), state.diagram());
    assert_eq!(
        loaded.add_player(Side::Offense, Point::new(20.0, 42.0)),
        "offense-2"
    );
}

#[test]
fn test_load_missing_file_errors() {
    let dir = TempDir::new().expect("tempdir");
    let mut state = DesignerState::with_clock(ManualClock::new());
    let err = state
        .load_from_file(dir.path().join("nope.json"))
        .expect_err("missing file");
    assert!(err.to_string().contains("Failed to read diagram file"));
    assert_eq!(state.diagram(), &PlayDiagram::default());
}

#[test]
fn test_orphan_assignment_dropped_on_load() {
    let text = r#"{
        "id": "orphan", "name": "Orphan",
        "assignments": {
            "offense": [
                {"playerId": "ghost", "type": "route", "path": [{"x":1,"y":1},{"x":2,"y":2}]}
            ]
        }
    }"#;
    let diagram = serialization::from_json(text).expect("repairable");
    assert!(diagram.assignments.offense.is_empty());
}

#[test]
fn test_bad_label_rejected() {
    let text = r#"{
        "id": "long", "name": "Long",
        "players": {
            "offense": [{"id":"a","position":"WR","x":1,"y":1,"label":"WIDE"}],
            "defense": []
        }
    }"#;
    assert!(matches!(
        serialization::from_json(text),
        Err(DesignerError::InvalidDiagram { .. })
    ));
}
