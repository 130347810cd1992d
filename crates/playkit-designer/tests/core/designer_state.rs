use playkit_core::{AppEvent, DiagramEvent, EventCategory, EventFilter, ManualClock};
use playkit_designer::canvas::DesignerTool;
use playkit_designer::designer_state::DesignerState;
use playkit_designer::formations::{FormationLibrary, FormationSource};
use playkit_designer::model::{AssignmentType, PathStyle, Point, Side};
use playkit_designer::serialization;
use playkit_settings::DesignerSettings;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn session() -> DesignerState {
    DesignerState::with_clock(ManualClock::new())
}

#[test]
fn test_draw_then_formation_load() {
    let mut state = session();
    let id = state.add_player(Side::Offense, Point::new(50.0, 30.0));
    state.set_tool(DesignerTool::DrawRoute);
    state.select_player(Side::Offense, &id).expect("select");

    assert!(state.begin_drawing(Point::new(55.0, 20.0)));
    state.extend_drawing(Point::new(60.0, 10.0));
    assert_eq!(state.commit_drawing(), Some(3));

    let offense = &state.diagram().assignments.offense;
    assert_eq!(offense.len(), 1);
    assert_eq!(offense[0].kind, AssignmentType::Route);
    assert_eq!(offense[0].path.len(), 3);
    assert_eq!(offense[0].path[2], Point::new(60.0, 10.0));

    let library = FormationLibrary::new();
    state
        .load_formation_from(&library, Side::Offense, "i-formation")
        .expect("formation");

    let expected = &library
        .formation(Side::Offense, "i-formation")
        .expect("i-formation")
        .players;
    assert!(state.diagram().assignments.offense.is_empty());
    assert_eq!(&state.diagram().players.offense, expected);
}

#[test]
fn test_assignment_replacement() {
    let mut state = session();
    let id = state.add_player(Side::Offense, Point::new(30.0, 45.0));
    state.select_player(Side::Offense, &id).expect("select");

    state.set_tool(DesignerTool::DrawRoute);
    state.select_player(Side::Offense, &id).expect("select");
    state.begin_drawing(Point::new(30.0, 30.0));
    state.commit_drawing();

    state.set_tool(DesignerTool::DrawBlock);
    state.select_player(Side::Offense, &id).expect("select");
    state.begin_drawing(Point::new(32.0, 40.0));
    state.extend_drawing(Point::new(34.0, 38.0));
    state.commit_drawing();

    let offense = &state.diagram().assignments.offense;
    assert_eq!(offense.len(), 1);
    assert_eq!(offense[0].kind, AssignmentType::Block);
    assert_eq!(offense[0].path.len(), 3);
}

#[test]
fn test_single_point_drawing_is_discarded() {
    let mut state = session();
    let id = state.add_player(Side::Offense, Point::new(30.0, 45.0));
    state.set_tool(DesignerTool::DrawRoute);
    state.select_player(Side::Offense, &id).expect("select");

    state.extend_drawing(Point::new(10.0, 10.0));
    assert_eq!(state.commit_drawing(), None);
    assert!(state.diagram().assignments.offense.is_empty());
}

#[test]
fn test_drawing_without_selection_is_noop() {
    let mut state = session();
    state.add_player(Side::Offense, Point::new(30.0, 45.0));
    state.set_tool(DesignerTool::DrawRoute);

    assert!(!state.begin_drawing(Point::new(30.0, 30.0)));
    assert!(!state.is_drawing());
    assert!(state.diagram().assignments.offense.is_empty());
}

#[test]
fn test_erase_cascades_to_assignment() {
    let mut state = session();
    let id = state.add_player(Side::Defense, Point::new(20.0, 20.0));
    state.set_tool(DesignerTool::DrawRoute);
    state.select_player(Side::Defense, &id).expect("select");
    state.begin_drawing(Point::new(25.0, 25.0));
    state.commit_drawing();
    assert_eq!(state.diagram().assignments.get(Side::Defense).len(), 1);

    assert!(state.remove_player(Side::Defense, &id));
    assert!(state.diagram().players.defense.is_empty());
    assert!(state.diagram().assignments.get(Side::Defense).is_empty());
    assert!(state.selected_player().is_none());
}

#[test]
fn test_erasing_unassigned_defense_keeps_export_shape() {
    let mut state = session();
    let before = serialization::to_json(&state.export_diagram()).expect("json");
    assert!(!before.contains("\"defense\": []"));

    let id = state.add_player(Side::Defense, Point::new(40.0, 20.0));
    assert!(state.remove_player(Side::Defense, &id));

    let exported = state.export_diagram();
    assert!(exported.assignments.defense.is_none());
    let value: serde_json::Value =
        serde_json::from_str(&serialization::to_json(&exported).expect("json")).expect("parse");
    assert!(value["assignments"].get("defense").is_none());
}

#[test]
fn test_ids_never_reused_after_erase() {
    let mut state = session();
    let first = state.add_player(Side::Offense, Point::new(20.0, 45.0));
    state.remove_player(Side::Offense, &first);
    let second = state.add_player(Side::Offense, Point::new(20.0, 45.0));
    assert_ne!(first, second);
    assert_eq!(second, "offense-2");
}

#[test]
fn test_sessions_do_not_share_state() {
    let mut a = session();
    let mut b = session();
    a.add_player(Side::Offense, Point::new(20.0, 45.0));
    a.add_player(Side::Offense, Point::new(25.0, 45.0));

    assert_eq!(b.add_player(Side::Offense, Point::new(20.0, 45.0)), "offense-1");
    assert!(b.diagram().players.offense.len() == 1);
    assert_eq!(a.diagram().players.offense.len(), 2);
}

#[test]
fn test_added_players_are_clamped() {
    let mut state = session();
    let id = state.add_player(Side::Offense, Point::new(-5.0, 99.0));
    let player = state.diagram().player(Side::Offense, &id).expect("player");
    assert_eq!((player.x, player.y), (3.0, 72.0));
    assert_eq!(player.position, "WR");
    assert_eq!(state.diagram().players.offense.len(), 1);
}

#[test]
fn test_oversized_margin_setting_does_not_panic() {
    let settings = DesignerSettings {
        clamp_margin: 40.0,
        ..DesignerSettings::default()
    };
    let mut state = session().with_settings(&settings);
    let id = state.add_player(Side::Offense, Point::new(50.0, 30.0));
    let player = state.diagram().player(Side::Offense, &id).expect("player");
    assert_eq!((player.x, player.y), (50.0, 37.5));

    state.move_player(Side::Offense, &id, Point::new(0.0, 0.0)).expect("move");
    let player = state.diagram().player(Side::Offense, &id).expect("player");
    assert_eq!((player.x, player.y), (40.0, 37.5));
}

#[test]
fn test_labels_and_annotations() {
    let mut state = session();
    let id = state.add_player(Side::Offense, Point::new(30.0, 45.0));
    state
        .update_player_label(Side::Offense, &id, " Slot ")
        .expect("label");
    state
        .update_player_position_label(Side::Offense, &id, "Slot receiver")
        .expect("position");
    let player = state.diagram().player(Side::Offense, &id).expect("player");
    assert_eq!(player.label, "Slo");
    assert_eq!(player.position, "Slot receiver");

    state.set_tool(DesignerTool::DrawRoute);
    state.select_player(Side::Offense, &id).expect("select");
    state.begin_drawing(Point::new(30.0, 30.0));
    state.commit_drawing();
    state
        .set_assignment_type(Side::Offense, &id, AssignmentType::Run)
        .expect("type");
    state
        .set_assignment_style(Side::Offense, &id, Some(PathStyle::Dashed))
        .expect("style");
    state
        .set_read_key(Side::Offense, &id, Some("Mike LB"))
        .expect("read key");

    let assignment = state
        .diagram()
        .assignment_for(Side::Offense, &id)
        .expect("assignment");
    assert_eq!(assignment.kind, AssignmentType::Run);
    assert_eq!(assignment.style, Some(PathStyle::Dashed));
    assert_eq!(assignment.read_key.as_deref(), Some("Mike LB"));

    assert!(state.remove_assignment(Side::Offense, &id));
    assert!(!state.remove_assignment(Side::Offense, &id));
}

#[test]
fn test_hit_test_prefers_topmost() {
    let mut state = session();
    state.add_player(Side::Offense, Point::new(30.0, 40.0));
    let defender = state.add_player(Side::Defense, Point::new(31.0, 40.0));

    let hit = state.hit_test(Point::new(30.5, 40.0)).expect("hit");
    assert_eq!(hit.side, Side::Defense);
    assert_eq!(hit.id, defender);

    state.toggle_defense();
    let hit = state.hit_test(Point::new(30.5, 40.0)).expect("hit");
    assert_eq!(hit.side, Side::Offense);
    assert!(state.hit_test(Point::new(80.0, 10.0)).is_none());
}

#[test]
fn test_mutations_publish_diagram_events() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut state = session();
    let sink = seen.clone();
    let subscription = state.subscribe(
        EventFilter::Categories(vec![EventCategory::Diagram]),
        move |event| sink.lock().expect("lock").push(event),
    );

    let id = state.add_player(Side::Offense, Point::new(30.0, 45.0));
    state.set_tool(DesignerTool::Erase);
    state.remove_player(Side::Offense, &id);
    assert!(state.unsubscribe(subscription));
    state.add_player(Side::Offense, Point::new(30.0, 45.0));

    let events = seen.lock().expect("lock");
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        AppEvent::Diagram(DiagramEvent::PlayerAdded { player_id, .. }) if player_id == &id
    ));
    assert!(matches!(
        &events[1],
        AppEvent::Diagram(DiagramEvent::PlayerRemoved { .. })
    ));
}

#[test]
fn test_remove_last_timing_step_is_refused() {
    let mut state = session();
    assert_eq!(state.remove_timing_step(1), Ok(false));
    assert_eq!(state.diagram().timing.len(), 1);
    assert!(state.remove_timing_step(2).is_err());
}

#[derive(Debug, Clone)]
enum TimingEdit {
    Add,
    Remove(u32),
}

fn timing_edit() -> impl Strategy<Value = TimingEdit> {
    prop_oneof![Just(TimingEdit::Add), (1u32..8).prop_map(TimingEdit::Remove)]
}

proptest! {
    #[test]
    fn prop_timing_stays_contiguous(edits in proptest::collection::vec(timing_edit(), 0..40)) {
        let mut state = session();
        for edit in edits {
            match edit {
                TimingEdit::Add => {
                    state.add_timing_step("Step");
                }
                TimingEdit::Remove(step) => {
                    let _ = state.remove_timing_step(step);
                }
            }
            let timing = &state.diagram().timing;
            prop_assert!(!timing.is_empty());
            for (index, step) in timing.iter().enumerate() {
                prop_assert_eq!(step.step as usize, index + 1);
            }
        }
    }
}
