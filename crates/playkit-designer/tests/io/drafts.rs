use playkit_core::{AppEvent, EventCategory, EventFilter, ManualClock, PersistenceError, PersistenceEvent};
use playkit_designer::designer_state::DesignerState;
use playkit_designer::export::{MemoryPlaySink, PlaySink};
use playkit_designer::model::{Point, Side};
use playkit_designer::serialization;
use playkit_settings::{DesignerSettings, DraftStore, FileDraftStore, MemoryDraftStore};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn session_with_store() -> (DesignerState, ManualClock, Rc<MemoryDraftStore>) {
    let clock = ManualClock::new();
    let store = Rc::new(MemoryDraftStore::new());
    let state = DesignerState::with_clock(clock.clone()).with_draft_store(store.clone());
    (state, clock, store)
}

#[test]
fn test_autosave_is_debounced() {
    let (mut state, clock, store) = session_with_store();

    state.add_player(Side::Offense, Point::new(20.0, 45.0));
    assert_eq!(state.autosave_due_at(), Some(30_000));

    clock.set(20_000);
    state.add_player(Side::Offense, Point::new(25.0, 45.0));
    assert_eq!(state.autosave_due_at(), Some(50_000));

    clock.set(30_000);
    assert!(!state.poll_autosave());
    assert_eq!(store.write_count(), 0);

    clock.set(50_000);
    assert!(state.poll_autosave());
    assert_eq!(store.write_count(), 1);
    assert!(!state.has_unsaved_changes());
    assert_eq!(state.autosave_due_at(), None);

    let draft = store.read("designer-draft").expect("read").expect("draft");
    let restored = serialization::from_json(&draft).expect("parse");
    assert_eq!(restored.players.offense.len(), 2);
}

#[test]
fn test_clean_session_is_not_saved() {
    let (mut state, clock, store) = session_with_store();
    state.toggle_flip();
    clock.set(60_000);
    assert!(!state.poll_autosave());
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_failed_autosave_keeps_dirty_flag() {
    let (mut state, clock, store) = session_with_store();
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = failures.clone();
    state.subscribe(
        EventFilter::Categories(vec![EventCategory::Persistence]),
        move |event| {
            if let AppEvent::Persistence(PersistenceEvent::DraftSaveFailed { reason, .. }) = event {
                sink.lock().expect("lock").push(reason);
            }
        },
    );

    store.set_fail_writes(true);
    state.set_name("Quota Buster");
    clock.set(30_000);
    assert!(!state.poll_autosave());
    assert!(state.has_unsaved_changes());
    assert!(state.needs_unload_confirmation());
    assert_eq!(failures.lock().expect("lock").len(), 1);
    assert!(!store.contains("designer-draft"));

    store.set_fail_writes(false);
    assert!(state.save_draft());
    assert!(!state.has_unsaved_changes());
}

#[test]
fn test_settings_change_idle_window() {
    let settings = DesignerSettings {
        autosave_idle_secs: 5,
        draft_key: "practice-draft".to_string(),
        ..DesignerSettings::default()
    };
    let clock = ManualClock::new();
    let store = Rc::new(MemoryDraftStore::new());
    let mut state = DesignerState::with_clock(clock.clone())
        .with_settings(&settings)
        .with_draft_store(store.clone());

    state.add_player(Side::Defense, Point::new(50.0, 35.0));
    assert_eq!(state.autosave_due_at(), Some(5_000));
    clock.set(5_000);
    assert!(state.poll_autosave());
    assert!(store.contains("practice-draft"));
}

#[test]
fn test_missing_draft_is_no_draft() {
    let (mut state, _clock, _store) = session_with_store();
    assert!(!state.restore_draft());
    assert!(!state.has_unsaved_changes());
}

#[test]
fn test_new_play_removes_draft() {
    let (mut state, _clock, store) = session_with_store();
    state.add_player(Side::Offense, Point::new(20.0, 45.0));
    assert!(state.save_draft());
    assert!(store.contains("designer-draft"));

    state.new_play();
    assert!(!store.contains("designer-draft"));
}

#[test]
fn test_file_draft_store_round_trip() {
    let dir = TempDir::new().expect("tempdir");

    let mut first =
        DesignerState::with_clock(ManualClock::new()).with_draft_store(FileDraftStore::new(dir.path()));
    first.set_name("Curl Flat");
    first.add_player(Side::Offense, Point::new(70.0, 42.0));
    assert!(first.save_draft());
    assert!(dir.path().join("designer-draft.json").exists());

    let mut second =
        DesignerState::with_clock(ManualClock::new()).with_draft_store(FileDraftStore::new(dir.path()));
    assert!(second.restore_draft());
    assert_eq!(second.diagram().name, "Curl Flat");
    assert_eq!(second.diagram().players.offense.len(), 1);
    assert_eq!(
        second.add_player(Side::Offense, Point::new(20.0, 45.0)),
        "offense-2"
    );
}

#[test]
fn test_hand_off_marks_saved() {
    let (mut state, _clock, _store) = session_with_store();
    state.set_name("Stick Nod");
    let mut sink = MemoryPlaySink::default();

    state.hand_off(&mut sink).expect("hand off");
    assert!(!state.has_unsaved_changes());
    assert_eq!(sink.plays.len(), 1);
    assert_eq!(sink.plays[0].0, "Stick Nod");
    let diagram = serialization::from_json(&sink.plays[0].1).expect("payload");
    assert_eq!(diagram.id, "stick-nod");
}

struct OfflineSink;

impl PlaySink for OfflineSink {
    fn save_play(&mut self, _name: &str, _payload: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable {
            reason: "offline".to_string(),
        })
    }
}

#[test]
fn test_failed_hand_off_stays_dirty() {
    let (mut state, _clock, _store) = session_with_store();
    state.set_name("Stick Nod");
    assert!(matches!(
        state.hand_off(&mut OfflineSink),
        Err(PersistenceError::Unavailable { .. })
    ));
    assert!(state.has_unsaved_changes());
}
