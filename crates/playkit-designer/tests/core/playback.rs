use playkit_core::{AppEvent, EventFilter, ManualClock, PlaybackEvent};
use playkit_designer::model::{Assignment, AssignmentType, PlayDiagram, Point, TimingStep};
use playkit_designer::playback::{advance, PlaybackEngine, PlaybackState};
use playkit_settings::PlaybackSettings;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn diagram_with_steps(steps: u32) -> PlayDiagram {
    let mut diagram = PlayDiagram::new("Timing");
    diagram.timing = (1..=steps)
        .map(|step| TimingStep::new(step, format!("Step {}", step)))
        .collect();
    diagram
}

fn engine(steps: u32) -> (PlaybackEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (PlaybackEngine::new(diagram_with_steps(steps), clock.clone()), clock)
}

#[test]
fn test_speed_change_mid_playback() {
    let (mut engine, clock) = engine(4);
    let steps = Arc::new(Mutex::new(Vec::new()));
    let sink = steps.clone();
    engine.events().subscribe(EventFilter::All, move |event| {
        if let AppEvent::Playback(PlaybackEvent::StepChanged { step, .. }) = event {
            sink.lock().expect("lock").push(step);
        }
    });

    engine.handle_play_pause();
    assert_eq!(engine.next_wake_at(), Some(1200));

    clock.set(1200);
    assert_eq!(engine.poll(), 1);
    engine.set_speed(2.0);
    assert_eq!(engine.step_delay_ms(), 600);
    assert_eq!(engine.next_wake_at(), Some(1800));

    let mut advances = vec![1200];
    for t in (1300..=4000).step_by(100) {
        clock.set(t);
        if engine.poll() > 0 {
            advances.push(t);
        }
    }

    assert_eq!(advances, vec![1200, 1800, 2400, 3000]);
    assert_eq!(engine.current_step(), 4);
    assert!(!engine.is_playing());
    assert_eq!(engine.next_wake_at(), None);
    assert_eq!(steps.lock().expect("lock").as_slice(), &[1, 2, 3, 4]);
}

#[test]
fn test_late_poll_catches_up_without_drift() {
    let (mut engine, clock) = engine(3);
    engine.handle_play_pause();
    clock.set(2500);
    assert_eq!(engine.poll(), 2);
    assert_eq!(engine.next_wake_at(), Some(3600));
}

#[test]
fn test_settings_apply() {
    let settings = PlaybackSettings {
        base_step_delay_ms: 1000,
        default_speed: 1.5,
        ..PlaybackSettings::default()
    };
    let engine = PlaybackEngine::new(diagram_with_steps(2), ManualClock::new()).with_settings(&settings);
    assert_eq!(engine.speed(), 1.5);
    assert_eq!(engine.step_delay_ms(), 667);
}

#[test]
fn test_frame_reveals_paths_progressively() {
    let mut diagram = diagram_with_steps(2);
    diagram
        .players
        .offense
        .push(playkit_designer::model::PlayerPosition::new("x", "WR", 10.0, 40.0, "X"));
    diagram.assignments.offense.push(Assignment::new(
        "x",
        AssignmentType::Route,
        vec![Point::new(10.0, 40.0), Point::new(10.0, 20.0)],
    ));
    let mut engine = PlaybackEngine::new(diagram, ManualClock::new());

    let frame = engine.frame();
    assert_eq!(frame.step, 0);
    assert!(frame.paths.is_empty());

    engine.step_forward();
    let frame = engine.frame();
    assert_eq!(frame.paths.len(), 1);
    let end = *frame.paths[0].points.last().expect("end");
    assert!((end.y - 30.0).abs() < 1e-9);
    assert!(!frame.paths[0].show_arrow);

    engine.step_forward();
    let frame = engine.frame();
    assert!(frame.paths[0].show_arrow);
    assert_eq!(frame.caption, "Step 2");
}

proptest! {
    #[test]
    fn prop_advance_is_monotonic_and_terminates(total in 0usize..12, start in 0usize..12) {
        let mut state = PlaybackState::new(total);
        state.current_step = start.min(total);
        state.is_playing = true;

        let mut iterations = 0;
        while state.effectively_playing() {
            let next = advance(state);
            prop_assert!(next.current_step >= state.current_step);
            prop_assert!(next.current_step <= total);
            state = next;
            iterations += 1;
            prop_assert!(iterations <= total + 1);
        }
        prop_assert_eq!(state.current_step, total);
    }

    #[test]
    fn prop_engine_traverses_every_step_once(steps in 1u32..8, polls in proptest::collection::vec(1u64..3000, 1..40)) {
        let (mut engine, clock) = engine(steps);
        engine.handle_play_pause();
        let mut traversed = 0;
        let mut now = 0;
        for delta in polls {
            now += delta;
            clock.set(now);
            traversed += engine.poll();
        }
        clock.set(now + 1200 * steps as u64);
        traversed += engine.poll();

        prop_assert_eq!(traversed, steps as usize);
        prop_assert_eq!(engine.current_step(), steps as usize);
        prop_assert!(!engine.is_playing());
    }
}
