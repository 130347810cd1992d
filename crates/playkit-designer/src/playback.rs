//! Animation playback for finalized play diagrams.
//!
//! The engine owns its own copy of a diagram and steps through its timing
//! steps. Path reveal is continuous: `progress = current_step / total_steps`
//! decides how much of every assignment's path is drawn.
//!
//! Scheduling is an explicit state machine. There is at most one pending
//! wake at any time; the host calls [`PlaybackEngine::poll`] and every wake
//! that has come due applies the pure [`advance`] transition.

use playkit_core::constants::{
    ARROW_PROGRESS_THRESHOLD, BASE_STEP_DELAY_MS, MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED,
};
use playkit_core::{AppEvent, Clock, EventBus, OneShotTimer, PlaybackEvent};
use playkit_settings::PlaybackSettings;

use crate::model::{AssignmentType, PathStyle, PlayDiagram, PlayerPosition, Point, Side};

/// Caption shown before the first step.
pub const PRE_SNAP_CAPTION: &str = "Pre-snap formation";

/// Step position and play intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    /// 0 is the pre-snap formation, `total_steps` is the end.
    pub current_step: usize,
    pub total_steps: usize,
    /// Play intent; see [`PlaybackState::effectively_playing`].
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 0,
            total_steps,
            is_playing: false,
        }
    }

    /// Playing and not yet at the final step.
    pub fn effectively_playing(&self) -> bool {
        self.is_playing && self.current_step < self.total_steps
    }

    pub fn is_finished(&self) -> bool {
        self.current_step >= self.total_steps
    }

    /// Fraction of the play shown, 0..=1.
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            0.0
        } else {
            self.current_step as f64 / self.total_steps as f64
        }
    }
}

/// One auto-advance tick.
///
/// Moves forward one step while effectively playing and drops the play
/// intent on reaching the final step. Anything else is returned unchanged.
pub fn advance(state: PlaybackState) -> PlaybackState {
    if !state.effectively_playing() {
        return state;
    }
    let current_step = state.current_step + 1;
    PlaybackState {
        current_step,
        total_steps: state.total_steps,
        is_playing: current_step < state.total_steps,
    }
}

/// The visible part of one assignment path.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealedPath {
    pub side: Side,
    pub player_id: String,
    pub kind: AssignmentType,
    pub style: PathStyle,
    /// Drawn portion, at least two points.
    pub points: Vec<Point>,
    /// Arrowheads only appear once the path is (nearly) complete.
    pub show_arrow: bool,
}

/// Everything needed to draw one moment of playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackFrame {
    pub step: usize,
    pub total_steps: usize,
    pub progress: f64,
    pub caption: String,
    pub offense: Vec<PlayerPosition>,
    /// Empty while defense is hidden.
    pub defense: Vec<PlayerPosition>,
    pub paths: Vec<RevealedPath>,
}

/// Cuts `path` to the leading `fraction` of its length.
pub fn reveal_path(path: &[Point], fraction: f64) -> Vec<Point> {
    let Some(first) = path.first() else {
        return Vec::new();
    };
    if fraction >= 1.0 {
        return path.to_vec();
    }

    let total: f64 = path.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if fraction <= 0.0 || total <= 0.0 {
        return vec![*first];
    }

    let mut remaining = total * fraction;
    let mut revealed = vec![*first];
    for pair in path.windows(2) {
        let segment = pair[0].distance_to(&pair[1]);
        if segment >= remaining {
            let t = if segment > 0.0 { remaining / segment } else { 1.0 };
            revealed.push(pair[0].lerp(&pair[1], t));
            break;
        }
        remaining -= segment;
        revealed.push(pair[1]);
    }
    revealed
}

/// Step-based replay of one diagram.
pub struct PlaybackEngine<C: Clock> {
    diagram: PlayDiagram,
    state: PlaybackState,
    speed: f64,
    base_delay_ms: u64,
    min_speed: f64,
    max_speed: f64,
    show_defense: bool,
    timer: OneShotTimer,
    clock: C,
    events: EventBus,
    torn_down: bool,
}

impl<C: Clock> PlaybackEngine<C> {
    /// Creates a paused engine at step 0 over its own copy of `diagram`.
    pub fn new(diagram: PlayDiagram, clock: C) -> Self {
        let state = PlaybackState::new(diagram.total_steps());
        Self {
            diagram,
            state,
            speed: 1.0,
            base_delay_ms: BASE_STEP_DELAY_MS,
            min_speed: MIN_PLAYBACK_SPEED,
            max_speed: MAX_PLAYBACK_SPEED,
            show_defense: true,
            timer: OneShotTimer::new(),
            clock,
            events: EventBus::new(),
            torn_down: false,
        }
    }

    /// Applies playback settings (base delay, speed range, starting speed).
    pub fn with_settings(mut self, settings: &PlaybackSettings) -> Self {
        self.base_delay_ms = settings.base_step_delay_ms.max(1);
        self.min_speed = settings.min_speed;
        self.max_speed = settings.max_speed.max(settings.min_speed);
        self.speed = settings
            .default_speed
            .clamp(self.min_speed, self.max_speed);
        self
    }

    pub fn diagram(&self) -> &PlayDiagram {
        &self.diagram
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.state.total_steps
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn effectively_playing(&self) -> bool {
        self.state.effectively_playing()
    }

    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn show_defense(&self) -> bool {
        self.show_defense
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// When the pending auto-advance fires, if one is pending.
    pub fn next_wake_at(&self) -> Option<u64> {
        self.timer.due_at()
    }

    /// Delay between auto-advances at the current speed.
    pub fn step_delay_ms(&self) -> u64 {
        ((self.base_delay_ms as f64 / self.speed).round() as u64).max(1)
    }

    /// Description for the current step.
    pub fn caption(&self) -> String {
        match self.state.current_step {
            0 => PRE_SNAP_CAPTION.to_string(),
            step => self
                .diagram
                .timing
                .get(step - 1)
                .map(|t| t.description.clone())
                .unwrap_or_default(),
        }
    }

    /// Play or pause. A finished play restarts from step 0.
    pub fn handle_play_pause(&mut self) {
        if self.torn_down {
            return;
        }
        if self.state.is_finished() {
            self.set_step(0);
            self.set_playing(true);
        } else {
            let playing = !self.state.is_playing;
            self.set_playing(playing);
        }
        self.sync_timer();
    }

    /// Fires every wake that has come due. Returns the steps advanced.
    pub fn poll(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        let now = self.clock.now_ms();
        let mut advanced = 0;

        while let Some(due) = self.timer.due_at() {
            if !self.timer.fire_if_due(now) {
                break;
            }
            let before = self.state;
            self.state = advance(before);
            if self.state.current_step != before.current_step {
                advanced += 1;
                self.publish_step();
            }
            if self.state.is_playing != before.is_playing {
                tracing::debug!("Playback reached step {}, stopping", self.state.current_step);
                self.publish(PlaybackEvent::PlayStateChanged {
                    playing: self.state.is_playing,
                });
            }
            if self.state.effectively_playing() {
                // Chain from the deadline, not from `now`, so late polls do not drift.
                self.timer.schedule(due, self.step_delay_ms());
            }
        }
        advanced
    }

    /// Pauses and moves one step forward, stopping at the end.
    pub fn step_forward(&mut self) {
        self.pause();
        let step = (self.state.current_step + 1).min(self.state.total_steps);
        self.set_step(step);
    }

    /// Pauses and moves one step back, stopping at 0.
    pub fn step_back(&mut self) {
        self.pause();
        let step = self.state.current_step.saturating_sub(1);
        self.set_step(step);
    }

    /// Pauses and returns to the pre-snap formation.
    pub fn reset(&mut self) {
        self.pause();
        self.set_step(0);
    }

    /// Sets the speed multiplier, clamped to the supported range.
    ///
    /// While playing, the pending wake is replaced by one a full step delay
    /// at the new speed from now.
    pub fn set_speed(&mut self, speed: f64) {
        if !speed.is_finite() || speed <= 0.0 {
            tracing::warn!("Ignoring playback speed {}", speed);
            return;
        }
        let speed = speed.clamp(self.min_speed, self.max_speed);
        if (speed - self.speed).abs() < f64::EPSILON {
            return;
        }
        self.speed = speed;
        self.publish(PlaybackEvent::SpeedChanged { speed });

        if self.state.effectively_playing() && !self.torn_down {
            let now = self.clock.now_ms();
            self.timer.schedule(now, self.step_delay_ms());
        }
    }

    /// Shows or hides defense. Never touches the step position.
    pub fn toggle_defense(&mut self) {
        self.show_defense = !self.show_defense;
    }

    /// Cancels any pending wake and stops responding to play requests.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.state.is_playing = false;
        self.torn_down = true;
    }

    /// Snapshot of what to draw right now.
    pub fn frame(&self) -> PlaybackFrame {
        let progress = self.progress();
        let show_arrow = progress >= ARROW_PROGRESS_THRESHOLD;

        let mut sides = vec![Side::Offense];
        if self.show_defense {
            sides.push(Side::Defense);
        }

        let paths = sides
            .iter()
            .flat_map(|&side| {
                self.diagram
                    .assignments
                    .get(side)
                    .iter()
                    .filter(|a| a.is_drawable())
                    .filter_map(move |a| {
                        let points = reveal_path(&a.path, progress);
                        (points.len() >= 2).then(|| RevealedPath {
                            side,
                            player_id: a.player_id.clone(),
                            kind: a.kind,
                            style: a.effective_style(),
                            points,
                            show_arrow,
                        })
                    })
            })
            .collect();

        PlaybackFrame {
            step: self.state.current_step,
            total_steps: self.state.total_steps,
            progress,
            caption: self.caption(),
            offense: self.diagram.players.offense.clone(),
            defense: if self.show_defense {
                self.diagram.players.defense.clone()
            } else {
                Vec::new()
            },
            paths,
        }
    }

    fn pause(&mut self) {
        self.set_playing(false);
        self.timer.cancel();
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing != playing {
            self.state.is_playing = playing;
            self.publish(PlaybackEvent::PlayStateChanged { playing });
        }
    }

    fn set_step(&mut self, step: usize) {
        if self.state.current_step != step {
            self.state.current_step = step;
            self.publish_step();
        }
    }

    /// Keeps exactly one wake pending while effectively playing, none otherwise.
    fn sync_timer(&mut self) {
        if self.state.effectively_playing() {
            if !self.timer.is_armed() {
                let now = self.clock.now_ms();
                self.timer.schedule(now, self.step_delay_ms());
            }
        } else {
            self.timer.cancel();
            if self.state.is_playing {
                self.set_playing(false);
            }
        }
    }

    fn publish_step(&self) {
        self.publish(PlaybackEvent::StepChanged {
            step: self.state.current_step,
            total: self.state.total_steps,
        });
    }

    fn publish(&self, event: PlaybackEvent) {
        let _ = self.events.publish(AppEvent::Playback(event));
    }
}

impl<C: Clock> Drop for PlaybackEngine<C> {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

impl<C: Clock> std::fmt::Debug for PlaybackEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("diagram", &self.diagram.id)
            .field("state", &self.state)
            .field("speed", &self.speed)
            .field("next_wake_at", &self.timer.due_at())
            .finish()
    }
}
