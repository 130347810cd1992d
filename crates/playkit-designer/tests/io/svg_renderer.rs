use playkit_core::ManualClock;
use playkit_designer::designer_state::DesignerState;
use playkit_designer::model::{
    Assignment, AssignmentType, PathStyle, PlayDiagram, PlayerPosition, Point,
};
use playkit_designer::playback::PlaybackEngine;
use playkit_designer::svg_renderer::{RenderOptions, SvgRenderer};
use playkit_designer::viewport::FieldTransform;
use playkit_settings::Theme;

fn play() -> PlayDiagram {
    let mut diagram = PlayDiagram::new("Power");
    diagram
        .players
        .offense
        .push(PlayerPosition::new("g", "OG", 46.0, 42.0, "LG"));
    diagram
        .players
        .offense
        .push(PlayerPosition::new("h", "WR", 20.0, 42.0, "H"));
    diagram.assignments.offense.push(Assignment::new(
        "g",
        AssignmentType::Block,
        vec![Point::new(46.0, 42.0), Point::new(50.0, 38.0)],
    ));
    let mut sweep = Assignment::new(
        "h",
        AssignmentType::Run,
        vec![Point::new(20.0, 42.0), Point::new(30.0, 42.0)],
    );
    sweep.style = Some(PathStyle::Dotted);
    diagram.assignments.offense.push(sweep);
    diagram
}

#[test]
fn test_assignment_markup() {
    let svg = SvgRenderer::default().render_diagram(&play());
    assert!(svg.contains(r#"class="assignment offense block" data-player="g" d="M 368 336 L 400 304""#));
    assert!(svg.contains(r#"marker-end="url(#block-end)""#));
    assert!(svg.contains(r#"class="assignment offense run" data-player="h""#));
    assert!(svg.contains("stroke-dasharray"));
    assert!(svg.contains(r#"class="line-of-scrimmage""#));
}

#[test]
fn test_flipped_render_mirrors_paths() {
    let renderer = SvgRenderer::new(
        FieldTransform::new(),
        RenderOptions {
            flipped: true,
            ..RenderOptions::default()
        },
    );
    let svg = renderer.render_diagram(&play());
    assert!(svg.contains(r#"d="M 368 264 L 400 296""#));
}

#[test]
fn test_session_render_follows_view_flags() {
    let mut state = DesignerState::with_clock(ManualClock::new());
    state.load_diagram(play());
    state.add_player(playkit_designer::model::Side::Defense, Point::new(46.0, 36.0));
    state.toggle_defense();

    let renderer = SvgRenderer::for_session(&state, Theme::Field);
    let svg = renderer.render_session(&state);
    assert!(!svg.contains(r#"class="player defense""#));
    assert_eq!(svg.matches(r#"class="player offense""#).count(), 2);
}

#[test]
fn test_frame_caption() {
    let mut engine = PlaybackEngine::new(play(), ManualClock::new());
    let renderer = SvgRenderer::default();

    let svg = renderer.render_frame(&engine.frame());
    assert!(svg.contains("Pre-snap formation (0/1)"));

    engine.step_forward();
    let svg = renderer.render_frame(&engine.frame());
    assert!(svg.contains("Snap (1/1)"));
    assert!(svg.contains(r#"marker-end="url(#arrow)""#));
}
