use playkit_core::{shared, ManualClock};
use playkit_designer::canvas::{CanvasSurface, DesignerTool, HitTarget, PointerEvent};
use playkit_designer::designer_state::DesignerState;
use playkit_designer::model::{Point, Side};
use playkit_designer::viewport::SurfaceBounds;

fn canvas() -> CanvasSurface {
    CanvasSurface::new(shared(DesignerState::with_clock(ManualClock::new())))
}

fn click(canvas: &mut CanvasSurface, x: f64, y: f64) -> HitTarget {
    let event = PointerEvent::new(x * 8.0, y * 8.0);
    let hit = canvas.pointer_down(&event);
    canvas.pointer_up(&event);
    hit
}

#[test]
fn test_erase_tool_scenario() {
    let mut canvas = canvas();
    canvas.session().borrow_mut().set_tool(DesignerTool::AddDefense);
    assert_eq!(click(&mut canvas, 20.0, 20.0), HitTarget::Field);
    assert_eq!(canvas.session().borrow().diagram().players.defense.len(), 1);

    canvas.session().borrow_mut().set_tool(DesignerTool::Erase);
    assert!(matches!(click(&mut canvas, 20.0, 20.0), HitTarget::Player(_)));

    let session = canvas.session().borrow();
    assert!(session.diagram().players.defense.is_empty());
    assert!(session.diagram().assignments.get(Side::Defense).is_empty());
}

#[test]
fn test_select_on_empty_field_is_noop() {
    let mut canvas = canvas();
    assert_eq!(click(&mut canvas, 50.0, 50.0), HitTarget::Field);
    let session = canvas.session().borrow();
    assert!(session.diagram().players.offense.is_empty());
    assert!(!session.has_unsaved_changes());
    assert!(canvas.listeners().is_balanced());
    assert_eq!(canvas.listeners().attached_total(), 0);
}

#[test]
fn test_add_tool_ignores_existing_player() {
    let mut canvas = canvas();
    canvas.session().borrow_mut().set_tool(DesignerTool::AddOffense);
    click(&mut canvas, 30.0, 45.0);
    assert!(matches!(click(&mut canvas, 30.0, 45.0), HitTarget::Player(_)));
    assert_eq!(canvas.session().borrow().diagram().players.offense.len(), 1);
}

#[test]
fn test_repeated_drags_stay_balanced() {
    let mut canvas = canvas();
    let id = canvas
        .session()
        .borrow_mut()
        .add_player(Side::Offense, Point::new(20.0, 45.0));

    let mut x = 20.0;
    for _ in 0..5 {
        canvas.pointer_down(&PointerEvent::new(x * 8.0, 360.0));
        x += 5.0;
        canvas.pointer_move(&PointerEvent::new(x * 8.0, 360.0));
        canvas.pointer_up(&PointerEvent::new(x * 8.0, 360.0));
        assert_eq!(canvas.listeners().active(), 0);
    }

    let ledger = canvas.listeners();
    assert_eq!(ledger.attached_total(), 5);
    assert_eq!(ledger.detached_total(), 5);
    let session = canvas.session().borrow();
    let player = session.diagram().player(Side::Offense, &id).expect("player");
    assert_eq!(player.x, 45.0);
}

#[test]
fn test_drag_is_clamped() {
    let mut canvas = canvas();
    let id = canvas
        .session()
        .borrow_mut()
        .add_player(Side::Offense, Point::new(20.0, 45.0));

    canvas.pointer_down(&PointerEvent::new(160.0, 360.0));
    canvas.pointer_move(&PointerEvent::new(-400.0, 900.0));
    canvas.pointer_up(&PointerEvent::new(-400.0, 900.0));

    let session = canvas.session().borrow();
    let player = session.diagram().player(Side::Offense, &id).expect("player");
    assert_eq!((player.x, player.y), (3.0, 72.0));
}

#[test]
fn test_flipped_surface_maps_to_unflipped_model() {
    let session = shared(DesignerState::with_clock(ManualClock::new()));
    {
        let mut session = session.borrow_mut();
        session.toggle_flip();
        session.set_tool(DesignerTool::AddOffense);
    }
    let mut canvas = CanvasSurface::with_bounds(session, SurfaceBounds::new(0.0, 0.0, 400.0, 300.0));

    // Client (80, 120) on a half-size surface is display (160, 240); flipped, that is y = 75 - 30.
    canvas.pointer_down(&PointerEvent::new(80.0, 120.0));
    let session = canvas.session().borrow();
    let player = &session.diagram().players.offense[0];
    assert_eq!((player.x, player.y), (20.0, 45.0));
}

#[test]
fn test_render_shows_players_and_selection() {
    let mut canvas = canvas();
    canvas
        .session()
        .borrow_mut()
        .add_player(Side::Offense, Point::new(20.0, 45.0));
    canvas.pointer_down(&PointerEvent::new(160.0, 360.0));

    let svg = canvas.render();
    assert!(svg.contains(r#"data-id="offense-1""#));
    assert!(svg.contains("selection"));
    assert!(!canvas.needs_redraw());
    canvas.pointer_up(&PointerEvent::new(160.0, 360.0));
}
