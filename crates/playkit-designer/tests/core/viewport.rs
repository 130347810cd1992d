use playkit_designer::canvas::PointerEvent;
use playkit_designer::model::Point;
use playkit_designer::viewport::{FieldTransform, SurfaceBounds};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_display_round_trip(x in 0.0f64..=100.0, y in 0.0f64..=75.0, flipped in any::<bool>()) {
        let transform = FieldTransform::new();
        let (px, py) = transform.to_display(x, y, flipped);
        let back = transform.from_display(px, py, flipped);
        prop_assert!((back.x - x).abs() < 1e-9);
        prop_assert!((back.y - y).abs() < 1e-9);
    }

    #[test]
    fn prop_clamp_stays_inside(x in -50.0f64..150.0, y in -50.0f64..125.0) {
        let transform = FieldTransform::new();
        let clamped = transform.clamp(Point::new(x, y));
        let (min, max) = transform.safe_bounds();
        prop_assert!(clamped.x >= min.x && clamped.x <= max.x);
        prop_assert!(clamped.y >= min.y && clamped.y <= max.y);
    }
}

#[test]
fn test_display_size() {
    let transform = FieldTransform::new();
    assert_eq!(transform.display_size(), (800.0, 600.0));
}

#[test]
fn test_flip_mirrors_vertically() {
    let transform = FieldTransform::new();
    assert_eq!(transform.to_display(10.0, 30.0, false), (80.0, 240.0));
    assert_eq!(transform.to_display(10.0, 30.0, true), (80.0, 360.0));
}

#[test]
fn test_pointer_on_zoomed_surface() {
    let transform = FieldTransform::new();
    // Rendered at half size, offset within the page.
    let bounds = SurfaceBounds::new(10.0, 20.0, 400.0, 300.0);
    let event = PointerEvent::new(10.0 + 160.0 * 0.5, 20.0 + 360.0 * 0.5);

    let point = transform.from_pointer_event(&event, &bounds, false);
    assert!((point.x - 20.0).abs() < 1e-9);
    assert!((point.y - 45.0).abs() < 1e-9);
}

#[test]
fn test_clamp_uses_margin() {
    let transform = FieldTransform::new();
    assert_eq!(transform.clamp(Point::new(-10.0, 200.0)), Point::new(3.0, 72.0));
    assert_eq!(transform.clamp(Point::new(50.0, 40.0)), Point::new(50.0, 40.0));
}
