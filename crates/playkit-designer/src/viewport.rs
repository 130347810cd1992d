//! Field coordinate transformation.
//!
//! Maps logical field coordinates (x across, y down the field) onto the fixed
//! aspect display surface and back. The model only ever stores unflipped
//! logical coordinates; the flip is applied on the way to and from the
//! display.

use playkit_core::constants::{CLAMP_MARGIN, FIELD_HEIGHT, FIELD_WIDTH, SCALE};

use crate::canvas::PointerEvent;
use crate::model::Point;

/// Bounding rectangle of the rendered surface in client coordinates.
///
/// The rendered size may differ from the display size when the host zooms or
/// scales the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds matching a transform's display size at the client origin.
    pub fn unscaled(transform: &FieldTransform) -> Self {
        let (width, height) = transform.display_size();
        Self::new(0.0, 0.0, width, height)
    }
}

/// Logical to display mapping with a safe interior for clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTransform {
    field_width: f64,
    field_height: f64,
    scale: f64,
    clamp_margin: f64,
}

impl Default for FieldTransform {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            scale: SCALE,
            clamp_margin: CLAMP_MARGIN,
        }
    }
}

impl FieldTransform {
    /// Creates the standard field transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the safe interior margin. Negative values are treated as 0.
    pub fn with_clamp_margin(mut self, margin: f64) -> Self {
        self.clamp_margin = margin.max(0.0);
        self
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn clamp_margin(&self) -> f64 {
        self.clamp_margin
    }

    pub fn field_size(&self) -> (f64, f64) {
        (self.field_width, self.field_height)
    }

    /// Display surface size in pixels.
    pub fn display_size(&self) -> (f64, f64) {
        (
            self.field_width * self.scale,
            self.field_height * self.scale,
        )
    }

    /// Converts logical coordinates to display pixels.
    ///
    /// ```text
    /// display_x = x * scale
    /// display_y = y * scale                    (normal)
    /// display_y = (field_height - y) * scale   (flipped)
    /// ```
    pub fn to_display(&self, x: f64, y: f64, flipped: bool) -> (f64, f64) {
        let y = if flipped { self.field_height - y } else { y };
        (x * self.scale, y * self.scale)
    }

    pub fn point_to_display(&self, point: &Point, flipped: bool) -> (f64, f64) {
        self.to_display(point.x, point.y, flipped)
    }

    /// Converts display pixels back to logical coordinates.
    pub fn from_display(&self, px: f64, py: f64, flipped: bool) -> Point {
        let x = px / self.scale;
        let y = py / self.scale;
        let y = if flipped { self.field_height - y } else { y };
        Point::new(x, y)
    }

    /// Maps a pointer event's client position into logical coordinates.
    ///
    /// Client coordinates are first scaled proportionally against the
    /// rendered bounds, so on-screen zoom and pixel density do not leak into
    /// the model.
    pub fn from_pointer_event(
        &self,
        event: &PointerEvent,
        bounds: &SurfaceBounds,
        flipped: bool,
    ) -> Point {
        let (display_width, display_height) = self.display_size();
        let sx = if bounds.width > 0.0 {
            display_width / bounds.width
        } else {
            1.0
        };
        let sy = if bounds.height > 0.0 {
            display_height / bounds.height
        } else {
            1.0
        };

        let px = (event.client_x - bounds.left) * sx;
        let py = (event.client_y - bounds.top) * sy;
        self.from_display(px, py, flipped)
    }

    /// Whether a logical point lies on the field at all.
    pub fn contains_logical(&self, point: &Point) -> bool {
        (0.0..=self.field_width).contains(&point.x) && (0.0..=self.field_height).contains(&point.y)
    }

    /// Safe interior rectangle as (min, max) corners.
    ///
    /// A margin wider than half an axis collapses that axis to the field centre.
    pub fn safe_bounds(&self) -> (Point, Point) {
        let margin_x = self.clamp_margin.min(self.field_width / 2.0);
        let margin_y = self.clamp_margin.min(self.field_height / 2.0);
        (
            Point::new(margin_x, margin_y),
            Point::new(self.field_width - margin_x, self.field_height - margin_y),
        )
    }

    /// Clamps a logical point into the safe interior.
    pub fn clamp(&self, point: Point) -> Point {
        let (min, max) = self.safe_bounds();
        Point::new(point.x.clamp(min.x, max.x), point.y.clamp(min.y, max.y))
    }
}
