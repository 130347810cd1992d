//! Canvas interaction surface.
//!
//! Turns pointer down/move/up into session calls. Coordinates arrive in
//! client space and are mapped through the session's [`FieldTransform`]
//! before anything reaches the model.
//!
//! [`FieldTransform`]: crate::viewport::FieldTransform

mod types;

pub use types::{DesignerTool, HitTarget, PlayerRef, PointerEvent};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use playkit_core::{EventFilter, Shared, SubscriptionId};
use playkit_settings::Theme;

use crate::designer_state::DesignerState;
use crate::model::Point;
use crate::svg_renderer::SvgRenderer;
use crate::viewport::SurfaceBounds;

/// Bookkeeping for document-level move/up listener pairs.
///
/// A drag attaches exactly one pair and every attached pair is detached
/// exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerLedger {
    active: usize,
    attached_total: usize,
    detached_total: usize,
}

impl ListenerLedger {
    fn attach(&mut self) {
        self.active += 1;
        self.attached_total += 1;
    }

    fn detach(&mut self) {
        if self.active > 0 {
            self.active -= 1;
            self.detached_total += 1;
        }
    }

    /// Pairs currently attached.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn attached_total(&self) -> usize {
        self.attached_total
    }

    pub fn detached_total(&self) -> usize {
        self.detached_total
    }

    /// Every attach has had its detach.
    pub fn is_balanced(&self) -> bool {
        self.active == 0 && self.attached_total == self.detached_total
    }
}

/// Interactive drawing surface bound to one designer session.
pub struct CanvasSurface {
    session: Shared<DesignerState>,
    bounds: SurfaceBounds,
    theme: Theme,
    drag: Option<PlayerRef>,
    drawing: bool,
    listeners: ListenerLedger,
    needs_redraw: Arc<AtomicBool>,
    subscription: SubscriptionId,
}

impl CanvasSurface {
    /// Creates a surface over `session`, rendered at its display size.
    pub fn new(session: Shared<DesignerState>) -> Self {
        let bounds = SurfaceBounds::unscaled(session.borrow().transform());
        Self::with_bounds(session, bounds)
    }

    /// Creates a surface whose rendered rectangle is `bounds`.
    pub fn with_bounds(session: Shared<DesignerState>, bounds: SurfaceBounds) -> Self {
        let needs_redraw = Arc::new(AtomicBool::new(true));
        let flag = needs_redraw.clone();
        let subscription = session
            .borrow()
            .subscribe(EventFilter::All, move |_| flag.store(true, Ordering::Release));

        Self {
            session,
            bounds,
            theme: Theme::default(),
            drag: None,
            drawing: false,
            listeners: ListenerLedger::default(),
            needs_redraw,
            subscription,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn session(&self) -> &Shared<DesignerState> {
        &self.session
    }

    pub fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    /// Updates the rendered rectangle after a resize or zoom.
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
        self.needs_redraw.store(true, Ordering::Release);
    }

    pub fn listeners(&self) -> ListenerLedger {
        self.listeners
    }

    /// The player being dragged while the pointer is captured.
    pub fn dragged_player(&self) -> Option<&PlayerRef> {
        self.drag.as_ref()
    }

    pub fn has_pointer_capture(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw.load(Ordering::Acquire)
    }

    /// Returns and clears the redraw flag.
    pub fn take_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::AcqRel)
    }

    /// Handles pointer-down and reports what was hit.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> HitTarget {
        // A lost pointer-up must not leak the previous drag's listeners.
        if self.drag.is_some() {
            self.release_capture();
        }

        let point = self.logical_point(event);
        let (tool, hit) = {
            let session = self.session.borrow();
            (session.active_tool(), session.hit_test(point))
        };

        match hit {
            Some(player) => {
                self.player_pointer_down(tool, &player);
                HitTarget::Player(player)
            }
            None => {
                self.field_pointer_down(tool, point);
                HitTarget::Field
            }
        }
    }

    /// Handles pointer-move: drags the captured player or extends the
    /// drawing buffer.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        let point = self.logical_point(event);

        if let Some(player) = self.drag.clone() {
            let moved = self
                .session
                .borrow_mut()
                .move_player(player.side, &player.id, point);
            if let Err(e) = moved {
                tracing::debug!("Drag target gone: {}", e);
                self.release_capture();
            }
        } else if self.drawing {
            self.session.borrow_mut().extend_drawing(point);
        }
    }

    /// Handles pointer-up: ends a drag or commits the drawing.
    pub fn pointer_up(&mut self, _event: &PointerEvent) {
        if self.drag.is_some() {
            self.release_capture();
        }
        if self.drawing {
            self.drawing = false;
            self.session.borrow_mut().commit_drawing();
        }
    }

    /// Handles pointer-cancel: releases capture and discards any drawing.
    pub fn pointer_cancel(&mut self) {
        if self.drag.is_some() {
            self.release_capture();
        }
        if self.drawing {
            self.drawing = false;
            self.session.borrow_mut().cancel_drawing();
        }
    }

    /// Renders the current authoring view and clears the redraw flag.
    pub fn render(&self) -> String {
        self.needs_redraw.store(false, Ordering::Release);
        let session = self.session.borrow();
        SvgRenderer::for_session(&session, self.theme).render_session(&session)
    }

    fn logical_point(&self, event: &PointerEvent) -> Point {
        let session = self.session.borrow();
        session
            .transform()
            .from_pointer_event(event, &self.bounds, session.is_flipped())
    }

    fn player_pointer_down(&mut self, tool: DesignerTool, player: &PlayerRef) {
        let mut session = self.session.borrow_mut();
        match tool {
            DesignerTool::Select => {
                if session.select_player(player.side, &player.id).is_ok() {
                    self.drag = Some(player.clone());
                    self.listeners.attach();
                    tracing::debug!("Drag started on {}", player);
                }
            }
            DesignerTool::DrawRoute | DesignerTool::DrawBlock => {
                if let Err(err) = session.select_player(player.side, &player.id) {
                    tracing::warn!("Could not select {} for drawing: {}", player, err);
                }
            }
            DesignerTool::Erase => {
                session.remove_player(player.side, &player.id);
            }
            DesignerTool::AddOffense | DesignerTool::AddDefense => {}
        }
    }

    fn field_pointer_down(&mut self, tool: DesignerTool, point: Point) {
        let mut session = self.session.borrow_mut();
        if let Some(side) = tool.adds_to() {
            session.add_player(side, point);
        } else if tool.draws().is_some() {
            self.drawing = session.begin_drawing(point);
        }
    }

    fn release_capture(&mut self) {
        if let Some(player) = self.drag.take() {
            self.listeners.detach();
            tracing::debug!("Drag ended on {}", player);
        }
    }
}

impl Drop for CanvasSurface {
    fn drop(&mut self) {
        self.release_capture();
        if let Ok(session) = self.session.try_borrow() {
            session.unsubscribe(self.subscription);
        }
    }
}

impl std::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("bounds", &self.bounds)
            .field("theme", &self.theme)
            .field("drag", &self.drag)
            .field("drawing", &self.drawing)
            .field("listeners", &self.listeners)
            .finish()
    }
}
