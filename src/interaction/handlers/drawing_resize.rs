use tracing::debug;

use crate::input::PointerEvent;
use crate::interaction::session::{Commit, DragContext, DragHandler, DragMode, Preview};
use crate::ports::RedrawMode;
use crate::types::{
    rotate_vector, HorizontalEdge, ObjectBounds, ObjectId, ResizeHandle, VerticalEdge,
};

/// Drag one of the eight resize handles of an object
#[derive(Debug, Clone)]
pub struct DrawingResize {
    id: ObjectId,
    handle: ResizeHandle,
    grab: (f32, f32),
    start: ObjectBounds,
    rotation: f32,
    min_size: f32,
    bounds: ObjectBounds,
}

impl DrawingResize {
    pub fn new(
        ctx: &DragContext<'_>,
        id: ObjectId,
        handle: ResizeHandle,
        pointer: &PointerEvent,
    ) -> Option<Self> {
        let object = ctx.sheet.object(id)?;
        Some(Self {
            id,
            handle,
            grab: (pointer.x, pointer.y),
            start: object.position,
            rotation: object.rotation,
            min_size: ctx.config.min_object_size,
            bounds: object.position,
        })
    }

    fn bounds_at(&self, pointer: &PointerEvent) -> ObjectBounds {
        let (dx, dy) = rotate_vector(
            pointer.x - self.grab.0,
            pointer.y - self.grab.1,
            -self.rotation,
        );
        resize_bounds(&self.start, self.handle, dx, dy, self.min_size, self.rotation)
    }
}

/// Apply a handle drag of `(dx, dy)` (in the object's own frame) to `start`.
///
/// The edge opposite the handle stays fixed; when the minimum size would be
/// violated the object grows from that fixed edge instead. For rotated
/// objects the fixed edge is kept in place on screen.
pub fn resize_bounds(
    start: &ObjectBounds,
    handle: ResizeHandle,
    dx: f32,
    dy: f32,
    min_size: f32,
    rotation: f32,
) -> ObjectBounds {
    let (x, w) = match handle.horizontal_edge() {
        Some(HorizontalEdge::Left) => {
            let w = (start.w - dx).max(min_size);
            (start.right() - w, w)
        }
        Some(HorizontalEdge::Right) => (start.x, (start.w + dx).max(min_size)),
        None => (start.x, start.w.max(min_size)),
    };
    let (y, h) = match handle.vertical_edge() {
        Some(VerticalEdge::Top) => {
            let h = (start.h - dy).max(min_size);
            (start.bottom() - h, h)
        }
        Some(VerticalEdge::Bottom) => (start.y, (start.h + dy).max(min_size)),
        None => (start.y, start.h.max(min_size)),
    };
    let local = ObjectBounds::new(x, y, w, h);
    if rotation.rem_euclid(360.0).abs() < f32::EPSILON {
        return local;
    }

    // Rotation pivots about the centre, which moved; shift the rectangle so
    // the fixed edge stays where it was on screen.
    let (scx, scy) = start.center();
    let (lcx, lcy) = local.center();
    let (ox, oy) = rotate_vector(lcx - scx, lcy - scy, rotation);
    ObjectBounds {
        x: scx + ox - w / 2.0,
        y: scy + oy - h / 2.0,
        w,
        h,
    }
}

impl DragHandler for DrawingResize {
    fn mode(&self) -> DragMode {
        DragMode::DrawingResize(self.handle)
    }

    fn on_move(&mut self, _ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        self.bounds = self.bounds_at(pointer);
        Some(RedrawMode::Overlay)
    }

    fn on_end(self: Box<Self>, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Commit {
        let bounds = self.bounds_at(pointer);
        if bounds == self.start {
            return Commit::Discarded;
        }
        let anchor = ctx.sheet.layout().anchor_for(bounds.x, bounds.y);
        match ctx.sheet.set_bounds(self.id, bounds, anchor) {
            Ok(()) => {
                debug!(id = self.id, handle = ?self.handle, w = bounds.w, h = bounds.h, "drawing resized");
                Commit::Applied
            }
            Err(err) => {
                debug!(%err, "drawing resize rejected");
                Commit::Discarded
            }
        }
    }

    fn preview(&self) -> Option<Preview> {
        Some(Preview::Object {
            id: self.id,
            bounds: self.bounds,
            rotation: self.rotation,
        })
    }
}
