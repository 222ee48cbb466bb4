use tracing::debug;

use crate::input::PointerEvent;
use crate::interaction::session::{Commit, DragContext, DragHandler, DragMode, Preview};
use crate::ports::RedrawMode;
use crate::types::{ObjectBounds, ObjectId};

/// Drag a whole object by its body
#[derive(Debug, Clone)]
pub struct DrawingMove {
    id: ObjectId,
    grab: (f32, f32),
    start: ObjectBounds,
    rotation: f32,
    bounds: ObjectBounds,
}

impl DrawingMove {
    pub fn new(ctx: &DragContext<'_>, id: ObjectId, pointer: &PointerEvent) -> Option<Self> {
        let object = ctx.sheet.object(id)?;
        Some(Self {
            id,
            grab: (pointer.x, pointer.y),
            start: object.position,
            rotation: object.rotation,
            bounds: object.position,
        })
    }

    /// Bounds translated by the pointer delta, kept right of and below the
    /// headers.
    fn bounds_at(&self, pointer: &PointerEvent) -> ObjectBounds {
        let dx = pointer.x - self.grab.0;
        let dy = pointer.y - self.grab.1;
        ObjectBounds {
            x: (self.start.x + dx).max(0.0),
            y: (self.start.y + dy).max(0.0),
            ..self.start
        }
    }
}

impl DragHandler for DrawingMove {
    fn mode(&self) -> DragMode {
        DragMode::DrawingMove
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
                debug!(id = self.id, x = bounds.x, y = bounds.y, "drawing moved");
                Commit::Applied
            }
            Err(err) => {
                debug!(%err, "drawing move rejected");
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
