use tracing::debug;

use crate::input::PointerEvent;
use crate::interaction::session::{Commit, DragContext, DragHandler, DragMode, Preview};
use crate::ports::RedrawMode;
use crate::types::{ObjectBounds, ObjectId};

/// Drag the rotate handle of an object
#[derive(Debug, Clone)]
pub struct DrawingRotate {
    id: ObjectId,
    bounds: ObjectBounds,
    center: (f32, f32),
    start_angle: f32,
    start_rotation: f32,
    snap_step: f32,
    rotation: f32,
}

/// Angle of `(x, y)` around `center` in degrees: zero points up, clockwise
/// positive.
pub fn pointer_angle(center: (f32, f32), x: f32, y: f32) -> f32 {
    (x - center.0).atan2(-(y - center.1)).to_degrees()
}

/// Normalize to `0..360`, optionally snapping to multiples of `step`.
pub fn normalize_rotation(degrees: f32, snap_step: Option<f32>) -> f32 {
    let degrees = match snap_step {
        Some(step) => (degrees / step).round() * step,
        None => degrees,
    };
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl DrawingRotate {
    pub fn new(ctx: &DragContext<'_>, id: ObjectId, pointer: &PointerEvent) -> Option<Self> {
        let object = ctx.sheet.object(id)?;
        let center = object.position.center();
        let (sx, sy) = ctx.to_sheet(pointer.x, pointer.y);
        Some(Self {
            id,
            bounds: object.position,
            center,
            start_angle: pointer_angle(center, sx, sy),
            start_rotation: object.rotation,
            snap_step: ctx.config.rotation_snap_degrees,
            rotation: object.rotation,
        })
    }

    fn rotation_at(&self, ctx: &DragContext<'_>, pointer: &PointerEvent) -> f32 {
        let (sx, sy) = ctx.to_sheet(pointer.x, pointer.y);
        let delta = pointer_angle(self.center, sx, sy) - self.start_angle;
        let snap = pointer.modifiers.snap().then_some(self.snap_step);
        normalize_rotation(self.start_rotation + delta, snap)
    }
}

impl DragHandler for DrawingRotate {
    fn mode(&self) -> DragMode {
        DragMode::DrawingRotate
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        self.rotation = self.rotation_at(ctx, pointer);
        Some(RedrawMode::Overlay)
    }

    fn on_end(self: Box<Self>, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Commit {
        let rotation = self.rotation_at(ctx, pointer);
        if (rotation - self.start_rotation).abs() < f32::EPSILON {
            return Commit::Discarded;
        }
        match ctx.sheet.set_rotation(self.id, rotation) {
            Ok(()) => {
                debug!(id = self.id, rotation, "drawing rotated");
                Commit::Applied
            }
            Err(err) => {
                debug!(%err, "drawing rotation rejected");
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

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_angle_zero_is_up() {
        let c = (100.0, 100.0);
        assert!(pointer_angle(c, 100.0, 50.0).abs() < 1e-4);
        assert!((pointer_angle(c, 150.0, 100.0) - 90.0).abs() < 1e-4);
        assert!((pointer_angle(c, 100.0, 150.0).abs() - 180.0).abs() < 1e-4);
        assert!((pointer_angle(c, 50.0, 100.0) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_snap_produces_multiples() {
        for raw in [-721.3_f32, -7.4, 0.0, 7.5, 22.49, 181.0, 359.9, 1000.2] {
            let r = normalize_rotation(raw, Some(15.0));
            assert!((0.0..360.0).contains(&r));
            assert_eq!(r % 15.0, 0.0);
        }
    }

    #[test]
    fn test_unsnapped_wraps() {
        assert!((normalize_rotation(-30.0, None) - 330.0).abs() < 1e-4);
        assert!((normalize_rotation(370.0, None) - 10.0).abs() < 1e-4);
    }
}
