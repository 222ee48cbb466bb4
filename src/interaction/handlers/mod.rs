//! One drag strategy per mode.

mod border_move;
mod drawing_move;
mod drawing_resize;
mod drawing_rotate;
mod fill_handle;
mod header_resize;
mod select_extend;

pub use border_move::BorderMove;
pub use drawing_move::DrawingMove;
pub use drawing_resize::DrawingResize;
pub use drawing_rotate::DrawingRotate;
pub use fill_handle::{padding_area, FillHandle};
pub use header_resize::HeaderResize;
pub use select_extend::SelectExtend;

use super::hit_test::RegionTag;
use super::session::{DragContext, DragHandler, DragTarget};
use crate::input::PointerEvent;
use crate::types::{Axis, Rectangle};

/// Build the handler for a drag region.
///
/// Returns `None` when the region's target no longer exists (for example an
/// object removed between hover and press).
pub fn start(
    region: RegionTag,
    ctx: &DragContext<'_>,
    pointer: &PointerEvent,
) -> Option<(DragTarget, Box<dyn DragHandler>)> {
    match region {
        RegionTag::RowResize { row } => Some((
            DragTarget::Header {
                axis: Axis::Row,
                index: row,
            },
            Box::new(HeaderResize::new(ctx, Axis::Row, row, pointer)),
        )),
        RegionTag::ColResize { col } => Some((
            DragTarget::Header {
                axis: Axis::Col,
                index: col,
            },
            Box::new(HeaderResize::new(ctx, Axis::Col, col, pointer)),
        )),
        RegionTag::ActiveBorder => {
            let source = grab_area(ctx);
            Some((
                DragTarget::Area(source),
                Box::new(BorderMove::new(ctx, source, pointer)),
            ))
        }
        RegionTag::FillHandle => {
            let source = grab_area(ctx);
            Some((DragTarget::Area(source), Box::new(FillHandle::new(source))))
        }
        RegionTag::DrawingMove { id } => {
            let handler = DrawingMove::new(ctx, id, pointer)?;
            Some((DragTarget::Object(id), Box::new(handler)))
        }
        RegionTag::DrawingResize { id, handle } => {
            let handler = DrawingResize::new(ctx, id, handle, pointer)?;
            Some((DragTarget::Object(id), Box::new(handler)))
        }
        RegionTag::DrawingRotate { id } => {
            let handler = DrawingRotate::new(ctx, id, pointer)?;
            Some((DragTarget::Object(id), Box::new(handler)))
        }
        RegionTag::CornerHeader
        | RegionTag::ColumnHeader { .. }
        | RegionTag::RowHeader { .. }
        | RegionTag::Cell { .. } => None,
    }
}

/// The selection area a border or fill-handle drag picks up
fn grab_area(ctx: &DragContext<'_>) -> Rectangle {
    ctx.selection
        .current_area()
        .unwrap_or_else(|| Rectangle::cell(ctx.selection.active_cell()))
        .normalized()
}
