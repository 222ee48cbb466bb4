use tracing::debug;

use crate::input::PointerEvent;
use crate::interaction::session::{Commit, DragContext, DragHandler, DragMode, Preview};
use crate::ports::RedrawMode;
use crate::types::Axis;

/// Drag a row or column boundary
#[derive(Debug, Clone)]
pub struct HeaderResize {
    axis: Axis,
    index: u32,
    start_pointer: f32,
    start_size: f32,
    min_size: f32,
    size: f32,
}

impl HeaderResize {
    pub fn new(ctx: &DragContext<'_>, axis: Axis, index: u32, pointer: &PointerEvent) -> Self {
        let layout = ctx.sheet.layout();
        let (start_pointer, start_size) = match axis {
            Axis::Row => (pointer.y, layout.row_height(index)),
            Axis::Col => (pointer.x, layout.col_width(index)),
        };
        Self {
            axis,
            index,
            start_pointer,
            start_size,
            min_size: ctx.config.min_header_size,
            size: start_size,
        }
    }

    /// Size for a pointer position, never below the minimum
    pub fn size_at(&self, pointer: &PointerEvent) -> f32 {
        let offset = match self.axis {
            Axis::Row => pointer.y - self.start_pointer,
            Axis::Col => pointer.x - self.start_pointer,
        };
        (self.start_size + offset).max(self.min_size)
    }
}

impl DragHandler for HeaderResize {
    fn mode(&self) -> DragMode {
        DragMode::HeaderResize(self.axis)
    }

    fn on_move(&mut self, _ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        self.size = self.size_at(pointer);
        Some(RedrawMode::Overlay)
    }

    fn on_end(self: Box<Self>, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Commit {
        let size = self.size_at(pointer);
        if (size - self.start_size).abs() < f32::EPSILON {
            return Commit::Discarded;
        }
        let result = match self.axis {
            Axis::Row => ctx.sheet.set_row_height(self.index, size),
            Axis::Col => ctx.sheet.set_col_width(self.index, size),
        };
        match result {
            Ok(()) => {
                ctx.viewport.sync_layout(ctx.sheet.layout());
                debug!(axis = ?self.axis, index = self.index, size, "header resized");
                Commit::Applied
            }
            Err(err) => {
                debug!(%err, "header resize rejected");
                Commit::Discarded
            }
        }
    }

    fn preview(&self) -> Option<Preview> {
        Some(Preview::ResizeGuide {
            axis: self.axis,
            index: self.index,
            size: self.size,
        })
    }
}
