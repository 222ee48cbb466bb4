use tracing::debug;

use crate::cell_ref::range_label;
use crate::input::PointerEvent;
use crate::interaction::session::{Commit, DragContext, DragHandler, DragMode, Preview};
use crate::ports::RedrawMode;
use crate::types::{ActiveSelection, CellIndex, Rectangle};

/// Drag the selection by its border to move its contents
#[derive(Debug, Clone)]
pub struct BorderMove {
    source: Rectangle,
    grab: CellIndex,
    dest: Rectangle,
}

impl BorderMove {
    pub fn new(ctx: &DragContext<'_>, source: Rectangle, pointer: &PointerEvent) -> Self {
        Self {
            source,
            grab: ctx.cell_at(pointer.x, pointer.y),
            dest: source,
        }
    }

    fn dest_at(&self, ctx: &DragContext<'_>, pointer: &PointerEvent) -> Rectangle {
        let cell = ctx.cell_at(pointer.x, pointer.y);
        let layout = ctx.sheet.layout();
        let d_rows = i64::from(cell.r) - i64::from(self.grab.r);
        let d_cols = i64::from(cell.c) - i64::from(self.grab.c);
        self.source
            .translate_clamped(d_rows, d_cols, layout.max_row, layout.max_col)
    }
}

impl DragHandler for BorderMove {
    fn mode(&self) -> DragMode {
        DragMode::ActiveBorder
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        let dest = self.dest_at(ctx, pointer);
        if dest == self.dest {
            return None;
        }
        self.dest = dest;
        Some(RedrawMode::Overlay)
    }

    fn on_end(self: Box<Self>, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Commit {
        let dest = self.dest_at(ctx, pointer);
        if dest == self.source {
            return Commit::Discarded;
        }
        if let Err(err) = ctx.sheet.move_area(self.source, dest) {
            debug!(%err, dest = %range_label(dest), "area move rejected");
            return Commit::Discarded;
        }
        // The active cell travels with the block.
        let active = ctx.selection.active_cell();
        let moved = CellIndex::new(
            shift(active.r, self.source.s.r, dest.s.r),
            shift(active.c, self.source.s.c, dest.s.c),
        );
        ctx.selection.set_selection(ActiveSelection::single(moved, dest));
        Commit::Applied
    }

    fn preview(&self) -> Option<Preview> {
        Some(Preview::Area(self.dest))
    }
}

fn shift(value: u32, from: u32, to: u32) -> u32 {
    let shifted = i64::from(value) + i64::from(to) - i64::from(from);
    u32::try_from(shifted.max(0)).unwrap_or(to)
}
