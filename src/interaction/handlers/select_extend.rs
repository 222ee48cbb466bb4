use crate::config::EngineConfig;
use crate::input::PointerEvent;
use crate::interaction::autoscroll::{AutoScrollEdgeDetector, ScrollDirection};
use crate::interaction::selection::{SelectionOutcome, SelectionRequest};
use crate::interaction::session::{Commit, DragContext, DragHandler, DragMode};
use crate::ports::RedrawMode;
use crate::types::CellIndex;

/// Default gesture: drag from a cell or header to extend the selection,
/// autoscrolling when the pointer nears an edge.
#[derive(Debug, Clone)]
pub struct SelectExtend {
    last_pointer: PointerEvent,
    autoscroll: AutoScrollEdgeDetector,
}

impl SelectExtend {
    pub fn new(config: &EngineConfig, pointer: &PointerEvent) -> Self {
        Self {
            last_pointer: *pointer,
            autoscroll: AutoScrollEdgeDetector::new(config),
        }
    }

    pub fn autoscroll_running(&self) -> bool {
        self.autoscroll.is_running()
    }

    fn extend_to(&self, ctx: &mut DragContext<'_>, cell: CellIndex, now_ms: f64) -> bool {
        let outcome = ctx.selection.apply(
            SelectionRequest::ExtendTo(cell),
            &*ctx.sheet,
            ctx.notifier,
            now_ms,
        );
        outcome == SelectionOutcome::Applied
    }

    /// Cell the far corner should track after the window moved: the cell
    /// under the pointer, pinned to the new window edge on the scrolled axis.
    fn edge_cell(&self, ctx: &DragContext<'_>, direction: ScrollDirection) -> CellIndex {
        let cell = ctx.cell_at(self.last_pointer.x, self.last_pointer.y);
        let layout = ctx.sheet.layout();
        let vp = &*ctx.viewport;
        match direction {
            ScrollDirection::Up => CellIndex::new(vp.row_window_start, cell.c),
            ScrollDirection::Down => {
                CellIndex::new(vp.last_visible_row(layout, ctx.headers), cell.c)
            }
            ScrollDirection::Left => CellIndex::new(cell.r, vp.col_window_start),
            ScrollDirection::Right => {
                CellIndex::new(cell.r, vp.last_visible_col(layout, ctx.headers))
            }
        }
    }
}

impl DragHandler for SelectExtend {
    fn mode(&self) -> DragMode {
        DragMode::SelectExtend
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        self.last_pointer = *pointer;
        let cell = ctx.cell_at(pointer.x, pointer.y);
        let changed = self.extend_to(ctx, cell, pointer.time_ms);
        self.autoscroll
            .update(pointer.x, pointer.y, ctx.viewport, ctx.headers, pointer.time_ms);
        changed.then_some(RedrawMode::Overlay)
    }

    fn on_tick(&mut self, ctx: &mut DragContext<'_>, now_ms: f64) -> Option<RedrawMode> {
        let direction = self.autoscroll.poll(now_ms)?;
        let (d_rows, d_cols) = direction.delta();
        let layout = ctx.sheet.layout();
        if !ctx.viewport.scroll_by(d_rows, d_cols, layout) {
            return None;
        }
        let cell = self.edge_cell(ctx, direction);
        self.extend_to(ctx, cell, now_ms);
        Some(RedrawMode::Full)
    }

    fn on_end(self: Box<Self>, _ctx: &mut DragContext<'_>, _pointer: &PointerEvent) -> Commit {
        // The selection was published live; dropping the handler stops the
        // autoscroll timer.
        Commit::Applied
    }
}
