//! Drag session lifecycle.
//!
//! A session lives from pointer-down to pointer-up. The controller holds at
//! most one; ending it moves the handler out, so commit and teardown run
//! exactly once. Handlers preview on every move with an overlay redraw and
//! commit once on release, followed by a full redraw.

use std::fmt;

use serde::Serialize;

use tracing::{debug, warn};

use super::handlers::{self, SelectExtend};
use super::hit_test::RegionTag;
use super::selection::{SelectionModel, SelectionOutcome, SelectionRequest};
use crate::config::EngineConfig;
use crate::input::PointerEvent;
use crate::layout::ViewportWindow;
use crate::ports::{Notifier, RedrawMode, Sheet};
use crate::types::{Axis, CellIndex, HeaderConfig, ObjectBounds, ObjectId, Rectangle, ResizeHandle};

/// Kind of gesture a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Row height or column width
    HeaderResize(Axis),
    DrawingMove,
    /// Move the whole selection by its border
    ActiveBorder,
    FillHandle,
    DrawingResize(ResizeHandle),
    DrawingRotate,
    /// Default gesture: extend the selection by dragging
    SelectExtend,
}

impl DragMode {
    pub fn for_region(region: &RegionTag) -> Option<Self> {
        match region {
            RegionTag::RowResize { .. } => Some(Self::HeaderResize(Axis::Row)),
            RegionTag::ColResize { .. } => Some(Self::HeaderResize(Axis::Col)),
            RegionTag::FillHandle => Some(Self::FillHandle),
            RegionTag::ActiveBorder => Some(Self::ActiveBorder),
            RegionTag::DrawingMove { .. } => Some(Self::DrawingMove),
            RegionTag::DrawingResize { handle, .. } => Some(Self::DrawingResize(*handle)),
            RegionTag::DrawingRotate { .. } => Some(Self::DrawingRotate),
            RegionTag::CornerHeader
            | RegionTag::ColumnHeader { .. }
            | RegionTag::RowHeader { .. }
            | RegionTag::Cell { .. } => None,
        }
    }
}

/// What the session acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Cell(CellIndex),
    Header { axis: Axis, index: u32 },
    Area(Rectangle),
    Object(ObjectId),
}

/// Live state for the renderer's overlay pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Preview {
    /// Proposed size of a row or column
    ResizeGuide { axis: Axis, index: u32, size: f32 },
    /// Destination of a border move
    Area(Rectangle),
    /// Fill-handle extension of `source`
    Padding {
        source: Rectangle,
        padding: Rectangle,
    },
    Object {
        id: ObjectId,
        bounds: ObjectBounds,
        rotation: f32,
    },
}

/// Result of releasing a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// A mutation reached the sheet or selection
    Applied,
    /// Nothing changed (no movement, or the mutation was refused)
    Discarded,
}

/// Mutable state a handler may touch, borrowed for one event
pub struct DragContext<'a> {
    pub sheet: &'a mut dyn Sheet,
    pub selection: &'a mut SelectionModel,
    pub viewport: &'a mut ViewportWindow,
    pub headers: &'a HeaderConfig,
    pub config: &'a EngineConfig,
    pub notifier: &'a mut dyn Notifier,
}

impl DragContext<'_> {
    /// Cell under a canvas point
    pub fn cell_at(&self, x: f32, y: f32) -> CellIndex {
        self.viewport.cell_at(x, y, self.sheet.layout(), self.headers)
    }

    /// Canvas point → sheet point
    pub fn to_sheet(&self, x: f32, y: f32) -> (f32, f32) {
        self.viewport
            .canvas_to_sheet(x, y, self.sheet.layout(), self.headers)
    }
}

/// One strategy per drag mode.
pub trait DragHandler {
    fn mode(&self) -> DragMode;

    /// Update the live preview; returns the redraw to request, if any.
    fn on_move(&mut self, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode>;

    /// Timer tick while the session is open.
    fn on_tick(&mut self, _ctx: &mut DragContext<'_>, _now_ms: f64) -> Option<RedrawMode> {
        None
    }

    /// Commit on release. Consumes the handler.
    fn on_end(self: Box<Self>, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Commit;

    fn preview(&self) -> Option<Preview> {
        None
    }
}

pub struct DragSession {
    pub mode: DragMode,
    pub start: (f32, f32),
    pub target: DragTarget,
    pub started_ms: f64,
    handler: Box<dyn DragHandler>,
}

impl fmt::Debug for DragSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSession")
            .field("mode", &self.mode)
            .field("start", &self.start)
            .field("target", &self.target)
            .field("started_ms", &self.started_ms)
            .finish_non_exhaustive()
    }
}

/// Cleanup closures for transient UI (tooltips, menus) that must run once
/// before the next primary gesture starts.
#[derive(Default)]
pub struct TransientGuard {
    pending: Vec<Box<dyn FnOnce()>>,
}

impl fmt::Debug for TransientGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientGuard")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl TransientGuard {
    pub fn register(&mut self, cleanup: impl FnOnce() + 'static) {
        self.pending.push(Box::new(cleanup));
    }

    /// Run and drop every registered closure; returns how many ran.
    pub fn run_all(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for cleanup in pending {
            cleanup();
        }
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct DragSessionController {
    session: Option<DragSession>,
    transients: TransientGuard,
}

impl DragSessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    pub fn preview(&self) -> Option<Preview> {
        self.session.as_ref().and_then(|s| s.handler.preview())
    }

    pub fn register_transient(&mut self, cleanup: impl FnOnce() + 'static) {
        self.transients.register(cleanup);
    }

    pub fn pending_transients(&self) -> usize {
        self.transients.len()
    }

    /// Pointer-down: run transient cleanups, then either start the handler
    /// for `region` or perform the default selection and start extending it.
    pub fn begin(
        &mut self,
        region: Option<RegionTag>,
        ctx: &mut DragContext<'_>,
        pointer: &PointerEvent,
    ) -> Option<RedrawMode> {
        let ran = self.transients.run_all();
        if ran > 0 {
            debug!(count = ran, "transient UI cleaned up");
        }
        if let Some(stale) = self.session.take() {
            warn!(mode = ?stale.mode, "pointer-down while a drag was open; dropping it uncommitted");
        }
        let region = region?;

        if let Some(mode) = DragMode::for_region(&region) {
            let (target, handler) = handlers::start(region, ctx, pointer)?;
            debug!(?mode, ?target, "drag started");
            self.open(mode, target, handler, pointer);
            return Some(RedrawMode::Overlay);
        }

        let modifiers = pointer.modifiers;
        let multi = modifiers.multi_select();
        let (request, target) = match region {
            RegionTag::CornerHeader => (SelectionRequest::All, DragTarget::Cell(CellIndex::origin())),
            RegionTag::ColumnHeader { col } => (
                SelectionRequest::Column {
                    col,
                    additive: multi,
                },
                DragTarget::Header {
                    axis: Axis::Col,
                    index: col,
                },
            ),
            RegionTag::RowHeader { row } => (
                SelectionRequest::Row {
                    row,
                    additive: multi,
                },
                DragTarget::Header {
                    axis: Axis::Row,
                    index: row,
                },
            ),
            RegionTag::Cell { cell } if modifiers.extend() && !multi => {
                (SelectionRequest::ExtendTo(cell), DragTarget::Cell(cell))
            }
            RegionTag::Cell { cell } => (
                SelectionRequest::Cell {
                    cell,
                    additive: multi,
                },
                DragTarget::Cell(cell),
            ),
            _ => return None,
        };

        let outcome = ctx
            .selection
            .apply(request, &*ctx.sheet, ctx.notifier, pointer.time_ms);
        if let SelectionOutcome::Blocked(_) = outcome {
            return None;
        }
        if request != SelectionRequest::All {
            let handler = Box::new(SelectExtend::new(ctx.config, pointer));
            self.open(DragMode::SelectExtend, target, handler, pointer);
        }
        Some(RedrawMode::Overlay)
    }

    fn open(
        &mut self,
        mode: DragMode,
        target: DragTarget,
        handler: Box<dyn DragHandler>,
        pointer: &PointerEvent,
    ) {
        self.session = Some(DragSession {
            mode,
            start: (pointer.x, pointer.y),
            target,
            started_ms: pointer.time_ms,
            handler,
        });
    }

    /// Pointer-move while a session is open.
    pub fn update(&mut self, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        let session = self.session.as_mut()?;
        session.handler.on_move(ctx, pointer)
    }

    /// Timer tick; only the select-extend handler reacts (autoscroll).
    pub fn tick(&mut self, ctx: &mut DragContext<'_>, now_ms: f64) -> Option<RedrawMode> {
        let session = self.session.as_mut()?;
        session.handler.on_tick(ctx, now_ms)
    }

    /// Pointer-up: commit through the handler and tear the session down.
    pub fn end(&mut self, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        let session = self.session.take()?;
        let mode = session.mode;
        let commit = session.handler.on_end(ctx, pointer);
        debug!(?mode, ?commit, "drag ended");
        Some(RedrawMode::Full)
    }

    /// Drop the open session without committing anything.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                debug!(mode = ?session.mode, "drag cancelled");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_transient_guard_runs_once() {
        let hits = Rc::new(Cell::new(0));
        let mut guard = TransientGuard::default();
        for _ in 0..3 {
            let hits = Rc::clone(&hits);
            guard.register(move || hits.set(hits.get() + 1));
        }
        assert_eq!(guard.len(), 3);
        assert_eq!(guard.run_all(), 3);
        assert_eq!(guard.run_all(), 0);
        assert_eq!(hits.get(), 3);
        assert!(guard.is_empty());
    }

    #[test]
    fn test_mode_for_region() {
        assert_eq!(
            DragMode::for_region(&RegionTag::RowResize { row: 1 }),
            Some(DragMode::HeaderResize(Axis::Row))
        );
        assert_eq!(
            DragMode::for_region(&RegionTag::DrawingResize {
                id: 1,
                handle: ResizeHandle::Left
            }),
            Some(DragMode::DrawingResize(ResizeHandle::Left))
        );
        assert_eq!(
            DragMode::for_region(&RegionTag::Cell {
                cell: CellIndex::origin()
            }),
            None
        );
    }
}
