//! Selection model and protection gating.
//!
//! Every candidate rectangle is checked against the sheet's protection policy
//! before it is published. A blocked candidate is never written, so the
//! previously published areas stay as they were and the current area always
//! holds the last allowed rectangle. While a drag extends the current area,
//! only the cells it adds beyond that rectangle are checked.

use tracing::{debug, info};

use super::throttle::Throttle;
use crate::ports::{Grid, Notifier};
use crate::protection::BlockReason;
use crate::types::{ActiveSelection, CellIndex, Rectangle, SelectionType};

/// A selection change requested by a click, header click or drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRequest {
    /// Corner header: the whole grid
    All,
    /// Column header; `additive` pushes a new area instead of replacing
    Column { col: u32, additive: bool },
    /// Row header
    Row { row: u32, additive: bool },
    /// A cell (grown to its merge)
    Cell { cell: CellIndex, additive: bool },
    /// Replace the current area with anchor → `cell`, honouring the
    /// selection type (full rows/columns stay full)
    ExtendTo(CellIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The candidate was published
    Applied,
    /// The candidate equals what is already published
    Unchanged,
    /// Protection refused the candidate; nothing changed
    Blocked(BlockReason),
}

impl SelectionOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

#[derive(Debug, Clone)]
pub struct SelectionModel {
    selection: ActiveSelection,
    selection_type: SelectionType,
    /// Fixed corner of the current area while extending
    anchor: CellIndex,
    /// Current area as last allowed by gating; cleared when the area is
    /// replaced without a check
    gated: Option<Rectangle>,
    toast: Throttle,
}

impl SelectionModel {
    pub fn new(blocked_toast_interval_ms: f64) -> Self {
        Self {
            selection: ActiveSelection::new(),
            selection_type: SelectionType::CellRange,
            anchor: CellIndex::origin(),
            gated: None,
            toast: Throttle::new(blocked_toast_interval_ms),
        }
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn selection_type(&self) -> SelectionType {
        self.selection_type
    }

    pub fn active_cell(&self) -> CellIndex {
        self.selection.active_cell
    }

    pub fn anchor(&self) -> CellIndex {
        self.anchor
    }

    pub fn current_area(&self) -> Option<Rectangle> {
        self.selection.current().copied()
    }

    /// Is the selection drawn (and therefore grabbable) under the current
    /// protection policy?
    pub fn is_visible<G: Grid + ?Sized>(&self, grid: &G) -> bool {
        grid.protection()
            .allows(grid.is_cell_locked(self.selection.active_cell))
    }

    /// First cell of `rect` the policy forbids, if any.
    pub fn block_reason<G: Grid + ?Sized>(&self, grid: &G, rect: &Rectangle) -> Option<BlockReason> {
        grid.selection_block(rect)
    }

    /// Like [`Self::block_reason`], but only the cells outside the last
    /// allowed current area are checked. The first offending cell is still
    /// the row-major first of the whole rectangle.
    fn extension_block_reason<G: Grid + ?Sized>(
        &self,
        grid: &G,
        rect: &Rectangle,
    ) -> Option<BlockReason> {
        let Some(known) = self.gated.filter(|g| self.current_area() == Some(*g)) else {
            return self.block_reason(grid, rect);
        };
        rect.subtract(&known)
            .iter()
            .filter_map(|strip| grid.selection_block(strip))
            .min_by_key(|reason| {
                let cell = reason.cell();
                (cell.r, cell.c)
            })
    }

    /// Active cell and rectangle a request would publish, before gating.
    pub fn candidate<G: Grid + ?Sized>(
        &self,
        request: SelectionRequest,
        grid: &G,
    ) -> (CellIndex, Rectangle, SelectionType) {
        let layout = grid.layout();
        match request {
            SelectionRequest::All => (
                CellIndex::origin(),
                layout.bounds(),
                SelectionType::All,
            ),
            SelectionRequest::Column { col, .. } => (
                CellIndex::new(0, col),
                layout.expand_to_merges(Rectangle::cols(col, col, layout.max_row)),
                SelectionType::ColumnRange,
            ),
            SelectionRequest::Row { row, .. } => (
                CellIndex::new(row, 0),
                layout.expand_to_merges(Rectangle::rows(row, row, layout.max_col)),
                SelectionType::RowRange,
            ),
            SelectionRequest::Cell { cell, .. } => {
                let rect = layout.expand_to_merges(Rectangle::cell(cell));
                let active = layout.merge_at(cell).map_or(cell, |m| m.s);
                (active, rect, SelectionType::CellRange)
            }
            SelectionRequest::ExtendTo(cell) => {
                let anchor = self.anchor;
                let rect = match self.selection_type {
                    SelectionType::RowRange => Rectangle::rows(anchor.r, cell.r, layout.max_col),
                    SelectionType::ColumnRange => {
                        Rectangle::cols(anchor.c, cell.c, layout.max_row)
                    }
                    SelectionType::All => layout.bounds(),
                    SelectionType::CellRange => Rectangle::from_corners(anchor, cell),
                };
                (
                    self.selection.active_cell,
                    layout.expand_to_merges(rect),
                    self.selection_type,
                )
            }
        }
    }

    /// Gate and publish a selection change.
    ///
    /// A blocked request leaves the selection untouched and shows a message,
    /// at most once per toast interval.
    pub fn apply<G: Grid + ?Sized>(
        &mut self,
        request: SelectionRequest,
        grid: &G,
        notifier: &mut dyn Notifier,
        now_ms: f64,
    ) -> SelectionOutcome {
        let (active, rect, selection_type) = self.candidate(request, grid);
        let blocked = match request {
            SelectionRequest::ExtendTo(_) => self.extension_block_reason(grid, &rect),
            _ => self.block_reason(grid, &rect),
        };
        if let Some(reason) = blocked {
            self.report_blocked(reason, notifier, now_ms);
            return SelectionOutcome::Blocked(reason);
        }

        let additive = match request {
            SelectionRequest::Column { additive, .. }
            | SelectionRequest::Row { additive, .. }
            | SelectionRequest::Cell { additive, .. } => additive,
            SelectionRequest::All | SelectionRequest::ExtendTo(_) => false,
        };

        if let SelectionRequest::ExtendTo(_) = request {
            let outcome = self.replace_current(rect);
            self.gated = Some(rect.normalized());
            return outcome;
        }

        let next = if additive {
            let mut areas = self.selection.areas.clone();
            areas.push(rect);
            ActiveSelection {
                active_cell: active,
                areas,
            }
        } else {
            ActiveSelection::single(active, rect)
        };
        self.anchor = active;
        self.selection_type = selection_type;
        self.gated = Some(rect.normalized());
        if next == self.selection {
            return SelectionOutcome::Unchanged;
        }
        self.selection = next;
        SelectionOutcome::Applied
    }

    /// Replace the current (last) area with a rectangle that is already
    /// gated or already committed (a successful fill). The active cell is
    /// kept.
    pub fn publish_current(&mut self, rect: Rectangle) -> SelectionOutcome {
        self.gated = None;
        self.replace_current(rect)
    }

    fn replace_current(&mut self, rect: Rectangle) -> SelectionOutcome {
        let rect = rect.normalized();
        match self.selection.current_mut() {
            Some(current) if *current == rect => SelectionOutcome::Unchanged,
            Some(current) => {
                *current = rect;
                SelectionOutcome::Applied
            }
            None => {
                self.selection.areas.push(rect);
                SelectionOutcome::Applied
            }
        }
    }

    /// Publish a whole selection that has been moved as a block (border drag).
    pub fn set_selection(&mut self, selection: ActiveSelection) {
        self.anchor = selection.active_cell;
        self.selection_type = SelectionType::CellRange;
        self.selection = selection;
        self.gated = None;
    }

    /// Keyboard navigation: move the active cell and drop every area.
    pub fn move_active(&mut self, cell: CellIndex) {
        self.selection.active_cell = cell;
        self.selection.areas.clear();
        self.anchor = cell;
        self.selection_type = SelectionType::CellRange;
        self.gated = None;
    }

    fn report_blocked(&mut self, reason: BlockReason, notifier: &mut dyn Notifier, now_ms: f64) {
        if self.toast.ready(now_ms) {
            info!(cell = ?reason.cell(), "selection blocked by sheet protection");
            notifier.notify(&reason.message());
        } else {
            debug!(cell = ?reason.cell(), "selection blocked (message throttled)");
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::layout::SheetLayout;
    use crate::ports::{Grid, RecordingNotifier};
    use crate::protection::ProtectionPolicy;
    use crate::sheet::MemorySheet;

    fn rect(r0: u32, c0: u32, r1: u32, c1: u32) -> Rectangle {
        Rectangle::from_corners(CellIndex::new(r0, c0), CellIndex::new(r1, c1))
    }

    #[test]
    fn test_cell_click_grows_to_merge() {
        let mut sheet = MemorySheet::new(20, 10);
        sheet.layout_mut().set_merges(&[rect(1, 1, 2, 3)]);
        let mut model = SelectionModel::new(500.0);
        let mut toast = RecordingNotifier::new();

        let cell = CellIndex::new(2, 2);
        let outcome = model.apply(
            SelectionRequest::Cell {
                cell,
                additive: false,
            },
            &sheet,
            &mut toast,
            0.0,
        );
        assert_eq!(outcome, SelectionOutcome::Applied);
        assert_eq!(model.selection().areas, vec![rect(1, 1, 2, 3)]);
        assert_eq!(model.active_cell(), CellIndex::new(1, 1));
    }

    #[test]
    fn test_extend_keeps_full_rows() {
        let sheet = MemorySheet::new(20, 10);
        let mut model = SelectionModel::new(500.0);
        let mut toast = RecordingNotifier::new();
        model.apply(
            SelectionRequest::Row {
                row: 3,
                additive: false,
            },
            &sheet,
            &mut toast,
            0.0,
        );
        model.apply(
            SelectionRequest::ExtendTo(CellIndex::new(6, 4)),
            &sheet,
            &mut toast,
            1.0,
        );
        assert_eq!(model.selection().areas, vec![rect(3, 0, 6, 10)]);
        assert_eq!(model.active_cell(), CellIndex::new(3, 0));
    }

    #[test]
    fn test_blocked_toast_is_throttled() {
        let mut sheet = MemorySheet::new(20, 10);
        sheet.set_protection(ProtectionPolicy::protected(false, true));
        let mut model = SelectionModel::new(500.0);
        let mut toast = RecordingNotifier::new();
        let before = model.selection().clone();

        for t in [0.0, 100.0, 499.0, 500.0] {
            let outcome = model.apply(
                SelectionRequest::Cell {
                    cell: CellIndex::new(1, 1),
                    additive: false,
                },
                &sheet,
                &mut toast,
                t,
            );
            assert!(outcome.is_blocked());
        }
        assert_eq!(toast.messages.len(), 2);
        assert_eq!(model.selection(), &before);
        assert!(!model.is_visible(&sheet));
        assert!(sheet.is_cell_locked(CellIndex::new(0, 0)));
    }

    /// Grid that counts lock lookups and keeps the cell-by-cell default check
    struct CountingGrid {
        sheet: MemorySheet,
        lookups: std::cell::Cell<usize>,
    }

    impl Grid for CountingGrid {
        fn layout(&self) -> &SheetLayout {
            self.sheet.layout()
        }

        fn protection(&self) -> ProtectionPolicy {
            self.sheet.protection()
        }

        fn is_cell_locked(&self, cell: CellIndex) -> bool {
            self.lookups.set(self.lookups.get() + 1);
            self.sheet.is_cell_locked(cell)
        }

        fn used_range(&self) -> Rectangle {
            self.sheet.used_range()
        }

        fn set_row_height(&mut self, row: u32, height: f32) -> Result<()> {
            self.sheet.set_row_height(row, height)
        }

        fn set_col_width(&mut self, col: u32, width: f32) -> Result<()> {
            self.sheet.set_col_width(col, width)
        }

        fn move_area(&mut self, src: Rectangle, dst: Rectangle) -> Result<()> {
            self.sheet.move_area(src, dst)
        }

        fn apply_brush(&mut self, src: Rectangle, target: Rectangle) -> Result<()> {
            self.sheet.apply_brush(src, target)
        }
    }

    #[test]
    fn test_extension_checks_only_added_cells() {
        let mut sheet = MemorySheet::new(99, 25);
        // Every cell is locked, and only unlocked cells are off limits
        sheet.set_protection(ProtectionPolicy::protected(true, false));
        let mut grid = CountingGrid {
            sheet,
            lookups: std::cell::Cell::new(0),
        };
        let mut model = SelectionModel::new(500.0);
        let mut toast = RecordingNotifier::new();
        let extend = |model: &mut SelectionModel, grid: &CountingGrid, r, c, toast: &mut RecordingNotifier| {
            model.apply(SelectionRequest::ExtendTo(CellIndex::new(r, c)), grid, toast, 0.0)
        };

        model.apply(
            SelectionRequest::Cell {
                cell: CellIndex::origin(),
                additive: false,
            },
            &grid,
            &mut toast,
            0.0,
        );
        extend(&mut model, &grid, 9, 9, &mut toast);

        // One more row: ten new cells
        grid.lookups.set(0);
        assert_eq!(extend(&mut model, &grid, 10, 9, &mut toast), SelectionOutcome::Applied);
        assert_eq!(grid.lookups.get(), 10);
        assert_eq!(model.selection().areas, vec![rect(0, 0, 10, 9)]);

        // Shrinking adds nothing to check
        grid.lookups.set(0);
        extend(&mut model, &grid, 4, 4, &mut toast);
        assert_eq!(grid.lookups.get(), 0);

        // A forbidden cell in the added strip still blocks
        grid.sheet.set_locked(CellIndex::new(6, 2), false);
        let outcome = extend(&mut model, &grid, 7, 7, &mut toast);
        assert_eq!(
            outcome,
            SelectionOutcome::Blocked(BlockReason::UnlockedCell(CellIndex::new(6, 2)))
        );
        assert_eq!(model.selection().areas, vec![rect(0, 0, 4, 4)]);

        grid.lookups.set(0);
        assert_eq!(extend(&mut model, &grid, 6, 1, &mut toast), SelectionOutcome::Applied);
        assert_eq!(grid.lookups.get(), 4);
        assert_eq!(model.selection().areas, vec![rect(0, 0, 6, 1)]);
    }

    #[test]
    fn test_move_active_clears_areas() {
        let mut model = SelectionModel::new(500.0);
        model.move_active(CellIndex::new(4, 4));
        assert!(model.selection().areas.is_empty());
        assert_eq!(model.active_cell(), CellIndex::new(4, 4));
        assert_eq!(model.current_area(), None);
    }
}
