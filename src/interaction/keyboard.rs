//! Arrow / Tab / Enter navigation.
//!
//! Movement starts from the edge of the active cell's merge, skips hidden
//! rows and columns, and stays inside the sheet's used range. Navigating
//! clears the selected areas. The window is nudged before the active cell
//! moves so the cell never leaves the screen.

use tracing::trace;

use super::selection::SelectionModel;
use crate::input::{Key, KeyEvent};
use crate::layout::{SheetLayout, ViewportWindow};
use crate::ports::Grid;
use crate::types::{CellIndex, HeaderConfig, Rectangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        let back = event.modifiers.shift;
        match event.key {
            Key::ArrowUp => Some(Self::Up),
            Key::ArrowDown => Some(Self::Down),
            Key::ArrowLeft => Some(Self::Left),
            Key::ArrowRight => Some(Self::Right),
            Key::Tab if back => Some(Self::Left),
            Key::Tab => Some(Self::Right),
            Key::Enter if back => Some(Self::Up),
            Key::Enter => Some(Self::Down),
            Key::Other => None,
        }
    }
}

/// What a navigation key did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub moved_to: CellIndex,
    pub scrolled: bool,
}

#[derive(Debug, Clone)]
pub struct KeyboardNavigator {
    edge_margin: u32,
}

impl KeyboardNavigator {
    pub fn new(edge_margin: u32) -> Self {
        Self { edge_margin }
    }

    /// Destination for a move from `from`, or `None` at the edge of the
    /// sheet or used range.
    pub fn destination<G: Grid + ?Sized>(
        &self,
        grid: &G,
        from: CellIndex,
        direction: Direction,
    ) -> Option<CellIndex> {
        let layout = grid.layout();
        let extent = layout.merge_at(from).unwrap_or(Rectangle::cell(from));
        let dest = match direction {
            Direction::Up => CellIndex::new(layout.prev_visible_row(extent.s.r)?, from.c),
            Direction::Down => CellIndex::new(layout.next_visible_row(extent.e.r)?, from.c),
            Direction::Left => CellIndex::new(from.r, layout.prev_visible_col(extent.s.c)?),
            Direction::Right => CellIndex::new(from.r, layout.next_visible_col(extent.e.c)?),
        };
        let dest = layout.merge_at(dest).map_or(dest, |m| m.s);
        grid.used_range().contains(dest).then_some(dest)
    }

    /// Handle a key; returns `None` when the key is not a navigation key or
    /// the move is out of range.
    pub fn handle<G: Grid + ?Sized>(
        &self,
        event: &KeyEvent,
        grid: &G,
        selection: &mut SelectionModel,
        viewport: &mut ViewportWindow,
        headers: &HeaderConfig,
    ) -> Option<NavigationOutcome> {
        let direction = Direction::from_key(event)?;
        let dest = self.destination(grid, selection.active_cell(), direction)?;
        let layout = grid.layout();

        let nudged = self.nudge(dest, direction, viewport, layout, headers);
        let revealed = self.reveal(dest, viewport, layout, headers);
        selection.move_active(dest);
        trace!(?direction, ?dest, "active cell moved");
        Some(NavigationOutcome {
            moved_to: dest,
            scrolled: nudged || revealed,
        })
    }

    /// One step in the direction of travel when `dest` is within the margin
    /// of the window edge.
    fn nudge(
        &self,
        dest: CellIndex,
        direction: Direction,
        viewport: &mut ViewportWindow,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> bool {
        let margin = self.edge_margin;
        let near = match direction {
            Direction::Down => {
                dest.r >= viewport.frozen_rows
                    && dest.r.saturating_add(margin) >= viewport.last_visible_row(layout, headers)
            }
            Direction::Up => {
                dest.r >= viewport.frozen_rows
                    && dest.r < viewport.row_window_start.saturating_add(margin)
            }
            Direction::Right => {
                dest.c >= viewport.frozen_cols
                    && dest.c.saturating_add(margin) >= viewport.last_visible_col(layout, headers)
            }
            Direction::Left => {
                dest.c >= viewport.frozen_cols
                    && dest.c < viewport.col_window_start.saturating_add(margin)
            }
        };
        if !near {
            return false;
        }
        let (d_rows, d_cols) = match direction {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        };
        viewport.scroll_by(d_rows, d_cols, layout)
    }

    /// Jump the window when `dest` is entirely off screen (for example after
    /// the user scrolled away from the active cell).
    fn reveal(
        &self,
        dest: CellIndex,
        viewport: &mut ViewportWindow,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> bool {
        let mut row = viewport.row_window_start;
        let mut col = viewport.col_window_start;
        if dest.r >= viewport.frozen_rows {
            let last = viewport.last_visible_row(layout, headers);
            if dest.r < row || dest.r > last {
                let span = last - viewport.row_window_start;
                row = dest.r.saturating_sub(span.saturating_sub(self.edge_margin));
            }
        }
        if dest.c >= viewport.frozen_cols {
            let last = viewport.last_visible_col(layout, headers);
            if dest.c < col || dest.c > last {
                let span = last - viewport.col_window_start;
                col = dest.c.saturating_sub(span.saturating_sub(self.edge_margin));
            }
        }
        viewport.set_window_start(row, col, layout)
    }
}
