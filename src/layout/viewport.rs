//! Virtualized viewport window.
//!
//! The window is tracked by index: the first visible non-frozen row/column.
//! Everything on screen is derived from those two indices, the frozen pane
//! counts and the logical canvas size. Canvas coordinates include the header
//! strip; sheet coordinates start at the top-left of cell A1.

use serde::Serialize;

use super::{CoordinateSpace, SheetLayout};
use crate::types::{Axis, CellIndex, HeaderConfig};

/// Furthest indices reachable by scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Boundary {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Which side of the canvas a point lies in, per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Header,
    Frozen,
    Scrollable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportWindow {
    /// First visible non-frozen row
    pub row_window_start: u32,
    /// First visible non-frozen column
    pub col_window_start: u32,
    pub frozen_rows: u32,
    pub frozen_cols: u32,
    pub boundary: Boundary,
    /// Canvas width in logical units (headers included)
    pub width: f32,
    /// Canvas height in logical units (headers included)
    pub height: f32,
}

impl ViewportWindow {
    /// A window at the top-left of the scrollable area
    pub fn for_layout(layout: &SheetLayout, width: f32, height: f32) -> Self {
        let mut window = Self {
            row_window_start: 0,
            col_window_start: 0,
            frozen_rows: 0,
            frozen_cols: 0,
            boundary: Boundary::default(),
            width,
            height,
        };
        window.sync_layout(layout);
        window
    }

    /// Re-read frozen counts and bounds after the layout changed.
    pub fn sync_layout(&mut self, layout: &SheetLayout) {
        self.frozen_rows = layout.frozen_rows;
        self.frozen_cols = layout.frozen_cols;
        self.boundary = Boundary {
            top: layout.frozen_rows,
            bottom: layout.max_row.max(layout.frozen_rows),
            left: layout.frozen_cols,
            right: layout.max_col.max(layout.frozen_cols),
        };
        let (row, col) = (self.row_window_start, self.col_window_start);
        self.set_window_start(row, col, layout);
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> bool {
        let width = width.max(0.0);
        let height = height.max(0.0);
        if (width - self.width).abs() < f32::EPSILON && (height - self.height).abs() < f32::EPSILON
        {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Place the window, clamped to `[frozen, boundary]` and moved off hidden
    /// rows/columns. Returns true if either index changed.
    pub fn set_window_start(&mut self, row: u32, col: u32, layout: &SheetLayout) -> bool {
        let row = clamp_visible(
            row,
            self.boundary.top,
            self.boundary.bottom,
            |r| layout.is_row_hidden(r),
        );
        let col = clamp_visible(
            col,
            self.boundary.left,
            self.boundary.right,
            |c| layout.is_col_hidden(c),
        );
        let changed = row != self.row_window_start || col != self.col_window_start;
        self.row_window_start = row;
        self.col_window_start = col;
        changed
    }

    /// Move the window by a number of visible rows/columns.
    ///
    /// Hidden rows and columns are stepped over; the result is clamped to
    /// `[frozen_rows, boundary.bottom]` / `[frozen_cols, boundary.right]`.
    pub fn scroll_by(&mut self, delta_rows: i64, delta_cols: i64, layout: &SheetLayout) -> bool {
        let row = step_visible(
            self.row_window_start,
            delta_rows,
            self.boundary.top,
            self.boundary.bottom,
            |r| layout.is_row_hidden(r),
        );
        let col = step_visible(
            self.col_window_start,
            delta_cols,
            self.boundary.left,
            self.boundary.right,
            |c| layout.is_col_hidden(c),
        );
        self.set_window_start(row, col, layout)
    }

    /// Sheet position of the window's top-left corner.
    pub fn scroll_origin(&self, layout: &SheetLayout) -> (f32, f32) {
        (
            layout.col_left(self.col_window_start),
            layout.row_top(self.row_window_start),
        )
    }

    /// Scroll offset in logical units, measured from the frozen boundary.
    ///
    /// This is what a scrollbar thumb position represents.
    pub fn scroll_offset(&self, layout: &SheetLayout) -> (f32, f32) {
        let (x, y) = self.scroll_origin(layout);
        (
            x - layout.frozen_cols_width(),
            y - layout.frozen_rows_height(),
        )
    }

    /// Map an absolute scrollbar position (physical pixels) back to an index.
    pub fn index_from_scroll_offset(
        &self,
        layout: &SheetLayout,
        coords: &CoordinateSpace,
        axis: Axis,
        physical_offset: f32,
    ) -> u32 {
        let offset = coords.to_logical(physical_offset.max(0.0));
        match axis {
            Axis::Row => {
                let y = layout.frozen_rows_height() + offset;
                layout
                    .row_at_y(y)
                    .unwrap_or(self.boundary.top)
                    .clamp(self.boundary.top, self.boundary.bottom)
            }
            Axis::Col => {
                let x = layout.frozen_cols_width() + offset;
                layout
                    .col_at_x(x)
                    .unwrap_or(self.boundary.left)
                    .clamp(self.boundary.left, self.boundary.right)
            }
        }
    }

    /// Visible row indices, frozen rows first, hidden rows skipped.
    pub fn visible_rows(&self, layout: &SheetLayout, headers: &HeaderConfig) -> Vec<u32> {
        let frozen = (0..self.frozen_rows).filter(|r| !layout.is_row_hidden(*r));
        let available = self.height - headers.height() - layout.frozen_rows_height();
        let start = self.row_window_start;
        let origin = layout.row_top(start);
        let scrolling = (start..=layout.max_row)
            .filter(|r| !layout.is_row_hidden(*r))
            .take_while(move |r| layout.row_top(*r) - origin < available);
        frozen.chain(scrolling).collect()
    }

    /// Visible column indices, frozen columns first, hidden columns skipped.
    pub fn visible_cols(&self, layout: &SheetLayout, headers: &HeaderConfig) -> Vec<u32> {
        let frozen = (0..self.frozen_cols).filter(|c| !layout.is_col_hidden(*c));
        let available = self.width - headers.width() - layout.frozen_cols_width();
        let start = self.col_window_start;
        let origin = layout.col_left(start);
        let scrolling = (start..=layout.max_col)
            .filter(|c| !layout.is_col_hidden(*c))
            .take_while(move |c| layout.col_left(*c) - origin < available);
        frozen.chain(scrolling).collect()
    }

    /// Last scrollable row with any part on screen
    pub fn last_visible_row(&self, layout: &SheetLayout, headers: &HeaderConfig) -> u32 {
        self.visible_rows(layout, headers)
            .last()
            .copied()
            .unwrap_or(self.row_window_start)
            .max(self.row_window_start)
    }

    /// Last scrollable column with any part on screen
    pub fn last_visible_col(&self, layout: &SheetLayout, headers: &HeaderConfig) -> u32 {
        self.visible_cols(layout, headers)
            .last()
            .copied()
            .unwrap_or(self.col_window_start)
            .max(self.col_window_start)
    }

    /// Is the cell inside the window (frozen panes count as always visible)?
    pub fn is_cell_visible(
        &self,
        cell: CellIndex,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> bool {
        let row_ok = cell.r < self.frozen_rows
            || (cell.r >= self.row_window_start && cell.r <= self.last_visible_row(layout, headers));
        let col_ok = cell.c < self.frozen_cols
            || (cell.c >= self.col_window_start && cell.c <= self.last_visible_col(layout, headers));
        row_ok && col_ok
    }

    pub fn pane_x(&self, x: f32, layout: &SheetLayout, headers: &HeaderConfig) -> Pane {
        let data_x = x - headers.width();
        if data_x < 0.0 {
            Pane::Header
        } else if data_x < layout.frozen_cols_width() {
            Pane::Frozen
        } else {
            Pane::Scrollable
        }
    }

    pub fn pane_y(&self, y: f32, layout: &SheetLayout, headers: &HeaderConfig) -> Pane {
        let data_y = y - headers.height();
        if data_y < 0.0 {
            Pane::Header
        } else if data_y < layout.frozen_rows_height() {
            Pane::Frozen
        } else {
            Pane::Scrollable
        }
    }

    /// Canvas x → sheet x. Header positions map to the left edge of the
    /// visible data.
    pub fn canvas_to_sheet_x(&self, x: f32, layout: &SheetLayout, headers: &HeaderConfig) -> f32 {
        let data_x = (x - headers.width()).max(0.0);
        let frozen = layout.frozen_cols_width();
        if data_x < frozen {
            data_x
        } else {
            data_x - frozen + layout.col_left(self.col_window_start)
        }
    }

    /// Canvas y → sheet y
    pub fn canvas_to_sheet_y(&self, y: f32, layout: &SheetLayout, headers: &HeaderConfig) -> f32 {
        let data_y = (y - headers.height()).max(0.0);
        let frozen = layout.frozen_rows_height();
        if data_y < frozen {
            data_y
        } else {
            data_y - frozen + layout.row_top(self.row_window_start)
        }
    }

    pub fn canvas_to_sheet(
        &self,
        x: f32,
        y: f32,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> (f32, f32) {
        (
            self.canvas_to_sheet_x(x, layout, headers),
            self.canvas_to_sheet_y(y, layout, headers),
        )
    }

    /// Sheet x → canvas x for a position inside `col`.
    ///
    /// Frozen columns sit at their natural position; scrollable columns are
    /// shifted by the window origin and placed after the frozen pane.
    pub fn sheet_to_canvas_x(
        &self,
        x: f32,
        col: u32,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> f32 {
        if col < self.frozen_cols {
            headers.width() + x
        } else {
            headers.width() + layout.frozen_cols_width() + x
                - layout.col_left(self.col_window_start)
        }
    }

    /// Sheet y → canvas y for a position inside `row`
    pub fn sheet_to_canvas_y(
        &self,
        y: f32,
        row: u32,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> f32 {
        if row < self.frozen_rows {
            headers.height() + y
        } else {
            headers.height() + layout.frozen_rows_height() + y
                - layout.row_top(self.row_window_start)
        }
    }

    /// Sheet point → canvas point, choosing the pane from the point itself.
    pub fn sheet_point_to_canvas(
        &self,
        x: f32,
        y: f32,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> (f32, f32) {
        let col = if x < layout.frozen_cols_width() {
            0
        } else {
            self.frozen_cols
        };
        let row = if y < layout.frozen_rows_height() {
            0
        } else {
            self.frozen_rows
        };
        (
            self.sheet_to_canvas_x(x, col, layout, headers),
            self.sheet_to_canvas_y(y, row, layout, headers),
        )
    }

    /// Cell under a canvas point, clamped into the sheet.
    ///
    /// Points over a header resolve to the first visible data row/column on
    /// that side, which is what a drag that leaves the grid needs.
    pub fn cell_at(
        &self,
        x: f32,
        y: f32,
        layout: &SheetLayout,
        headers: &HeaderConfig,
    ) -> CellIndex {
        let (sx, sy) = self.canvas_to_sheet(x, y, layout, headers);
        let row = if self.pane_y(y, layout, headers) == Pane::Header {
            self.first_row_on_screen()
        } else {
            layout.row_at_y(sy).unwrap_or(0)
        };
        let col = if self.pane_x(x, layout, headers) == Pane::Header {
            self.first_col_on_screen()
        } else {
            layout.col_at_x(sx).unwrap_or(0)
        };
        CellIndex::new(row, col)
    }

    fn first_row_on_screen(&self) -> u32 {
        if self.frozen_rows > 0 {
            0
        } else {
            self.row_window_start
        }
    }

    fn first_col_on_screen(&self) -> u32 {
        if self.frozen_cols > 0 {
            0
        } else {
            self.col_window_start
        }
    }
}

fn clamp_visible(index: u32, min: u32, max: u32, hidden: impl Fn(u32) -> bool) -> u32 {
    let index = index.clamp(min, max);
    if !hidden(index) {
        return index;
    }
    (index..=max)
        .find(|i| !hidden(*i))
        .or_else(|| (min..index).rev().find(|i| !hidden(*i)))
        .unwrap_or(index)
}

fn step_visible(start: u32, delta: i64, min: u32, max: u32, hidden: impl Fn(u32) -> bool) -> u32 {
    let mut index = start;
    let steps = delta.unsigned_abs();
    for _ in 0..steps {
        let next = if delta > 0 {
            (index.saturating_add(1)..=max).find(|i| !hidden(*i))
        } else {
            (min..index).rev().find(|i| !hidden(*i))
        };
        match next {
            Some(i) => index = i,
            None => break,
        }
    }
    index.clamp(min, max)
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
    use std::collections::{HashMap, HashSet};

    fn frozen_layout() -> SheetLayout {
        let mut layout = SheetLayout::with_defaults(99, 25);
        layout.set_frozen(2, 1);
        layout
    }

    #[test]
    fn test_scroll_clamps_to_frozen() {
        let layout = frozen_layout();
        let mut vp = ViewportWindow::for_layout(&layout, 800.0, 600.0);
        assert_eq!(vp.row_window_start, 2);
        assert_eq!(vp.col_window_start, 1);

        assert!(!vp.scroll_by(-10, -10, &layout));
        assert_eq!(vp.row_window_start, 2);
        assert_eq!(vp.col_window_start, 1);

        assert!(vp.scroll_by(1000, 1000, &layout));
        assert_eq!(vp.row_window_start, 99);
        assert_eq!(vp.col_window_start, 25);
    }

    #[test]
    fn test_scroll_skips_hidden_rows() {
        let hidden: HashSet<u32> = [3, 4].into_iter().collect();
        let layout = SheetLayout::new(
            50,
            10,
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
            &hidden,
            &[],
            0,
            0,
        );
        let mut vp = ViewportWindow::for_layout(&layout, 800.0, 600.0);
        vp.set_window_start(2, 0, &layout);
        vp.scroll_by(1, 0, &layout);
        assert_eq!(vp.row_window_start, 5);
        vp.scroll_by(-1, 0, &layout);
        assert_eq!(vp.row_window_start, 2);
        // Landing directly on a hidden row moves forward to a visible one
        vp.set_window_start(3, 0, &layout);
        assert_eq!(vp.row_window_start, 5);
    }

    #[test]
    fn test_visible_rows_include_frozen() {
        let layout = frozen_layout();
        let headers = HeaderConfig::default();
        let mut vp = ViewportWindow::for_layout(&layout, 400.0, 120.0);
        vp.scroll_by(10, 0, &layout);
        // 120 - 20 header - 40 frozen = 60 => three 20-unit rows
        assert_eq!(vp.visible_rows(&layout, &headers), vec![0, 1, 12, 13, 14]);
        assert_eq!(vp.last_visible_row(&layout, &headers), 14);
    }

    #[test]
    fn test_canvas_sheet_mapping_frozen() {
        let layout = frozen_layout();
        let headers = HeaderConfig::default();
        let mut vp = ViewportWindow::for_layout(&layout, 800.0, 600.0);
        vp.scroll_by(10, 3, &layout);

        // Inside the frozen row band: no scroll applied
        assert_eq!(vp.canvas_to_sheet_y(30.0, &layout, &headers), 10.0);
        // Just below the frozen band: the window start row
        let y = vp.canvas_to_sheet_y(20.0 + 40.0 + 1.0, &layout, &headers);
        assert_eq!(layout.row_at_y(y), Some(12));

        let cell = vp.cell_at(40.0 + 64.0 + 1.0, 20.0 + 40.0 + 1.0, &layout, &headers);
        assert_eq!(cell, CellIndex::new(12, 4));

        let x = vp.sheet_to_canvas_x(layout.col_left(4), 4, &layout, &headers);
        assert_eq!(x, 40.0 + 64.0);
    }

    #[test]
    fn test_index_from_scroll_offset() {
        let layout = frozen_layout();
        let vp = ViewportWindow::for_layout(&layout, 800.0, 600.0);
        let mut coords = CoordinateSpace::default();
        assert_eq!(
            vp.index_from_scroll_offset(&layout, &coords, Axis::Row, 0.0),
            2
        );
        assert_eq!(
            vp.index_from_scroll_offset(&layout, &coords, Axis::Row, 200.0),
            12
        );
        coords.set_zoom(2.0);
        assert_eq!(
            vp.index_from_scroll_offset(&layout, &coords, Axis::Row, 200.0),
            7
        );
        assert_eq!(
            vp.index_from_scroll_offset(&layout, &coords, Axis::Col, 1.0e9),
            25
        );
    }
}
