//! Pre-computed layout data for a sheet.
//!
//! Cell positions are computed once when a sheet is set up and patched in
//! place when a row or column is resized, enabling O(log n) lookups for hit
//! testing and "next visible" navigation that skips hidden rows/columns.

use std::collections::{HashMap, HashSet};

use crate::types::{CellIndex, ObjectAnchor, Rectangle};

/// Pre-computed layout data for a sheet
#[derive(Debug, Clone)]
pub struct SheetLayout {
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge)
    pub col_positions: Vec<f32>,
    /// Cumulative row positions (`row_positions[i]` = y of row i's top edge)
    pub row_positions: Vec<f32>,
    /// Column widths (0 for hidden columns)
    pub col_widths: Vec<f32>,
    /// Row heights (0 for hidden rows)
    pub row_heights: Vec<f32>,
    /// Merge info lookup by (row, col)
    pub merges: HashMap<(u32, u32), MergeInfo>,
    /// Merged regions, normalized
    pub merge_ranges: Vec<Rectangle>,
    /// Maximum row index
    pub max_row: u32,
    /// Maximum column index
    pub max_col: u32,
    /// Number of frozen rows (0 = no frozen rows)
    pub frozen_rows: u32,
    /// Number of frozen columns (0 = no frozen columns)
    pub frozen_cols: u32,
}

/// Information about a merged cell region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeInfo {
    /// True if this cell is the top-left origin of the merge
    pub is_origin: bool,
    /// Row of the merge origin
    pub origin_row: u32,
    /// Column of the merge origin
    pub origin_col: u32,
    /// Number of rows in the merge
    pub row_span: u32,
    /// Number of columns in the merge
    pub col_span: u32,
}

impl MergeInfo {
    pub fn range(&self) -> Rectangle {
        Rectangle::new(
            CellIndex::new(self.origin_row, self.origin_col),
            CellIndex::new(
                self.origin_row + self.row_span.saturating_sub(1),
                self.origin_col + self.col_span.saturating_sub(1),
            ),
        )
    }
}

/// Rectangle representing a cell's bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width of the cell
    pub width: f32,
    /// Height of the cell
    pub height: f32,
    /// True if this cell should be skipped (part of merge but not origin)
    pub skip: bool,
}

/// Default column width in logical units (Excel default ~64px at 100% zoom)
pub const DEFAULT_COL_WIDTH: f32 = 64.0;

/// Default row height in logical units (Excel default ~20px at 100% zoom)
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

impl SheetLayout {
    /// Create a new layout from sheet data
    ///
    /// # Arguments
    /// * `max_row` - Maximum row index in the sheet
    /// * `max_col` - Maximum column index in the sheet
    /// * `col_widths` - Map of column index to width
    /// * `row_heights` - Map of row index to height
    /// * `hidden_cols` - Set of hidden column indices
    /// * `hidden_rows` - Set of hidden row indices
    /// * `merges` - List of merge ranges
    /// * `frozen_rows` - Number of frozen rows (0 = none)
    /// * `frozen_cols` - Number of frozen columns (0 = none)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_row: u32,
        max_col: u32,
        col_widths_map: &HashMap<u32, f32>,
        row_heights_map: &HashMap<u32, f32>,
        hidden_cols: &HashSet<u32>,
        hidden_rows: &HashSet<u32>,
        merge_ranges: &[Rectangle],
        frozen_rows: u32,
        frozen_cols: u32,
    ) -> Self {
        let col_widths: Vec<f32> = (0..=max_col)
            .map(|col| {
                if hidden_cols.contains(&col) {
                    0.0
                } else {
                    col_widths_map
                        .get(&col)
                        .copied()
                        .unwrap_or(DEFAULT_COL_WIDTH)
                }
            })
            .collect();
        let row_heights: Vec<f32> = (0..=max_row)
            .map(|row| {
                if hidden_rows.contains(&row) {
                    0.0
                } else {
                    row_heights_map
                        .get(&row)
                        .copied()
                        .unwrap_or(DEFAULT_ROW_HEIGHT)
                }
            })
            .collect();

        let mut layout = SheetLayout {
            col_positions: prefix_positions(&col_widths),
            row_positions: prefix_positions(&row_heights),
            col_widths,
            row_heights,
            merges: HashMap::new(),
            merge_ranges: Vec::new(),
            max_row,
            max_col,
            frozen_rows: frozen_rows.min(max_row),
            frozen_cols: frozen_cols.min(max_col),
        };
        layout.set_merges(merge_ranges);
        layout
    }

    /// Uniform layout with default sizes, no merges and no frozen panes
    pub fn with_defaults(max_row: u32, max_col: u32) -> Self {
        Self::new(
            max_row,
            max_col,
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
            &HashSet::new(),
            &[],
            0,
            0,
        )
    }

    /// Replace the merged regions and rebuild the per-cell lookup
    pub fn set_merges(&mut self, merge_ranges: &[Rectangle]) {
        self.merges.clear();
        self.merge_ranges = merge_ranges.iter().map(Rectangle::normalized).collect();
        for m in &self.merge_ranges {
            let row_span = m.row_count();
            let col_span = m.col_count();
            for r in m.s.r..=m.e.r.min(self.max_row) {
                for c in m.s.c..=m.e.c.min(self.max_col) {
                    self.merges.insert(
                        (r, c),
                        MergeInfo {
                            is_origin: r == m.s.r && c == m.s.c,
                            origin_row: m.s.r,
                            origin_col: m.s.c,
                            row_span,
                            col_span,
                        },
                    );
                }
            }
        }
    }

    /// Set frozen pane counts (clamped to the sheet)
    pub fn set_frozen(&mut self, frozen_rows: u32, frozen_cols: u32) {
        self.frozen_rows = frozen_rows.min(self.max_row);
        self.frozen_cols = frozen_cols.min(self.max_col);
    }

    /// Get cell bounds in sheet coordinates
    pub fn cell_rect(&self, row: u32, col: u32) -> CellRect {
        let x = self.col_left(col);
        let y = self.row_top(row);
        let mut w = self.col_widths.get(col as usize).copied().unwrap_or(0.0);
        let mut h = self.row_heights.get(row as usize).copied().unwrap_or(0.0);

        // Check for merge
        if let Some(merge) = self.merges.get(&(row, col)) {
            if !merge.is_origin {
                return CellRect {
                    x,
                    y,
                    width: w,
                    height: h,
                    skip: true,
                };
            }
            w = self.col_left(col + merge.col_span) - x;
            h = self.row_top(row + merge.row_span) - y;
        }

        CellRect {
            x,
            y,
            width: w,
            height: h,
            skip: false,
        }
    }

    /// Merged region containing the cell, if any
    pub fn merge_at(&self, cell: CellIndex) -> Option<Rectangle> {
        self.merges.get(&(cell.r, cell.c)).map(MergeInfo::range)
    }

    /// Grow a rectangle until every merge it touches lies fully inside it
    pub fn expand_to_merges(&self, rect: Rectangle) -> Rectangle {
        let mut rect = rect.normalized();
        loop {
            let mut grown = false;
            for m in &self.merge_ranges {
                if rect.intersects(m) && !rect.contains_rect(m) {
                    rect = rect.union(m);
                    grown = true;
                }
            }
            if !grown {
                return rect;
            }
        }
    }

    /// Find row at y position (binary search).
    ///
    /// Hidden rows never match; positions past the end clamp to `max_row`.
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        index_at(&self.row_positions, y).map(|i| i.min(self.max_row))
    }

    /// Find column at x position (binary search)
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        index_at(&self.col_positions, x).map(|i| i.min(self.max_col))
    }

    /// Top edge of a row
    pub fn row_top(&self, row: u32) -> f32 {
        self.row_positions
            .get(row as usize)
            .or(self.row_positions.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Left edge of a column
    pub fn col_left(&self, col: u32) -> f32 {
        self.col_positions
            .get(col as usize)
            .or(self.col_positions.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Get total width of the sheet
    pub fn total_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Get total height of the sheet
    pub fn total_height(&self) -> f32 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Get column width at index
    pub fn col_width(&self, col: u32) -> f32 {
        self.col_widths
            .get(col as usize)
            .copied()
            .unwrap_or(DEFAULT_COL_WIDTH)
    }

    /// Get row height at index
    pub fn row_height(&self, row: u32) -> f32 {
        self.row_heights
            .get(row as usize)
            .copied()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.row_heights.get(row as usize).is_some_and(|h| *h <= 0.0)
    }

    pub fn is_col_hidden(&self, col: u32) -> bool {
        self.col_widths.get(col as usize).is_some_and(|w| *w <= 0.0)
    }

    /// First visible row strictly after `row`
    pub fn next_visible_row(&self, row: u32) -> Option<u32> {
        ((row.checked_add(1)?)..=self.max_row).find(|r| !self.is_row_hidden(*r))
    }

    /// Last visible row strictly before `row`
    pub fn prev_visible_row(&self, row: u32) -> Option<u32> {
        (0..row.min(self.max_row + 1))
            .rev()
            .find(|r| !self.is_row_hidden(*r))
    }

    /// First visible column strictly after `col`
    pub fn next_visible_col(&self, col: u32) -> Option<u32> {
        ((col.checked_add(1)?)..=self.max_col).find(|c| !self.is_col_hidden(*c))
    }

    /// Last visible column strictly before `col`
    pub fn prev_visible_col(&self, col: u32) -> Option<u32> {
        (0..col.min(self.max_col + 1))
            .rev()
            .find(|c| !self.is_col_hidden(*c))
    }

    /// `row` itself when visible, otherwise the next visible row after it
    pub fn visible_row_at_or_after(&self, row: u32) -> Option<u32> {
        (row..=self.max_row).find(|r| !self.is_row_hidden(*r))
    }

    /// `col` itself when visible, otherwise the next visible column after it
    pub fn visible_col_at_or_after(&self, col: u32) -> Option<u32> {
        (col..=self.max_col).find(|c| !self.is_col_hidden(*c))
    }

    /// Resize a row and shift every row below it
    pub fn set_row_height(&mut self, row: u32, height: f32) -> bool {
        let Some(slot) = self.row_heights.get_mut(row as usize) else {
            return false;
        };
        *slot = height.max(0.0);
        self.row_positions = prefix_positions(&self.row_heights);
        true
    }

    /// Resize a column and shift every column to its right
    pub fn set_col_width(&mut self, col: u32, width: f32) -> bool {
        let Some(slot) = self.col_widths.get_mut(col as usize) else {
            return false;
        };
        *slot = width.max(0.0);
        self.col_positions = prefix_positions(&self.col_widths);
        true
    }

    /// Get the total height of frozen rows (returns 0 if no frozen rows)
    pub fn frozen_rows_height(&self) -> f32 {
        if self.frozen_rows == 0 {
            return 0.0;
        }
        self.row_top(self.frozen_rows)
    }

    /// Get the total width of frozen columns (returns 0 if no frozen columns)
    pub fn frozen_cols_width(&self) -> f32 {
        if self.frozen_cols == 0 {
            return 0.0;
        }
        self.col_left(self.frozen_cols)
    }

    /// Anchor cell and in-cell offset for an absolute sheet position
    pub fn anchor_for(&self, x: f32, y: f32) -> ObjectAnchor {
        let col = self.col_at_x(x.max(0.0)).unwrap_or(0);
        let row = self.row_at_y(y.max(0.0)).unwrap_or(0);
        ObjectAnchor {
            cell: CellIndex::new(row, col),
            offset_x: (x - self.col_left(col)).max(0.0),
            offset_y: (y - self.row_top(row)).max(0.0),
        }
    }

    /// The whole sheet as a rectangle
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(
            CellIndex::origin(),
            CellIndex::new(self.max_row, self.max_col),
        )
    }
}

fn prefix_positions(sizes: &[f32]) -> Vec<f32> {
    let mut positions = Vec::with_capacity(sizes.len() + 1);
    let mut acc: f32 = 0.0;
    for size in sizes {
        positions.push(acc);
        acc += size;
    }
    positions.push(acc); // Final edge
    positions
}

/// Index of the last visible entry whose start is `<= pos`.
fn index_at(positions: &[f32], pos: f32) -> Option<u32> {
    if positions.len() < 2 {
        return None;
    }
    // partition_point lands after runs of equal positions, so zero-sized
    // (hidden) entries are skipped in favour of the visible one that follows.
    let idx = positions.partition_point(|p| *p <= pos).saturating_sub(1);
    let last = positions.len() - 2;
    u32::try_from(idx.min(last)).ok()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn layout_with(hidden_rows: &[u32], merges: &[Rectangle]) -> SheetLayout {
        SheetLayout::new(
            10,
            5,
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
            &hidden_rows.iter().copied().collect(),
            merges,
            0,
            0,
        )
    }

    #[test]
    fn test_basic_layout() {
        let layout = SheetLayout::with_defaults(10, 5);

        assert_eq!(layout.max_row, 10);
        assert_eq!(layout.max_col, 5);
        assert_eq!(layout.total_width(), DEFAULT_COL_WIDTH * 6.0);
        assert_eq!(layout.total_height(), DEFAULT_ROW_HEIGHT * 11.0);
    }

    #[test]
    fn test_cell_rect() {
        let layout = SheetLayout::with_defaults(10, 5);

        let rect = layout.cell_rect(0, 0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT);
        assert!(!rect.skip);

        let rect = layout.cell_rect(1, 2);
        assert_eq!(rect.x, DEFAULT_COL_WIDTH * 2.0);
        assert_eq!(rect.y, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_merged_cells() {
        // Merge A1:B2 (rows 0-1, cols 0-1)
        let merge = Rectangle::from_corners(CellIndex::new(0, 0), CellIndex::new(1, 1));
        let layout = layout_with(&[], &[merge]);

        // Origin cell should have full merged dimensions
        let rect = layout.cell_rect(0, 0);
        assert!(!rect.skip);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH * 2.0);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT * 2.0);

        // Non-origin cells should be skipped
        assert!(layout.cell_rect(0, 1).skip);
        assert!(layout.cell_rect(1, 0).skip);
        assert!(layout.cell_rect(1, 1).skip);

        assert_eq!(layout.merge_at(CellIndex::new(1, 1)), Some(merge));
        assert_eq!(layout.merge_at(CellIndex::new(2, 2)), None);
    }

    #[test]
    fn test_expand_to_merges_chains() {
        let a = Rectangle::from_corners(CellIndex::new(0, 1), CellIndex::new(1, 2));
        let b = Rectangle::from_corners(CellIndex::new(1, 3), CellIndex::new(3, 3));
        let layout = layout_with(&[], &[a, b]);

        let grown = layout.expand_to_merges(Rectangle::cell(CellIndex::new(0, 2)));
        assert_eq!(grown, a);

        let grown = layout.expand_to_merges(Rectangle::from_corners(
            CellIndex::new(0, 2),
            CellIndex::new(1, 3),
        ));
        assert_eq!(grown.s, CellIndex::new(0, 1));
        assert_eq!(grown.e, CellIndex::new(3, 3));
    }

    #[test]
    fn test_row_at_y() {
        let layout = SheetLayout::with_defaults(10, 5);

        assert_eq!(layout.row_at_y(0.0), Some(0));
        assert_eq!(layout.row_at_y(10.0), Some(0));
        assert_eq!(layout.row_at_y(DEFAULT_ROW_HEIGHT), Some(1));
        assert_eq!(layout.row_at_y(DEFAULT_ROW_HEIGHT * 2.5), Some(2));
        assert_eq!(layout.row_at_y(-5.0), Some(0));
        assert_eq!(layout.row_at_y(1.0e6), Some(10));
    }

    #[test]
    fn test_col_at_x() {
        let layout = SheetLayout::with_defaults(10, 5);

        assert_eq!(layout.col_at_x(0.0), Some(0));
        assert_eq!(layout.col_at_x(32.0), Some(0));
        assert_eq!(layout.col_at_x(DEFAULT_COL_WIDTH), Some(1));
        assert_eq!(layout.col_at_x(DEFAULT_COL_WIDTH * 2.5), Some(2));
    }

    #[test]
    fn test_hidden_rows_are_skipped() {
        let layout = layout_with(&[2, 3], &[]);

        assert!(layout.is_row_hidden(2));
        assert_eq!(layout.next_visible_row(1), Some(4));
        assert_eq!(layout.prev_visible_row(4), Some(1));
        // y at the top of row 4 (rows 2 and 3 have no height)
        assert_eq!(layout.row_at_y(DEFAULT_ROW_HEIGHT * 2.0), Some(4));
        assert_eq!(layout.next_visible_row(10), None);
        assert_eq!(layout.prev_visible_row(0), None);
    }

    #[test]
    fn test_set_row_height_shifts_rows_below() {
        let mut layout = SheetLayout::with_defaults(10, 5);
        assert!(layout.set_row_height(1, 50.0));
        assert_eq!(layout.row_height(1), 50.0);
        assert_eq!(layout.row_top(2), DEFAULT_ROW_HEIGHT + 50.0);
        assert!(!layout.set_row_height(99, 10.0));
    }

    #[test]
    fn test_anchor_for() {
        let layout = SheetLayout::with_defaults(10, 5);
        let anchor = layout.anchor_for(70.0, 45.0);
        assert_eq!(anchor.cell, CellIndex::new(2, 1));
        assert_eq!(anchor.offset_x, 6.0);
        assert_eq!(anchor.offset_y, 5.0);
    }
}
