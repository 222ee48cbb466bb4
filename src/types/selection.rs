use serde::{Deserialize, Serialize};

use super::{CellIndex, Rectangle};

/// Type of selection, decided by where the gesture started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    /// Standard cell selection (default)
    #[default]
    CellRange,
    /// Entire row(s) selected
    RowRange,
    /// Entire column(s) selected
    ColumnRange,
    /// All cells selected (corner click)
    All,
}

/// The sheet's current selection: one active cell plus an ordered list of areas.
///
/// The last area is the "current" one; it is the area mutated live during a
/// drag. `active_cell` stays defined even when `areas` is empty (keyboard
/// navigation clears the areas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSelection {
    pub active_cell: CellIndex,
    pub areas: Vec<Rectangle>,
}

impl Default for ActiveSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveSelection {
    /// A1 active, A1 selected.
    pub fn new() -> Self {
        let origin = CellIndex::origin();
        Self {
            active_cell: origin,
            areas: vec![Rectangle::cell(origin)],
        }
    }

    pub fn single(active_cell: CellIndex, area: Rectangle) -> Self {
        Self {
            active_cell,
            areas: vec![area.normalized()],
        }
    }

    /// The area mutated by a live drag (the last one).
    pub fn current(&self) -> Option<&Rectangle> {
        self.areas.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Rectangle> {
        self.areas.last_mut()
    }

    /// Check if any area contains the cell
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.areas.iter().any(|a| a.contains(cell))
    }
}

/// Configuration for row and column headers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderConfig {
    /// Whether headers are visible
    pub visible: bool,
    /// Width of row headers in logical units (~40 default)
    pub row_header_width: f32,
    /// Height of column headers in logical units (~20 default)
    pub col_header_height: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            visible: true,
            row_header_width: 40.0,
            col_header_height: 20.0,
        }
    }
}

impl HeaderConfig {
    /// Effective row-header width (0 when headers are hidden)
    pub fn width(&self) -> f32 {
        if self.visible {
            self.row_header_width
        } else {
            0.0
        }
    }

    /// Effective column-header height (0 when headers are hidden)
    pub fn height(&self) -> f32 {
        if self.visible {
            self.col_header_height
        } else {
            0.0
        }
    }
}
