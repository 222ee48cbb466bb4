//! Grid geometry and the virtualized viewport.
//!
//! This module handles:
//! - Logical ⇄ physical unit conversion (zoom)
//! - Pre-computing cell positions from column widths and row heights
//! - Tracking the visible row/column window and frozen panes
//! - Binary search for efficient cell lookup at canvas coordinates
//! - Merge range handling

mod coordinate;
mod sheet_layout;
mod viewport;

pub use coordinate::CoordinateSpace;
pub use sheet_layout::{CellRect, MergeInfo, SheetLayout, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
pub use viewport::{Boundary, Pane, ViewportWindow};
