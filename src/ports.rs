//! Collaborator interfaces the engine is driven through.
//!
//! The engine never touches a canvas, the DOM or a workbook directly. It
//! reads and mutates the sheet through [`Grid`] and [`Drawings`], asks for
//! repaints through [`RenderSink`], surfaces messages through [`Notifier`] and
//! consumes input from a [`PointerSource`]. The wasm binding wires these to
//! the browser; tests use the recorders below.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::InputEvent;
use crate::layout::SheetLayout;
use crate::protection::{selection_block_reason, BlockReason, ProtectionPolicy};
use crate::types::{CellIndex, InteractiveObject, ObjectAnchor, ObjectBounds, ObjectId, Rectangle};

/// How much of the canvas needs repainting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedrawMode {
    /// Cells, headers and overlays
    Full,
    /// Selection and drag overlays only
    Overlay,
}

pub trait RenderSink {
    fn request_redraw(&mut self, mode: RedrawMode);
}

impl<F: FnMut(RedrawMode)> RenderSink for F {
    fn request_redraw(&mut self, mode: RedrawMode) {
        self(mode);
    }
}

/// User-facing message channel (toasts)
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn notify(&mut self, message: &str) {
        self(message);
    }
}

/// Grid queries and structural mutations of the sheet being edited.
pub trait Grid {
    /// Row/column geometry, hidden rows/cols, merges and frozen panes
    fn layout(&self) -> &SheetLayout;

    fn protection(&self) -> ProtectionPolicy;

    fn is_cell_locked(&self, cell: CellIndex) -> bool;

    /// First cell of `rect`, row-major, that protection forbids selecting.
    ///
    /// The default asks [`Grid::is_cell_locked`] for every cell. Sheets that
    /// store lock state sparsely should answer from that storage instead, so
    /// the cost does not grow with the rectangle's area.
    fn selection_block(&self, rect: &Rectangle) -> Option<BlockReason> {
        selection_block_reason(&self.protection(), rect, |cell| self.is_cell_locked(cell))
    }

    /// Region keyboard navigation may move within
    fn used_range(&self) -> Rectangle;

    fn set_row_height(&mut self, row: u32, height: f32) -> Result<()>;

    fn set_col_width(&mut self, col: u32, width: f32) -> Result<()>;

    /// Move the contents of `src` so its top-left lands on `dst`'s top-left.
    fn move_area(&mut self, src: Rectangle, dst: Rectangle) -> Result<()>;

    /// Autofill `target` (which contains `src`) from the pattern in `src`.
    fn apply_brush(&mut self, src: Rectangle, target: Rectangle) -> Result<()>;
}

/// Drawn objects layered over the grid.
pub trait Drawings {
    /// Objects in paint order, bottom first
    fn objects(&self) -> &[InteractiveObject];

    fn object(&self, id: ObjectId) -> Option<&InteractiveObject> {
        self.objects().iter().find(|o| o.id == id)
    }

    fn set_bounds(&mut self, id: ObjectId, bounds: ObjectBounds, anchor: ObjectAnchor)
        -> Result<()>;

    fn set_rotation(&mut self, id: ObjectId, degrees: f32) -> Result<()>;
}

/// A sheet with both grid and drawing layers.
pub trait Sheet: Grid + Drawings {}

impl<T: Grid + Drawings + ?Sized> Sheet for T {}

/// Source of logical-space input events
pub trait PointerSource {
    fn next_event(&mut self) -> Option<InputEvent>;
}

impl PointerSource for VecDeque<InputEvent> {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

/// Records every redraw request.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub requests: Vec<RedrawMode>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_count(&self) -> usize {
        self.count(RedrawMode::Full)
    }

    pub fn overlay_count(&self) -> usize {
        self.count(RedrawMode::Overlay)
    }

    pub fn last(&self) -> Option<RedrawMode> {
        self.requests.last().copied()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    fn count(&self, mode: RedrawMode) -> usize {
        self.requests.iter().filter(|m| **m == mode).count()
    }
}

impl RenderSink for RecordingSink {
    fn request_redraw(&mut self, mode: RedrawMode) {
        self.requests.push(mode);
    }
}

/// Records every message shown to the user.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
