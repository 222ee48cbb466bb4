//! xlinteract - direct-manipulation engine for a virtualized spreadsheet grid
//!
//! Turns raw pointer, touch, wheel and keyboard input into spreadsheet
//! operations, for the browser via WebAssembly or any host that can feed
//! events:
//! - Selection of cells, rows, columns and multiple areas, gated by sheet protection
//! - Header resizing, selection moves, fill-handle extension
//! - Drawing objects: move, resize (rotation aware), rotate with snapping
//! - Frozen panes, hidden rows/columns, merged cells
//! - Edge autoscroll, touch scrolling, keyboard navigation
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { XlInteract } from 'xlinteract';
//! await init();
//! const engine = new XlInteract(canvas, JSON.stringify(sheet), null, devicePixelRatio);
//! engine.setRenderCallback((mode) => mode === 'full' ? drawAll() : drawOverlay());
//! engine.setToastCallback((message) => showToast(message));
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use xlinteract::{EngineConfig, InteractionEngine, MemorySheet, PointerEvent, RecordingNotifier, RecordingSink};
//!
//! let sheet = MemorySheet::new(99, 25);
//! let mut engine = InteractionEngine::new(sheet, RecordingSink::new(), RecordingNotifier::new(), EngineConfig::default())?;
//! engine.pointer_down(PointerEvent::new(100.0, 50.0, 0.0));
//! engine.pointer_up(PointerEvent::new(100.0, 50.0, 10.0));
//! assert!(engine.sink().full_count() > 0);
//! # Ok::<(), xlinteract::InteractError>(())
//! ```

pub mod cell_ref;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod ports;
pub mod protection;
pub mod sheet;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{AxisPriority, EngineConfig};
pub use engine::InteractionEngine;
pub use error::{InteractError, Result};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, PointerEvent, TouchPoint, WheelEvent};
pub use interaction::{CursorKind, DragMode, Preview, RegionTag, SelectionOutcome};
pub use layout::{CoordinateSpace, SheetLayout, ViewportWindow};
pub use ports::{
    Drawings, Grid, Notifier, PointerSource, RecordingNotifier, RecordingSink, RedrawMode,
    RenderSink, Sheet,
};
pub use protection::{BlockReason, ProtectionPolicy};
pub use sheet::{MemorySheet, Mutation, SheetSetup};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::XlInteract;

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
