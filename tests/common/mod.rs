//! Common test utilities for the interaction engine.
//!
//! Geometry helpers assume default sizes: 40-unit row header, 20-unit column
//! header, 64-unit columns and 20-unit rows, zoom 1 and an unscrolled window.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use xlinteract::{
    CellIndex, EngineConfig, InteractionEngine, MemorySheet, Modifiers, PointerEvent,
    RecordingNotifier, RecordingSink, Rectangle,
};

pub type TestEngine = InteractionEngine<MemorySheet, RecordingSink, RecordingNotifier>;

pub const HEADER_W: f32 = 40.0;
pub const HEADER_H: f32 = 20.0;
pub const COL_W: f32 = 64.0;
pub const ROW_H: f32 = 20.0;

/// Engine over `sheet` with default configuration and an 800x600 canvas.
pub fn engine(sheet: MemorySheet) -> TestEngine {
    engine_with(sheet, EngineConfig::default())
}

pub fn engine_with(sheet: MemorySheet, config: EngineConfig) -> TestEngine {
    InteractionEngine::new(sheet, RecordingSink::new(), RecordingNotifier::new(), config)
        .expect("valid configuration")
}

pub fn rect(r0: u32, c0: u32, r1: u32, c1: u32) -> Rectangle {
    Rectangle::from_corners(CellIndex::new(r0, c0), CellIndex::new(r1, c1))
}

/// Canvas point at the centre of a cell (no scroll, no frozen panes)
pub fn cell_center(r: u32, c: u32) -> (f32, f32) {
    (
        HEADER_W + COL_W * c as f32 + COL_W / 2.0,
        HEADER_H + ROW_H * r as f32 + ROW_H / 2.0,
    )
}

/// Canvas x of the right edge of column `c`
pub fn col_right(c: u32) -> f32 {
    HEADER_W + COL_W * (c + 1) as f32
}

/// Canvas y of the bottom edge of row `r`
pub fn row_bottom(r: u32) -> f32 {
    HEADER_H + ROW_H * (r + 1) as f32
}

pub fn at(point: (f32, f32), time_ms: f64) -> PointerEvent {
    PointerEvent::new(point.0, point.1, time_ms)
}

pub fn click(engine: &mut TestEngine, point: (f32, f32), time_ms: f64) {
    click_with(engine, point, Modifiers::NONE, time_ms);
}

pub fn click_with(engine: &mut TestEngine, point: (f32, f32), modifiers: Modifiers, time_ms: f64) {
    engine.pointer_down(at(point, time_ms).with_modifiers(modifiers));
    engine.pointer_up(at(point, time_ms + 5.0).with_modifiers(modifiers));
}

/// Press at `from`, move through `path`, release at the last point.
pub fn drag(engine: &mut TestEngine, from: (f32, f32), path: &[(f32, f32)], start_ms: f64) {
    drag_with(engine, from, path, Modifiers::NONE, start_ms);
}

pub fn drag_with(
    engine: &mut TestEngine,
    from: (f32, f32),
    path: &[(f32, f32)],
    modifiers: Modifiers,
    start_ms: f64,
) {
    engine.pointer_down(at(from, start_ms).with_modifiers(modifiers));
    let mut t = start_ms;
    for point in path {
        t += 30.0;
        engine.pointer_move(at(*point, t).with_modifiers(modifiers));
    }
    let last = path.last().copied().unwrap_or(from);
    engine.pointer_up(at(last, t + 30.0).with_modifiers(modifiers));
}
