//! Tests for viewport scrolling: wheel, zoom, scrollbar mapping, autoscroll
//! and the frozen-pane invariant
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::*;
use test_case::test_case;
use xlinteract::{
    Axis, AxisPriority, CellIndex, EngineConfig, Grid, Key, KeyEvent, MemorySheet, Modifiers,
    RedrawMode, SheetSetup, TouchPoint, WheelEvent,
};

fn frozen_engine() -> TestEngine {
    let mut sheet = MemorySheet::new(999, 99);
    sheet.layout_mut().set_frozen(2, 1);
    engine(sheet)
}

fn assert_outside_frozen(engine: &TestEngine) {
    let vp = engine.viewport();
    assert!(
        vp.row_window_start >= vp.frozen_rows,
        "row window {} inside {} frozen rows",
        vp.row_window_start,
        vp.frozen_rows
    );
    assert!(
        vp.col_window_start >= vp.frozen_cols,
        "col window {} inside {} frozen cols",
        vp.col_window_start,
        vp.frozen_cols
    );
}

fn wheel(delta_x: f32, delta_y: f32, modifiers: Modifiers) -> WheelEvent {
    WheelEvent {
        delta_x,
        delta_y,
        modifiers,
        time_ms: 0.0,
    }
}

// ============================================================================
// Frozen panes
// ============================================================================

#[test]
fn test_window_starts_after_frozen_panes() {
    let engine = frozen_engine();
    assert_eq!(engine.viewport().row_window_start, 2);
    assert_eq!(engine.viewport().col_window_start, 1);
}

#[test]
fn test_window_never_enters_frozen_panes() {
    let mut engine = frozen_engine();

    engine.wheel(wheel(0.0, -120.0, Modifiers::NONE));
    assert_outside_frozen(&engine);
    engine.wheel(wheel(0.0, -120.0, Modifiers::SHIFT));
    assert_outside_frozen(&engine);

    engine.wheel(wheel(0.0, 120.0, Modifiers::NONE));
    engine.wheel(wheel(0.0, -120.0, Modifiers::NONE));
    engine.wheel(wheel(0.0, -120.0, Modifiers::NONE));
    assert_outside_frozen(&engine);
    assert_eq!(engine.viewport().row_window_start, 2);

    engine.scroll_to_offset(Axis::Row, 0.0);
    engine.scroll_to_offset(Axis::Col, 0.0);
    assert_outside_frozen(&engine);

    // Finger moving down scrolls towards the top
    engine.touch_start(TouchPoint::new(400.0, 200.0, 0.0));
    engine.touch_move(TouchPoint::new(400.0, 400.0, 10.0));
    engine.touch_end(TouchPoint::new(400.0, 400.0, 20.0));
    assert_outside_frozen(&engine);

    for _ in 0..5 {
        engine.key_down(KeyEvent::new(Key::ArrowUp));
        engine.key_down(KeyEvent::new(Key::ArrowLeft));
        assert_outside_frozen(&engine);
    }

    // Autoscroll up-left from a drag
    engine.pointer_down(at(cell_center(4, 3), 100.0));
    engine.pointer_move(at((HEADER_W + 5.0, HEADER_H + 5.0), 130.0));
    for i in 1..10 {
        engine.tick(130.0 + 100.0 * f64::from(i));
        assert_outside_frozen(&engine);
    }
    engine.pointer_up(at((HEADER_W + 5.0, HEADER_H + 5.0), 1200.0));
}

#[test]
fn test_freezing_later_pushes_window_out() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.wheel(wheel(0.0, 120.0, Modifiers::NONE));
    assert_eq!(engine.viewport().row_window_start, 3);

    engine.sheet_mut().layout_mut().set_frozen(5, 2);
    engine.sync_layout();
    assert_eq!(engine.viewport().row_window_start, 5);
    assert_eq!(engine.viewport().col_window_start, 2);
    assert_eq!(engine.sink().last(), Some(RedrawMode::Full));
}

// ============================================================================
// Wheel and scrollbar
// ============================================================================

#[test]
fn test_wheel_scrolls_rows_per_notch() {
    let mut engine = engine(MemorySheet::new(999, 99));
    assert!(engine.wheel(wheel(0.0, 53.0, Modifiers::NONE)));
    assert_eq!(engine.viewport().row_window_start, 3);
    assert_eq!(engine.viewport().col_window_start, 0);
    assert_eq!(engine.sink().last(), Some(RedrawMode::Full));

    assert!(engine.wheel(wheel(0.0, -10.0, Modifiers::NONE)));
    assert_eq!(engine.viewport().row_window_start, 0);
}

#[test]
fn test_shift_wheel_scrolls_columns() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.wheel(wheel(0.0, 120.0, Modifiers::SHIFT));
    assert_eq!(engine.viewport().row_window_start, 0);
    assert_eq!(engine.viewport().col_window_start, 3);
}

#[test]
fn test_horizontal_wheel_scrolls_one_column() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.wheel(wheel(40.0, 0.0, Modifiers::NONE));
    assert_eq!(engine.viewport().col_window_start, 1);
}

#[test]
fn test_wheel_at_bottom_reports_nothing() {
    let mut engine = engine(MemorySheet::new(4, 4));
    engine.wheel(wheel(0.0, 120.0, Modifiers::NONE));
    assert_eq!(engine.viewport().row_window_start, 3);
    engine.wheel(wheel(0.0, 120.0, Modifiers::NONE));
    assert_eq!(engine.viewport().row_window_start, 4);
    engine.sink_mut().clear();
    assert!(!engine.wheel(wheel(0.0, 120.0, Modifiers::NONE)));
    assert_eq!(engine.sink().full_count(), 0);
}

#[test]
fn test_wheel_skips_hidden_rows() {
    let sheet = MemorySheet::from_setup(&SheetSetup {
        max_row: 999,
        max_col: 99,
        hidden_rows: vec![1, 2],
        ..SheetSetup::default()
    })
    .unwrap();
    let mut engine = engine(sheet);
    engine.wheel(wheel(0.0, 120.0, Modifiers::NONE));
    assert_eq!(engine.viewport().row_window_start, 5);
}

#[test]
fn test_scrollbar_offset_maps_to_window() {
    let mut engine = frozen_engine();
    // 200 logical units below the frozen rows: ten rows in
    engine.scroll_to_offset(Axis::Row, 200.0);
    assert_eq!(engine.viewport().row_window_start, 12);
    engine.scroll_to_offset(Axis::Col, 130.0);
    assert_eq!(engine.viewport().col_window_start, 3);
}

#[test]
fn test_scrollbar_offset_is_physical() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.set_zoom(2.0);
    engine.scroll_to_offset(Axis::Row, 200.0);
    assert_eq!(engine.viewport().row_window_start, 5);
}

// ============================================================================
// Zoom and canvas size
// ============================================================================

#[test]
fn test_ctrl_wheel_zooms_in_one_step() {
    let mut engine = engine(MemorySheet::new(999, 99));
    assert!(engine.wheel(wheel(0.0, -100.0, Modifiers::CTRL)));
    assert!((engine.zoom() - 1.1).abs() < 1e-5);
    assert!((engine.viewport().width - 800.0 / 1.1).abs() < 1e-3);
    assert!((engine.viewport().height - 600.0 / 1.1).abs() < 1e-3);
    // Zooming never scrolls
    assert_eq!(engine.viewport().row_window_start, 0);

    engine.wheel(wheel(0.0, 100.0, Modifiers::CTRL));
    engine.wheel(wheel(0.0, 100.0, Modifiers::CTRL));
    assert!((engine.zoom() - 0.9).abs() < 1e-5);
}

#[test]
fn test_zoom_is_clamped() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.set_zoom(10.0);
    assert_eq!(engine.zoom(), 4.0);
    assert_eq!(engine.viewport().width, 200.0);

    engine.set_zoom(0.1);
    assert_eq!(engine.zoom(), 0.5);

    engine.sink_mut().clear();
    engine.set_zoom(f32::NAN);
    engine.set_zoom(-1.0);
    assert_eq!(engine.zoom(), 0.5);
    assert_eq!(engine.sink().full_count(), 0);
}

#[test]
fn test_zoomed_pointer_maps_through_logical_space() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.set_zoom(2.0);
    // Pointer events arrive in logical units
    click(&mut engine, cell_center(3, 2), 0.0);
    assert_eq!(engine.selection().active_cell, CellIndex::new(3, 2));
}

#[test]
fn test_resize_updates_logical_size() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.resize(1024.0, 768.0);
    assert_eq!(engine.viewport().width, 1024.0);
    assert_eq!(engine.viewport().height, 768.0);
    assert_eq!(engine.sink().last(), Some(RedrawMode::Full));

    engine.sink_mut().clear();
    engine.resize(1024.0, 768.0);
    assert_eq!(engine.sink().full_count(), 0);
}

// ============================================================================
// Autoscroll
// ============================================================================

#[test]
fn test_drag_autoscrolls_down_on_interval() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.pointer_down(at(cell_center(1, 1), 0.0));
    // Inside the bottom edge band
    engine.pointer_move(at((400.0, 590.0), 30.0));
    assert_eq!(engine.viewport().row_window_start, 0);

    engine.tick(100.0);
    assert_eq!(engine.viewport().row_window_start, 0);
    engine.tick(130.0);
    assert_eq!(engine.viewport().row_window_start, 1);
    engine.tick(180.0);
    assert_eq!(engine.viewport().row_window_start, 1);
    engine.tick(230.0);
    assert_eq!(engine.viewport().row_window_start, 2);

    let last_row = engine
        .viewport()
        .last_visible_row(engine.sheet().layout(), engine.headers());
    assert_eq!(engine.selection().areas, vec![rect(1, 1, last_row, 5)]);
    assert_eq!(engine.sink().last(), Some(RedrawMode::Full));

    engine.pointer_up(at((400.0, 590.0), 250.0));
    engine.tick(330.0);
    engine.tick(430.0);
    assert_eq!(engine.viewport().row_window_start, 2);
}

#[test]
fn test_leaving_edge_stops_autoscroll() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.pointer_down(at(cell_center(1, 1), 0.0));
    engine.pointer_move(at((400.0, 590.0), 30.0));
    engine.tick(130.0);
    assert_eq!(engine.viewport().row_window_start, 1);

    engine.pointer_move(at((400.0, 300.0), 150.0));
    engine.tick(230.0);
    engine.tick(330.0);
    assert_eq!(engine.viewport().row_window_start, 1);
    engine.pointer_up(at((400.0, 300.0), 340.0));
}

#[test_case(AxisPriority::Horizontal, 0, 1 ; "horizontal first")]
#[test_case(AxisPriority::Vertical, 1, 0 ; "vertical first")]
fn test_corner_autoscroll_priority(priority: AxisPriority, rows: u32, cols: u32) {
    let config = EngineConfig {
        auto_scroll_priority: priority,
        ..EngineConfig::default()
    };
    let mut engine = engine_with(MemorySheet::new(999, 99), config);
    engine.pointer_down(at(cell_center(1, 1), 0.0));
    // Bottom-right corner: inside both edge bands
    engine.pointer_move(at((790.0, 590.0), 30.0));
    engine.tick(130.0);
    engine.pointer_up(at((790.0, 590.0), 140.0));

    assert_eq!(engine.viewport().row_window_start, rows);
    assert_eq!(engine.viewport().col_window_start, cols);
}

#[test]
fn test_autoscroll_at_limit_changes_nothing() {
    let mut engine = engine(MemorySheet::new(999, 99));
    engine.pointer_down(at(cell_center(2, 2), 0.0));
    engine.pointer_move(at((HEADER_W + 10.0, 300.0), 30.0));
    engine.sink_mut().clear();
    engine.tick(130.0);
    assert_eq!(engine.viewport().col_window_start, 0);
    assert_eq!(engine.sink().full_count(), 0);
    engine.pointer_up(at((HEADER_W + 10.0, 300.0), 140.0));
}
