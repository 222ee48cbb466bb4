//! Tests for keyboard navigation of the active cell
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
    CellIndex, Grid, Key, KeyEvent, MemorySheet, Modifiers, RedrawMode, SheetSetup,
};

fn key(key: Key) -> KeyEvent {
    KeyEvent::new(key)
}

fn shifted(key: Key) -> KeyEvent {
    KeyEvent {
        modifiers: Modifiers::SHIFT,
        ..KeyEvent::new(key)
    }
}

#[test_case(key(Key::ArrowDown), (3, 2) ; "arrow down")]
#[test_case(key(Key::ArrowUp), (1, 2) ; "arrow up")]
#[test_case(key(Key::ArrowLeft), (2, 1) ; "arrow left")]
#[test_case(key(Key::ArrowRight), (2, 3) ; "arrow right")]
#[test_case(key(Key::Tab), (2, 3) ; "tab")]
#[test_case(shifted(Key::Tab), (2, 1) ; "shift tab")]
#[test_case(key(Key::Enter), (3, 2) ; "enter")]
#[test_case(shifted(Key::Enter), (1, 2) ; "shift enter")]
fn test_key_moves_active_cell(event: KeyEvent, expected: (u32, u32)) {
    let mut engine = engine(MemorySheet::new(99, 25));
    click(&mut engine, cell_center(2, 2), 0.0);
    engine.sink_mut().clear();

    assert!(engine.key_down(event));
    assert_eq!(
        engine.selection().active_cell,
        CellIndex::new(expected.0, expected.1)
    );
    assert_eq!(engine.sink().last(), Some(RedrawMode::Overlay));
}

#[test]
fn test_other_keys_are_not_handled() {
    let mut engine = engine(MemorySheet::new(99, 25));
    assert!(!engine.key_down(key(Key::Other)));
    assert_eq!(Key::from_dom("PageDown"), Key::Other);
    assert_eq!(Key::from_dom("Down"), Key::ArrowDown);
}

#[test]
fn test_top_left_edge_is_not_handled() {
    let mut engine = engine(MemorySheet::new(99, 25));
    assert!(!engine.key_down(key(Key::ArrowUp)));
    assert!(!engine.key_down(key(Key::ArrowLeft)));
    assert!(!engine.key_down(shifted(Key::Enter)));
    assert_eq!(engine.selection().active_cell, CellIndex::origin());
}

#[test]
fn test_navigation_keeps_active_cell_visible() {
    let mut engine = engine(MemorySheet::new(99, 25));
    for _ in 0..40 {
        assert!(engine.key_down(key(Key::ArrowDown)));
        let active = engine.selection().active_cell;
        assert!(engine
            .viewport()
            .is_cell_visible(active, engine.sheet().layout(), engine.headers()));
    }
    assert_eq!(engine.selection().active_cell, CellIndex::new(40, 0));
    assert!(engine.viewport().row_window_start > 0);
    assert_eq!(engine.sink().last(), Some(RedrawMode::Full));

    for _ in 0..40 {
        engine.key_down(key(Key::ArrowUp));
    }
    assert_eq!(engine.selection().active_cell, CellIndex::origin());
    assert_eq!(engine.viewport().row_window_start, 0);
}

#[test]
fn test_tab_scrolls_columns() {
    let mut engine = engine(MemorySheet::new(99, 25));
    for _ in 0..20 {
        engine.key_down(key(Key::Tab));
        let active = engine.selection().active_cell;
        assert!(engine
            .viewport()
            .is_cell_visible(active, engine.sheet().layout(), engine.headers()));
    }
    assert_eq!(engine.selection().active_cell, CellIndex::new(0, 20));
    assert!(engine.viewport().col_window_start > 0);
}

#[test]
fn test_editor_owns_keys() {
    let mut engine = engine(MemorySheet::new(99, 25));
    engine.set_editor_active(true);
    assert!(!engine.key_down(key(Key::ArrowDown)));
    assert_eq!(engine.selection().active_cell, CellIndex::origin());

    engine.set_editor_active(false);
    assert!(engine.key_down(key(Key::ArrowDown)));
    assert_eq!(engine.selection().active_cell, CellIndex::new(1, 0));
}

#[test]
fn test_hidden_rows_are_skipped() {
    let sheet = MemorySheet::from_setup(&SheetSetup {
        max_row: 99,
        max_col: 25,
        hidden_rows: vec![1, 2],
        hidden_cols: vec![1],
        ..SheetSetup::default()
    })
    .unwrap();
    let mut engine = engine(sheet);

    engine.key_down(key(Key::ArrowDown));
    assert_eq!(engine.selection().active_cell, CellIndex::new(3, 0));
    engine.key_down(key(Key::ArrowRight));
    assert_eq!(engine.selection().active_cell, CellIndex::new(3, 2));
    engine.key_down(key(Key::ArrowUp));
    assert_eq!(engine.selection().active_cell, CellIndex::new(0, 2));
}

#[test]
fn test_merges_land_on_their_origin() {
    let sheet = MemorySheet::from_setup(&SheetSetup {
        max_row: 99,
        max_col: 25,
        merges: vec!["B2:C3".to_string()],
        ..SheetSetup::default()
    })
    .unwrap();
    let mut engine = engine(sheet);

    click(&mut engine, cell_center(0, 2), 0.0);
    engine.key_down(key(Key::ArrowDown));
    assert_eq!(engine.selection().active_cell, CellIndex::new(1, 1));

    // Leaving the merge steps past its whole extent
    engine.key_down(key(Key::ArrowDown));
    assert_eq!(engine.selection().active_cell, CellIndex::new(3, 1));

    click(&mut engine, cell_center(3, 2), 100.0);
    engine.key_down(key(Key::ArrowUp));
    assert_eq!(engine.selection().active_cell, CellIndex::new(1, 1));
}

#[test]
fn test_navigation_stays_in_used_range() {
    let mut sheet = MemorySheet::new(99, 25);
    sheet.set_used_range(rect(0, 0, 4, 4));
    let mut engine = engine(sheet);
    click(&mut engine, cell_center(4, 4), 0.0);
    assert!(!engine.key_down(key(Key::ArrowDown)));
    assert!(!engine.key_down(key(Key::ArrowRight)));
    assert!(engine.key_down(key(Key::ArrowLeft)));
    assert_eq!(engine.selection().active_cell, CellIndex::new(4, 3));
}

#[test]
fn test_keyboard_move_clears_areas() {
    let mut engine = engine(MemorySheet::new(99, 25));
    drag(&mut engine, cell_center(1, 1), &[cell_center(4, 4)], 0.0);
    click_with(&mut engine, cell_center(7, 7), Modifiers::CTRL, 100.0);
    assert_eq!(engine.selection().areas.len(), 2);

    engine.key_down(key(Key::ArrowRight));
    assert_eq!(engine.selection().active_cell, CellIndex::new(7, 8));
    assert!(engine.selection().areas.is_empty());
}
