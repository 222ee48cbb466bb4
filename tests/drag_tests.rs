//! Tests for drag sessions: header resize, fill handle, border move and
//! drawing move / resize / rotate
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use test_case::test_case;
use xlinteract::{
    Axis, CellIndex, DragMode, Drawings, Grid, InteractiveObject, MemorySheet, Modifiers,
    Mutation, ObjectBounds, Preview, ProtectionPolicy, RedrawMode, ResizeHandle,
};

// ============================================================================
// Header resize
// ============================================================================

#[test]
fn test_row_resize_clamps_to_minimum() {
    let mut engine = engine(MemorySheet::new(99, 25));
    let boundary = (HEADER_W / 2.0, row_bottom(5));

    engine.pointer_down(at(boundary, 0.0));
    assert_eq!(engine.drag().mode(), Some(DragMode::HeaderResize(Axis::Row)));

    let dragged = (boundary.0, boundary.1 - 50.0);
    engine.pointer_move(at(dragged, 30.0));
    assert_eq!(
        engine.preview(),
        Some(Preview::ResizeGuide {
            axis: Axis::Row,
            index: 5,
            size: 3.0
        })
    );
    engine.pointer_up(at(dragged, 60.0));

    assert_eq!(engine.sheet().layout().row_height(5), 3.0);
    assert_eq!(
        engine.sheet().history(),
        &[Mutation::RowHeight {
            row: 5,
            height: 3.0
        }]
    );
}

#[test]
fn test_column_resize_commits_width() {
    let mut engine = engine(MemorySheet::new(99, 25));
    let boundary = (col_right(2), HEADER_H / 2.0);
    drag(&mut engine, boundary, &[(boundary.0 + 50.0, boundary.1)], 0.0);

    assert_eq!(engine.sheet().layout().col_width(2), 114.0);
    // Columns to the right shift with it
    assert_eq!(engine.sheet().layout().col_left(3), 64.0 * 2.0 + 114.0);
}

#[test]
fn test_resize_from_left_edge_targets_previous_column() {
    let mut engine = engine(MemorySheet::new(99, 25));
    // Just inside column 3, within tolerance of its left edge
    let boundary = (col_right(2) + 3.0, HEADER_H / 2.0);
    drag(&mut engine, boundary, &[(boundary.0 + 20.0, boundary.1)], 0.0);
    assert_eq!(engine.sheet().layout().col_width(2), 84.0);
    assert_eq!(engine.sheet().layout().col_width(3), 64.0);
}

#[test]
fn test_resize_without_movement_commits_nothing() {
    let mut engine = engine(MemorySheet::new(99, 25));
    click(&mut engine, (HEADER_W / 2.0, row_bottom(2)), 0.0);
    assert!(engine.sheet().history().is_empty());
}

#[test]
fn test_preview_redraws_overlay_and_release_redraws_full() {
    let mut engine = engine(MemorySheet::new(99, 25));
    let boundary = (HEADER_W / 2.0, row_bottom(1));
    engine.pointer_down(at(boundary, 0.0));
    engine.sink_mut().clear();

    engine.pointer_move(at((boundary.0, boundary.1 + 10.0), 30.0));
    engine.pointer_move(at((boundary.0, boundary.1 + 20.0), 60.0));
    assert_eq!(engine.sink().overlay_count(), 2);
    assert_eq!(engine.sink().full_count(), 0);

    engine.pointer_up(at((boundary.0, boundary.1 + 20.0), 90.0));
    assert_eq!(engine.sink().last(), Some(RedrawMode::Full));
}

// ============================================================================
// Fill handle
// ============================================================================

#[test]
fn test_fill_right_is_pure_horizontal_extension() {
    let mut engine = engine(MemorySheet::new(99, 25));
    drag(&mut engine, cell_center(1, 1), &[cell_center(2, 2)], 0.0);
    let source = rect(1, 1, 2, 2);
    assert_eq!(engine.selection().areas, vec![source]);

    let handle = (col_right(2), row_bottom(2));
    engine.pointer_down(at(handle, 200.0));
    assert_eq!(engine.drag().mode(), Some(DragMode::FillHandle));

    // Same rows, three columns right
    let target = cell_center(2, 5);
    engine.pointer_move(at(target, 230.0));
    let Some(Preview::Padding { padding, .. }) = engine.preview() else {
        panic!("expected a padding preview");
    };
    assert_eq!(padding, rect(1, 3, 2, 5));
    engine.pointer_up(at(target, 260.0));

    let filled = engine.selection().areas[0];
    assert_eq!(filled.s.r, source.s.r);
    assert_eq!(filled.e.r, source.e.r);
    assert_eq!(filled.s.c, source.s.c);
    assert!(filled.e.c > source.e.c);
    assert_eq!(filled, rect(1, 1, 2, 5));
    assert_eq!(
        engine.sheet().history().last(),
        Some(&Mutation::ApplyBrush {
            src: source,
            target: filled
        })
    );
}

#[test_case(cell_center(6, 2), rect(1, 1, 6, 2) ; "down")]
#[test_case(cell_center(1, 0), rect(1, 0, 2, 2) ; "left")]
#[test_case(cell_center(9, 4), rect(1, 1, 9, 2) ; "down beats right")]
fn test_fill_direction(target: (f32, f32), expected: xlinteract::Rectangle) {
    let mut engine = engine(MemorySheet::new(99, 25));
    drag(&mut engine, cell_center(1, 1), &[cell_center(2, 2)], 0.0);
    drag(
        &mut engine,
        (col_right(2), row_bottom(2)),
        &[target],
        200.0,
    );
    assert_eq!(engine.selection().areas, vec![expected]);
}

#[test]
fn test_fill_back_inside_source_commits_nothing() {
    let mut engine = engine(MemorySheet::new(99, 25));
    drag(&mut engine, cell_center(1, 1), &[cell_center(2, 2)], 0.0);
    drag(
        &mut engine,
        (col_right(2), row_bottom(2)),
        &[cell_center(2, 5), cell_center(1, 1)],
        200.0,
    );
    assert_eq!(engine.selection().areas, vec![rect(1, 1, 2, 2)]);
    assert!(engine.sheet().history().is_empty());
}

#[test]
fn test_rejected_fill_keeps_selection() {
    let mut sheet = MemorySheet::new(99, 25);
    // Every cell is locked but selectable; filling locked cells is refused
    sheet.set_protection(ProtectionPolicy::protected(true, true));
    let mut engine = engine(sheet);
    drag(&mut engine, cell_center(1, 1), &[cell_center(2, 2)], 0.0);
    let before = engine.selection().clone();
    assert_eq!(before.areas, vec![rect(1, 1, 2, 2)]);

    engine.pointer_down(at((col_right(2), row_bottom(2)), 200.0));
    assert_eq!(engine.drag().mode(), Some(DragMode::FillHandle));
    engine.pointer_move(at(cell_center(2, 5), 230.0));
    assert!(matches!(engine.preview(), Some(Preview::Padding { .. })));
    engine.pointer_up(at(cell_center(2, 5), 260.0));

    assert_eq!(engine.selection(), &before);
    assert!(engine.sheet().history().is_empty());
    assert_eq!(engine.preview(), None);
    assert!(!engine.drag().is_active());
}

// ============================================================================
// Border move
// ============================================================================

#[test]
fn test_border_drag_moves_area() {
    let mut engine = engine(MemorySheet::new(99, 25));
    drag(&mut engine, cell_center(1, 1), &[cell_center(2, 2)], 0.0);

    // Just inside the left border of B2:C3, on row 2
    let grab = (HEADER_W + COL_W + 1.0, cell_center(2, 1).1);
    engine.pointer_down(at(grab, 200.0));
    assert_eq!(engine.drag().mode(), Some(DragMode::ActiveBorder));
    engine.pointer_move(at(cell_center(5, 4), 230.0));
    assert_eq!(engine.preview(), Some(Preview::Area(rect(4, 4, 5, 5))));
    engine.pointer_up(at(cell_center(5, 4), 260.0));

    assert_eq!(engine.selection().areas, vec![rect(4, 4, 5, 5)]);
    assert_eq!(engine.selection().active_cell, CellIndex::new(4, 4));
    assert_eq!(
        engine.sheet().history(),
        &[Mutation::MoveArea {
            src: rect(1, 1, 2, 2),
            dst: rect(4, 4, 5, 5)
        }]
    );
}

#[test]
fn test_border_move_rejected_on_protected_sheet() {
    let mut sheet = MemorySheet::new(99, 25);
    // Everything is locked but selectable
    sheet.set_protection(ProtectionPolicy::protected(true, true));
    let mut engine = engine(sheet);
    click(&mut engine, cell_center(1, 1), 0.0);

    let grab = (HEADER_W + COL_W + 1.0, cell_center(1, 1).1);
    drag(&mut engine, grab, &[cell_center(4, 3)], 100.0);

    assert!(engine.sheet().history().is_empty());
    assert_eq!(engine.selection().areas, vec![rect(1, 1, 1, 1)]);
    assert_eq!(engine.sink().last(), Some(RedrawMode::Full));
}

// ============================================================================
// Drawings
// ============================================================================

/// Object 1 at sheet (300, 200) 100x60, i.e. canvas (340, 220)
fn sheet_with_shape() -> MemorySheet {
    let mut sheet = MemorySheet::new(99, 25);
    sheet.add_object(InteractiveObject::new(
        1,
        ObjectBounds::new(300.0, 200.0, 100.0, 60.0),
    ));
    sheet
}

fn to_canvas((x, y): (f32, f32)) -> (f32, f32) {
    (x + HEADER_W, y + HEADER_H)
}

#[test]
fn test_drawing_move() {
    let mut engine = engine(sheet_with_shape());
    drag(&mut engine, (360.0, 240.0), &[(410.0, 260.0)], 0.0);

    let object = engine.sheet().object(1).unwrap();
    assert_eq!(object.position, ObjectBounds::new(350.0, 220.0, 100.0, 60.0));
    assert_eq!(engine.active_object(), Some(1));
    assert!(matches!(
        engine.sheet().history().last(),
        Some(Mutation::ObjectBounds { id: 1, .. })
    ));
}

#[test]
fn test_drawing_move_stops_at_sheet_origin() {
    let mut engine = engine(sheet_with_shape());
    drag(&mut engine, (360.0, 240.0), &[(5.0, 5.0)], 0.0);
    let position = engine.sheet().object(1).unwrap().position;
    assert_eq!((position.x, position.y), (0.0, 0.0));
}

#[test]
fn test_control_points_only_on_active_object() {
    let mut engine = engine(sheet_with_shape());
    let corner = to_canvas(ResizeHandle::BottomRight.point(&ObjectBounds::new(
        300.0, 200.0, 100.0, 60.0,
    )));
    // Not active yet: the corner is part of the body
    engine.pointer_down(at(corner, 0.0));
    assert_eq!(engine.drag().mode(), Some(DragMode::DrawingMove));
    engine.pointer_up(at(corner, 10.0));

    engine.pointer_down(at(corner, 100.0));
    assert_eq!(
        engine.drag().mode(),
        Some(DragMode::DrawingResize(ResizeHandle::BottomRight))
    );
    engine.pointer_up(at(corner, 110.0));
}

#[test]
fn test_resize_never_below_minimum() {
    let start = ObjectBounds::new(300.0, 200.0, 100.0, 60.0);
    let (cx, cy) = start.center();

    for handle in ResizeHandle::ALL {
        let mut engine = engine(sheet_with_shape());
        // Activate the object
        click(&mut engine, to_canvas((cx, cy)), 0.0);

        let (hx, hy) = handle.point(&start);
        // Far past the opposite edge
        let past = (cx + (cx - hx) * 10.0, cy + (cy - hy) * 10.0);
        drag(&mut engine, to_canvas((hx, hy)), &[to_canvas(past)], 100.0);

        let bounds = engine.sheet().object(1).unwrap().position;
        assert!(bounds.w >= 20.0, "{handle:?}: width {}", bounds.w);
        assert!(bounds.h >= 20.0, "{handle:?}: height {}", bounds.h);
    }
}

#[test]
fn test_resize_right_handle_keeps_left_edge() {
    let mut engine = engine(sheet_with_shape());
    click(&mut engine, (360.0, 240.0), 0.0);
    let handle = to_canvas((400.0, 230.0));
    drag(&mut engine, handle, &[(handle.0 + 40.0, handle.1 + 15.0)], 100.0);

    let bounds = engine.sheet().object(1).unwrap().position;
    assert_eq!(bounds, ObjectBounds::new(300.0, 200.0, 140.0, 60.0));
}

#[test]
fn test_snapped_rotation_is_multiple_of_step() {
    let mut engine = engine(sheet_with_shape());
    click(&mut engine, (360.0, 240.0), 0.0);

    // Rotate handle 20 units above the top edge midpoint
    let handle = to_canvas((350.0, 180.0));
    let center = to_canvas((350.0, 230.0));
    engine.pointer_down(at(handle, 100.0).with_modifiers(Modifiers::SHIFT));
    assert_eq!(engine.drag().mode(), Some(DragMode::DrawingRotate));

    let mut t = 100.0;
    for degrees in [7.0_f32, 23.0, 52.0, 97.0, 181.0, 244.0, 301.0, 359.0] {
        t += 30.0;
        let (sin, cos) = degrees.to_radians().sin_cos();
        let point = (center.0 + 80.0 * sin, center.1 - 80.0 * cos);
        engine.pointer_move(at(point, t).with_modifiers(Modifiers::SHIFT));
        let Some(Preview::Object { rotation, .. }) = engine.preview() else {
            panic!("expected an object preview");
        };
        assert!((rotation % 15.0).abs() < 1e-3, "{rotation} at {degrees}");
    }
    let (sin, cos) = 52.0_f32.to_radians().sin_cos();
    let last = (center.0 + 80.0 * sin, center.1 - 80.0 * cos);
    engine.pointer_up(at(last, t + 30.0).with_modifiers(Modifiers::SHIFT));

    let rotation = engine.sheet().object(1).unwrap().rotation;
    assert!((rotation % 15.0).abs() < 1e-3);
    assert_eq!(rotation, 45.0);
}

#[test]
fn test_free_rotation_follows_pointer() {
    let mut engine = engine(sheet_with_shape());
    click(&mut engine, (360.0, 240.0), 0.0);
    let handle = to_canvas((350.0, 180.0));
    let center = to_canvas((350.0, 230.0));
    // Straight to the right of the centre: a quarter turn
    drag(&mut engine, handle, &[(center.0 + 60.0, center.1)], 100.0);
    let rotation = engine.sheet().object(1).unwrap().rotation;
    assert!((rotation - 90.0).abs() < 1e-3);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[test]
fn test_pointer_down_runs_transients_once() {
    let mut engine = engine(MemorySheet::new(99, 25));
    let hits = Rc::new(Cell::new(0));
    {
        let hits = Rc::clone(&hits);
        engine.register_transient(move || hits.set(hits.get() + 1));
    }
    click(&mut engine, cell_center(3, 3), 0.0);
    click(&mut engine, cell_center(4, 4), 100.0);
    assert_eq!(hits.get(), 1);
    assert_eq!(engine.drag().pending_transients(), 0);
}

#[test]
fn test_stale_session_is_dropped_on_new_press() {
    let mut engine = engine(MemorySheet::new(99, 25));
    let boundary = (HEADER_W / 2.0, row_bottom(5));
    engine.pointer_down(at(boundary, 0.0));
    engine.pointer_move(at((boundary.0, boundary.1 + 30.0), 30.0));
    // No pointer-up: a new press replaces the session without committing
    engine.pointer_down(at(cell_center(8, 3), 60.0));
    assert_eq!(engine.drag().mode(), Some(DragMode::SelectExtend));
    engine.pointer_up(at(cell_center(8, 3), 90.0));

    assert!(engine.sheet().history().is_empty());
    assert_eq!(engine.selection().active_cell, CellIndex::new(8, 3));
}

#[test]
fn test_cancel_drag_discards_preview() {
    let mut engine = engine(MemorySheet::new(99, 25));
    let boundary = (col_right(1), HEADER_H / 2.0);
    engine.pointer_down(at(boundary, 0.0));
    engine.pointer_move(at((boundary.0 + 40.0, boundary.1), 30.0));
    engine.cancel_drag();
    assert!(engine.preview().is_none());
    assert!(!engine.drag().is_active());
    assert_eq!(engine.sheet().layout().col_width(1), 64.0);
}
