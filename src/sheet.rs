//! In-memory sheet collaborator.
//!
//! `MemorySheet` implements [`Grid`] and [`Drawings`] over a [`SheetLayout`],
//! a set of unlocked cells and a drawing list. It does not hold cell values;
//! structural mutations are validated and recorded so a host (or a test) can
//! observe what the engine committed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell_ref::{parse_range, range_label};
use crate::error::{InteractError, Result};
use crate::layout::SheetLayout;
use crate::ports::{Drawings, Grid};
use crate::protection::{BlockReason, ProtectionPolicy};
use crate::types::{
    CellIndex, InteractiveObject, ObjectAnchor, ObjectBounds, ObjectId, Rectangle,
};

/// Declarative sheet description, as read from JSON.
///
/// Ranges use A1 notation (`"B2:C4"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetSetup {
    pub max_row: u32,
    pub max_col: u32,
    pub col_widths: HashMap<u32, f32>,
    pub row_heights: HashMap<u32, f32>,
    pub hidden_rows: Vec<u32>,
    pub hidden_cols: Vec<u32>,
    pub merges: Vec<String>,
    pub frozen_rows: u32,
    pub frozen_cols: u32,
    pub protection: ProtectionPolicy,
    /// Cells are locked unless listed here
    pub unlocked: Vec<String>,
    pub used_range: Option<String>,
    pub objects: Vec<InteractiveObject>,
}

/// A committed structural mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    RowHeight { row: u32, height: f32 },
    ColWidth { col: u32, width: f32 },
    MoveArea { src: Rectangle, dst: Rectangle },
    ApplyBrush { src: Rectangle, target: Rectangle },
    ObjectBounds { id: ObjectId, bounds: ObjectBounds },
    ObjectRotation { id: ObjectId, degrees: f32 },
}

#[derive(Debug, Clone)]
pub struct MemorySheet {
    layout: SheetLayout,
    protection: ProtectionPolicy,
    unlocked: HashSet<CellIndex>,
    used_range: Rectangle,
    objects: Vec<InteractiveObject>,
    history: Vec<Mutation>,
}

impl MemorySheet {
    /// A sheet of default-sized cells, `0..=max_row` × `0..=max_col`.
    pub fn new(max_row: u32, max_col: u32) -> Self {
        Self::with_layout(SheetLayout::with_defaults(max_row, max_col))
    }

    pub fn with_layout(layout: SheetLayout) -> Self {
        let used_range = layout.bounds();
        Self {
            layout,
            protection: ProtectionPolicy::default(),
            unlocked: HashSet::new(),
            used_range,
            objects: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Build a sheet from its JSON description.
    pub fn from_setup(setup: &SheetSetup) -> Result<Self> {
        let merges = setup
            .merges
            .iter()
            .map(|r| parse_a1(r))
            .collect::<Result<Vec<_>>>()?;
        let layout = SheetLayout::new(
            setup.max_row,
            setup.max_col,
            &setup.col_widths,
            &setup.row_heights,
            &setup.hidden_cols.iter().copied().collect(),
            &setup.hidden_rows.iter().copied().collect(),
            &merges,
            setup.frozen_rows,
            setup.frozen_cols,
        );
        let mut sheet = Self::with_layout(layout);
        sheet.protection = setup.protection;
        for range in &setup.unlocked {
            let rect = parse_a1(range)?;
            for cell in rect.cells() {
                sheet.unlocked.insert(cell);
            }
        }
        if let Some(range) = &setup.used_range {
            sheet.used_range = parse_a1(range)?;
        }
        for object in &setup.objects {
            sheet.add_object(object.clone());
        }
        Ok(sheet)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let setup: SheetSetup = serde_json::from_str(json)?;
        Self::from_setup(&setup)
    }

    pub fn layout_mut(&mut self) -> &mut SheetLayout {
        &mut self.layout
    }

    pub fn set_protection(&mut self, policy: ProtectionPolicy) {
        self.protection = policy;
    }

    pub fn set_locked(&mut self, cell: CellIndex, locked: bool) {
        if locked {
            self.unlocked.remove(&cell);
        } else {
            self.unlocked.insert(cell);
        }
    }

    pub fn set_used_range(&mut self, range: Rectangle) {
        self.used_range = range.normalized();
    }

    /// Add an object on top of the others; its anchor is derived from its
    /// position.
    pub fn add_object(&mut self, mut object: InteractiveObject) {
        object.anchor = self
            .layout
            .anchor_for(object.position.x, object.position.y);
        self.objects.push(object);
    }

    /// Every committed mutation, oldest first
    pub fn history(&self) -> &[Mutation] {
        &self.history
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut InteractiveObject> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| InteractError::OutOfRange(format!("no drawing with id {id}")))
    }

    fn check_in_sheet(&self, rect: &Rectangle) -> Result<()> {
        if self.layout.bounds().contains_rect(rect) {
            Ok(())
        } else {
            Err(InteractError::OutOfRange(range_label(*rect)))
        }
    }

    fn check_unlocked(&self, rect: &Rectangle) -> Result<()> {
        if !self.protection.sheet {
            return Ok(());
        }
        let locked_only = ProtectionPolicy::protected(false, true);
        match self.first_blocked(&locked_only, rect) {
            Some(reason) => Err(InteractError::Rejected(reason.message())),
            None => Ok(()),
        }
    }

    /// First cell of `rect`, row-major, that `policy` forbids selecting.
    ///
    /// Answered from the unlocked set, so the cost follows the number of
    /// unlocked cells rather than the area of `rect`.
    fn first_blocked(&self, policy: &ProtectionPolicy, rect: &Rectangle) -> Option<BlockReason> {
        if policy.is_unrestricted() {
            return None;
        }
        let rect = rect.normalized();
        if !policy.select_locked_cells && !policy.select_unlocked_cells {
            let cell = rect.s;
            return Some(if self.is_cell_locked(cell) {
                BlockReason::LockedCell(cell)
            } else {
                BlockReason::UnlockedCell(cell)
            });
        }

        let mut inside: Vec<CellIndex> = self
            .unlocked
            .iter()
            .copied()
            .filter(|cell| rect.contains(*cell))
            .collect();
        inside.sort_unstable_by_key(|cell| (cell.r, cell.c));

        if policy.select_locked_cells {
            return inside.first().copied().map(BlockReason::UnlockedCell);
        }
        // Locked cells are forbidden: skip the leading run of unlocked ones
        let mut next = Some(rect.s);
        for cell in inside {
            match next {
                Some(expected) if expected == cell => next = step_row_major(&rect, expected),
                _ => break,
            }
        }
        next.map(BlockReason::LockedCell)
    }

    /// Merges that cut across `rect` without lying inside it
    fn splits_merge(&self, rect: &Rectangle) -> bool {
        self.layout
            .merge_ranges
            .iter()
            .any(|m| rect.intersects(m) && !rect.contains_rect(m))
    }
}

/// The cell after `cell` in row-major order within `rect`.
fn step_row_major(rect: &Rectangle, cell: CellIndex) -> Option<CellIndex> {
    if cell.c < rect.e.c {
        Some(CellIndex::new(cell.r, cell.c + 1))
    } else if cell.r < rect.e.r {
        Some(CellIndex::new(cell.r + 1, rect.s.c))
    } else {
        None
    }
}

impl Grid for MemorySheet {
    fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    fn protection(&self) -> ProtectionPolicy {
        self.protection
    }

    fn is_cell_locked(&self, cell: CellIndex) -> bool {
        !self.unlocked.contains(&cell)
    }

    fn selection_block(&self, rect: &Rectangle) -> Option<BlockReason> {
        self.first_blocked(&self.protection, rect)
    }

    fn used_range(&self) -> Rectangle {
        self.used_range
    }

    fn set_row_height(&mut self, row: u32, height: f32) -> Result<()> {
        if !self.layout.set_row_height(row, height) {
            return Err(InteractError::OutOfRange(format!("row {row}")));
        }
        self.history.push(Mutation::RowHeight { row, height });
        Ok(())
    }

    fn set_col_width(&mut self, col: u32, width: f32) -> Result<()> {
        if !self.layout.set_col_width(col, width) {
            return Err(InteractError::OutOfRange(format!("column {col}")));
        }
        self.history.push(Mutation::ColWidth { col, width });
        Ok(())
    }

    fn move_area(&mut self, src: Rectangle, dst: Rectangle) -> Result<()> {
        let src = src.normalized();
        let dst = dst.normalized();
        self.check_in_sheet(&dst)?;
        if src.row_count() != dst.row_count() || src.col_count() != dst.col_count() {
            return Err(InteractError::Rejected(format!(
                "{} and {} differ in size",
                range_label(src),
                range_label(dst)
            )));
        }
        if self.splits_merge(&dst) {
            return Err(InteractError::Rejected(format!(
                "cannot move onto part of a merged cell at {}",
                range_label(dst)
            )));
        }
        self.check_unlocked(&src)?;
        self.check_unlocked(&dst)?;
        debug!(src = %range_label(src), dst = %range_label(dst), "area moved");
        self.history.push(Mutation::MoveArea { src, dst });
        Ok(())
    }

    fn apply_brush(&mut self, src: Rectangle, target: Rectangle) -> Result<()> {
        let src = src.normalized();
        let target = target.normalized();
        self.check_in_sheet(&target)?;
        if !target.contains_rect(&src) {
            return Err(InteractError::Rejected(format!(
                "fill target {} does not contain {}",
                range_label(target),
                range_label(src)
            )));
        }
        self.check_unlocked(&target)?;
        debug!(src = %range_label(src), target = %range_label(target), "area filled");
        self.history.push(Mutation::ApplyBrush { src, target });
        Ok(())
    }
}

impl Drawings for MemorySheet {
    fn objects(&self) -> &[InteractiveObject] {
        &self.objects
    }

    fn set_bounds(
        &mut self,
        id: ObjectId,
        bounds: ObjectBounds,
        anchor: ObjectAnchor,
    ) -> Result<()> {
        let object = self.object_mut(id)?;
        object.position = bounds;
        object.anchor = anchor;
        self.history.push(Mutation::ObjectBounds { id, bounds });
        Ok(())
    }

    fn set_rotation(&mut self, id: ObjectId, degrees: f32) -> Result<()> {
        let object = self.object_mut(id)?;
        object.rotation = degrees.rem_euclid(360.0);
        let degrees = object.rotation;
        self.history.push(Mutation::ObjectRotation { id, degrees });
        Ok(())
    }
}

fn parse_a1(range: &str) -> Result<Rectangle> {
    parse_range(range).ok_or_else(|| InteractError::Other(format!("invalid range: {range}")))
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
    use crate::protection::selection_block_reason;

    fn rect(r0: u32, c0: u32, r1: u32, c1: u32) -> Rectangle {
        Rectangle::from_corners(CellIndex::new(r0, c0), CellIndex::new(r1, c1))
    }

    #[test]
    fn test_from_json_setup() {
        let sheet = MemorySheet::from_json(
            r#"{
                "maxRow": 20, "maxCol": 5,
                "merges": ["B2:C3"],
                "hiddenRows": [4],
                "frozenRows": 1,
                "protection": {"sheet": true, "selectLockedCells": false},
                "unlocked": ["A1:A3"],
                "objects": [{"id": 7, "position": {"x": 70, "y": 45, "w": 50, "h": 30}}]
            }"#,
        )
        .unwrap();
        let layout = sheet.layout();
        assert_eq!(layout.max_row, 20);
        assert!(layout.is_row_hidden(4));
        assert_eq!(layout.frozen_rows, 1);
        assert_eq!(layout.merge_at(CellIndex::new(2, 2)), Some(rect(1, 1, 2, 2)));
        assert!(!sheet.is_cell_locked(CellIndex::new(2, 0)));
        assert!(sheet.is_cell_locked(CellIndex::new(3, 0)));
        assert!(sheet.protection().select_unlocked_cells);
        let object = sheet.object(7).unwrap();
        assert_eq!(object.anchor.cell, CellIndex::new(2, 1));
    }

    #[test]
    fn test_invalid_range_is_an_error() {
        let err = MemorySheet::from_json(r#"{"maxRow": 5, "maxCol": 5, "merges": ["nope"]}"#)
            .unwrap_err();
        assert!(matches!(err, InteractError::Other(_)));
    }

    #[test]
    fn test_move_area_rejects_split_merge() {
        let mut sheet = MemorySheet::new(20, 10);
        sheet.layout_mut().set_merges(&[rect(5, 5, 6, 6)]);
        assert!(sheet.move_area(rect(0, 0, 1, 1), rect(4, 4, 5, 5)).is_err());
        assert!(sheet.move_area(rect(0, 0, 1, 1), rect(5, 5, 6, 6)).is_ok());
        assert_eq!(sheet.history().len(), 1);
    }

    #[test]
    fn test_move_area_rejects_locked_destination() {
        let mut sheet = MemorySheet::new(20, 10);
        sheet.set_protection(ProtectionPolicy::protected(true, true));
        for cell in rect(0, 0, 1, 1).cells() {
            sheet.set_locked(cell, false);
        }
        let err = sheet.move_area(rect(0, 0, 1, 1), rect(3, 3, 4, 4)).unwrap_err();
        assert!(matches!(err, InteractError::Rejected(_)));
        assert!(sheet.history().is_empty());
    }

    #[test]
    fn test_apply_brush_requires_containment() {
        let mut sheet = MemorySheet::new(20, 10);
        assert!(sheet.apply_brush(rect(0, 0, 1, 1), rect(2, 0, 4, 1)).is_err());
        assert!(sheet.apply_brush(rect(0, 0, 1, 1), rect(0, 0, 4, 1)).is_ok());
    }

    #[test]
    fn test_selection_block_matches_cell_scan() {
        let mut sheet = MemorySheet::new(20, 10);
        let extra = [CellIndex::new(2, 0), CellIndex::new(4, 5)];
        for cell in rect(0, 0, 1, 3).cells().chain(extra) {
            sheet.set_locked(cell, false);
        }
        let policies = [
            ProtectionPolicy::default(),
            ProtectionPolicy::protected(true, true),
            ProtectionPolicy::protected(false, true),
            ProtectionPolicy::protected(true, false),
            ProtectionPolicy::protected(false, false),
        ];
        let rects = [
            rect(0, 0, 5, 5),
            rect(0, 0, 1, 3),
            rect(0, 0, 2, 0),
            rect(1, 2, 2, 4),
            rect(3, 3, 9, 9),
            rect(4, 5, 4, 5),
            rect(0, 0, 20, 10),
        ];
        for policy in policies {
            sheet.set_protection(policy);
            for r in rects {
                let scanned = selection_block_reason(&policy, &r, |c| sheet.is_cell_locked(c));
                assert_eq!(sheet.selection_block(&r), scanned, "{policy:?} {r:?}");
            }
        }
    }

    #[test]
    fn test_selection_block_on_full_size_sheet() {
        let mut sheet = MemorySheet::new(1_048_575, 16_383);
        sheet.set_protection(ProtectionPolicy::protected(true, false));
        let bounds = sheet.layout().bounds();
        assert_eq!(sheet.selection_block(&bounds), None);

        let unlocked = CellIndex::new(500_000, 7);
        sheet.set_locked(unlocked, false);
        assert_eq!(
            sheet.selection_block(&bounds),
            Some(BlockReason::UnlockedCell(unlocked))
        );

        sheet.set_protection(ProtectionPolicy::protected(false, true));
        assert_eq!(
            sheet.selection_block(&bounds),
            Some(BlockReason::LockedCell(CellIndex::origin()))
        );
    }

    #[test]
    fn test_row_height_updates_layout() {
        let mut sheet = MemorySheet::new(20, 10);
        sheet.set_row_height(3, 45.0).unwrap();
        assert_eq!(sheet.layout().row_height(3), 45.0);
        assert!(sheet.set_row_height(99, 10.0).is_err());
    }
}
