use serde::{Deserialize, Serialize};

/// Zero-based row/column index of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellIndex {
    pub r: u32,
    pub c: u32,
}

impl CellIndex {
    pub const fn new(r: u32, c: u32) -> Self {
        Self { r, c }
    }

    pub const fn origin() -> Self {
        Self { r: 0, c: 0 }
    }
}

/// Grid axis: `Row` for vertical geometry (heights), `Col` for horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Row,
    Col,
}

/// A rectangular block of cells.
///
/// Rectangles are created "raw" (corners as drawn) and normalized before they
/// are published; a normalized rectangle has `s.r <= e.r` and `s.c <= e.c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub s: CellIndex,
    pub e: CellIndex,
}

impl Rectangle {
    /// Create a raw rectangle; corners are kept as given.
    pub const fn new(s: CellIndex, e: CellIndex) -> Self {
        Self { s, e }
    }

    /// Create a normalized rectangle spanning two arbitrary corners.
    pub fn from_corners(a: CellIndex, b: CellIndex) -> Self {
        Self::new(a, b).normalized()
    }

    /// A 1x1 rectangle.
    pub const fn cell(cell: CellIndex) -> Self {
        Self { s: cell, e: cell }
    }

    /// Full rows `start..=end`, spanning columns `0..=max_col`.
    pub fn rows(start: u32, end: u32, max_col: u32) -> Self {
        Self::from_corners(CellIndex::new(start, 0), CellIndex::new(end, max_col))
    }

    /// Full columns `start..=end`, spanning rows `0..=max_row`.
    pub fn cols(start: u32, end: u32, max_row: u32) -> Self {
        Self::from_corners(CellIndex::new(0, start), CellIndex::new(max_row, end))
    }

    /// Get normalized bounds (top-left to bottom-right).
    pub fn normalized(&self) -> Self {
        Self {
            s: CellIndex::new(self.s.r.min(self.e.r), self.s.c.min(self.e.c)),
            e: CellIndex::new(self.s.r.max(self.e.r), self.s.c.max(self.e.c)),
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.s.r <= self.e.r && self.s.c <= self.e.c
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        let n = self.normalized();
        cell.r >= n.s.r && cell.r <= n.e.r && cell.c >= n.s.c && cell.c <= n.e.c
    }

    /// True when `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        let o = other.normalized();
        self.contains(o.s) && self.contains(o.e)
    }

    pub fn intersects(&self, other: &Rectangle) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.s.r <= b.e.r && b.s.r <= a.e.r && a.s.c <= b.e.c && b.s.c <= a.e.c
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rectangle) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        Self {
            s: CellIndex::new(a.s.r.min(b.s.r), a.s.c.min(b.s.c)),
            e: CellIndex::new(a.e.r.max(b.e.r), a.e.c.max(b.e.c)),
        }
    }

    /// Overlap of two rectangles, if any.
    pub fn intersection(&self, other: &Rectangle) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let a = self.normalized();
        let b = other.normalized();
        Some(Self {
            s: CellIndex::new(a.s.r.max(b.s.r), a.s.c.max(b.s.c)),
            e: CellIndex::new(a.e.r.min(b.e.r), a.e.c.min(b.e.c)),
        })
    }

    /// Cells of `self` outside `other`, as at most four disjoint strips:
    /// full-width bands above and below the overlap, then the pieces left
    /// and right of it.
    pub fn subtract(&self, other: &Rectangle) -> Vec<Rectangle> {
        let a = self.normalized();
        let Some(i) = a.intersection(other) else {
            return vec![a];
        };
        let mut strips = Vec::with_capacity(4);
        if a.s.r < i.s.r {
            strips.push(Self::new(a.s, CellIndex::new(i.s.r - 1, a.e.c)));
        }
        if i.e.r < a.e.r {
            strips.push(Self::new(CellIndex::new(i.e.r + 1, a.s.c), a.e));
        }
        if a.s.c < i.s.c {
            strips.push(Self::new(
                CellIndex::new(i.s.r, a.s.c),
                CellIndex::new(i.e.r, i.s.c - 1),
            ));
        }
        if i.e.c < a.e.c {
            strips.push(Self::new(
                CellIndex::new(i.s.r, i.e.c + 1),
                CellIndex::new(i.e.r, a.e.c),
            ));
        }
        strips
    }

    pub fn row_count(&self) -> u32 {
        let n = self.normalized();
        n.e.r - n.s.r + 1
    }

    pub fn col_count(&self) -> u32 {
        let n = self.normalized();
        n.e.c - n.s.c + 1
    }

    /// Translate by a signed cell delta, keeping the size and clamping so the
    /// result stays within `0..=max_row` / `0..=max_col`.
    pub fn translate_clamped(&self, d_rows: i64, d_cols: i64, max_row: u32, max_col: u32) -> Self {
        let n = self.normalized();
        let (r0, r1) = shift_span(n.s.r, n.e.r, d_rows, max_row);
        let (c0, c1) = shift_span(n.s.c, n.e.c, d_cols, max_col);
        Self {
            s: CellIndex::new(r0, c0),
            e: CellIndex::new(r1, c1),
        }
    }

    /// Iterate every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> {
        let n = self.normalized();
        (n.s.r..=n.e.r).flat_map(move |r| (n.s.c..=n.e.c).map(move |c| CellIndex::new(r, c)))
    }
}

fn shift_span(start: u32, end: u32, delta: i64, max: u32) -> (u32, u32) {
    let len = i64::from(end) - i64::from(start);
    let upper = (i64::from(max) - len).max(0);
    let new_start = (i64::from(start) + delta).clamp(0, upper);
    let new_end = (new_start + len).min(i64::from(max));
    (
        u32::try_from(new_start).unwrap_or(start),
        u32::try_from(new_end).unwrap_or(end),
    )
}
