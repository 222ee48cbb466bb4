use tracing::debug;

use crate::input::PointerEvent;
use crate::interaction::session::{Commit, DragContext, DragHandler, DragMode, Preview};
use crate::ports::RedrawMode;
use crate::types::{Axis, CellIndex, Rectangle};

/// Drag the fill handle to autofill in one direction
#[derive(Debug, Clone)]
pub struct FillHandle {
    source: Rectangle,
    /// Axis on which the pointer first left the source
    first_exit: Option<Axis>,
    padding: Option<Rectangle>,
}

impl FillHandle {
    pub fn new(source: Rectangle) -> Self {
        Self {
            source: source.normalized(),
            first_exit: None,
            padding: None,
        }
    }

    fn track(&mut self, cell: CellIndex) {
        let (rows, cols) = distances(&self.source, cell);
        if rows == 0 && cols == 0 {
            // Back inside: the next exit decides ties afresh
            self.first_exit = None;
        } else if self.first_exit.is_none() {
            self.first_exit = Some(if rows > cols { Axis::Row } else { Axis::Col });
        }
        self.padding = padding_area(&self.source, cell, self.first_exit.unwrap_or(Axis::Col));
    }
}

/// Cells outside `rect` towards `cell`, per axis.
fn distances(rect: &Rectangle, cell: CellIndex) -> (u32, u32) {
    let rows = if cell.r > rect.e.r {
        cell.r - rect.e.r
    } else {
        rect.s.r.saturating_sub(cell.r)
    };
    let cols = if cell.c > rect.e.c {
        cell.c - rect.e.c
    } else {
        rect.s.c.saturating_sub(cell.c)
    };
    (rows, cols)
}

/// The area a fill drag to `cell` adds to `source`.
///
/// The extension runs along one axis only: the one on which `cell` lies
/// further outside `source`, or `tie_axis` when both distances match.
/// Returns `None` while `cell` is inside `source`.
pub fn padding_area(source: &Rectangle, cell: CellIndex, tie_axis: Axis) -> Option<Rectangle> {
    let s = source.normalized();
    let (rows, cols) = distances(&s, cell);
    if rows == 0 && cols == 0 {
        return None;
    }
    let axis = match rows.cmp(&cols) {
        std::cmp::Ordering::Greater => Axis::Row,
        std::cmp::Ordering::Less => Axis::Col,
        std::cmp::Ordering::Equal => tie_axis,
    };
    let rect = match axis {
        Axis::Row if cell.r > s.e.r => Rectangle::new(
            CellIndex::new(s.e.r + 1, s.s.c),
            CellIndex::new(cell.r, s.e.c),
        ),
        Axis::Row => Rectangle::new(
            CellIndex::new(cell.r, s.s.c),
            CellIndex::new(s.s.r - 1, s.e.c),
        ),
        Axis::Col if cell.c > s.e.c => Rectangle::new(
            CellIndex::new(s.s.r, s.e.c + 1),
            CellIndex::new(s.e.r, cell.c),
        ),
        Axis::Col => Rectangle::new(
            CellIndex::new(s.s.r, cell.c),
            CellIndex::new(s.e.r, s.s.c - 1),
        ),
    };
    Some(rect)
}

impl DragHandler for FillHandle {
    fn mode(&self) -> DragMode {
        DragMode::FillHandle
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Option<RedrawMode> {
        let before = self.padding;
        self.track(ctx.cell_at(pointer.x, pointer.y));
        (before != self.padding).then_some(RedrawMode::Overlay)
    }

    fn on_end(mut self: Box<Self>, ctx: &mut DragContext<'_>, pointer: &PointerEvent) -> Commit {
        self.track(ctx.cell_at(pointer.x, pointer.y));
        let Some(padding) = self.padding else {
            return Commit::Discarded;
        };
        let target = self.source.union(&padding);
        if let Err(err) = ctx.sheet.apply_brush(self.source, target) {
            debug!(%err, "fill rejected");
            return Commit::Discarded;
        }
        ctx.selection.publish_current(target);
        Commit::Applied
    }

    fn preview(&self) -> Option<Preview> {
        self.padding.map(|padding| Preview::Padding {
            source: self.source,
            padding,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn rect(r0: u32, c0: u32, r1: u32, c1: u32) -> Rectangle {
        Rectangle::from_corners(CellIndex::new(r0, c0), CellIndex::new(r1, c1))
    }

    #[test]
    fn test_padding_follows_farther_axis() {
        let source = rect(2, 2, 4, 4);
        assert_eq!(
            padding_area(&source, CellIndex::new(5, 9), Axis::Row),
            Some(rect(2, 5, 4, 9))
        );
        assert_eq!(
            padding_area(&source, CellIndex::new(0, 3), Axis::Col),
            Some(rect(0, 2, 1, 4))
        );
        assert_eq!(padding_area(&source, CellIndex::new(3, 3), Axis::Row), None);
    }

    #[test]
    fn test_tie_goes_to_first_exit() {
        let mut fill = FillHandle::new(rect(2, 2, 4, 4));
        // Leave below first, then drift diagonally to an equal distance
        fill.track(CellIndex::new(5, 3));
        fill.track(CellIndex::new(6, 6));
        assert_eq!(fill.padding, Some(rect(5, 2, 6, 4)));

        let mut fill = FillHandle::new(rect(2, 2, 4, 4));
        fill.track(CellIndex::new(3, 5));
        fill.track(CellIndex::new(6, 6));
        assert_eq!(fill.padding, Some(rect(2, 5, 4, 6)));
    }

    #[test]
    fn test_reentering_source_forgets_first_exit() {
        let mut fill = FillHandle::new(rect(2, 2, 4, 4));
        fill.track(CellIndex::new(5, 3));
        fill.track(CellIndex::new(3, 3));
        assert_eq!(fill.padding, None);

        // Leaves to the right this time, then ties
        fill.track(CellIndex::new(3, 5));
        fill.track(CellIndex::new(6, 6));
        assert_eq!(fill.padding, Some(rect(2, 5, 4, 6)));
    }
}
