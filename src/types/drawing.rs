use serde::{Deserialize, Serialize};

use super::CellIndex;

/// Identifier of a drawn object (shape, image or chart).
pub type ObjectId = u32;

/// Kind of drawn object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    #[default]
    Shape,
    Picture,
    Chart,
}

/// Object bounds in logical sheet units (origin at the top-left of cell A1).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectBounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ObjectBounds {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Axis-aligned containment test
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

/// Anchor of an object: the cell under its top-left corner plus the offset
/// inside that cell, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAnchor {
    pub cell: CellIndex,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// One of the eight resize control points of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Horizontal edge moved by a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalEdge {
    Left,
    Right,
}

/// Vertical edge moved by a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalEdge {
    Top,
    Bottom,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    pub fn horizontal_edge(self) -> Option<HorizontalEdge> {
        match self {
            Self::TopLeft | Self::Left | Self::BottomLeft => Some(HorizontalEdge::Left),
            Self::TopRight | Self::Right | Self::BottomRight => Some(HorizontalEdge::Right),
            Self::Top | Self::Bottom => None,
        }
    }

    pub fn vertical_edge(self) -> Option<VerticalEdge> {
        match self {
            Self::TopLeft | Self::Top | Self::TopRight => Some(VerticalEdge::Top),
            Self::BottomLeft | Self::Bottom | Self::BottomRight => Some(VerticalEdge::Bottom),
            Self::Left | Self::Right => None,
        }
    }

    /// Position of the handle on unrotated bounds
    pub fn point(self, bounds: &ObjectBounds) -> (f32, f32) {
        let (cx, cy) = bounds.center();
        let x = match self.horizontal_edge() {
            Some(HorizontalEdge::Left) => bounds.left(),
            Some(HorizontalEdge::Right) => bounds.right(),
            None => cx,
        };
        let y = match self.vertical_edge() {
            Some(VerticalEdge::Top) => bounds.top(),
            Some(VerticalEdge::Bottom) => bounds.bottom(),
            None => cy,
        };
        (x, y)
    }
}

/// A hot-zone on the active object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPoint {
    Resize(ResizeHandle),
    Rotate,
}

/// A drawn shape, picture or chart the user can move, resize and rotate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveObject {
    pub id: ObjectId,
    #[serde(default)]
    pub kind: ObjectKind,
    pub position: ObjectBounds,
    /// Clockwise rotation in degrees, `0..360`
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_in_view")]
    pub in_view: bool,
    #[serde(default)]
    pub anchor: ObjectAnchor,
}

fn default_in_view() -> bool {
    true
}

impl InteractiveObject {
    pub fn new(id: ObjectId, position: ObjectBounds) -> Self {
        Self {
            id,
            kind: ObjectKind::Shape,
            position,
            rotation: 0.0,
            in_view: true,
            anchor: ObjectAnchor::default(),
        }
    }

    /// Map a sheet point into the object's unrotated frame.
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        let (cx, cy) = self.position.center();
        rotate_about(x, y, cx, cy, -self.rotation)
    }

    /// Containment in the object's own (rotated) frame
    pub fn contains_local(&self, x: f32, y: f32) -> bool {
        let (lx, ly) = self.to_local(x, y);
        self.position.contains(lx, ly)
    }

    /// Find the control point under a sheet point.
    ///
    /// `size` is the side of each square hot-zone; the rotate handle sits
    /// `rotate_offset` above the top edge midpoint.
    pub fn control_point_at(
        &self,
        x: f32,
        y: f32,
        size: f32,
        rotate_offset: f32,
    ) -> Option<ControlPoint> {
        let (lx, ly) = self.to_local(x, y);
        let half = size / 2.0;
        let hit = |px: f32, py: f32| (lx - px).abs() <= half && (ly - py).abs() <= half;

        let (cx, _) = self.position.center();
        if hit(cx, self.position.top() - rotate_offset) {
            return Some(ControlPoint::Rotate);
        }
        ResizeHandle::ALL
            .iter()
            .copied()
            .find(|handle| {
                let (px, py) = handle.point(&self.position);
                hit(px, py)
            })
            .map(ControlPoint::Resize)
    }
}

/// Rotate `(x, y)` around `(cx, cy)` by `degrees`, clockwise in screen space.
pub fn rotate_about(x: f32, y: f32, cx: f32, cy: f32, degrees: f32) -> (f32, f32) {
    let (dx, dy) = rotate_vector(x - cx, y - cy, degrees);
    (cx + dx, cy + dy)
}

/// Rotate a vector by `degrees`, clockwise in screen space (y down).
pub fn rotate_vector(dx: f32, dy: f32, degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
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

    fn square() -> InteractiveObject {
        InteractiveObject::new(1, ObjectBounds::new(100.0, 100.0, 100.0, 50.0))
    }

    #[test]
    fn test_handle_points() {
        let obj = square();
        assert_eq!(
            ResizeHandle::TopLeft.point(&obj.position),
            (100.0, 100.0)
        );
        assert_eq!(ResizeHandle::Bottom.point(&obj.position), (150.0, 150.0));
        assert_eq!(ResizeHandle::Right.point(&obj.position), (200.0, 125.0));
    }

    #[test]
    fn test_control_point_unrotated() {
        let obj = square();
        assert_eq!(
            obj.control_point_at(201.0, 151.0, 8.0, 20.0),
            Some(ControlPoint::Resize(ResizeHandle::BottomRight))
        );
        assert_eq!(
            obj.control_point_at(150.0, 80.0, 8.0, 20.0),
            Some(ControlPoint::Rotate)
        );
        assert_eq!(obj.control_point_at(150.0, 125.0, 8.0, 20.0), None);
    }

    #[test]
    fn test_control_point_rotated_quarter_turn() {
        let mut obj = square();
        obj.rotation = 90.0;
        // The right-edge midpoint (200, 125) rotates clockwise around (150, 125)
        // to (150, 175) on screen.
        assert_eq!(
            obj.control_point_at(150.0, 175.0, 8.0, 20.0),
            Some(ControlPoint::Resize(ResizeHandle::Right))
        );
    }

    #[test]
    fn test_rotate_vector_clockwise() {
        let (x, y) = rotate_vector(1.0, 0.0, 90.0);
        assert!(x.abs() < 1e-5);
        assert!((y - 1.0).abs() < 1e-5);
    }
}
