//! Single-finger touch scrolling.
//!
//! A touch only becomes a gesture once it has moved past the threshold.
//! From then on the host should suppress native scrolling and apply the
//! returned translation as a cheap visual preview; the real viewport
//! re-index runs at most once per throttle interval and resets that
//! translation.

use super::throttle::Throttle;
use crate::config::EngineConfig;
use crate::input::TouchPoint;
use crate::layout::{SheetLayout, ViewportWindow};

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchGesture {
    start: TouchPoint,
    /// Window indices when the finger went down
    start_window: (u32, u32),
    /// Finger position at the last real scroll
    scrolled_at: (f32, f32),
    moved: bool,
}

/// What the host should do after a touch event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchResponse {
    /// Call `preventDefault` on the native event
    pub prevent_default: bool,
    /// Visual translation preview, `(0, 0)` after a real scroll
    pub translation: (f32, f32),
    /// The viewport window moved
    pub scrolled: bool,
    /// A touch that ended without moving: treat as a tap at this point
    pub tap: Option<(f32, f32)>,
}

#[derive(Debug, Clone)]
pub struct TouchGestureAdapter {
    threshold: f32,
    rows_per_step: u32,
    cols_per_step: u32,
    scroll_throttle: Throttle,
    gesture: Option<TouchGesture>,
}

impl TouchGestureAdapter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            threshold: config.touch_threshold,
            rows_per_step: config.touch_rows_per_step,
            cols_per_step: config.touch_cols_per_step,
            scroll_throttle: Throttle::new(config.touch_scroll_interval_ms),
            gesture: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn has_moved(&self) -> bool {
        self.gesture.is_some_and(|g| g.moved)
    }

    /// Record the start of a touch; nothing is recognised yet.
    pub fn start(&mut self, point: TouchPoint, viewport: &ViewportWindow) {
        self.scroll_throttle.reset();
        self.gesture = Some(TouchGesture {
            start: point,
            start_window: (viewport.row_window_start, viewport.col_window_start),
            scrolled_at: (point.x, point.y),
            moved: false,
        });
    }

    pub fn on_move(
        &mut self,
        point: TouchPoint,
        viewport: &mut ViewportWindow,
        layout: &SheetLayout,
    ) -> TouchResponse {
        let Some(mut gesture) = self.gesture else {
            return TouchResponse::default();
        };
        let dx = point.x - gesture.start.x;
        let dy = point.y - gesture.start.y;
        if !gesture.moved && (dx.abs() > self.threshold || dy.abs() > self.threshold) {
            gesture.moved = true;
        }
        if !gesture.moved {
            self.gesture = Some(gesture);
            return TouchResponse::default();
        }

        let mut response = TouchResponse {
            prevent_default: true,
            ..TouchResponse::default()
        };
        if self.scroll_throttle.ready(point.time_ms) {
            response.scrolled = self.scroll(&gesture, point, viewport, layout);
            gesture.scrolled_at = (point.x, point.y);
        } else {
            response.translation = (
                point.x - gesture.scrolled_at.0,
                point.y - gesture.scrolled_at.1,
            );
        }
        self.gesture = Some(gesture);
        response
    }

    /// Finish the touch: one last real scroll if it moved, otherwise a tap.
    pub fn end(
        &mut self,
        point: TouchPoint,
        viewport: &mut ViewportWindow,
        layout: &SheetLayout,
    ) -> TouchResponse {
        let Some(gesture) = self.gesture.take() else {
            return TouchResponse::default();
        };
        if gesture.moved {
            TouchResponse {
                prevent_default: true,
                scrolled: self.scroll(&gesture, point, viewport, layout),
                ..TouchResponse::default()
            }
        } else {
            TouchResponse {
                tap: Some((gesture.start.x, gesture.start.y)),
                ..TouchResponse::default()
            }
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
    }

    /// Re-index the window along the dominant axis, relative to where it was
    /// when the touch began. Dragging the finger up scrolls down.
    fn scroll(
        &self,
        gesture: &TouchGesture,
        point: TouchPoint,
        viewport: &mut ViewportWindow,
        layout: &SheetLayout,
    ) -> bool {
        let dx = gesture.start.x - point.x;
        let dy = gesture.start.y - point.y;
        let (start_row, start_col) = gesture.start_window;
        let (row, col) = if dy.abs() >= dx.abs() {
            let rows = self.steps(dy) * i64::from(self.rows_per_step);
            (offset(start_row, rows), viewport.col_window_start)
        } else {
            let cols = self.steps(dx) * i64::from(self.cols_per_step);
            (viewport.row_window_start, offset(start_col, cols))
        };
        viewport.set_window_start(row, col, layout)
    }

    /// Signed number of whole thresholds crossed
    #[allow(clippy::cast_possible_truncation)]
    fn steps(&self, delta: f32) -> i64 {
        (delta / self.threshold).trunc() as i64
    }
}

fn offset(index: u32, delta: i64) -> u32 {
    let moved = (i64::from(index) + delta).clamp(0, i64::from(u32::MAX));
    u32::try_from(moved).unwrap_or(index)
}
