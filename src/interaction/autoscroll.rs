//! Edge-triggered autoscroll during a selection drag.
//!
//! While the pointer sits inside the edge band of the data area, a
//! recurring timer advances the viewport one row or column per period.
//! Only one axis scrolls per tick; which one wins when both edges trigger
//! is set by [`AxisPriority`].

use crate::config::{AxisPriority, EngineConfig};
use crate::layout::ViewportWindow;
use crate::types::HeaderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
    Up,
    Down,
}

impl ScrollDirection {
    /// `(delta_rows, delta_cols)` for one step
    pub fn delta(self) -> (i64, i64) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoScrollEdgeDetector {
    edge: f32,
    interval_ms: f64,
    priority: AxisPriority,
    direction: Option<ScrollDirection>,
    next_due_ms: Option<f64>,
}

impl AutoScrollEdgeDetector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            edge: config.auto_scroll_edge,
            interval_ms: config.auto_scroll_interval_ms,
            priority: config.auto_scroll_priority,
            direction: None,
            next_due_ms: None,
        }
    }

    /// Which edge, if any, a canvas point triggers.
    pub fn detect(
        &self,
        x: f32,
        y: f32,
        viewport: &ViewportWindow,
        headers: &HeaderConfig,
    ) -> Option<ScrollDirection> {
        let horizontal = if x < headers.width() + self.edge {
            Some(ScrollDirection::Left)
        } else if x > viewport.width - self.edge {
            Some(ScrollDirection::Right)
        } else {
            None
        };
        let vertical = if y < headers.height() + self.edge {
            Some(ScrollDirection::Up)
        } else if y > viewport.height - self.edge {
            Some(ScrollDirection::Down)
        } else {
            None
        };
        match self.priority {
            AxisPriority::Horizontal => horizontal.or(vertical),
            AxisPriority::Vertical => vertical.or(horizontal),
        }
    }

    /// Re-evaluate on pointer move: start the timer when an edge triggers,
    /// restart it when the direction changes, clear it otherwise.
    pub fn update(
        &mut self,
        x: f32,
        y: f32,
        viewport: &ViewportWindow,
        headers: &HeaderConfig,
        now_ms: f64,
    ) -> Option<ScrollDirection> {
        let direction = self.detect(x, y, viewport, headers);
        match direction {
            Some(dir) if self.direction != Some(dir) => {
                self.direction = Some(dir);
                self.next_due_ms = Some(now_ms + self.interval_ms);
            }
            Some(_) => {}
            None => self.clear(),
        }
        direction
    }

    /// Timer check; returns the direction to step when a period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<ScrollDirection> {
        let due = self.next_due_ms?;
        if now_ms < due {
            return None;
        }
        self.next_due_ms = Some(due + self.interval_ms);
        self.direction
    }

    pub fn clear(&mut self) {
        self.direction = None;
        self.next_due_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::layout::SheetLayout;

    fn setup(priority: AxisPriority) -> (AutoScrollEdgeDetector, ViewportWindow, HeaderConfig) {
        let config = EngineConfig {
            auto_scroll_priority: priority,
            ..EngineConfig::default()
        };
        let layout = SheetLayout::with_defaults(999, 99);
        (
            AutoScrollEdgeDetector::new(&config),
            ViewportWindow::for_layout(&layout, 800.0, 600.0),
            HeaderConfig::default(),
        )
    }

    #[test]
    fn test_detect_edges() {
        let (det, vp, headers) = setup(AxisPriority::Horizontal);
        assert_eq!(det.detect(400.0, 300.0, &vp, &headers), None);
        assert_eq!(det.detect(790.0, 300.0, &vp, &headers), Some(ScrollDirection::Right));
        assert_eq!(det.detect(50.0, 300.0, &vp, &headers), Some(ScrollDirection::Left));
        assert_eq!(det.detect(400.0, 590.0, &vp, &headers), Some(ScrollDirection::Down));
        assert_eq!(det.detect(400.0, 30.0, &vp, &headers), Some(ScrollDirection::Up));
        // Both edges: horizontal wins by default
        assert_eq!(det.detect(790.0, 590.0, &vp, &headers), Some(ScrollDirection::Right));
    }

    #[test]
    fn test_vertical_priority() {
        let (det, vp, headers) = setup(AxisPriority::Vertical);
        assert_eq!(det.detect(790.0, 590.0, &vp, &headers), Some(ScrollDirection::Down));
    }

    #[test]
    fn test_timer_period_and_clear() {
        let (mut det, vp, headers) = setup(AxisPriority::Horizontal);
        det.update(400.0, 590.0, &vp, &headers, 0.0);
        assert!(det.is_running());
        assert_eq!(det.poll(50.0), None);
        assert_eq!(det.poll(100.0), Some(ScrollDirection::Down));
        assert_eq!(det.poll(150.0), None);
        // Moving within the same edge keeps the schedule
        det.update(300.0, 595.0, &vp, &headers, 160.0);
        assert_eq!(det.poll(200.0), Some(ScrollDirection::Down));
        // Leaving the band stops the timer
        det.update(400.0, 300.0, &vp, &headers, 210.0);
        assert!(!det.is_running());
        assert_eq!(det.poll(1000.0), None);
    }
}
