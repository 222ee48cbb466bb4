//! Engine configuration.
//!
//! Every tolerance, hot-zone size and timer period of the interaction engine
//! lives here. Hosts pass a partial camelCase JSON object; missing fields take
//! the defaults below. Distances are logical units, times are milliseconds.

use serde::{Deserialize, Serialize};

use crate::error::{InteractError, Result};

/// Which axis autoscroll serves first when both edges trigger in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisPriority {
    /// Left/right edges are checked before top/bottom
    #[default]
    Horizontal,
    /// Top/bottom edges are checked before left/right
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Distance from a header boundary that starts a row/column resize
    pub resize_handle_tolerance: f32,
    /// Smallest committed row height / column width
    pub min_header_size: f32,
    /// Side of the fill-handle hot-zone at the selection's bottom-right corner
    pub fill_handle_size: f32,
    /// Distance from the selection border that starts a border move
    pub border_hit_tolerance: f32,
    /// Side of each drawing control-point hot-zone
    pub control_point_size: f32,
    /// Distance of the rotate handle above the object's top edge
    pub rotate_handle_offset: f32,
    /// Smallest object width/height reachable by a resize handle
    pub min_object_size: f32,
    /// Rotation snap step with the snap modifier held
    pub rotation_snap_degrees: f32,
    /// Hover hit-test throttle
    pub hit_test_interval_ms: f64,
    /// Blocked-selection toast throttle
    pub blocked_toast_interval_ms: f64,
    /// Edge band that triggers autoscroll during a selection drag
    pub auto_scroll_edge: f32,
    /// Autoscroll timer period
    pub auto_scroll_interval_ms: f64,
    /// Axis served first when two edges trigger together
    pub auto_scroll_priority: AxisPriority,
    /// Movement before a touch counts as a drag
    pub touch_threshold: f32,
    /// Throttle for the real viewport re-index during touch scrolling
    pub touch_scroll_interval_ms: f64,
    /// Rows scrolled per threshold unit crossed
    pub touch_rows_per_step: u32,
    /// Columns scrolled per threshold unit crossed
    pub touch_cols_per_step: u32,
    /// Rows/cols from the window edge at which keyboard navigation nudges it
    pub keyboard_edge_margin: u32,
    /// Rows scrolled per wheel notch
    pub wheel_rows_per_notch: u32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub zoom_step: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resize_handle_tolerance: 5.0,
            min_header_size: 3.0,
            fill_handle_size: 10.0,
            border_hit_tolerance: 3.0,
            control_point_size: 8.0,
            rotate_handle_offset: 20.0,
            min_object_size: 20.0,
            rotation_snap_degrees: 15.0,
            hit_test_interval_ms: 20.0,
            blocked_toast_interval_ms: 500.0,
            auto_scroll_edge: 30.0,
            auto_scroll_interval_ms: 100.0,
            auto_scroll_priority: AxisPriority::Horizontal,
            touch_threshold: 5.0,
            touch_scroll_interval_ms: 150.0,
            touch_rows_per_step: 2,
            touch_cols_per_step: 1,
            keyboard_edge_margin: 2,
            wheel_rows_per_notch: 3,
            zoom_min: 0.5,
            zoom_max: 4.0,
            zoom_step: 0.1,
        }
    }
}

impl EngineConfig {
    /// Parse a (partial) JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("resizeHandleTolerance", self.resize_handle_tolerance),
            ("minHeaderSize", self.min_header_size),
            ("fillHandleSize", self.fill_handle_size),
            ("borderHitTolerance", self.border_hit_tolerance),
            ("controlPointSize", self.control_point_size),
            ("minObjectSize", self.min_object_size),
            ("rotationSnapDegrees", self.rotation_snap_degrees),
            ("autoScrollEdge", self.auto_scroll_edge),
            ("touchThreshold", self.touch_threshold),
            ("zoomMin", self.zoom_min),
            ("zoomStep", self.zoom_step),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(InteractError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let intervals = [
            ("hitTestIntervalMs", self.hit_test_interval_ms),
            ("blockedToastIntervalMs", self.blocked_toast_interval_ms),
            ("autoScrollIntervalMs", self.auto_scroll_interval_ms),
            ("touchScrollIntervalMs", self.touch_scroll_interval_ms),
        ];
        for (name, value) in intervals {
            if !value.is_finite() || value < 0.0 {
                return Err(InteractError::Config(format!(
                    "{name} must be a non-negative duration, got {value}"
                )));
            }
        }
        if self.auto_scroll_interval_ms <= 0.0 {
            return Err(InteractError::Config(
                "autoScrollIntervalMs must be positive".into(),
            ));
        }

        if !self.zoom_max.is_finite() || self.zoom_max < self.zoom_min {
            return Err(InteractError::Config(format!(
                "zoom range is inverted: {}..{}",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.touch_rows_per_step == 0 || self.touch_cols_per_step == 0 {
            return Err(InteractError::Config(
                "touch step counts must be at least 1".into(),
            ));
        }
        Ok(())
    }
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

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json(r#"{"fillHandleSize": 12, "autoScrollPriority": "vertical"}"#)
                .unwrap();
        assert_eq!(config.fill_handle_size, 12.0);
        assert_eq!(config.auto_scroll_priority, AxisPriority::Vertical);
        assert_eq!(config.min_object_size, 20.0);
        assert_eq!(config.touch_rows_per_step, 2);
    }

    #[test]
    fn test_rejects_inverted_zoom() {
        let err = EngineConfig::from_json(r#"{"zoomMin": 2.0, "zoomMax": 1.0}"#).unwrap_err();
        assert!(matches!(err, InteractError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = EngineConfig::from_json(r#"{"autoScrollIntervalMs": 0}"#).unwrap_err();
        assert!(matches!(err, InteractError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EngineConfig::from_json("{").unwrap_err();
        assert!(matches!(err, InteractError::Json(_)));
    }
}
