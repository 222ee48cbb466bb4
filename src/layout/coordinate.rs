//! Logical ⇄ physical unit conversion.
//!
//! All geometry in the engine is expressed in logical units; only the host's
//! final DOM/canvas placement multiplies by the zoom factor.

use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    step: f32,
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl CoordinateSpace {
    pub fn new(min_zoom: f32, max_zoom: f32, step: f32) -> Self {
        Self {
            zoom: 1.0_f32.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            step,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.zoom_min, config.zoom_max, config.zoom_step)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn to_physical(&self, logical: f32) -> f32 {
        logical * self.zoom
    }

    pub fn to_logical(&self, physical: f32) -> f32 {
        physical / self.zoom
    }

    /// Set the zoom factor, clamped to the configured range.
    ///
    /// Non-finite or non-positive values are ignored. Returns true if the
    /// zoom changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !zoom.is_finite() || zoom <= 0.0 {
            return false;
        }
        let next = zoom.clamp(self.min_zoom, self.max_zoom);
        if (next - self.zoom).abs() < f32::EPSILON {
            return false;
        }
        self.zoom = next;
        true
    }

    /// Move one zoom step in (`steps > 0`) or out, snapping to the step grid
    /// so repeated steps never accumulate float drift.
    pub fn step_zoom(&mut self, steps: i32) -> bool {
        let grid = 1.0 / self.step;
        let target = (self.zoom * grid).round() / grid + self.step * steps as f32;
        self.set_zoom((target * grid).round() / grid)
    }
}
