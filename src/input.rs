//! Logical-space input events.
//!
//! Hosts translate raw DOM events into these: positions are canvas-relative
//! logical units (physical offset divided by zoom, header strip included) and
//! every event carries the host's monotonic timestamp in milliseconds.

use serde::{Deserialize, Serialize};

/// Keyboard modifier state at the time of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Add another area instead of replacing the selection (Ctrl / Cmd)
    pub fn multi_select(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Extend the current area from the active cell (Shift)
    pub fn extend(&self) -> bool {
        self.shift
    }

    /// Snap rotation to fixed steps (Shift)
    pub fn snap(&self) -> bool {
        self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub time_ms: f64,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, time_ms: f64) -> Self {
        Self {
            x,
            y,
            modifiers: Modifiers::NONE,
            time_ms,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A single-finger touch position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub time_ms: f64,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32, time_ms: f64) -> Self {
        Self { x, y, time_ms }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub time_ms: f64,
}

/// Navigation keys the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Enter,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub time_ms: f64,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            time_ms: 0.0,
        }
    }
}

/// Every input the engine accepts, in the shape a replay script uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    TouchStart(TouchPoint),
    TouchMove(TouchPoint),
    TouchEnd(TouchPoint),
    Wheel(WheelEvent),
    Key(KeyEvent),
    #[serde(rename_all = "camelCase")]
    Tick {
        time_ms: f64,
    },
    /// Canvas size in physical pixels
    Resize {
        width: f32,
        height: f32,
    },
    Zoom {
        zoom: f32,
    },
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_roles() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.multi_select());
        assert!(Modifiers::CTRL.multi_select());
        assert!(!Modifiers::SHIFT.multi_select());
        assert!(Modifiers::SHIFT.extend());
        assert!(Modifiers::SHIFT.snap());
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent = serde_json::from_str(
            r#"{"type":"pointerDown","x":10,"y":20,"modifiers":{"ctrl":true},"timeMs":5}"#,
        )
        .unwrap();
        match event {
            InputEvent::PointerDown(p) => {
                assert_eq!(p.x, 10.0);
                assert!(p.modifiers.ctrl);
                assert_eq!(p.time_ms, 5.0);
            }
            other => panic!("unexpected {other:?}"),
        }

        let tick: InputEvent = serde_json::from_str(r#"{"type":"tick","timeMs":100}"#).unwrap();
        assert_eq!(tick, InputEvent::Tick { time_ms: 100.0 });
    }

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("Tab"), Key::Tab);
        assert_eq!(Key::from_dom("a"), Key::Other);
    }
}
