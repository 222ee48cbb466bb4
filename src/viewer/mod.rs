//! `XlInteract` - the WASM-exported entry point.
//!
//! Owns an [`InteractionEngine`] over a [`MemorySheet`] and wires the canvas
//! DOM events into it (see `events.rs`). Rendering stays on the JavaScript
//! side: the engine only asks for a full or overlay redraw through the render
//! callback, and protection messages go to the toast callback.
//!
//! Callbacks are never invoked while the shared state is borrowed, so a
//! render callback may call back into `getSelection`/`getPreview`.

mod events;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::EngineConfig;
use crate::engine::InteractionEngine;
use crate::error::InteractError;
use crate::input::InputEvent;
use crate::ports::{Notifier, RedrawMode, RenderSink};
use crate::sheet::MemorySheet;

use events::Listeners;

/// Redraw requests raised while handling one DOM event. A full redraw
/// absorbs an overlay one.
#[derive(Debug, Default)]
pub(crate) struct PendingRedraw {
    mode: Option<RedrawMode>,
}

impl PendingRedraw {
    fn take(&mut self) -> Option<RedrawMode> {
        self.mode.take()
    }
}

impl RenderSink for PendingRedraw {
    fn request_redraw(&mut self, mode: RedrawMode) {
        self.mode = match (self.mode, mode) {
            (Some(RedrawMode::Full), _) | (_, RedrawMode::Full) => Some(RedrawMode::Full),
            _ => Some(RedrawMode::Overlay),
        };
    }
}

#[derive(Debug, Default)]
pub(crate) struct PendingToasts {
    messages: Vec<String>,
}

impl Notifier for PendingToasts {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

pub(crate) type Engine = InteractionEngine<MemorySheet, PendingRedraw, PendingToasts>;

pub(crate) struct SharedState {
    pub(crate) engine: Engine,
    pub(crate) dpr: f32,
    pub(crate) render_callback: Option<Function>,
    pub(crate) toast_callback: Option<Function>,
}

impl SharedState {
    /// CSS pixel offset inside the canvas → logical canvas units
    pub(crate) fn to_logical(&self, css: f32) -> f32 {
        self.engine.coords().to_logical(css * self.dpr)
    }
}

/// Deliver buffered redraws and toasts after the state borrow is released.
pub(crate) fn flush(state: &Rc<RefCell<SharedState>>) {
    let (render, mode, toast, messages) = {
        let mut s = state.borrow_mut();
        let mode = s.engine.sink_mut().take();
        let messages = std::mem::take(&mut s.engine.notifier_mut().messages);
        (
            s.render_callback.clone(),
            mode,
            s.toast_callback.clone(),
            messages,
        )
    };
    if let (Some(callback), Some(mode)) = (render, mode) {
        let arg = serde_wasm_bindgen::to_value(&mode).unwrap_or(JsValue::NULL);
        let _ = callback.call1(&JsValue::NULL, &arg);
    }
    if let Some(callback) = toast {
        for message in messages {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&message));
        }
    }
}

fn to_js(err: InteractError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The interaction engine exported to JavaScript
#[wasm_bindgen]
pub struct XlInteract {
    state: Rc<RefCell<SharedState>>,
    #[allow(dead_code)] // Dropping removes the DOM listeners
    listeners: Listeners,
}

#[wasm_bindgen]
impl XlInteract {
    /// Create an engine bound to `canvas`.
    ///
    /// `sheet_json` describes the sheet (sizes, merges, frozen panes,
    /// protection, drawings); `config_json` overrides engine defaults.
    /// Pointer, touch, wheel and keyboard listeners are installed immediately.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        sheet_json: &str,
        config_json: Option<String>,
        dpr: f32,
    ) -> Result<XlInteract, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json).map_err(to_js)?,
            None => EngineConfig::default(),
        };
        let tick_ms = config.auto_scroll_interval_ms;
        let sheet = MemorySheet::from_json(sheet_json).map_err(to_js)?;
        let mut engine = InteractionEngine::new(
            sheet,
            PendingRedraw::default(),
            PendingToasts::default(),
            config,
        )
        .map_err(to_js)?;
        engine.set_zoom(dpr);
        engine.resize(canvas.width().max(1) as f32, canvas.height().max(1) as f32);

        let state = Rc::new(RefCell::new(SharedState {
            engine,
            dpr,
            render_callback: None,
            toast_callback: None,
        }));
        let listeners = Listeners::attach(&canvas, &state, tick_ms);

        Ok(XlInteract { state, listeners })
    }

    /// Called with `"full"` or `"overlay"` whenever the canvas needs repainting.
    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&mut self, callback: Function) {
        self.state.borrow_mut().render_callback = Some(callback);
        self.state
            .borrow_mut()
            .engine
            .sink_mut()
            .request_redraw(RedrawMode::Full);
        flush(&self.state);
    }

    /// Called with a message when protection blocks a selection.
    #[wasm_bindgen(js_name = "setToastCallback")]
    pub fn set_toast_callback(&mut self, callback: Function) {
        self.state.borrow_mut().toast_callback = Some(callback);
    }

    #[wasm_bindgen(js_name = "getSelection")]
    pub fn get_selection(&self) -> Result<JsValue, JsValue> {
        to_value(self.state.borrow().engine.selection())
    }

    #[wasm_bindgen(js_name = "getViewport")]
    pub fn get_viewport(&self) -> Result<JsValue, JsValue> {
        to_value(self.state.borrow().engine.viewport())
    }

    /// Live drag preview for the overlay pass, `null` when idle.
    #[wasm_bindgen(js_name = "getPreview")]
    pub fn get_preview(&self) -> Result<JsValue, JsValue> {
        to_value(&self.state.borrow().engine.preview())
    }

    /// Structural mutations committed so far.
    #[wasm_bindgen(js_name = "getHistory")]
    pub fn get_history(&self) -> Result<JsValue, JsValue> {
        to_value(self.state.borrow().engine.sheet().history())
    }

    #[wasm_bindgen(js_name = "getObjects")]
    pub fn get_objects(&self) -> Result<JsValue, JsValue> {
        use crate::ports::Drawings;
        to_value(self.state.borrow().engine.sheet().objects())
    }

    #[wasm_bindgen(js_name = "getZoom")]
    pub fn get_zoom(&self) -> f32 {
        self.state.borrow().engine.zoom()
    }

    #[wasm_bindgen(js_name = "setZoom")]
    pub fn set_zoom(&mut self, zoom: f32) {
        self.state.borrow_mut().engine.set_zoom(zoom);
        flush(&self.state);
    }

    /// New canvas size in physical pixels.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        {
            let mut s = self.state.borrow_mut();
            s.dpr = dpr;
            s.engine.resize(width.max(1) as f32, height.max(1) as f32);
        }
        flush(&self.state);
    }

    #[wasm_bindgen(js_name = "setEditorActive")]
    pub fn set_editor_active(&mut self, active: bool) {
        self.state.borrow_mut().engine.set_editor_active(active);
    }

    /// Freeze the first `rows` rows and `cols` columns.
    #[wasm_bindgen(js_name = "setFrozen")]
    pub fn set_frozen(&mut self, rows: u32, cols: u32) {
        {
            let mut s = self.state.borrow_mut();
            s.engine.sheet_mut().layout_mut().set_frozen(rows, cols);
            s.engine.sync_layout();
        }
        flush(&self.state);
    }

    /// Feed one event in the JSON form the replay tool reads.
    #[wasm_bindgen(js_name = "dispatchEvent")]
    pub fn dispatch_event(&mut self, event_json: &str) -> Result<(), JsValue> {
        let event: InputEvent =
            serde_json::from_str(event_json).map_err(|e| to_js(InteractError::from(e)))?;
        self.state.borrow_mut().engine.dispatch(event);
        flush(&self.state);
        Ok(())
    }
}
