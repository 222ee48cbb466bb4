//! DOM listener wiring for `XlInteract`.
//!
//! Raw browser events are converted to logical-space [`crate::input`] events
//! here; everything else happens in the engine. Mouse and pen input comes in
//! through pointer events, fingers through touch events (pointer events with
//! `pointerType == "touch"` are ignored so a swipe never starts a selection).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
};

use super::{flush, SharedState};
use crate::input::{Key, KeyEvent, Modifiers, PointerEvent, TouchPoint, WheelEvent};

type Listener = Closure<dyn FnMut(Event)>;

/// Every listener `XlInteract` installed; dropping it detaches them all.
pub(crate) struct Listeners {
    canvas: HtmlCanvasElement,
    canvas_listeners: Vec<(&'static str, Listener)>,
    key_listener: Option<Listener>,
    tick: Option<Closure<dyn FnMut()>>,
    interval: Option<i32>,
}

impl Listeners {
    pub(crate) fn attach(
        canvas: &HtmlCanvasElement,
        state: &Rc<RefCell<SharedState>>,
        tick_ms: f64,
    ) -> Self {
        let mut listeners = Listeners {
            canvas: canvas.clone(),
            canvas_listeners: Vec::new(),
            key_listener: None,
            tick: None,
            interval: None,
        };

        // Pointer down (mouse / pen)
        {
            let state = state.clone();
            let canvas_ref = canvas.clone();
            listeners.on_canvas("pointerdown", true, move |event: Event| {
                let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                if event.pointer_type() == "touch" || event.button() != 0 {
                    return;
                }
                let _ = canvas_ref.set_pointer_capture(event.pointer_id());
                let pointer = pointer_event(&state, &canvas_ref, event);
                state.borrow_mut().engine.pointer_down(pointer);
                flush(&state);
            });
        }

        // Pointer move (drag preview + hover cursor)
        {
            let state = state.clone();
            let canvas_ref = canvas.clone();
            listeners.on_canvas("pointermove", true, move |event: Event| {
                let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                if event.pointer_type() == "touch" {
                    return;
                }
                let pointer = pointer_event(&state, &canvas_ref, event);
                let cursor = state.borrow_mut().engine.pointer_move(pointer);
                if let Some(cursor) = cursor {
                    let _ = canvas_ref.style().set_property("cursor", cursor.css());
                }
                flush(&state);
            });
        }

        // Pointer up
        {
            let state = state.clone();
            let canvas_ref = canvas.clone();
            listeners.on_canvas("pointerup", true, move |event: Event| {
                let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                if event.pointer_type() == "touch" {
                    return;
                }
                let _ = canvas_ref.release_pointer_capture(event.pointer_id());
                let pointer = pointer_event(&state, &canvas_ref, event);
                state.borrow_mut().engine.pointer_up(pointer);
                flush(&state);
            });
        }

        // Pointer cancel: the browser took the gesture away
        {
            let state = state.clone();
            listeners.on_canvas("pointercancel", true, move |_event: Event| {
                state.borrow_mut().engine.cancel_drag();
                flush(&state);
            });
        }

        // Wheel: scroll rows/columns, Ctrl zooms
        {
            let state = state.clone();
            listeners.on_canvas("wheel", false, move |event: Event| {
                let Some(event) = event.dyn_ref::<web_sys::WheelEvent>() else {
                    return;
                };
                let wheel = wheel_event(event);
                let handled = state.borrow_mut().engine.wheel(wheel);
                if handled || wheel.modifiers.multi_select() {
                    event.prevent_default();
                }
                flush(&state);
            });
        }

        // Touch start
        {
            let state = state.clone();
            let canvas_ref = canvas.clone();
            listeners.on_canvas("touchstart", false, move |event: Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                if event.touches().length() != 1 {
                    return;
                }
                if let Some(point) = touch_point(&state, &canvas_ref, event) {
                    state.borrow_mut().engine.touch_start(point);
                }
            });
        }

        // Touch move: translation preview between real scrolls
        {
            let state = state.clone();
            let canvas_ref = canvas.clone();
            listeners.on_canvas("touchmove", false, move |event: Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let Some(point) = touch_point(&state, &canvas_ref, event) else {
                    return;
                };
                let (response, css) = {
                    let mut s = state.borrow_mut();
                    let response = s.engine.touch_move(point);
                    let css = (
                        s.to_css(response.translation.0),
                        s.to_css(response.translation.1),
                    );
                    (response, css)
                };
                if response.prevent_default {
                    event.prevent_default();
                    set_translation(&canvas_ref, css);
                }
                flush(&state);
            });
        }

        // Touch end
        {
            let state = state.clone();
            let canvas_ref = canvas.clone();
            listeners.on_canvas("touchend", false, move |event: Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let Some(point) = touch_point(&state, &canvas_ref, event) else {
                    return;
                };
                let response = state.borrow_mut().engine.touch_end(point);
                if response.prevent_default {
                    event.prevent_default();
                }
                set_translation(&canvas_ref, (0.0, 0.0));
                flush(&state);
            });
        }

        // Keyboard navigation on the document
        {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = Key::from_dom(&event.key());
                if key == Key::Other {
                    return;
                }
                let key_event = KeyEvent {
                    key,
                    modifiers: keyboard_modifiers(event),
                    time_ms: event.time_stamp(),
                };
                if state.borrow_mut().engine.key_down(key_event) {
                    event.prevent_default();
                }
                flush(&state);
            }) as Box<dyn FnMut(Event)>);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                    .ok();
            }
            listeners.key_listener = Some(closure);
        }

        // Timer for edge autoscroll; idle unless a drag is open
        {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move || {
                if !state.borrow().engine.drag().is_active() {
                    return;
                }
                let now = web_sys::window()
                    .and_then(|w| w.performance())
                    .map_or(0.0, |p| p.now());
                state.borrow_mut().engine.tick(now);
                flush(&state);
            }) as Box<dyn FnMut()>);
            listeners.interval = web_sys::window().and_then(|w| {
                w.set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    interval_ms(tick_ms),
                )
                .ok()
            });
            listeners.tick = Some(closure);
        }

        listeners
    }

    fn on_canvas(
        &mut self,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        self.canvas
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .ok();
        self.canvas_listeners.push((kind, closure));
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (kind, closure) in &self.canvas_listeners {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
        if let (Some(closure), Some(document)) = (
            self.key_listener.as_ref(),
            web_sys::window().and_then(|w| w.document()),
        ) {
            let _ = document
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        }
        if let (Some(handle), Some(window)) = (self.interval, web_sys::window()) {
            window.clear_interval_with_handle(handle);
        }
    }
}

impl SharedState {
    /// Logical units → CSS pixels
    pub(crate) fn to_css(&self, logical: f32) -> f32 {
        self.engine.coords().to_physical(logical) / self.dpr
    }
}

fn mouse_modifiers(event: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        alt: event.alt_key(),
    }
}

fn keyboard_modifiers(event: &KeyboardEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        alt: event.alt_key(),
    }
}

/// Client position → CSS offset inside the canvas
#[allow(clippy::cast_possible_truncation)]
fn canvas_offset(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    (
        client_x as f32 - rect.left() as f32,
        client_y as f32 - rect.top() as f32,
    )
}

fn pointer_event(
    state: &Rc<RefCell<SharedState>>,
    canvas: &HtmlCanvasElement,
    event: &web_sys::PointerEvent,
) -> PointerEvent {
    let (x, y) = canvas_offset(canvas, event.client_x(), event.client_y());
    let s = state.borrow();
    PointerEvent::new(s.to_logical(x), s.to_logical(y), event.time_stamp())
        .with_modifiers(mouse_modifiers(event))
}

#[allow(clippy::cast_possible_truncation)]
fn wheel_event(event: &web_sys::WheelEvent) -> WheelEvent {
    WheelEvent {
        delta_x: event.delta_x() as f32,
        delta_y: event.delta_y() as f32,
        modifiers: mouse_modifiers(event),
        time_ms: event.time_stamp(),
    }
}

fn touch_point(
    state: &Rc<RefCell<SharedState>>,
    canvas: &HtmlCanvasElement,
    event: &TouchEvent,
) -> Option<TouchPoint> {
    let touch = event.changed_touches().get(0)?;
    let (x, y) = canvas_offset(canvas, touch.client_x(), touch.client_y());
    let s = state.borrow();
    Some(TouchPoint::new(
        s.to_logical(x),
        s.to_logical(y),
        event.time_stamp(),
    ))
}

fn set_translation(canvas: &HtmlCanvasElement, (x, y): (f32, f32)) {
    let style = canvas.style();
    if x.abs() < f32::EPSILON && y.abs() < f32::EPSILON {
        let _ = style.remove_property("transform");
    } else {
        let _ = style.set_property("transform", &format!("translate({x}px, {y}px)"));
    }
}

#[allow(clippy::cast_possible_truncation)]
fn interval_ms(ms: f64) -> i32 {
    ms.round().clamp(1.0, f64::from(i32::MAX)) as i32
}
