//! Engine facade: the host's only entry points.
//!
//! Every handler is a synchronous reducer over the selection, viewport and
//! sheet, followed by at most one redraw request. Timestamps come from the
//! host so throttles and the autoscroll timer are deterministic.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::input::{InputEvent, KeyEvent, PointerEvent, TouchPoint, WheelEvent};
use crate::interaction::{
    CursorKind, DragContext, DragSessionController, HitContext, HitTester, KeyboardNavigator,
    Preview, RegionTag, SelectionModel, SelectionRequest, TouchGestureAdapter, TouchResponse,
};
use crate::layout::{CoordinateSpace, ViewportWindow};
use crate::ports::{Notifier, PointerSource, RedrawMode, RenderSink, Sheet};
use crate::types::{ActiveSelection, Axis, HeaderConfig, ObjectId, Rectangle};

/// Borrow the engine's fields disjointly so `self.drag` stays usable.
macro_rules! drag_context {
    ($engine:ident) => {
        DragContext {
            sheet: &mut $engine.sheet,
            selection: &mut $engine.selection,
            viewport: &mut $engine.viewport,
            headers: &$engine.headers,
            config: &$engine.config,
            notifier: &mut $engine.notifier,
        }
    };
}

pub struct InteractionEngine<S: Sheet, R: RenderSink, N: Notifier> {
    sheet: S,
    sink: R,
    notifier: N,
    config: EngineConfig,
    headers: HeaderConfig,
    coords: CoordinateSpace,
    /// Canvas size in physical pixels
    physical_size: (f32, f32),
    viewport: ViewportWindow,
    selection: SelectionModel,
    hit_tester: HitTester,
    drag: DragSessionController,
    touch: TouchGestureAdapter,
    keyboard: KeyboardNavigator,
    active_object: Option<ObjectId>,
    editor_active: bool,
}

impl<S: Sheet, R: RenderSink, N: Notifier> InteractionEngine<S, R, N> {
    /// Create an engine over `sheet`; the canvas starts at 800x600 pixels.
    pub fn new(sheet: S, sink: R, notifier: N, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let coords = CoordinateSpace::from_config(&config);
        let physical_size = (800.0, 600.0);
        let viewport = ViewportWindow::for_layout(
            sheet.layout(),
            coords.to_logical(physical_size.0),
            coords.to_logical(physical_size.1),
        );
        Ok(Self {
            selection: SelectionModel::new(config.blocked_toast_interval_ms),
            hit_tester: HitTester::new(&config),
            touch: TouchGestureAdapter::new(&config),
            keyboard: KeyboardNavigator::new(config.keyboard_edge_margin),
            drag: DragSessionController::new(),
            headers: HeaderConfig::default(),
            coords,
            physical_size,
            viewport,
            sheet,
            sink,
            notifier,
            config,
            active_object: None,
            editor_active: false,
        })
    }

    pub fn with_headers(mut self, headers: HeaderConfig) -> Self {
        self.headers = headers;
        self
    }

    // --- accessors ---------------------------------------------------------

    pub fn selection(&self) -> &ActiveSelection {
        self.selection.selection()
    }

    pub fn selection_model(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn viewport(&self) -> &ViewportWindow {
        &self.viewport
    }

    pub fn preview(&self) -> Option<Preview> {
        self.drag.preview()
    }

    pub fn zoom(&self) -> f32 {
        self.coords.zoom()
    }

    pub fn coords(&self) -> &CoordinateSpace {
        &self.coords
    }

    pub fn headers(&self) -> &HeaderConfig {
        &self.headers
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Direct sheet access for host-side edits; call [`Self::sync_layout`]
    /// afterwards if geometry changed.
    pub fn sheet_mut(&mut self) -> &mut S {
        &mut self.sheet
    }

    pub fn drag(&self) -> &DragSessionController {
        &self.drag
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.active_object
    }

    pub fn is_editor_active(&self) -> bool {
        self.editor_active
    }

    pub fn set_editor_active(&mut self, active: bool) {
        self.editor_active = active;
    }

    /// Register cleanup for transient UI; it runs once at the next
    /// pointer-down.
    pub fn register_transient(&mut self, cleanup: impl FnOnce() + 'static) {
        self.drag.register_transient(cleanup);
    }

    /// Resolve the region under a canvas point without side effects.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<RegionTag> {
        self.hit_tester.resolve(&self.hit_context(), x, y)
    }

    /// Rectangle whose border and fill handle are grabbable, if drawn.
    fn grabbable_selection(&self) -> Option<Rectangle> {
        if !self.selection.is_visible(&self.sheet) {
            return None;
        }
        Some(
            self.selection
                .current_area()
                .unwrap_or(Rectangle::cell(self.selection.active_cell())),
        )
    }

    fn hit_context(&self) -> HitContext<'_> {
        HitContext {
            layout: self.sheet.layout(),
            viewport: &self.viewport,
            headers: &self.headers,
            selection: self.grabbable_selection(),
            objects: self.sheet.objects(),
            active_object: self.active_object,
        }
    }

    fn redraw(&mut self, mode: Option<RedrawMode>) {
        if let Some(mode) = mode {
            self.sink.request_redraw(mode);
        }
    }

    // --- pointer -----------------------------------------------------------

    pub fn pointer_down(&mut self, event: PointerEvent) {
        let region = self.hit_test(event.x, event.y);
        let next_active = match region {
            Some(
                RegionTag::DrawingMove { id }
                | RegionTag::DrawingResize { id, .. }
                | RegionTag::DrawingRotate { id },
            ) => Some(id),
            _ => None,
        };
        let object_changed = next_active != self.active_object;
        self.active_object = next_active;

        let mut ctx = drag_context!(self);
        let redraw = self.drag.begin(region, &mut ctx, &event);
        let redraw = match (redraw, object_changed) {
            (None, true) => Some(RedrawMode::Overlay),
            (redraw, _) => redraw,
        };
        self.redraw(redraw);
    }

    /// Live preview while dragging; throttled hover cursor otherwise.
    pub fn pointer_move(&mut self, event: PointerEvent) -> Option<CursorKind> {
        if self.drag.is_active() {
            let mut ctx = drag_context!(self);
            let redraw = self.drag.update(&mut ctx, &event);
            self.redraw(redraw);
            return None;
        }
        let selection = self.grabbable_selection();
        let ctx = HitContext {
            layout: self.sheet.layout(),
            viewport: &self.viewport,
            headers: &self.headers,
            selection,
            objects: self.sheet.objects(),
            active_object: self.active_object,
        };
        self.hit_tester.hover(&ctx, event.x, event.y, event.time_ms)
    }

    pub fn pointer_up(&mut self, event: PointerEvent) {
        let mut ctx = drag_context!(self);
        let redraw = self.drag.end(&mut ctx, &event);
        self.redraw(redraw);
    }

    /// Abandon the open gesture (pointer capture lost, window blur).
    pub fn cancel_drag(&mut self) {
        if self.drag.cancel() {
            self.redraw(Some(RedrawMode::Full));
        }
    }

    /// Drive the open session's timer (autoscroll).
    pub fn tick(&mut self, time_ms: f64) {
        let mut ctx = drag_context!(self);
        let redraw = self.drag.tick(&mut ctx, time_ms);
        self.redraw(redraw);
    }

    // --- touch -------------------------------------------------------------

    pub fn touch_start(&mut self, point: TouchPoint) {
        self.touch.start(point, &self.viewport);
    }

    pub fn touch_move(&mut self, point: TouchPoint) -> TouchResponse {
        let response = self
            .touch
            .on_move(point, &mut self.viewport, self.sheet.layout());
        if response.scrolled {
            self.redraw(Some(RedrawMode::Full));
        }
        response
    }

    /// Finish the touch. A touch that never moved selects the tapped cell.
    pub fn touch_end(&mut self, point: TouchPoint) -> TouchResponse {
        let response = self
            .touch
            .end(point, &mut self.viewport, self.sheet.layout());
        if self.editor_active {
            debug!("editor blurred by touch");
            self.editor_active = false;
        }
        if response.scrolled {
            self.redraw(Some(RedrawMode::Full));
        }
        if let Some((x, y)) = response.tap {
            if let Some(RegionTag::Cell { cell }) = self.hit_test(x, y) {
                let outcome = self.selection.apply(
                    SelectionRequest::Cell {
                        cell,
                        additive: false,
                    },
                    &self.sheet,
                    &mut self.notifier,
                    point.time_ms,
                );
                if !outcome.is_blocked() {
                    self.redraw(Some(RedrawMode::Overlay));
                }
            }
        }
        response
    }

    // --- wheel, keyboard, zoom, size ------------------------------------------

    /// Ctrl+wheel zooms one step; otherwise scroll rows (Shift: columns).
    pub fn wheel(&mut self, event: WheelEvent) -> bool {
        if event.modifiers.multi_select() {
            let steps = if event.delta_y < 0.0 { 1 } else { -1 };
            if self.coords.step_zoom(steps) {
                self.apply_size();
                self.redraw(Some(RedrawMode::Full));
                return true;
            }
            return false;
        }
        let notch = i64::from(self.config.wheel_rows_per_notch);
        let primary = signum(event.delta_y) * notch;
        let secondary = signum(event.delta_x);
        let (d_rows, d_cols) = if event.modifiers.shift {
            (0, primary)
        } else {
            (primary, secondary)
        };
        let scrolled = self
            .viewport
            .scroll_by(d_rows, d_cols, self.sheet.layout());
        if scrolled {
            self.redraw(Some(RedrawMode::Full));
        }
        scrolled
    }

    /// Arrow/Tab/Enter navigation; returns true when the key was handled.
    /// Keys belong to the cell editor while it is open.
    pub fn key_down(&mut self, event: KeyEvent) -> bool {
        if self.editor_active {
            return false;
        }
        let Some(outcome) = self.keyboard.handle(
            &event,
            &self.sheet,
            &mut self.selection,
            &mut self.viewport,
            &self.headers,
        ) else {
            return false;
        };
        let mode = if outcome.scrolled {
            RedrawMode::Full
        } else {
            RedrawMode::Overlay
        };
        self.redraw(Some(mode));
        true
    }

    /// Canvas size in physical pixels.
    pub fn resize(&mut self, physical_width: f32, physical_height: f32) {
        self.physical_size = (physical_width, physical_height);
        if self.apply_size() {
            self.redraw(Some(RedrawMode::Full));
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if self.coords.set_zoom(zoom) {
            self.apply_size();
            self.redraw(Some(RedrawMode::Full));
        }
    }

    fn apply_size(&mut self) -> bool {
        let (w, h) = self.physical_size;
        self.viewport
            .set_size(self.coords.to_logical(w), self.coords.to_logical(h))
    }

    /// Scrollbar drag: map a physical thumb offset back to a window index.
    pub fn scroll_to_offset(&mut self, axis: Axis, physical_offset: f32) {
        let layout = self.sheet.layout();
        let index =
            self.viewport
                .index_from_scroll_offset(layout, &self.coords, axis, physical_offset);
        let (row, col) = match axis {
            Axis::Row => (index, self.viewport.col_window_start),
            Axis::Col => (self.viewport.row_window_start, index),
        };
        if self.viewport.set_window_start(row, col, layout) {
            self.redraw(Some(RedrawMode::Full));
        }
    }

    /// Re-read sheet geometry after an external change (frozen panes,
    /// hidden rows, merges).
    pub fn sync_layout(&mut self) {
        self.viewport.sync_layout(self.sheet.layout());
        self.redraw(Some(RedrawMode::Full));
    }

    // --- event stream ------------------------------------------------------

    /// Dispatch one input event.
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(e) => self.pointer_down(e),
            InputEvent::PointerMove(e) => {
                self.pointer_move(e);
            }
            InputEvent::PointerUp(e) => self.pointer_up(e),
            InputEvent::TouchStart(p) => self.touch_start(p),
            InputEvent::TouchMove(p) => {
                self.touch_move(p);
            }
            InputEvent::TouchEnd(p) => {
                self.touch_end(p);
            }
            InputEvent::Wheel(e) => {
                self.wheel(e);
            }
            InputEvent::Key(e) => {
                self.key_down(e);
            }
            InputEvent::Tick { time_ms } => self.tick(time_ms),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::Zoom { zoom } => self.set_zoom(zoom),
        }
    }

    /// Drain a pointer source; returns how many events were handled.
    pub fn run<P: PointerSource + ?Sized>(&mut self, source: &mut P) -> usize {
        let mut count = 0;
        while let Some(event) = source.next_event() {
            self.dispatch(event);
            count += 1;
        }
        count
    }
}

fn signum(value: f32) -> i64 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
