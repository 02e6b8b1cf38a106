//! Browser bridge between the DOM and the imperative [`Engine`].
//!
//! [`mount`] attaches pointer, wheel, keyboard, and resize listeners to a
//! `<canvas>`, forwards each event to the engine, and turns the returned
//! [`Action`]s into scheduled paints, cursor changes, and stats callbacks.
//! Paints run from `requestAnimationFrame` through the [`RenderScheduler`],
//! so a burst of pointer moves costs one paint per display frame.
//!
//! The canvas is sized to fill its parent element: the observer measures the
//! parent's content box and the engine pins the canvas to that CSS size.
//!
//! Everything here runs on the main thread. Event callbacks run to completion
//! one at a time, so the shared state is a plain `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Once;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent, ResizeObserver,
    ResizeObserverEntry, WheelEvent, Window,
};

use crate::camera::Point;
use crate::config::SketchConfig;
use crate::engine::{Action, Engine, ViewStats};
use crate::error::{HostError, js_error_message};
use crate::input::{Button, DeltaMode, Key, Modifiers, Tool, WheelDelta};
use crate::render::CanvasSurface;
use crate::scheduler::{FrameSource, RenderScheduler, Scheduled};

static LOGGING: Once = Once::new();

/// Route `log` output and panics to the browser console. Safe to call repeatedly.
pub fn init_logging(level: log::Level) {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(level) {
            web_sys::console::warn_1(&format!("logger already set: {err}").into());
        }
    });
}

// =============================================================
// Frame source
// =============================================================

/// `requestAnimationFrame` with a single long-lived callback.
struct RafFrames {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl FrameSource for RafFrames {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.callback.as_ref()?;
        match self.window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {}", js_error_message(&err));
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {}", js_error_message(&err));
        }
    }
}

// =============================================================
// Shared state
// =============================================================

type StatsCallback = Rc<dyn Fn(ViewStats)>;

struct Shared {
    engine: Engine<CanvasSurface>,
    scheduler: RenderScheduler<i32>,
    frames: RafFrames,
    canvas: HtmlCanvasElement,
    on_stats: Option<StatsCallback>,
}

impl Shared {
    fn is_unmounted(&self) -> bool {
        self.scheduler.is_closed()
    }

    fn request_redraw(&mut self) {
        if self.scheduler.request(&mut self.frames) == Scheduled::PaintNow {
            self.engine.render();
        }
    }

    fn set_cursor(&self, cursor: &str) {
        if let Err(err) = self.canvas.style().set_property("cursor", cursor) {
            log::warn!("failed to set cursor: {}", js_error_message(&err));
        }
    }

    fn on_frame(&mut self) {
        if self.scheduler.on_frame() {
            self.engine.render();
        }
    }
}

/// Apply engine actions. The stats callback runs after the borrow is released
/// so it may call back into the handle.
fn dispatch(shared: &Rc<RefCell<Shared>>, actions: &[Action]) {
    let mut notify = None;
    {
        let mut state = shared.borrow_mut();
        if state.is_unmounted() {
            return;
        }
        for action in actions {
            match action {
                Action::RenderNeeded => state.request_redraw(),
                Action::SetCursor(cursor) => state.set_cursor(cursor),
                Action::StatsChanged => {
                    notify = state.on_stats.clone().map(|cb| (cb, state.engine.view_stats()));
                }
            }
        }
    }
    if let Some((cb, stats)) = notify {
        cb(stats);
    }
}

// =============================================================
// Listeners
// =============================================================

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, HostError> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self { target: target.clone(), kind, closure })
    }

    fn detach(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {}", self.kind, js_error_message(&err));
        }
    }
}

fn mouse_modifiers(ev: &MouseEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}

fn key_modifiers(ev: &KeyboardEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}

fn pointer_point(ev: &PointerEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

fn pointer_listener(
    shared: &Rc<RefCell<Shared>>,
    handler: impl Fn(&mut Engine<CanvasSurface>, &PointerEvent) -> Vec<Action> + 'static,
) -> Closure<dyn FnMut(Event)> {
    let shared = Rc::clone(shared);
    Closure::wrap(Box::new(move |ev: Event| {
        let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
            return;
        };
        let actions = handler(&mut shared.borrow_mut().engine, ev);
        dispatch(&shared, &actions);
    }) as Box<dyn FnMut(Event)>)
}

// =============================================================
// Mount / handle
// =============================================================

/// A mounted drawing surface. Dropping the handle unmounts it.
pub struct SketchHandle {
    shared: Rc<RefCell<Shared>>,
    listeners: Vec<Listener>,
    observer: Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array, ResizeObserver)>)>,
}

/// Mount the drawing engine on `canvas` and start listening for input.
///
/// # Errors
///
/// Returns `Err` if there is no window, the canvas has no 2D context, or a
/// listener or resize observer cannot be installed.
pub fn mount(canvas: HtmlCanvasElement, config: SketchConfig) -> Result<SketchHandle, HostError> {
    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let surface = CanvasSurface::new(canvas.clone())?;
    let engine = Engine::new(surface, config);
    if let Err(err) = canvas.style().set_property("display", "block") {
        log::warn!("failed to set canvas display: {}", js_error_message(&err));
    }
    let cursor = engine.core.ui.tool.cursor();

    let shared = Rc::new(RefCell::new(Shared {
        engine,
        scheduler: RenderScheduler::new(),
        frames: RafFrames { window: window.clone(), callback: None },
        canvas: canvas.clone(),
        on_stats: None,
    }));

    let weak: Weak<RefCell<Shared>> = Rc::downgrade(&shared);
    let on_frame = Closure::wrap(Box::new(move |_ts: f64| {
        if let Some(shared) = weak.upgrade() {
            shared.borrow_mut().on_frame();
        }
    }) as Box<dyn FnMut(f64)>);
    shared.borrow_mut().frames.callback = Some(on_frame);

    let mut handle = SketchHandle { shared: Rc::clone(&shared), listeners: Vec::new(), observer: None };
    handle.attach_listeners(&canvas, &window)?;
    handle.observe_resize(&canvas, window)?;

    dispatch(&shared, &[Action::SetCursor(cursor), Action::RenderNeeded]);
    log::info!("sketchpad mounted");
    Ok(handle)
}

impl SketchHandle {
    fn attach_listeners(&mut self, canvas: &HtmlCanvasElement, window: &Window) -> Result<(), HostError> {
        let shared = &self.shared;
        let capture_target = canvas.clone();

        let down = pointer_listener(shared, move |engine, ev| {
            let modifiers = mouse_modifiers(ev);
            let actions = engine.on_pointer_down(pointer_point(ev), Button::from_dom(ev.button()), modifiers);
            if !actions.is_empty() {
                ev.prevent_default();
                if let Err(err) = capture_target.set_pointer_capture(ev.pointer_id()) {
                    log::warn!("pointer capture failed: {}", js_error_message(&err));
                }
            }
            actions
        });
        let moved = pointer_listener(shared, |engine, ev| engine.on_pointer_move(pointer_point(ev)));
        let target: &EventTarget = canvas.as_ref();
        self.listeners.push(Listener::attach(target, "pointerdown", false, down)?);
        self.listeners.push(Listener::attach(target, "pointermove", true, moved)?);
        for kind in ["pointerup", "pointerleave", "pointercancel"] {
            let ended = pointer_listener(shared, |engine, _ev| engine.on_pointer_up());
            self.listeners.push(Listener::attach(target, kind, true, ended)?);
        }

        let wheel_shared = Rc::clone(shared);
        let wheel = Closure::wrap(Box::new(move |ev: Event| {
            let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
                return;
            };
            let modifiers = mouse_modifiers(ev);
            let point = Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()));
            let mut state = wheel_shared.borrow_mut();
            let mode = DeltaMode::from_dom(ev.delta_mode());
            let delta = WheelDelta::from_dom(ev.delta_x(), ev.delta_y(), mode, state.engine.core.viewport_height);
            let actions = state.engine.on_wheel(point, delta, modifiers);
            drop(state);
            if !actions.is_empty() {
                ev.prevent_default();
            }
            dispatch(&wheel_shared, &actions);
        }) as Box<dyn FnMut(Event)>);
        self.listeners.push(Listener::attach(target, "wheel", false, wheel)?);

        let key_shared = Rc::clone(shared);
        let keydown = Closure::wrap(Box::new(move |ev: Event| {
            let Some(ev) = ev.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let modifiers = key_modifiers(ev);
            let actions = key_shared.borrow_mut().engine.on_key_down(&Key(ev.key()), modifiers);
            if !actions.is_empty() {
                ev.prevent_default();
            }
            dispatch(&key_shared, &actions);
        }) as Box<dyn FnMut(Event)>);
        self.listeners.push(Listener::attach(window.as_ref(), "keydown", false, keydown)?);
        Ok(())
    }

    /// Size the surface from its container. The observer reports the initial
    /// size on `observe`, so this is also the mount-time measurement.
    fn observe_resize(&mut self, canvas: &HtmlCanvasElement, window: Window) -> Result<(), HostError> {
        let shared = Rc::clone(&self.shared);
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: ResizeObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<ResizeObserverEntry>() else {
                    continue;
                };
                let rect = entry.content_rect();
                let actions = shared.borrow_mut().engine.set_viewport(
                    rect.width(),
                    rect.height(),
                    window.device_pixel_ratio(),
                );
                dispatch(&shared, &actions);
            }
        }) as Box<dyn FnMut(js_sys::Array, ResizeObserver)>);
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        match canvas.parent_element() {
            Some(container) => observer.observe(&container),
            None => {
                log::warn!("canvas has no parent element; observing the canvas itself");
                observer.observe(canvas);
            }
        }
        self.observer = Some((observer, callback));
        Ok(())
    }

    // --- Toolbar commands ---

    /// Run a toolbar command. Commands on an unmounted handle are dropped.
    fn command(&self, run: impl FnOnce(&mut Engine<CanvasSurface>) -> Vec<Action>) {
        let actions = {
            let mut state = self.shared.borrow_mut();
            if state.is_unmounted() {
                log::debug!("ignoring command after unmount");
                return;
            }
            run(&mut state.engine)
        };
        dispatch(&self.shared, &actions);
    }

    pub fn set_tool(&self, tool: Tool) {
        self.command(|engine| engine.set_tool(tool));
    }

    pub fn set_color(&self, color: &str) {
        self.command(|engine| {
            engine.set_color(color);
            Vec::new()
        });
    }

    pub fn set_brush_size(&self, size: f64) {
        self.command(|engine| {
            engine.set_brush_size(size);
            Vec::new()
        });
    }

    pub fn undo(&self) {
        self.command(Engine::undo);
    }

    pub fn clear(&self) {
        self.command(Engine::clear);
    }

    pub fn reset_view(&self) {
        self.command(Engine::reset_view);
    }

    // --- Display state ---

    #[must_use]
    pub fn view_stats(&self) -> ViewStats {
        self.shared.borrow().engine.view_stats()
    }

    /// Register a callback for stroke/undo/view changes. Replaces any previous one.
    pub fn on_stats(&self, callback: impl Fn(ViewStats) + 'static) {
        self.shared.borrow_mut().on_stats = Some(Rc::new(callback));
    }

    /// Detach every listener, cancel any pending paint, and stop accepting
    /// commands. Idempotent.
    pub fn unmount(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        if let Some((observer, _callback)) = self.observer.take() {
            observer.disconnect();
        }
        let mut state = self.shared.borrow_mut();
        let Shared { scheduler, frames, .. } = &mut *state;
        scheduler.shutdown(frames);
        if frames.callback.take().is_some() {
            log::info!("sketchpad unmounted");
        }
    }
}

impl Drop for SketchHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}
