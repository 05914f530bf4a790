//! WASM bridge: mounts the annotator on an HTML `<canvas>`.
//!
//! Compiled via `wasm-pack build --target web`. The host hands over the
//! canvas, the JSON arguments, the image bytes and two callbacks
//! (`onValue`, `onHeight`); pointer, keyboard and label-input wiring lives
//! here.

mod listener;
mod logger;
mod render2d;

use bbox_core::{HostArgs, HostResult};
use bbox_editor::input::{InputEvent, Modifiers, SurfaceTransform};
use bbox_editor::{Annotator, HostBridge};
use listener::ListenerGuard;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlInputElement, KeyboardEvent,
    MouseEvent, PointerEvent,
};

// ─── Host callbacks ──────────────────────────────────────────────────────

struct JsHost {
    on_value: js_sys::Function,
    on_height: js_sys::Function,
}

impl HostBridge for JsHost {
    fn set_component_value(&mut self, value: &HostResult) {
        let json = JsValue::from_str(&value.to_json());
        if let Err(e) = self.on_value.call1(&JsValue::NULL, &json) {
            log::error!("onValue callback threw: {e:?}");
        }
    }

    fn set_frame_height(&mut self, height: f64) {
        if let Err(e) = self.on_height.call1(&JsValue::NULL, &JsValue::from_f64(height)) {
            log::error!("onHeight callback threw: {e:?}");
        }
    }
}

// ─── Shared widget state ─────────────────────────────────────────────────

struct WidgetState {
    annotator: Annotator<JsHost>,
    canvas: HtmlCanvasElement,
    label_input: Option<HtmlInputElement>,
}

type Shared = Rc<RefCell<WidgetState>>;

impl WidgetState {
    fn transform(&self) -> SurfaceTransform {
        let rect = self.canvas.get_bounding_client_rect();
        SurfaceTransform {
            left: rect.left(),
            top: rect.top(),
            css_width: rect.width(),
            css_height: rect.height(),
            width: f64::from(self.canvas.width()),
            height: f64::from(self.canvas.height()),
        }
    }

    /// Repaint and push the label field into the bound input.
    fn refresh(&self) {
        self.render();
        if let Some(input) = &self.label_input {
            let field = self.annotator.label_field();
            if input.value() != field.value {
                input.set_value(&field.value);
            }
            input.set_disabled(!field.enabled);
        }
    }

    fn render(&self) {
        match context_2d(&self.canvas) {
            Some(ctx) => render2d::render_surface(&ctx, self.annotator.surface()),
            None => log::warn!("canvas has no 2D context; rendering skipped"),
        }
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Run `f` against the state and repaint. Events that arrive while the
/// state is borrowed (a host callback re-entering) are dropped.
fn with_state(state: &Shared, f: impl FnOnce(&mut WidgetState)) {
    match state.try_borrow_mut() {
        Ok(mut s) => {
            f(&mut s);
            s.refresh();
        }
        Err(_) => log::warn!("annotator busy; dropping re-entrant event"),
    }
}

/// Run `f` with the state exclusively borrowed. While a host callback
/// holds the state, `f` is not run at all.
fn exclusive<T, R>(state: &RefCell<T>, f: impl FnOnce(&mut T) -> R) -> Result<R, &'static str> {
    let mut s = state.try_borrow_mut().map_err(|_| "annotator busy")?;
    Ok(f(&mut s))
}

fn mouse_modifiers(ev: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: ev.shift_key(),
        ctrl: ev.ctrl_key(),
        alt: ev.alt_key(),
        meta: ev.meta_key(),
    }
}

fn to_js(msg: impl Display) -> JsValue {
    JsValue::from_str(&msg.to_string())
}

/// Parse the host's JSON arguments. Out-of-band image bytes win over any
/// `imageData` inside the JSON.
fn parse_args(json: &str, image: Vec<u8>) -> Result<HostArgs, String> {
    let mut args = HostArgs::from_json(json).map_err(|e| e.to_string())?;
    if !image.is_empty() {
        args.image_data = image;
    }
    Ok(args)
}

// ─── Listener wiring ─────────────────────────────────────────────────────

/// Document-level shortcuts, live for as long as the widget.
fn key_listener(state: &Shared) -> Result<ListenerGuard, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| to_js("no document to listen on"))?;
    let state = Rc::clone(state);
    ListenerGuard::new(&document, "keydown", move |ev: Event| {
        let Some(ev) = ev.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        // Typing into a text field is not a shortcut
        if ev
            .target()
            .is_some_and(|t| t.dyn_ref::<HtmlInputElement>().is_some())
        {
            return;
        }
        let modifiers = Modifiers {
            shift: ev.shift_key(),
            ctrl: ev.ctrl_key(),
            alt: ev.alt_key(),
            meta: ev.meta_key(),
        };
        let mut handled = false;
        with_state(&state, |s| handled = s.annotator.key(&ev.key(), modifiers));
        if handled {
            ev.prevent_default();
        }
    })
}

/// Pointer listeners for one surface instance.
fn pointer_listeners(state: &Shared, canvas: &HtmlCanvasElement) -> Result<Vec<ListenerGuard>, JsValue> {
    let down = {
        let state = Rc::clone(state);
        ListenerGuard::new(canvas, "pointerdown", move |ev: Event| {
            let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                return;
            };
            with_state(&state, |s| {
                let p = s
                    .transform()
                    .to_surface(f64::from(ev.client_x()), f64::from(ev.client_y()));
                let _ = s.canvas.set_pointer_capture(ev.pointer_id());
                s.annotator.handle_input(InputEvent::PointerDown {
                    x: p.x,
                    y: p.y,
                    modifiers: mouse_modifiers(ev),
                });
            });
        })?
    };
    let moved = {
        let state = Rc::clone(state);
        ListenerGuard::new(canvas, "pointermove", move |ev: Event| {
            let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                return;
            };
            // Hover without a pressed button changes nothing
            if ev.buttons() == 0 {
                return;
            }
            with_state(&state, |s| {
                let p = s
                    .transform()
                    .to_surface(f64::from(ev.client_x()), f64::from(ev.client_y()));
                s.annotator.handle_input(InputEvent::PointerMove {
                    x: p.x,
                    y: p.y,
                    modifiers: mouse_modifiers(ev),
                });
            });
        })?
    };
    let up = {
        let state = Rc::clone(state);
        ListenerGuard::new(canvas, "pointerup", move |ev: Event| {
            let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                return;
            };
            with_state(&state, |s| {
                let p = s
                    .transform()
                    .to_surface(f64::from(ev.client_x()), f64::from(ev.client_y()));
                let _ = s.canvas.release_pointer_capture(ev.pointer_id());
                s.annotator.handle_input(InputEvent::PointerUp {
                    x: p.x,
                    y: p.y,
                    modifiers: mouse_modifiers(ev),
                });
            });
        })?
    };
    Ok(vec![down, moved, up])
}

fn label_listeners(state: &Shared, input: &HtmlInputElement) -> Result<Vec<ListenerGuard>, JsValue> {
    let on_input = {
        let state = Rc::clone(state);
        let field = input.clone();
        ListenerGuard::new(input, "input", move |_: Event| {
            let text = field.value();
            with_state(&state, |s| s.annotator.set_label_text(&text));
        })?
    };
    let on_blur = {
        let state = Rc::clone(state);
        ListenerGuard::new(input, "blur", move |_: Event| {
            with_state(&state, |s| s.annotator.commit_label());
        })?
    };
    let on_enter = {
        let state = Rc::clone(state);
        ListenerGuard::new(input, "keydown", move |ev: Event| {
            if ev.dyn_ref::<KeyboardEvent>().is_some_and(|k| k.key() == "Enter") {
                with_state(&state, |s| s.annotator.commit_label());
            }
        })?
    };
    Ok(vec![on_input, on_blur, on_enter])
}

// ─── JS API ──────────────────────────────────────────────────────────────

/// A mounted annotator. Dropping it (JS `free()`) removes every listener
/// and disposes the surface.
#[wasm_bindgen]
pub struct BboxWidget {
    state: Shared,
    keydown: Option<ListenerGuard>,
    /// Recreated with every surface instance.
    pointer: Vec<ListenerGuard>,
    label: Vec<ListenerGuard>,
}

#[wasm_bindgen]
impl BboxWidget {
    /// Mount on `canvas`. `image` may be empty when the JSON carries
    /// `imageData` or no background is wanted.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        args_json: &str,
        image: Vec<u8>,
        on_value: js_sys::Function,
        on_height: js_sys::Function,
    ) -> Result<BboxWidget, JsValue> {
        logger::init(log::max_level().max(log::LevelFilter::Warn));

        let args = parse_args(args_json, image).map_err(to_js)?;
        canvas.set_width(args.canvas_width);
        canvas.set_height(args.canvas_height);
        let annotator = Annotator::new(args, JsHost { on_value, on_height }).map_err(to_js)?;
        let state = Rc::new(RefCell::new(WidgetState {
            annotator,
            canvas: canvas.clone(),
            label_input: None,
        }));

        let keydown = Some(key_listener(&state)?);
        let pointer = pointer_listeners(&state, &canvas)?;
        state.borrow().refresh();
        Ok(Self {
            state,
            keydown,
            pointer,
            label: Vec::new(),
        })
    }

    /// New host arguments: rebuild the surface. Invalid arguments are
    /// reported and the previous surface stays up.
    pub fn set_args(&mut self, args_json: &str, image: Vec<u8>) -> Result<(), JsValue> {
        let args = parse_args(args_json, image).map_err(to_js)?;
        let (width, height) = (args.canvas_width, args.canvas_height);

        let pointer = &mut self.pointer;
        let (canvas, result) = exclusive(&self.state, |s| {
            // Old surface's listeners go before the new surface exists
            pointer.clear();
            let result = s.annotator.rebuild(args);
            if result.is_ok() {
                s.canvas.set_width(width);
                s.canvas.set_height(height);
            }
            (s.canvas.clone(), result)
        })
        .map_err(to_js)?;
        self.pointer = pointer_listeners(&self.state, &canvas)?;
        self.render();
        result.map_err(to_js)
    }

    /// Bind a text input as the label editor.
    pub fn bind_label_input(&mut self, input: HtmlInputElement) -> Result<(), JsValue> {
        self.label.clear();
        self.label = label_listeners(&self.state, &input)?;
        with_state(&self.state, |s| s.label_input = Some(input));
        Ok(())
    }

    pub fn quick_add(&self) {
        with_state(&self.state, |s| s.annotator.quick_add());
    }

    /// Returns `false` if drawing mode was already armed.
    pub fn start_drawing(&self) -> bool {
        let mut armed = false;
        with_state(&self.state, |s| armed = s.annotator.start_drawing());
        armed
    }

    pub fn remove_selected(&self) -> bool {
        let mut removed = false;
        with_state(&self.state, |s| removed = s.annotator.remove_selected());
        removed
    }

    pub fn reset(&self) {
        with_state(&self.state, |s| s.annotator.reset());
    }

    pub fn clear_all(&self) {
        with_state(&self.state, |s| s.annotator.clear_all());
    }

    /// Current value as JSON: `{"rects":[{top,left,width,height,label}]}`.
    pub fn value(&self) -> Result<String, JsValue> {
        let s = self
            .state
            .try_borrow()
            .map_err(|_| to_js("annotator busy"))?;
        Ok(s.annotator.result().to_json())
    }

    pub fn selection(&self) -> Vec<u32> {
        self.state
            .try_borrow()
            .map(|s| s.annotator.selection().iter().map(|&i| i as u32).collect())
            .unwrap_or_default()
    }

    pub fn render(&self) {
        match self.state.try_borrow() {
            Ok(s) => s.refresh(),
            Err(_) => log::debug!("render skipped while annotator is busy"),
        }
    }

    /// Tear down listeners and dispose the surface. Safe to call twice.
    pub fn destroy(&mut self) {
        self.pointer.clear();
        self.label.clear();
        self.keydown = None;
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.annotator.unmount();
            s.label_input = None;
        }
    }
}

/// Set the console log level (`"error"` … `"trace"`).
#[wasm_bindgen]
pub fn set_log_level(name: &str) {
    logger::init(logger::level_from_name(name));
}
