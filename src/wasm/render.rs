use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Math, Object, Reflect};
use log::{info, trace, warn};
use wasm_bindgen::{closure::Closure, prelude::*, JsCast, JsValue};
use web_sys::{
    Element, Event, HtmlCanvasElement, MouseEvent, Performance, TouchEvent,
    WebGl2RenderingContext as GL, Window,
};

use super::gl::GlBackend;
use crate::config::BloomConfig;
use crate::error::{BloomError, Result};
use crate::frame::{BloomState, FrameLoop, FrameOutcome};
use crate::input::InputEvent;
use crate::surfaces::Viewport;
use crate::uniforms::Theme;

/// Handle returned to the page for wiring its buttons.
#[wasm_bindgen]
pub struct InkBloom {
    state: Rc<RefCell<BloomState>>,
    performance: Performance,
}

#[wasm_bindgen]
impl InkBloom {
    /// Blanks the canvas for a moment.
    pub fn clean(&self) {
        self.state.borrow_mut().post(InputEvent::Clean);
    }

    #[wasm_bindgen(js_name = toggleAutoBloom)]
    pub fn toggle_auto_bloom(&self) -> bool {
        let now = self.performance.now();
        self.state.borrow_mut().toggle_auto_bloom(now)
    }

    #[wasm_bindgen(getter, js_name = autoBloom)]
    pub fn auto_bloom(&self) -> bool {
        self.state.borrow().auto_bloom_running()
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, dark: bool) {
        self.state
            .borrow_mut()
            .post(InputEvent::Theme(Theme::from_dark(dark)));
    }

    /// Plants a bloom at screen fractions.
    #[wasm_bindgen(js_name = bloomAt)]
    pub fn bloom_at(&self, x: f32, y: f32) {
        self.state.borrow_mut().post(InputEvent::Bloom { x, y });
    }
}

/// Finds the canvas, builds the GL passes, wires input and starts the loop.
pub fn launch(options: JsValue) -> Result<InkBloom> {
    let config = parse_config(options)?;

    let window = web_sys::window().ok_or(BloomError::MissingBrowserObject("window"))?;
    let document = window
        .document()
        .ok_or(BloomError::MissingBrowserObject("document"))?;
    let performance = window
        .performance()
        .ok_or(BloomError::MissingBrowserObject("performance"))?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .ok_or(BloomError::MissingBrowserObject("canvas"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| BloomError::MissingBrowserObject("canvas"))?;

    let gl = webgl2_context(&canvas)?;
    let viewport = window_viewport(&window);
    let pixel_ratio = config.pixel_ratio(window.device_pixel_ratio());
    size_canvas(&canvas, viewport, pixel_ratio);

    let seed = random_seed();
    let mut state = BloomState::new(&config, viewport, seed);
    state.pixel_ratio = pixel_ratio;
    let frame = FrameLoop::new(GlBackend::new(gl, config.decay)?, &state, seed.rotate_left(32));
    let state = Rc::new(RefCell::new(state));

    install_listeners(&window, &canvas, &state, config)?;
    start_loop(&window, state.clone(), frame)?;
    info!(
        "ink bloom running on {}x{} @{pixel_ratio}x",
        viewport.width, viewport.height
    );

    Ok(InkBloom { state, performance })
}

fn parse_config(options: JsValue) -> Result<BloomConfig> {
    let config = if options.is_undefined() || options.is_null() {
        BloomConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|err| BloomError::InvalidConfig(err.to_string()))?
    };
    config.validate()?;
    Ok(config)
}

fn webgl2_context(canvas: &HtmlCanvasElement) -> Result<GL> {
    let options = Object::new();
    for key in ["alpha", "antialias", "premultipliedAlpha"] {
        Reflect::set(&options, &JsValue::from_str(key), &JsValue::TRUE).map_err(js)?;
    }
    canvas
        .get_context_with_context_options("webgl2", &options)
        .map_err(js)?
        .ok_or(BloomError::WebGl2Unsupported)?
        .dyn_into::<GL>()
        .map_err(|_| BloomError::WebGl2Unsupported)
}

fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: std::result::Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
    };
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport, pixel_ratio: f32) {
    let physical = viewport.scaled(pixel_ratio);
    canvas.set_width(physical.width);
    canvas.set_height(physical.height);
}

fn random_seed() -> u64 {
    let hi = (Math::random() * f64::from(u32::MAX)) as u64;
    let lo = (Math::random() * f64::from(u32::MAX)) as u64;
    (hi << 32) | lo
}

fn targets_button(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest("button").ok().flatten())
        .is_some()
}

fn install_listeners(
    window: &Window,
    canvas: &HtmlCanvasElement,
    state: &Rc<RefCell<BloomState>>,
    config: BloomConfig,
) -> Result<()> {
    let on_click = {
        let state = state.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            if targets_button(&event) {
                return;
            }
            state.borrow_mut().post(InputEvent::Click {
                px: event.page_x() as f32,
                py: event.page_y() as f32,
            });
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    window
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(js)?;
    on_click.forget();

    let on_touch = {
        let state = state.clone();
        Closure::wrap(Box::new(move |event: TouchEvent| {
            if targets_button(&event) {
                return;
            }
            let Some(touch) = event.target_touches().get(0) else {
                return;
            };
            state.borrow_mut().post(InputEvent::Touch {
                px: touch.page_x() as f32,
                py: touch.page_y() as f32,
            });
        }) as Box<dyn FnMut(TouchEvent)>)
    };
    window
        .add_event_listener_with_callback("touchstart", on_touch.as_ref().unchecked_ref())
        .map_err(js)?;
    on_touch.forget();

    let on_resize = {
        let state = state.clone();
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move || {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = window_viewport(&window);
            let pixel_ratio = config.pixel_ratio(window.device_pixel_ratio());
            size_canvas(&canvas, viewport, pixel_ratio);

            let mut state = state.borrow_mut();
            state.pixel_ratio = pixel_ratio;
            state.post(InputEvent::Resize {
                width: viewport.width,
                height: viewport.height,
            });
        }) as Box<dyn FnMut()>)
    };
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(js)?;
    on_resize.forget();

    Ok(())
}

fn start_loop(
    window: &Window,
    state: Rc<RefCell<BloomState>>,
    mut frame: FrameLoop<GlBackend>,
) -> Result<()> {
    // `f` holds the animation-frame closure so it can re-schedule itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        if let FrameOutcome::Skipped(reason) = frame.tick(&mut state.borrow_mut(), now) {
            trace!("frame skipped: {reason:?}");
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(err) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                warn!("requestAnimationFrame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let first = g.borrow();
    let callback = first
        .as_ref()
        .ok_or(BloomError::Js("animation closure missing".into()))?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(js)?;
    Ok(())
}

fn js(err: JsValue) -> BloomError {
    BloomError::Js(format!("{err:?}"))
}
