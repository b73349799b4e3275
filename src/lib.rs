//! Pointer-reactive "ink bloom" feedback effect.
//!
//! Everything except the `wasm` module is platform-neutral and runs on the
//! host, including a CPU reference backend.

pub mod backend;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod pointer;
pub mod schedule;
pub mod shaders;
pub mod software;
pub mod surfaces;
pub mod uniforms;

pub use backend::RenderBackend;
pub use config::BloomConfig;
pub use error::{BloomError, Result};
pub use frame::{BloomState, FrameLoop, FrameOutcome, SkipReason};
pub use input::InputEvent;
pub use surfaces::{PingPong, Viewport};
pub use uniforms::{EffectUniforms, Theme};

// Only compile browser bindings when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod gl;
    mod render;

    pub use render::InkBloom;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("ink bloom module loaded");
        Ok(())
    }

    /// Starts the effect on the page. `options` is an optional `BloomConfig` object.
    #[wasm_bindgen]
    pub fn launch(options: JsValue) -> Result<InkBloom, JsValue> {
        render::launch(options).map_err(|err| {
            log::error!("launch failed: {err}");
            JsError::new(&err.to_string()).into()
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{launch, InkBloom};
