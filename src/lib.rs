//! Animated water ripples over a background image, rendered with WebGL2.
//!
//! A stamp triangle is baked into an offscreen height map every frame and
//! the height map is then composited over the background on the canvas.
//! Target-independent pieces live at the top level; everything touching the
//! DOM or the GL context is under [`wasm`] and only builds for `wasm32`.

pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod texels;
pub mod viewport;

pub use config::RippleConfig;
pub use error::{Result, RippleError};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::RippleConfig;
    use crate::error::RippleError;
    use crate::frame::FrameStatus;

    pub mod loader;
    pub mod mesh;
    pub mod program;
    pub mod render;
    pub mod surface;
    pub mod texture;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // Start permissive; the canvas may ask for a different level below.
        console_log::init_with_level(log::Level::Trace).ok();
        let status = FrameStatus::new();

        let defaults = RippleConfig::default();
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        // Pages without a canvas (test harnesses, for one) just get no effect.
        let Some(element) = document.query_selector(&defaults.canvas_selector)? else {
            log::warn!("{}", RippleError::MissingElement(defaults.canvas_selector));
            return Ok(());
        };
        let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;

        let config = defaults.with_overrides(|name| canvas.get_attribute(name));
        log::set_max_level(config.log_level);

        // No context means nothing can be drawn; fail before fetching assets.
        let gl = render::acquire_context(&canvas)?;

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = render::launch(gl, canvas, config, status).await {
                log::error!("ripple startup failed: {err}");
            }
        });
        Ok(())
    }
}
