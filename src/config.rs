//! Startup configuration. Defaults describe the stock page; the hosting
//! canvas can override them with `data-*` attributes.

use log::LevelFilter;

use crate::texels::{Rgba, HEIGHT_MAP_SIZE};

pub const VERTEX_SHADER_ATTR: &str = "data-vertex-shader";
pub const FRAGMENT_SHADER_ATTR: &str = "data-fragment-shader";
pub const BACKGROUND_ATTR: &str = "data-background";
pub const LOG_LEVEL_ATTR: &str = "data-log-level";

#[derive(Debug, Clone, PartialEq)]
pub struct RippleConfig {
    /// CSS selector for the canvas to render into.
    pub canvas_selector: String,
    pub vertex_shader_url: String,
    pub fragment_shader_url: String,
    pub background_url: String,
    pub height_map_size: u32,
    pub clear_color: Rgba,
    pub log_level: LevelFilter,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            canvas_selector: "canvas".to_string(),
            vertex_shader_url: "rendering.vert.glsl".to_string(),
            fragment_shader_url: "rendering.frag.glsl".to_string(),
            background_url: "background.jpg".to_string(),
            height_map_size: HEIGHT_MAP_SIZE,
            clear_color: Rgba::SKY_BLUE,
            log_level: LevelFilter::Info,
        }
    }
}

impl RippleConfig {
    /// Applies overrides from `lookup`, which maps an attribute name to its
    /// value. Empty values are ignored, as is an unparseable log level.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(VERTEX_SHADER_ATTR) {
            self.vertex_shader_url = url;
        }
        if let Some(url) = get(FRAGMENT_SHADER_ATTR) {
            self.fragment_shader_url = url;
        }
        if let Some(url) = get(BACKGROUND_ATTR) {
            self.background_url = url;
        }
        if let Some(level) = get(LOG_LEVEL_ATTR) {
            match level.trim().parse::<LevelFilter>() {
                Ok(level) => self.log_level = level,
                Err(_) => log::warn!("ignoring unknown log level {level:?}"),
            }
        }
        self
    }
}
