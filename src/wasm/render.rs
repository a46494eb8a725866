use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, HtmlCanvasElement, MouseEvent, WebGl2RenderingContext as GL, WebGlUniformLocation,
};

use super::loader::{load_image, request_file};
use super::mesh::{create_mesh, Mesh};
use super::program::{load_shader_program, InterfaceCheck, ShaderProgram};
use super::texture::{Framebuffer, HeightMaps, Texture};
use crate::config::RippleConfig;
use crate::error::{Result, RippleError};
use crate::frame::{FrameDriver, FrameOutcome, FramePasses, FrameState, FrameStatus, StampInput};
use crate::geometry::{client_to_clip, ClientRect, QUAD, STAMP};
use crate::texels::Rgba;
use crate::viewport::resize_to_display;

pub fn acquire_context(canvas: &HtmlCanvasElement) -> Result<GL> {
    canvas
        .get_context("webgl2")?
        .ok_or(RippleError::ContextUnavailable)?
        .dyn_into::<GL>()
        .map_err(|_| RippleError::ContextUnavailable)
}

pub enum RenderTarget<'a> {
    Screen,
    Offscreen(&'a Framebuffer),
}

pub struct SamplerBinding<'a> {
    pub unit: u32,
    pub texture: &'a Texture,
    pub location: Option<&'a WebGlUniformLocation>,
}

/// Everything a single indexed draw reads, passed explicitly rather than left
/// bound on the context between calls.
pub struct DrawCall<'a> {
    pub target: RenderTarget<'a>,
    pub clear: Option<Rgba>,
    pub program: &'a ShaderProgram,
    pub mesh: &'a Mesh,
    pub samplers: &'a [SamplerBinding<'a>],
    pub stamp_offset: [f32; 2],
}

pub fn execute(gl: &GL, call: &DrawCall<'_>) {
    let (width, height) = match call.target {
        RenderTarget::Screen => {
            gl.bind_framebuffer(GL::FRAMEBUFFER, None);
            (gl.drawing_buffer_width(), gl.drawing_buffer_height())
        }
        RenderTarget::Offscreen(fb) => {
            gl.bind_framebuffer(GL::FRAMEBUFFER, Some(fb.handle()));
            let (w, h) = fb.size();
            (w as i32, h as i32)
        }
    };
    gl.viewport(0, 0, width, height);

    if let Some(color) = call.clear {
        let [r, g, b, a] = color.to_unit();
        gl.clear_color(r, g, b, a);
        gl.clear(GL::COLOR_BUFFER_BIT);
    }

    gl.use_program(Some(call.program.handle()));
    let interface = call.program.interface();

    for sampler in call.samplers {
        gl.active_texture(GL::TEXTURE0 + sampler.unit);
        gl.bind_texture(GL::TEXTURE_2D, Some(sampler.texture.handle()));
        if let Some(location) = sampler.location {
            gl.uniform1i(Some(location), sampler.unit as i32);
        }
    }
    if let Some(location) = &interface.stamp_offset {
        gl.uniform2f(Some(location), call.stamp_offset[0], call.stamp_offset[1]);
    }

    // Already reported when the program was loaded.
    if let Some(position) = interface.vertex_position {
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(call.mesh.position_buffer()));
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(call.mesh.index_buffer()));
        gl.enable_vertex_attrib_array(position);
        gl.vertex_attrib_pointer_with_i32(position, 2, GL::FLOAT, false, 0, 0);
        gl.draw_elements_with_i32(
            GL::TRIANGLES,
            call.mesh.index_count(),
            GL::UNSIGNED_SHORT,
            0,
        );
    }

    if let RenderTarget::Offscreen(_) = call.target {
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
    }
}

/// All GPU state the ripple effect needs, created once and owned by the
/// frame loop.
pub struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: ShaderProgram,
    quad: Mesh,
    stamp: Mesh,
    heights: HeightMaps,
    background: Texture,
    clear_color: Rgba,
}

impl Renderer {
    pub fn new(
        gl: GL,
        canvas: HtmlCanvasElement,
        program: ShaderProgram,
        background: Texture,
        config: &RippleConfig,
    ) -> Result<Self> {
        let quad = create_mesh(&gl, &QUAD)?;
        let stamp = create_mesh(&gl, &STAMP)?;
        let heights = HeightMaps::new(&gl, config.height_map_size)?;
        Ok(Self {
            gl,
            canvas,
            program,
            quad,
            stamp,
            heights,
            background,
            clear_color: config.clear_color,
        })
    }

    pub fn gl(&self) -> &GL {
        &self.gl
    }

    pub fn heights(&self) -> &HeightMaps {
        &self.heights
    }

    pub fn stamp(&self) -> &Mesh {
        &self.stamp
    }

    /// Renders the stamp into the offscreen height map.
    pub fn update_scene(&self, stamp_offset: [f32; 2]) {
        let interface = self.program.interface();
        let samplers = [
            SamplerBinding {
                unit: 0,
                texture: self.heights.update_source(),
                location: interface.height_sampler.as_ref(),
            },
            SamplerBinding {
                unit: 1,
                texture: &self.background,
                location: interface.background_sampler.as_ref(),
            },
        ];
        execute(
            &self.gl,
            &DrawCall {
                target: RenderTarget::Offscreen(self.heights.update_target()),
                clear: None,
                program: &self.program,
                mesh: &self.stamp,
                samplers: &samplers,
                stamp_offset,
            },
        );
    }

    /// Clears the canvas and composites the height map over the background.
    pub fn draw_scene(&self) {
        let interface = self.program.interface();
        let samplers = [
            SamplerBinding {
                unit: 0,
                texture: self.heights.draw_source(),
                location: interface.height_sampler.as_ref(),
            },
            SamplerBinding {
                unit: 1,
                texture: &self.background,
                location: interface.background_sampler.as_ref(),
            },
        ];
        execute(
            &self.gl,
            &DrawCall {
                target: RenderTarget::Screen,
                clear: Some(self.clear_color),
                program: &self.program,
                mesh: &self.quad,
                samplers: &samplers,
                stamp_offset: [0.0, 0.0],
            },
        );
    }
}

impl FramePasses for Renderer {
    fn resize(&mut self) -> bool {
        resize_to_display(&mut self.canvas)
    }

    fn update(&mut self, stamp_offset: [f32; 2]) {
        self.update_scene(stamp_offset);
    }

    fn draw(&mut self) {
        self.draw_scene();
    }
}

/// Loads the shaders and background, builds the renderer and starts the
/// animation loop. `gl` must come from `canvas`.
pub async fn launch(
    gl: GL,
    canvas: HtmlCanvasElement,
    config: RippleConfig,
    status: FrameStatus,
) -> Result<()> {
    let stamps = StampInput::new();
    listen_for_stamps(&canvas, stamps.clone())?;

    status.set(FrameState::Loading);
    let vertex_source = request_file(&config.vertex_shader_url).await?;
    let fragment_source = request_file(&config.fragment_shader_url).await?;
    let program = load_shader_program(
        &gl,
        &vertex_source,
        &fragment_source,
        InterfaceCheck::for_build(),
    )?;
    let background = load_image(&gl, &config.background_url)
        .await
        .inspect_err(|err| {
            if let RippleError::ImageDecode { url, .. } = err {
                log::error!("no usable background at {url}; add one or set `data-background`");
            }
        })?;

    let renderer = Renderer::new(gl, canvas, program, background, &config)?;
    log::info!("ripple renderer ready");
    start(FrameDriver::new(renderer, stamps, status))
}

/// Clicks anywhere on the page move the stamp to the clicked point.
fn listen_for_stamps(canvas: &HtmlCanvasElement, stamps: StampInput) -> Result<()> {
    let document = window()
        .and_then(|w| w.document())
        .ok_or_else(|| RippleError::MissingElement("document".into()))?;

    let on_click = {
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = (event.client_x() as f64, event.client_y() as f64);
            log::debug!("click at ({x}, {y})");
            let rect = canvas.get_bounding_client_rect();
            let rect = ClientRect {
                left: rect.left(),
                top: rect.top(),
                width: rect.width(),
                height: rect.height(),
            };
            if let Some(position) = client_to_clip(x, y, rect) {
                stamps.set(position);
            }
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

/// Drives `driver` from `requestAnimationFrame` until the page goes away.
pub fn start(mut driver: FrameDriver<Renderer>) -> Result<()> {
    let window = window().ok_or_else(|| RippleError::MissingElement("window".into()))?;

    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let frame_window = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now_ms = js_sys::Date::now() as u64;
        if let FrameOutcome::Primed = driver.on_animation_frame(now_ms) {
            log::debug!("animation clock started at {now_ms}");
        }

        // schedule next
        let next = f.borrow();
        let Some(callback) = next.as_ref() else {
            return;
        };
        if let Err(err) = frame_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            log::error!("stopping render loop: {}", RippleError::from(err));
        }
    }) as Box<dyn FnMut()>));

    let first = g.borrow();
    if let Some(callback) = first.as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
