#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL};

use ripple_wasm::config::RippleConfig;
use ripple_wasm::error::{RippleError, ShaderStage};
use ripple_wasm::geometry::{QUAD, STAMP};
use ripple_wasm::texels::{Rgba, HEIGHT_MAP_SIZE};
use ripple_wasm::wasm::mesh::create_mesh;
use ripple_wasm::wasm::program::{load_shader_program, InterfaceCheck, ShaderProgram};
use ripple_wasm::wasm::render::{acquire_context, execute, DrawCall, RenderTarget, Renderer};
use ripple_wasm::wasm::texture::{
    create_framebuffer, create_height_texture, read_framebuffer, HeightMaps,
};

wasm_bindgen_test_configure!(run_in_browser);

const PASS_VERT: &str = r#"#version 300 es
in vec2 vertexPosition;
uniform vec2 stampOffset;
out vec2 uv;
void main() {
    uv = vertexPosition * 0.5 + 0.5;
    gl_Position = vec4(vertexPosition + stampOffset, 0.0, 1.0);
}
"#;

// Red from the height map, green from the background.
const PASS_FRAG: &str = r#"#version 300 es
precision mediump float;
in vec2 uv;
uniform sampler2D heightSampler;
uniform sampler2D backgroundSampler;
out vec4 fragColor;
void main() {
    fragColor = vec4(texture(heightSampler, uv).r, texture(backgroundSampler, uv).g, 0.0, 1.0);
}
"#;

const HEIGHT_ONLY_FRAG: &str = r#"#version 300 es
precision mediump float;
in vec2 uv;
uniform sampler2D heightSampler;
out vec4 fragColor;
void main() {
    fragColor = texture(heightSampler, uv);
}
"#;

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
}

fn context(width: u32, height: u32) -> (HtmlCanvasElement, GL) {
    let canvas = canvas(width, height);
    let gl = acquire_context(&canvas).expect("WebGL2 context");
    (canvas, gl)
}

fn pass_through(gl: &GL) -> ShaderProgram {
    load_shader_program(gl, PASS_VERT, PASS_FRAG, InterfaceCheck::Strict).unwrap()
}

fn texel(pixels: &[u8], size: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * size + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

/// Renderer over a `width`×`height` canvas whose background is a white
/// height-sized texture.
fn renderer(width: u32, height: u32) -> Renderer {
    let (canvas, gl) = context(width, height);
    let program = pass_through(&gl);
    let background = create_height_texture(&gl, 4, Rgba::WHITE).unwrap();
    Renderer::new(gl, canvas, program, background, &RippleConfig::default()).unwrap()
}

#[wasm_bindgen_test]
fn valid_program_links_and_resolves_interface() {
    let (_canvas, gl) = context(2, 2);
    let program = pass_through(&gl);
    assert!(program.link_status(&gl));
    let interface = program.interface();
    assert!(interface.vertex_position.is_some());
    assert!(interface.height_sampler.is_some());
    assert!(interface.background_sampler.is_some());
    assert!(interface.stamp_offset.is_some());
}

#[wasm_bindgen_test]
fn broken_fragment_reports_compile_log() {
    let (_canvas, gl) = context(2, 2);
    let broken = "#version 300 es\nprecision mediump float;\nvoid main() { nope }\n";
    match load_shader_program(&gl, PASS_VERT, broken, InterfaceCheck::Strict) {
        Err(RippleError::ShaderCompile { stage, log }) => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(!log.is_empty());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("broken fragment shader compiled"),
    }
}

#[wasm_bindgen_test]
fn mismatched_varyings_report_link_log() {
    let (_canvas, gl) = context(2, 2);
    let frag = r#"#version 300 es
precision mediump float;
in vec3 uv;
uniform sampler2D heightSampler;
uniform sampler2D backgroundSampler;
out vec4 fragColor;
void main() {
    fragColor = vec4(texture(heightSampler, uv.xy).r, texture(backgroundSampler, uv.xy).g, uv.z, 1.0);
}
"#;
    match load_shader_program(&gl, PASS_VERT, frag, InterfaceCheck::Strict) {
        Err(RippleError::ShaderLink { program_log, .. }) => assert!(!program_log.is_empty()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("mismatched program linked"),
    }
}

#[wasm_bindgen_test]
fn missing_uniform_depends_on_check() {
    let (_canvas, gl) = context(2, 2);
    match load_shader_program(&gl, PASS_VERT, HEIGHT_ONLY_FRAG, InterfaceCheck::Strict) {
        Err(RippleError::MissingUniform(name)) => assert_eq!(name, "backgroundSampler"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("strict check accepted a missing uniform"),
    }

    let program =
        load_shader_program(&gl, PASS_VERT, HEIGHT_ONLY_FRAG, InterfaceCheck::Lenient).unwrap();
    assert!(program.link_status(&gl));
    assert!(program.interface().background_sampler.is_none());
    assert!(program.interface().height_sampler.is_some());
}

#[wasm_bindgen_test]
fn mesh_buffers_hold_uploaded_sizes() {
    let (_canvas, gl) = context(2, 2);
    for data in [QUAD, STAMP] {
        let mesh = create_mesh(&gl, &data).unwrap();
        assert_eq!(mesh.index_count() as usize, data.index_count());

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(mesh.position_buffer()));
        let bytes = gl.get_buffer_parameter(GL::ARRAY_BUFFER, GL::BUFFER_SIZE);
        assert_eq!(bytes.as_f64(), Some(data.vertex_bytes() as f64));

        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(mesh.index_buffer()));
        let bytes = gl.get_buffer_parameter(GL::ELEMENT_ARRAY_BUFFER, GL::BUFFER_SIZE);
        assert_eq!(bytes.as_f64(), Some(data.index_bytes() as f64));
    }
    assert_eq!(QUAD.vertex_bytes(), 32);
    assert_eq!(QUAD.index_bytes(), 12);
}

#[wasm_bindgen_test]
fn height_maps_start_with_constant_fills() {
    let (_canvas, gl) = context(2, 2);
    let heights = HeightMaps::new(&gl, HEIGHT_MAP_SIZE).unwrap();
    let size = HEIGHT_MAP_SIZE;

    let a_target = create_framebuffer(&gl, heights.update_source()).unwrap();
    let a = read_framebuffer(&gl, Some(&a_target), size, size).unwrap();
    assert!(a.chunks_exact(4).all(|px| px == Rgba::WHITE.0));

    let b = read_framebuffer(&gl, Some(heights.update_target()), size, size).unwrap();
    assert!(b.chunks_exact(4).all(|px| px == Rgba::OPAQUE_BLACK.0));
    assert_eq!(heights.draw_source().size(), (size, size));
}

#[wasm_bindgen_test]
fn update_bakes_stamp_into_height_b_only() {
    let renderer = renderer(2, 2);
    let gl = renderer.gl();
    let size = HEIGHT_MAP_SIZE;
    renderer.update_scene([0.0, 0.0]);

    let b = read_framebuffer(gl, Some(renderer.heights().update_target()), size, size).unwrap();
    // Inside the triangle: red from white heightA, green from the background.
    assert_eq!(texel(&b, size, 128, 128), [255, 255, 0, 255]);
    assert_eq!(texel(&b, size, 0, 0), Rgba::OPAQUE_BLACK.0);
    assert_eq!(texel(&b, size, 255, 255), Rgba::OPAQUE_BLACK.0);

    let a_target = create_framebuffer(gl, renderer.heights().update_source()).unwrap();
    let a = read_framebuffer(gl, Some(&a_target), size, size).unwrap();
    assert!(a.chunks_exact(4).all(|px| px == Rgba::WHITE.0));
}

#[wasm_bindgen_test]
fn stamp_offset_moves_the_stamp() {
    let renderer = renderer(2, 2);
    let size = HEIGHT_MAP_SIZE;
    renderer.update_scene([0.9, 0.9]);

    let b = read_framebuffer(
        renderer.gl(),
        Some(renderer.heights().update_target()),
        size,
        size,
    )
    .unwrap();
    assert_eq!(texel(&b, size, 128, 128), Rgba::OPAQUE_BLACK.0);
    assert_eq!(texel(&b, size, 243, 204), [255, 255, 0, 255]);
}

#[wasm_bindgen_test]
fn update_then_draw_covers_every_pixel() {
    let renderer = renderer(2, 2);
    renderer.update_scene([0.0, 0.0]);
    renderer.draw_scene();

    let pixels = read_framebuffer(renderer.gl(), None, 2, 2).unwrap();
    for px in pixels.chunks_exact(4) {
        assert_ne!(px, Rgba::SKY_BLUE.0);
        // Green always comes from the white background.
        assert_eq!(px[1], 255);
        assert_eq!(px[3], 255);
    }
}

#[wasm_bindgen_test]
fn uncovered_pixels_keep_the_clear_color() {
    let renderer = renderer(2, 2);
    let gl = renderer.gl();
    let program = pass_through(gl);
    execute(
        gl,
        &DrawCall {
            target: RenderTarget::Screen,
            clear: Some(Rgba::SKY_BLUE),
            program: &program,
            mesh: renderer.stamp(),
            samplers: &[],
            // Far outside clip space.
            stamp_offset: [5.0, 5.0],
        },
    );

    let pixels = read_framebuffer(gl, None, 2, 2).unwrap();
    for px in pixels.chunks_exact(4) {
        assert_eq!(px, Rgba::SKY_BLUE.0);
    }
}

#[wasm_bindgen_test]
fn missing_vertex_position_skips_the_draw() {
    // A full-screen triangle built from gl_VertexID, so any draw would be seen.
    let vert = r#"#version 300 es
void main() {
    float x = float((gl_VertexID & 1) << 2) - 1.0;
    float y = float((gl_VertexID & 2) << 1) - 1.0;
    gl_Position = vec4(x, y, 0.0, 1.0);
}
"#;
    let frag = r#"#version 300 es
precision mediump float;
out vec4 fragColor;
void main() {
    fragColor = vec4(1.0, 0.0, 0.0, 1.0);
}
"#;
    let renderer = renderer(2, 2);
    let gl = renderer.gl();
    assert!(matches!(
        load_shader_program(gl, vert, frag, InterfaceCheck::Strict),
        Err(RippleError::MissingAttribute("vertexPosition"))
    ));

    let program = load_shader_program(gl, vert, frag, InterfaceCheck::Lenient).unwrap();
    assert!(program.interface().vertex_position.is_none());
    execute(
        gl,
        &DrawCall {
            target: RenderTarget::Screen,
            clear: Some(Rgba::SKY_BLUE),
            program: &program,
            mesh: renderer.stamp(),
            samplers: &[],
            stamp_offset: [0.0, 0.0],
        },
    );

    let pixels = read_framebuffer(gl, None, 2, 2).unwrap();
    for px in pixels.chunks_exact(4) {
        assert_eq!(px, Rgba::SKY_BLUE.0);
    }
}
