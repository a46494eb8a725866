use web_sys::{HtmlImageElement, WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlTexture};

use crate::error::{Result, RippleError};
use crate::texels::{fill_texels, Rgba};

pub struct Texture {
    handle: WebGlTexture,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn handle(&self) -> &WebGlTexture {
        &self.handle
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Allocates a `size`×`size` nearest-filtered, edge-clamped texture filled
/// with `fill`.
pub fn create_height_texture(gl: &GL, size: u32, fill: Rgba) -> Result<Texture> {
    let handle = gl
        .create_texture()
        .ok_or(RippleError::ResourceCreation("texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&handle));

    let pixels = fill_texels(size, fill);
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        size as i32,
        size as i32,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&pixels),
    )?;
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::NEAREST as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::NEAREST as i32);
    clamp_to_edge(gl);

    Ok(Texture {
        handle,
        width: size,
        height: size,
    })
}

/// Uploads a decoded image as a clamped, linearly minified texture.
pub fn texture_from_image(gl: &GL, image: &HtmlImageElement) -> Result<Texture> {
    let handle = gl
        .create_texture()
        .ok_or(RippleError::ResourceCreation("texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&handle));
    gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        image,
    )?;
    clamp_to_edge(gl);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);

    Ok(Texture {
        handle,
        width: image.natural_width(),
        height: image.natural_height(),
    })
}

fn clamp_to_edge(gl: &GL) {
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
}

/// Offscreen render target with a single texture as color attachment 0.
pub struct Framebuffer {
    handle: WebGlFramebuffer,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn handle(&self) -> &WebGlFramebuffer {
        &self.handle
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub fn create_framebuffer(gl: &GL, color_target: &Texture) -> Result<Framebuffer> {
    let handle = gl
        .create_framebuffer()
        .ok_or(RippleError::ResourceCreation("framebuffer"))?;
    gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&handle));
    gl.framebuffer_texture_2d(
        GL::FRAMEBUFFER,
        GL::COLOR_ATTACHMENT0,
        GL::TEXTURE_2D,
        Some(color_target.handle()),
        0,
    );
    let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
    gl.bind_framebuffer(GL::FRAMEBUFFER, None);
    if status != GL::FRAMEBUFFER_COMPLETE {
        return Err(RippleError::IncompleteFramebuffer(status));
    }

    let (width, height) = color_target.size();
    Ok(Framebuffer {
        handle,
        width,
        height,
    })
}

/// Reads a `width`×`height` block of RGBA8 pixels from `framebuffer`, or
/// from the canvas when `None`. Rows come back bottom first.
pub fn read_framebuffer(
    gl: &GL,
    framebuffer: Option<&Framebuffer>,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
    gl.bind_framebuffer(GL::FRAMEBUFFER, framebuffer.map(Framebuffer::handle));
    let read = gl.read_pixels_with_opt_u8_array(
        0,
        0,
        width as i32,
        height as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&mut pixels),
    );
    gl.bind_framebuffer(GL::FRAMEBUFFER, None);
    read?;
    Ok(pixels)
}

/// The two height maps and the render target that writes one of them.
///
/// Roles are fixed: updates read `height_a` and write `height_b`, the
/// composite samples `height_b`. Nothing ever writes `height_a`.
pub struct HeightMaps {
    height_a: Texture,
    height_b: Texture,
    framebuffer: Framebuffer,
}

impl HeightMaps {
    /// `heightA` starts white, `heightB` opaque black.
    pub fn new(gl: &GL, size: u32) -> Result<Self> {
        let height_a = create_height_texture(gl, size, Rgba::WHITE)?;
        let height_b = create_height_texture(gl, size, Rgba::OPAQUE_BLACK)?;
        let framebuffer = create_framebuffer(gl, &height_b)?;
        Ok(Self {
            height_a,
            height_b,
            framebuffer,
        })
    }

    pub fn update_source(&self) -> &Texture {
        &self.height_a
    }

    pub fn update_target(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn draw_source(&self) -> &Texture {
        &self.height_b
    }
}
