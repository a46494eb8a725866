use js_sys::{Float32Array, Uint16Array};
use web_sys::{WebGl2RenderingContext as GL, WebGlBuffer};

use crate::error::{Result, RippleError};
use crate::geometry::MeshData;

/// Position and index buffers, uploaded once.
pub struct Mesh {
    position_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

impl Mesh {
    pub fn position_buffer(&self) -> &WebGlBuffer {
        &self.position_buffer
    }

    pub fn index_buffer(&self) -> &WebGlBuffer {
        &self.index_buffer
    }

    pub fn index_count(&self) -> i32 {
        self.index_count
    }
}

pub fn create_mesh(gl: &GL, data: &MeshData<'_>) -> Result<Mesh> {
    debug_assert!(data.indices_in_range(), "mesh index out of range");

    let position_buffer = gl
        .create_buffer()
        .ok_or(RippleError::ResourceCreation("position buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&position_buffer));
    let positions = Float32Array::from(data.flat_positions().as_slice());
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &positions, GL::STATIC_DRAW);

    let index_buffer = gl
        .create_buffer()
        .ok_or(RippleError::ResourceCreation("index buffer"))?;
    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
    let indices = Uint16Array::from(data.indices);
    gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &indices, GL::STATIC_DRAW);

    gl.bind_buffer(GL::ARRAY_BUFFER, None);

    Ok(Mesh {
        position_buffer,
        index_buffer,
        index_count: data.index_count() as i32,
    })
}
