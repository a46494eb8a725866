//! Static mesh data in clip space, plus the pointer-to-clip-space mapping
//! used to move the stamp.

/// CPU-side description of an indexed triangle list with 2D positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshData<'a> {
    pub positions: &'a [[f32; 2]],
    pub indices: &'a [u16],
}

/// Screen-covering rectangle.
pub const QUAD: MeshData<'static> = MeshData {
    positions: &[[-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0], [1.0, 1.0]],
    indices: &[0, 1, 3, 3, 1, 2],
};

/// Small triangle baked into the height field every frame.
pub const STAMP: MeshData<'static> = MeshData {
    positions: &[[0.0, 0.5], [0.5, -0.5], [-0.5, -0.5]],
    indices: &[0, 2, 1],
};

impl MeshData<'_> {
    /// Positions as the interleaved `x, y, x, y, ...` stream the vertex
    /// buffer holds.
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Byte length of the uploaded vertex buffer.
    pub fn vertex_bytes(&self) -> usize {
        std::mem::size_of_val(self.positions)
    }

    /// Byte length of the uploaded index buffer.
    pub fn index_bytes(&self) -> usize {
        std::mem::size_of_val(self.indices)
    }

    /// True when every index names an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        self.indices
            .iter()
            .all(|&i| (i as usize) < self.positions.len())
    }
}

/// Displayed bounds of the canvas in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Maps a pointer position in client coordinates onto clip space
/// (`[-1, 1]`, y up). Returns `None` while the rect has no area.
pub fn client_to_clip(x: f64, y: f64, rect: ClientRect) -> Option<[f32; 2]> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let u = (x - rect.left) / rect.width;
    let v = (y - rect.top) / rect.height;
    Some([(u * 2.0 - 1.0) as f32, (1.0 - v * 2.0) as f32])
}
