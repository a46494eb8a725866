//! 8-bit RGBA colors and constant-fill pixel data for the height maps.

/// Side length of both height maps, in texels.
pub const HEIGHT_MAP_SIZE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Initial contents of `heightA`.
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);
    /// Initial contents of `heightB`.
    pub const OPAQUE_BLACK: Rgba = Rgba([0, 0, 0, 255]);
    /// Visible-surface clear color, (0.529, 0.808, 0.922, 1.0).
    pub const SKY_BLUE: Rgba = Rgba([135, 206, 235, 255]);

    /// Quantizes normalized channels to 8 bits, clamping to `[0, 1]`.
    pub fn from_unit(r: f32, g: f32, b: f32, a: f32) -> Rgba {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([q(r), q(g), q(b), q(a)])
    }

    /// Normalized channels, as `clearColor` wants them.
    pub fn to_unit(self) -> [f32; 4] {
        self.0.map(|c| c as f32 / 255.0)
    }
}

/// Tightly packed RGBA8 rows for a `size`×`size` image of one color.
pub fn fill_texels(size: u32, color: Rgba) -> Vec<u8> {
    let texels = (size as usize) * (size as usize);
    let mut data = Vec::with_capacity(texels * 4);
    for _ in 0..texels {
        data.extend_from_slice(&color.0);
    }
    data
}
