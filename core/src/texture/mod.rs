//! Texture-space helpers.
//!
//! The mesh builder never samples textures; it only needs the UV rectangle of
//! an atlas region to map rectangle and patch corners.

/// A UV rectangle inside a texture atlas.
///
/// `(u, v)` is the top-left corner and `(u2, v2)` the bottom-right corner,
/// both in normalized texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
}

impl TextureRegion {
    /// The whole texture.
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(u: f32, v: f32, u2: f32, v2: f32) -> Self {
        Self { u, v, u2, v2 }
    }

    /// Region covering the pixel rectangle `(x, y, width, height)` of a
    /// `texture_width` x `texture_height` texture.
    pub fn from_pixels(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        texture_width: u32,
        texture_height: u32,
    ) -> Self {
        let inv_w = 1.0 / texture_width.max(1) as f32;
        let inv_h = 1.0 / texture_height.max(1) as f32;
        Self::new(
            x as f32 * inv_w,
            y as f32 * inv_h,
            (x + width) as f32 * inv_w,
            (y + height) as f32 * inv_h,
        )
    }
}

impl Default for TextureRegion {
    fn default() -> Self {
        Self::FULL
    }
}
