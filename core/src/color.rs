//! Linear RGBA color.

/// RGBA color with float channels in `[0, 1]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Create a color from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as an `[r, g, b, a]` array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Pack the color as ABGR8888 and reinterpret the bits as a float.
    ///
    /// Bit 24 is cleared so the packed value can never be a NaN, which some
    /// drivers canonicalize when the float is copied to the GPU.
    pub fn to_packed_float(self) -> f32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u32;
        let bits = (channel(self.a) << 24)
            | (channel(self.b) << 16)
            | (channel(self.g) << 8)
            | channel(self.r);
        f32::from_bits(bits & 0xfeff_ffff)
    }
}

impl From<[f32; 4]> for Color {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}
