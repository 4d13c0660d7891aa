//! Color value object - RGBA color representation
//!
//! Components are f32 in the 0.0-1.0 range for Direct2D compatibility.

/// RGBA color (0.0-1.0 range for D2D compatibility)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Quantize back to 8-bit components (a, r, g, b)
    pub fn to_argb8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.a), q(self.r), q(self.g), q(self.b)]
    }
}
