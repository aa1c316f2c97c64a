//! Packed 32-bit ARGB pixels and their linear float counterpart
//!
//! Pixels are stored as `0xAARRGGBB` in a `u32`, which is the little-endian
//! BGRA byte order the true-color drawers consume.

use std::ops::{Add, Mul, Sub};

/// Exponent used to move between stored 8-bit values and linear light
pub const GAMMA: f32 = 2.2;

/// Alpha channel (bits 31-24)
#[inline]
pub const fn alpha(c: u32) -> u32 {
    (c >> 24) & 0xff
}

/// Red channel (bits 23-16)
#[inline]
pub const fn red(c: u32) -> u32 {
    (c >> 16) & 0xff
}

/// Green channel (bits 15-8)
#[inline]
pub const fn green(c: u32) -> u32 {
    (c >> 8) & 0xff
}

/// Blue channel (bits 7-0)
#[inline]
pub const fn blue(c: u32) -> u32 {
    c & 0xff
}

/// Pack 8-bit channels into `0xAARRGGBB`
#[inline]
pub const fn pack(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Build a packed pixel from RGBA bytes (the `image` crate's channel order)
#[inline]
pub const fn from_rgba(rgba: [u8; 4]) -> u32 {
    pack(rgba[3] as u32, rgba[0] as u32, rgba[1] as u32, rgba[2] as u32)
}

/// Split a packed pixel into RGBA bytes
#[inline]
pub const fn to_rgba(c: u32) -> [u8; 4] {
    [red(c) as u8, green(c) as u8, blue(c) as u8, alpha(c) as u8]
}

/// Linear-light color with one float per channel, alpha included
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color4f {
    pub a: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color4f {
    pub const ZERO: Color4f = Color4f { a: 0.0, r: 0.0, g: 0.0, b: 0.0 };

    /// Decode a stored pixel to linear light: `(value / 255) ^ 2.2` per channel
    pub fn from_bgra(c: u32) -> Self {
        let decode = |v: u32| (v as f32 * (1.0 / 255.0)).powf(GAMMA);
        Self {
            a: decode(alpha(c)),
            r: decode(red(c)),
            g: decode(green(c)),
            b: decode(blue(c)),
        }
    }

    /// Encode back to a stored pixel: `round(clamp(c ^ (1 / 2.2)) * 255)` per channel
    ///
    /// Negative channels (sharpen overshoot) are clamped to zero before the
    /// power so they encode as black instead of NaN.
    pub fn to_bgra(self) -> u32 {
        let encode = |v: f32| -> u32 {
            (v.max(0.0).powf(1.0 / GAMMA) * 255.0 + 0.5).clamp(0.0, 255.0) as u32
        };
        pack(encode(self.a), encode(self.r), encode(self.g), encode(self.b))
    }
}

impl Add for Color4f {
    type Output = Color4f;

    fn add(self, v: Color4f) -> Color4f {
        Color4f { a: self.a + v.a, r: self.r + v.r, g: self.g + v.g, b: self.b + v.b }
    }
}

impl Sub for Color4f {
    type Output = Color4f;

    fn sub(self, v: Color4f) -> Color4f {
        Color4f { a: self.a - v.a, r: self.r - v.r, g: self.g - v.g, b: self.b - v.b }
    }
}

impl Mul<f32> for Color4f {
    type Output = Color4f;

    fn mul(self, s: f32) -> Color4f {
        Color4f { a: self.a * s, r: self.r * s, g: self.g * s, b: self.b * s }
    }
}
