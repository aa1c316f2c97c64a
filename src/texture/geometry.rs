//! Power-of-two bit sizes used for column wrapping
//!
//! `width_bits` rounds down and `height_bits` rounds up. Rounding the width
//! down means `1 << width_bits` never exceeds the texture width, so a masked
//! column index can never land past the last column, even if it means parts
//! of a non-power-of-two texture are unreachable through the mask.

use crate::error::TextureError;

/// Bit widths and masks derived from a texture's physical size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureGeometry {
    width: usize,
    height: usize,
    width_bits: u32,
    width_mask: usize,
    height_bits: u32,
}

impl TextureGeometry {
    /// Derive the geometry for a `width` x `height` texture
    ///
    /// Zero-sized textures are rejected; every later size computation
    /// assumes both dimensions are at least 1.
    pub fn new(width: usize, height: usize) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }

        let mut width_bits = 0u32;
        while (1usize << width_bits) < width {
            width_bits += 1;
        }
        if width < (1usize << width_bits) {
            width_bits -= 1;
        }

        let mut height_bits = 0u32;
        while (1usize << height_bits) < height {
            height_bits += 1;
        }

        Ok(Self {
            width,
            height,
            width_bits,
            width_mask: (1usize << width_bits) - 1,
            height_bits,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// floor(log2(width))
    #[inline]
    pub fn width_bits(&self) -> u32 {
        self.width_bits
    }

    /// `(1 << width_bits) - 1`
    #[inline]
    pub fn width_mask(&self) -> usize {
        self.width_mask
    }

    /// ceil(log2(height))
    #[inline]
    pub fn height_bits(&self) -> u32 {
        self.height_bits
    }

    /// True when the width is an exact power of two and masking is a valid wrap
    #[inline]
    pub fn is_power_of_two_width(&self) -> bool {
        self.width_mask + 1 == self.width
    }

    /// Bring any column index into `0..width`
    ///
    /// Power-of-two widths wrap with the mask; other widths need a real
    /// modulo because the mask would skip the trailing columns.
    #[inline]
    pub fn wrap_column(&self, column: usize) -> usize {
        if column < self.width {
            column
        } else if self.is_power_of_two_width() {
            column & self.width_mask
        } else {
            column % self.width
        }
    }
}
