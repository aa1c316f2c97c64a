//! Palette mapping for the indexed (column drawer) representation
//!
//! Index 0 is reserved for fully transparent pixels, the same convention
//! the span builder uses to detect holes in indexed textures.

use serde::{Deserialize, Serialize};

use super::bgra::{alpha, blue, green, pack, red};

/// Palette index that marks a fully transparent pixel
pub const TRANSPARENT_INDEX: u8 = 0;

/// Converts a true-color pixel to a palette index
///
/// Mappers are trusted: whatever index they return is written to the
/// indexed buffer unexamined.
pub trait PaletteMapper {
    fn map_color(&self, argb: u32) -> u8;
}

impl<F> PaletteMapper for F
where
    F: Fn(u32) -> u8,
{
    fn map_color(&self, argb: u32) -> u8 {
        self(argb)
    }
}

/// A color lookup table of up to 256 RGB entries
///
/// Entry 0 is the transparent slot and never matches an opaque pixel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Create a palette from RGB entries (entry 0 is the transparent slot)
    pub fn new(colors: Vec<[u8; 3]>) -> Self {
        let mut colors = colors;
        colors.truncate(256);
        Self { colors }
    }

    /// Grayscale ramp with `count` entries, index 0 transparent
    pub fn grayscale(count: usize) -> Self {
        let count = count.clamp(2, 256);
        let mut colors = Vec::with_capacity(count);
        colors.push([0, 0, 0]);
        for i in 1..count {
            let v = ((i * 255) / (count - 1)) as u8;
            colors.push([v, v, v]);
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Look up an index as a packed ARGB pixel (index 0 and out-of-range are transparent)
    pub fn lookup(&self, index: u8) -> u32 {
        if index == TRANSPARENT_INDEX {
            return 0;
        }
        match self.colors.get(index as usize) {
            Some(&[r, g, b]) => pack(255, r as u32, g as u32, b as u32),
            None => 0,
        }
    }

    /// Find the nearest opaque entry (index >= 1) to an RGB color
    ///
    /// Returns the transparent index if the palette has no opaque entries.
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> u8 {
        let mut best_idx = TRANSPARENT_INDEX;
        let mut best_dist = u32::MAX;

        for (i, color) in self.colors.iter().enumerate().skip(1) {
            let dr = (r as i32 - color[0] as i32).unsigned_abs();
            let dg = (g as i32 - color[1] as i32).unsigned_abs();
            let db = (b as i32 - color[2] as i32).unsigned_abs();

            // Weighted distance (green is more perceptually important)
            let dist = dr * dr + dg * dg * 2 + db * db;

            if dist < best_dist {
                best_dist = dist;
                best_idx = i as u8;
            }

            if dist == 0 {
                break;
            }
        }

        best_idx
    }
}

impl PaletteMapper for Palette {
    fn map_color(&self, argb: u32) -> u8 {
        if alpha(argb) == 0 {
            return TRANSPARENT_INDEX;
        }
        self.nearest(red(argb) as u8, green(argb) as u8, blue(argb) as u8)
    }
}
