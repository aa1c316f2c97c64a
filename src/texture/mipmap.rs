//! Mipmap chain for the true-color texture mapper
//!
//! All levels live in one flat column-major `Vec<u32>`: level 0 first, each
//! following level directly after the previous one. Level `i` is
//! `max(width >> i, 1)` x `max(height >> i, 1)`.
//!
//! Two generators fill levels 1..:
//! - **Quality**: decode to linear light (`^2.2`), 2x2 box average, unsharp
//!   mask against a wrapping 3x3 blur, encode back (`^(1/2.2)`). Averaging in
//!   linear light keeps minified textures from darkening; the sharpen offsets
//!   the blur that piles up over many box-filtered levels.
//! - **Fast**: 2x2 box average directly on the stored 8-bit channels with
//!   round-half-up. Visibly darker on high-contrast content.
//!
//! Both read the 2x2 footprint `{2x, min(2x+1, w-1)} x {2y, min(2y+1, h-1)}`,
//! so odd-sized levels repeat their last row/column instead of reading past it.

use crate::color::bgra::{alpha, blue, green, pack, red};
use crate::color::Color4f;
use crate::settings::{MipmapFilter, TextureSettings};

/// Number of mip levels for a texture
///
/// Counts right shifts until the larger dimension reaches zero, i.e. the
/// bit length of the larger dimension. For 17x5 that is 5 levels.
pub fn mipmap_levels(width: usize, height: usize) -> usize {
    let mut widthbits = 0;
    while (width >> widthbits) != 0 {
        widthbits += 1;
    }

    let mut heightbits = 0;
    while (height >> heightbits) != 0 {
        heightbits += 1;
    }

    widthbits.max(heightbits)
}

/// Position and size of one level inside a [`MipChain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    /// Offset in pixels from the start of the chain
    pub offset: usize,
    pub width: usize,
    pub height: usize,
}

impl MipLevel {
    /// Pixel count of this level
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel range of this level inside the chain
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len()
    }
}

/// Offsets and sizes of every level for a `width` x `height` base
pub fn mip_layout(width: usize, height: usize) -> Vec<MipLevel> {
    let mut offset = 0;
    (0..mipmap_levels(width, height))
        .map(|i| {
            let level = MipLevel {
                offset,
                width: (width >> i).max(1),
                height: (height >> i).max(1),
            };
            offset += level.len();
            level
        })
        .collect()
}

/// A full mip chain in one allocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MipChain {
    pixels: Vec<u32>,
    levels: Vec<MipLevel>,
}

impl MipChain {
    /// Allocate a zeroed chain for a `width` x `height` base level
    pub fn new(width: usize, height: usize) -> Self {
        let levels = mip_layout(width, height);
        let total = levels.last().map(|l| l.offset + l.len()).unwrap_or(0);
        Self {
            pixels: vec![0; total],
            levels,
        }
    }

    /// Every level's offset and size
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The whole chain; level 0 is the prefix
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixels of one level, or `None` past the last level
    pub fn level(&self, index: usize) -> Option<&[u32]> {
        self.levels.get(index).map(|l| &self.pixels[l.range()])
    }

    /// Mutable base level, filled by the transposer before generation
    pub fn base_mut(&mut self) -> &mut [u32] {
        let base = self.levels[0];
        &mut self.pixels[base.range()]
    }

    /// Run the generator selected in `settings`
    pub fn generate(&mut self, settings: &TextureSettings) {
        match settings.mipmap_filter {
            MipmapFilter::Quality => self.generate_bgra_mipmaps(settings.sharpen_amount),
            MipmapFilter::Fast => self.generate_bgra_mipmaps_fast(),
        }
    }

    /// Gamma-correct generator with sharpening
    ///
    /// Level 0 is only read; levels 1.. are overwritten.
    pub fn generate_bgra_mipmaps(&mut self, sharpen_amount: f32) {
        let base = self.levels[0];

        let mut image = vec![Color4f::ZERO; self.pixels.len()];
        for (dst, &c) in image[base.range()].iter_mut().zip(&self.pixels[base.range()]) {
            *dst = Color4f::from_bgra(c);
        }

        let mut smoothed = vec![Color4f::ZERO; base.len()];
        for i in 1..self.levels.len() {
            let src_level = self.levels[i - 1];
            let level = self.levels[i];
            log::trace!("quality mip level {}: {}x{}", i, level.width, level.height);

            let (head, tail) = image.split_at_mut(level.offset);
            let src = &head[src_level.range()];
            let dest = &mut tail[..level.len()];

            downsample(src, src_level.width, src_level.height, dest, level.width, level.height, |a, b, c, d| {
                (a + b + c + d) * 0.25
            });
            sharpen(dest, level.width, level.height, &mut smoothed[..level.len()], sharpen_amount);
        }

        for level in &self.levels[1..] {
            for j in level.range() {
                self.pixels[j] = image[j].to_bgra();
            }
        }
    }

    /// Integer generator: plain 2x2 average per 8-bit channel, no gamma, no sharpen
    pub fn generate_bgra_mipmaps_fast(&mut self) {
        for i in 1..self.levels.len() {
            let src_level = self.levels[i - 1];
            let level = self.levels[i];
            log::trace!("fast mip level {}: {}x{}", i, level.width, level.height);

            let (head, tail) = self.pixels.split_at_mut(level.offset);
            downsample(
                &head[src_level.range()],
                src_level.width,
                src_level.height,
                &mut tail[..level.len()],
                level.width,
                level.height,
                average_bgra,
            );
        }
    }
}

/// Round-half-up average of four packed pixels, per channel
fn average_bgra(a: u32, b: u32, c: u32, d: u32) -> u32 {
    let avg = |f: fn(u32) -> u32| (f(a) + f(b) + f(c) + f(d) + 2) / 4;
    pack(avg(alpha), avg(red), avg(green), avg(blue))
}

/// Halve a column-major level with a 2x2 footprint clamped to the source edge
fn downsample<T, F>(src: &[T], src_w: usize, src_h: usize, dest: &mut [T], w: usize, h: usize, average: F)
where
    T: Copy,
    F: Fn(T, T, T, T) -> T,
{
    for x in 0..w {
        let sx0 = x * 2;
        let sx1 = (x * 2 + 1).min(src_w - 1);
        for y in 0..h {
            let sy0 = y * 2;
            let sy1 = (y * 2 + 1).min(src_h - 1);

            let src00 = src[sy0 + sx0 * src_h];
            let src01 = src[sy1 + sx0 * src_h];
            let src10 = src[sy0 + sx1 * src_h];
            let src11 = src[sy1 + sx1 * src_h];

            dest[y + x * h] = average(src00, src01, src10, src11);
        }
    }
}

/// Unsharp mask: `p + (p - blur3x3(p)) * amount`
///
/// The 3x3 blur wraps around the level edges (toroidal), it does not clamp.
fn sharpen(level: &mut [Color4f], w: usize, h: usize, smoothed: &mut [Color4f], amount: f32) {
    let wrap = |v: isize, n: usize| -> usize {
        if v < 0 {
            n - 1
        } else if v as usize == n {
            0
        } else {
            v as usize
        }
    };

    for x in 0..w {
        for y in 0..h {
            let mut c = Color4f::ZERO;
            for kx in -1isize..=1 {
                for ky in -1isize..=1 {
                    let a = wrap(y as isize + ky, h);
                    let b = wrap(x as isize + kx, w);
                    c = c + level[a + b * h];
                }
            }
            smoothed[y + x * h] = c * (1.0 / 9.0);
        }
    }

    for (p, &s) in level.iter_mut().zip(smoothed.iter()) {
        *p = *p + (*p - s) * amount;
    }
}
