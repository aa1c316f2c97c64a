//! Source images feeding a software texture
//!
//! The adapter never decodes files itself. It asks a [`TextureSource`] for
//! a row-major ARGB bitmap, or for a ready-made indexed buffer when no
//! scaling is involved, and watches the source's modification counter to
//! know when its caches went stale.

use image::RgbaImage;

use crate::color::bgra::{alpha, from_rgba, to_rgba};
use crate::color::{Palette, PaletteMapper};
use crate::error::TextureError;
use crate::texture::transpose::{transpose, transpose_map};

/// Which indexed representation a caller wants
///
/// Two indexed styles exist so a source can export an alternate rendition
/// (e.g. a translated or remapped palette) alongside the normal one. Each
/// style has its own cache entry and span table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexedStyle {
    #[default]
    Normal,
    Alternate,
}

impl IndexedStyle {
    pub const ALL: [IndexedStyle; 2] = [IndexedStyle::Normal, IndexedStyle::Alternate];

    /// Slot used for this style's cache and span table
    #[inline]
    pub fn index(self) -> usize {
        match self {
            IndexedStyle::Normal => 0,
            IndexedStyle::Alternate => 1,
        }
    }
}

/// Row-major 32-bit ARGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// Wrap row-major `0xAARRGGBB` pixels
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        if pixels.len() != width * height {
            return Err(TextureError::BufferSize {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Fill a new bitmap with one color
    pub fn filled(width: usize, height: usize, color: u32) -> Result<Self, TextureError> {
        Self::new(width, height, vec![color; width * height])
    }

    /// Convert from an `image` RGBA buffer
    pub fn from_rgba_image(img: &RgbaImage) -> Result<Self, TextureError> {
        let pixels = img.pixels().map(|p| from_rgba(p.0)).collect();
        Self::new(img.width() as usize, img.height() as usize, pixels)
    }

    /// Convert to an `image` RGBA buffer
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Rgba(to_rgba(self.pixels[x as usize + y as usize * self.width]))
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

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or 0 (transparent black) outside the bitmap
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.pixels[x + y * self.width]
        } else {
            0
        }
    }

    /// True if any pixel is fully transparent
    pub fn has_holes(&self) -> bool {
        self.pixels.iter().any(|&p| alpha(p) == 0)
    }

    /// Crop or pad (with transparent black) to exactly `width` x `height`
    pub fn fit_to(self, width: usize, height: usize) -> Bitmap {
        if self.width == width && self.height == height {
            return self;
        }
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(self.get_pixel(x, y));
            }
        }
        Bitmap { width, height, pixels }
    }
}

/// Producer of pixel data for one texture
pub trait TextureSource {
    /// Logical size, before any high-resolution replacement
    fn native_size(&self) -> (usize, usize);

    /// Size of the bitmap returned by [`TextureSource::true_color_bitmap`]
    fn physical_size(&self) -> (usize, usize) {
        self.native_size()
    }

    /// True when the physical bitmap is not 1:1 with the logical size
    fn is_scaled(&self) -> bool {
        self.physical_size() != self.native_size()
    }

    /// True if any pixel may be fully transparent
    fn is_masked(&self) -> bool;

    /// Increases every time the pixel data changes
    fn modification_counter(&self) -> u64;

    /// Row-major ARGB bitmap at the physical size
    fn true_color_bitmap(&self) -> Bitmap;

    /// Column-major palette indices at the native size
    ///
    /// Only requested when the source is not scaled.
    fn indexed_pixels(&self, style: IndexedStyle) -> Vec<u8>;
}

/// In-memory texture source
///
/// Holds a true-color bitmap and derives indexed pixels from it with a
/// palette, unless an explicit indexed buffer was supplied for a style.
#[derive(Debug, Clone)]
pub struct BitmapSource {
    native_width: usize,
    native_height: usize,
    bitmap: Bitmap,
    palette: Palette,
    /// Column-major overrides per indexed style
    indexed: [Option<Vec<u8>>; 2],
    masked: bool,
    counter: u64,
}

impl BitmapSource {
    /// Source whose logical size equals the bitmap size
    pub fn new(bitmap: Bitmap, palette: Palette) -> Self {
        Self {
            native_width: bitmap.width(),
            native_height: bitmap.height(),
            masked: bitmap.has_holes(),
            bitmap,
            palette,
            indexed: [None, None],
            counter: 1,
        }
    }

    /// Source built from an `image` RGBA buffer
    pub fn from_rgba_image(img: &RgbaImage, palette: Palette) -> Result<Self, TextureError> {
        Ok(Self::new(Bitmap::from_rgba_image(img)?, palette))
    }

    /// Declare a smaller logical size (the bitmap is a high-resolution replacement)
    pub fn with_native_size(mut self, width: usize, height: usize) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        self.native_width = width;
        self.native_height = height;
        Ok(self)
    }

    /// Supply a row-major indexed buffer for one style instead of palette mapping
    pub fn with_indexed(mut self, style: IndexedStyle, rows: Vec<u8>) -> Result<Self, TextureError> {
        let (width, height) = (self.native_width, self.native_height);
        if rows.len() != width * height {
            return Err(TextureError::BufferSize {
                expected: width * height,
                actual: rows.len(),
            });
        }
        self.indexed[style.index()] = Some(transpose(&rows, width, height));
        Ok(self)
    }

    /// Force the masked flag (e.g. a sprite that must always use spans)
    pub fn with_masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the pixel data and bump the modification counter
    ///
    /// A scaled source keeps its logical size when the replacement has the
    /// same physical size. Indexed overrides are dropped since they no longer
    /// match.
    pub fn update_pixels(&mut self, bitmap: Bitmap) {
        let keep_native =
            self.is_scaled() && (bitmap.width(), bitmap.height()) == self.physical_size();
        if !keep_native {
            self.native_width = bitmap.width();
            self.native_height = bitmap.height();
        }
        self.masked = bitmap.has_holes();
        self.bitmap = bitmap;
        self.indexed = [None, None];
        self.touch();
    }

    /// Swap the palette and bump the modification counter
    ///
    /// The counter is shared by every representation, so this also rebuilds
    /// the true-color mip chain on next access even though it does not
    /// depend on the palette.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.touch();
    }

    /// Mark the pixel data as changed
    pub fn touch(&mut self) {
        self.counter += 1;
    }
}

impl TextureSource for BitmapSource {
    fn native_size(&self) -> (usize, usize) {
        (self.native_width, self.native_height)
    }

    fn physical_size(&self) -> (usize, usize) {
        (self.bitmap.width(), self.bitmap.height())
    }

    fn is_masked(&self) -> bool {
        self.masked
    }

    fn modification_counter(&self) -> u64 {
        self.counter
    }

    fn true_color_bitmap(&self) -> Bitmap {
        self.bitmap.clone()
    }

    fn indexed_pixels(&self, style: IndexedStyle) -> Vec<u8> {
        if let Some(pixels) = &self.indexed[style.index()] {
            return pixels.clone();
        }
        transpose_map(
            self.bitmap.pixels(),
            self.bitmap.width(),
            self.bitmap.height(),
            |c| self.palette.map_color(c),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::bgra::pack;

    #[test]
    fn test_bitmap_validation() {
        assert!(matches!(
            Bitmap::new(0, 4, vec![]),
            Err(TextureError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Bitmap::new(2, 2, vec![0; 3]),
            Err(TextureError::BufferSize { expected: 4, actual: 3 })
        ));
        assert!(Bitmap::new(2, 2, vec![0; 4]).is_ok());
    }

    #[test]
    fn test_rgba_image_round_trip() {
        let img = RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
        let bitmap = Bitmap::from_rgba_image(&img).unwrap();
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.get_pixel(2, 1), pack(255, 20, 20, 7));
        assert_eq!(bitmap.to_rgba_image(), img);
    }

    #[test]
    fn test_fit_to_crops_and_pads() {
        let bitmap = Bitmap::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        let fitted = bitmap.clone().fit_to(3, 1);
        assert_eq!(fitted.pixels(), &[1, 2, 0]);
        assert_eq!(bitmap.clone().fit_to(2, 2), bitmap);
    }

    #[test]
    fn test_masked_flag_from_alpha() {
        let opaque = Bitmap::filled(2, 2, pack(255, 1, 2, 3)).unwrap();
        assert!(!BitmapSource::new(opaque, Palette::grayscale(16)).is_masked());

        let holed = Bitmap::new(2, 1, vec![pack(255, 1, 2, 3), 0]).unwrap();
        assert!(BitmapSource::new(holed, Palette::grayscale(16)).is_masked());
    }

    #[test]
    fn test_indexed_derived_from_palette_is_column_major() {
        let white = pack(255, 255, 255, 255);
        // Row-major 2x2: white, transparent / transparent, white
        let bitmap = Bitmap::new(2, 2, vec![white, 0, 0, white]).unwrap();
        let source = BitmapSource::new(bitmap, Palette::grayscale(16));
        assert_eq!(source.indexed_pixels(IndexedStyle::Normal), vec![15, 0, 0, 15]);
    }

    #[test]
    fn test_indexed_override_per_style() {
        let bitmap = Bitmap::filled(2, 2, pack(255, 0, 0, 0)).unwrap();
        let source = BitmapSource::new(bitmap, Palette::grayscale(4))
            .with_indexed(IndexedStyle::Alternate, vec![1, 2, 3, 0])
            .unwrap();
        assert_eq!(source.indexed_pixels(IndexedStyle::Alternate), vec![1, 3, 2, 0]);
        assert_eq!(source.indexed_pixels(IndexedStyle::Normal), vec![1; 4]);
    }

    #[test]
    fn test_scaled_source() {
        let bitmap = Bitmap::filled(8, 8, pack(255, 9, 9, 9)).unwrap();
        let source = BitmapSource::new(bitmap, Palette::grayscale(16))
            .with_native_size(4, 4)
            .unwrap();
        assert!(source.is_scaled());
        assert_eq!(source.physical_size(), (8, 8));
        assert_eq!(source.native_size(), (4, 4));
    }

    #[test]
    fn test_update_bumps_counter() {
        let mut source = BitmapSource::new(Bitmap::filled(1, 1, 0).unwrap(), Palette::grayscale(16));
        let before = source.modification_counter();
        source.update_pixels(Bitmap::filled(2, 2, pack(255, 0, 0, 0)).unwrap());
        assert!(source.modification_counter() > before);
        assert_eq!(source.native_size(), (2, 2));
        assert!(!source.is_masked());
    }
}
