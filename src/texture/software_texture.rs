//! Software texture adapter
//!
//! Wraps a [`TextureSource`] and lazily produces everything the software
//! drawers read: column-major indexed pixels per style, a column-major
//! true-color mip chain, and span tables for each of those.
//!
//! Every cache entry remembers the source modification counter it was built
//! from. Each public read compares that against the source's current counter
//! and rebuilds on mismatch, which also drops the span table built from the
//! old pixels. Nothing is shared between textures, so a `SoftwareTexture`
//! needs no locking, but it must not be used from several threads at once.

use crate::color::{Palette, PaletteMapper};
use crate::error::TextureError;
use crate::settings::TextureSettings;
use crate::texture::geometry::TextureGeometry;
use crate::texture::mipmap::{MipChain, MipLevel};
use crate::texture::source::{Bitmap, IndexedStyle, TextureSource};
use crate::texture::span::{Span, SpanTable};
use crate::texture::transpose::{transpose_map, transpose_map_into};

/// Span table slot for the true-color pixels (0 and 1 are the indexed styles)
const TRUE_COLOR_SLOT: usize = 2;

/// Cached data plus the source version it was built from
#[derive(Debug, Default)]
struct CacheEntry<T> {
    built_from: Option<u64>,
    data: T,
}

impl<T> CacheEntry<T> {
    fn is_current(&self, counter: u64) -> bool {
        self.built_from == Some(counter)
    }
}

/// Per-texture conversion state for the software renderer
#[derive(Debug)]
pub struct SoftwareTexture<S, M = Palette> {
    source: S,
    mapper: M,
    settings: TextureSettings,
    native_width: usize,
    native_height: usize,
    geometry: TextureGeometry,
    indexed: [CacheEntry<Vec<u8>>; 2],
    bgra: CacheEntry<MipChain>,
    spans: [Option<SpanTable>; 3],
}

impl<S: TextureSource, M: PaletteMapper> SoftwareTexture<S, M> {
    /// Create an adapter with default settings
    ///
    /// Fails if the source reports a zero width or height.
    pub fn new(source: S, mapper: M) -> Result<Self, TextureError> {
        Self::with_settings(source, mapper, TextureSettings::default())
    }

    /// Create an adapter with explicit settings
    pub fn with_settings(source: S, mapper: M, settings: TextureSettings) -> Result<Self, TextureError> {
        let (native_width, native_height, geometry) = measure(&source)?;
        Ok(Self {
            source,
            mapper,
            settings,
            native_width,
            native_height,
            geometry,
            indexed: Default::default(),
            bgra: Default::default(),
            spans: Default::default(),
        })
    }

    /// Re-read the source's sizes and drop every cached buffer and span table
    pub fn reimport(&mut self) -> Result<(), TextureError> {
        let (native_width, native_height, geometry) = measure(&self.source)?;
        log::debug!(
            "reimport: {}x{} (native {}x{})",
            geometry.width(),
            geometry.height(),
            native_width,
            native_height
        );
        self.native_width = native_width;
        self.native_height = native_height;
        self.geometry = geometry;
        self.indexed = Default::default();
        self.bgra = Default::default();
        self.free_all_spans();
        Ok(())
    }

    /// Physical width in texels
    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width()
    }

    /// Physical height in texels
    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height()
    }

    /// Logical width reported by the source
    pub fn native_width(&self) -> usize {
        self.native_width
    }

    /// Logical height reported by the source
    pub fn native_height(&self) -> usize {
        self.native_height
    }

    /// Physical texels per logical texel, horizontally
    pub fn scale(&self) -> usize {
        self.width() / self.native_width
    }

    pub fn geometry(&self) -> &TextureGeometry {
        &self.geometry
    }

    pub fn is_masked(&self) -> bool {
        self.source.is_masked()
    }

    pub fn settings(&self) -> &TextureSettings {
        &self.settings
    }

    /// Change settings; the mip chain is rebuilt on next access if they differ
    pub fn set_settings(&mut self, settings: TextureSettings) {
        if settings != self.settings {
            self.settings = settings;
            self.bgra.built_from = None;
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source; changes are picked up through its counter
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Column-major indexed pixels for a style (`width * height` long)
    pub fn pixels(&mut self, style: IndexedStyle) -> &[u8] {
        self.refresh_indexed(style);
        &self.indexed[style.index()].data
    }

    /// The full column-major true-color mip chain; level 0 is the prefix
    pub fn pixels_bgra(&mut self) -> &[u32] {
        self.refresh_bgra();
        self.bgra.data.pixels()
    }

    /// Offset and size of every mip level inside [`SoftwareTexture::pixels_bgra`]
    pub fn mip_levels(&mut self) -> &[MipLevel] {
        self.refresh_bgra();
        self.bgra.data.levels()
    }

    /// Pixels of one mip level, or `None` past the last level
    pub fn mip_level(&mut self, level: usize) -> Option<&[u32]> {
        self.refresh_bgra();
        self.bgra.data.level(level)
    }

    /// One column of indexed pixels; out-of-range columns wrap
    pub fn column(&mut self, style: IndexedStyle, column: usize) -> &[u8] {
        self.refresh_indexed(style);
        let range = self.column_range(column);
        &self.indexed[style.index()].data[range]
    }

    /// One column of indexed pixels plus its span list (terminator included)
    pub fn column_with_spans(&mut self, style: IndexedStyle, column: usize) -> (&[u8], &[Span]) {
        self.refresh_indexed(style);
        let column = self.geometry.wrap_column(column);
        let (width, height) = (self.width(), self.height());
        let masked = self.source.is_masked();
        let slot = style.index();

        let pixels = &self.indexed[slot].data;
        let table = self.spans[slot].get_or_insert_with(|| {
            log::debug!("building indexed span table {} ({}x{}, masked: {})", slot, width, height, masked);
            SpanTable::build(pixels, width, height, masked)
        });
        (&pixels[column * height..(column + 1) * height], table.column(column))
    }

    /// One column of level-0 true-color pixels; out-of-range columns wrap
    pub fn column_bgra(&mut self, column: usize) -> &[u32] {
        self.refresh_bgra();
        let range = self.column_range(column);
        &self.bgra.data.pixels()[range]
    }

    /// One column of level-0 true-color pixels plus its span list
    pub fn column_bgra_with_spans(&mut self, column: usize) -> (&[u32], &[Span]) {
        self.refresh_bgra();
        let column = self.geometry.wrap_column(column);
        let (width, height) = (self.width(), self.height());
        let masked = self.source.is_masked();

        let pixels = self.bgra.data.pixels();
        let table = self.spans[TRUE_COLOR_SLOT].get_or_insert_with(|| {
            log::debug!("building true-color span table ({}x{}, masked: {})", width, height, masked);
            SpanTable::build(&pixels[..width * height], width, height, masked)
        });
        (&pixels[column * height..(column + 1) * height], table.column(column))
    }

    /// Release every span table; they are rebuilt on demand
    pub fn free_all_spans(&mut self) {
        for table in &mut self.spans {
            *table = None;
        }
    }

    fn column_range(&self, column: usize) -> std::ops::Range<usize> {
        let column = self.geometry.wrap_column(column);
        let height = self.height();
        column * height..(column + 1) * height
    }

    /// Bitmap from the source, forced to the physical size recorded at import
    fn fetch_bitmap(&self) -> Bitmap {
        let bitmap = self.source.true_color_bitmap();
        let (width, height) = (self.width(), self.height());
        if bitmap.width() != width || bitmap.height() != height {
            log::warn!(
                "source bitmap is {}x{}, expected {}x{}; cropping/padding",
                bitmap.width(),
                bitmap.height(),
                width,
                height
            );
        }
        bitmap.fit_to(width, height)
    }

    fn refresh_indexed(&mut self, style: IndexedStyle) {
        let counter = self.source.modification_counter();
        let slot = style.index();
        if self.indexed[slot].is_current(counter) {
            return;
        }

        let (width, height) = (self.width(), self.height());
        let native = !self.source.is_scaled() && self.source.native_size() == (width, height);
        let pixels = if native {
            let mut pixels = self.source.indexed_pixels(style);
            if pixels.len() != width * height {
                log::warn!(
                    "indexed pixels hold {} texels, expected {}; resizing",
                    pixels.len(),
                    width * height
                );
                pixels.resize(width * height, 0);
            }
            pixels
        } else {
            let bitmap = self.fetch_bitmap();
            let mapper = &self.mapper;
            transpose_map(bitmap.pixels(), width, height, |c| mapper.map_color(c))
        };

        log::debug!(
            "rebuilt indexed pixels {:?} ({}x{}, version {})",
            style,
            width,
            height,
            counter
        );
        self.indexed[slot] = CacheEntry {
            built_from: Some(counter),
            data: pixels,
        };
        self.spans[slot] = None;
    }

    fn refresh_bgra(&mut self) {
        let counter = self.source.modification_counter();
        if self.bgra.is_current(counter) {
            return;
        }

        let (width, height) = (self.width(), self.height());
        let bitmap = self.fetch_bitmap();
        let mut chain = MipChain::new(width, height);
        transpose_map_into(bitmap.pixels(), chain.base_mut(), width, height, |c| c);
        chain.generate(&self.settings);

        log::debug!(
            "rebuilt true-color pixels ({}x{}, {} mip levels, {:?}, version {})",
            width,
            height,
            chain.level_count(),
            self.settings.mipmap_filter,
            counter
        );
        self.bgra = CacheEntry {
            built_from: Some(counter),
            data: chain,
        };
        self.spans[TRUE_COLOR_SLOT] = None;
    }
}

/// Native size and physical geometry of a source
fn measure<S: TextureSource>(source: &S) -> Result<(usize, usize, TextureGeometry), TextureError> {
    let (native_width, native_height) = source.native_size();
    if native_width == 0 || native_height == 0 {
        return Err(TextureError::InvalidDimensions {
            width: native_width,
            height: native_height,
        });
    }
    let (width, height) = source.physical_size();
    Ok((native_width, native_height, TextureGeometry::new(width, height)?))
}
