//! Texture conversion for the software renderer
//!
//! The drawers walk textures one vertical column at a time, so everything
//! here is stored column-major: pixel `(x, y)` at `y + x * height`.
//!
//! ## Overview
//!
//! - **TextureSource**: What the adapter reads from (sizes, mask flag,
//!   modification counter, true-color bitmap, native indexed pixels)
//! - **SoftwareTexture**: Lazily builds and caches indexed pixels, the
//!   true-color mip chain and span tables, rebuilding when the source changes
//! - **SpanTable**: Opaque runs per column so drawers skip holes
//! - **MipChain**: Flat chain of box-filtered levels, gamma-correct or fast

mod geometry;
mod mipmap;
mod software_texture;
mod source;
mod span;
mod transpose;

pub use geometry::TextureGeometry;
pub use mipmap::{mip_layout, mipmap_levels, MipChain, MipLevel};
pub use software_texture::SoftwareTexture;
pub use source::{Bitmap, BitmapSource, IndexedStyle, TextureSource};
pub use span::{count_spans, Span, SpanTable, Translucent};
pub use transpose::{transpose, transpose_map, transpose_map_into, untranspose};
