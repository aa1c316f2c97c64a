//! swtexture: texture adapter for a software renderer
//!
//! Converts a source image into the two layouts a software renderer reads:
//! - Column-major 8-bit palette indices for the column drawer
//! - Column-major 32-bit ARGB with a full mipmap chain for the texture mapper
//!
//! Masked textures also get span tables that list the opaque vertical runs
//! of every column, so drawers can skip holes without testing each texel.
//!
//! # Module Organization
//!
//! - `texture` - Geometry, transposition, spans, mipmaps and the `SoftwareTexture` adapter
//! - `color` - Packed ARGB helpers, linear float color, palette mapping
//! - `settings` - RON-backed `TextureSettings`
//! - `error` - `TextureError`

pub mod color;
pub mod error;
pub mod settings;
pub mod texture;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

pub use color::{Color4f, Palette, PaletteMapper};
pub use error::TextureError;
pub use settings::{MipmapFilter, TextureSettings};
pub use texture::{
    Bitmap, BitmapSource, IndexedStyle, MipChain, MipLevel, SoftwareTexture, Span, SpanTable,
    TextureGeometry, TextureSource, Translucent,
};
