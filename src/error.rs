//! Error types for texture construction and settings persistence.

/// Errors that can occur while setting up a software texture.
///
/// The per-column read path is infallible; errors only surface when a
/// texture is created or re-imported, or when settings are loaded/saved.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// A pixel buffer does not match the dimensions it claims to have.
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
