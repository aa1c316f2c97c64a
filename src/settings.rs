//! Texture conversion settings
//!
//! Stored as plain RON, e.g.
//!
//! ```ron
//! (
//!     mipmap_filter: Fast,
//!     sharpen_amount: 0.08,
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TextureError;

/// Which generator builds mip levels 1.. after the base level is transposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MipmapFilter {
    /// Gamma-correct 2x2 average followed by an unsharp mask
    #[default]
    Quality,
    /// Integer 2x2 average in stored (non-linear) space
    Fast,
}

impl MipmapFilter {
    pub fn label(&self) -> &'static str {
        match self {
            MipmapFilter::Quality => "Quality",
            MipmapFilter::Fast => "Fast",
        }
    }
}

/// Default unsharp-mask strength for the quality mipmap path
pub const DEFAULT_SHARPEN_AMOUNT: f32 = 0.08;

/// Per-texture conversion settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    /// Mipmap generator used by the true-color path
    pub mipmap_filter: MipmapFilter,
    /// Unsharp-mask strength applied to every quality mip level
    pub sharpen_amount: f32,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            mipmap_filter: MipmapFilter::Quality,
            sharpen_amount: DEFAULT_SHARPEN_AMOUNT,
        }
    }
}

impl TextureSettings {
    /// Settings that use the integer mipmap generator
    pub fn fast() -> Self {
        Self {
            mipmap_filter: MipmapFilter::Fast,
            ..Self::default()
        }
    }

    /// Parse settings from a RON string (missing fields take their defaults)
    pub fn from_ron_str(contents: &str) -> Result<Self, TextureError> {
        Ok(ron::from_str(contents)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, TextureError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Save settings to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TextureError> {
        fs::write(path.as_ref(), self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TextureSettings::default();
        assert_eq!(settings.mipmap_filter, MipmapFilter::Quality);
        assert_eq!(settings.sharpen_amount, 0.08);
        assert_eq!(TextureSettings::fast().mipmap_filter, MipmapFilter::Fast);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings = TextureSettings::from_ron_str("(mipmap_filter: Fast)").unwrap();
        assert_eq!(settings.mipmap_filter, MipmapFilter::Fast);
        assert_eq!(settings.sharpen_amount, DEFAULT_SHARPEN_AMOUNT);

        let empty = TextureSettings::from_ron_str("()").unwrap();
        assert_eq!(empty, TextureSettings::default());
    }

    #[test]
    fn test_bad_ron_is_parse_error() {
        let err = TextureSettings::from_ron_str("(mipmap_filter: Bilinear)").unwrap_err();
        assert!(matches!(err, TextureError::Parse(_)));
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture.ron");

        let settings = TextureSettings {
            mipmap_filter: MipmapFilter::Fast,
            sharpen_amount: 0.25,
        };
        settings.save(&path).unwrap();

        let loaded = TextureSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextureSettings::load(dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, TextureError::Io(_)));
    }
}
