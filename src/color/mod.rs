//! Color helpers shared by the texture pipeline
//!
//! - `bgra` - packed `0xAARRGGBB` accessors and the linear `Color4f` used by mipmapping
//! - `palette` - `PaletteMapper` trait and the nearest-color `Palette`

pub mod bgra;
pub mod palette;

pub use bgra::Color4f;
pub use palette::{Palette, PaletteMapper, TRANSPARENT_INDEX};
