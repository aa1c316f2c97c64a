//! Developer tasks for swtexture
//!
//! Usage:
//!   cargo xtask mips <image> --out <dir>     # Write every mip level as PNG
//!   cargo xtask mips <image> --fast          # Same, with the integer box filter
//!   cargo xtask spans <image>                # Print the opaque span table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use swtexture::texture::untranspose;
use swtexture::{Bitmap, BitmapSource, IndexedStyle, Palette, SoftwareTexture, TextureSettings};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Developer tasks for swtexture")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the mip chain of an image and write one PNG per level
    Mips {
        /// Input image (png, jpeg or bmp)
        input: PathBuf,
        /// Output directory, relative paths resolve against the project root
        #[arg(long, default_value = "target/mips")]
        out: PathBuf,
        /// Use the integer box filter instead of the gamma-correct one
        #[arg(long)]
        fast: bool,
        /// Load texture settings from a RON file (overrides --fast)
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Print the opaque span table of an image
    Spans {
        /// Input image (png, jpeg or bmp)
        input: PathBuf,
        /// Print spans for the palette-indexed pixels instead of true color
        #[arg(long)]
        indexed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mips { input, out, fast, settings } => mips(&input, &out, fast, settings.as_deref()),
        Commands::Spans { input, indexed } => spans(&input, indexed),
    }
}

/// Get the project root directory
fn project_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.parent().unwrap_or(manifest).to_path_buf()
}

/// Decode an image file into a texture with a 256-entry grayscale palette
fn load_texture(input: &Path, settings: TextureSettings) -> Result<SoftwareTexture<BitmapSource>> {
    println!("Loading {}...", input.display());
    let img = image::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?
        .to_rgba8();
    let source = BitmapSource::from_rgba_image(&img, Palette::grayscale(256))?;
    let texture = SoftwareTexture::with_settings(source, Palette::grayscale(256), settings)?;
    println!(
        "{}x{} (width bits {}, height bits {}, masked: {})",
        texture.width(),
        texture.height(),
        texture.geometry().width_bits(),
        texture.geometry().height_bits(),
        texture.is_masked()
    );
    Ok(texture)
}

/// Write every mip level to `out/level_<n>.png`
fn mips(input: &Path, out: &Path, fast: bool, settings_path: Option<&Path>) -> Result<()> {
    let settings = match settings_path {
        Some(path) => TextureSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None if fast => TextureSettings::fast(),
        None => TextureSettings::default(),
    };
    println!("Filter: {}", settings.mipmap_filter.label());

    let mut texture = load_texture(input, settings)?;

    let out = if out.is_absolute() {
        out.to_path_buf()
    } else {
        project_root().join(out)
    };
    std::fs::create_dir_all(&out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let levels = texture.mip_levels().to_vec();
    let chain = texture.pixels_bgra();
    for (i, level) in levels.iter().enumerate() {
        let rows = untranspose(&chain[level.range()], level.width, level.height);
        let bitmap = Bitmap::new(level.width, level.height, rows)?;
        let path = out.join(format!("level_{}.png", i));
        bitmap
            .to_rgba_image()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  level {}: {}x{} -> {}", i, level.width, level.height, path.display());
    }

    println!("Wrote {} levels to {}", levels.len(), out.display());
    Ok(())
}

/// Print each column's spans and the table totals
fn spans(input: &Path, indexed: bool) -> Result<()> {
    let mut texture = load_texture(input, TextureSettings::default())?;

    let mut total = 0;
    let mut empty = 0;
    for x in 0..texture.width() {
        let spans = if indexed {
            texture.column_with_spans(IndexedStyle::Normal, x).1
        } else {
            texture.column_bgra_with_spans(x).1
        };
        let runs: Vec<String> = spans
            .iter()
            .take_while(|s| !s.is_terminator())
            .map(|s| format!("{}+{}", s.top_offset, s.length))
            .collect();
        if runs.is_empty() {
            empty += 1;
        }
        total += runs.len();
        println!("{:4}: {}", x, runs.join(" "));
    }

    println!(
        "{} columns, {} opaque spans, {} empty columns",
        texture.width(),
        total,
        empty
    );
    Ok(())
}
