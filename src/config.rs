use anyhow::{Context, Result};

use crate::demo::Scene;
use crate::graphics::Extent;

/// Largest upscale factor accepted for rendered output
pub const MAX_SCALE: u32 = 16;

/// How bitmaps are turned into grayscale images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Integer upscale factor (nearest neighbour)
    pub scale: u32,
    /// Gray level for set pixels
    pub ink: u8,
    /// Gray level for clear pixels
    pub paper: u8,
    /// Swap ink and paper
    pub invert: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1,
            ink: 0,
            paper: 255,
            invert: false,
        }
    }
}

/// Demo options, filled from the command line
#[derive(Debug, Clone)]
pub struct Options {
    pub scene: Scene,
    pub size: Extent,
    pub output: Option<String>,
    pub render: RenderOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scene: Scene::Checkerboard,
            size: Extent::new(128, 96),
            output: None,
            render: RenderOptions::default(),
        }
    }
}

/// Parse a size string in the format "WIDTHxHEIGHT"
pub fn parse_extent(s: &str) -> Result<Extent> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        anyhow::bail!("Size must be in WIDTHxHEIGHT format");
    }

    let width: u16 = parts[0].parse().context("Invalid width value")?;
    let height: u16 = parts[1].parse().context("Invalid height value")?;

    if width == 0 || height == 0 {
        anyhow::bail!("Size values must be positive");
    }

    Ok(Extent::new(width as i32, height as i32))
}

/// Parse an upscale factor (1 to MAX_SCALE)
pub fn parse_scale(s: &str) -> Result<u32> {
    let scale: u32 = s.parse().context("Invalid scale value")?;
    if scale == 0 || scale > MAX_SCALE {
        anyhow::bail!("Scale out of range (1 to {})", MAX_SCALE);
    }
    Ok(scale)
}
