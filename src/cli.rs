use crate::config::{parse_extent, parse_scale, Options};
use crate::demo::Scene;
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use clap::Parser;

/// Render BitBlt demo scenes to PNG or text
#[derive(Parser, Debug, Default)]
#[command(name = "bitblt-demo")]
#[command(version)]
#[command(about = "Render 1-bit BitBlt demo scenes", long_about = None)]
pub struct Cli {
    /// Scene to draw (checkerboard, halftones, overlap, cursor)
    #[arg(long, value_name = "NAME")]
    pub scene: Option<String>,

    /// Bitmap size (e.g., 128x96)
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Integer upscale factor for the PNG (1-16)
    #[arg(long, value_name = "N")]
    pub scale: Option<String>,

    /// Draw set pixels white on black
    #[arg(long)]
    pub invert: bool,

    /// Output PNG path; without it the scene is printed as text
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<String>,

    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref scene) = self.scene {
            opts.scene = scene.parse::<Scene>()?;
        }

        if let Some(ref size) = self.size {
            opts.size = parse_extent(size).context("Invalid size format")?;
        }

        if let Some(ref scale) = self.scale {
            opts.render.scale = parse_scale(scale)?;
        }

        if self.invert {
            opts.render.invert = true;
        }

        if let Some(ref out) = self.out {
            opts.output = Some(out.clone());
        }

        Ok(opts)
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_verbosity(self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Extent;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "bitblt-demo",
            "--scene",
            "overlap",
            "--size",
            "64x32",
            "--scale",
            "4",
            "--invert",
            "--out",
            "frame.png",
            "-vv",
        ])
        .unwrap();

        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.scene, Scene::Overlap);
        assert_eq!(opts.size, Extent::new(64, 32));
        assert_eq!(opts.render.scale, 4);
        assert!(opts.render.invert);
        assert_eq!(opts.output.as_deref(), Some("frame.png"));
        assert_eq!(cli.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_merge_keeps_defaults() {
        let cli = Cli::try_parse_from(["bitblt-demo"]).unwrap();
        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.scene, Scene::Checkerboard);
        assert_eq!(opts.size, Extent::new(128, 96));
        assert!(opts.output.is_none());
        assert_eq!(cli.log_level(), LogLevel::Warning);
    }

    #[test]
    fn test_merge_invalid_values() {
        let cli = Cli {
            size: Some("invalid".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());

        let cli = Cli {
            scene: Some("teapot".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());

        let cli = Cli {
            scale: Some("99".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());
    }
}
