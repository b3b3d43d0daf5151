use anyhow::{Context, Result};
use bitblt::config::Options;
use bitblt::graphics::{to_ascii, to_image};
use bitblt::{logging, Cli};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level()).context("Failed to install logger")?;

    let options = cli.merge_into_options(Options::default())?;
    log::info!(
        "Drawing {} at {}x{}",
        options.scene,
        options.size.width,
        options.size.height
    );

    let bitmap = options
        .scene
        .render(options.size)
        .with_context(|| format!("Failed to draw scene {}", options.scene))?;

    match &options.output {
        Some(path) => {
            let image = to_image(&bitmap, None, &options.render)?;
            image
                .save(path)
                .with_context(|| format!("Failed to write {}", path))?;
            log::info!(
                "Wrote {} ({}x{})",
                path,
                image.width(),
                image.height()
            );
        }
        None => println!("{}", to_ascii(&bitmap)),
    }

    Ok(())
}
