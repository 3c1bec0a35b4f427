mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use smudge_effect::{SmudgeEffectError, SmudgePipeline, load_image, save_image};
use std::{path::PathBuf, process};

/// Blur a night photo, paint a fading grid of discs over it and crack it open
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about)]
pub(crate) struct Cli {
    /// Image to read [default: inputRainyNightImage.png]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the result [default: EDITEDinputRainyNightImage.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file with default settings, flags win over it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Side of the square averaging kernel
    #[arg(long)]
    pub kernel_size: Option<u32>,

    /// Distance between disc centers
    #[arg(long)]
    pub grid_step: Option<u32>,

    /// Disc diameter
    #[arg(long)]
    pub circle_size: Option<u32>,

    #[arg(long)]
    pub crack_count: Option<u32>,

    /// Fix the crack randomness for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        match e.downcast_ref::<SmudgeEffectError>() {
            Some(SmudgeEffectError::InputUnreadable { path, source }) => {
                eprintln!("Image cannot be found: {} ({source})", path.display());
            }
            Some(SmudgeEffectError::OutputUnwritable { path, source }) => {
                eprintln!("Image cannot be written: {} ({source})", path.display());
            }
            _ => eprintln!("rainsmudge: {e:#}"),
        }

        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .merge_cli(cli);

    log::debug!("{config:?}");

    let pipeline = SmudgePipeline::from_knobs(
        config.kernel_size,
        config.grid_step,
        config.circle_size,
        config.crack_count,
        config.seed,
    )
    .with_context(|| "invalid smudge settings")?;

    let image = load_image(&config.input)?;
    let output = pipeline.run(&image)?;
    save_image(&output, &config.output)?;

    log::info!(
        "{} -> {}",
        config.input.display(),
        config.output.display()
    );

    Ok(())
}
