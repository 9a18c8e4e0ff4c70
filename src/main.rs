//! Preview binary: drives a configured background source through a few
//! episodes and optionally dumps the frames it serves.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};
use natural_bg::config::Configuration;
use natural_bg::frame::{ImageView, quantize};
use tracing::{Level, debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "natural-bg", about = "Preview distractor background sources")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE", default_value = "background.yaml")]
    config: PathBuf,

    /// Number of episodes to run
    #[arg(long, default_value_t = 3)]
    episodes: usize,

    /// Steps (frames) per episode
    #[arg(long, default_value_t = 5)]
    steps: usize,

    /// Override the configured RNG seed
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Write every served frame as PNG into this directory
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("natural_bg={level}")
            .parse()
            .context("invalid log directive")?,
    );
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = Configuration::from_yaml_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?
        .validated()
        .context("validating configuration")?;
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }

    let mut source = natural_bg::build_source(&cfg)?;
    let matting = natural_bg::build_matting(&cfg);
    if let Some(dir) = &cli.out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    for episode in 0..cli.episodes {
        source.reset().with_context(|| format!("resetting for episode {episode}"))?;
        info!(
            episode,
            kind = cfg.source.kind(),
            env_index = ?source.env_index(),
            "episode started"
        );
        for step in 0..cli.steps {
            let image = source.get_image();
            if let Some(matting) = &matting {
                let masked = matting.get_mask(image.view()).iter().filter(|&&m| m).count();
                debug!(episode, step, masked, "keyed pixels");
            }
            if let Some(dir) = &cli.out {
                let path = dir.join(format!("ep{episode}_step{step}.png"));
                save_png(image, &path)?;
            }
        }
    }
    Ok(())
}

fn save_png(image: ImageView<'_>, path: &Path) -> Result<()> {
    let (h, w, c) = image.dim();
    let pixels: Vec<u8> = quantize(image).iter().copied().collect();
    let (w, h) = (w as u32, h as u32);
    let saved = match c {
        1 => image::GrayImage::from_raw(w, h, pixels).map(|img| img.save(path)),
        3 => image::RgbImage::from_raw(w, h, pixels).map(|img| img.save(path)),
        _ => None,
    };
    saved
        .ok_or_else(|| anyhow!("cannot encode {c}-channel frame"))?
        .with_context(|| format!("writing {}", path.display()))
}
