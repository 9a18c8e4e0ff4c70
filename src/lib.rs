//! Substitute background imagery for simulated visual environments.
//!
//! A [`source::ImageSource`] supplies one background frame per simulation step
//! and is reset at episode boundaries; [`matting::BackgroundMatting`] finds the
//! pixels it should be composited into.

pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod matting;
pub mod scan;
pub mod source;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::codec::{FastResizer, ImageCrateDecoder, default_video_decoder};
use crate::config::{Configuration, SourceConfig};
use crate::matting::BackgroundMatting;
use crate::scan::{MediaKind, scan_media};
use crate::source::{
    FixedColorSource, ImageSource, NoiseSource, RandomColorSource, RandomImageOptions,
    RandomImageSource, RandomVideoSource,
};

/// Build the background source described by a validated configuration.
pub fn build_source(cfg: &Configuration) -> Result<Box<dyn ImageSource>> {
    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let resolution = cfg.resolution;
    let scan = cfg.source.scan_options().unwrap_or_default();

    let source: Box<dyn ImageSource> = match &cfg.source {
        SourceConfig::FixedColor { color } => Box::new(FixedColorSource::new(resolution, *color)),
        SourceConfig::RandomColor { max_images } => {
            Box::new(RandomColorSource::with_rng(resolution, *max_images, rng)?)
        }
        SourceConfig::Noise { strength } => {
            Box::new(NoiseSource::with_rng(resolution, *strength, rng))
        }
        SourceConfig::RandomImage {
            paths,
            total_frames,
            ..
        } => {
            let files = scan_media(paths, MediaKind::Image, &scan)?;
            info!(count = files.len(), "scanned background images");
            let options = RandomImageOptions {
                total_frames: *total_frames,
                grayscale: cfg.grayscale,
            };
            Box::new(
                RandomImageSource::with_rng(
                    resolution,
                    files,
                    options,
                    &ImageCrateDecoder,
                    &FastResizer,
                    rng,
                )
                .context("failed to cache background images")?,
            )
        }
        SourceConfig::RandomVideo { paths, .. } => {
            let files = scan_media(paths, MediaKind::Video, &scan)?;
            info!(count = files.len(), "scanned background videos");
            let options = cfg
                .source
                .video_options(cfg.grayscale)
                .context("video options missing for random-video source")?;
            Box::new(
                RandomVideoSource::with_rng(
                    resolution,
                    files,
                    options,
                    default_video_decoder()?,
                    Box::new(FastResizer),
                    rng,
                )
                .context("failed to load a background video")?,
            )
        }
    };
    Ok(source)
}

/// The mask provider for the configured color key, if any.
#[must_use]
pub fn build_matting(cfg: &Configuration) -> Option<BackgroundMatting> {
    cfg.mask_color.map(BackgroundMatting::new)
}

