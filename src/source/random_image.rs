use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::ImageSource;
use crate::codec::{ImageDecoder, Resizer};
use crate::error::Error;
use crate::frame::{ColorMode, FrameBuffer, ImageView, Resolution};

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomImageOptions {
    /// Buffer length. Defaults to the number of files; larger values cycle
    /// through the file list again.
    pub total_frames: Option<usize>,
    pub grayscale: bool,
}

/// Preloads still images and serves one at random for a whole episode.
#[derive(Debug, Clone)]
pub struct RandomImageSource<R = StdRng> {
    resolution: Resolution,
    mode: ColorMode,
    buffer: FrameBuffer,
    cursor: usize,
    rng: R,
}

impl RandomImageSource<StdRng> {
    pub fn new(
        resolution: Resolution,
        files: Vec<PathBuf>,
        options: RandomImageOptions,
        decoder: &dyn ImageDecoder,
        resizer: &dyn Resizer,
    ) -> Result<Self, Error> {
        Self::with_rng(resolution, files, options, decoder, resizer, StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomImageSource<R> {
    /// Decode and resize every frame up front.
    ///
    /// # Errors
    /// Any file that fails to decode or resize aborts construction; there is
    /// no partially filled source.
    pub fn with_rng(
        resolution: Resolution,
        files: Vec<PathBuf>,
        options: RandomImageOptions,
        decoder: &dyn ImageDecoder,
        resizer: &dyn Resizer,
        mut rng: R,
    ) -> Result<Self, Error> {
        if files.is_empty() {
            return Err(Error::EmptyFileList);
        }
        let mode = ColorMode::from_grayscale(options.grayscale);
        let total_frames = options.total_frames.unwrap_or(files.len());

        let buffer = FrameBuffer::build(total_frames, resolution, mode, |i| {
            let path = &files[i % files.len()];
            let raw = decoder.decode(path, mode).map_err(|source| Error::Decode {
                path: path.clone(),
                source,
            })?;
            resizer
                .resize(raw.view(), resolution.width, resolution.height)
                .map_err(|source| Error::Resize {
                    path: path.clone(),
                    source,
                })
        })?;
        info!(
            frames = buffer.len(),
            files = files.len(),
            "cached background images"
        );

        let cursor = rng.random_range(0..buffer.len());
        Ok(Self {
            resolution,
            mode,
            buffer,
            cursor,
            rng,
        })
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Buffer index served until the next reset.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<R: Rng> ImageSource for RandomImageSource<R> {
    fn get_image(&mut self) -> ImageView<'_> {
        self.buffer.frame(self.cursor)
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.cursor = self.rng.random_range(0..self.buffer.len());
        debug!(cursor = self.cursor, "selected background image");
        Ok(())
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn color_mode(&self) -> ColorMode {
        self.mode
    }
}
