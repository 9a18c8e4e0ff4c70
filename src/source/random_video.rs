use std::path::{Path, PathBuf};

use ndarray::Axis;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::ImageSource;
use crate::codec::{Resizer, VideoDecoder};
use crate::error::Error;
use crate::frame::{ColorMode, FrameBuffer, ImageView, Resolution};

/// Frame cap applied to color decodes unless overridden.
pub const DEFAULT_COLOR_FRAME_CAP: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct RandomVideoOptions {
    /// Size of the pool drawn from the shuffled file list.
    pub max_videos: usize,
    /// Draw a new random frame on every step instead of playing in order.
    pub random_bg: bool,
    pub grayscale: bool,
    /// Upper bound on decoded frames per video.
    pub frame_cap: Option<usize>,
}

impl RandomVideoOptions {
    /// Color decodes are capped to bound memory, grayscale ones are not.
    pub const fn default_frame_cap(grayscale: bool) -> Option<usize> {
        if grayscale {
            None
        } else {
            Some(DEFAULT_COLOR_FRAME_CAP)
        }
    }
}

impl Default for RandomVideoOptions {
    fn default() -> Self {
        Self {
            max_videos: 20,
            random_bg: false,
            grayscale: false,
            frame_cap: Self::default_frame_cap(false),
        }
    }
}

/// Decodes pool entries into frame buffers.
struct VideoLoader {
    pool: Vec<PathBuf>,
    resolution: Resolution,
    mode: ColorMode,
    frame_cap: Option<usize>,
    decoder: Box<dyn VideoDecoder>,
    resizer: Box<dyn Resizer>,
}

impl VideoLoader {
    fn load(&self, video_id: usize) -> Result<FrameBuffer, Error> {
        let path = &self.pool[video_id];
        let clip = self
            .decoder
            .decode(path, self.frame_cap, self.mode)
            .map_err(|source| Error::Decode {
                path: path.clone(),
                source,
            })?;
        let frames = clip.len_of(Axis(0));
        if frames == 0 {
            return Err(Error::EmptyVideo { path: path.clone() });
        }
        FrameBuffer::build(frames, self.resolution, self.mode, |i| {
            self.resizer
                .resize(
                    clip.index_axis(Axis(0), i),
                    self.resolution.width,
                    self.resolution.height,
                )
                .map_err(|source| Error::Resize {
                    path: path.clone(),
                    source,
                })
        })
    }

    /// Try pool entries in random order, each at most once, until one loads.
    fn load_any<R: Rng>(&self, rng: &mut R) -> Result<(usize, FrameBuffer), Error> {
        let mut untried: Vec<usize> = (0..self.pool.len()).collect();
        while !untried.is_empty() {
            let video_id = untried.swap_remove(rng.random_range(0..untried.len()));
            match self.load(video_id) {
                Ok(buffer) => return Ok((video_id, buffer)),
                Err(err) => warn!(video_id, error = %err, "skipping unloadable video"),
            }
        }
        Err(Error::NoLoadableMedia {
            attempted: self.pool.len(),
        })
    }
}

/// Plays decoded frames from one video of a fixed pool per episode.
pub struct RandomVideoSource<R = StdRng> {
    loader: VideoLoader,
    random_bg: bool,
    video_id: usize,
    buffer: FrameBuffer,
    cursor: usize,
    rng: R,
}

impl RandomVideoSource<StdRng> {
    pub fn new(
        resolution: Resolution,
        files: Vec<PathBuf>,
        options: RandomVideoOptions,
        decoder: Box<dyn VideoDecoder>,
        resizer: Box<dyn Resizer>,
    ) -> Result<Self, Error> {
        Self::with_rng(resolution, files, options, decoder, resizer, StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomVideoSource<R> {
    /// Shuffle `files`, keep the first `max_videos` as the pool and load one.
    ///
    /// # Errors
    /// Returns [`Error::EmptyFileList`] if the pool is empty and
    /// [`Error::NoLoadableMedia`] if no pool entry can be decoded.
    pub fn with_rng(
        resolution: Resolution,
        mut files: Vec<PathBuf>,
        options: RandomVideoOptions,
        decoder: Box<dyn VideoDecoder>,
        resizer: Box<dyn Resizer>,
        mut rng: R,
    ) -> Result<Self, Error> {
        files.shuffle(&mut rng);
        files.truncate(options.max_videos);
        if files.is_empty() {
            return Err(Error::EmptyFileList);
        }
        let loader = VideoLoader {
            pool: files,
            resolution,
            mode: ColorMode::from_grayscale(options.grayscale),
            frame_cap: options.frame_cap,
            decoder,
            resizer,
        };
        let (video_id, buffer) = loader.load_any(&mut rng)?;
        let cursor = rng.random_range(0..buffer.len());
        info!(
            pool = loader.pool.len(),
            video_id,
            frames = buffer.len(),
            "loaded background video"
        );
        Ok(Self {
            loader,
            random_bg: options.random_bg,
            video_id,
            buffer,
            cursor,
            rng,
        })
    }

    pub fn pool(&self) -> &[PathBuf] {
        &self.loader.pool
    }

    /// Pool index of the loaded video.
    pub const fn video_id(&self) -> usize {
        self.video_id
    }

    pub fn current_path(&self) -> &Path {
        &self.loader.pool[self.video_id]
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Index of the frame most recently served, or the starting point after a
    /// reset.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<R: Rng> ImageSource for RandomVideoSource<R> {
    fn get_image(&mut self) -> ImageView<'_> {
        let len = self.buffer.len();
        self.cursor = if self.random_bg {
            self.rng.random_range(0..len)
        } else {
            (self.cursor + 1) % len
        };
        self.buffer.frame(self.cursor)
    }

    fn reset(&mut self) -> Result<(), Error> {
        let (video_id, buffer) = self.loader.load_any(&mut self.rng)?;
        self.cursor = self.rng.random_range(0..buffer.len());
        self.video_id = video_id;
        self.buffer = buffer;
        debug!(
            video_id,
            frames = self.buffer.len(),
            cursor = self.cursor,
            "switched background video"
        );
        Ok(())
    }

    fn env_index(&self) -> Option<usize> {
        Some(self.video_id)
    }

    fn resolution(&self) -> Resolution {
        self.loader.resolution
    }

    fn color_mode(&self) -> ColorMode {
        self.loader.mode
    }
}
