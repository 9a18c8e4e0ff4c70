use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use super::ImageSource;
use crate::error::Error;
use crate::frame::{Image, ImageView, Resolution, solid_rgb};

/// Picks one color from a fixed random palette per episode.
#[derive(Debug, Clone)]
pub struct RandomColorSource<R = StdRng> {
    resolution: Resolution,
    palette: Vec<[u8; 3]>,
    color_id: usize,
    image: Image,
    rng: R,
}

impl RandomColorSource<StdRng> {
    /// Palette and episode colors seeded from OS entropy.
    pub fn new(resolution: Resolution, max_images: usize) -> Result<Self, Error> {
        Self::with_rng(resolution, max_images, StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomColorSource<R> {
    /// # Errors
    /// Returns [`Error::EmptyPalette`] if `max_images` is zero.
    pub fn with_rng(resolution: Resolution, max_images: usize, mut rng: R) -> Result<Self, Error> {
        if max_images == 0 {
            return Err(Error::EmptyPalette);
        }
        let palette: Vec<[u8; 3]> = (0..max_images)
            .map(|_| [rng.random(), rng.random(), rng.random()])
            .collect();
        debug!(?palette, "random color palette");
        let color_id = rng.random_range(0..palette.len());
        let image = solid_rgb(resolution, palette[color_id]);
        Ok(Self {
            resolution,
            palette,
            color_id,
            image,
            rng,
        })
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Palette index chosen at the last reset.
    pub const fn color_id(&self) -> usize {
        self.color_id
    }
}

impl<R: Rng> ImageSource for RandomColorSource<R> {
    fn get_image(&mut self) -> ImageView<'_> {
        self.image.view()
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.color_id = self.rng.random_range(0..self.palette.len());
        self.image = solid_rgb(self.resolution, self.palette[self.color_id]);
        debug!(color_id = self.color_id, "selected background color");
        Ok(())
    }

    fn env_index(&self) -> Option<usize> {
        Some(self.color_id)
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }
}
