use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::ImageSource;
use crate::error::Error;
use crate::frame::{Image, ImageView, Resolution};

/// Gaussian noise, freshly sampled on every step.
#[derive(Debug, Clone)]
pub struct NoiseSource<R = StdRng> {
    resolution: Resolution,
    strength: f32,
    image: Image,
    rng: R,
}

impl NoiseSource<StdRng> {
    pub fn new(resolution: Resolution, strength: f32) -> Self {
        Self::with_rng(resolution, strength, StdRng::from_os_rng())
    }
}

impl<R: Rng> NoiseSource<R> {
    /// `strength` scales unit normal samples; 255 spans the 8-bit range.
    pub fn with_rng(resolution: Resolution, strength: f32, rng: R) -> Self {
        let (h, w) = (resolution.height as usize, resolution.width as usize);
        Self {
            resolution,
            strength,
            image: Array3::zeros((h, w, 3)),
            rng,
        }
    }
}

impl<R: Rng> ImageSource for NoiseSource<R> {
    fn get_image(&mut self) -> ImageView<'_> {
        let strength = self.strength;
        let rng = &mut self.rng;
        self.image.mapv_inplace(|_| {
            let z: f32 = rng.sample(StandardNormal);
            z * strength
        });
        self.image.view()
    }

    fn reset(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_frames_differ() {
        let rng = StdRng::seed_from_u64(5);
        let mut src = NoiseSource::with_rng(Resolution::new(64, 64), 255.0, rng);
        let first = src.get_image().to_owned();
        let second = src.get_image().to_owned();
        assert_eq!(first.shape(), &[64, 64, 3]);
        assert_ne!(first, second);
    }

    #[test]
    fn strength_scales_spread() {
        let rng = StdRng::seed_from_u64(9);
        let mut src = NoiseSource::with_rng(Resolution::new(32, 32), 10.0, rng);
        let img = src.get_image();
        let n = img.len() as f32;
        let mean = img.sum() / n;
        let var = img.mapv(|v| (v - mean).powi(2)).sum() / n;
        let std = var.sqrt();
        assert!(mean.abs() < 1.5, "mean {mean}");
        assert!((8.0..12.0).contains(&std), "std {std}");
    }
}
