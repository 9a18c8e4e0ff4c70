use super::ImageSource;
use crate::error::Error;
use crate::frame::{Image, ImageView, Resolution, solid_rgb};

/// Serves the same solid RGB image forever.
#[derive(Debug, Clone)]
pub struct FixedColorSource {
    resolution: Resolution,
    image: Image,
}

impl FixedColorSource {
    pub fn new(resolution: Resolution, color: [u8; 3]) -> Self {
        Self {
            resolution,
            image: solid_rgb(resolution, color),
        }
    }
}

impl ImageSource for FixedColorSource {
    fn get_image(&mut self) -> ImageView<'_> {
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
    fn serves_constant_image() {
        let mut src = FixedColorSource::new(Resolution::new(4, 5), [1, 2, 3]);
        src.reset().unwrap();
        let img = src.get_image();
        assert_eq!(img.shape(), &[4, 5, 3]);
        assert_eq!(img[[3, 4, 0]], 1.0);
        assert_eq!(img[[0, 0, 2]], 3.0);
        assert_eq!(src.env_index(), None);
    }
}
