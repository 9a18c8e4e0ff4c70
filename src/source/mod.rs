//! Background image sources.
//!
//! A source is reset at every episode boundary and asked for one image per
//! simulation step. All variants share the [`ImageSource`] contract so the
//! environment wrapper never needs to know which one it is driving.

mod fixed_color;
mod noise;
mod random_color;
mod random_image;
mod random_video;

use crate::error::Error;
use crate::frame::{ColorMode, ImageView, Resolution};

pub use fixed_color::FixedColorSource;
pub use noise::NoiseSource;
pub use random_color::RandomColorSource;
pub use random_image::{RandomImageOptions, RandomImageSource};
pub use random_video::{DEFAULT_COLOR_FRAME_CAP, RandomVideoOptions, RandomVideoSource};

/// Source of substitute background imagery for a simulated scene.
pub trait ImageSource {
    /// The image for the current step. Always `resolution()` by
    /// `color_mode().channels()` in shape.
    fn get_image(&mut self) -> ImageView<'_>;

    /// Called when an episode ends.
    ///
    /// # Errors
    /// Only media sources that have to load new data can fail. A failed reset
    /// leaves the previous state playable.
    fn reset(&mut self) -> Result<(), Error>;

    /// Identifier of the currently selected color or video, for sources that
    /// choose among several.
    fn env_index(&self) -> Option<usize> {
        None
    }

    fn resolution(&self) -> Resolution;

    fn color_mode(&self) -> ColorMode {
        ColorMode::Rgb
    }
}

impl<S: ImageSource + ?Sized> ImageSource for Box<S> {
    fn get_image(&mut self) -> ImageView<'_> {
        (**self).get_image()
    }

    fn reset(&mut self) -> Result<(), Error> {
        (**self).reset()
    }

    fn env_index(&self) -> Option<usize> {
        (**self).env_index()
    }

    fn resolution(&self) -> Resolution {
        (**self).resolution()
    }

    fn color_mode(&self) -> ColorMode {
        (**self).color_mode()
    }
}
