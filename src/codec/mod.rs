//! Decoding and resizing collaborators used to fill frame buffers.
//!
//! Sources only depend on the traits here; the default implementations use
//! the `image` crate for stills, `fast_image_resize` for scaling and (with the
//! `ffmpeg` feature) FFmpeg for video.

use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use fast_image_resize as fir;
use ndarray::{Array3, ArrayView3};

use crate::error::Error;
use crate::frame::{ColorMode, RawClip, RawFrame};

#[cfg(feature = "ffmpeg")]
mod ffmpeg;

#[cfg(feature = "ffmpeg")]
pub use self::ffmpeg::FfmpegVideoDecoder;

/// Decodes a still image file into (height, width, channels) pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path, mode: ColorMode) -> Result<RawFrame>;
}

/// Decodes a video file into (frames, height, width, channels) pixels.
pub trait VideoDecoder {
    /// Decode at most `max_frames` frames when a cap is given.
    fn decode(&self, path: &Path, max_frames: Option<usize>, mode: ColorMode) -> Result<RawClip>;
}

/// Scales a frame to a target size. Takes width before height.
pub trait Resizer {
    fn resize(&self, frame: ArrayView3<'_, u8>, width: u32, height: u32) -> Result<RawFrame>;
}

/// Still-image decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path, mode: ColorMode) -> Result<RawFrame> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        let (w, h) = (img.width() as usize, img.height() as usize);
        let pixels = match mode {
            ColorMode::Rgb => img.to_rgb8().into_raw(),
            ColorMode::Gray => img.to_luma8().into_raw(),
        };
        Array3::from_shape_vec((h, w, mode.channels()), pixels)
            .with_context(|| format!("unexpected pixel layout in {}", path.display()))
    }
}

/// Bilinear resizer backed by `fast_image_resize`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastResizer;

impl Resizer for FastResizer {
    fn resize(&self, frame: ArrayView3<'_, u8>, width: u32, height: u32) -> Result<RawFrame> {
        if width == 0 || height == 0 {
            bail!("resize dimensions must be positive");
        }
        let (src_h, src_w, channels) = frame.dim();
        if src_w == width as usize && src_h == height as usize {
            return Ok(frame.to_owned());
        }
        let pixel_type = match channels {
            1 => fir::PixelType::U8,
            3 => fir::PixelType::U8x3,
            n => bail!("unsupported channel count {n}"),
        };

        let contiguous = frame.as_standard_layout();
        let bytes = contiguous
            .as_slice()
            .context("frame is not contiguous after relayout")?;
        let src_view = fir::images::ImageRef::new(src_w as u32, src_h as u32, bytes, pixel_type)
            .context("failed to create source view for resize")?;
        let mut dst_image = fir::images::Image::new(width, height, pixel_type);
        let options = fir::ResizeOptions::new()
            .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Bilinear));
        let mut resizer = fir::Resizer::new();
        resizer
            .resize(&src_view, &mut dst_image, Some(&options))
            .context("resize failed")?;
        let buffer = dst_image.into_vec();
        ensure!(
            buffer.len() == height as usize * width as usize * channels,
            "resized buffer has unexpected length"
        );
        Ok(Array3::from_shape_vec((height as usize, width as usize, channels), buffer)?)
    }
}

/// The video decoder this build ships with.
///
/// # Errors
/// Returns [`Error::UnsupportedVideo`] when built without the `ffmpeg` feature.
pub fn default_video_decoder() -> Result<Box<dyn VideoDecoder>, Error> {
    #[cfg(feature = "ffmpeg")]
    {
        Ok(Box::new(FfmpegVideoDecoder::default()))
    }
    #[cfg(not(feature = "ffmpeg"))]
    {
        Err(Error::UnsupportedVideo)
    }
}
