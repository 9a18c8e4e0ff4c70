//! Image shapes and the preallocated frame buffer shared by the media sources.

use ndarray::{Array3, Array4, ArrayView3, Axis, Zip};
use serde::Deserialize;

use crate::error::Error;

/// An owned background image of shape (height, width, channels).
pub type Image = Array3<f32>;

/// A borrowed background image. Aliases storage owned by a source.
pub type ImageView<'a> = ArrayView3<'a, f32>;

/// Decoder output for a single still, (height, width, channels).
pub type RawFrame = Array3<u8>;

/// Decoder output for a clip, (frames, height, width, channels).
pub type RawClip = Array4<u8>;

/// Target spatial size of every image a source produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Resolution {
    pub height: u32,
    pub width: u32,
}

impl Resolution {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Array shape for this resolution with `mode`'s channel count.
    #[must_use]
    pub const fn shape(&self, mode: ColorMode) -> [usize; 3] {
        [self.height as usize, self.width as usize, mode.channels()]
    }
}

/// Whether media is decoded to three color channels or one luma channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Rgb,
    Gray,
}

impl ColorMode {
    pub const fn from_grayscale(grayscale: bool) -> Self {
        if grayscale { Self::Gray } else { Self::Rgb }
    }

    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Gray => 1,
        }
    }
}

/// Contiguous cache of decoded frames, (frames, height, width, channels).
///
/// A buffer is only handed out once every slot has been written, so readers
/// never observe a partially built buffer.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    frames: Array4<f32>,
}

impl FrameBuffer {
    /// Allocate `len` frames and fill slot `i` with the result of `fill(i)`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFrameCount`] for `len == 0`, the first error
    /// produced by `fill`, or [`Error::ShapeMismatch`] if a frame has the wrong
    /// shape.
    pub fn build<F>(
        len: usize,
        resolution: Resolution,
        mode: ColorMode,
        mut fill: F,
    ) -> Result<Self, Error>
    where
        F: FnMut(usize) -> Result<RawFrame, Error>,
    {
        if len == 0 {
            return Err(Error::InvalidFrameCount);
        }
        let [h, w, c] = resolution.shape(mode);
        let mut frames = Array4::<f32>::zeros((len, h, w, c));
        for (i, mut slot) in frames.axis_iter_mut(Axis(0)).enumerate() {
            let raw = fill(i)?;
            if raw.shape() != slot.shape() {
                let s = raw.shape();
                return Err(Error::ShapeMismatch {
                    expected: [h, w, c],
                    actual: [s[0], s[1], s[2]],
                });
            }
            Zip::from(&mut slot)
                .and(&raw)
                .for_each(|dst, &src| *dst = f32::from(src));
        }
        Ok(Self { frames })
    }

    /// Number of cached frames. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len_of(Axis(0))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow frame `index`, wrapping modulo the buffer length.
    #[must_use]
    pub fn frame(&self, index: usize) -> ImageView<'_> {
        self.frames.index_axis(Axis(0), index % self.len())
    }
}

/// Fill a (height, width, 3) image with a constant RGB color.
pub(crate) fn solid_rgb(resolution: Resolution, color: [u8; 3]) -> Image {
    let [h, w, c] = resolution.shape(ColorMode::Rgb);
    Array3::from_shape_fn((h, w, c), |(_, _, ch)| f32::from(color[ch]))
}

/// Round and clamp an image into 8-bit pixels, e.g. for writing previews.
#[must_use]
pub fn quantize(image: ImageView<'_>) -> RawFrame {
    image.mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_copies_frames_in_order() {
        let res = Resolution::new(2, 3);
        let buf = FrameBuffer::build(4, res, ColorMode::Gray, |i| {
            Ok(RawFrame::from_elem((2, 3, 1), i as u8 * 10))
        })
        .unwrap();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.frame(2)[[1, 2, 0]], 20.0);
        assert_eq!(buf.frame(5)[[0, 0, 0]], 10.0);
    }

    #[test]
    fn build_rejects_wrong_shape() {
        let res = Resolution::new(2, 2);
        let err = FrameBuffer::build(1, res, ColorMode::Rgb, |_| Ok(RawFrame::zeros((2, 2, 1))))
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: [2, 2, 3], actual: [2, 2, 1] }));
    }

    #[test]
    fn build_rejects_zero_frames() {
        let res = Resolution::new(1, 1);
        let err = FrameBuffer::build(0, res, ColorMode::Rgb, |_| Ok(RawFrame::zeros((1, 1, 3))))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFrameCount));
    }

    #[test]
    fn quantize_clamps_out_of_range_values() {
        let img = Image::from_shape_vec((1, 1, 3), vec![-12.0, 127.6, 300.0]).unwrap();
        let q: Vec<u8> = quantize(img.view()).iter().copied().collect();
        assert_eq!(q, vec![0, 128, 255]);
    }
}
