use ndarray::{Array2, Axis};
use serde::Deserialize;

use crate::frame::ImageView;

/// Pixel value treated as "background" by [`BackgroundMatting`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorKey {
    Gray(u8),
    Rgb([u8; 3]),
}

impl ColorKey {
    fn components(&self) -> &[u8] {
        match self {
            Self::Gray(v) => std::slice::from_ref(v),
            Self::Rgb(c) => c,
        }
    }
}

/// Produce a mask by keying on a single color. Simple, but effective for
/// simulated scenes that render a flat backdrop.
#[derive(Debug, Clone)]
pub struct BackgroundMatting {
    color: ColorKey,
}

impl BackgroundMatting {
    pub const fn new(color: ColorKey) -> Self {
        Self { color }
    }

    /// `mask[[i, j]]` is true iff pixel `(i, j)` equals the key on every channel.
    ///
    /// A one-channel image is compared against each key component and a gray
    /// key is compared against each image channel.
    #[must_use]
    pub fn get_mask(&self, image: ImageView<'_>) -> Array2<bool> {
        let key: Vec<f32> = self.color.components().iter().map(|&c| f32::from(c)).collect();
        image.map_axis(Axis(2), |px| match (px.len(), key.len()) {
            (1, _) => key.iter().all(|&k| px[0] == k),
            (_, 1) => px.iter().all(|&v| v == key[0]),
            (n, m) if n == m => px.iter().zip(&key).all(|(&v, &k)| v == k),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Image;

    #[test]
    fn rgb_key_matches_exact_pixels() {
        let mut img = Image::zeros((2, 2, 3));
        img[[0, 1, 0]] = 10.0;
        img[[1, 1, 2]] = 5.0;
        let mask = BackgroundMatting::new(ColorKey::Rgb([0, 0, 0])).get_mask(img.view());
        assert_eq!(mask.shape(), &[2, 2]);
        assert!(mask[[0, 0]]);
        assert!(!mask[[0, 1]]);
        assert!(mask[[1, 0]]);
        assert!(!mask[[1, 1]]);
    }

    #[test]
    fn gray_key_on_single_channel_image() {
        let img = Image::from_shape_vec((1, 3, 1), vec![7.0, 8.0, 7.0]).unwrap();
        let mask = BackgroundMatting::new(ColorKey::Gray(7)).get_mask(img.view());
        assert_eq!(mask.iter().copied().collect::<Vec<_>>(), vec![true, false, true]);
    }

    #[test]
    fn rgb_key_on_gray_image_needs_uniform_key() {
        let img = Image::from_elem((1, 1, 1), 3.0);
        assert!(BackgroundMatting::new(ColorKey::Rgb([3, 3, 3])).get_mask(img.view())[[0, 0]]);
        assert!(!BackgroundMatting::new(ColorKey::Rgb([3, 4, 3])).get_mask(img.view())[[0, 0]]);
    }

    #[test]
    fn key_parses_from_yaml_scalar_or_triple() {
        let gray: ColorKey = serde_yaml::from_str("12").unwrap();
        let rgb: ColorKey = serde_yaml::from_str("[1, 2, 3]").unwrap();
        assert_eq!(gray, ColorKey::Gray(12));
        assert_eq!(rgb, ColorKey::Rgb([1, 2, 3]));
    }
}
