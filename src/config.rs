use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::frame::Resolution;
use crate::matting::ColorKey;
use crate::scan::ScanOptions;
use crate::source::RandomVideoOptions;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SourceConfig {
    FixedColor {
        #[serde(default = "SourceConfig::default_color")]
        color: [u8; 3],
    },
    RandomColor {
        #[serde(default = "SourceConfig::default_max_images", rename = "max-images")]
        max_images: usize,
    },
    Noise {
        #[serde(default = "SourceConfig::default_noise_strength")]
        strength: f32,
    },
    RandomImage {
        paths: Vec<PathBuf>,
        #[serde(default, rename = "total-frames")]
        total_frames: Option<usize>,
        /// Walk subdirectories of configured directories.
        #[serde(default = "SourceConfig::default_recursive")]
        recursive: bool,
    },
    RandomVideo {
        paths: Vec<PathBuf>,
        #[serde(default = "SourceConfig::default_max_videos", rename = "max-videos")]
        max_videos: usize,
        #[serde(default, rename = "random-bg")]
        random_bg: bool,
        /// Overrides the per-mode default cap on decoded frames.
        #[serde(default, rename = "frame-cap")]
        frame_cap: Option<usize>,
        #[serde(default = "SourceConfig::default_recursive")]
        recursive: bool,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::FixedColor {
            color: Self::default_color(),
        }
    }
}

impl SourceConfig {
    const fn default_color() -> [u8; 3] {
        [0, 0, 0]
    }

    const fn default_max_images() -> usize {
        10
    }

    const fn default_noise_strength() -> f32 {
        255.0
    }

    const fn default_max_videos() -> usize {
        20
    }

    const fn default_recursive() -> bool {
        true
    }

    /// Directory scan options for media-backed sources.
    pub fn scan_options(&self) -> Option<ScanOptions> {
        match *self {
            Self::RandomImage { recursive, .. } | Self::RandomVideo { recursive, .. } => {
                Some(ScanOptions { recursive })
            }
            _ => None,
        }
    }

    /// Kebab-case name of the variant, as written in YAML.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FixedColor { .. } => "fixed-color",
            Self::RandomColor { .. } => "random-color",
            Self::Noise { .. } => "noise",
            Self::RandomImage { .. } => "random-image",
            Self::RandomVideo { .. } => "random-video",
        }
    }

    /// Video options with the grayscale-dependent frame cap filled in.
    pub fn video_options(&self, grayscale: bool) -> Option<RandomVideoOptions> {
        match *self {
            Self::RandomVideo {
                max_videos,
                random_bg,
                frame_cap,
                ..
            } => Some(RandomVideoOptions {
                max_videos,
                random_bg,
                grayscale,
                frame_cap: frame_cap.or(RandomVideoOptions::default_frame_cap(grayscale)),
            }),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::FixedColor { .. } => {}
            Self::RandomColor { max_images } => {
                ensure!(*max_images > 0, "source.max-images must be greater than zero");
            }
            Self::Noise { strength } => {
                ensure!(
                    strength.is_finite() && *strength >= 0.0,
                    "source.strength must be a non-negative number"
                );
            }
            Self::RandomImage {
                paths,
                total_frames,
                ..
            } => {
                ensure!(!paths.is_empty(), "source.paths must list at least one path");
                ensure!(
                    total_frames.is_none_or(|n| n > 0),
                    "source.total-frames must be greater than zero"
                );
            }
            Self::RandomVideo {
                paths,
                max_videos,
                frame_cap,
                ..
            } => {
                ensure!(!paths.is_empty(), "source.paths must list at least one path");
                ensure!(*max_videos > 0, "source.max-videos must be greater than zero");
                ensure!(
                    frame_cap.is_none_or(|n| n > 0),
                    "source.frame-cap must be greater than zero"
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Size of every background image.
    pub resolution: Resolution,
    /// Decode media to a single luma channel.
    pub grayscale: bool,
    /// Optional deterministic seed; OS entropy when absent.
    pub seed: Option<u64>,
    /// Color keyed out of rendered frames to find the background.
    pub mask_color: Option<ColorKey>,
    /// Which background source to build.
    pub source: SourceConfig,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.resolution.height > 0 && self.resolution.width > 0,
            "resolution height and width must be greater than zero"
        );
        self.source
            .validate()
            .with_context(|| format!("invalid {} source", self.source.kind()))?;
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            resolution: Resolution::new(84, 84),
            grayscale: false,
            seed: None,
            mask_color: None,
            source: SourceConfig::default(),
        }
    }
}
