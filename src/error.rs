use std::path::PathBuf;

use thiserror::Error;

/// Library error type for background sources.
#[derive(Debug, Error)]
pub enum Error {
    /// A media source was given no files to draw from.
    #[error("no media files supplied")]
    EmptyFileList,

    /// A random color source was asked for zero palette entries.
    #[error("color palette must contain at least one entry")]
    EmptyPalette,

    /// The requested frame buffer length is zero.
    #[error("frame count must be greater than zero")]
    InvalidFrameCount,

    /// The decoding collaborator rejected a file.
    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The resize collaborator failed on a frame from `path`.
    #[error("failed to resize frame from {}", path.display())]
    Resize {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A frame does not match the shape of the buffer it is written into.
    #[error("frame shape {actual:?} does not match buffer shape {expected:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
    },

    /// A video decoded successfully but produced no frames.
    #[error("video {} contains no frames", path.display())]
    EmptyVideo { path: PathBuf },

    /// Every video in the pool failed to load.
    #[error("no loadable media after {attempted} attempt(s)")]
    NoLoadableMedia { attempted: usize },

    /// Video decoding was requested but the crate was built without a decoder.
    #[error("video decoding is unavailable; rebuild with the `ffmpeg` feature")]
    UnsupportedVideo,

    /// One or more configured media paths are missing.
    #[error("invalid media path: {0}")]
    BadDir(String),
}
