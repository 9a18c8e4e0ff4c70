//! Media library discovery for configured file and directory paths.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Error;

const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];
const VIDEO_EXTS: &[&str] = &["mp4", "avi", "mkv", "mov", "webm", "m4v"];

/// Which kind of media a scan collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTS,
            Self::Video => VIDEO_EXTS,
        }
    }
}

/// Options controlling directory scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { recursive: true }
    }
}

/// Return `true` if `path` has an extension belonging to `kind`.
#[must_use]
pub fn is_supported(path: &Path, kind: MediaKind) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            kind.extensions().iter().any(|e| *e == ext)
        })
}

/// Resolve `paths` into a sorted list of media files.
///
/// Files are taken as given, whatever their extension; directories are walked
/// and filtered by `kind`.
///
/// # Errors
/// Returns [`Error::BadDir`] naming every path that does not exist.
pub fn scan_media(
    paths: &[PathBuf],
    kind: MediaKind,
    opts: &ScanOptions,
) -> Result<Vec<PathBuf>, Error> {
    let bad: Vec<_> = paths.iter().filter(|p| !p.exists()).collect();
    if !bad.is_empty() {
        let joined = bad
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::BadDir(joined));
    }

    let mut out = Vec::new();
    for root in paths {
        if root.is_file() {
            out.push(root.clone());
            continue;
        }
        let mut wd = WalkDir::new(root);
        if !opts.recursive {
            wd = wd.max_depth(1);
        }

        for entry in wd
            .into_iter()
            .filter_entry(|e| !should_skip_dir(e))
            .flatten()
        {
            let path = entry.path();
            if path.is_file() && is_supported(path, kind) {
                out.push(path.to_path_buf());
            }
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}

fn should_skip_dir(entry: &DirEntry) -> bool {
    // Never skip the root; tempfile roots can be dot-dirs.
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}
