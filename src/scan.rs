//! Source image discovery.
//!
//! Stage 1 of the pipeline. Walks the input root depth-first, at any depth,
//! and collects every regular file whose extension is one of
//! [`SUPPORTED_EXTENSIONS`] (case-insensitive). Other files and directories
//! holding no images are skipped silently.
//!
//! ```text
//! images/                       SourceImage.relative_path   output subdir
//! ├── hero.JPG                  hero.JPG                    (root)
//! ├── notes.txt                 (skipped)
//! └── listings/
//!     └── 12-oak-st/
//!         ├── front.png         listings/12-oak-st/front.png   listings/12-oak-st
//!         └── plan.pdf          (skipped)
//! ```
//!
//! Entries within a directory are visited in file-name order so that log
//! output is stable between runs; nothing downstream relies on the order.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Raster formats accepted as input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

/// An input file found under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Path relative to the input root, e.g. `listings/12-oak-st/front.png`.
    pub relative_path: PathBuf,
}

impl SourceImage {
    /// Directory under the output root that receives this image's artifacts.
    /// Mirrors the relative directory of the source; empty for top-level files.
    pub fn output_subdir(&self) -> &Path {
        self.relative_path.parent().unwrap_or(Path::new(""))
    }

    /// Relative path with `/` separators, for display.
    pub fn display_path(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Whether a path carries one of the supported extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Discover all supported images under `root`.
///
/// Fails with [`ScanError::DirectoryNotFound`] when `root` does not exist
/// (or is not a directory); the caller decides whether that is fatal.
pub fn discover(root: &Path) -> Result<Vec<SourceImage>, ScanError> {
    discover_excluding(root, None)
}

/// Like [`discover`], but never descends into `excluded`.
///
/// Used to keep an output tree that lives inside the input tree from being
/// read back as input on the next run. Paths are compared after
/// canonicalisation; an `excluded` path that does not exist excludes nothing.
pub fn discover_excluding(
    root: &Path,
    excluded: Option<&Path>,
) -> Result<Vec<SourceImage>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }
    let root = std::fs::canonicalize(root)?;
    let excluded = excluded.and_then(|p| std::fs::canonicalize(p).ok());

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || excluded.as_deref() != Some(e.path()));

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
        images.push(SourceImage {
            path: entry.path().to_path_buf(),
            relative_path,
        });
    }

    Ok(images)
}
