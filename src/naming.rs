//! Artifact filename convention.
//!
//! Every derived file is named from the source's base filename (the file
//! name without its final extension):
//!
//! - sized variants: `{stem}-{profile}.{ext}` → `photo-thumbnail.webp`
//! - native-size copy: `{stem}.{ext}` → `photo.webp`
//!
//! Names are deterministic, so a re-run overwrites the previous output in
//! place instead of accumulating copies.

use crate::types::{OutputFormat, SizeProfile};
use std::path::Path;

/// Base filename of a source image: `photo.jpg` → `photo`,
/// `archive.2024.png` → `archive.2024`.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Filename for a cover-fit variant.
pub fn sized_artifact_name(stem: &str, profile: &SizeProfile, format: OutputFormat) -> String {
    format!("{}-{}.{}", stem, profile.name, format.extension())
}

/// Filename for the native-size, alternate-format copy.
pub fn original_artifact_name(stem: &str, format: OutputFormat) -> String {
    format!("{}.{}", stem, format.extension())
}

/// Join a relative directory and a filename with `/`, for display and
/// reporting. An empty directory yields just the filename.
pub fn join_relative(dir: &Path, file_name: &str) -> String {
    if dir.as_os_str().is_empty() {
        return file_name.to_string();
    }
    let dir = dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", dir, file_name)
}
