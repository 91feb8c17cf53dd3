//! Shared types used across the pipeline stages.
//!
//! [`SizeProfile`] and [`OutputFormat`] are read from configuration;
//! [`DerivedArtifact`] is what the transcoder reports for every file it
//! writes. Discovered inputs live in [`scan::SourceImage`](crate::scan::SourceImage).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A named fixed-box variant, e.g. `thumbnail` at 300x200.
///
/// Every sized artifact is cropped to exactly `width` x `height`,
/// whatever the aspect ratio of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl SizeProfile {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }
}

/// Encoding used for a derived artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    WebP,
    Avif,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension written for this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which variant an artifact represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantKind {
    /// Cover-fit to a [`SizeProfile`] box.
    Sized(String),
    /// Native resolution, re-encoded only.
    Original,
}

/// One file written by the transcoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedArtifact {
    pub kind: VariantKind,
    pub format: OutputFormat,
    /// Location on disk, under the output root.
    pub path: PathBuf,
    /// Location relative to the output root, `/`-separated.
    pub relative_path: String,
    pub width: u32,
    pub height: u32,
}

impl DerivedArtifact {
    /// Short display label: `thumbnail.webp`, `original.webp`.
    pub fn label(&self) -> String {
        match &self.kind {
            VariantKind::Sized(name) => format!("{}.{}", name, self.format),
            VariantKind::Original => format!("original.{}", self.format),
        }
    }
}
