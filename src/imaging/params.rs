//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. They are the interface
//! between [`operations`](super::operations), which decides which artifacts
//! an image gets, and the [`backend`](super::backend), which does the pixel
//! work. Tests swap in a recording backend without touching operation logic.
//!
//! - [`Quality`]: lossy encoding quality (1–100, default 80), clamped on construction.
//! - [`ResizeParams`]: cover-fit a source into an exact box and encode it.
//! - [`ConvertParams`]: re-encode a source at its native resolution.

use crate::types::OutputFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Cover-fit resize: scale to fill `width` x `height`, crop the overflow
/// around the centre, encode as `format`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Native-size re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}
