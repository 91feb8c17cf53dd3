//! # Optimize Images
//!
//! Batch image conversion for web delivery. Point it at a directory of
//! photographs and it writes, for every image, a set of fixed-size
//! cover-fitted variants in modern formats plus a full-size re-encode.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Discover   images/   →  Vec<SourceImage>   (recursive walk, extension filter)
//! 2. Process    images    →  optimized/         (batched transcoding)
//! ```
//!
//! Every source `<dir>/<name>.<ext>` produces, under the output root:
//!
//! ```text
//! <dir>/<name>-<size>.<format>     one per size profile per output format
//! <dir>/<name>.<original_format>   native resolution
//! ```
//!
//! With the stock configuration (four sizes, WebP and AVIF) that is nine
//! files per image.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the input tree and returns supported images in a stable order |
//! | [`process`] | Stage 2: batches images and runs the transcoder with bounded parallelism |
//! | [`imaging`] | Variant planning, cover fit, and per-format encoding |
//! | [`config`] | `optimize-images.toml` loading, validation, and the stock config |
//! | [`types`] | Shared types: size profiles, output formats, derived artifacts |
//! | [`naming`] | Artifact file naming and relative path rendering |
//! | [`output`] | CLI output formatting for discovery and run progress |
//!
//! # Design Decisions
//!
//! ## Cover Fit, Not Contain
//!
//! Every sized variant has exactly the profile's dimensions. The source is
//! scaled until it covers the box and the overflow is cropped evenly from
//! both sides, so layouts can rely on fixed slots without letterboxing.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and AVIF encoding come from the `image` crate (rav1e for AVIF).
//! Lossy WebP goes through the `webp` crate since `image` only writes
//! lossless WebP.
//!
//! ## Strict Batches
//!
//! Images are processed in fixed batches of `concurrency`. A slow image
//! holds back the start of the next batch; in exchange, peak memory is
//! bounded by the batch size and progress output groups cleanly.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
