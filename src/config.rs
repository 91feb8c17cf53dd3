//! Pipeline configuration.
//!
//! Handles loading and validating the optional `optimize-images.toml` file.
//! Every key has a default; a config file only needs the values it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_dir = "images"      # Source tree, scanned recursively
//! output_dir = "optimized"  # Mirrors the source tree
//! quality = 80              # Lossy encoding quality (0-100)
//! formats = ["webp", "avif"]
//! original_format = "webp"  # Format of the native-size copy
//! concurrency = 4           # Images transcoded at once (1-256)
//!
//! [[sizes]]
//! name = "thumbnail"
//! width = 300
//! height = 200
//!
//! [[sizes]]
//! name = "small"
//! width = 600
//! height = 400
//!
//! [[sizes]]
//! name = "medium"
//! width = 1200
//! height = 800
//!
//! [[sizes]]
//! name = "large"
//! width = 1920
//! height = 1080
//! ```
//!
//! Giving `sizes` or `formats` replaces the whole default list.
//! Unknown keys are rejected to catch typos early.

use crate::types::{OutputFormat, SizeProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "optimize-images.toml";

/// Upper bound for `concurrency`; each unit is one worker thread.
pub const MAX_CONCURRENCY: usize = 256;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything a pipeline run needs to know.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Root of the source tree.
    pub input_dir: PathBuf,
    /// Root of the output tree, created if absent.
    pub output_dir: PathBuf,
    /// Lossy encoding quality (0 = worst, 100 = best). PNG ignores it.
    pub quality: u32,
    /// Formats written for every size profile.
    pub formats: Vec<OutputFormat>,
    /// Format of the native-resolution copy.
    pub original_format: OutputFormat,
    /// Maximum number of images transcoded at the same time; also the batch size.
    pub concurrency: usize,
    /// Fixed boxes every image is cover-fitted into, in output order.
    pub sizes: Vec<SizeProfile>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("optimized"),
            quality: 80,
            formats: vec![OutputFormat::WebP, OutputFormat::Avif],
            original_format: OutputFormat::WebP,
            concurrency: 4,
            sizes: default_sizes(),
        }
    }
}

fn default_sizes() -> Vec<SizeProfile> {
    vec![
        SizeProfile::new("thumbnail", 300, 200),
        SizeProfile::new("small", 600, 400),
        SizeProfile::new("medium", 1200, 800),
        SizeProfile::new("large", 1920, 1080),
    ]
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::Validation(format!(
                "concurrency must be 1-{}",
                MAX_CONCURRENCY
            )));
        }
        if self.input_dir == self.output_dir {
            return Err(ConfigError::Validation(
                "output_dir must differ from input_dir".into(),
            ));
        }
        if self.formats.is_empty() {
            return Err(ConfigError::Validation("formats must not be empty".into()));
        }
        let mut formats = HashSet::new();
        for format in &self.formats {
            if !formats.insert(format) {
                return Err(ConfigError::Validation(format!(
                    "formats lists {} more than once",
                    format
                )));
            }
        }
        if self.sizes.is_empty() {
            return Err(ConfigError::Validation("sizes must not be empty".into()));
        }
        let mut names = HashSet::new();
        for size in &self.sizes {
            validate_size(size)?;
            if !names.insert(size.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "size name '{}' is used more than once",
                    size.name
                )));
            }
        }
        Ok(())
    }
}

/// Profile names end up inside file names, so they must be a single
/// plain path segment.
fn validate_size(size: &SizeProfile) -> Result<(), ConfigError> {
    if size.name.is_empty() {
        return Err(ConfigError::Validation("size name must not be empty".into()));
    }
    if size.name.contains(['/', '\\', '.']) {
        return Err(ConfigError::Validation(format!(
            "size name '{}' must not contain '/', '\\' or '.'",
            size.name
        )));
    }
    if size.width == 0 || size.height == 0 {
        return Err(ConfigError::Validation(format!(
            "size '{}' must have non-zero width and height",
            size.name
        )));
    }
    Ok(())
}

/// Parse and validate config from TOML text.
pub fn parse_config(content: &str) -> Result<PipelineConfig, ConfigError> {
    let config: PipelineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file.
///
/// Returns the defaults when the file does not exist. A file that exists
/// must parse, contain only known keys, and validate.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# optimize-images configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Source tree, scanned recursively for jpg, jpeg, png, gif, bmp and tiff files.
# Created empty if it does not exist.
input_dir = "images"

# Output tree. Mirrors the directory structure of input_dir.
output_dir = "optimized"

# Lossy encoding quality (0 = worst, 100 = best). Applies to webp, avif and
# jpeg output; png is lossless.
quality = 80

# Formats written for every size below: webp, avif, jpeg, png.
formats = ["webp", "avif"]

# Format of the extra full-resolution copy ({name}.{ext}).
original_format = "webp"

# Images transcoded at the same time (1-256). Images are processed in batches
# of this many; a batch finishes before the next one starts.
concurrency = 4

# ---------------------------------------------------------------------------
# Size profiles
# ---------------------------------------------------------------------------
# Each image is scaled to cover the box and cropped around its centre, so
# every output has exactly these dimensions. Written as {name}-{size}.{ext}.
# Listing any [[sizes]] replaces all of the defaults.

[[sizes]]
name = "thumbnail"
width = 300
height = 200

[[sizes]]
name = "small"
width = 600
height = 400

[[sizes]]
name = "medium"
width = 1200
height = 800

[[sizes]]
name = "large"
width = 1920
height = 1080
"##
}
