//! High-level image operations.
//!
//! These functions combine naming, configuration and backend execution.
//! [`plan_variants`] decides every file one source image produces;
//! [`transcode_image`] writes them.

use super::backend::{BackendError, ImageBackend};
use super::params::{ConvertParams, Quality, ResizeParams};
use crate::config::PipelineConfig;
use crate::naming::{base_name, join_relative, original_artifact_name, sized_artifact_name};
use crate::scan::SourceImage;
use crate::types::{DerivedArtifact, OutputFormat, SizeProfile, VariantKind};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// The variant set every source image receives.
#[derive(Debug, Clone)]
pub struct VariantConfig {
    pub sizes: Vec<SizeProfile>,
    pub formats: Vec<OutputFormat>,
    pub original_format: OutputFormat,
    pub quality: Quality,
}

impl VariantConfig {
    pub fn from_pipeline_config(config: &PipelineConfig) -> Self {
        Self {
            sizes: config.sizes.clone(),
            formats: config.formats.clone(),
            original_format: config.original_format,
            quality: Quality::new(config.quality),
        }
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self::from_pipeline_config(&PipelineConfig::default())
    }
}

/// One file to write, with the parameters the backend needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedVariant {
    Sized {
        profile: String,
        relative_path: String,
        params: ResizeParams,
    },
    Original {
        relative_path: String,
        params: ConvertParams,
    },
}

/// Plan every artifact for one source image without executing anything.
///
/// Order: each size profile with each format (sizes outer, formats inner),
/// then the native-size copy in `original_format`.
pub fn plan_variants(
    image: &SourceImage,
    output_root: &Path,
    config: &VariantConfig,
) -> Vec<PlannedVariant> {
    let stem = base_name(&image.relative_path);
    let subdir = image.output_subdir();
    let output_dir = output_root.join(subdir);

    let mut planned = Vec::with_capacity(config.sizes.len() * config.formats.len() + 1);
    for profile in &config.sizes {
        for &format in &config.formats {
            let name = sized_artifact_name(&stem, profile, format);
            planned.push(PlannedVariant::Sized {
                profile: profile.name.clone(),
                relative_path: join_relative(subdir, &name),
                params: ResizeParams {
                    source: image.path.clone(),
                    output: output_dir.join(&name),
                    width: profile.width,
                    height: profile.height,
                    format,
                    quality: config.quality,
                },
            });
        }
    }

    let name = original_artifact_name(&stem, config.original_format);
    planned.push(PlannedVariant::Original {
        relative_path: join_relative(subdir, &name),
        params: ConvertParams {
            source: image.path.clone(),
            output: output_dir.join(&name),
            format: config.original_format,
            quality: config.quality,
        },
    });

    planned
}

/// Write every variant of one source image.
///
/// Creates the mirrored output directory first (idempotent, safe when
/// several images share it), then writes variants in plan order.
/// `on_written` is called after each successful write. The first failure
/// stops this image and is returned; artifacts already written stay on disk.
pub fn transcode_image(
    backend: &impl ImageBackend,
    image: &SourceImage,
    output_root: &Path,
    config: &VariantConfig,
    mut on_written: impl FnMut(&DerivedArtifact),
) -> Result<Vec<DerivedArtifact>> {
    std::fs::create_dir_all(output_root.join(image.output_subdir()))?;

    let native = backend.identify(&image.path)?;
    if native.width == 0 || native.height == 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "Image has no pixels: {}",
            image.path.display()
        )));
    }

    let mut written = Vec::new();
    for variant in plan_variants(image, output_root, config) {
        let artifact = match variant {
            PlannedVariant::Sized {
                profile,
                relative_path,
                params,
            } => {
                backend.resize(&params)?;
                DerivedArtifact {
                    kind: VariantKind::Sized(profile),
                    format: params.format,
                    path: params.output,
                    relative_path,
                    width: params.width,
                    height: params.height,
                }
            }
            PlannedVariant::Original {
                relative_path,
                params,
            } => {
                backend.convert(&params)?;
                DerivedArtifact {
                    kind: VariantKind::Original,
                    format: params.format,
                    path: params.output,
                    relative_path,
                    width: native.width,
                    height: native.height,
                }
            }
        };
        on_written(&artifact);
        written.push(artifact);
    }

    Ok(written)
}
