//! Batch scheduling and the top-level pipeline run.
//!
//! Stage 2 of the pipeline. Takes the images found by [`scan`](crate::scan)
//! and drives [`transcode_image`] over them with bounded parallelism.
//!
//! ## Batches
//!
//! The discovered list is cut into contiguous batches of at most
//! `concurrency` images, in discovery order. Batches run one after another;
//! the images of a batch run at the same time on a rayon pool with
//! `concurrency` threads (fewer when there are fewer images), and the next batch starts only when every image
//! of the current one has finished or failed.
//!
//! ```text
//! 10 images, concurrency 4:
//!
//!   batch 1  [0 1 2 3]  ──wait──▶  batch 2  [4 5 6 7]  ──wait──▶  batch 3  [8 9]
//! ```
//!
//! ## Failure policy
//!
//! A failure while transcoding one image is reported as a
//! [`ProcessEvent::ImageFailed`] and counted; it never stops sibling or later
//! images. Whatever that image wrote before failing stays on disk. Only
//! setup problems (creating the directories, walking the input tree,
//! building the thread pool) abort a run.
//!
//! Two sources whose artifacts would share names (`photo.jpg` and
//! `photo.png` in one directory) are detected before any batch starts. The
//! first in discovery order is transcoded; the other is reported as failed
//! and never touches the output tree.
//!
//! When the output root lies inside the input root it is skipped during
//! discovery, so a re-run never reads its own artifacts back as sources.
//!
//! ## Output Structure
//!
//! ```text
//! optimized/
//! ├── hero-thumbnail.webp
//! ├── hero-thumbnail.avif
//! ├── ...
//! ├── hero-large.avif
//! ├── hero.webp                     # native size, original_format
//! └── listings/12-oak-st/
//!     ├── front-thumbnail.webp
//!     └── ...
//! ```

use crate::config::PipelineConfig;
use crate::imaging::{BackendError, ImageBackend, RustBackend, VariantConfig, transcode_image};
use crate::naming::{base_name, join_relative};
use crate::scan::{self, ScanError, SourceImage};
use crate::types::DerivedArtifact;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot create {path}: {source}")]
    Setup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Discovery failed: {0}")]
    Discover(#[from] ScanError),
    #[error("Cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One written artifact, as reported in progress output.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantInfo {
    /// `thumbnail.webp`, `original.webp`, ...
    pub label: String,
    /// Path relative to the output root.
    pub output: String,
    pub width: u32,
    pub height: u32,
}

impl From<&DerivedArtifact> for VariantInfo {
    fn from(artifact: &DerivedArtifact) -> Self {
        Self {
            label: artifact.label(),
            output: artifact.relative_path.clone(),
            width: artifact.width,
            height: artifact.height,
        }
    }
}

/// Progress events emitted during a run.
///
/// Sent from worker threads; events of images in the same batch interleave.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// The input tree holds no supported images. The run ends successfully.
    NoImages { input_dir: PathBuf },
    RunStarted {
        image_count: usize,
        batch_count: usize,
        concurrency: usize,
    },
    /// `index` is 1-based.
    BatchStarted {
        index: usize,
        batch_count: usize,
        size: usize,
    },
    ImageStarted { source_path: String },
    VariantWritten {
        source_path: String,
        variant: VariantInfo,
    },
    /// Emitted exactly once per failing image.
    ImageFailed { source_path: String, error: String },
}

impl ProcessEvent {
    /// Whether this event belongs on the error channel.
    pub fn is_error(&self) -> bool {
        matches!(self, ProcessEvent::ImageFailed { .. })
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Images discovered.
    pub images: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Files written, including those of images that later failed.
    pub artifacts: usize,
    pub batches: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images, {} optimized, {} failed, {} files written",
            self.images, self.succeeded, self.failed, self.artifacts
        )
    }
}

/// Outcome of one image.
#[derive(Debug)]
struct ImageOutcome {
    written: usize,
    result: Result<Vec<DerivedArtifact>, BackendError>,
}

/// An image skipped because its artifacts would overwrite another's.
#[derive(Debug, Clone, PartialEq)]
struct NameCollision {
    image: SourceImage,
    /// The earlier image, in discovery order, that keeps the names.
    kept: SourceImage,
}

/// Separate images whose artifact names are already claimed.
///
/// Artifact names depend only on the output subdirectory and the file stem,
/// so `photo.jpg` and `photo.png` in one directory would write the same
/// files. The first in discovery order keeps the names. Keys compare
/// case-insensitively since the output may land on a case-insensitive
/// filesystem.
fn split_name_collisions(images: Vec<SourceImage>) -> (Vec<SourceImage>, Vec<NameCollision>) {
    let mut claimed: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<SourceImage> = Vec::with_capacity(images.len());
    let mut collisions = Vec::new();

    for image in images {
        let key = join_relative(image.output_subdir(), &base_name(&image.relative_path))
            .to_lowercase();
        match claimed.get(&key).copied() {
            Some(owner) => collisions.push(NameCollision {
                kept: kept[owner].clone(),
                image,
            }),
            None => {
                claimed.insert(key, kept.len());
                kept.push(image);
            }
        }
    }

    (kept, collisions)
}

/// Contiguous index ranges of at most `concurrency` items covering `0..len`.
///
/// A `concurrency` of zero is treated as one.
pub fn plan_batches(len: usize, concurrency: usize) -> Vec<Range<usize>> {
    let size = concurrency.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

pub fn process(
    config: &PipelineConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, config, events)
}

/// Run the pipeline using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    config: &PipelineConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(event);
        }
    };

    ensure_dir(&config.input_dir)?;
    ensure_dir(&config.output_dir)?;

    let excluded = Some(config.output_dir.as_path());
    let images = match scan::discover_excluding(&config.input_dir, excluded) {
        Ok(images) => images,
        // Removed between creation and the walk: an empty input, not an error.
        Err(ScanError::DirectoryNotFound(_)) => {
            ensure_dir(&config.input_dir)?;
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    if images.is_empty() {
        emit(ProcessEvent::NoImages {
            input_dir: config.input_dir.clone(),
        });
        return Ok(RunSummary::default());
    }

    let discovered = images.len();
    let (images, collisions) = split_name_collisions(images);

    let batches = plan_batches(images.len(), config.concurrency);
    // No batch holds more than `images.len()` images.
    let threads = config.concurrency.min(images.len()).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("transcode-{i}"))
        .build()?;
    let variant_config = VariantConfig::from_pipeline_config(config);

    emit(ProcessEvent::RunStarted {
        image_count: discovered,
        batch_count: batches.len(),
        concurrency: config.concurrency,
    });

    let mut summary = RunSummary {
        images: discovered,
        failed: collisions.len(),
        batches: batches.len(),
        ..RunSummary::default()
    };

    for collision in collisions {
        emit(ProcessEvent::ImageFailed {
            source_path: collision.image.display_path(),
            error: format!(
                "Output names collide with {}; skipped",
                collision.kept.display_path()
            ),
        });
    }

    for (i, range) in batches.iter().enumerate() {
        let batch = &images[range.clone()];
        emit(ProcessEvent::BatchStarted {
            index: i + 1,
            batch_count: batches.len(),
            size: batch.len(),
        });

        let outcomes: Vec<ImageOutcome> = pool.install(|| {
            batch
                .par_iter()
                .map(|image| {
                    process_image(
                        backend,
                        image,
                        &config.output_dir,
                        &variant_config,
                        events.as_ref(),
                    )
                })
                .collect()
        });

        for outcome in outcomes {
            summary.artifacts += outcome.written;
            match outcome.result {
                Ok(_) => summary.succeeded += 1,
                Err(_) => summary.failed += 1,
            }
        }
    }

    Ok(summary)
}

/// Transcode one image, reporting progress and containing its failure.
fn process_image(
    backend: &impl ImageBackend,
    image: &SourceImage,
    output_root: &Path,
    config: &VariantConfig,
    events: Option<&Sender<ProcessEvent>>,
) -> ImageOutcome {
    let source_path = image.display_path();
    let emit = |event: ProcessEvent| {
        if let Some(tx) = events {
            let _ = tx.send(event);
        }
    };

    emit(ProcessEvent::ImageStarted {
        source_path: source_path.clone(),
    });

    let mut written = 0;
    let result = transcode_image(backend, image, output_root, config, |artifact| {
        written += 1;
        emit(ProcessEvent::VariantWritten {
            source_path: source_path.clone(),
            variant: VariantInfo::from(artifact),
        });
    });

    if let Err(e) = &result {
        emit(ProcessEvent::ImageFailed {
            source_path,
            error: e.to_string(),
        });
    }

    ImageOutcome { written, result }
}

fn ensure_dir(path: &Path) -> Result<(), ProcessError> {
    std::fs::create_dir_all(path).map_err(|source| ProcessError::Setup {
        path: path.to_path_buf(),
        source,
    })
}
