//! CLI output formatting.
//!
//! Output is **image-centric**: each source image is identified by its path
//! relative to the input root, and everything derived from it is shown as
//! indented context under that path.
//!
//! # Output Format
//!
//! ## Discover
//!
//! ```text
//! Images (3)
//! 001 hero.png
//! 002 listings/12-oak-st/front.jpg
//! 003 listings/12-oak-st/kitchen.jpeg
//! ```
//!
//! ## Run
//!
//! ```text
//! 10 images in 3 batches (concurrency 4)
//! Batch 1/3 (4 images)
//!     hero.png
//!         thumbnail.webp: hero-thumbnail.webp (300x200)
//!         ...
//!         original.webp: hero.webp (2000x1000)
//!     broken.jpg
//!         FAILED: Processing failed: Failed to decode ...
//! 10 images, 9 optimized, 1 failed, 82 files written
//! ```
//!
//! Images of one batch run at the same time, so their lines can interleave.
//! Every variant line carries its output path, which names its source.
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` for testability and has no
//! I/O. `main.rs` decides which stream each line goes to.

use crate::process::{ProcessEvent, RunSummary};
use crate::scan::SourceImage;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn count(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

// ============================================================================
// Discover output
// ============================================================================

/// List discovered images in processing order.
pub fn format_discover_output(images: &[SourceImage]) -> Vec<String> {
    let mut lines = vec![format!("Images ({})", images.len())];
    lines.extend(
        images
            .iter()
            .enumerate()
            .map(|(i, img)| format!("{} {}", format_index(i + 1), img.display_path())),
    );
    lines
}

// ============================================================================
// Run output
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::NoImages { input_dir } => {
            vec![format!(
                "No images found in {}, nothing to do",
                input_dir.display()
            )]
        }
        ProcessEvent::RunStarted {
            image_count,
            batch_count,
            concurrency,
        } => vec![format!(
            "{} in {} (concurrency {})",
            count(*image_count, "image", "images"),
            count(*batch_count, "batch", "batches"),
            concurrency
        )],
        ProcessEvent::BatchStarted {
            index,
            batch_count,
            size,
        } => vec![format!(
            "Batch {}/{} ({})",
            index,
            batch_count,
            count(*size, "image", "images")
        )],
        ProcessEvent::ImageStarted { source_path } => {
            vec![format!("{}{}", indent(1), source_path)]
        }
        ProcessEvent::VariantWritten { variant, .. } => vec![format!(
            "{}{}: {} ({}x{})",
            indent(2),
            variant.label,
            variant.output,
            variant.width,
            variant.height
        )],
        ProcessEvent::ImageFailed { source_path, error } => vec![
            format!("{}{}", indent(1), source_path),
            format!("{}FAILED: {}", indent(2), error),
        ],
    }
}

/// Closing line of a run.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![summary.to_string()]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::VariantInfo;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn count_picks_form() {
        assert_eq!(count(1, "image", "images"), "1 image");
        assert_eq!(count(0, "batch", "batches"), "0 batches");
    }

    #[test]
    fn discover_lists_images_in_order() {
        let images = vec![
            SourceImage {
                path: PathBuf::from("/in/hero.png"),
                relative_path: PathBuf::from("hero.png"),
            },
            SourceImage {
                path: PathBuf::from("/in/listings/front.jpg"),
                relative_path: PathBuf::from("listings/front.jpg"),
            },
        ];
        assert_eq!(
            format_discover_output(&images),
            vec!["Images (2)", "001 hero.png", "002 listings/front.jpg"]
        );
    }

    #[test]
    fn discover_empty() {
        assert_eq!(format_discover_output(&[]), vec!["Images (0)"]);
    }

    #[test]
    fn run_started_line() {
        let event = ProcessEvent::RunStarted {
            image_count: 10,
            batch_count: 3,
            concurrency: 4,
        };
        assert_eq!(
            format_process_event(&event),
            vec!["10 images in 3 batches (concurrency 4)"]
        );
    }

    #[test]
    fn run_started_single_batch() {
        let event = ProcessEvent::RunStarted {
            image_count: 1,
            batch_count: 1,
            concurrency: 4,
        };
        assert_eq!(
            format_process_event(&event),
            vec!["1 image in 1 batch (concurrency 4)"]
        );
    }

    #[test]
    fn batch_started_line() {
        let event = ProcessEvent::BatchStarted {
            index: 3,
            batch_count: 3,
            size: 2,
        };
        assert_eq!(format_process_event(&event), vec!["Batch 3/3 (2 images)"]);
    }

    #[test]
    fn no_images_line() {
        let event = ProcessEvent::NoImages {
            input_dir: PathBuf::from("images"),
        };
        assert_eq!(
            format_process_event(&event),
            vec!["No images found in images, nothing to do"]
        );
    }

    #[test]
    fn image_and_variant_lines() {
        let started = ProcessEvent::ImageStarted {
            source_path: "listings/front.jpg".to_string(),
        };
        let written = ProcessEvent::VariantWritten {
            source_path: "listings/front.jpg".to_string(),
            variant: VariantInfo {
                label: "thumbnail.webp".to_string(),
                output: "listings/front-thumbnail.webp".to_string(),
                width: 300,
                height: 200,
            },
        };
        assert_eq!(
            format_process_event(&started),
            vec!["    listings/front.jpg"]
        );
        assert_eq!(
            format_process_event(&written),
            vec!["        thumbnail.webp: listings/front-thumbnail.webp (300x200)"]
        );
    }

    #[test]
    fn failure_lines_name_the_image() {
        let event = ProcessEvent::ImageFailed {
            source_path: "broken.jpg".to_string(),
            error: "Processing failed: bad header".to_string(),
        };
        assert_eq!(
            format_process_event(&event),
            vec![
                "    broken.jpg",
                "        FAILED: Processing failed: bad header"
            ]
        );
    }

    #[test]
    fn summary_line() {
        let summary = RunSummary {
            images: 2,
            succeeded: 2,
            failed: 0,
            artifacts: 18,
            batches: 1,
        };
        assert_eq!(
            format_summary(&summary),
            vec!["2 images, 2 optimized, 0 failed, 18 files written"]
        );
    }
}
