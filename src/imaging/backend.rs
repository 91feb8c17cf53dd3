//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the transcoder
//! needs: identify, resize (cover fit) and convert (native size).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! recording `MockBackend` from this module's test submodule.

use super::params::{ConvertParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` because one backend is shared by every worker of a batch.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Cover-fit the source into exactly `width` x `height` and write it.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Re-encode the source at its native resolution.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::Quality;
    use crate::types::OutputFormat;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Mock backend that records operations instead of encoding.
    ///
    /// Writes an empty file at every output path so tests can inspect the
    /// output tree. Uses Mutex and atomics (not RefCell/Cell) so it is Sync
    /// and works with rayon's par_iter.
    pub struct MockBackend {
        pub dimensions: Dimensions,
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Source file names whose every operation fails.
        pub failing_sources: Vec<String>,
        /// Output file names whose write fails.
        pub failing_outputs: Vec<String>,
        /// Sleep inside each operation, to make overlap observable.
        pub delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Resize {
            source: String,
            output: String,
            width: u32,
            height: u32,
            format: OutputFormat,
            quality: u32,
        },
        Convert {
            source: String,
            output: String,
            format: OutputFormat,
            quality: u32,
        },
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self::with_dimensions(Dimensions {
                width: 2000,
                height: 1000,
            })
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every source identifies as `dims`.
        pub fn with_dimensions(dims: Dimensions) -> Self {
            Self {
                dimensions: dims,
                operations: Mutex::new(Vec::new()),
                failing_sources: Vec::new(),
                failing_outputs: Vec::new(),
                delay: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        pub fn failing_source(mut self, file_name: &str) -> Self {
            self.failing_sources.push(file_name.to_string());
            self
        }

        pub fn failing_output(mut self, file_name: &str) -> Self {
            self.failing_outputs.push(file_name.to_string());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Highest number of operations observed running at the same time.
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        fn track<T>(&self, f: impl FnOnce() -> T) -> T {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            let result = f();
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn check_source(&self, path: &Path) -> Result<(), BackendError> {
            if self.failing_sources.iter().any(|f| path.ends_with(f)) {
                return Err(BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: mock corrupt image",
                    path.display()
                )));
            }
            Ok(())
        }

        fn write_output(&self, path: &Path) -> Result<(), BackendError> {
            if self.failing_outputs.iter().any(|f| path.ends_with(f)) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock encode failure for {}",
                    path.display()
                )));
            }
            std::fs::write(path, b"")?;
            Ok(())
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.track(|| {
                self.operations
                    .lock()
                    .unwrap()
                    .push(RecordedOp::Identify(path.to_string_lossy().to_string()));
                self.check_source(path)?;
                Ok(self.dimensions)
            })
        }

        fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
            self.track(|| {
                self.operations.lock().unwrap().push(RecordedOp::Resize {
                    source: params.source.to_string_lossy().to_string(),
                    output: params.output.to_string_lossy().to_string(),
                    width: params.width,
                    height: params.height,
                    format: params.format,
                    quality: params.quality.value(),
                });
                self.check_source(&params.source)?;
                self.write_output(&params.output)
            })
        }

        fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
            self.track(|| {
                self.operations.lock().unwrap().push(RecordedOp::Convert {
                    source: params.source.to_string_lossy().to_string(),
                    output: params.output.to_string_lossy().to_string(),
                    format: params.format,
                    quality: params.quality.value(),
                });
                self.check_source(&params.source)?;
                self.write_output(&params.output)
            })
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 800,
            height: 600,
        });

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_records_resize_and_writes_placeholder() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("photo-small.avif");
        let backend = MockBackend::new();

        backend
            .resize(&ResizeParams {
                source: "/source.jpg".into(),
                output: output.clone(),
                width: 600,
                height: 400,
                format: OutputFormat::Avif,
                quality: Quality::new(80),
            })
            .unwrap();

        assert!(output.exists());
        let ops = backend.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                width: 600,
                height: 400,
                format: OutputFormat::Avif,
                quality: 80,
                ..
            }
        ));
    }

    #[test]
    fn mock_failing_source_fails_every_operation() {
        let backend = MockBackend::new().failing_source("bad.jpg");
        assert!(backend.identify(Path::new("/in/bad.jpg")).is_err());
        assert!(backend.identify(Path::new("/in/good.jpg")).is_ok());
    }

    #[test]
    fn mock_failing_output_fails_that_write_only() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new().failing_output("photo.webp");
        let convert = |name: &str| {
            backend.convert(&ConvertParams {
                source: "/in/photo.jpg".into(),
                output: tmp.path().join(name),
                format: OutputFormat::WebP,
                quality: Quality::default(),
            })
        };
        assert!(convert("photo.webp").is_err());
        assert!(convert("other.webp").is_ok());
    }
}
