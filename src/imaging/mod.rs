//! Image processing in pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Cover fit** | Lanczos3 `resize_exact` + centred crop |
//! | **Encode** | rav1e (AVIF), libwebp via `webp` (WebP), `image` (JPEG, PNG) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for cover-fit geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Variant planning and per-image transcoding

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use operations::{PlannedVariant, VariantConfig, plan_variants, transcode_image};
pub use params::{ConvertParams, Quality, ResizeParams};
pub use rust_backend::RustBackend;
