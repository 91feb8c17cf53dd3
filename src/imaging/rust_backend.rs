//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF) | `image` crate (pure Rust decoders) |
//! | Cover fit | `resize_exact` with `Lanczos3`, then centred `crop_imm` |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | Encode → WebP | `webp` crate (lossy libwebp) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image` crate (lossless) |
//!
//! GIF sources decode to their first frame.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_fill_dimensions, center_crop_offset};
use super::params::{ConvertParams, Quality, ResizeParams};
use crate::types::OutputFormat;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let img = ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;
    if img.width() == 0 || img.height() == 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "Image has no pixels: {}",
            path.display()
        )));
    }
    Ok(img)
}

/// Scale to cover `width` x `height`, then crop the centred box.
pub(crate) fn cover_fit(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (fill_w, fill_h) = calculate_fill_dimensions((img.width(), img.height()), (width, height));
    let filled = img.resize_exact(fill_w, fill_h, FilterType::Lanczos3);
    let (x, y) = center_crop_offset((fill_w, fill_h), (width, height));
    filled.crop_imm(x, y, width, height)
}

/// Reduce to 8-bit RGB or RGBA, the layouts every encoder here accepts.
fn to_8bit(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(img),
        _ if img.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
    }
}

/// Encode and write `img` to `path` in the given format.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let img = to_8bit(img);
    match format {
        OutputFormat::Avif => save_avif(&img, path, quality),
        OutputFormat::WebP => save_webp(&img, path, quality),
        OutputFormat::Jpeg => save_jpeg(&img, path, quality),
        OutputFormat::Png => img
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e))),
    }
}

/// Encode and save as AVIF using rav1e (speed=6 for reasonable throughput).
fn save_avif(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
        writer,
        6,
        quality.value() as u8,
    );
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("AVIF encode failed: {}", e)))
}

/// Encode and save as lossy WebP.
fn save_webp(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let encoder = webp::Encoder::from_image(img)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {}", e)))?;
    let encoded = encoder.encode(quality.value() as f32);
    std::fs::write(path, &*encoded).map_err(BackendError::Io)
}

/// Encode and save as baseline JPEG (alpha is dropped).
fn save_jpeg(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.value() as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let fitted = cover_fit(&img, params.width, params.height);
        save_image(&fitted, &params.output, params.format, params.quality)
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_image(&img, &params.output, params.format, params.quality)
    }
}
