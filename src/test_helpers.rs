//! Shared test utilities: synthetic input trees and artifact inspection.
//!
//! Images are generated in-test with the `image` encoders so the suite needs
//! no binary fixtures.
//!
//! ```ignore
//! let tmp = TempDir::new().unwrap();
//! write_test_image(&tmp.path().join("photo.jpg"), 200, 100);
//! touch(&tmp.path().join("notes.txt"));
//! ```

use image::{DynamicImage, ImageFormat, RgbImage};
use std::path::Path;

use crate::scan::SourceImage;

// =========================================================================
// Input fixtures
// =========================================================================

/// Create an empty file, creating parent directories as needed.
pub fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}

/// Write a gradient image, encoded according to the path's extension.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let format = ImageFormat::from_path(path).unwrap();
    DynamicImage::ImageRgb8(img)
        .save_with_format(path, format)
        .unwrap();
}

/// Write bytes that carry an image extension but do not decode.
pub fn write_corrupt_image(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"definitely not a jpeg").unwrap();
}

// =========================================================================
// Inspection
// =========================================================================

/// Relative paths of discovered images, `/`-separated, in discovery order.
pub fn relative_paths(images: &[SourceImage]) -> Vec<String> {
    images.iter().map(SourceImage::display_path).collect()
}

/// All files under `root`, relative and sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

/// Pixel dimensions of an AVIF file, read from its container metadata.
pub fn avif_dimensions(path: &Path) -> (u32, u32) {
    let data = std::fs::read(path).unwrap();
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(&data)).unwrap();
    let meta = avif.primary_item_metadata().unwrap();
    (meta.max_frame_width.get(), meta.max_frame_height.get())
}

/// Pixel dimensions of any artifact this crate writes.
pub fn artifact_dimensions(path: &Path) -> (u32, u32) {
    let is_avif = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("avif"));
    if is_avif {
        avif_dimensions(path)
    } else {
        image::image_dimensions(path).unwrap()
    }
}

