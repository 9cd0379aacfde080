// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for captured photos

use crate::errors::AppResult;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::info;

/// Encode `image` as JPEG into `dir` under a millisecond timestamp name.
///
/// Creates `dir` if needed. Returns the written path.
pub fn save_capture(image: &RgbImage, dir: &Path, quality: u8) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = unique_capture_path(dir, chrono::Utc::now().timestamp_millis());
    let data = encode_jpeg(image, quality)?;
    std::fs::write(&path, &data)?;

    info!(path = %path.display(), size = data.len(), "Capture saved");
    Ok(path)
}

/// Encode an RGB image as JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(buffer)
}

/// `<millis>.jpg`, or `<millis>-<n>.jpg` when that name is taken
fn unique_capture_path(dir: &Path, millis: i64) -> PathBuf {
    let candidate = dir.join(format!("{}.jpg", millis));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|n| dir.join(format!("{}-{}.jpg", millis, n)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Whether `path` has one of `extensions` (case-insensitive)
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| extensions.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
}
