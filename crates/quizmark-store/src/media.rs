//! Image normalization and file output.

use crate::error::{Result, StoreError};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, GenericImageView, ImageEncoder};
use std::fs;
use std::path::{Path, PathBuf};

/// Decode an image, shrink it so its longer side is at most `max_size`, and
/// re-encode it as JPEG at `quality` (1-100). Images are never upscaled.
pub fn normalize_image(bytes: &[u8], max_size: u32, quality: u8) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    let (w, h) = scaled_size(width, height, max_size);

    let img = if (w, h) == (width, height) {
        img
    } else {
        log::debug!("scaling image {width}x{height} to {w}x{h}");
        img.resize_exact(w, h, FilterType::Triangle)
    };

    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

fn scaled_size(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest == 0 || longest <= max_size {
        return (width, height);
    }
    let scale = f64::from(max_size) / f64::from(longest);
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w, h)
}

/// `data:` URL for JPEG bytes.
pub fn jpeg_data_url(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", BASE64_STANDARD.encode(jpeg))
}

/// Write `data` to `dir/filename`, creating `dir` first.
pub fn save_as(data: impl AsRef<[u8]>, filename: &str, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    let path = dir.join(filename);
    fs::write(&path, data).map_err(|e| StoreError::io(&path, e))?;
    log::debug!("saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn jpeg_dimensions(bytes: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).unwrap();
        img.dimensions()
    }

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size(2000, 500, 1000), (1000, 250));
        assert_eq!(scaled_size(300, 1500, 1000), (200, 1000));
        assert_eq!(scaled_size(800, 600, 1000), (800, 600));
        assert_eq!(scaled_size(3, 2, 2), (2, 1));
        assert_eq!(scaled_size(10000, 1, 100), (100, 1));
    }

    #[test]
    fn test_large_image_shrunk() {
        let jpeg = normalize_image(&png(1200, 300), 600, 80).unwrap();
        assert_eq!(jpeg_dimensions(&jpeg), (600, 150));
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let jpeg = normalize_image(&png(40, 20), 1000, 80).unwrap();
        assert_eq!(jpeg_dimensions(&jpeg), (40, 20));
    }

    #[test]
    fn test_invalid_bytes() {
        let err = normalize_image(b"not an image", 1000, 80).unwrap_err();
        assert!(matches!(err, StoreError::Image(_)));
    }

    #[test]
    fn test_data_url() {
        assert_eq!(jpeg_data_url(&[0xff, 0xd8]), "data:image/jpeg;base64,/9g=");
    }

    #[test]
    fn test_save_as_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let path = save_as("hello", "note.txt", &out).unwrap();
        assert_eq!(path, out.join("note.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }
}
