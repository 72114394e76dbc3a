//! I/O helpers for fundus images and JSON reports.
//!
//! - `load_rgb_image` / `load_gray_image`: decode PNG/JPEG/etc. from disk.
//! - `save_rgb_image` / `save_gray_image`: write buffers, creating parents.
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::error::{AnalysisError, Result};
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path)
        .map_err(|e| AnalysisError::InputError(format!("failed to open {}: {e}", path.display())))?
        .into_rgb8();
    if img.width() == 0 || img.height() == 0 {
        return Err(AnalysisError::InputError(format!(
            "{} has no pixels",
            path.display()
        )));
    }
    Ok(img)
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_gray_image(path: &Path) -> Result<GrayImage> {
    let img = image::open(path)
        .map_err(|e| AnalysisError::InputError(format!("failed to open {}: {e}", path.display())))?
        .into_luma8();
    if img.width() == 0 || img.height() == 0 {
        return Err(AnalysisError::InputError(format!(
            "{} has no pixels",
            path.display()
        )));
    }
    Ok(img)
}

pub fn save_rgb_image(img: &RgbImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    img.save(path)?;
    Ok(())
}

pub fn save_gray_image(img: &GrayImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    img.save(path)?;
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        AnalysisError::InputError(format!("failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn gray_mask_survives_save_and_load() {
        let dir = std::env::temp_dir().join(format!("retina_analysis_io_{}", std::process::id()));
        let path = dir.join("nested").join("skeleton.png");
        let mask = GrayImage::from_fn(9, 7, |x, y| Luma([if x == y { 255 } else { 0 }]));
        save_gray_image(&mask, &path).unwrap();
        let back = load_gray_image(&path).unwrap();
        assert_eq!(back, mask);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let path = std::env::temp_dir().join("retina_analysis_io_missing.png");
        assert!(matches!(
            load_gray_image(&path),
            Err(AnalysisError::InputError(_))
        ));
    }
}
