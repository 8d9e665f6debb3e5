//! Photo I/O helpers.
//!
//! The pipeline itself never touches the filesystem; these helpers exist for
//! the demo binary and offline tooling.

use super::RgbImage;
use ::image::RgbImage as EncodedRgb;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to interleaved 8-bit RGB.
pub fn load_color_image(path: &Path) -> Result<RgbImage, String> {
    let img = ::image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    Ok(RgbImage {
        w,
        h,
        data: img.into_raw(),
    })
}

/// Save an owned RGB buffer to an image file; the format follows the file
/// extension.
pub fn save_color(buffer: &RgbImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let img = EncodedRgb::from_raw(buffer.w as u32, buffer.h as u32, buffer.data.clone())
        .ok_or_else(|| "Failed to create image buffer".to_string())?;
    img.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_reload_round_trips_pixels() {
        let mut img = RgbImage::new(4, 3);
        img.set_rgb(0, 0, [10, 20, 30]);
        img.set_rgb(3, 2, [200, 100, 50]);

        let path = std::env::temp_dir().join("sudoku_scan_io_test.png");
        save_color(&img, &path).unwrap();
        let loaded = load_color_image(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!((loaded.w, loaded.h), (4, 3));
        assert_eq!(loaded.rgb(0, 0), [10, 20, 30]);
        assert_eq!(loaded.rgb(3, 2), [200, 100, 50]);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_color_image(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(err.contains("/nonexistent/photo.png"), "got {err}");
    }
}
