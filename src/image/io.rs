//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into an 8-bit [`Image`].
//! - `save_normalized_png`: write the first xy-plane of a [`FloatImage`] to a
//!   grayscale PNG, stretched to the full 0..255 range.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::axes::{Coordinates, Dimensions};
use super::buffer::{FloatImage, Image};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit grayscale.
///
/// The image is named after the file stem.
pub fn load_grayscale_image(path: &Path) -> Result<Image<u8>, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let dims = Dimensions::xy(img.width() as usize, img.height() as usize);
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Image::from_vec(dims, img.into_raw())
        .map(|img| img.with_name(name))
        .map_err(|e| format!("Failed to load {}: {e}", path.display()))
}

/// Save the `z = t = c = 0` plane of a float image as an 8-bit PNG, mapping
/// the plane minimum to 0 and its maximum to 255.
pub fn save_normalized_png(image: &FloatImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let dims = image.dimensions();
    let pixels = normalized_plane(image);
    let out = GrayImage::from_fn(dims.x as u32, dims.y as u32, |x, y| {
        Luma([pixels[y as usize * dims.x + x as usize]])
    });
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// First xy-plane rescaled to `0..=255`; a constant plane maps to 0.
fn normalized_plane(image: &FloatImage) -> Vec<u8> {
    let dims = image.dimensions();
    let base = dims.offset(&Coordinates::default());
    let plane = &image.data()[base..base + dims.x * dims.y];
    let (lo, hi) = plane
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    plane
        .iter()
        .map(|&v| {
            if range > 0.0 {
                ((v - lo) / range * 255.0).round().clamp(0.0, 255.0) as u8
            } else {
                0
            }
        })
        .collect()
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
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
    fn plane_is_stretched_to_full_range() {
        let img = FloatImage::from_vec(Dimensions::xy(3, 1), vec![-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(normalized_plane(&img), vec![0, 128, 255]);
        let flat = FloatImage::from_vec(Dimensions::xy(2, 1), vec![4.0, 4.0]).unwrap();
        assert_eq!(normalized_plane(&flat), vec![0, 0]);
    }

    #[test]
    fn png_round_trips_through_loader() {
        let dir = std::env::temp_dir().join(format!("gaussian-features-io-{}", std::process::id()));
        let path = dir.join("ramp.png");
        let img = FloatImage::from_fn(Dimensions::xy(4, 2), |c| c.x as f32);
        save_normalized_png(&img, &path).unwrap();
        let loaded = load_grayscale_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), Dimensions::xy(4, 2));
        assert_eq!(loaded.name(), "ramp");
        assert_eq!(&loaded.data()[..4], &[0, 85, 170, 255]);
        let _ = fs::remove_dir_all(&dir);
    }
}
