// src/textart/mod.rs

//! Image to text-art conversion.
//!
//! An image becomes a grid of ramp characters, one per resampled pixel, rows
//! separated by newlines (including after the last row). Sizing is either
//! width-driven (height follows the aspect ratio, truncated) or
//! "original size", where the native dimensions pass through two clamps that
//! bound the worst-case output: no dimension above [`MAX_DIMENSION`] and no
//! more than [`MAX_TOTAL_CHARS`] cells in total.
//!
//! All scale factors are computed in `f64` and truncated toward zero, so the
//! produced dimensions are reproducible to the pixel. Resampling uses the
//! Catmull-Rom filter: smooth, antialiased and deterministic.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::{Error, Result};

/// Luminance ramp, densest glyph first: a bright pixel maps to a low index
/// (`@`), a dark pixel to a high index (space).
pub const RAMP: &[u8; 12] = b"@#S%?*+;:,. ";

/// Largest dimension allowed in original-size mode.
pub const MAX_DIMENSION: u32 = 800;

/// Largest total cell count allowed in original-size mode.
pub const MAX_TOTAL_CHARS: u32 = 400_000;

/// Decode an image file and encode it as text art.
pub fn encode_file(path: &Path, target_width: Option<u32>) -> Result<String> {
    let img = image::open(path).map_err(|source| Error::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    encode_image(&img, target_width)
}

/// Encode an already decoded image as text art.
pub fn encode_image(img: &DynamicImage, target_width: Option<u32>) -> Result<String> {
    let (orig_width, orig_height) = img.dimensions();
    let (width, height) = target_dimensions(orig_width, orig_height, target_width);
    if width == 0 || height == 0 {
        return Err(Error::DegenerateImage { width, height });
    }
    debug!(width, height, "resampling image");

    let resized = image::imageops::resize(&img.to_rgb8(), width, height, FilterType::CatmullRom);

    let mut art = String::with_capacity((width as usize + 1) * height as usize);
    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = resized.get_pixel(x, y).0;
            let luma = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) as u32;
            let gray = 255 - luma.min(255);
            let index = (gray as usize * (RAMP.len() - 1)) / 255;
            art.push(RAMP[index] as char);
        }
        art.push('\n');
    }
    Ok(art)
}

/// Convert a list of image files, in order. Fail-fast: the first failure
/// aborts the batch and no partial results are returned.
pub fn encode_batch(paths: &[impl AsRef<Path>], target_width: Option<u32>) -> Result<Vec<String>> {
    let mut blocks = Vec::with_capacity(paths.len());
    for path in paths {
        blocks.push(encode_file(path.as_ref(), target_width)?);
    }
    Ok(blocks)
}

/// Final grid dimensions for a source image.
fn target_dimensions(orig_width: u32, orig_height: u32, target_width: Option<u32>) -> (u32, u32) {
    if let Some(width) = target_width {
        let height = (f64::from(orig_height) * f64::from(width) / f64::from(orig_width)) as u32;
        return (width, height);
    }

    let mut width = orig_width;
    let mut height = orig_height;

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        let scale = (f64::from(MAX_DIMENSION) / f64::from(width))
            .min(f64::from(MAX_DIMENSION) / f64::from(height));
        width = (f64::from(width) * scale) as u32;
        height = (f64::from(height) * scale) as u32;
    }

    if width * height > MAX_TOTAL_CHARS {
        let scale = (f64::from(MAX_TOTAL_CHARS) / f64::from(width * height)).sqrt();
        width = (f64::from(width) * scale) as u32;
        height = (f64::from(height) * scale) as u32;
    }

    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    #[test]
    fn test_white_pixel_is_densest_glyph() {
        let art = encode_image(&uniform(1, 1, [255, 255, 255]), None).unwrap();
        assert_eq!(art, "@\n");
    }

    #[test]
    fn test_black_pixel_is_space() {
        let art = encode_image(&uniform(1, 1, [0, 0, 0]), None).unwrap();
        assert_eq!(art, " \n");
    }

    #[test]
    fn test_width_driven_sizing() {
        // 4x4 at width 2 -> floor(4*2/4) = 2 rows of 2 identical chars.
        let art = encode_image(&uniform(4, 4, [128, 128, 128]), Some(2)).unwrap();
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.len(), 2);
            let first = line.chars().next().unwrap();
            assert!(line.chars().all(|c| c == first));
        }
        assert!(art.ends_with('\n'));
    }

    #[test]
    fn test_original_size_clamps() {
        let (w, h) = target_dimensions(2000, 1000, None);
        assert!(w.max(h) <= MAX_DIMENSION);
        assert!(w * h <= MAX_TOTAL_CHARS);
        // Aspect ratio survives both truncating scale steps within a pixel.
        let ratio = f64::from(w) / f64::from(h);
        assert!((ratio - 2.0).abs() < 0.01, "ratio drifted to {ratio}");
    }

    #[test]
    fn test_small_images_pass_through_untouched() {
        assert_eq!(target_dimensions(640, 480, None), (640, 480));
    }

    #[test]
    fn test_dimension_clamp_alone() {
        // 1600x400: only the per-dimension clamp applies (800*200 < 400000).
        assert_eq!(target_dimensions(1600, 400, None), (800, 200));
    }

    #[test]
    fn test_degenerate_target_is_error() {
        // A 400x1 strip at width 200 floors to zero rows.
        let strip = uniform(400, 1, [10, 10, 10]);
        match encode_image(&strip, Some(200)) {
            Err(Error::DegenerateImage { width: 200, height: 0 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_batch_is_fail_fast() {
        let missing = [Path::new("/nonexistent/scrimshaw-test.png")];
        assert!(encode_batch(&missing, None).is_err());
    }

    #[test]
    fn test_gray_midpoint_maps_inside_ramp() {
        // 50% gray: luma 127, inverted 128, index 128*11/255 = 5 -> '*'
        let art = encode_image(&uniform(1, 1, [127, 127, 127]), None).unwrap();
        assert_eq!(art, "*\n");
    }
}
