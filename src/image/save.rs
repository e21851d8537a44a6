//! Image saving utilities.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::{Error, Result};

use super::{dimensions, ensure_non_empty, Image, INTENSITY_MAX, INTENSITY_MIN};

/// Save a normalized image as an 8-bit grayscale file.
///
/// Values are clamped to [0, 1] and scaled to [0, 255]. The format is
/// inferred from the path extension.
///
/// # Errors
///
/// Returns an error if the image is empty or cannot be saved.
pub fn save_image<P: AsRef<Path>>(image: &Image, path: P) -> Result<()> {
    let path = path.as_ref();

    ensure_non_empty(image)?;

    let gray = to_gray8(image)?;
    gray.save(path).map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Saved {}", path.display());
    Ok(())
}

/// Convert a normalized image to an 8-bit grayscale buffer.
///
/// # Errors
///
/// Returns an error if a dimension does not fit in `u32`.
pub fn to_gray8(image: &Image) -> Result<GrayImage> {
    let (width, height) = dimensions(image);
    let too_large = |_| Error::InvalidParameter {
        name: "image".to_string(),
        reason: format!("{width}x{height} exceeds the 8-bit image size limit"),
    };
    let width_u32 = u32::try_from(width).map_err(too_large)?;
    let height_u32 = u32::try_from(height).map_err(too_large)?;

    let mut gray = GrayImage::new(width_u32, height_u32);
    for ((y, x), &value) in image.indexed_iter() {
        // Safe: indices are bounded by dimensions that fit in u32
        #[allow(clippy::cast_possible_truncation)]
        gray.put_pixel(x as u32, y as u32, Luma([quantize(value)]));
    }

    Ok(gray)
}

/// Quantize a value from [0, 1] to [0, 255] with clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    (value.clamp(INTENSITY_MIN, INTENSITY_MAX) * 255.0).round() as u8
}
