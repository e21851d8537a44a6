//! Image loading utilities.

use std::path::Path;

use image::{DynamicImage, GenericImageView, GrayImage};

use crate::error::{Error, Result};

use super::Image;

/// Load an image from disk as a normalized grayscale array.
///
/// The image is:
/// 1. Loaded from the specified path
/// 2. Converted to RGB if necessary
/// 3. Reduced to 8-bit luminance (ITU-R 601 weights)
/// 4. Normalized to [0, 1] range
///
/// # Errors
///
/// Returns an error if the image cannot be loaded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = img.dimensions();
    tracing::debug!("Loaded {} ({width}x{height})", path.display());

    Ok(from_gray8(&to_luma(&img)))
}

/// Convert an 8-bit grayscale buffer to a normalized image.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn from_gray8(gray: &GrayImage) -> Image {
    let (width, height) = (gray.width() as usize, gray.height() as usize);

    // Safe: coordinates come from the buffer's own u32 dimensions
    Image::from_shape_fn((height, width), |(y, x)| {
        f32::from(gray.get_pixel(x as u32, y as u32)[0]) / 255.0
    })
}

/// Standard luminosity formula: 0.299*R + 0.587*G + 0.114*B
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_luma(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = img {
        return gray.clone();
    }

    let rgb = img.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let r = f32::from(pixel[0]);
        let g = f32::from(pixel[1]);
        let b = f32::from(pixel[2]);

        // Safe: clamped to [0, 255] before casting
        let luma = 0.299_f32
            .mul_add(r, 0.587_f32.mul_add(g, 0.114 * b))
            .round()
            .clamp(0.0, 255.0) as u8;
        gray.put_pixel(x, y, image::Luma([luma]));
    }

    gray
}
