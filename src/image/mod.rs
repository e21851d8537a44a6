//! Grayscale image representation and file boundary.

mod load;
mod save;

pub use load::{from_gray8, load_image};
pub use save::{save_image, to_gray8};

use ndarray::Array2;

use crate::error::{Error, Result};

/// Single-channel image indexed `[row, col]`, i.e. shape `(height, width)`.
/// Values are nominally normalized to the [0, 1] range.
pub type Image = Array2<f32>;

/// Lowest valid intensity.
pub const INTENSITY_MIN: f32 = 0.0;

/// Highest valid intensity.
pub const INTENSITY_MAX: f32 = 1.0;

/// Return `(width, height)` of an image.
#[must_use]
pub fn dimensions(image: &Image) -> (usize, usize) {
    let (height, width) = image.dim();
    (width, height)
}

/// Fail with [`Error::EmptyImage`] if the image has zero extent on any axis.
pub(crate) fn ensure_non_empty(image: &Image) -> Result<()> {
    let (width, height) = dimensions(image);
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_are_width_first() {
        let img = Image::zeros((3, 5));
        assert_eq!(dimensions(&img), (5, 3));
    }

    #[test]
    fn test_ensure_non_empty() {
        assert!(ensure_non_empty(&Image::zeros((2, 2))).is_ok());
        assert!(matches!(
            ensure_non_empty(&Image::zeros((0, 4))),
            Err(Error::EmptyImage {
                width: 4,
                height: 0
            })
        ));
    }
}
