//! Resolution changes by an arbitrary scale factor.
//!
//! There is a single resampling primitive. [`downscale`] is [`resample`] with
//! the reciprocal factor and [`upscale`] is [`resample`] itself, so all three
//! produce identical pixels for equivalent factors.
//!
//! Output dimensions are `scale * size` rounded half-to-even on each axis, so
//! a 5-pixel axis scaled by 0.5 becomes 2 pixels and a 7-pixel axis becomes 4.
//!
//! Filtered kernels run as two separable passes (horizontal, then vertical).
//! When shrinking, the kernel is stretched by the shrink ratio so every
//! source pixel contributes, which makes box filtering an exact area average
//! for integral ratios.

use ndarray::{Array2, Axis};

use crate::error::{Error, Result};
use crate::image::{dimensions, ensure_non_empty, Image};

use super::InterpolationKernel;

/// Ratio of output size to input size, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    /// Horizontal (width) factor.
    pub x: f64,
    /// Vertical (height) factor.
    pub y: f64,
}

impl ScaleFactor {
    /// Same factor on both axes.
    #[must_use]
    pub const fn uniform(factor: f64) -> Self {
        Self {
            x: factor,
            y: factor,
        }
    }

    /// Per-axis factors.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reciprocal factor on each axis.
    #[must_use]
    pub fn reciprocal(self) -> Self {
        Self {
            x: 1.0 / self.x,
            y: 1.0 / self.y,
        }
    }

    /// Check both factors are finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScale`] naming the first offending factor.
    pub fn validate(self) -> Result<()> {
        for factor in [self.x, self.y] {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(Error::InvalidScale { factor });
            }
        }
        Ok(())
    }

    /// Output `(width, height)` for an input of `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateOutput`] if either axis rounds to zero, or
    /// [`Error::OutputTooLarge`] if the output buffer would exceed the
    /// address space.
    pub fn output_dimensions(self, width: usize, height: usize) -> Result<(usize, usize)> {
        let too_large = Error::OutputTooLarge {
            width,
            height,
            factor_x: self.x,
            factor_y: self.y,
        };
        let (Some(out_w), Some(out_h)) = (scaled_len(width, self.x), scaled_len(height, self.y))
        else {
            return Err(too_large);
        };

        if out_w == 0 || out_h == 0 {
            return Err(Error::DegenerateOutput {
                width,
                height,
                factor_x: self.x,
                factor_y: self.y,
            });
        }

        let bytes = out_w
            .checked_mul(out_h)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f32>()));
        if bytes.filter(|&b| b <= MAX_OUTPUT_BYTES).is_none() {
            return Err(too_large);
        }

        Ok((out_w, out_h))
    }
}

impl From<f64> for ScaleFactor {
    fn from(factor: f64) -> Self {
        Self::uniform(factor)
    }
}

impl From<(f64, f64)> for ScaleFactor {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Resample an image by `scale_factor` using `kernel`.
///
/// # Errors
///
/// Returns an error if the factor is not strictly positive, the image is
/// empty, or the output would be empty.
pub fn resample<S: Into<ScaleFactor>>(
    image: &Image,
    scale_factor: S,
    kernel: InterpolationKernel,
) -> Result<Image> {
    let scale = scale_factor.into();
    scale.validate()?;
    ensure_non_empty(image)?;

    let (width, height) = dimensions(image);
    let (out_w, out_h) = scale.output_dimensions(width, height)?;

    tracing::debug!("Resampling {width}x{height} -> {out_w}x{out_h} with {kernel}");

    let out = match kernel.support() {
        None => resample_nearest(image, out_w, out_h),
        Some(support) => {
            // The caller's array is only read; each pass allocates its output
            let horizontal = if out_w == width {
                image.clone()
            } else {
                resample_axis(image, Axis(1), out_w, support, kernel)
            };
            if out_h == height {
                horizontal
            } else {
                resample_axis(&horizontal, Axis(0), out_h, support, kernel)
            }
        }
    };

    Ok(out)
}

/// Enlarge an image by `scale_factor`. Same as [`resample`].
///
/// # Errors
///
/// See [`resample`].
pub fn upscale<S: Into<ScaleFactor>>(
    image: &Image,
    scale_factor: S,
    kernel: InterpolationKernel,
) -> Result<Image> {
    resample(image, scale_factor, kernel)
}

/// Shrink an image by `scale_factor`, i.e. resample by its reciprocal.
///
/// # Errors
///
/// See [`resample`]. The reported invalid factor is the one passed in.
pub fn downscale<S: Into<ScaleFactor>>(
    image: &Image,
    scale_factor: S,
    kernel: InterpolationKernel,
) -> Result<Image> {
    let scale = scale_factor.into();
    scale.validate()?;
    resample(image, scale.reciprocal(), kernel)
}

/// Largest buffer a `Vec` may hold.
#[allow(clippy::cast_sign_loss)]
const MAX_OUTPUT_BYTES: usize = isize::MAX as usize;

/// Round half-to-even, clamped at zero. `None` if the length overflows `usize`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scaled_len(len: usize, factor: f64) -> Option<usize> {
    let scaled = (factor * len as f64).round_ties_even().max(0.0);
    // usize::MAX as f64 rounds up to 2^64, so equality already overflows
    if scaled >= usize::MAX as f64 {
        return None;
    }
    Some(scaled as usize)
}

/// Contributing source range and normalized weights for one output sample.
struct Taps {
    start: usize,
    weights: Vec<f64>,
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn compute_taps(
    in_len: usize,
    out_len: usize,
    support: f64,
    kernel: InterpolationKernel,
) -> Vec<Taps> {
    let scale = in_len as f64 / out_len as f64;
    let filter_scale = scale.max(1.0);
    let support = support * filter_scale;
    let inv_filter_scale = 1.0 / filter_scale;

    (0..out_len)
        .map(|o| {
            let center = (o as f64 + 0.5) * scale;
            // Safe: both bounds are clamped to [0, in_len] before use
            let start = (center - support + 0.5).max(0.0) as usize;
            let end = ((center + support + 0.5) as usize).min(in_len);

            let mut weights: Vec<f64> = (start..end)
                .map(|i| kernel.weight((i as f64 - center + 0.5) * inv_filter_scale))
                .collect();

            let total: f64 = weights.iter().sum();
            debug_assert!(total != 0.0, "output sample {o} has no contributing taps");
            if total != 0.0 {
                weights.iter_mut().for_each(|w| *w /= total);
            }

            Taps { start, weights }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn resample_axis(
    src: &Image,
    axis: Axis,
    out_len: usize,
    support: f64,
    kernel: InterpolationKernel,
) -> Image {
    let in_len = src.len_of(axis);
    let taps = compute_taps(in_len, out_len, support, kernel);

    let mut shape = [src.nrows(), src.ncols()];
    shape[axis.index()] = out_len;
    let mut dst = Array2::<f32>::zeros(shape);

    // Each lane runs along the resampled axis
    for (src_lane, mut dst_lane) in src.lanes(axis).into_iter().zip(dst.lanes_mut(axis)) {
        for (out, tap) in dst_lane.iter_mut().zip(&taps) {
            let acc: f64 = tap
                .weights
                .iter()
                .enumerate()
                .map(|(i, w)| w * f64::from(src_lane[tap.start + i]))
                .sum();
            *out = acc as f32;
        }
    }

    dst
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn resample_nearest(src: &Image, out_w: usize, out_h: usize) -> Image {
    let (width, height) = dimensions(src);
    let source_index = |o: usize, out_len: usize, in_len: usize| {
        let scale = in_len as f64 / out_len as f64;
        (((o as f64 + 0.5) * scale) as usize).min(in_len - 1)
    };

    let cols: Vec<usize> = (0..out_w).map(|x| source_index(x, out_w, width)).collect();
    let rows: Vec<usize> = (0..out_h).map(|y| source_index(y, out_h, height)).collect();

    Image::from_shape_fn((out_h, out_w), |(y, x)| src[[rows[y], cols[x]]])
}
