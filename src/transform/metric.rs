//! Reconstruction quality scoring.

use crate::error::{shape_string, Error, Result};
use crate::image::{ensure_non_empty, Image};

/// Normalized RMSE, rounded to 3 decimals. 0 means identical.
pub type ErrorScore = f64;

const SCORE_DECIMALS: i32 = 3;

/// Root mean square error of `candidate` against `reference`, divided by
/// the root mean square of `reference`, rounded half-to-even to 3 decimals.
///
/// The score is not symmetric: swapping the arguments changes the
/// normalization.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the shapes differ,
/// [`Error::EmptyImage`] if the images have no pixels, and
/// [`Error::DegenerateReference`] if `reference` is all zeros.
#[allow(clippy::cast_precision_loss)]
pub fn nrmse(candidate: &Image, reference: &Image) -> Result<ErrorScore> {
    if candidate.dim() != reference.dim() {
        return Err(Error::ShapeMismatch {
            expected: shape_string(reference.dim()),
            actual: shape_string(candidate.dim()),
        });
    }
    ensure_non_empty(reference)?;

    let n = reference.len() as f64;
    let (diff_sq, ref_sq) = candidate.iter().zip(reference.iter()).fold(
        (0.0_f64, 0.0_f64),
        |(diff_sq, ref_sq), (&c, &r)| {
            let (c, r) = (f64::from(c), f64::from(r));
            ((c - r).mul_add(c - r, diff_sq), r.mul_add(r, ref_sq))
        },
    );

    if ref_sq == 0.0 {
        return Err(Error::DegenerateReference);
    }

    let score = round_decimals((diff_sq / n).sqrt() / (ref_sq / n).sqrt(), SCORE_DECIMALS);
    tracing::debug!("NRMSE = {score}");
    Ok(score)
}

/// Caption for displaying `candidate` alongside its score, e.g.
/// `"Reconstruction, NRMSE = 0.042"`.
///
/// # Errors
///
/// Same as [`nrmse`].
pub fn nrmse_title(title: &str, candidate: &Image, reference: &Image) -> Result<String> {
    let score = nrmse(candidate, reference)?;
    Ok(format!("{title}, NRMSE = {score}"))
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_images_score_zero() {
        let img = Image::from_elem((4, 4), 0.5);
        assert_eq!(nrmse(&img, &img.clone()).unwrap(), 0.0);
    }

    #[test]
    fn test_known_value() {
        // RMSE = 0.1, RMS(reference) = 0.5
        let reference = Image::from_elem((2, 2), 0.5);
        let candidate = Image::from_elem((2, 2), 0.6);
        assert_eq!(nrmse(&candidate, &reference).unwrap(), 0.2);
    }

    #[test]
    fn test_asymmetry() {
        let a = Image::from_shape_vec((2, 2), vec![1.0, 1.0, 1.0, 1.0]).unwrap();
        let b = Image::from_shape_vec((2, 2), vec![0.5, 0.5, 0.5, 0.5]).unwrap();

        // |a - b| = 0.5 everywhere: normalized by 0.5 vs by 1.0
        assert_eq!(nrmse(&a, &b).unwrap(), 1.0);
        assert_eq!(nrmse(&b, &a).unwrap(), 0.5);
    }

    #[test]
    fn test_can_exceed_one() {
        let reference = Image::from_elem((3, 3), 0.1);
        let candidate = Image::from_elem((3, 3), 0.9);
        assert_eq!(nrmse(&candidate, &reference).unwrap(), 8.0);
    }

    #[test]
    fn test_rounded_to_three_decimals() {
        let reference = Image::from_elem((1, 3), 0.3);
        let candidate = Image::from_elem((1, 3), 0.4);
        let score = nrmse(&candidate, &reference).unwrap();
        assert_eq!(score, 0.333);
    }

    #[test]
    fn test_zero_reference_is_degenerate() {
        let reference = Image::zeros((2, 2));
        let candidate = Image::from_elem((2, 2), 0.3);
        assert!(matches!(
            nrmse(&candidate, &reference),
            Err(Error::DegenerateReference)
        ));
        assert!(matches!(
            nrmse(&reference, &reference),
            Err(Error::DegenerateReference)
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Image::zeros((2, 3));
        let b = Image::from_elem((3, 2), 1.0);
        let err = nrmse(&a, &b).unwrap_err();
        assert!(
            matches!(err, Error::ShapeMismatch { ref expected, ref actual } if expected == "2x3" && actual == "3x2")
        );
    }

    #[test]
    fn test_empty_images() {
        let a = Image::zeros((0, 2));
        assert!(matches!(nrmse(&a, &a), Err(Error::EmptyImage { .. })));
    }

    #[test]
    fn test_title() {
        let reference = Image::from_elem((2, 2), 0.5);
        let candidate = Image::from_elem((2, 2), 0.6);
        assert_eq!(
            nrmse_title("Noisy", &candidate, &reference).unwrap(),
            "Noisy, NRMSE = 0.2"
        );
    }

    #[test]
    fn test_round_decimals_ties_to_even() {
        assert_eq!(round_decimals(0.5, 0), 0.0);
        assert_eq!(round_decimals(1.5, 0), 2.0);
        assert_eq!(round_decimals(0.123_4, 3), 0.123);
    }
}
