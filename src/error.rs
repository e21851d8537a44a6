//! Custom error types for pnp-imaging.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the pnp-imaging library.
#[derive(Error, Debug)]
pub enum Error {
    /// Scale factor is zero, negative or not finite.
    #[error("invalid scale factor {factor}: must be finite and greater than 0")]
    InvalidScale { factor: f64 },

    /// Interpolation kernel name or code is not recognized.
    #[error("unknown interpolation kernel {name:?}")]
    InvalidKernel { name: String },

    /// Input image has zero extent on some axis.
    #[error("image is empty ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    /// Resampling would produce an image with zero extent.
    #[error("resampling {width}x{height} by {factor_x}x{factor_y} rounds to an empty image")]
    DegenerateOutput {
        width: usize,
        height: usize,
        factor_x: f64,
        factor_y: f64,
    },

    /// Resampling would produce an image too large to allocate.
    #[error("resampling {width}x{height} by {factor_x}x{factor_y} is too large to allocate")]
    OutputTooLarge {
        width: usize,
        height: usize,
        factor_x: f64,
        factor_y: f64,
    },

    /// Two images that must agree in shape do not.
    #[error("image shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Reference image is all zeros, so its RMS magnitude is zero.
    #[error("reference image is all zeros; NRMSE is undefined")]
    DegenerateReference,

    /// Noise standard deviation is negative or NaN.
    #[error("invalid noise standard deviation {std_dev}: must be >= 0")]
    InvalidStdDev { std_dev: f64 },

    /// Replica count does not fit a non-negative size.
    #[error("invalid replica count {count}: must be >= 0")]
    InvalidCount { count: String },

    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pnp-imaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Format a `(height, width)` shape the way error messages report it.
pub(crate) fn shape_string(shape: (usize, usize)) -> String {
    format!("{}x{}", shape.1, shape.0)
}
