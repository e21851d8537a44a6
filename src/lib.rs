//! # `pnp-imaging`
//!
//! Numerical building blocks for experimenting with iterative image
//! reconstruction: resampling between resolutions, synthesizing noisy
//! observations, and scoring reconstructions against ground truth.
//!
//! Images are single-channel `ndarray::Array2<f32>` arrays with intensities
//! in [0, 1]. Every transform borrows its input and returns a new array.
//!
//! ## Example
//!
//! ```
//! use pnp_imaging::{add_noise_seeded, downscale, nrmse, upscale, Image, InterpolationKernel};
//!
//! # fn main() -> pnp_imaging::Result<()> {
//! let truth = Image::from_shape_fn((16, 16), |(y, x)| ((x + y) % 16) as f32 / 15.0);
//!
//! let small = downscale(&truth, 2.0, InterpolationKernel::Bicubic)?;
//! let observed = add_noise_seeded(&small, 0.05, Some(42))?;
//! let estimate = upscale(&observed, 2.0, InterpolationKernel::Bicubic)?;
//!
//! let score = nrmse(&estimate, &truth)?;
//! assert!(score > 0.0);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod pipeline;
pub mod transform;

pub use crate::image::{load_image, save_image, Image};
pub use error::{Error, Result};
pub use pipeline::{Config, Pipeline};
pub use transform::{
    add_noise, add_noise_seeded, downscale, nrmse, nrmse_title, replicate, resample, upscale,
    ErrorScore, InterpolationKernel, NoiseInjector, ScaleFactor,
};
