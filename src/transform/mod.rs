//! Numerical transforms on single images.

mod batch;
mod kernel;
mod metric;
mod noise;
mod resample;

pub use batch::replicate;
pub use kernel::InterpolationKernel;
pub use metric::{nrmse, nrmse_title, ErrorScore};
pub use noise::{add_noise, add_noise_seeded, NoiseInjector};
pub use resample::{downscale, resample, upscale, ScaleFactor};
