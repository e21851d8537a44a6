//! Synthesis of degraded observations from ground truth.

use crate::error::{Error, Result};
use crate::image::{dimensions, ensure_non_empty, Image};
use crate::transform::{
    downscale, nrmse, resample, ErrorScore, InterpolationKernel, NoiseInjector, ScaleFactor,
};

/// Configuration for the degradation pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolution reduction factor. 1.0 keeps the ground-truth size.
    pub downscale_factor: f64,

    /// Interpolation kernel used for every resampling step.
    pub kernel: InterpolationKernel,

    /// Standard deviation of the additive Gaussian noise.
    pub noise_std: f64,

    /// Random seed for reproducibility. None for random.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            downscale_factor: 1.0,
            kernel: InterpolationKernel::default(),
            noise_std: 0.0,
            seed: None,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !(self.downscale_factor.is_finite() && self.downscale_factor > 0.0) {
            return Err(Error::InvalidParameter {
                name: "downscale_factor".to_string(),
                reason: "must be finite and greater than 0".to_string(),
            });
        }

        if self.noise_std.is_nan() || self.noise_std < 0.0 {
            return Err(Error::InvalidParameter {
                name: "noise_std".to_string(),
                reason: "must be greater than or equal to 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Turns ground-truth images into observations and scores estimates.
///
/// The pipeline owns one noise stream. Successive calls to
/// [`Pipeline::observe`] continue it, so a seeded pipeline reproduces the
/// same sequence of observations.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    noise: NoiseInjector,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing pipeline with config: {config:?}");

        let noise = NoiseInjector::new(config.seed);
        Ok(Self { config, noise })
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Downscale `truth` and add noise.
    ///
    /// # Errors
    ///
    /// Returns an error if resampling fails (empty image or degenerate output).
    pub fn observe(&mut self, truth: &Image) -> Result<Image> {
        let (width, height) = dimensions(truth);
        tracing::info!("Observing {width}x{height} ground truth");

        tracing::info!("Downscaling by {}...", self.config.downscale_factor);
        let reduced = downscale(truth, self.config.downscale_factor, self.config.kernel)?;

        tracing::info!("Adding noise (std = {})...", self.config.noise_std);
        let observed = self.noise.add_noise(&reduced, self.config.noise_std)?;

        tracing::info!("Observation complete");
        Ok(observed)
    }

    /// Resample `estimate` to exactly `(width, height)`.
    ///
    /// Used to bring a low-resolution estimate back onto the ground-truth
    /// grid before scoring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if `estimate` is empty, or
    /// [`Error::InvalidParameter`] if the target size is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn upsample(&self, estimate: &Image, width: usize, height: usize) -> Result<Image> {
        ensure_non_empty(estimate)?;
        for (name, len) in [("width", width), ("height", height)] {
            if len == 0 {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
        }

        let (in_w, in_h) = dimensions(estimate);

        // Exact ratios round back to the requested size
        let factor = ScaleFactor::new(width as f64 / in_w as f64, height as f64 / in_h as f64);
        resample(estimate, factor, self.config.kernel)
    }

    /// Score `candidate` against `truth`.
    ///
    /// # Errors
    ///
    /// See [`nrmse`].
    #[allow(clippy::unused_self)]
    pub fn score(&self, candidate: &Image, truth: &Image) -> Result<ErrorScore> {
        nrmse(candidate, truth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truth() -> Image {
        Image::from_shape_fn((8, 8), |(y, x)| 0.2 + 0.6 * ((x + y) % 4) as f32 / 3.0)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let bad_factor = Config {
            downscale_factor: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            Pipeline::new(bad_factor),
            Err(Error::InvalidParameter { name, .. }) if name == "downscale_factor"
        ));

        let bad_noise = Config {
            noise_std: -0.5,
            ..Config::default()
        };
        assert!(matches!(
            Pipeline::new(bad_noise),
            Err(Error::InvalidParameter { name, .. }) if name == "noise_std"
        ));
    }

    #[test]
    fn test_default_pipeline_is_identity() {
        let mut pipeline = Pipeline::new(Config::default()).unwrap();
        let img = truth();
        assert_eq!(pipeline.observe(&img).unwrap(), img);
    }

    #[test]
    fn test_observe_downscales_and_clips() {
        let config = Config {
            downscale_factor: 2.0,
            kernel: InterpolationKernel::Box,
            noise_std: 0.5,
            seed: Some(42),
        };
        let mut pipeline = Pipeline::new(config).unwrap();
        let observed = pipeline.observe(&truth()).unwrap();

        assert_eq!(observed.dim(), (4, 4));
        assert!(observed.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_seeded_pipelines_agree() {
        let config = Config {
            downscale_factor: 2.0,
            noise_std: 0.05,
            seed: Some(7),
            ..Config::default()
        };
        let mut a = Pipeline::new(config.clone()).unwrap();
        let mut b = Pipeline::new(config).unwrap();

        let img = truth();
        let a1 = a.observe(&img).unwrap();
        let a2 = a.observe(&img).unwrap();
        assert_eq!(a1, b.observe(&img).unwrap());
        assert_eq!(a2, b.observe(&img).unwrap());
        assert_ne!(a1, a2);
    }

    #[test]
    fn test_upsample_and_score() {
        let config = Config {
            downscale_factor: 2.0,
            kernel: InterpolationKernel::Bilinear,
            ..Config::default()
        };
        let mut pipeline = Pipeline::new(config).unwrap();
        let img = truth();

        let observed = pipeline.observe(&img).unwrap();
        let (width, height) = dimensions(&img);
        let restored = pipeline.upsample(&observed, width, height).unwrap();

        assert_eq!(restored.dim(), img.dim());
        let score = pipeline.score(&restored, &img).unwrap();
        assert!(score > 0.0);
        assert_eq!(pipeline.score(&img, &img).unwrap(), 0.0);
    }

    #[test]
    fn test_upsample_to_odd_size() {
        let pipeline = Pipeline::new(Config::default()).unwrap();
        let small = Image::from_elem((3, 4), 0.5);
        let out = pipeline.upsample(&small, 7, 5).unwrap();
        assert_eq!(dimensions(&out), (7, 5));
    }

    #[test]
    fn test_upsample_rejects_zero_target() {
        let pipeline = Pipeline::new(Config::default()).unwrap();
        let small = Image::from_elem((3, 4), 0.5);
        assert!(matches!(
            pipeline.upsample(&small, 0, 5),
            Err(Error::InvalidParameter { name, .. }) if name == "width"
        ));
        assert!(matches!(
            pipeline.upsample(&small, 7, 0),
            Err(Error::InvalidParameter { name, .. }) if name == "height"
        ));
        assert!(matches!(
            pipeline.upsample(&Image::zeros((0, 4)), 7, 5),
            Err(Error::EmptyImage { width: 4, height: 0 })
        ));
    }
}
