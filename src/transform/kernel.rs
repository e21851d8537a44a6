//! Interpolation kernels used by the resampler.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Resampling filter.
///
/// Numeric codes follow the legacy imaging convention:
/// `NEAREST = 0, LANCZOS = 1, BILINEAR = 2, BICUBIC = 3, BOX = 4, HAMMING = 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationKernel {
    /// Pick the source pixel whose center is closest.
    Nearest,
    /// Average of the source pixels covered by each output pixel.
    Box,
    /// Triangle filter.
    Bilinear,
    /// Keys cubic convolution with `a = -0.5`.
    #[default]
    Bicubic,
    /// Three-lobed Lanczos window.
    Lanczos,
    /// Hamming-windowed sinc.
    Hamming,
}

const BICUBIC_A: f64 = -0.5;

impl InterpolationKernel {
    /// All kernels, in code order.
    pub const ALL: [Self; 6] = [
        Self::Nearest,
        Self::Lanczos,
        Self::Bilinear,
        Self::Bicubic,
        Self::Box,
        Self::Hamming,
    ];

    /// Legacy numeric code of this kernel.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Nearest => 0,
            Self::Lanczos => 1,
            Self::Bilinear => 2,
            Self::Bicubic => 3,
            Self::Box => 4,
            Self::Hamming => 5,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Box => "box",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Lanczos => "lanczos",
            Self::Hamming => "hamming",
        }
    }

    /// Support radius of the filter at unit scale, `None` for nearest.
    #[must_use]
    pub const fn support(self) -> Option<f64> {
        match self {
            Self::Nearest => None,
            Self::Box => Some(0.5),
            Self::Bilinear | Self::Hamming => Some(1.0),
            Self::Bicubic => Some(2.0),
            Self::Lanczos => Some(3.0),
        }
    }

    /// Filter weight at offset `x` (in source pixels at unit scale).
    #[must_use]
    pub fn weight(self, x: f64) -> f64 {
        match self {
            Self::Nearest => {
                if x.abs() < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Box => {
                // (-0.5, 0.5]: a tap on a bin boundary belongs to the left bin
                if x > -0.5 && x <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Bilinear => {
                let x = x.abs();
                if x < 1.0 {
                    1.0 - x
                } else {
                    0.0
                }
            }
            Self::Hamming => {
                let x = x.abs();
                if x == 0.0 {
                    1.0
                } else if x >= 1.0 {
                    0.0
                } else {
                    let x = x * PI;
                    x.sin() / x * 0.46f64.mul_add(x.cos(), 0.54)
                }
            }
            Self::Bicubic => {
                let x = x.abs();
                if x < 1.0 {
                    ((BICUBIC_A + 2.0) * x - (BICUBIC_A + 3.0)) * x * x + 1.0
                } else if x < 2.0 {
                    (((x - 5.0) * x + 8.0) * x - 4.0) * BICUBIC_A
                } else {
                    0.0
                }
            }
            Self::Lanczos => {
                if -3.0 < x && x < 3.0 {
                    sinc(x) * sinc(x / 3.0)
                } else {
                    0.0
                }
            }
        }
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let x = x * PI;
        x.sin() / x
    }
}

impl fmt::Display for InterpolationKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for InterpolationKernel {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kernel| kernel.code() == code)
            .ok_or_else(|| Error::InvalidKernel {
                name: code.to_string(),
            })
    }
}

impl FromStr for InterpolationKernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if let Ok(code) = name.parse::<u8>() {
            return Self::try_from(code);
        }

        match name.as_str() {
            "nearest" | "none" => Ok(Self::Nearest),
            "box" => Ok(Self::Box),
            "bilinear" | "linear" | "triangle" => Ok(Self::Bilinear),
            "bicubic" | "cubic" => Ok(Self::Bicubic),
            "lanczos" | "antialias" => Ok(Self::Lanczos),
            "hamming" => Ok(Self::Hamming),
            _ => Err(Error::InvalidKernel {
                name: s.to_string(),
            }),
        }
    }
}
