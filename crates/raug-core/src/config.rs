//! Configuration for randomized spatial augmentation.
//!
//! The config describes which perturbations to draw (rotation angles,
//! scale factors) and how warped values are sampled (interpolation and
//! out-of-bounds policy).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AugmentError, Result};
use crate::interpolation::{InterpolationMode, PaddingMode};

/// Range the scale factor is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScaleRange {
    /// A fixed factor applied to all axes.
    Fixed(f64),
    /// One factor drawn uniformly from `[min, max)`, applied to all axes.
    Uniform { min: f64, max: f64 },
    /// An independent factor drawn per axis; length must equal the
    /// coordinate rank of the patch being augmented.
    PerAxis(Vec<(f64, f64)>),
}

impl ScaleRange {
    /// Draw per-axis scale factors for a patch of the given rank.
    pub fn sample(&self, rank: usize, rng: &mut impl Rng) -> Result<Vec<f64>> {
        match self {
            Self::Fixed(s) => Ok(vec![*s; rank]),
            Self::Uniform { min, max } => {
                let s = draw_uniform((*min, *max), rng);
                Ok(vec![s; rank])
            }
            Self::PerAxis(ranges) => {
                if ranges.len() != rank {
                    return Err(AugmentError::invalid_configuration(format!(
                        "per-axis scale has {} entries, patch rank is {}",
                        ranges.len(),
                        rank
                    )));
                }
                Ok(ranges.iter().map(|r| draw_uniform(*r, rng)).collect())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed(s) => check_finite("scale", *s),
            Self::Uniform { min, max } => check_interval("scale", (*min, *max)),
            Self::PerAxis(ranges) => {
                if ranges.is_empty() {
                    return Err(AugmentError::invalid_configuration(
                        "per-axis scale must not be empty",
                    ));
                }
                for (i, r) in ranges.iter().enumerate() {
                    check_interval(&format!("scale[{}]", i), *r)?;
                }
                Ok(())
            }
        }
    }
}

/// Configuration block for spatial augmentation.
///
/// Defaults mirror the standard augmentation setup for registration
/// training: rotation enabled over the full circle on every axis, one
/// isotropic scale factor from `[0.75, 1.25)`, linear interpolation and
/// zero fill outside the patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialAugmentConfig {
    /// Whether to draw and apply a random rotation.
    pub do_rotation: bool,
    /// Angle interval (radians) for rotation about the first axis.
    /// Also the interval for the single planar angle in the 2D case.
    pub angle_x: (f64, f64),
    /// Angle interval (radians) for rotation about the second axis.
    pub angle_y: (f64, f64),
    /// Angle interval (radians) for rotation about the third axis.
    pub angle_z: (f64, f64),
    /// Whether to draw and apply a random scale.
    pub do_scale: bool,
    /// Range the scale factor is drawn from.
    pub scale: ScaleRange,
    /// Interpolation used by the warp resampler.
    pub interpolation: InterpolationMode,
    /// Out-of-bounds policy used by the warp resampler.
    pub padding: PaddingMode,
}

impl Default for SpatialAugmentConfig {
    fn default() -> Self {
        Self {
            do_rotation: true,
            angle_x: (0.0, std::f64::consts::TAU),
            angle_y: (0.0, std::f64::consts::TAU),
            angle_z: (0.0, std::f64::consts::TAU),
            do_scale: true,
            scale: ScaleRange::Uniform {
                min: 0.75,
                max: 1.25,
            },
            interpolation: InterpolationMode::Linear,
            padding: PaddingMode::Zeros,
        }
    }
}

impl SpatialAugmentConfig {
    /// Check the config for malformed intervals.
    ///
    /// Rank-dependent checks (per-axis scale length) happen when factors
    /// are drawn, since one config may serve both 2D and 3D patches.
    pub fn validate(&self) -> Result<()> {
        check_interval("angle_x", self.angle_x)?;
        check_interval("angle_y", self.angle_y)?;
        check_interval("angle_z", self.angle_z)?;
        self.scale.validate()
    }
}

/// Draw uniformly from `[min, max)`; a degenerate interval pins the value.
pub(crate) fn draw_uniform((min, max): (f64, f64), rng: &mut impl Rng) -> f64 {
    if min == max {
        min
    } else {
        rng.gen_range(min..max)
    }
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AugmentError::invalid_configuration(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

fn check_interval(name: &str, (min, max): (f64, f64)) -> Result<()> {
    check_finite(name, min)?;
    check_finite(name, max)?;
    if min > max {
        return Err(AugmentError::invalid_configuration(format!(
            "{} interval is reversed: ({}, {})",
            name, min, max
        )));
    }
    Ok(())
}
