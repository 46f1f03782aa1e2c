//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation
//! methods must implement, together with the out-of-bounds policy applied
//! to coordinates leaving the valid index range.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};

/// Interpolation method used when sampling at fractional coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Bilinear (2D) / trilinear (3D) interpolation.
    Linear,
    /// Nearest-neighbor sampling.
    Nearest,
}

/// Policy for sample coordinates outside the valid index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddingMode {
    /// Out-of-range samples contribute exactly zero (not clamped).
    Zeros,
    /// Coordinates clamp to the nearest valid index.
    Border,
    /// Coordinates fold back across the boundaries.
    Reflection,
}

/// Interpolator trait for sampling values at continuous coordinates.
///
/// Interpolators sample image values at non-integer coordinates, which is
/// the heart of warp resampling.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub trait Interpolator<B: Backend> {
    /// Interpolate values from a tensor at given continuous indices.
    ///
    /// # Arguments
    /// * `data` - The source tensor (3D volume `[D, H, W]` or 2D image `[H, W]`)
    /// * `indices` - The indices at which to interpolate `[Batch, Rank]`,
    ///               ordered fastest-varying-first: `(x, y)` or `(x, y, z)`
    /// * `padding` - Out-of-bounds policy for coordinates outside
    ///               `[0, extent-1]`
    ///
    /// # Returns
    /// Tensor of sampled values `[Batch]`
    fn interpolate<const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1>;
}

/// Mask of coordinates lying inside `[0, extent-1]`, as 0/1 floats.
///
/// NaN coordinates fail both comparisons and produce a zero mask entry.
pub(crate) fn in_range_mask<B: Backend>(coords: &Tensor<B, 1>, extent: usize) -> Tensor<B, 1> {
    let lo = coords.clone().greater_equal_elem(0.0).float();
    let hi = coords.clone().lower_equal_elem((extent - 1) as f64).float();
    lo * hi
}

/// Fold coordinates back into `[0, extent-1]` by reflecting about both
/// boundaries (period `2*(extent-1)`).
pub(crate) fn fold_reflect<B: Backend>(coords: Tensor<B, 1>, extent: usize) -> Tensor<B, 1> {
    if extent <= 1 {
        return coords;
    }
    let period = (2 * (extent - 1)) as f64;
    let wrapped = coords.clone() - coords.div_scalar(period).floor().mul_scalar(period);
    wrapped.clone().min_pair(wrapped.neg().add_scalar(period))
}
