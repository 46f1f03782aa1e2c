//! Warp resampling filter.
//!
//! This module provides WarpImageFilter, which resamples a channel-first
//! source tensor through an absolute coordinate field: for every output
//! location the field names the (fractional) source coordinate whose
//! interpolated value lands there.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::{AugmentError, Result};
use crate::field::mesh::{identity_field_2d, identity_field_3d};
use crate::interpolation::{Interpolator, PaddingMode};

/// Warp resampling filter.
///
/// Resamples a source tensor through an absolute coordinate field of the
/// same spatial shape. Coordinates are normalized to `[-1, 1]` per axis
/// (`v' = 2*(v/(s-1) - 0.5)`), the coordinate channels are reordered
/// fastest-varying-last to match the sampling convention, and every
/// channel is sampled independently through the same grid.
///
/// Fields are treated as absolute; for true displacement (offset) fields
/// use [`WarpImageFilter::apply_displacement_3d`], which first adds the
/// identity index grid.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `I` - The interpolator type
pub struct WarpImageFilter<B, I>
where
    B: Backend,
    I: Interpolator<B>,
{
    interpolator: I,
    padding: PaddingMode,
    _phantom: PhantomData<B>,
}

impl<B, I> WarpImageFilter<B, I>
where
    B: Backend,
    I: Interpolator<B>,
{
    /// Create a new warp filter with zero padding.
    pub fn new(interpolator: I) -> Self {
        Self {
            interpolator,
            padding: PaddingMode::Zeros,
            _phantom: PhantomData,
        }
    }

    /// Set the out-of-bounds policy.
    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    /// Warp a 3D source `[C, D, H, W]` through a field `[1, 3, D, H, W]`.
    pub fn apply_3d(&self, source: &Tensor<B, 4>, field: &Tensor<B, 5>) -> Result<Tensor<B, 4>> {
        let [channels, d, h, w] = source.dims();
        let field_dims = field.dims();
        if field_dims != [1, 3, d, h, w] {
            return Err(AugmentError::ShapeMismatch {
                expected: vec![1, 3, d, h, w],
                actual: field_dims.to_vec(),
            });
        }
        check_spatial(&[d, h, w])?;

        let n = d * h * w;
        // Per-axis coordinate planes in array order
        let z_abs = field.clone().narrow(1, 0, 1).reshape([n]);
        let y_abs = field.clone().narrow(1, 1, 1).reshape([n]);
        let x_abs = field.clone().narrow(1, 2, 1).reshape([n]);

        // Normalize into [-1, 1], then reorder channels to (x, y, z) for
        // the sampling primitive
        let grid: Tensor<B, 2> = Tensor::cat(
            vec![
                normalize_axis(x_abs, w).unsqueeze_dim(1),
                normalize_axis(y_abs, h).unsqueeze_dim(1),
                normalize_axis(z_abs, d).unsqueeze_dim(1),
            ],
            1,
        );

        let indices = denormalize_grid(grid, [w, h, d]);

        let mut warped = Vec::with_capacity(channels);
        for c in 0..channels {
            let plane = source.clone().narrow(0, c, 1).reshape([d, h, w]);
            let values = self
                .interpolator
                .interpolate(&plane, indices.clone(), self.padding);
            warped.push(values.reshape([1, d, h, w]));
        }
        Ok(Tensor::cat(warped, 0))
    }

    /// Warp a 2D source `[C, H, W]` through a field `[1, 2, H, W]`.
    pub fn apply_2d(&self, source: &Tensor<B, 3>, field: &Tensor<B, 4>) -> Result<Tensor<B, 3>> {
        let [channels, h, w] = source.dims();
        let field_dims = field.dims();
        if field_dims != [1, 2, h, w] {
            return Err(AugmentError::ShapeMismatch {
                expected: vec![1, 2, h, w],
                actual: field_dims.to_vec(),
            });
        }
        check_spatial(&[h, w])?;

        let n = h * w;
        let y_abs = field.clone().narrow(1, 0, 1).reshape([n]);
        let x_abs = field.clone().narrow(1, 1, 1).reshape([n]);

        let grid: Tensor<B, 2> = Tensor::cat(
            vec![
                normalize_axis(x_abs, w).unsqueeze_dim(1),
                normalize_axis(y_abs, h).unsqueeze_dim(1),
            ],
            1,
        );

        let indices = denormalize_grid(grid, [w, h]);

        let mut warped = Vec::with_capacity(channels);
        for c in 0..channels {
            let plane = source.clone().narrow(0, c, 1).reshape([h, w]);
            let values = self
                .interpolator
                .interpolate(&plane, indices.clone(), self.padding);
            warped.push(values.reshape([1, h, w]));
        }
        Ok(Tensor::cat(warped, 0))
    }

    /// Warp a 3D source through a displacement field: offsets are added
    /// to the identity index grid before resampling.
    pub fn apply_displacement_3d(
        &self,
        source: &Tensor<B, 4>,
        displacement: &Tensor<B, 5>,
    ) -> Result<Tensor<B, 4>> {
        let [_, d, h, w] = source.dims();
        let dims = displacement.dims();
        if dims != [1, 3, d, h, w] {
            return Err(AugmentError::ShapeMismatch {
                expected: vec![1, 3, d, h, w],
                actual: dims.to_vec(),
            });
        }
        let absolute =
            displacement.clone() + identity_field_3d::<B>([d, h, w], &displacement.device());
        self.apply_3d(source, &absolute)
    }

    /// Warp a 2D source through a displacement field.
    pub fn apply_displacement_2d(
        &self,
        source: &Tensor<B, 3>,
        displacement: &Tensor<B, 4>,
    ) -> Result<Tensor<B, 3>> {
        let [_, h, w] = source.dims();
        let dims = displacement.dims();
        if dims != [1, 2, h, w] {
            return Err(AugmentError::ShapeMismatch {
                expected: vec![1, 2, h, w],
                actual: dims.to_vec(),
            });
        }
        let absolute =
            displacement.clone() + identity_field_2d::<B>([h, w], &displacement.device());
        self.apply_2d(source, &absolute)
    }
}

/// Rescale absolute coordinates on one axis from `[0, extent-1]` to
/// `[-1, 1]`.
fn normalize_axis<B: Backend>(coords: Tensor<B, 1>, extent: usize) -> Tensor<B, 1> {
    coords
        .mul_scalar(2.0 / (extent - 1) as f64)
        .sub_scalar(1.0)
}

/// Map a normalized `[-1, 1]` grid back to continuous indices, column
/// `i` belonging to the axis with `extents[i]`.
fn denormalize_grid<B: Backend, const R: usize>(
    grid: Tensor<B, 2>,
    extents: [usize; R],
) -> Tensor<B, 2> {
    let cols: Vec<Tensor<B, 2>> = extents
        .iter()
        .enumerate()
        .map(|(i, extent)| {
            grid.clone()
                .narrow(1, i, 1)
                .add_scalar(1.0)
                .mul_scalar((extent - 1) as f64 / 2.0)
        })
        .collect();
    Tensor::cat(cols, 1)
}

fn check_spatial(spatial: &[usize]) -> Result<()> {
    if let Some((axis, extent)) = spatial.iter().enumerate().find(|(_, e)| **e <= 1) {
        return Err(AugmentError::invalid_patch_shape(format!(
            "spatial axis {} has extent {}; every axis must be > 1",
            axis, extent
        )));
    }
    Ok(())
}
