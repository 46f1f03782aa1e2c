//! Nearest neighbor interpolation implementation.
//!
//! This module provides nearest neighbor interpolation for 2D and 3D
//! data, used to warp label maps and other data that must not blend.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::trait_::{fold_reflect, in_range_mask, Interpolator, PaddingMode};

/// Nearest Neighbor Interpolator.
///
/// Rounds to the nearest integer coordinate. Under `PaddingMode::Zeros`
/// a rounded coordinate outside the valid range yields zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate<const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        match D {
            3 => self.interpolate_3d(data, indices, padding),
            2 => self.interpolate_2d(data, indices, padding),
            _ => panic!("NearestNeighborInterpolator only supports 2D and 3D tensors"),
        }
    }
}

impl NearestNeighborInterpolator {
    fn interpolate_3d<B: Backend, const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        let shape = data.shape();
        let d0 = shape.dims[0]; // Z
        let d1 = shape.dims[1]; // Y
        let d2 = shape.dims[2]; // X

        // indices: [Batch, 3] -> (x, y, z)
        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.clone().narrow(1, 1, 1).squeeze::<1>(1);
        let z = indices.narrow(1, 2, 1).squeeze::<1>(1);

        let (x, y, z) = match padding {
            PaddingMode::Reflection => (
                fold_reflect(x, d2),
                fold_reflect(y, d1),
                fold_reflect(z, d0),
            ),
            _ => (x, y, z),
        };

        // Round to nearest integer coordinate
        let xr = x.round();
        let yr = y.round();
        let zr = z.round();

        let x_i = xr.clone().clamp(0.0, (d2 - 1) as f64).int();
        let y_i = yr.clone().clamp(0.0, (d1 - 1) as f64).int();
        let z_i = zr.clone().clamp(0.0, (d0 - 1) as f64).int();

        // Strides for [Z, Y, X]
        let stride_z = (d1 * d2) as i32;
        let stride_y = d2 as i32;

        let idx = z_i * stride_z + y_i * stride_y + x_i;
        let flat_data = data.clone().reshape([d0 * d1 * d2]);
        let values = flat_data.gather(0, idx);

        match padding {
            PaddingMode::Zeros => {
                let mask = in_range_mask(&xr, d2) * in_range_mask(&yr, d1)
                    * in_range_mask(&zr, d0);
                values * mask
            }
            _ => values,
        }
    }

    fn interpolate_2d<B: Backend, const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        let shape = data.shape();
        let d0 = shape.dims[0]; // Y
        let d1 = shape.dims[1]; // X

        // indices: [Batch, 2] -> (x, y)
        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.narrow(1, 1, 1).squeeze::<1>(1);

        let (x, y) = match padding {
            PaddingMode::Reflection => (fold_reflect(x, d1), fold_reflect(y, d0)),
            _ => (x, y),
        };

        let xr = x.round();
        let yr = y.round();

        let x_i = xr.clone().clamp(0.0, (d1 - 1) as f64).int();
        let y_i = yr.clone().clamp(0.0, (d0 - 1) as f64).int();

        let stride_y = d1 as i32;

        let idx = y_i * stride_y + x_i;
        let flat_data = data.clone().reshape([d0 * d1]);
        let values = flat_data.gather(0, idx);

        match padding {
            PaddingMode::Zeros => {
                let mask = in_range_mask(&xr, d1) * in_range_mask(&yr, d0);
                values * mask
            }
            _ => values,
        }
    }
}
