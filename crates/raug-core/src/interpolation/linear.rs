//! Linear interpolation implementation.
//!
//! This module provides linear interpolation (bilinear for 2D, trilinear
//! for 3D) as an explicit gather-and-blend over the flattened source.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use super::trait_::{fold_reflect, in_range_mask, Interpolator, PaddingMode};

/// Linear Interpolator.
///
/// Performs linear interpolation (bilinear for 2D, trilinear for 3D).
/// Under `PaddingMode::Zeros` every gathered corner outside the valid
/// index range contributes exactly zero; `Border` clamps coordinates and
/// `Reflection` folds them back into range before sampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate<const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        match D {
            3 => self.interpolate_3d(data, indices, padding),
            2 => self.interpolate_2d(data, indices, padding),
            _ => panic!("LinearInterpolator only supports 2D and 3D tensors"),
        }
    }
}

impl LinearInterpolator {
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
        let batch_size = indices.dims()[0];
        let device = indices.device();

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

        // Compute floor coordinates
        let x0 = x.clone().floor();
        let y0 = y.clone().floor();
        let z0 = z.clone().floor();

        // Compute interpolation weights
        let wx = x - x0.clone();
        let wy = y - y0.clone();
        let wz = z - z0.clone();

        // Compute x1, y1, z1
        let x1 = x0.clone() + 1.0;
        let y1 = y0.clone() + 1.0;
        let z1 = z0.clone() + 1.0;

        // Clamp indices to valid range for gathering
        let x0_i = x0.clone().clamp(0.0, (d2 - 1) as f64).int();
        let y0_i = y0.clone().clamp(0.0, (d1 - 1) as f64).int();
        let z0_i = z0.clone().clamp(0.0, (d0 - 1) as f64).int();

        let x1_i = x1.clone().clamp(0.0, (d2 - 1) as f64).int();
        let y1_i = y1.clone().clamp(0.0, (d1 - 1) as f64).int();
        let z1_i = z1.clone().clamp(0.0, (d0 - 1) as f64).int();

        // Strides for [Z, Y, X] layout (d0, d1, d2)
        let stride_z = (d1 * d2) as i32;
        let stride_y = d2 as i32;

        // Pre-flatten data once
        let flat_data = data.clone().reshape([d0 * d1 * d2]);

        // Gather all 8 voxel values
        let mut v000 = Self::gather_3d(&flat_data, &x0_i, &y0_i, &z0_i, stride_y, stride_z);
        let mut v001 = Self::gather_3d(&flat_data, &x0_i, &y0_i, &z1_i, stride_y, stride_z);
        let mut v010 = Self::gather_3d(&flat_data, &x0_i, &y1_i, &z0_i, stride_y, stride_z);
        let mut v011 = Self::gather_3d(&flat_data, &x0_i, &y1_i, &z1_i, stride_y, stride_z);
        let mut v100 = Self::gather_3d(&flat_data, &x1_i, &y0_i, &z0_i, stride_y, stride_z);
        let mut v101 = Self::gather_3d(&flat_data, &x1_i, &y0_i, &z1_i, stride_y, stride_z);
        let mut v110 = Self::gather_3d(&flat_data, &x1_i, &y1_i, &z0_i, stride_y, stride_z);
        let mut v111 = Self::gather_3d(&flat_data, &x1_i, &y1_i, &z1_i, stride_y, stride_z);

        // Corners outside the volume contribute zero instead of the
        // clamped sample
        if padding == PaddingMode::Zeros {
            let x0_in = in_range_mask(&x0, d2);
            let x1_in = in_range_mask(&x1, d2);
            let y0_in = in_range_mask(&y0, d1);
            let y1_in = in_range_mask(&y1, d1);
            let z0_in = in_range_mask(&z0, d0);
            let z1_in = in_range_mask(&z1, d0);

            v000 = v000 * (x0_in.clone() * y0_in.clone() * z0_in.clone());
            v001 = v001 * (x0_in.clone() * y0_in.clone() * z1_in.clone());
            v010 = v010 * (x0_in.clone() * y1_in.clone() * z0_in.clone());
            v011 = v011 * (x0_in * y1_in.clone() * z1_in.clone());
            v100 = v100 * (x1_in.clone() * y0_in.clone() * z0_in.clone());
            v101 = v101 * (x1_in.clone() * y0_in * z1_in.clone());
            v110 = v110 * (x1_in.clone() * y1_in.clone() * z0_in.clone());
            v111 = v111 * (x1_in * y1_in * z1_in);
        }

        // Pre-compute (1 - weight) values
        let one = Tensor::<B, 1>::ones([batch_size], &device);
        let one_minus_wx = one.clone() - wx.clone();
        let one_minus_wy = one.clone() - wy.clone();
        let one_minus_wz = one - wz.clone();

        // Trilinear interpolation
        // Interpolate along X
        let c00 = v000 * one_minus_wx.clone() + v100 * wx.clone();
        let c01 = v001 * one_minus_wx.clone() + v101 * wx.clone();
        let c10 = v010 * one_minus_wx.clone() + v110 * wx.clone();
        let c11 = v011 * one_minus_wx + v111 * wx;

        // Interpolate along Y
        let c0 = c00 * one_minus_wy.clone() + c10 * wy.clone();
        let c1 = c01 * one_minus_wy.clone() + c11 * wy.clone();

        // Interpolate along Z
        c0 * one_minus_wz + c1 * wz
    }

    #[inline]
    fn gather_3d<B: Backend>(
        flat_data: &Tensor<B, 1>,
        xi: &Tensor<B, 1, Int>,
        yi: &Tensor<B, 1, Int>,
        zi: &Tensor<B, 1, Int>,
        stride_y: i32,
        stride_z: i32,
    ) -> Tensor<B, 1> {
        let idx = zi.clone() * stride_z + yi.clone() * stride_y + xi.clone();
        flat_data.clone().gather(0, idx)
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
        let batch_size = indices.dims()[0];
        let device = indices.device();

        // indices: [Batch, 2] -> (x, y)
        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.narrow(1, 1, 1).squeeze::<1>(1);

        let (x, y) = match padding {
            PaddingMode::Reflection => (fold_reflect(x, d1), fold_reflect(y, d0)),
            _ => (x, y),
        };

        // Compute floor coordinates
        let x0 = x.clone().floor();
        let y0 = y.clone().floor();

        // Compute interpolation weights
        let wx = x - x0.clone();
        let wy = y - y0.clone();

        // Compute x1, y1
        let x1 = x0.clone() + 1.0;
        let y1 = y0.clone() + 1.0;

        // Clamp indices for gathering
        let x0_i = x0.clone().clamp(0.0, (d1 - 1) as f64).int();
        let y0_i = y0.clone().clamp(0.0, (d0 - 1) as f64).int();
        let x1_i = x1.clone().clamp(0.0, (d1 - 1) as f64).int();
        let y1_i = y1.clone().clamp(0.0, (d0 - 1) as f64).int();

        // Stride for [Y, X] layout (d0, d1)
        let stride_y = d1 as i32;

        // Pre-flatten data
        let flat_data = data.clone().reshape([d0 * d1]);

        // Gather all 4 pixel values
        let mut v00 = Self::gather_2d(&flat_data, &x0_i, &y0_i, stride_y);
        let mut v01 = Self::gather_2d(&flat_data, &x0_i, &y1_i, stride_y);
        let mut v10 = Self::gather_2d(&flat_data, &x1_i, &y0_i, stride_y);
        let mut v11 = Self::gather_2d(&flat_data, &x1_i, &y1_i, stride_y);

        if padding == PaddingMode::Zeros {
            let x0_in = in_range_mask(&x0, d1);
            let x1_in = in_range_mask(&x1, d1);
            let y0_in = in_range_mask(&y0, d0);
            let y1_in = in_range_mask(&y1, d0);

            v00 = v00 * (x0_in.clone() * y0_in.clone());
            v01 = v01 * (x0_in * y1_in.clone());
            v10 = v10 * (x1_in.clone() * y0_in);
            v11 = v11 * (x1_in * y1_in);
        }

        // Pre-compute (1 - weight)
        let one = Tensor::<B, 1>::ones([batch_size], &device);
        let one_minus_wx = one.clone() - wx.clone();
        let one_minus_wy = one - wy.clone();

        // Bilinear interpolation
        let c0 = v00 * one_minus_wx.clone() + v10 * wx.clone();
        let c1 = v01 * one_minus_wx + v11 * wx;

        c0 * one_minus_wy + c1 * wy
    }

    #[inline]
    fn gather_2d<B: Backend>(
        flat_data: &Tensor<B, 1>,
        xi: &Tensor<B, 1, Int>,
        yi: &Tensor<B, 1, Int>,
        stride_y: i32,
    ) -> Tensor<B, 1> {
        let idx = yi.clone() * stride_y + xi.clone();
        flat_data.clone().gather(0, idx)
    }
}
