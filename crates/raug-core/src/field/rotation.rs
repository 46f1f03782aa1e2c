//! Rotation matrix construction for coordinate meshes.
//!
//! Elementary rotations follow the standard right-handed convention and
//! compose in the fixed order `R = Rx * Ry * Rz`. Meshes hold coordinate
//! tuples as row vectors, so the rotation applies as `v' = v * R` via a
//! single batched matmul.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use nalgebra::SMatrix;

/// Composed 3D rotation matrix `Rx(angle_x) * Ry(angle_y) * Rz(angle_z)`.
///
/// `Rx` rotates the plane spanned by axes 1 and 2, `Ry` the plane of axes
/// 0 and 2, `Rz` the plane of axes 0 and 1. The composition order is part
/// of the generator's contract and must not be reordered.
pub fn euler_rotation_3d(angle_x: f64, angle_y: f64, angle_z: f64) -> SMatrix<f64, 3, 3> {
    let (sx, cx) = angle_x.sin_cos();
    let (sy, cy) = angle_y.sin_cos();
    let (sz, cz) = angle_z.sin_cos();

    let rx = SMatrix::<f64, 3, 3>::new(
        1.0, 0.0, 0.0, //
        0.0, cx, -sx, //
        0.0, sx, cx,
    );
    let ry = SMatrix::<f64, 3, 3>::new(
        cy, 0.0, sy, //
        0.0, 1.0, 0.0, //
        -sy, 0.0, cy,
    );
    let rz = SMatrix::<f64, 3, 3>::new(
        cz, -sz, 0.0, //
        sz, cz, 0.0, //
        0.0, 0.0, 1.0,
    );

    rx * ry * rz
}

/// Planar rotation matrix for 2D meshes.
pub fn planar_rotation_2d(angle: f64) -> SMatrix<f64, 2, 2> {
    let (s, c) = angle.sin_cos();
    SMatrix::<f64, 2, 2>::new(
        c, -s, //
        s, c,
    )
}

/// Upload a fixed-size rotation matrix as a `[D, D]` tensor, row-major.
pub(crate) fn matrix_to_tensor<B: Backend, const D: usize>(
    matrix: &SMatrix<f64, D, D>,
    device: &B::Device,
) -> Tensor<B, 2> {
    let mut data = Vec::with_capacity(D * D);
    for r in 0..D {
        for c in 0..D {
            data.push(matrix[(r, c)] as f32);
        }
    }
    Tensor::from_data(TensorData::new(data, Shape::new([D, D])), device)
}
