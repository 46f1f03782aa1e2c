//! Coordinate mesh construction.
//!
//! Builds identity index grids and zero-centered coordinate meshes for a
//! patch shape. Meshes are laid out as `[N, rank]` row-vector batches
//! (one coordinate tuple per spatial location, axes in array order) so
//! rotation and scaling apply as batched matrix/elementwise products.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Shape, Tensor, TensorData};

/// Identity index grid for a 3D patch as `[N, 3]` rows `(i0, i1, i2)`,
/// locations enumerated in array order (axis 0 slowest).
pub fn identity_grid_3d<B: Backend>(shape: [usize; 3], device: &B::Device) -> Tensor<B, 2> {
    let [d, h, w] = shape;

    let z_range = Tensor::<B, 1, Int>::arange(0..d as i64, device);
    let y_range = Tensor::<B, 1, Int>::arange(0..h as i64, device);
    let x_range = Tensor::<B, 1, Int>::arange(0..w as i64, device);

    let z_grid = z_range.reshape([d, 1, 1]).repeat(&[1, h, w]).reshape([d * h * w]);
    let y_grid = y_range.reshape([1, h, 1]).repeat(&[d, 1, w]).reshape([d * h * w]);
    let x_grid = x_range.reshape([1, 1, w]).repeat(&[d, h, 1]).reshape([d * h * w]);

    let z_grid = z_grid.float();
    let y_grid = y_grid.float();
    let x_grid = x_grid.float();

    Tensor::cat(
        vec![
            z_grid.unsqueeze_dim(1),
            y_grid.unsqueeze_dim(1),
            x_grid.unsqueeze_dim(1),
        ],
        1,
    )
}

/// Identity index grid for a 2D patch as `[N, 2]` rows `(i0, i1)`.
pub fn identity_grid_2d<B: Backend>(shape: [usize; 2], device: &B::Device) -> Tensor<B, 2> {
    let [h, w] = shape;

    let y_range = Tensor::<B, 1, Int>::arange(0..h as i64, device);
    let x_range = Tensor::<B, 1, Int>::arange(0..w as i64, device);

    let y_grid = y_range.reshape([h, 1]).repeat(&[1, w]).reshape([h * w]);
    let x_grid = x_range.reshape([1, w]).repeat(&[h, 1]).reshape([h * w]);

    let y_grid = y_grid.float();
    let x_grid = x_grid.float();

    Tensor::cat(vec![y_grid.unsqueeze_dim(1), x_grid.unsqueeze_dim(1)], 1)
}

/// Zero-centered coordinate mesh for a 3D patch: along axis `d` the value
/// at index `i` is `i - (shape[d]-1)/2`.
pub fn zero_centered_mesh_3d<B: Backend>(shape: [usize; 3], device: &B::Device) -> Tensor<B, 2> {
    let offsets: Vec<f32> = shape.iter().map(|s| (*s as f32 - 1.0) / 2.0).collect();
    let offsets =
        Tensor::<B, 1>::from_data(TensorData::new(offsets, Shape::new([3])), device).reshape([1, 3]);
    identity_grid_3d::<B>(shape, device) - offsets
}

/// Zero-centered coordinate mesh for a 2D patch.
pub fn zero_centered_mesh_2d<B: Backend>(shape: [usize; 2], device: &B::Device) -> Tensor<B, 2> {
    let offsets: Vec<f32> = shape.iter().map(|s| (*s as f32 - 1.0) / 2.0).collect();
    let offsets =
        Tensor::<B, 1>::from_data(TensorData::new(offsets, Shape::new([2])), device).reshape([1, 2]);
    identity_grid_2d::<B>(shape, device) - offsets
}

/// Repack `[N, 3]` coordinate rows into a field tensor `[1, 3, D, H, W]`.
pub(crate) fn pack_field_3d<B: Backend>(coords: Tensor<B, 2>, shape: [usize; 3]) -> Tensor<B, 5> {
    let [d, h, w] = shape;
    coords.transpose().reshape([1, 3, d, h, w])
}

/// Repack `[N, 2]` coordinate rows into a field tensor `[1, 2, H, W]`.
pub(crate) fn pack_field_2d<B: Backend>(coords: Tensor<B, 2>, shape: [usize; 2]) -> Tensor<B, 4> {
    let [h, w] = shape;
    coords.transpose().reshape([1, 2, h, w])
}

/// Identity absolute coordinate field `[1, 3, D, H, W]`: the field value
/// at spatial location `p` is `p` itself.
pub fn identity_field_3d<B: Backend>(shape: [usize; 3], device: &B::Device) -> Tensor<B, 5> {
    pack_field_3d(identity_grid_3d::<B>(shape, device), shape)
}

/// Identity absolute coordinate field `[1, 2, H, W]`.
pub fn identity_field_2d<B: Backend>(shape: [usize; 2], device: &B::Device) -> Tensor<B, 4> {
    pack_field_2d(identity_grid_2d::<B>(shape, device), shape)
}
