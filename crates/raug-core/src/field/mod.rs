//! Coordinate field construction: meshes, rotations and the random
//! field generator.

pub mod generator;
pub mod mesh;
pub mod rotation;

pub use generator::{CoordinateFieldGenerator, SpatialParams};
pub use mesh::{
    identity_field_2d, identity_field_3d, identity_grid_2d, identity_grid_3d,
    zero_centered_mesh_2d, zero_centered_mesh_3d,
};
pub use rotation::{euler_rotation_3d, planar_rotation_2d};
