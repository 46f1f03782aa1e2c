//! Interpolation types and operations.
//!
//! This module provides interpolation traits and implementations for
//! sampling values at continuous coordinates under a configurable
//! out-of-bounds policy.

pub mod linear;
pub mod nearest;
pub mod trait_;

pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;
pub use trait_::{InterpolationMode, Interpolator, PaddingMode};
