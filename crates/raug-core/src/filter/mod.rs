//! Resampling filters.

pub mod warp;

pub use warp::WarpImageFilter;
