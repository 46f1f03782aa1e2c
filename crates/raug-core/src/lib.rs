pub mod augment;
pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod interpolation;

pub use augment::SpatialAugmenter;
pub use config::{ScaleRange, SpatialAugmentConfig};
pub use error::{AugmentError, Result};
pub use field::{CoordinateFieldGenerator, SpatialParams};
pub use filter::WarpImageFilter;
pub use interpolation::{InterpolationMode, Interpolator, PaddingMode};
