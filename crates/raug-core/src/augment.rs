//! Spatial augmentation facade.
//!
//! Ties the coordinate field generator and the warp filter together
//! behind one configured object: draw a random field for a patch, warp
//! data through it, and hand both back to the caller.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use rand::Rng;

use crate::config::SpatialAugmentConfig;
use crate::error::Result;
use crate::field::CoordinateFieldGenerator;
use crate::filter::WarpImageFilter;
use crate::interpolation::{
    InterpolationMode, LinearInterpolator, NearestNeighborInterpolator, PaddingMode,
};

/// Configured spatial augmenter.
///
/// Holds a validated config and a device; every call draws fresh
/// parameters from the caller-supplied RNG, so augmentation is
/// reproducible under a seeded generator.
///
/// # Examples
/// ```rust
/// use burn_ndarray::NdArray;
/// use burn::tensor::Tensor;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use raug_core::{SpatialAugmentConfig, SpatialAugmenter};
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let augmenter =
///     SpatialAugmenter::<Backend>::new(SpatialAugmentConfig::default(), device).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let volume = Tensor::<Backend, 4>::ones([1, 8, 8, 8], &Default::default());
/// let (warped, field) = augmenter.augment_3d(&volume, &mut rng).unwrap();
/// assert_eq!(warped.dims(), [1, 8, 8, 8]);
/// assert_eq!(field.dims(), [1, 3, 8, 8, 8]);
/// ```
#[derive(Debug)]
pub struct SpatialAugmenter<B: Backend> {
    generator: CoordinateFieldGenerator<B>,
    interpolation: InterpolationMode,
    padding: PaddingMode,
}

impl<B: Backend> SpatialAugmenter<B> {
    /// Create an augmenter with a validated config.
    pub fn new(config: SpatialAugmentConfig, device: B::Device) -> Result<Self> {
        let interpolation = config.interpolation;
        let padding = config.padding;
        let generator = CoordinateFieldGenerator::new(config, device)?;
        Ok(Self {
            generator,
            interpolation,
            padding,
        })
    }

    /// Get the underlying field generator.
    pub fn generator(&self) -> &CoordinateFieldGenerator<B> {
        &self.generator
    }

    /// Draw a random absolute coordinate field for a 3D patch.
    pub fn rand_field_3d(
        &self,
        patch: [usize; 3],
        rng: &mut impl Rng,
    ) -> Result<Tensor<B, 5>> {
        self.generator.generate_3d(patch, rng)
    }

    /// Draw a random absolute coordinate field for a 2D patch.
    pub fn rand_field_2d(
        &self,
        patch: [usize; 2],
        rng: &mut impl Rng,
    ) -> Result<Tensor<B, 4>> {
        self.generator.generate_2d(patch, rng)
    }

    /// Warp a 3D source `[C, D, H, W]` through an absolute field, using
    /// the configured interpolation and padding. The field may come from
    /// [`Self::rand_field_3d`] or any other producer of absolute
    /// coordinates.
    pub fn warp_3d(&self, source: &Tensor<B, 4>, field: &Tensor<B, 5>) -> Result<Tensor<B, 4>> {
        match self.interpolation {
            InterpolationMode::Linear => WarpImageFilter::<B, _>::new(LinearInterpolator::new())
                .with_padding(self.padding)
                .apply_3d(source, field),
            InterpolationMode::Nearest => {
                WarpImageFilter::<B, _>::new(NearestNeighborInterpolator::new())
                    .with_padding(self.padding)
                    .apply_3d(source, field)
            }
        }
    }

    /// Warp a 2D source `[C, H, W]` through an absolute field.
    pub fn warp_2d(&self, source: &Tensor<B, 3>, field: &Tensor<B, 4>) -> Result<Tensor<B, 3>> {
        match self.interpolation {
            InterpolationMode::Linear => WarpImageFilter::<B, _>::new(LinearInterpolator::new())
                .with_padding(self.padding)
                .apply_2d(source, field),
            InterpolationMode::Nearest => {
                WarpImageFilter::<B, _>::new(NearestNeighborInterpolator::new())
                    .with_padding(self.padding)
                    .apply_2d(source, field)
            }
        }
    }

    /// Draw a random field for the source's spatial shape and warp the
    /// source through it. Returns the warped tensor together with the
    /// field, so the same perturbation can be re-applied (e.g. to a
    /// paired label map with nearest interpolation).
    pub fn augment_3d(
        &self,
        source: &Tensor<B, 4>,
        rng: &mut impl Rng,
    ) -> Result<(Tensor<B, 4>, Tensor<B, 5>)> {
        let [_, d, h, w] = source.dims();
        let field = self.rand_field_3d([d, h, w], rng)?;
        let warped = self.warp_3d(source, &field)?;
        Ok((warped, field))
    }

    /// Draw a random field for the source's spatial shape and warp the
    /// source through it (2D).
    pub fn augment_2d(
        &self,
        source: &Tensor<B, 3>,
        rng: &mut impl Rng,
    ) -> Result<(Tensor<B, 3>, Tensor<B, 4>)> {
        let [_, h, w] = source.dims();
        let field = self.rand_field_2d([h, w], rng)?;
        let warped = self.warp_2d(source, &field)?;
        Ok((warped, field))
    }
}
