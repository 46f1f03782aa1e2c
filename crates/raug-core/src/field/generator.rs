//! Random coordinate field generation.
//!
//! Draws rotation angles and scale factors, applies them to a
//! zero-centered coordinate mesh and re-centers the result onto absolute
//! patch coordinates. The returned field holds, for every output
//! location, the source coordinate to sample from (an inverse warp about
//! the patch center).

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use rand::Rng;

use super::mesh::{pack_field_2d, pack_field_3d, zero_centered_mesh_2d, zero_centered_mesh_3d};
use super::rotation::{euler_rotation_3d, matrix_to_tensor, planar_rotation_2d};
use crate::config::SpatialAugmentConfig;
use crate::error::{AugmentError, Result};

/// One drawn set of augmentation parameters.
///
/// `angles` are radians about axes 0, 1, 2; 2D patches use `angles[0]`
/// as the single planar angle. `scale` holds one factor per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialParams {
    pub angles: [f64; 3],
    pub scale: Vec<f64>,
}

impl SpatialParams {
    /// Parameters that leave the mesh untouched.
    pub fn identity(rank: usize) -> Self {
        Self {
            angles: [0.0; 3],
            scale: vec![1.0; rank],
        }
    }
}

/// Generator of random absolute coordinate fields.
///
/// # Type Parameters
/// * `B` - The Burn backend
#[derive(Debug)]
pub struct CoordinateFieldGenerator<B: Backend> {
    config: SpatialAugmentConfig,
    device: B::Device,
}

impl<B: Backend> CoordinateFieldGenerator<B> {
    /// Create a generator with a validated config.
    pub fn new(config: SpatialAugmentConfig, device: B::Device) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, device })
    }

    /// Get the generator's config.
    pub fn config(&self) -> &SpatialAugmentConfig {
        &self.config
    }

    /// Draw rotation angles and scale factors per the config.
    ///
    /// Split out from field construction so a drawn parameter set can be
    /// logged, inspected and replayed deterministically.
    pub fn sample_params(&self, rank: usize, rng: &mut impl Rng) -> Result<SpatialParams> {
        use crate::config::draw_uniform;

        let angles = if self.config.do_rotation {
            match rank {
                3 => [
                    draw_uniform(self.config.angle_x, rng),
                    draw_uniform(self.config.angle_y, rng),
                    draw_uniform(self.config.angle_z, rng),
                ],
                2 => [draw_uniform(self.config.angle_x, rng), 0.0, 0.0],
                _ => {
                    return Err(AugmentError::invalid_patch_shape(format!(
                        "rank must be 2 or 3, got {}",
                        rank
                    )))
                }
            }
        } else {
            [0.0; 3]
        };

        let scale = if self.config.do_scale {
            self.config.scale.sample(rank, rng)?
        } else {
            vec![1.0; rank]
        };

        Ok(SpatialParams { angles, scale })
    }

    /// Draw parameters and build a 3D field `[1, 3, D, H, W]`.
    pub fn generate_3d(&self, patch: [usize; 3], rng: &mut impl Rng) -> Result<Tensor<B, 5>> {
        let params = self.sample_params(3, rng)?;
        tracing::debug!(
            "Drew spatial params: angles {:?}, scale {:?}",
            params.angles,
            params.scale
        );
        self.field_from_params_3d(patch, &params)
    }

    /// Draw parameters and build a 2D field `[1, 2, H, W]`.
    pub fn generate_2d(&self, patch: [usize; 2], rng: &mut impl Rng) -> Result<Tensor<B, 4>> {
        let params = self.sample_params(2, rng)?;
        tracing::debug!(
            "Drew spatial params: angle {:?}, scale {:?}",
            params.angles[0],
            params.scale
        );
        self.field_from_params_2d(patch, &params)
    }

    /// Build a 3D field from explicit parameters.
    ///
    /// Rotation applies to every coordinate row as `v' = v * R` with
    /// `R = Rx * Ry * Rz`; scaling multiplies each axis afterwards; the
    /// result is shifted by `ctr[d] = patch[d] / 2` (integer division)
    /// into absolute coordinates.
    pub fn field_from_params_3d(
        &self,
        patch: [usize; 3],
        params: &SpatialParams,
    ) -> Result<Tensor<B, 5>> {
        check_patch(&patch)?;
        check_scale_rank(params, 3)?;

        let mut coords = zero_centered_mesh_3d::<B>(patch, &self.device);

        if params.angles.iter().any(|a| *a != 0.0) {
            let r = euler_rotation_3d(params.angles[0], params.angles[1], params.angles[2]);
            coords = coords.matmul(matrix_to_tensor::<B, 3>(&r, &self.device));
        }

        if params.scale.iter().any(|s| *s != 1.0) {
            coords = coords * scale_row::<B>(&params.scale, &self.device);
        }

        let ctr: Vec<f32> = patch.iter().map(|s| (s / 2) as f32).collect();
        let ctr =
            Tensor::<B, 1>::from_data(TensorData::new(ctr, Shape::new([3])), &self.device)
                .reshape([1, 3]);

        let field = pack_field_3d(coords + ctr, patch);
        ensure_finite(&field)?;
        Ok(field)
    }

    /// Build a 2D field from explicit parameters (planar rotation from
    /// `angles[0]`).
    pub fn field_from_params_2d(
        &self,
        patch: [usize; 2],
        params: &SpatialParams,
    ) -> Result<Tensor<B, 4>> {
        check_patch(&patch)?;
        check_scale_rank(params, 2)?;

        let mut coords = zero_centered_mesh_2d::<B>(patch, &self.device);

        if params.angles[0] != 0.0 {
            let r = planar_rotation_2d(params.angles[0]);
            coords = coords.matmul(matrix_to_tensor::<B, 2>(&r, &self.device));
        }

        if params.scale.iter().any(|s| *s != 1.0) {
            coords = coords * scale_row::<B>(&params.scale, &self.device);
        }

        let ctr: Vec<f32> = patch.iter().map(|s| (s / 2) as f32).collect();
        let ctr =
            Tensor::<B, 1>::from_data(TensorData::new(ctr, Shape::new([2])), &self.device)
                .reshape([1, 2]);

        let field = pack_field_2d(coords + ctr, patch);
        ensure_finite(&field)?;
        Ok(field)
    }
}

fn check_patch(patch: &[usize]) -> Result<()> {
    if let Some((axis, extent)) = patch.iter().enumerate().find(|(_, e)| **e <= 1) {
        return Err(AugmentError::invalid_patch_shape(format!(
            "axis {} has extent {}; every axis must be > 1",
            axis, extent
        )));
    }
    Ok(())
}

fn check_scale_rank(params: &SpatialParams, rank: usize) -> Result<()> {
    if params.scale.len() != rank {
        return Err(AugmentError::invalid_configuration(format!(
            "scale has {} factors, patch rank is {}",
            params.scale.len(),
            rank
        )));
    }
    Ok(())
}

fn scale_row<B: Backend>(scale: &[f64], device: &B::Device) -> Tensor<B, 2> {
    let rank = scale.len();
    let factors: Vec<f32> = scale.iter().map(|s| *s as f32).collect();
    Tensor::<B, 1>::from_data(TensorData::new(factors, Shape::new([rank])), device)
        .reshape([1, rank])
}

fn ensure_finite<B: Backend, const D: usize>(field: &Tensor<B, D>) -> Result<()> {
    let data = field.to_data();
    if data.iter::<f32>().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(AugmentError::numerical_anomaly(
            "generated coordinate field contains non-finite values",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScaleRange;
    use crate::field::mesh::{identity_field_2d, identity_field_3d};
    use burn_ndarray::NdArray;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestBackend = NdArray<f32>;

    fn passthrough_config() -> SpatialAugmentConfig {
        SpatialAugmentConfig {
            do_rotation: false,
            do_scale: false,
            ..Default::default()
        }
    }

    fn generator(config: SpatialAugmentConfig) -> CoordinateFieldGenerator<TestBackend> {
        CoordinateFieldGenerator::new(config, Default::default()).unwrap()
    }

    #[test]
    fn test_passthrough_yields_identity_field() {
        let device = Default::default();
        let gen = generator(passthrough_config());
        let mut rng = StdRng::seed_from_u64(0);

        let field = gen.generate_3d([5, 5, 5], &mut rng).unwrap();
        assert_eq!(field.dims(), [1, 3, 5, 5, 5]);

        let expected = identity_field_3d::<TestBackend>([5, 5, 5], &device);
        let field = field.into_data();
        let expected = expected.into_data();
        assert_eq!(
            field.as_slice::<f32>().unwrap(),
            expected.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_passthrough_yields_identity_field_2d() {
        let device = Default::default();
        let gen = generator(passthrough_config());
        let mut rng = StdRng::seed_from_u64(0);

        let field = gen.generate_2d([7, 5], &mut rng).unwrap();
        assert_eq!(field.dims(), [1, 2, 7, 5]);

        let expected = identity_field_2d::<TestBackend>([7, 5], &device);
        let field = field.into_data();
        let expected = expected.into_data();
        assert_eq!(
            field.as_slice::<f32>().unwrap(),
            expected.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_zero_angles_match_disabled_rotation() {
        let gen = generator(passthrough_config());

        let rotated = gen
            .field_from_params_3d(
                [4, 6, 8],
                &SpatialParams {
                    angles: [0.0, 0.0, 0.0],
                    scale: vec![1.0; 3],
                },
            )
            .unwrap();
        let plain = gen
            .field_from_params_3d([4, 6, 8], &SpatialParams::identity(3))
            .unwrap();

        let rotated = rotated.into_data();
        let plain = plain.into_data();
        assert_eq!(
            rotated.as_slice::<f32>().unwrap(),
            plain.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_unit_scale_matches_disabled_scale() {
        let gen = generator(passthrough_config());

        let scaled = gen
            .field_from_params_3d(
                [5, 5, 5],
                &SpatialParams {
                    angles: [0.3, -0.2, 0.9],
                    scale: vec![1.0; 3],
                },
            )
            .unwrap();
        let plain = gen
            .field_from_params_3d(
                [5, 5, 5],
                &SpatialParams {
                    angles: [0.3, -0.2, 0.9],
                    scale: vec![1.0, 1.0, 1.0],
                },
            )
            .unwrap();

        let scaled = scaled.into_data();
        let plain = plain.into_data();
        assert_eq!(
            scaled.as_slice::<f32>().unwrap(),
            plain.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_per_axis_scale_applies_per_axis() {
        let gen = generator(passthrough_config());

        let field = gen
            .field_from_params_3d(
                [5, 5, 5],
                &SpatialParams {
                    angles: [0.0; 3],
                    scale: vec![2.0, 1.0, 0.5],
                },
            )
            .unwrap();

        // At location (0,0,0) the zero-centered mesh is (-2,-2,-2);
        // scaling gives (-4,-2,-1); re-centering by ctr=2 gives (-2,0,1).
        let data = field.into_data();
        let slice = data.as_slice::<f32>().unwrap();
        let n = 125;
        assert_eq!(slice[0], -2.0);
        assert_eq!(slice[n], 0.0);
        assert_eq!(slice[2 * n], 1.0);
    }

    #[test]
    fn test_rotation_changes_field() {
        let gen = generator(passthrough_config());

        let rotated = gen
            .field_from_params_3d(
                [5, 5, 5],
                &SpatialParams {
                    angles: [0.0, 0.0, std::f64::consts::FRAC_PI_2],
                    scale: vec![1.0; 3],
                },
            )
            .unwrap();
        let plain = gen
            .field_from_params_3d([5, 5, 5], &SpatialParams::identity(3))
            .unwrap();

        let rotated = rotated.into_data();
        let plain = plain.into_data();
        assert_ne!(
            rotated.as_slice::<f32>().unwrap(),
            plain.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_degenerate_patch_rejected() {
        let gen = generator(passthrough_config());
        let mut rng = StdRng::seed_from_u64(0);

        let err = gen.generate_3d([5, 1, 5], &mut rng).unwrap_err();
        assert!(matches!(err, AugmentError::InvalidPatchShape(_)));

        let err = gen.generate_2d([1, 5], &mut rng).unwrap_err();
        assert!(matches!(err, AugmentError::InvalidPatchShape(_)));
    }

    #[test]
    fn test_scale_rank_mismatch_rejected() {
        let gen = generator(passthrough_config());
        let err = gen
            .field_from_params_3d(
                [5, 5, 5],
                &SpatialParams {
                    angles: [0.0; 3],
                    scale: vec![1.0, 1.0],
                },
            )
            .unwrap_err();
        assert!(matches!(err, AugmentError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_same_seed_same_field() {
        let config = SpatialAugmentConfig {
            scale: ScaleRange::Uniform {
                min: 0.75,
                max: 1.25,
            },
            ..Default::default()
        };
        let gen = generator(config);

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let params_a = gen.sample_params(3, &mut rng_a).unwrap();
        let params_b = gen.sample_params(3, &mut rng_b).unwrap();
        assert_eq!(params_a, params_b);

        let field_a = gen.field_from_params_3d([4, 4, 4], &params_a).unwrap();
        let field_b = gen.field_from_params_3d([4, 4, 4], &params_b).unwrap();
        let field_a = field_a.into_data();
        let field_b = field_b.into_data();
        assert_eq!(
            field_a.as_slice::<f32>().unwrap(),
            field_b.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_sampled_params_respect_intervals() {
        let config = SpatialAugmentConfig {
            do_rotation: true,
            angle_x: (-0.1, 0.1),
            angle_y: (0.0, 0.0),
            angle_z: (0.5, 0.6),
            do_scale: true,
            scale: ScaleRange::Uniform {
                min: 0.9,
                max: 1.1,
            },
            ..Default::default()
        };
        let gen = generator(config);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let params = gen.sample_params(3, &mut rng).unwrap();
            assert!(params.angles[0] >= -0.1 && params.angles[0] < 0.1);
            assert_eq!(params.angles[1], 0.0);
            assert!(params.angles[2] >= 0.5 && params.angles[2] < 0.6);
            assert!(params.scale[0] >= 0.9 && params.scale[0] < 1.1);
        }
    }
}
