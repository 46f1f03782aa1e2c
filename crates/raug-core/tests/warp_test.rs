use burn::tensor::{Shape, Tensor, TensorData};
use burn_ndarray::NdArray;
use proptest::prelude::*;
use raug_core::field::{identity_field_2d, identity_field_3d};
use raug_core::interpolation::{LinearInterpolator, PaddingMode};
use raug_core::{AugmentError, WarpImageFilter};

type Backend = NdArray<f32>;

#[test]
fn all_ones_volume_survives_identity_warp() {
    // Three-channel all-ones 5x5x5 volume, identity field, zero padding:
    // every sample lands on a grid point, nothing leaves the patch.
    let device = Default::default();
    let source = Tensor::<Backend, 4>::ones([3, 5, 5, 5], &device);
    let field = identity_field_3d::<Backend>([5, 5, 5], &device);

    let filter = WarpImageFilter::new(LinearInterpolator::new());
    let warped = filter.apply_3d(&source, &field).unwrap();
    assert_eq!(warped.dims(), [3, 5, 5, 5]);

    let warped = warped.into_data();
    for v in warped.as_slice::<f32>().unwrap() {
        assert!((v - 1.0).abs() < 1e-5, "got {}", v);
    }
}

#[test]
fn shifted_field_zero_fills_vacated_region() {
    // Shift sampling by +2 along the fastest axis of a 4-wide image:
    // output columns 2 and 3 read outside the source and become zero.
    let device = Default::default();
    let source = Tensor::<Backend, 3>::from_data(
        TensorData::new(vec![1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 3.0, 4.0], Shape::new([1, 2, 4])),
        &device,
    );

    let field = identity_field_2d::<Backend>([2, 4], &device)
        + Tensor::<Backend, 4>::from_data(
            TensorData::new(vec![0.0, 2.0], Shape::new([1, 2, 1, 1])),
            &device,
        );

    let filter = WarpImageFilter::new(LinearInterpolator::new());
    let warped = filter.apply_2d(&source, &field).unwrap();
    let warped = warped.into_data();
    let slice = warped.as_slice::<f32>().unwrap();

    let expected = [3.0, 4.0, 0.0, 0.0, 3.0, 4.0, 0.0, 0.0];
    for (got, want) in slice.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-5, "got {}, expected {}", got, want);
    }
}

#[test]
fn border_padding_extends_edge_values() {
    let device = Default::default();
    let source = Tensor::<Backend, 3>::from_data(
        TensorData::new(vec![1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 3.0, 4.0], Shape::new([1, 2, 4])),
        &device,
    );

    let field = identity_field_2d::<Backend>([2, 4], &device)
        + Tensor::<Backend, 4>::from_data(
            TensorData::new(vec![0.0, 2.0], Shape::new([1, 2, 1, 1])),
            &device,
        );

    let filter =
        WarpImageFilter::new(LinearInterpolator::new()).with_padding(PaddingMode::Border);
    let warped = filter.apply_2d(&source, &field).unwrap();
    let warped = warped.into_data();
    let slice = warped.as_slice::<f32>().unwrap();

    let expected = [3.0, 4.0, 4.0, 4.0, 3.0, 4.0, 4.0, 4.0];
    for (got, want) in slice.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-5, "got {}, expected {}", got, want);
    }
}

#[test]
fn spatial_shape_mismatch_is_an_error() {
    let device = Default::default();
    let source = Tensor::<Backend, 4>::ones([1, 4, 4, 4], &device);
    let field = identity_field_3d::<Backend>([4, 4, 5], &device);

    let filter = WarpImageFilter::new(LinearInterpolator::new());
    match filter.apply_3d(&source, &field) {
        Err(AugmentError::ShapeMismatch { expected, actual }) => {
            assert_eq!(expected, vec![1, 3, 4, 4, 4]);
            assert_eq!(actual, vec![1, 3, 4, 4, 5]);
        }
        other => panic!("expected shape mismatch, got {:?}", other.map(|t| t.dims())),
    }
}

proptest! {
    #[test]
    fn identity_warp_reproduces_arbitrary_images(values in proptest::collection::vec(-100.0f32..100.0, 12)) {
        let device = Default::default();
        let source = Tensor::<Backend, 3>::from_data(
            TensorData::new(values.clone(), Shape::new([1, 3, 4])),
            &device,
        );
        let field = identity_field_2d::<Backend>([3, 4], &device);

        let filter = WarpImageFilter::new(LinearInterpolator::new());
        let warped = filter.apply_2d(&source, &field).unwrap();
        let warped = warped.into_data();
        let slice = warped.as_slice::<f32>().unwrap();

        for (got, want) in slice.iter().zip(values.iter()) {
            prop_assert!((got - want).abs() < 1e-3, "got {}, expected {}", got, want);
        }
    }
}
