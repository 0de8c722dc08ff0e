mod common;

use ndarray::{Array3, Array4, ArrayD, IxDyn};

use common::{volume_with_blocks, Block};
use mitosel_core::error::MitoselError;
use mitosel_core::projection::{max_project_depth, max_project_depth_dyn, max_project_time, project};
use mitosel_core::volume::Volume;

#[test]
fn test_depth_projection_takes_max_over_slices() {
    let mut data = Array4::<f32>::zeros((4, 4, 3, 2));
    data[[1, 2, 0, 0]] = 5.0;
    data[[1, 2, 2, 0]] = 9.0;
    data[[3, 3, 1, 1]] = 7.0;

    let series = max_project_depth(data.view());
    assert_eq!(series.dim(), (4, 4, 2));
    assert_eq!(series[[1, 2, 0]], 9.0);
    assert_eq!(series[[1, 2, 1]], 0.0);
    assert_eq!(series[[3, 3, 1]], 7.0);
}

#[test]
fn test_time_projection_takes_max_over_frames() {
    let mut series = Array3::<f32>::zeros((3, 3, 4));
    series[[0, 0, 1]] = 2.0;
    series[[0, 0, 3]] = 6.0;
    series[[2, 1, 0]] = 1.5;

    let flat = max_project_time(&series);
    assert_eq!(flat.dim(), (3, 3));
    assert_eq!(flat[[0, 0]], 6.0);
    assert_eq!(flat[[2, 1]], 1.5);
    assert_eq!(flat[[1, 1]], 0.0);
}

#[test]
fn test_project_volume_shapes() {
    let volume = volume_with_blocks(
        (10, 12, 3, 5),
        &[Block {
            rows: 2..4,
            cols: 3..5,
            depth: 1..2,
            time: 2..3,
            value: 42.0,
        }],
    );
    let p = project(&volume);
    assert_eq!(p.series.dim(), (10, 12, 5));
    assert_eq!(p.flat.dim(), (10, 12));
    assert_eq!(p.series[[2, 3, 2]], 42.0);
    assert_eq!(p.series[[2, 3, 1]], 0.0);
    assert_eq!(p.flat[[3, 4]], 42.0);
}

#[test]
fn test_dyn_projection_rejects_three_axes() {
    let data = ArrayD::<f32>::zeros(IxDyn(&[4, 4, 4]));
    let err = max_project_depth_dyn(&data).unwrap_err();
    assert!(matches!(err, MitoselError::InputShape { .. }));
}

#[test]
fn test_dyn_projection_accepts_four_axes() {
    let data = ArrayD::<f32>::from_elem(IxDyn(&[4, 5, 2, 3]), 1.0);
    let series = max_project_depth_dyn(&data).unwrap();
    assert_eq!(series.dim(), (4, 5, 3));
}

#[test]
fn test_volume_from_dyn_rejects_wrong_rank() {
    let data = ArrayD::<f32>::zeros(IxDyn(&[4, 4]));
    assert!(matches!(
        Volume::from_dyn(data, 1.0),
        Err(MitoselError::InputShape { .. })
    ));
}

#[test]
fn test_volume_rejects_non_positive_scale() {
    let data = Array4::<f32>::zeros((2, 2, 1, 1));
    assert!(matches!(
        Volume::new(data, 0.0),
        Err(MitoselError::InvalidConfig(_))
    ));
}

#[test]
fn test_volume_rejects_empty_axis() {
    let data = Array4::<f32>::zeros((2, 2, 0, 1));
    assert!(matches!(
        Volume::new(data, 1.0),
        Err(MitoselError::InputShape { .. })
    ));
}
