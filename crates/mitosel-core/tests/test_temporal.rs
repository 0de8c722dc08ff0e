use ndarray::Array3;

use mitosel_core::segment::Connectivity;
use mitosel_core::temporal::{consolidate, label_components_3d};

fn stack_with(shape: (usize, usize, usize), voxels: &[(usize, usize, usize)]) -> Array3<u32> {
    let mut stack = Array3::<u32>::zeros(shape);
    for &(r, c, t) in voxels {
        stack[[r, c, t]] = 1;
    }
    stack
}

#[test]
fn test_persistent_component_survives() {
    let voxels: Vec<_> = (0..5).map(|t| (5, 5, t)).chain([(10, 10, 0), (10, 10, 1)]).collect();
    let stack = stack_with((16, 16, 6), &voxels);

    let result = consolidate(&stack, 3, Connectivity::Eight);
    assert_eq!(result.components.len(), 1);
    let c = &result.components[0];
    assert_eq!(c.volume, 5);
    assert_eq!(c.time_range, (0, 4));
    assert_eq!(c.time_extent(), 5);
    assert_eq!(c.centroid.row, 5.0);
    assert_eq!(c.centroid.col, 5.0);
    assert_eq!(c.centroid.time, 2.0);

    assert_eq!(result.labels[[10, 10, 0]], 0, "transient component cleared");
    assert_ne!(result.labels[[5, 5, 3]], 0);
}

#[test]
fn test_time_extent_must_exceed_minimum() {
    let voxels: Vec<_> = (0..3).map(|t| (4, 4, t)).collect();
    let stack = stack_with((8, 8, 5), &voxels);
    assert!(consolidate(&stack, 3, Connectivity::Eight).components.is_empty());
    assert_eq!(consolidate(&stack, 2, Connectivity::Eight).components.len(), 1);
}

#[test]
fn test_slice_ids_are_ignored() {
    // Different per-slice ids for the same object still form one component.
    let mut stack = Array3::<u32>::zeros((8, 8, 4));
    for t in 0..4 {
        stack[[3, 3, t]] = t as u32 + 7;
    }
    let (_, count) = label_components_3d(&stack, Connectivity::Four);
    assert_eq!(count, 1);
}

#[test]
fn test_diagonal_drift_depends_on_connectivity() {
    let stack = stack_with((8, 8, 2), &[(2, 2, 0), (3, 3, 1)]);
    let (_, faces) = label_components_3d(&stack, Connectivity::Four);
    let (_, full) = label_components_3d(&stack, Connectivity::Eight);
    assert_eq!(faces, 2);
    assert_eq!(full, 1);
}

#[test]
fn test_separate_objects_get_separate_labels() {
    let mut voxels: Vec<_> = (0..5).map(|t| (1, 1, t)).collect();
    voxels.extend((0..5).map(|t| (6, 6, t)));
    let stack = stack_with((8, 8, 5), &voxels);
    let result = consolidate(&stack, 3, Connectivity::Eight);
    assert_eq!(result.components.len(), 2);
    assert_ne!(result.labels[[1, 1, 0]], result.labels[[6, 6, 0]]);
}

#[test]
fn test_empty_stack() {
    let stack = Array3::<u32>::zeros((0, 4, 4));
    let result = consolidate(&stack, 3, Connectivity::Eight);
    assert!(result.components.is_empty());
}
