//! Axis-sequential suppression of near-duplicate detections.
//!
//! For each axis in turn (row, col, time) the points are sorted along that
//! axis and scanned greedily: a point is kept only if it lies at least
//! `min_distance` (Euclidean, all three coordinates) from the most recently
//! kept point. This is not a radius clustering: two close points separated
//! in sort order by a far one can both survive a sweep. Full three-axis
//! sweeps repeat until one removes nothing, so the output is a fixed point.

use std::cmp::Ordering;

use tracing::debug;

use crate::roi::Centroid;

/// Sort along `axis`, ties broken by the remaining axes so the order
/// depends only on the point set.
fn axis_order(axis: usize) -> impl Fn(&Centroid, &Centroid) -> Ordering {
    move |a, b| {
        (0..3)
            .map(|k| (axis + k) % 3)
            .map(|k| a.coord(k).total_cmp(&b.coord(k)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// One greedy sweep along a single axis.
pub fn sweep_axis(points: Vec<Centroid>, axis: usize, min_distance: f64) -> Vec<Centroid> {
    let mut sorted = points;
    sorted.sort_by(axis_order(axis));

    let mut kept: Vec<Centroid> = Vec::with_capacity(sorted.len());
    for point in sorted {
        match kept.last() {
            Some(last) if point.distance(last) < min_distance => {}
            _ => kept.push(point),
        }
    }
    kept
}

/// One sweep along each of the three axes in sequence.
pub fn sweep_all_axes(points: Vec<Centroid>, min_distance: f64) -> Vec<Centroid> {
    (0..3).fold(points, |acc, axis| sweep_axis(acc, axis, min_distance))
}

/// Repeat three-axis sweeps until no further point is removed.
pub fn deduplicate(points: Vec<Centroid>, min_distance: f64) -> Vec<Centroid> {
    let initial = points.len();
    let mut current = points;
    let mut passes = 0usize;
    loop {
        let before = current.len();
        current = sweep_all_axes(current, min_distance);
        passes += 1;
        if current.len() == before {
            break;
        }
    }
    debug!(
        before = initial,
        after = current.len(),
        passes,
        "Deduplicated centroids"
    );
    current
}
