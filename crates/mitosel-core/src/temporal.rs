//! Temporal consolidation of per-slice label images.
//!
//! Slices are labeled independently, so their ids do not agree across time.
//! The whole (row, col, time) stack is re-labeled as one 3D connected
//! component problem and components that do not persist long enough are
//! dropped.

use ndarray::Array3;
use tracing::debug;

use crate::roi::Centroid;
use crate::segment::components::{resolve_labels, union};
use crate::segment::Connectivity;

/// One persistent 3D component.
#[derive(Clone, Debug)]
pub struct Component3d {
    pub label: u32,
    /// Voxel count.
    pub volume: usize,
    /// Mean voxel position.
    pub centroid: Centroid,
    /// First and last frame touched, inclusive.
    pub time_range: (usize, usize),
}

impl Component3d {
    /// Number of frames the component spans.
    pub fn time_extent(&self) -> usize {
        self.time_range.1 - self.time_range.0 + 1
    }
}

/// Result of temporal consolidation.
#[derive(Clone, Debug)]
pub struct Consolidated {
    /// 3D label volume; short-lived components are reset to 0.
    pub labels: Array3<u32>,
    /// Surviving components in label order.
    pub components: Vec<Component3d>,
}

/// Label 3D connected components of the non-zero voxels of `stack`.
///
/// `Four` uses face adjacency (6 neighbours), `Eight` uses full adjacency
/// (26 neighbours). Returns the label volume and component count.
pub fn label_components_3d(stack: &Array3<u32>, connectivity: Connectivity) -> (Array3<u32>, u32) {
    let (h, w, t) = stack.dim();
    let mut labels = Array3::<u32>::zeros((h, w, t));
    if stack.is_empty() {
        return (labels, 0);
    }

    let offsets = preceding_offsets(connectivity);
    let mut parent: Vec<u32> = vec![0];

    for row in 0..h {
        for col in 0..w {
            for time in 0..t {
                if stack[[row, col, time]] == 0 {
                    continue;
                }

                let mut current = 0u32;
                for &(dr, dc, dt) in &offsets {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    let nt = time as isize + dt;
                    if nr < 0 || nc < 0 || nt < 0 || nc >= w as isize || nt >= t as isize {
                        continue;
                    }
                    let neighbour = labels[[nr as usize, nc as usize, nt as usize]];
                    if neighbour == 0 {
                        continue;
                    }
                    if current == 0 {
                        current = neighbour;
                    } else if current != neighbour {
                        union(&mut parent, current, neighbour);
                        current = current.min(neighbour);
                    }
                }

                if current == 0 {
                    current = parent.len() as u32;
                    parent.push(current);
                }
                labels[[row, col, time]] = current;
            }
        }
    }

    let count = resolve_labels(&mut parent, labels.iter_mut());
    (labels, count)
}

/// Neighbour offsets that precede a voxel in (row, col, time) scan order.
fn preceding_offsets(connectivity: Connectivity) -> Vec<(isize, isize, isize)> {
    let mut offsets = Vec::with_capacity(13);
    for dr in -1..=1isize {
        for dc in -1..=1isize {
            for dt in -1..=1isize {
                if (dr, dc, dt) >= (0, 0, 0) {
                    continue;
                }
                let nonzero = [dr, dc, dt].iter().filter(|&&d| d != 0).count();
                if connectivity == Connectivity::Four && nonzero != 1 {
                    continue;
                }
                offsets.push((dr, dc, dt));
            }
        }
    }
    offsets
}

/// Re-label a stack of per-slice label images in 3D and keep only
/// components spanning more than `min_time_frames` frames.
pub fn consolidate(
    stack: &Array3<u32>,
    min_time_frames: usize,
    connectivity: Connectivity,
) -> Consolidated {
    #[derive(Clone)]
    struct Acc {
        volume: usize,
        sum: (f64, f64, f64),
        t_min: usize,
        t_max: usize,
    }

    let (mut labels, count) = label_components_3d(stack, connectivity);

    let mut accs = vec![
        Acc {
            volume: 0,
            sum: (0.0, 0.0, 0.0),
            t_min: usize::MAX,
            t_max: 0,
        };
        count as usize + 1
    ];
    for ((row, col, time), &lbl) in labels.indexed_iter() {
        if lbl == 0 {
            continue;
        }
        let acc = &mut accs[lbl as usize];
        acc.volume += 1;
        acc.sum.0 += row as f64;
        acc.sum.1 += col as f64;
        acc.sum.2 += time as f64;
        acc.t_min = acc.t_min.min(time);
        acc.t_max = acc.t_max.max(time);
    }

    let mut keep = vec![false; count as usize + 1];
    let mut components = Vec::new();
    for (label, acc) in accs.into_iter().enumerate().skip(1) {
        if acc.volume == 0 {
            continue;
        }
        let n = acc.volume as f64;
        let component = Component3d {
            label: label as u32,
            volume: acc.volume,
            centroid: Centroid {
                row: acc.sum.0 / n,
                col: acc.sum.1 / n,
                time: acc.sum.2 / n,
            },
            time_range: (acc.t_min, acc.t_max),
        };
        if component.time_extent() > min_time_frames {
            keep[label] = true;
            components.push(component);
        }
    }
    labels.mapv_inplace(|lbl| if keep[lbl as usize] { lbl } else { 0 });

    debug!(
        components = count,
        persistent = components.len(),
        min_time_frames,
        "Consolidated label stack"
    );

    Consolidated { labels, components }
}
