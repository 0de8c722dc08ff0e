use ndarray::Array2;

use super::config::Connectivity;

/// Shape descriptors of one labeled region.
#[derive(Clone, Debug)]
pub struct RegionProps {
    /// Label of this region in the label image.
    pub label: u32,
    /// Number of pixels in the region.
    pub area: usize,
    /// Centroid as (row, col).
    pub centroid: (f64, f64),
    /// Bounding box: (min_row, max_row, min_col, max_col), inclusive.
    pub bbox: (usize, usize, usize, usize),
    /// Eccentricity of the ellipse with the same second moments (0 = circle).
    pub eccentricity: f64,
    /// Major axis length of that ellipse.
    pub major_axis_length: f64,
    /// Minor axis length of that ellipse.
    pub minor_axis_length: f64,
}

/// Label connected foreground components with two-pass union-find.
///
/// Labels are consecutive starting at 1, assigned in raster order of each
/// component's first pixel. Returns the label image and the component count.
pub fn label_components(mask: &Array2<bool>, connectivity: Connectivity) -> (Array2<u32>, u32) {
    let (h, w) = mask.dim();
    let mut labels = Array2::<u32>::zeros((h, w));
    if h == 0 || w == 0 {
        return (labels, 0);
    }

    // Previously visited neighbours in raster order.
    let offsets: &[(isize, isize)] = match connectivity {
        Connectivity::Four => &[(-1, 0), (0, -1)],
        Connectivity::Eight => &[(-1, -1), (-1, 0), (-1, 1), (0, -1)],
    };

    // Union-find parent array. Index 0 unused; labels start at 1.
    let mut parent: Vec<u32> = vec![0];

    // Pass 1: assign provisional labels.
    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }

            let mut current = 0u32;
            for &(dr, dc) in offsets {
                let nr = row as isize + dr;
                let nc = col as isize + dc;
                if nr < 0 || nc < 0 || nc >= w as isize {
                    continue;
                }
                let neighbour = labels[[nr as usize, nc as usize]];
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
            labels[[row, col]] = current;
        }
    }

    let count = resolve_labels(&mut parent, labels.iter_mut());
    (labels, count)
}

/// Flatten union-find roots and rewrite provisional labels to consecutive
/// ids in order of first appearance. Returns the number of components.
pub(crate) fn resolve_labels<'a>(
    parent: &mut [u32],
    labels: impl Iterator<Item = &'a mut u32>,
) -> u32 {
    for i in 1..parent.len() {
        parent[i] = find(parent, i as u32);
    }

    let mut remap = vec![0u32; parent.len()];
    let mut next = 0u32;
    for lbl in labels {
        if *lbl == 0 {
            continue;
        }
        let root = parent[*lbl as usize] as usize;
        if remap[root] == 0 {
            next += 1;
            remap[root] = next;
        }
        *lbl = remap[root];
    }
    next
}

/// Compute area, centroid, bounding box and moment-based shape descriptors
/// for labels `1..=count`. Returned in label order.
pub fn region_props(labels: &Array2<u32>, count: u32) -> Vec<RegionProps> {
    #[derive(Clone)]
    struct Acc {
        area: usize,
        sum_r: f64,
        sum_c: f64,
        sum_rr: f64,
        sum_cc: f64,
        sum_rc: f64,
        bbox: (usize, usize, usize, usize),
    }

    let mut accs = vec![
        Acc {
            area: 0,
            sum_r: 0.0,
            sum_c: 0.0,
            sum_rr: 0.0,
            sum_cc: 0.0,
            sum_rc: 0.0,
            bbox: (usize::MAX, 0, usize::MAX, 0),
        };
        count as usize + 1
    ];

    for ((row, col), &lbl) in labels.indexed_iter() {
        if lbl == 0 || lbl > count {
            continue;
        }
        let acc = &mut accs[lbl as usize];
        let (r, c) = (row as f64, col as f64);
        acc.area += 1;
        acc.sum_r += r;
        acc.sum_c += c;
        acc.sum_rr += r * r;
        acc.sum_cc += c * c;
        acc.sum_rc += r * c;
        acc.bbox.0 = acc.bbox.0.min(row);
        acc.bbox.1 = acc.bbox.1.max(row);
        acc.bbox.2 = acc.bbox.2.min(col);
        acc.bbox.3 = acc.bbox.3.max(col);
    }

    accs.into_iter()
        .enumerate()
        .skip(1)
        .filter(|(_, acc)| acc.area > 0)
        .map(|(label, acc)| {
            let n = acc.area as f64;
            let mean_r = acc.sum_r / n;
            let mean_c = acc.sum_c / n;
            let var_r = acc.sum_rr / n - mean_r * mean_r;
            let var_c = acc.sum_cc / n - mean_c * mean_c;
            let cov = acc.sum_rc / n - mean_r * mean_c;
            let (l1, l2) = covariance_eigenvalues(var_r, var_c, cov);
            let eccentricity = if l1 > 0.0 {
                (1.0 - l2 / l1).max(0.0).sqrt()
            } else {
                0.0
            };
            RegionProps {
                label: label as u32,
                area: acc.area,
                centroid: (mean_r, mean_c),
                bbox: acc.bbox,
                eccentricity,
                major_axis_length: 4.0 * l1.sqrt(),
                minor_axis_length: 4.0 * l2.sqrt(),
            }
        })
        .collect()
}

/// Eigenvalues (largest first) of the symmetric matrix [[a, b], [b, c]],
/// clamped at zero.
fn covariance_eigenvalues(a: f64, c: f64, b: f64) -> (f64, f64) {
    let mean = (a + c) / 2.0;
    let spread = (((a - c) / 2.0).powi(2) + b * b).sqrt();
    ((mean + spread).max(0.0), (mean - spread).max(0.0))
}

/// Remove every foreground component that touches the image border.
pub fn clear_border(mask: &Array2<bool>, connectivity: Connectivity) -> Array2<bool> {
    let (h, w) = mask.dim();
    let (labels, count) = label_components(mask, connectivity);
    let mut on_border = vec![false; count as usize + 1];
    for region in region_props(&labels, count) {
        on_border[region.label as usize] = touches_border(region.bbox, h, w);
    }
    labels.mapv(|lbl| lbl != 0 && !on_border[lbl as usize])
}

/// Returns true if the component's bounding box touches any edge of the image.
pub fn touches_border(bbox: (usize, usize, usize, usize), height: usize, width: usize) -> bool {
    let (min_row, max_row, min_col, max_col) = bbox;
    min_row == 0 || max_row >= height - 1 || min_col == 0 || max_col >= width - 1
}

pub(crate) fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

pub(crate) fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Merge larger root into smaller root to keep labels consistent.
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
