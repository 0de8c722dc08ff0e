use ndarray::Array2;

use crate::consts::CLOSING_KERNEL_SIZE;

/// Morphological closing (dilation followed by erosion) with a square kernel
/// of side [`CLOSING_KERNEL_SIZE`].
///
/// Merges foreground pixels separated by gaps narrower than the kernel.
pub fn morphological_closing(mask: &Array2<bool>) -> Array2<bool> {
    let radius = CLOSING_KERNEL_SIZE as i32 / 2;
    let dilated = dilate(mask, radius);
    erode(&dilated, radius)
}

/// Binary dilation: a pixel becomes true if ANY pixel in its neighborhood is true.
pub fn dilate(mask: &Array2<bool>, radius: i32) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            let mut any_true = false;
            'outer: for dr in -radius..=radius {
                for dc in -radius..=radius {
                    let nr = row as i32 + dr;
                    let nc = col as i32 + dc;
                    if nr >= 0
                        && nr < h as i32
                        && nc >= 0
                        && nc < w as i32
                        && mask[[nr as usize, nc as usize]]
                    {
                        any_true = true;
                        break 'outer;
                    }
                }
            }
            result[[row, col]] = any_true;
        }
    }

    result
}

/// Binary erosion: a pixel stays true only if ALL in-bounds pixels in its
/// neighborhood are true. Out-of-bounds neighbours are ignored, so the
/// image edge never erodes foreground on its own.
pub fn erode(mask: &Array2<bool>, radius: i32) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }
            let mut all_true = true;
            'outer: for dr in -radius..=radius {
                for dc in -radius..=radius {
                    let nr = row as i32 + dr;
                    let nc = col as i32 + dc;
                    if nr < 0 || nr >= h as i32 || nc < 0 || nc >= w as i32 {
                        continue;
                    }
                    if !mask[[nr as usize, nc as usize]] {
                        all_true = false;
                        break 'outer;
                    }
                }
            }
            result[[row, col]] = all_true;
        }
    }

    result
}
