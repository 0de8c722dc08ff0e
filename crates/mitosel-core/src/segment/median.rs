use ndarray::Array2;

use crate::consts::MEDIAN_KERNEL_SIZE;

/// Median filter with a square window of side [`MEDIAN_KERNEL_SIZE`].
///
/// Edge pixels use the window clipped to the image.
pub fn median_filter(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = (MEDIAN_KERNEL_SIZE / 2) as isize;
    let mut result = Array2::<f32>::zeros((h, w));
    let mut window = Vec::with_capacity(MEDIAN_KERNEL_SIZE * MEDIAN_KERNEL_SIZE);

    for row in 0..h {
        for col in 0..w {
            window.clear();
            for dr in -radius..=radius {
                for dc in -radius..=radius {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    if nr >= 0 && nr < h as isize && nc >= 0 && nc < w as isize {
                        window.push(data[[nr as usize, nc as usize]]);
                    }
                }
            }
            result[[row, col]] = compute_median(&mut window);
        }
    }

    result
}

fn compute_median(values: &mut [f32]) -> f32 {
    let n = values.len();
    if n == 1 {
        values[0]
    } else if n % 2 == 1 {
        let mid = n / 2;
        *values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b)).1
    } else {
        let mid = n / 2;
        values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        values[..mid].select_nth_unstable_by(mid - 1, |a, b| a.total_cmp(b));
        (values[mid - 1] + values[mid]) / 2.0
    }
}
