use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_ROI_THRESHOLD;
use crate::roi::{RoiBounds, RoiRecord};

/// One contrast-stretched 8-bit frame of a ROI crop.
#[derive(Clone, Debug)]
pub struct RoiFrame {
    pub roi_id: usize,
    pub time_index: usize,
    pub pixels: Array2<u8>,
}

/// Peak-activity window of one ROI.
#[derive(Clone, Debug)]
pub struct PeakWindow {
    pub roi_id: usize,
    pub peak_time: usize,
    /// First frame (inclusive).
    pub time_start: usize,
    /// Last frame (exclusive).
    pub time_end: usize,
    pub frames: Vec<RoiFrame>,
}

/// Time index of the brightest pixel inside `bounds`; ties go to the
/// earliest frame.
pub fn peak_time(series: &Array3<f32>, bounds: &RoiBounds) -> usize {
    let crop = series.slice(s![
        bounds.row_min..bounds.row_max,
        bounds.col_min..bounds.col_max,
        ..
    ]);
    let mut best_time = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (t, frame) in crop.axis_iter(Axis(2)).enumerate() {
        let frame_max = frame.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
        if frame_max > best_value {
            best_value = frame_max;
            best_time = t;
        }
    }
    best_time
}

/// Symmetric window `[peak - half, peak + half)` clipped to `[0, size_t)`.
pub fn window_bounds(peak_time: usize, size_t: usize, half_window_frames: usize) -> (usize, usize) {
    let start = peak_time.saturating_sub(half_window_frames);
    let end = (peak_time + half_window_frames).min(size_t);
    (start, end)
}

/// Per-frame min-max stretch to 0..=255, truncated to u8.
///
/// A uniform frame has no range to stretch and maps to all zeros.
pub fn contrast_stretch(frame: ArrayView2<f32>) -> Array2<u8> {
    let (min, max) = frame.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;
    if !(range.is_finite() && range > 0.0) {
        debug!(value = min, "Uniform frame, writing zeros");
        return Array2::zeros(frame.raw_dim());
    }
    frame.mapv(|v| ((v - min) / range * 255.0).clamp(0.0, 255.0) as u8)
}

/// Find the peak frame of one ROI and render its window.
pub fn extract_window(
    series: &Array3<f32>,
    roi_id: usize,
    bounds: &RoiBounds,
    half_window_frames: usize,
) -> PeakWindow {
    let size_t = series.len_of(Axis(2));
    let peak = peak_time(series, bounds);
    let (time_start, time_end) = window_bounds(peak, size_t, half_window_frames);

    let crop = series.slice(s![
        bounds.row_min..bounds.row_max,
        bounds.col_min..bounds.col_max,
        ..
    ]);
    let frames = (time_start..time_end)
        .map(|t| RoiFrame {
            roi_id,
            time_index: t,
            pixels: contrast_stretch(crop.index_axis(Axis(2), t)),
        })
        .collect();

    PeakWindow {
        roi_id,
        peak_time: peak,
        time_start,
        time_end,
        frames,
    }
}

/// Extract peak windows for every ROI, in record order.
///
/// ROIs are independent, so large batches are processed in parallel.
pub fn extract_windows(
    series: &Array3<f32>,
    records: &[RoiRecord],
    half_window_frames: usize,
) -> Vec<PeakWindow> {
    let extract = |r: &RoiRecord| extract_window(series, r.id, &r.bounds, half_window_frames);
    if records.len() >= PARALLEL_ROI_THRESHOLD {
        records.par_iter().map(extract).collect()
    } else {
        records.iter().map(extract).collect()
    }
}
