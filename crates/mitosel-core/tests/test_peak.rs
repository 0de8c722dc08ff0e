mod common;

use ndarray::{Array2, Array3};

use common::Lcg;
use mitosel_core::peak::{
    contrast_stretch, extract_window, extract_windows, peak_time, window_bounds,
};
use mitosel_core::roi::{ResultTable, RoiBounds};

fn full_bounds(h: usize, w: usize) -> RoiBounds {
    RoiBounds {
        row_min: 0,
        row_max: h,
        col_min: 0,
        col_max: w,
    }
}

// ---------------------------------------------------------------------------
// Contrast stretch
// ---------------------------------------------------------------------------

#[test]
fn test_stretch_spans_full_range() {
    let frame = Array2::from_shape_vec((2, 2), vec![10.0f32, 20.0, 30.0, 50.0]).unwrap();
    let out = contrast_stretch(frame.view());
    assert_eq!(out[[0, 0]], 0);
    assert_eq!(out[[1, 1]], 255);
    assert_eq!(out[[0, 1]], 63);
    assert_eq!(out[[1, 0]], 127);
}

#[test]
fn test_stretch_uniform_frame_is_zero() {
    let frame = Array2::<f32>::from_elem((5, 5), 42.0);
    assert!(contrast_stretch(frame.view()).iter().all(|&v| v == 0));
}

#[test]
fn test_stretch_random_frames() {
    let mut rng = Lcg::new(5);
    for _ in 0..20 {
        let frame = Array2::from_shape_fn((8, 8), |_| (rng.next_f64() * 4000.0) as f32);
        let out = contrast_stretch(frame.view());
        assert_eq!(*out.iter().min().unwrap(), 0);
        assert_eq!(*out.iter().max().unwrap(), 255);
    }
}

// ---------------------------------------------------------------------------
// Peak & window
// ---------------------------------------------------------------------------

#[test]
fn test_peak_time_first_max_wins() {
    let mut series = Array3::<f32>::zeros((6, 6, 8));
    series[[2, 2, 2]] = 9.0;
    series[[3, 3, 5]] = 9.0;
    assert_eq!(peak_time(&series, &full_bounds(6, 6)), 2);
}

#[test]
fn test_peak_time_only_looks_inside_bounds() {
    let mut series = Array3::<f32>::zeros((10, 10, 5));
    series[[8, 8, 1]] = 100.0;
    series[[2, 2, 3]] = 5.0;
    let bounds = RoiBounds {
        row_min: 0,
        row_max: 5,
        col_min: 0,
        col_max: 5,
    };
    assert_eq!(peak_time(&series, &bounds), 3);
}

#[test]
fn test_window_bounds_clip() {
    assert_eq!(window_bounds(3, 10, 5), (0, 8));
    assert_eq!(window_bounds(8, 10, 5), (3, 10));
    assert_eq!(window_bounds(5, 30, 10), (0, 15));
    assert_eq!(window_bounds(20, 30, 10), (10, 30));
}

#[test]
fn test_window_bounds_properties() {
    for size_t in 1..25 {
        for peak in 0..size_t {
            for half in 0..12 {
                let (start, end) = window_bounds(peak, size_t, half);
                assert!(start <= peak);
                assert!(end <= size_t);
                assert!(end - start <= 2 * half);
                if half > 0 {
                    assert!(peak < end);
                }
            }
        }
    }
}

#[test]
fn test_extract_window_frames_follow_window() {
    let mut series = Array3::<f32>::zeros((12, 12, 10));
    for t in 0..10 {
        series[[4, 4, t]] = t as f32;
    }
    series[[5, 5, 6]] = 50.0;
    let window = extract_window(&series, 3, &RoiBounds::around(5.0, 5.0, 6, 12, 12), 2);

    assert_eq!(window.roi_id, 3);
    assert_eq!(window.peak_time, 6);
    assert_eq!((window.time_start, window.time_end), (4, 8));
    let times: Vec<usize> = window.frames.iter().map(|f| f.time_index).collect();
    assert_eq!(times, vec![4, 5, 6, 7]);
    assert!(window.frames.iter().all(|f| f.pixels.dim() == (6, 6)));
}

#[test]
fn test_extract_windows_follows_record_order() {
    let series = Array3::<f32>::from_shape_fn((20, 20, 6), |(r, c, t)| (r + c + t) as f32);
    let table = (0..6)
        .fold(ResultTable::builder(Vec::new()), |b, i| {
            b.with(RoiBounds::around(3.0 + i as f64 * 2.0, 10.0, 4, 20, 20))
        })
        .build();
    let windows = extract_windows(&series, table.records(), 1);
    let ids: Vec<usize> = windows.iter().map(|w| w.roi_id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    assert!(windows.iter().all(|w| w.peak_time == 5));
}
