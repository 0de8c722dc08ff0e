use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::{Array2, Array3, Axis};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::dedup::deduplicate;
use crate::projection::Projections;
use crate::roi::Centroid;
use crate::segment::{segment_frame, FilterPolicy, SegmentationConfig};
use crate::temporal::consolidate;

use super::types::{PipelineStage, ProgressReporter, SkippedFrame};

/// Candidate positions found in one volume.
#[derive(Clone, Debug, Default)]
pub struct Detection {
    /// Surviving candidates in detection order.
    pub centroids: Vec<Centroid>,
    /// Candidates before deduplication.
    pub candidates: usize,
    pub skipped_frames: Vec<SkippedFrame>,
}

/// Locate candidate cells according to the configured filter policy.
///
/// Segmentation failures never abort detection: the failing frame is
/// recorded in `skipped_frames` and treated as background.
pub fn detect_candidates(
    projections: &Projections,
    config: &SegmentationConfig,
    box_size: usize,
    reporter: &Arc<dyn ProgressReporter>,
) -> Detection {
    match config.filter_policy {
        FilterPolicy::Simple => detect_in_projection(&projections.flat, config, box_size, reporter),
        FilterPolicy::ShapeAware => {
            detect_in_series(&projections.series, config, box_size, reporter)
        }
    }
}

fn detect_in_projection(
    flat: &Array2<f32>,
    config: &SegmentationConfig,
    box_size: usize,
    reporter: &Arc<dyn ProgressReporter>,
) -> Detection {
    reporter.begin_stage(PipelineStage::Segmenting, Some(1));
    let detection = match segment_frame(flat, config, box_size) {
        Ok(segmented) => {
            let centroids: Vec<Centroid> = segmented
                .regions
                .iter()
                .map(|r| Centroid {
                    row: r.centroid.0,
                    col: r.centroid.1,
                    time: 0.0,
                })
                .collect();
            Detection {
                candidates: centroids.len(),
                centroids,
                skipped_frames: Vec::new(),
            }
        }
        Err(e) => {
            warn!(error = %e, "Projection could not be segmented, treating as background");
            Detection {
                skipped_frames: vec![SkippedFrame {
                    time_index: None,
                    reason: e.to_string(),
                }],
                ..Default::default()
            }
        }
    };
    reporter.advance(1);
    reporter.finish_stage();
    detection
}

fn detect_in_series(
    series: &Array3<f32>,
    config: &SegmentationConfig,
    box_size: usize,
    reporter: &Arc<dyn ProgressReporter>,
) -> Detection {
    let (h, w, size_t) = series.dim();

    // Segment every time slice independently.
    reporter.begin_stage(PipelineStage::Segmenting, Some(size_t));
    let done = AtomicUsize::new(0);
    let segment_slice = |t: usize| {
        let slice = series.index_axis(Axis(2), t).to_owned();
        let result = segment_frame(&slice, config, box_size)
            .map(|s| s.labels)
            .map_err(|e| {
                warn!(time = t, error = %e, "Slice could not be segmented, treating as background");
                SkippedFrame {
                    time_index: Some(t),
                    reason: e.to_string(),
                }
            });
        reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
        result
    };
    let slices: Vec<_> = if size_t >= PARALLEL_FRAME_THRESHOLD {
        (0..size_t).into_par_iter().map(segment_slice).collect()
    } else {
        (0..size_t).map(segment_slice).collect()
    };
    reporter.finish_stage();

    let mut stack = Array3::<u32>::zeros((h, w, size_t));
    let mut skipped_frames = Vec::new();
    for (t, slice) in slices.into_iter().enumerate() {
        match slice {
            Ok(labels) => stack.index_axis_mut(Axis(2), t).assign(&labels),
            Err(skipped) => skipped_frames.push(skipped),
        }
    }

    // Merge slices into 3D components and drop transient ones.
    reporter.begin_stage(PipelineStage::Consolidating, None);
    let consolidated = consolidate(&stack, config.min_time_frames, config.connectivity);
    reporter.finish_stage();

    let centroids: Vec<Centroid> = consolidated
        .components
        .iter()
        .map(|c| c.centroid)
        .collect();
    let candidates = centroids.len();

    reporter.begin_stage(PipelineStage::Deduplicating, Some(candidates));
    let centroids = deduplicate(centroids, box_size as f64);
    reporter.finish_stage();

    info!(
        candidates,
        kept = centroids.len(),
        skipped = skipped_frames.len(),
        "Shape-aware detection complete"
    );

    Detection {
        centroids,
        candidates,
        skipped_frames,
    }
}
