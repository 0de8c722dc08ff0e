use ndarray::Array2;
use tracing::debug;

use crate::error::Result;

use super::components::{clear_border, label_components, region_props, RegionProps};
use super::config::SegmentationConfig;
use super::median::median_filter;
use super::morphology::morphological_closing;
use super::threshold::compute_threshold;

/// Filtered label image of one frame.
#[derive(Clone, Debug)]
pub struct SegmentedFrame {
    /// Label image; rejected regions are already reset to 0.
    pub labels: Array2<u32>,
    /// Regions that passed the filter, in label order.
    pub regions: Vec<RegionProps>,
    /// Threshold the frame was binarized at.
    pub threshold: f32,
}

/// Segment bright candidate objects in a single 2D frame.
///
/// Pipeline: optional median -> threshold -> binarize -> closing ->
/// clear border -> label -> shape descriptors -> filter.
///
/// Fails with a segmentation error when no threshold exists (flat frame).
pub fn segment_frame(
    data: &Array2<f32>,
    config: &SegmentationConfig,
    box_size: usize,
) -> Result<SegmentedFrame> {
    // Step 1: Optional median denoise.
    let denoised;
    let source = if config.median_filter {
        denoised = median_filter(data);
        &denoised
    } else {
        data
    };

    // Step 2: Global threshold.
    let threshold = compute_threshold(source, config.threshold_method)?;

    // Step 3: Binarize.
    let mask = source.mapv(|v| v > threshold);

    // Step 4: Close small gaps.
    let closed = morphological_closing(&mask);

    // Step 5: Drop border-touching components.
    let cleared = clear_border(&closed, config.connectivity);

    // Step 6-7: Label and describe.
    let (mut labels, count) = label_components(&cleared, config.connectivity);
    let all_regions = region_props(&labels, count);

    // Step 8: Filter, relabeling rejects to background in place.
    let mut keep = vec![false; count as usize + 1];
    let mut regions = Vec::with_capacity(all_regions.len());
    for region in all_regions {
        if config.accepts(&region, box_size) {
            keep[region.label as usize] = true;
            regions.push(region);
        }
    }
    labels.mapv_inplace(|lbl| if keep[lbl as usize] { lbl } else { 0 });

    debug!(
        threshold,
        components = count,
        kept = regions.len(),
        "Segmented frame"
    );

    Ok(SegmentedFrame {
        labels,
        regions,
        threshold,
    })
}
