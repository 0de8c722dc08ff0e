use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::peak::extract_windows;
use crate::projection::project;
use crate::roi::{box_size_from_diameter, build_rois, ResultTable};
use crate::volume::{Volume, VolumeLoader};

use super::config::PipelineConfig;
use super::detect::detect_candidates;
use super::types::{NoOpReporter, PipelineOutput, PipelineReport, PipelineStage, ProgressReporter};

/// Run ROI detection and peak-window extraction on a loaded volume.
pub fn run_pipeline(
    volume: &Volume,
    image_id: &str,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    run_pipeline_reported(volume, image_id, config, Arc::new(NoOpReporter))
}

/// Run the full processing pipeline with a thread-safe progress reporter.
pub fn run_pipeline_reported(
    volume: &Volume,
    image_id: &str,
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    config.validate()?;
    let box_size = box_size_from_diameter(config.nuclei_diameter, volume.pixel_size_x)?;
    info!(
        image_id,
        size_x = volume.size_x(),
        size_y = volume.size_y(),
        size_z = volume.size_z(),
        size_t = volume.size_t(),
        box_size,
        policy = %config.segmentation.filter_policy,
        "Detecting ROIs"
    );

    // Projection
    reporter.begin_stage(PipelineStage::Projecting, None);
    let projections = project(volume);
    reporter.finish_stage();

    // Detection
    let detection = detect_candidates(&projections, &config.segmentation, box_size, &reporter);

    // ROIs
    reporter.begin_stage(PipelineStage::BuildingRois, Some(detection.centroids.len()));
    let builder = build_rois(
        &detection.centroids,
        box_size,
        volume.size_y(),
        volume.size_x(),
    )
    .into_iter()
    .fold(ResultTable::builder(config.stages.clone()), |b, bounds| b.with(bounds));
    reporter.finish_stage();

    // Peak windows
    reporter.begin_stage(PipelineStage::ExtractingWindows, Some(builder.records().len()));
    let windows = extract_windows(
        &projections.series,
        builder.records(),
        config.half_window_frames,
    );
    let table = builder
        .map_records(|record| match windows.get(record.id) {
            Some(w) if w.roi_id == record.id => record.with_window(w.time_start, w.time_end),
            _ => record,
        })
        .build();
    let frames: Vec<_> = windows.into_iter().flat_map(|w| w.frames).collect();
    reporter.finish_stage();

    if table.is_empty() {
        warn!(image_id, "No candidate survived filtering, result table is empty");
    } else {
        info!(rois = table.len(), frames = frames.len(), "ROI extraction complete");
    }

    Ok(PipelineOutput {
        image_id: image_id.to_string(),
        box_size,
        config: config.clone(),
        report: PipelineReport {
            skipped_frames: detection.skipped_frames,
            candidates: detection.candidates,
            empty: table.is_empty(),
        },
        table,
        frames,
    })
}

/// Load a volume once from `loader`, then run the pipeline on it.
pub fn run_with_loader(
    loader: &dyn VolumeLoader,
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    reporter.begin_stage(PipelineStage::Loading, None);
    let volume = loader.load(config.channel)?;
    reporter.finish_stage();
    run_pipeline_reported(&volume, &loader.image_id(), config, reporter)
}
