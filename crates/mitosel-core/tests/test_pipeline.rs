mod common;

use std::sync::{Arc, Mutex};

use common::{volume_with_blocks, Block};
use mitosel_core::error::{MitoselError, Result};
use mitosel_core::pipeline::config::PipelineConfig;
use mitosel_core::pipeline::{
    run_pipeline, run_pipeline_reported, run_with_loader, PipelineStage, ProgressReporter,
};
use mitosel_core::roi::RoiBounds;
use mitosel_core::segment::FilterPolicy;
use mitosel_core::volume::{Volume, VolumeLoader};

fn simple_config(diameter: f64, half_window: usize) -> PipelineConfig {
    PipelineConfig {
        nuclei_diameter: diameter,
        half_window_frames: half_window,
        ..Default::default()
    }
}

fn single_cell_volume() -> Volume {
    volume_with_blocks(
        (50, 50, 5, 10),
        &[Block {
            rows: 20..25,
            cols: 20..25,
            depth: 1..4,
            time: 3..7,
            value: 100.0,
        }],
    )
}

// ---------------------------------------------------------------------------
// Simple policy
// ---------------------------------------------------------------------------

#[test]
fn test_single_cell_round_trip() {
    let volume = single_cell_volume();
    let config = simple_config(5.0, 5);
    let output = run_pipeline(&volume, "cells", &config).unwrap();

    assert_eq!(output.image_id, "cells");
    assert_eq!(output.config, config);
    assert_eq!(output.box_size, 10);
    assert_eq!(output.table.len(), 1);
    assert!(!output.report.empty);
    assert!(output.report.skipped_frames.is_empty());

    let record = &output.table.records()[0];
    assert_eq!(record.id, 0);
    assert_eq!(
        record.bounds,
        RoiBounds {
            row_min: 17,
            row_max: 27,
            col_min: 17,
            col_max: 27
        }
    );
    // Peak at the first bright frame (3), window [0, 8).
    assert_eq!(record.time_start, Some(0));
    assert_eq!(record.time_end, Some(8));
    assert!(record.time_start.unwrap() <= 3 && 6 < record.time_end.unwrap());

    assert_eq!(output.frames.len(), 8);
    assert!(output.frames.iter().all(|f| f.pixels.dim() == (10, 10)));
    let bright = output.frames.iter().find(|f| f.time_index == 4).unwrap();
    assert_eq!(bright.pixels[[5, 5]], 255);
    assert_eq!(bright.pixels[[0, 0]], 0);
    let dark = output.frames.iter().find(|f| f.time_index == 0).unwrap();
    assert!(dark.pixels.iter().all(|&v| v == 0), "uniform frame maps to zero");
}

#[test]
fn test_table_carries_configured_stages() {
    let config = PipelineConfig {
        stages: vec!["Early".into(), "Late".into()],
        ..simple_config(5.0, 2)
    };
    let output = run_pipeline(&single_cell_volume(), "cells", &config).unwrap();
    assert_eq!(output.table.stage_names(), ["Early", "Late"]);
    assert!(output.table.records()[0].stage_labels.is_empty());
}

#[test]
fn test_empty_volume_gives_empty_table() {
    let volume = volume_with_blocks((30, 30, 2, 4), &[]);
    let output = run_pipeline(&volume, "blank", &simple_config(5.0, 2)).unwrap();
    assert!(output.table.is_empty());
    assert!(output.report.empty);
    assert!(output.frames.is_empty());
    assert_eq!(output.report.skipped_frames.len(), 1);
    assert_eq!(output.report.skipped_frames[0].time_index, None);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = run_pipeline(&single_cell_volume(), "cells", &simple_config(-1.0, 2)).unwrap_err();
    assert!(matches!(err, MitoselError::InvalidConfig(_)));
}

#[test]
fn test_two_cells_get_two_rois() {
    let volume = volume_with_blocks(
        (60, 60, 1, 6),
        &[
            Block {
                rows: 10..15,
                cols: 10..15,
                depth: 0..1,
                time: 1..3,
                value: 80.0,
            },
            Block {
                rows: 40..45,
                cols: 35..40,
                depth: 0..1,
                time: 4..6,
                value: 80.0,
            },
        ],
    );
    let output = run_pipeline(&volume, "pair", &simple_config(5.0, 1)).unwrap();
    assert_eq!(output.table.len(), 2);
    let ids: Vec<usize> = output.table.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 1]);
    // Raster order of the projection: the upper cell first.
    assert_eq!(output.table.records()[0].bounds.row_min, 7);
    assert_eq!(output.table.records()[1].time_start, Some(3));
}

// ---------------------------------------------------------------------------
// Shape-aware policy
// ---------------------------------------------------------------------------

#[test]
fn test_shape_aware_keeps_persistent_elongated_cell() {
    let volume = volume_with_blocks(
        (50, 50, 2, 10),
        &[
            Block {
                rows: 10..13,
                cols: 10..18,
                depth: 0..2,
                time: 2..8,
                value: 100.0,
            },
            // Present in a single frame only.
            Block {
                rows: 35..38,
                cols: 30..38,
                depth: 0..1,
                time: 3..4,
                value: 100.0,
            },
        ],
    );
    let mut config = simple_config(10.0, 3);
    config.segmentation.filter_policy = FilterPolicy::ShapeAware;

    let output = run_pipeline(&volume, "shape", &config).unwrap();
    assert_eq!(output.box_size, 20);
    assert_eq!(output.report.candidates, 1);
    assert_eq!(output.table.len(), 1);
    assert_eq!(
        output.table.records()[0].bounds,
        RoiBounds {
            row_min: 1,
            row_max: 21,
            col_min: 3,
            col_max: 23
        }
    );

    let skipped: Vec<Option<usize>> = output
        .report
        .skipped_frames
        .iter()
        .map(|s| s.time_index)
        .collect();
    assert_eq!(skipped, vec![Some(0), Some(1), Some(8), Some(9)]);
}

// ---------------------------------------------------------------------------
// Loader & progress
// ---------------------------------------------------------------------------

struct InMemoryLoader(Volume);

impl VolumeLoader for InMemoryLoader {
    fn load(&self, channel: usize) -> Result<Volume> {
        if channel != 0 {
            return Err(MitoselError::InvalidConfig("one channel only".into()));
        }
        Ok(self.0.clone())
    }

    fn image_id(&self) -> String {
        "memory".into()
    }
}

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<PipelineStage>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }
}

#[test]
fn test_run_with_loader_reports_stages() {
    let loader = InMemoryLoader(single_cell_volume());
    let reporter = Arc::new(RecordingReporter::default());
    let output = run_with_loader(&loader, &simple_config(5.0, 5), reporter.clone()).unwrap();

    assert_eq!(output.image_id, "memory");
    assert_eq!(output.table.len(), 1);
    let stages = reporter.stages.lock().unwrap().clone();
    assert_eq!(
        stages,
        vec![
            PipelineStage::Loading,
            PipelineStage::Projecting,
            PipelineStage::Segmenting,
            PipelineStage::BuildingRois,
            PipelineStage::ExtractingWindows,
        ]
    );
}

#[test]
fn test_run_with_loader_propagates_load_errors() {
    let loader = InMemoryLoader(single_cell_volume());
    let config = PipelineConfig {
        channel: 2,
        ..simple_config(5.0, 5)
    };
    assert!(run_with_loader(&loader, &config, Arc::new(RecordingReporter::default())).is_err());
}

#[test]
fn test_shape_aware_reports_consolidation() {
    let mut config = simple_config(5.0, 2);
    config.segmentation.filter_policy = FilterPolicy::ShapeAware;
    let reporter = Arc::new(RecordingReporter::default());
    run_pipeline_reported(&single_cell_volume(), "cells", &config, reporter.clone()).unwrap();
    let stages = reporter.stages.lock().unwrap().clone();
    assert!(stages.contains(&PipelineStage::Consolidating));
    assert!(stages.contains(&PipelineStage::Deduplicating));
}
