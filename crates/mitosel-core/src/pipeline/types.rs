use crate::peak::RoiFrame;
use crate::pipeline::config::PipelineConfig;
use crate::roi::ResultTable;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Projecting,
    Segmenting,
    Consolidating,
    Deduplicating,
    BuildingRois,
    ExtractingWindows,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading volume"),
            Self::Projecting => write!(f, "Projecting"),
            Self::Segmenting => write!(f, "Segmenting"),
            Self::Consolidating => write!(f, "Consolidating in time"),
            Self::Deduplicating => write!(f, "Removing duplicates"),
            Self::BuildingRois => write!(f, "Building ROIs"),
            Self::ExtractingWindows => write!(f, "Extracting peak windows"),
        }
    }
}

/// A frame whose segmentation failed and was treated as background.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedFrame {
    /// Time index, or `None` for the single flat projection.
    pub time_index: Option<usize>,
    pub reason: String,
}

/// Non-fatal diagnostics of one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineReport {
    pub skipped_frames: Vec<SkippedFrame>,
    /// Candidates before deduplication.
    pub candidates: usize,
    /// No ROI survived; the table is empty.
    pub empty: bool,
}

/// Everything one run produces.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub image_id: String,
    pub box_size: usize,
    pub table: ResultTable,
    pub frames: Vec<RoiFrame>,
    pub report: PipelineReport,
    /// Configuration the run used, exported next to the results.
    pub config: PipelineConfig,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
