pub mod config;
mod detect;
mod orchestrator;
mod types;

pub use detect::{detect_candidates, Detection};
pub use orchestrator::{run_pipeline, run_pipeline_reported, run_with_loader};
pub use types::{PipelineOutput, PipelineReport, PipelineStage, ProgressReporter, SkippedFrame};
