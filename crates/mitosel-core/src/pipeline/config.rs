use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HALF_WINDOW_FRAMES, DEFAULT_NUCLEI_DIAMETER, DEFAULT_STAGES};
use crate::error::{MitoselError, Result};
use crate::segment::SegmentationConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Channel to project.
    #[serde(default)]
    pub channel: usize,
    /// Expected nuclei diameter in physical units.
    #[serde(default = "default_nuclei_diameter")]
    pub nuclei_diameter: f64,
    /// Frames kept on each side of the brightest frame.
    #[serde(default = "default_half_window_frames")]
    pub half_window_frames: usize,
    /// Mitotic stages offered for annotation, in column order.
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
}

fn default_nuclei_diameter() -> f64 {
    DEFAULT_NUCLEI_DIAMETER
}
fn default_half_window_frames() -> usize {
    DEFAULT_HALF_WINDOW_FRAMES
}
fn default_stages() -> Vec<String> {
    DEFAULT_STAGES.iter().map(|s| s.to_string()).collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            nuclei_diameter: DEFAULT_NUCLEI_DIAMETER,
            half_window_frames: DEFAULT_HALF_WINDOW_FRAMES,
            stages: default_stages(),
            segmentation: SegmentationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a comma-separated stage list, dropping empty entries.
    pub fn parse_stages(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.nuclei_diameter.is_finite() && self.nuclei_diameter > 0.0) {
            return Err(MitoselError::InvalidConfig(format!(
                "nuclei_diameter must be positive, got {}",
                self.nuclei_diameter
            )));
        }
        let ecc = self.segmentation.min_eccentricity;
        if !(0.0..1.0).contains(&ecc) {
            return Err(MitoselError::InvalidConfig(format!(
                "min_eccentricity must lie in [0, 1), got {ecc}"
            )));
        }
        for stage in &self.stages {
            if stage.trim().is_empty() || stage.trim() != stage {
                return Err(MitoselError::InvalidConfig(format!(
                    "stage name {stage:?} must be non-empty without surrounding whitespace"
                )));
            }
            if crate::consts::RESULT_COLUMNS.contains(&stage.as_str()) {
                return Err(MitoselError::InvalidConfig(format!(
                    "stage name {stage:?} collides with a fixed column"
                )));
            }
        }
        Ok(())
    }
}
