use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MIN_AREA, DEFAULT_MIN_ECCENTRICITY, DEFAULT_MIN_TIME_FRAMES, SIMPLE_POLICY_MIN_AREA,
};

use super::components::RegionProps;

/// Method used to separate bright nuclei from the background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdMethod {
    /// Yen's method: maximizes the entropic correlation between classes.
    #[default]
    Yen,
    /// Otsu's method: maximizes between-class variance.
    Otsu,
}

impl std::fmt::Display for ThresholdMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yen => write!(f, "Yen"),
            Self::Otsu => write!(f, "Otsu"),
        }
    }
}

/// Pixel adjacency used when grouping foreground into components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Edge neighbours only (4 in 2D, 6 in 3D).
    Four,
    /// Edge and corner neighbours (8 in 2D, 26 in 3D).
    #[default]
    Eight,
}

/// Which candidates survive segmentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterPolicy {
    /// Segment the single time-and-depth projection, keep regions with
    /// at least [`SIMPLE_POLICY_MIN_AREA`] pixels.
    #[default]
    Simple,
    /// Segment every time slice, filter on area, eccentricity and major
    /// axis, then require temporal persistence.
    ShapeAware,
}

impl std::fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "Simple"),
            Self::ShapeAware => write!(f, "Shape-aware"),
        }
    }
}

/// Configuration for segmenting one 2D frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default)]
    pub filter_policy: FilterPolicy,
    #[serde(default)]
    pub threshold_method: ThresholdMethod,
    /// Apply a 3x3 median filter before thresholding.
    #[serde(default)]
    pub median_filter: bool,
    #[serde(default)]
    pub connectivity: Connectivity,
    /// Shape-aware policy: area must exceed this many pixels.
    #[serde(default = "default_min_area")]
    pub min_area: usize,
    /// Shape-aware policy: eccentricity must exceed this value.
    #[serde(default = "default_min_eccentricity")]
    pub min_eccentricity: f64,
    /// Shape-aware policy: a 3D component must span more than this many frames.
    #[serde(default = "default_min_time_frames")]
    pub min_time_frames: usize,
}

fn default_min_area() -> usize {
    DEFAULT_MIN_AREA
}
fn default_min_eccentricity() -> f64 {
    DEFAULT_MIN_ECCENTRICITY
}
fn default_min_time_frames() -> usize {
    DEFAULT_MIN_TIME_FRAMES
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            filter_policy: FilterPolicy::default(),
            threshold_method: ThresholdMethod::default(),
            median_filter: false,
            connectivity: Connectivity::default(),
            min_area: DEFAULT_MIN_AREA,
            min_eccentricity: DEFAULT_MIN_ECCENTRICITY,
            min_time_frames: DEFAULT_MIN_TIME_FRAMES,
        }
    }
}

impl SegmentationConfig {
    /// Filtering predicate applied to every labeled region.
    pub fn accepts(&self, region: &RegionProps, box_size: usize) -> bool {
        match self.filter_policy {
            FilterPolicy::Simple => region.area >= SIMPLE_POLICY_MIN_AREA,
            FilterPolicy::ShapeAware => {
                region.area > self.min_area
                    && region.eccentricity > self.min_eccentricity
                    && region.major_axis_length < box_size as f64
            }
        }
    }
}
