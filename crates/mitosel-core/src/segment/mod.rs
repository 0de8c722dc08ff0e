pub mod components;
pub mod config;
pub mod frame;
pub mod median;
pub mod morphology;
pub mod threshold;

pub use components::RegionProps;
pub use config::{Connectivity, FilterPolicy, SegmentationConfig, ThresholdMethod};
pub use frame::{segment_frame, SegmentedFrame};
