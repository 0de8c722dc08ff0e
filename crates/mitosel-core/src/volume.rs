use ndarray::{Array4, ArrayD, Ix4};

use crate::error::{MitoselError, Result};

/// A single-channel time-lapse volume.
///
/// Intensities are stored as f32 without rescaling, indexed as
/// `(row, col, depth, time)`.
#[derive(Clone, Debug)]
pub struct Volume {
    /// Sample data, shape = (size_y, size_x, size_z, size_t)
    pub data: Array4<f32>,
    /// Physical size of one pixel along X (units per pixel)
    pub pixel_size_x: f64,
}

impl Volume {
    pub fn new(data: Array4<f32>, pixel_size_x: f64) -> Result<Self> {
        if !(pixel_size_x.is_finite() && pixel_size_x > 0.0) {
            return Err(MitoselError::InvalidConfig(format!(
                "pixel size must be positive, got {pixel_size_x}"
            )));
        }
        if data.shape().contains(&0) {
            return Err(MitoselError::InputShape {
                expected: "non-empty (rows, cols, depth, time)".into(),
                found: format!("{:?}", data.shape()),
            });
        }
        Ok(Self { data, pixel_size_x })
    }

    /// Build a volume from a dynamically shaped array, failing if it is not 4-D.
    pub fn from_dyn(data: ArrayD<f32>, pixel_size_x: f64) -> Result<Self> {
        let ndim = data.ndim();
        let data = data
            .into_dimensionality::<Ix4>()
            .map_err(|_| MitoselError::InputShape {
                expected: "4 axes (rows, cols, depth, time)".into(),
                found: format!("{ndim} axes"),
            })?;
        Self::new(data, pixel_size_x)
    }

    pub fn size_y(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn size_x(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn size_z(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn size_t(&self) -> usize {
        self.data.shape()[3]
    }
}

/// Header-level description of a volume on disk.
#[derive(Clone, Debug)]
pub struct VolumeInfo {
    pub size_x: usize,
    pub size_y: usize,
    pub size_z: usize,
    pub size_c: usize,
    pub size_t: usize,
    pub pages: usize,
    pub sample_type: String,
    pub pixel_size_x: Option<f64>,
}

/// Source of a volume. Local files and remote image servers both sit
/// behind this trait so the pipeline never knows where pixels came from.
pub trait VolumeLoader {
    /// Load the selected channel as a single-channel volume.
    fn load(&self, channel: usize) -> Result<Volume>;

    /// Identifier used to name exported artifacts.
    fn image_id(&self) -> String;
}
