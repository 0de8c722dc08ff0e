use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MitoselError, Result};

/// Object position in voxel coordinates of the depth-collapsed series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub row: f64,
    pub col: f64,
    pub time: f64,
}

impl Centroid {
    pub fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.row,
            1 => self.col,
            _ => self.time,
        }
    }

    pub fn distance(&self, other: &Centroid) -> f64 {
        ((self.row - other.row).powi(2)
            + (self.col - other.col).powi(2)
            + (self.time - other.time).powi(2))
        .sqrt()
    }
}

/// Convert a physical nuclei diameter into the side of the square ROI:
/// `2 * ceil(diameter / pixel_size)`.
pub fn box_size_from_diameter(diameter: f64, pixel_size_x: f64) -> Result<usize> {
    if !(diameter.is_finite() && diameter > 0.0) {
        return Err(MitoselError::InvalidConfig(format!(
            "nuclei diameter must be positive, got {diameter}"
        )));
    }
    if !(pixel_size_x.is_finite() && pixel_size_x > 0.0) {
        return Err(MitoselError::InvalidConfig(format!(
            "pixel size must be positive, got {pixel_size_x}"
        )));
    }
    let half = (diameter / pixel_size_x).ceil() as usize;
    half.checked_mul(2).ok_or_else(|| {
        MitoselError::InvalidConfig(format!(
            "box size overflows for diameter {diameter} at pixel size {pixel_size_x}"
        ))
    })
}

/// Pixel bounds of a square crop, `[row_min, row_max) x [col_min, col_max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiBounds {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl RoiBounds {
    /// Square of side `box_size` centered on `(row, col)`, clamped to the image.
    ///
    /// The box is shifted to start at 0 near the top/left edge and cut at
    /// `size_y`/`size_x` near the bottom/right edge, never re-centered.
    pub fn around(row: f64, col: f64, box_size: usize, size_y: usize, size_x: usize) -> Self {
        let half = box_size as f64 / 2.0;
        let row_min = (row - half).max(0.0);
        let col_min = (col - half).max(0.0);
        let row_max = (row_min + box_size as f64).min(size_y as f64);
        let col_max = (col_min + box_size as f64).min(size_x as f64);
        Self {
            row_min: row_min as usize,
            row_max: row_max as usize,
            col_min: col_min as usize,
            col_max: col_max as usize,
        }
    }

    pub fn height(&self) -> usize {
        self.row_max - self.row_min
    }

    pub fn width(&self) -> usize {
        self.col_max - self.col_min
    }
}

/// Annotation value for one mitotic stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StageValue {
    /// Frame at which the stage was observed.
    Frame(f64),
    /// The stage does not apply to this cell.
    NotApplicable,
}

/// One detected candidate cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiRecord {
    pub id: usize,
    pub bounds: RoiBounds,
    /// First frame of the peak window (inclusive), once extracted.
    pub time_start: Option<usize>,
    /// End of the peak window (exclusive), once extracted.
    pub time_end: Option<usize>,
    /// Stage annotations; absent stages are unset.
    pub stage_labels: BTreeMap<String, StageValue>,
}

impl RoiRecord {
    pub fn with_window(mut self, time_start: usize, time_end: usize) -> Self {
        self.time_start = Some(time_start);
        self.time_end = Some(time_end);
        self
    }
}

/// Ordered table of detected ROIs plus the stage columns they carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    stage_names: Vec<String>,
    records: Vec<RoiRecord>,
}

impl ResultTable {
    pub fn builder(stage_names: Vec<String>) -> ResultTableBuilder {
        ResultTableBuilder {
            table: ResultTable {
                stage_names,
                records: Vec::new(),
            },
        }
    }

    pub fn stage_names(&self) -> &[String] {
        &self.stage_names
    }

    pub fn records(&self) -> &[RoiRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&RoiRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Record a stage annotation for one ROI.
    pub fn annotate(mut self, id: usize, stage: &str, value: StageValue) -> Result<Self> {
        if !self.stage_names.iter().any(|s| s == stage) {
            return Err(MitoselError::UnknownStage(stage.to_string()));
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(MitoselError::UnknownRoi(id))?;
        record.stage_labels.insert(stage.to_string(), value);
        Ok(self)
    }

    /// Mark every stage of one ROI as not applicable.
    pub fn mark_no_mitosis(self, id: usize) -> Result<Self> {
        let stages = self.stage_names.clone();
        stages.iter().try_fold(self, |table, stage| {
            table.annotate(id, stage, StageValue::NotApplicable)
        })
    }
}

/// Append-only builder; ids are assigned sequentially from 0.
#[derive(Clone, Debug)]
pub struct ResultTableBuilder {
    table: ResultTable,
}

impl ResultTableBuilder {
    /// Append a freshly detected ROI and return its id.
    pub fn push(&mut self, bounds: RoiBounds) -> usize {
        let id = self.table.records.len();
        self.table.records.push(RoiRecord {
            id,
            bounds,
            time_start: None,
            time_end: None,
            stage_labels: BTreeMap::new(),
        });
        id
    }

    /// Append a complete record, as read back from storage.
    pub fn push_record(&mut self, record: RoiRecord) {
        self.table.records.push(record);
    }

    pub fn with(mut self, bounds: RoiBounds) -> Self {
        self.push(bounds);
        self
    }

    pub fn records(&self) -> &[RoiRecord] {
        &self.table.records
    }

    /// Apply a transformation to every record, e.g. to fill in peak windows.
    pub fn map_records<F>(mut self, f: F) -> Self
    where
        F: FnMut(RoiRecord) -> RoiRecord,
    {
        self.table.records = self.table.records.into_iter().map(f).collect();
        self
    }

    pub fn build(self) -> ResultTable {
        self.table
    }
}

/// Turn surviving centroids into clamped boxes, in detection order.
pub fn build_rois(
    centroids: &[Centroid],
    box_size: usize,
    size_y: usize,
    size_x: usize,
) -> Vec<RoiBounds> {
    centroids
        .iter()
        .map(|c| RoiBounds::around(c.row, c.col, box_size, size_y, size_x))
        .collect()
}
