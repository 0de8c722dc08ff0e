use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;

use crate::consts::{RESULTS_FILE_NAME, SETTINGS_FILE_NAME};
use crate::error::Result;
use crate::pipeline::PipelineOutput;

use super::image_io::{image_dir_name, save_roi_frame};
use super::results::write_results_csv;

/// Write the result table, the run settings and every ROI frame under
/// `root/Image_<id>/`.
///
/// Returns the image directory.
pub fn export_output(output: &PipelineOutput, root: &Path) -> Result<PathBuf> {
    let dir = root.join(image_dir_name(&output.image_id));
    std::fs::create_dir_all(&dir)?;

    write_results_csv(&output.table, &dir.join(RESULTS_FILE_NAME))?;
    std::fs::write(
        dir.join(SETTINGS_FILE_NAME),
        toml::to_string_pretty(&output.config)?,
    )?;
    output
        .frames
        .par_iter()
        .map(|frame| save_roi_frame(frame, &dir).map(|_| ()))
        .collect::<Result<()>>()?;

    info!(
        dir = %dir.display(),
        rois = output.table.len(),
        frames = output.frames.len(),
        "Exported results"
    );
    Ok(dir)
}
