use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat};
use ndarray::Array2;

use crate::error::{MitoselError, Result};
use crate::peak::{contrast_stretch, RoiFrame};

/// Directory holding every artifact of one image.
pub fn image_dir_name(image_id: &str) -> String {
    format!("Image_{image_id}")
}

/// File name of one ROI frame, e.g. `Cell0003Time0017.png`.
pub fn frame_file_name(roi_id: usize, time_index: usize) -> String {
    format!("Cell{roi_id:04}Time{time_index:04}.png")
}

/// Convert an 8-bit array into an image buffer.
pub fn to_gray_image(pixels: &Array2<u8>) -> Result<GrayImage> {
    let (h, w) = pixels.dim();
    let raw: Vec<u8> = pixels.iter().copied().collect();
    GrayImage::from_raw(w as u32, h as u32, raw).ok_or_else(|| MitoselError::InputShape {
        expected: format!("{w}x{h} pixel buffer"),
        found: "buffer of a different length".into(),
    })
}

/// Save one ROI frame as 8-bit grayscale PNG inside `dir`.
pub fn save_roi_frame(frame: &RoiFrame, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(frame_file_name(frame.roi_id, frame.time_index));
    to_gray_image(&frame.pixels)?.save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}

/// Save a 2D intensity map as a contrast-stretched 8-bit PNG.
pub fn save_projection_png(map: &Array2<f32>, path: &Path) -> Result<()> {
    let stretched = contrast_stretch(map.view());
    to_gray_image(&stretched)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
