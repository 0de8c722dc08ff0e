use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array4;
use num_traits::ToPrimitive;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::{ResolutionUnit, Tag};
use tiff::ColorType;
use tracing::{info, warn};

use crate::consts::{MICRONS_PER_CENTIMETER, MICRONS_PER_INCH};
use crate::error::{MitoselError, Result};
use crate::volume::{Volume, VolumeInfo, VolumeLoader};

/// Page layout of a multi-page TIFF hyperstack.
///
/// Pages are ordered channel-fastest, then depth, then time:
/// `page = (t * size_z + z) * size_c + c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackLayout {
    pub size_z: usize,
    pub size_c: usize,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            size_z: 1,
            size_c: 1,
        }
    }
}

/// Local-file volume source reading a multi-page grayscale TIFF.
#[derive(Clone, Debug)]
pub struct TiffStackLoader {
    path: PathBuf,
    layout: StackLayout,
    pixel_size_override: Option<f64>,
}

impl TiffStackLoader {
    pub fn new(path: impl Into<PathBuf>, layout: StackLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            pixel_size_override: None,
        }
    }

    /// Use this pixel size instead of the file's resolution tag.
    pub fn with_pixel_size(mut self, pixel_size_x: f64) -> Self {
        self.pixel_size_override = Some(pixel_size_x);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Decoder<BufReader<File>>> {
        let file = BufReader::new(File::open(&self.path)?);
        Ok(Decoder::new(file)?.with_limits(Limits::unlimited()))
    }

    /// Read page headers only: dimensions, page count, sample type, scale.
    pub fn read_info(&self) -> Result<VolumeInfo> {
        let mut decoder = self.open()?;
        let (width, height) = decoder.dimensions()?;
        let color = decoder.colortype()?;
        let pixel_size_x = read_pixel_size(&mut decoder)?;

        let mut pages = 1usize;
        while decoder.more_images() {
            decoder.next_image()?;
            pages += 1;
        }

        let size_t = self.frames_per_page_count(pages)?;
        Ok(VolumeInfo {
            size_x: width as usize,
            size_y: height as usize,
            size_z: self.layout.size_z,
            size_c: self.layout.size_c,
            size_t,
            pages,
            sample_type: format!("{color:?}"),
            pixel_size_x,
        })
    }

    fn frames_per_page_count(&self, pages: usize) -> Result<usize> {
        let per_time = self.layout.size_z * self.layout.size_c;
        if per_time == 0 || pages % per_time != 0 {
            return Err(MitoselError::InputShape {
                expected: format!("page count divisible by size_z * size_c = {per_time}"),
                found: format!("{pages} pages"),
            });
        }
        Ok(pages / per_time)
    }

    fn resolve_pixel_size(&self, from_file: Option<f64>) -> f64 {
        match (self.pixel_size_override, from_file) {
            (Some(size), _) => size,
            (None, Some(size)) => size,
            (None, None) => {
                warn!(
                    path = %self.path.display(),
                    "No pixel size in file or arguments, assuming 1.0 per pixel"
                );
                1.0
            }
        }
    }
}

impl VolumeLoader for TiffStackLoader {
    fn load(&self, channel: usize) -> Result<Volume> {
        let StackLayout { size_z, size_c } = self.layout;
        if channel >= size_c {
            return Err(MitoselError::InvalidConfig(format!(
                "channel {channel} out of range (file has {size_c})"
            )));
        }

        let mut decoder = self.open()?;
        let (width, height) = decoder.dimensions()?;
        let (w, h) = (width as usize, height as usize);
        let pixel_size_x = self.resolve_pixel_size(read_pixel_size(&mut decoder)?);

        let mut planes: Vec<Vec<f32>> = Vec::new();
        let mut page = 0usize;
        loop {
            if page % size_c == channel {
                match decoder.colortype()? {
                    ColorType::Gray(_) => {}
                    other => {
                        return Err(MitoselError::InputShape {
                            expected: "single-sample grayscale pages".into(),
                            found: format!("{other:?} at page {page}"),
                        })
                    }
                }
                if decoder.dimensions()? != (width, height) {
                    return Err(MitoselError::InputShape {
                        expected: format!("{width}x{height} pages"),
                        found: format!("page {page} with different size"),
                    });
                }
                planes.push(decode_samples(decoder.read_image()?)?);
            }
            page += 1;
            if !decoder.more_images() {
                break;
            }
            decoder.next_image()?;
        }

        let size_t = self.frames_per_page_count(page)?;
        let mut data = Array4::<f32>::zeros((h, w, size_z, size_t));
        for (index, plane) in planes.iter().enumerate() {
            let (t, z) = (index / size_z, index % size_z);
            for (i, &v) in plane.iter().enumerate().take(w * h) {
                data[[i / w, i % w, z, t]] = v;
            }
        }

        info!(
            path = %self.path.display(),
            size_x = w,
            size_y = h,
            size_z,
            size_t,
            channel,
            pixel_size_x,
            "Loaded TIFF hyperstack"
        );
        Volume::new(data, pixel_size_x)
    }

    fn image_id(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}

/// Pixel size in micrometres from the XResolution and ResolutionUnit tags.
///
/// Centimetre and inch resolutions are converted to micrometres. Unit-less
/// resolutions are taken as already in micrometres, which is how ImageJ
/// stores calibrated stacks. A missing unit tag means inches.
fn read_pixel_size(decoder: &mut Decoder<BufReader<File>>) -> Result<Option<f64>> {
    let Some(value) = decoder.find_tag(Tag::XResolution)? else {
        return Ok(None);
    };
    let (num, den) = match value.into_u32_vec()?.as_slice() {
        [num, den] if *num > 0 && *den > 0 => (*num as f64, *den as f64),
        _ => return Ok(None),
    };

    let unit = match decoder.find_tag(Tag::ResolutionUnit)? {
        Some(value) => ResolutionUnit::from_u16(value.into_u16()?),
        None => Some(ResolutionUnit::Inch),
    };
    let microns_per_unit = match unit {
        Some(ResolutionUnit::None) => 1.0,
        Some(ResolutionUnit::Inch) => MICRONS_PER_INCH,
        Some(ResolutionUnit::Centimeter) => MICRONS_PER_CENTIMETER,
        _ => {
            warn!("Unrecognized TIFF resolution unit, ignoring resolution tag");
            return Ok(None);
        }
    };
    Ok(Some(den * microns_per_unit / num))
}

fn decode_samples(result: DecodingResult) -> Result<Vec<f32>> {
    fn convert<T: ToPrimitive>(buf: &[T]) -> Vec<f32> {
        buf.iter().map(|v| v.to_f32().unwrap_or(0.0)).collect()
    }

    match result {
        DecodingResult::U8(buf) => Ok(convert(&buf)),
        DecodingResult::U16(buf) => Ok(convert(&buf)),
        DecodingResult::U32(buf) => Ok(convert(&buf)),
        DecodingResult::F32(buf) => Ok(buf),
        DecodingResult::F64(buf) => Ok(convert(&buf)),
        _ => Err(MitoselError::InputShape {
            expected: "u8, u16, u32, f32 or f64 samples".into(),
            found: "unsupported sample format".into(),
        }),
    }
}
