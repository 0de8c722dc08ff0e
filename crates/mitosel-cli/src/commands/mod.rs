pub mod annotate;
pub mod config;
pub mod detect;
pub mod info;
pub mod project;

use std::path::PathBuf;

use clap::Args;
use mitosel_core::io::{StackLayout, TiffStackLoader};

/// Arguments locating and interpreting a TIFF hyperstack.
#[derive(Args)]
pub struct VolumeArgs {
    /// Input multi-page TIFF
    pub file: PathBuf,

    /// Depth slices per time point
    #[arg(long, default_value = "1")]
    pub size_z: usize,

    /// Channels interleaved per depth slice
    #[arg(long, default_value = "1")]
    pub size_c: usize,

    /// Physical pixel size along X (overrides the file's resolution tag)
    #[arg(long)]
    pub pixel_size: Option<f64>,
}

impl VolumeArgs {
    pub fn loader(&self) -> TiffStackLoader {
        let loader = TiffStackLoader::new(
            &self.file,
            StackLayout {
                size_z: self.size_z,
                size_c: self.size_c,
            },
        );
        match self.pixel_size {
            Some(size) => loader.with_pixel_size(size),
            None => loader,
        }
    }
}
