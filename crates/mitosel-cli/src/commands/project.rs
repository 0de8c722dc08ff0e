use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mitosel_core::io::image_io::save_projection_png;
use mitosel_core::projection::project;
use mitosel_core::volume::VolumeLoader;

use super::VolumeArgs;

#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub volume: VolumeArgs,

    /// Channel to project
    #[arg(long, default_value = "0")]
    pub channel: usize,

    /// Output PNG path
    #[arg(short, long, default_value = "projection.png")]
    pub output: PathBuf,
}

pub fn run(args: &ProjectArgs) -> Result<()> {
    let volume = args
        .volume
        .loader()
        .load(args.channel)
        .with_context(|| format!("Failed to load {}", args.volume.file.display()))?;

    let projections = project(&volume);
    save_projection_png(&projections.flat, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Projection saved to {}", args.output.display());
    Ok(())
}
