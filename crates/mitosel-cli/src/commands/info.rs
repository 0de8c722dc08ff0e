use anyhow::{Context, Result};
use clap::Args;

use super::VolumeArgs;

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub volume: VolumeArgs,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let loader = args.volume.loader();
    let info = loader
        .read_info()
        .with_context(|| format!("Failed to read {}", args.volume.file.display()))?;

    println!("File:        {}", args.volume.file.display());
    println!("Pages:       {}", info.pages);
    println!("Dimensions:  {}x{}", info.size_x, info.size_y);
    println!("Depth:       {}", info.size_z);
    println!("Channels:    {}", info.size_c);
    println!("Time points: {}", info.size_t);
    println!("Samples:     {}", info.sample_type);
    match info.pixel_size_x {
        Some(size) => println!("Pixel size:  {:.4}", size),
        None => println!("Pixel size:  unknown"),
    }

    let voxels = info.size_x * info.size_y * info.size_z * info.size_t;
    let total_mb = (voxels * std::mem::size_of::<f32>()) as f64 / (1024.0 * 1024.0);
    println!("Channel size in memory: {:.1} MB", total_mb);

    Ok(())
}
