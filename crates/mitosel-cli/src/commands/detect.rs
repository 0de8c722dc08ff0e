use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use mitosel_core::io::export_output;
use mitosel_core::pipeline::config::PipelineConfig;
use mitosel_core::pipeline::run_with_loader;
use mitosel_core::segment::FilterPolicy;
use mitosel_core::volume::VolumeLoader;

use crate::progress::BarReporter;
use crate::summary::{print_config_summary, print_run_summary};

use super::VolumeArgs;

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Simple,
    ShapeAware,
}

impl From<PolicyArg> for FilterPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Simple => FilterPolicy::Simple,
            PolicyArg::ShapeAware => FilterPolicy::ShapeAware,
        }
    }
}

#[derive(Args)]
pub struct DetectArgs {
    #[command(flatten)]
    pub volume: VolumeArgs,

    /// Pipeline config file (TOML); command-line values override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Channel to analyse
    #[arg(long)]
    pub channel: Option<usize>,

    /// Nuclei diameter in physical units
    #[arg(long)]
    pub diameter: Option<f64>,

    /// Frames kept on each side of the brightest frame
    #[arg(long)]
    pub half_window: Option<usize>,

    /// Candidate filtering policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Comma-separated mitotic stages to annotate
    #[arg(long)]
    pub stages: Option<String>,

    /// Denoise with a 3x3 median filter before thresholding
    #[arg(long)]
    pub median: bool,

    /// Output root directory
    #[arg(short, long, default_value = "tmp")]
    pub output: PathBuf,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let config = build_config(args)?;
    let loader = args.volume.loader();

    print_config_summary(&config, &loader.image_id(), &args.output);

    let reporter = Arc::new(BarReporter::new());
    let output = run_with_loader(&loader, &config, reporter.clone())
        .with_context(|| format!("Pipeline failed on {}", args.volume.file.display()))?;
    reporter.clear();

    let dir = export_output(&output, &args.output)
        .with_context(|| format!("Failed to export into {}", args.output.display()))?;

    print_run_summary(&output, &dir);
    Ok(())
}

fn build_config(args: &DetectArgs) -> Result<PipelineConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        PipelineConfig::default()
    };

    if let Some(channel) = args.channel {
        config.channel = channel;
    }
    if let Some(diameter) = args.diameter {
        config.nuclei_diameter = diameter;
    }
    if let Some(half) = args.half_window {
        config.half_window_frames = half;
    }
    if let Some(policy) = args.policy {
        config.segmentation.filter_policy = policy.into();
    }
    if let Some(ref stages) = args.stages {
        config.stages = PipelineConfig::parse_stages(stages);
    }
    if args.median {
        config.segmentation.median_filter = true;
    }

    config.validate().context("Invalid pipeline config")?;
    Ok(config)
}
