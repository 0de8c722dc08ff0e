mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mitosel", about = "Mitotic cell ROI selection for time-lapse microscopy")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show hyperstack metadata
    Info(commands::info::InfoArgs),
    /// Detect candidate cells and export their peak windows
    Detect(commands::detect::DetectArgs),
    /// Write the depth and time max projection as PNG
    Project(commands::project::ProjectArgs),
    /// Record a mitotic stage for one cell of a results table
    Annotate(commands::annotate::AnnotateArgs),
    /// Print or save the default pipeline config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Project(args) => commands::project::run(args),
        Commands::Annotate(args) => commands::annotate::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
