use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use mitosel_core::io::results::{read_results_csv, write_results_csv};
use mitosel_core::roi::StageValue;
use tracing::info;

#[derive(Args)]
pub struct AnnotateArgs {
    /// Results table written by `detect`
    pub table: PathBuf,

    /// Cell id to annotate
    #[arg(long)]
    pub cell: usize,

    /// Stage column to set
    #[arg(long, requires = "frame", conflicts_with = "no_mitosis")]
    pub stage: Option<String>,

    /// Frame at which the stage was observed
    #[arg(long)]
    pub frame: Option<f64>,

    /// Mark every stage of the cell as not applicable
    #[arg(long)]
    pub no_mitosis: bool,
}

pub fn run(args: &AnnotateArgs) -> Result<()> {
    let table = read_results_csv(&args.table)
        .with_context(|| format!("Failed to read {}", args.table.display()))?;

    info!(
        table = %args.table.display(),
        rois = table.len(),
        cell = args.cell,
        "Annotating results table"
    );
    let table = match (&args.stage, args.frame, args.no_mitosis) {
        (_, _, true) => table.mark_no_mitosis(args.cell)?,
        (Some(stage), Some(frame), false) => {
            table.annotate(args.cell, stage, StageValue::Frame(frame))?
        }
        _ => bail!("Pass either --stage with --frame, or --no-mitosis"),
    };

    write_results_csv(&table, &args.table)
        .with_context(|| format!("Failed to write {}", args.table.display()))?;
    println!("Cell {} updated in {}", args.cell, args.table.display());
    Ok(())
}
