use anyhow::Context;
use canopy_structure::{load_config, run};
use clap::Parser;
use std::path::PathBuf;

/// Renders a canopy-structure synthesis figure from precomputed rasters,
/// profile archives and a survey coordinate table.
#[derive(Debug, Parser)]
#[command(name = "canopy-structure", version, about)]
struct Args {
    /// Run configuration (JSON).
    config: PathBuf,

    /// Override the figure output path from the configuration.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = load_config(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if let Some(output) = args.output {
        cfg.output.figure_out = output;
    }

    run(&cfg).context("figure synthesis failed")?;
    Ok(())
}
