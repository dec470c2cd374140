//! `barstock` binary.
//!
//! Reads `barstock.toml` (or the path given with `--config`) plus any
//! `BARSTOCK_*` environment variables, runs the pipeline once, and logs a
//! summary. Per-file and per-drink failures are reported, not fatal.

use std::path::PathBuf;

use anyhow::Context as _;
use barstock_etl::{Pipeline, PipelineConfig, RunOptions};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Bar stock ETL and procurement reports")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "barstock.toml")]
  config: PathBuf,

  /// Do not query the cocktail catalogue for missing glass types.
  #[arg(long)]
  skip_enrichment: bool,

  /// Do not write the spreadsheets.
  #[arg(long)]
  skip_reports: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let config = PipelineConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let pipeline = Pipeline::from_config(config)
    .context("failed to build cocktail catalogue client")?
    .with_options(RunOptions {
      skip_enrichment: cli.skip_enrichment,
      skip_reports:    cli.skip_reports,
    });

  pipeline.run().await.log();

  Ok(())
}
