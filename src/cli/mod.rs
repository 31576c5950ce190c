pub mod run;
pub mod schema;

use crate::config::Modality;
use crate::units::UnitId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spikecurate")]
#[command(
    author,
    version,
    about = "Ensemble vision-language curation of spike-sorted units"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify units and write the curation table
    Run(RunArgs),

    /// Print JSON Schema for config validation
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, default_value = "spikecurate.yaml")]
    pub config: PathBuf,

    /// Override max units in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override output directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Override model name
    #[arg(long, env = "SPIKECURATE_MODEL")]
    pub model: Option<String>,

    /// Plot types to send (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub modalities: Option<Vec<Modality>>,

    /// Classify specific units only (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub units: Option<Vec<UnitId>>,

    /// Show plan without calling the model
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Print the model response schema instead of the config schema
    #[arg(long)]
    pub response: bool,
}
