use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod output;
mod parser;
mod prompt;
mod provider;
mod runner;
mod units;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Progress is logged at info; --verbose adds per-reviewer detail
    let filter = if cli.verbose {
        EnvFilter::new("spikecurate=debug")
    } else {
        EnvFilter::new("spikecurate=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
