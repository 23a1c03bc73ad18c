#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::paginate::PaginateArgs;
use crate::commands::request::RequestArgs;
use crate::config::AppConfig;

/// Build, send and paginate OData-style REST requests
#[derive(Parser)]
#[command(name = "soa")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a request descriptor, or send it with --send
    Request(RequestArgs),
    /// Compute the pagination model of a result
    Paginate(PaginateArgs),
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Request(args) => args.run(&config.rest).await,
        Commands::Paginate(args) => args.run(&config.pagination),
        Commands::Config => commands::print_json(&config),
    }
}
