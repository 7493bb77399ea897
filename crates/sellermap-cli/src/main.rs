mod cache;
mod fetch;
mod handoff;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cache::CacheCommands;

#[derive(Debug, Parser)]
#[command(name = "sellermap")]
#[command(about = "Fetch, normalize, and cache seller listings for the map renderer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every enabled query profile and write the hand-off document
    Fetch {
        /// Only fetch this category (must be enabled in the queries file)
        #[arg(long)]
        category: Option<String>,
        /// Ignore cached results and re-fetch from the API
        #[arg(long)]
        refresh: bool,
        /// Override the output path for the hand-off document
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Inspect or clear the response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Fetch {
            category,
            refresh,
            output,
        }) => {
            let config = sellermap_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            fetch::run_fetch(&config, category.as_deref(), refresh, output).await?;
        }
        Some(Commands::Cache { command }) => {
            // Cache maintenance works without API credentials.
            let config = sellermap_core::load_cache_config();
            init_tracing(&config.log_level)?;
            match command {
                CacheCommands::List => cache::run_cache_list(&config),
                CacheCommands::Clear => cache::run_cache_clear(&config)?,
            }
        }
        None => println!("sellermap: run `sellermap fetch` or `sellermap --help`"),
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
