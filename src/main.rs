// Entry point of the Blogger auto-poster.
//
// **Architecture Overview:**
// - `core/` = Business logic (token lifecycle, post history, content, publishing)
// - `infra/` = Implementations of core traits (Gemini, Google OAuth, Blogger, JSON files)
// - `cli/` = Subcommands that wire core and infra together
//
// This file's job is to:
// 1. Parse arguments
// 2. Load configuration and set up logging
// 3. Dispatch to the chosen subcommand

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "cli/cli_layer.rs"]
mod cli;
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Load environment variables from .env (or --env-file) if present
    match &cli.env_file {
        Some(path) => {
            if let Err(e) = dotenv::from_path(path) {
                eprintln!("❌ Could not load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(cli).await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}
