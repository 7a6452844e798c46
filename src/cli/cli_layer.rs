// CLI layer - argument parsing and one module per subcommand.

#[path = "commands/command_catalog.rs"]
pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blogger-autopost")]
#[command(about = "Generate AI-written posts and publish them to Blogger", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an article and publish it
    Publish(PublishArgs),
    /// Obtain an OAuth token for the Blogger API
    Authorize(AuthorizeArgs),
    /// Show the stored OAuth token, optionally refreshing it
    Token(TokenArgs),
    /// Check Drive/notes sync credentials and write a sync log
    Sync,
}

#[derive(Args, Debug, Default)]
pub struct PublishArgs {
    /// Use this topic instead of a generated one
    #[arg(long)]
    pub topic: Option<String>,

    /// Comma-separated labels, replacing the article's tags
    #[arg(long)]
    pub labels: Option<String>,

    /// Scheduled mode: respect the daily post limit
    #[arg(long)]
    pub auto: bool,
}

#[derive(Args, Debug, Default)]
pub struct AuthorizeArgs {
    /// Exchange this authorization code directly instead of running the local server
    #[arg(long, conflicts_with = "print_url")]
    pub code: Option<String>,

    /// Only print the consent URL
    #[arg(long)]
    pub print_url: bool,
}

#[derive(Args, Debug, Default)]
pub struct TokenArgs {
    /// Renew the access token with the stored refresh token
    #[arg(long)]
    pub refresh: bool,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Publish(args) => commands::publish::run(args).await,
        Command::Authorize(args) => commands::authorize::run(args).await,
        Command::Token(args) => commands::token::run(args).await,
        Command::Sync => commands::sync::run().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_publish_flags() {
        let cli = Cli::parse_from([
            "blogger-autopost",
            "publish",
            "--auto",
            "--labels",
            "AI, Tips",
            "-v",
        ]);

        assert!(cli.verbose);
        let Command::Publish(args) = cli.command else {
            panic!("expected publish");
        };
        assert!(args.auto);
        assert_eq!(args.labels.as_deref(), Some("AI, Tips"));
        assert!(args.topic.is_none());
    }

    #[test]
    fn code_and_print_url_conflict() {
        let result = Cli::try_parse_from([
            "blogger-autopost",
            "authorize",
            "--code",
            "4/0Ab",
            "--print-url",
        ]);
        assert!(result.is_err());
    }
}
