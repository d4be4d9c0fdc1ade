//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod current;
pub mod places;
pub mod search;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Weather lookup by position or place name
#[derive(Parser)]
#[command(name = "weather-lookup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show current weather and forecast
    Current(current::CurrentArgs),

    /// Look up places by name
    Search(search::SearchArgs),

    /// Manage saved places
    Places(places::PlacesArgs),

    /// Start the weather proxy (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

impl Commands {
    /// Log level used when RUST_LOG is not set
    fn default_log_level(&self) -> &'static str {
        match self {
            Commands::Serve(_) => "info",
            _ => "warn",
        }
    }
}

/// Initialize logging to stderr; RUST_LOG takes precedence over `default_level`
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.default_log_level());

    match cli.command {
        Commands::Current(args) => current::run(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Places(args) => places::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_levels() {
        let serve = Cli::try_parse_from(["weather-lookup", "serve"]).unwrap();
        assert_eq!(serve.command.default_log_level(), "info");

        let current = Cli::try_parse_from(["weather-lookup", "current", "--here"]).unwrap();
        assert_eq!(current.command.default_log_level(), "warn");
    }
}
