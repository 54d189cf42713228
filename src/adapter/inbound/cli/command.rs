//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and maintain stored exposure-risk results
#[derive(Parser, Debug)]
#[command(name = "riskwarden")]
#[command(version)]
pub struct Cli {
    /// Settings file [default: ~/.riskwarden/config.toml when present]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database, overriding the settings file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the riskwarden CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every stored risk level result
    Results,

    /// Show the two most recent results
    Latest,

    /// Summarize the latest and latest successful calculation
    Info,

    /// Print the aggregated risk result of the newest calculation
    Aggregated,

    /// List stored exposure windows
    Windows,

    /// Store a JSON-encoded risk level result through a full store cycle
    Store(StoreArgs),

    /// Delete all stored results and exposure windows
    Clear,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `riskwarden store`.
#[derive(clap::Args, Debug)]
pub struct StoreArgs {
    /// File holding one risk level result as JSON
    pub file: PathBuf,
}

/// Subcommands for `riskwarden config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective settings with defaults applied
    Show,
    /// Validate the settings
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["riskwarden", "results", "--json", "--db", "x.db"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(matches!(cli.command, Commands::Results));
    }

    #[test]
    fn store_requires_a_file() {
        assert!(Cli::try_parse_from(["riskwarden", "store"]).is_err());
    }
}
