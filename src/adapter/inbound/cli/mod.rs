//! Operator CLI.
//!
//! Settings come from `--config`, else `~/.riskwarden/config.toml` when it
//! exists, else defaults. `--db` overrides the database path last.

pub mod command;
pub mod config;
pub mod maintenance;
pub mod output;
pub mod paths;
pub mod results;

use tokio::runtime::Handle;

use self::command::{Cli, Commands};
use self::output::OutputConfig;
use crate::application::storage::RiskResultStore;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_result_store;
use crate::infrastructure::config::settings::Settings;

/// Resolve settings for this invocation.
///
/// # Errors
/// Returns an error if the settings file cannot be loaded or is invalid.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = cli
        .config
        .clone()
        .or_else(|| Some(paths::default_config()).filter(|p| p.exists()));

    let mut settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::from_env()?,
    };
    if let Some(db) = &cli.db {
        settings.database = db.to_string_lossy().into_owned();
    }
    Ok(settings)
}

fn open_store(settings: &Settings) -> Result<RiskResultStore> {
    build_result_store(settings, Handle::current())
}

/// Run one CLI invocation. Must be called inside a tokio runtime.
///
/// # Errors
/// Returns an error if settings cannot be loaded, the database cannot be
/// opened, or the command fails.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));
    let settings = load_settings(&cli)?;
    settings.init_logging();

    match cli.command {
        Commands::Config(command) => config::execute(&command, &settings),
        Commands::Results => results::list(&open_store(&settings)?).await,
        Commands::Latest => results::latest(&open_store(&settings)?).await,
        Commands::Info => results::info(&open_store(&settings)?).await,
        Commands::Aggregated => results::aggregated(&open_store(&settings)?).await,
        Commands::Windows => results::windows(&open_store(&settings)?).await,
        Commands::Store(args) => maintenance::store(&open_store(&settings)?, &args.file).await,
        Commands::Clear => maintenance::clear(&open_store(&settings)?).await,
    }
}
