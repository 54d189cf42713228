//! Settings display and validation.

use serde_json::json;

use crate::adapter::inbound::cli::command::ConfigCommand;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Settings;

pub fn execute(command: &ConfigCommand, settings: &Settings) -> Result<()> {
    match command {
        ConfigCommand::Show => show(settings),
        ConfigCommand::Validate => validate(settings),
    }
}

fn show(settings: &Settings) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "settings": serde_json::to_value(settings)?,
        }));
        return Ok(());
    }

    output::lines(&settings.to_toml()?);
    Ok(())
}

fn validate(settings: &Settings) -> Result<()> {
    settings.validate()?;

    if output::is_json() {
        output::json_output(json!({ "command": "config.validate", "valid": true }));
        return Ok(());
    }

    output::success("Configuration is valid");
    output::field("Database", &settings.database);
    output::field("Stored result limit", settings.storage.stored_result_limit);
    Ok(())
}
