//! Commands that change stored results.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::storage::{RiskResultStore, StoreOutcome};
use crate::domain::RiskLevelResult;
use crate::error::{Error, Result};

/// Store a JSON-encoded result read from `file`.
pub async fn store(store: &RiskResultStore, file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let result: RiskLevelResult = serde_json::from_str(&content)?;

    let outcome = store.store_result(&result).await;
    let StoreOutcome::Stored {
        id,
        trimmed,
        windows_stored,
        orphans_deleted,
    } = &outcome
    else {
        return Err(Error::Database("result was not stored".into()));
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "store",
            "id": id,
            "trimmed": trimmed,
            "windows_stored": windows_stored,
            "orphans_deleted": orphans_deleted,
            "clean": outcome.is_clean(),
        }));
        return Ok(());
    }

    output::success(&format!("Stored result {id}"));
    if let Some(trimmed) = trimmed.filter(|n| *n > 0) {
        output::field("Trimmed", trimmed);
    }
    if !outcome.is_clean() {
        output::warning("Result stored, but cleanup did not complete");
    }
    Ok(())
}

/// Delete all stored results and windows.
pub async fn clear(store: &RiskResultStore) -> Result<()> {
    if !store.clear().await {
        return Err(Error::Database("failed to clear stored results".into()));
    }

    if output::is_json() {
        output::json_output(json!({ "command": "clear", "cleared": true }));
    } else {
        output::success("Cleared stored results and exposure windows");
    }
    Ok(())
}
