//! Read-only views over stored results and exposure windows.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::storage::{RiskResultStore, LATEST_RESULTS_CAP};
use crate::domain::{latest_or_initial, RiskLevelResult};
use crate::error::Result;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Calculated At")]
    calculated_at: String,
    #[tabled(rename = "Risk Level")]
    risk_level: String,
    #[tabled(rename = "Matched Keys")]
    matched_keys: u32,
    #[tabled(rename = "Days Since Exposure")]
    days_since_last_exposure: u32,
    #[tabled(rename = "Aggregated")]
    aggregated: &'static str,
}

impl ResultRow {
    fn from_result(result: &RiskLevelResult) -> Self {
        Self {
            calculated_at: result.calculated_at().format("%Y-%m-%d %H:%M:%S").to_string(),
            risk_level: result.risk_level().to_string(),
            matched_keys: result.matched_key_count(),
            days_since_last_exposure: result.days_since_last_exposure(),
            aggregated: if result.aggregated_risk_result().is_some() {
                "yes"
            } else {
                "no"
            },
        }
    }
}

fn print_results(command: &str, title: &str, results: &[RiskLevelResult]) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "results": results,
        }));
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(title);
    if results.is_empty() {
        output::note("No risk level results stored");
        return;
    }
    let rows: Vec<ResultRow> = results.iter().map(ResultRow::from_result).collect();
    output::lines(&Table::new(rows).to_string());
}

/// List every stored result, oldest first.
pub async fn list(store: &RiskResultStore) -> Result<()> {
    let results = store.current_risk_level_results().await;
    print_results("results", "Risk level results", &results);
    Ok(())
}

/// Show the most recent results.
pub async fn latest(store: &RiskResultStore) -> Result<()> {
    let results = store.get_latest_results(LATEST_RESULTS_CAP).await;
    print_results("latest", "Latest results", &results);
    Ok(())
}

/// Summarize the latest and the latest successful calculation.
pub async fn info(store: &RiskResultStore) -> Result<()> {
    let latest = store.latest_results().await;

    if output::is_json() {
        output::json_output(json!({
            "command": "info",
            "latest": latest.latest,
            "latest_successful": latest.latest_successful,
        }));
        return Ok(());
    }

    let last = &latest.latest;
    let successful = &latest.latest_successful;

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Latest calculation");
    output::field(
        "Risk level",
        output::risk_level(
            last.risk_level(),
            last.is_increased_risk(),
            last.risk_level().is_successful(),
        ),
    );
    output::field("Calculated at", last.calculated_at().to_rfc3339());
    output::field("Matched keys", last.matched_key_count());
    output::field("Days since exposure", last.days_since_last_exposure());

    output::section("Latest successful calculation");
    output::field(
        "Risk level",
        output::risk_level(successful.risk_level(), successful.is_increased_risk(), true),
    );
    output::field("Calculated at", successful.calculated_at().to_rfc3339());
    Ok(())
}

/// Print the aggregated breakdown of the newest result.
pub async fn aggregated(store: &RiskResultStore) -> Result<()> {
    let last = latest_or_initial(&store.current_risk_level_results().await);
    let aggregated = last.aggregated_risk_result();

    if output::is_json() {
        output::json_output(json!({
            "command": "aggregated",
            "calculated_at": last.calculated_at(),
            "aggregated_risk_result": aggregated,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    match aggregated {
        Some(aggregated) => {
            output::section("Aggregated risk result");
            output::lines(&aggregated.to_string());
        }
        None => output::note("Aggregated risk result is not available"),
    }
    Ok(())
}

/// List stored exposure windows.
pub async fn windows(store: &RiskResultStore) -> Result<()> {
    let windows = store.current_exposure_windows().await;

    if output::is_json() {
        output::json_output(json!({
            "command": "windows",
            "count": windows.len(),
            "windows": windows,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(&format!("Retrieved {} Exposure Windows", windows.len()));
    for window in &windows {
        output::lines(&window.to_string());
    }
    Ok(())
}
