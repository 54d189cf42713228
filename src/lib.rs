//! Riskwarden - exposure-risk result storage and configuration-change monitoring.
//!
//! Persists the output of an external risk computation with bounded
//! retention, falls back to results migrated from an older schema when
//! nothing is stored, and watches the configuration stream to invalidate
//! stale risk state and resync the scoring engine's parameters.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Results, exposure windows, configuration values
//! - [`port`] - Traits for storage, scheduling, the scoring engine and friends
//! - [`application`] - `RiskResultStore` and `ConfigChangeMonitor`
//! - [`adapter`] - SQLite backend, legacy snapshot reader, channels, CLI
//! - [`infrastructure`] - Settings, logging and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use riskwarden::infrastructure::bootstrap::build_result_store;
//! use riskwarden::infrastructure::config::settings::Settings;
//!
//! # async fn run() -> riskwarden::error::Result<()> {
//! let settings = Settings::load("riskwarden.toml")?;
//! let store = build_result_store(&settings, tokio::runtime::Handle::current())?;
//! let latest = store.get_latest_results(2).await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
