//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`backend`] - `MemoryBackend`, a [`ResultStorageBackend`](crate::port::ResultStorageBackend)
//!   with fault injection.
//! - [`db`] - `TempDb`, a migrated SQLite file removed on drop.
//! - [`domain`] - Builders for results, windows and mappings.
//! - [`engine`] - `FakeScoringEngine` recording mapping pushes.
//! - [`legacy`] - `StaticMigrator` returning a fixed legacy set.
//! - [`report`] - `RecordingReporter` collecting absorbed failures.
//! - [`scheduler`] - `RecordingScheduler` collecting task requests.

use std::time::{Duration, Instant};

pub mod backend;
pub mod db;
pub mod domain;
pub mod engine;
pub mod legacy;
pub mod report;
pub mod scheduler;

/// Poll `condition` until it holds, panicking after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not met within 2s");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
