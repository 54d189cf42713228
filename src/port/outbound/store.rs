//! Persistence port for risk results and their exposure windows.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{ExposureWindow, PersistedResult, PersistedWindow, ResultId};
use crate::error::Result;

/// Durable tables backing the result store.
///
/// Each operation is atomic on its own; nothing spans a multi-step store
/// cycle. Every successful mutation bumps the [`changes`](Self::changes)
/// counter so readers can re-query.
#[async_trait]
pub trait ResultStorageBackend: Send + Sync {
    /// Insert a result row.
    async fn insert_result(&self, result: &PersistedResult) -> Result<()>;

    /// Delete every result except the `keep` newest by `calculated_at`.
    /// Returns count deleted.
    async fn delete_oldest_beyond(&self, keep: usize) -> Result<usize>;

    /// Insert one exposure window tied to `result_id`.
    async fn insert_window(&self, result_id: &ResultId, window: &ExposureWindow) -> Result<()>;

    /// Delete window rows whose parent result no longer exists. Returns count deleted.
    async fn delete_orphan_windows(&self) -> Result<usize>;

    /// Empty both tables in one transaction.
    async fn clear_all(&self) -> Result<()>;

    /// All result rows, oldest first.
    async fn results(&self) -> Result<Vec<PersistedResult>>;

    /// All window rows in insertion order.
    async fn windows(&self) -> Result<Vec<PersistedWindow>>;

    /// Change counter; the value increases after every successful mutation.
    fn changes(&self) -> watch::Receiver<u64>;
}
