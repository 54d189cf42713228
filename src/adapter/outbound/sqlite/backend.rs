//! SQLite result storage backend.
//!
//! Provides persistent storage for risk results and exposure windows using
//! SQLite and Diesel ORM. Every query runs on the runtime's blocking pool.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    ExposureWindowRow, NewExposureWindowRow, RiskResultRow,
};
use crate::adapter::outbound::sqlite::database::schema::{exposure_windows, risk_results};
use crate::domain::{ExposureWindow, PersistedResult, PersistedWindow, ResultId};
use crate::error::{Error, Result};
use crate::port::outbound::store::ResultStorageBackend;

/// SQLite-backed result storage.
///
/// Implements the [`ResultStorageBackend`] trait.
pub struct SqliteResultBackend {
    /// Database connection pool.
    pool: DbPool,
    /// Runtime whose blocking pool executes queries.
    runtime: Handle,
    /// Bumped after every successful mutation.
    changes: watch::Sender<u64>,
}

impl SqliteResultBackend {
    /// Create a backend over an already migrated pool.
    #[must_use]
    pub fn new(pool: DbPool, runtime: Handle) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            pool,
            runtime,
            changes,
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        self.runtime
            .spawn_blocking(move || {
                let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
                op(&mut conn)
            })
            .await?
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

#[async_trait]
impl ResultStorageBackend for SqliteResultBackend {
    async fn insert_result(&self, result: &PersistedResult) -> Result<()> {
        let row = RiskResultRow::from_persisted(result)?;
        self.run(move |conn| {
            diesel::insert_into(risk_results::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })
        .await?;
        self.notify();
        Ok(())
    }

    async fn delete_oldest_beyond(&self, keep: usize) -> Result<usize> {
        let deleted = self
            .run(move |conn| {
                let ids: Vec<String> = risk_results::table
                    .select(risk_results::id)
                    .order((risk_results::calculated_at.desc(), risk_results::id.desc()))
                    .load(conn)?;
                let stale: Vec<String> = ids.into_iter().skip(keep).collect();
                if stale.is_empty() {
                    return Ok(0);
                }
                let deleted =
                    diesel::delete(risk_results::table.filter(risk_results::id.eq_any(stale)))
                        .execute(conn)?;
                Ok(deleted)
            })
            .await?;

        if deleted > 0 {
            debug!(deleted, keep, "Trimmed risk results");
            self.notify();
        }
        Ok(deleted)
    }

    async fn insert_window(&self, result_id: &ResultId, window: &ExposureWindow) -> Result<()> {
        let row = NewExposureWindowRow::from_window(result_id, window)?;
        self.run(move |conn| {
            diesel::insert_into(exposure_windows::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })
        .await?;
        self.notify();
        Ok(())
    }

    async fn delete_orphan_windows(&self) -> Result<usize> {
        let deleted = self
            .run(|conn| {
                let deleted = diesel::sql_query(
                    "DELETE FROM exposure_windows WHERE risk_result_id NOT IN (SELECT id FROM risk_results)",
                )
                .execute(conn)?;
                Ok(deleted)
            })
            .await?;

        if deleted > 0 {
            debug!(deleted, "Deleted orphaned exposure windows");
            self.notify();
        }
        Ok(deleted)
    }

    async fn clear_all(&self) -> Result<()> {
        self.run(|conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(exposure_windows::table).execute(conn)?;
                diesel::delete(risk_results::table).execute(conn)?;
                Ok(())
            })?;
            Ok(())
        })
        .await?;
        self.notify();
        Ok(())
    }

    async fn results(&self) -> Result<Vec<PersistedResult>> {
        let rows = self
            .run(|conn| {
                let rows: Vec<RiskResultRow> = risk_results::table
                    .order((risk_results::calculated_at.asc(), risk_results::id.asc()))
                    .select(RiskResultRow::as_select())
                    .load(conn)?;
                Ok(rows)
            })
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                row.into_persisted()
                    .map_err(|e| warn!(id = %id, error = %e, "Skipping unreadable result row"))
                    .ok()
            })
            .collect())
    }

    async fn windows(&self) -> Result<Vec<PersistedWindow>> {
        let rows = self
            .run(|conn| {
                let rows: Vec<ExposureWindowRow> = exposure_windows::table
                    .order(exposure_windows::id.asc())
                    .select(ExposureWindowRow::as_select())
                    .load(conn)?;
                Ok(rows)
            })
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                row.into_persisted()
                    .map_err(|e| warn!(id, error = %e, "Skipping unreadable window row"))
                    .ok()
            })
            .collect())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
