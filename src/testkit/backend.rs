//! In-memory storage backend with fault injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::domain::{ExposureWindow, PersistedResult, PersistedWindow, ResultId};
use crate::error::{Error, Result};
use crate::port::outbound::store::ResultStorageBackend;

#[derive(Debug, Default)]
struct Tables {
    results: Vec<PersistedResult>,
    windows: Vec<PersistedWindow>,
}

/// [`ResultStorageBackend`] over two vectors.
///
/// Each `fail_*` switch makes the matching operation return
/// [`Error::Database`] until switched off again.
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    changes: watch::Sender<u64>,
    fail_inserts: AtomicBool,
    fail_trims: AtomicBool,
    fail_window_inserts: AtomicBool,
    fail_orphan_deletes: AtomicBool,
    fail_reads: AtomicBool,
    fail_clears: AtomicBool,
    trim_calls: AtomicUsize,
    orphan_calls: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            tables: Mutex::new(Tables::default()),
            changes,
            fail_inserts: AtomicBool::new(false),
            fail_trims: AtomicBool::new(false),
            fail_window_inserts: AtomicBool::new(false),
            fail_orphan_deletes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            fail_clears: AtomicBool::new(false),
            trim_calls: AtomicUsize::new(0),
            orphan_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_trims(&self, fail: bool) {
        self.fail_trims.store(fail, Ordering::SeqCst);
    }

    pub fn fail_window_inserts(&self, fail: bool) {
        self.fail_window_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_orphan_deletes(&self, fail: bool) {
        self.fail_orphan_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_clears(&self, fail: bool) {
        self.fail_clears.store(fail, Ordering::SeqCst);
    }

    pub fn trim_calls(&self) -> usize {
        self.trim_calls.load(Ordering::SeqCst)
    }

    pub fn orphan_calls(&self) -> usize {
        self.orphan_calls.load(Ordering::SeqCst)
    }

    /// Stored result rows in insertion order.
    pub fn result_rows(&self) -> Vec<PersistedResult> {
        self.tables.lock().results.clone()
    }

    /// Stored window rows in insertion order.
    pub fn window_rows(&self) -> Vec<PersistedWindow> {
        self.tables.lock().windows.clone()
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Database(format!("injected {operation} failure")));
        }
        Ok(())
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

#[async_trait]
impl ResultStorageBackend for MemoryBackend {
    async fn insert_result(&self, result: &PersistedResult) -> Result<()> {
        Self::check(&self.fail_inserts, "insert")?;
        {
            let mut tables = self.tables.lock();
            if tables.results.iter().any(|r| r.id == result.id) {
                return Err(Error::Database(format!("duplicate id {}", result.id)));
            }
            tables.results.push(result.clone());
        }
        self.notify();
        Ok(())
    }

    async fn delete_oldest_beyond(&self, keep: usize) -> Result<usize> {
        self.trim_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_trims, "trim")?;
        let deleted = {
            let mut tables = self.tables.lock();
            let mut newest_first: Vec<_> = tables
                .results
                .iter()
                .map(|r| (r.calculated_at, r.id.clone()))
                .collect();
            newest_first.sort_by(|a, b| b.cmp(a));
            let stale: Vec<ResultId> = newest_first.into_iter().skip(keep).map(|(_, id)| id).collect();
            tables.results.retain(|r| !stale.contains(&r.id));
            stale.len()
        };
        if deleted > 0 {
            self.notify();
        }
        Ok(deleted)
    }

    async fn insert_window(&self, result_id: &ResultId, window: &ExposureWindow) -> Result<()> {
        Self::check(&self.fail_window_inserts, "window insert")?;
        self.tables.lock().windows.push(PersistedWindow {
            result_id: result_id.clone(),
            window: window.clone(),
        });
        self.notify();
        Ok(())
    }

    async fn delete_orphan_windows(&self) -> Result<usize> {
        self.orphan_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_orphan_deletes, "orphan delete")?;
        let deleted = {
            let mut tables = self.tables.lock();
            let Tables { results, windows } = &mut *tables;
            let before = windows.len();
            windows.retain(|w| results.iter().any(|r| r.id == w.result_id));
            before - windows.len()
        };
        if deleted > 0 {
            self.notify();
        }
        Ok(deleted)
    }

    async fn clear_all(&self) -> Result<()> {
        Self::check(&self.fail_clears, "clear")?;
        *self.tables.lock() = Tables::default();
        self.notify();
        Ok(())
    }

    async fn results(&self) -> Result<Vec<PersistedResult>> {
        Self::check(&self.fail_reads, "read")?;
        let mut results = self.tables.lock().results.clone();
        results.sort_by(|a, b| (a.calculated_at, &a.id).cmp(&(b.calculated_at, &b.id)));
        Ok(results)
    }

    async fn windows(&self) -> Result<Vec<PersistedWindow>> {
        Self::check(&self.fail_reads, "read")?;
        Ok(self.tables.lock().windows.clone())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
