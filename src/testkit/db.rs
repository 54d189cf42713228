//! Temporary SQLite databases.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations, DbPool};

/// Migrated SQLite file under the system temp dir, removed on drop.
pub struct TempDb {
    path: PathBuf,
    pool: DbPool,
}

impl TempDb {
    /// Create and migrate a fresh database. Panics on failure.
    pub fn create(name: &str) -> Self {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        path.push(format!("riskwarden-{name}-{}-{nanos}.db", std::process::id()));

        let pool = create_pool(&path.to_string_lossy()).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");

        Self { path, pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
