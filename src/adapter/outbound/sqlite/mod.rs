//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed result storage backend using Diesel ORM.

pub mod backend;
pub mod database;

pub use backend::SqliteResultBackend;
