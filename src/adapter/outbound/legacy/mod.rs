//! Readers for results persisted by older app versions.

pub mod snapshot;

pub use snapshot::{LegacySnapshot, NoLegacyResults, SnapshotMigrator};
