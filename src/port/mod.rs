//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (storage, the scoring engine, the task scheduler, etc.).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Scoring │            │   Storage   │              │ Scheduler │
//! │ Engine  │            │   Backend   │              │           │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;

pub use outbound::config::ConfigProvider;
pub use outbound::engine::ScoringEngine;
pub use outbound::legacy::LegacyResultMigrator;
pub use outbound::report::{ErrorReporter, Failure, FailureKind};
pub use outbound::scheduler::{TaskKind, TaskOutcome, TaskRequest, TaskScheduler};
pub use outbound::state::{RiskLevelData, RiskLevelState};
pub use outbound::store::ResultStorageBackend;
