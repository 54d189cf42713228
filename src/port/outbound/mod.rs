//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as result
//! storage, legacy migration, scheduling, the scoring engine, configuration
//! and diagnostics reporting.

pub mod config;
pub mod engine;
pub mod legacy;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod store;
