//! Outbound adapters (driven side).

pub mod channel;
pub mod legacy;
pub mod memory;
pub mod report;
pub mod sqlite;
