//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - the operator CLI driving the application
//! - [`outbound`] - SQLite storage, legacy migration, channels, in-memory state

pub mod inbound;
pub mod outbound;
