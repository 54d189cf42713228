//! In-memory adapters.

pub mod state;

pub use state::InMemoryRiskState;
