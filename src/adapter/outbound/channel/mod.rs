//! Channel-backed adapters: configuration fan-out and the task queue.

pub mod config;
pub mod scheduler;

pub use config::ConfigBroadcast;
pub use scheduler::{QueuedTask, TaskQueue};
