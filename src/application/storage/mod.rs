//! Risk result storage orchestration.

mod store;
mod window;

pub use store::{RiskResultStore, StoreOutcome, LATEST_RESULTS_CAP};
pub use window::{DiscardWindows, ExposureWindowRetention, RetainWindows};
