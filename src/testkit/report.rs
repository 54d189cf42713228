//! Failure collector.

use parking_lot::Mutex;

use crate::port::outbound::report::{ErrorReporter, Failure, FailureKind};

/// Keeps every reported failure in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<Failure>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<Failure> {
        self.failures.lock().clone()
    }

    pub fn kinds(&self) -> Vec<FailureKind> {
        self.failures.lock().iter().map(|f| f.kind).collect()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, failure: Failure) {
        self.failures.lock().push(failure);
    }
}
