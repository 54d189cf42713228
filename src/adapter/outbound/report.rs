//! Diagnostics reporter writing absorbed failures to the tracing log.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::error;

use crate::port::outbound::report::{ErrorReporter, Failure};

/// Logs each failure as a structured `error!` event.
#[derive(Debug, Default)]
pub struct TracingReporter {
    reported: AtomicU64,
}

impl TracingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failures reported so far.
    #[must_use]
    pub fn reported(&self) -> u64 {
        self.reported.load(Ordering::Relaxed)
    }
}

impl ErrorReporter for TracingReporter {
    fn report(&self, failure: Failure) {
        self.reported.fetch_add(1, Ordering::Relaxed);
        error!(
            kind = %failure.kind,
            operation = failure.operation,
            message = %failure.message,
            "Reported failure"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::report::FailureKind;

    #[test]
    fn counts_reported_failures() {
        let reporter = TracingReporter::new();
        reporter.report(Failure::new(FailureKind::Cleanup, "delete_oldest", "locked"));
        reporter.report(Failure::new(FailureKind::Pipeline, "config_change_checks", "boom"));
        assert_eq!(reporter.reported(), 2);
    }
}
