//! Diagnostics sink for failures that are absorbed instead of returned.

use std::fmt;

/// Where in the pipeline a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Result insert failed; the result is lost.
    Persistence,
    /// Trim, window storage or orphan deletion failed; retried next cycle.
    Cleanup,
    /// Scoring engine rejected a parameter update.
    ExternalEngine,
    /// Anything else inside the config monitor's per-event handling.
    Pipeline,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Persistence => "persistence",
            Self::Cleanup => "cleanup",
            Self::ExternalEngine => "external_engine",
            Self::Pipeline => "pipeline",
        };
        f.write_str(name)
    }
}

/// One absorbed failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    /// Operation that failed, e.g. `"delete_oldest"`.
    pub operation: &'static str,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, operation: &'static str, error: impl fmt::Display) -> Self {
        Self {
            kind,
            operation,
            message: error.to_string(),
        }
    }
}

/// Receives failures the core converts into side effects.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, failure: Failure);
}
