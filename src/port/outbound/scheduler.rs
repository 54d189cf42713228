//! Background task scheduling port.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kinds of background work this crate can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Recompute the exposure risk level.
    RiskLevel,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RiskLevel => f.write_str("RiskLevelTask"),
        }
    }
}

/// Request handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub kind: TaskKind,
    pub arguments: Option<serde_json::Value>,
    /// Diagnostic label naming who asked for the task.
    pub origin_tag: String,
}

impl TaskRequest {
    /// Create a request without arguments.
    pub fn new(kind: TaskKind, origin_tag: impl Into<String>) -> Self {
        Self {
            kind,
            arguments: None,
            origin_tag: origin_tag.into(),
        }
    }

    /// Attach task arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: serde_json::Value) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

/// Final state of a task awaited through [`TaskScheduler::submit_blocking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Failed(String),
}

/// Executes background tasks. Owned by the host application.
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Enqueue a task without waiting for it.
    fn submit(&self, request: TaskRequest);

    /// Enqueue a task and wait until it finishes.
    async fn submit_blocking(&self, request: TaskRequest) -> Result<TaskOutcome>;
}
