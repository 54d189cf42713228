//! Task scheduler that only records.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::port::outbound::scheduler::{TaskOutcome, TaskRequest, TaskScheduler};

/// Records every request; blocking submissions complete immediately.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    requests: Mutex<Vec<TaskRequest>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<TaskRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TaskScheduler for RecordingScheduler {
    fn submit(&self, request: TaskRequest) {
        self.requests.lock().push(request);
    }

    async fn submit_blocking(&self, request: TaskRequest) -> Result<TaskOutcome> {
        self.requests.lock().push(request);
        Ok(TaskOutcome::Completed)
    }
}
