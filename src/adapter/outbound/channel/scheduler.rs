//! Task queue handing requests to the host's task runner.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::port::outbound::scheduler::{TaskOutcome, TaskRequest, TaskScheduler};

/// A request waiting to be executed by the consumer side of a [`TaskQueue`].
#[derive(Debug)]
pub struct QueuedTask {
    pub request: TaskRequest,
    completion: Option<oneshot::Sender<TaskOutcome>>,
}

impl QueuedTask {
    /// Whether the submitter waits for [`complete`](Self::complete).
    #[must_use]
    pub fn is_awaited(&self) -> bool {
        self.completion.is_some()
    }

    /// Report the final state back to a blocking submitter.
    pub fn complete(self, outcome: TaskOutcome) {
        if let Some(completion) = self.completion {
            // Submitter gave up waiting.
            let _ = completion.send(outcome);
        }
    }
}

/// [`TaskScheduler`] over an unbounded mpsc channel.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<QueuedTask>,
}

impl TaskQueue {
    /// Create the queue and the receiver the task runner drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QueuedTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl TaskScheduler for TaskQueue {
    fn submit(&self, request: TaskRequest) {
        debug!(task = %request.kind, origin = %request.origin_tag, "Submitting task");
        let task = QueuedTask {
            request,
            completion: None,
        };
        if let Err(e) = self.tx.send(task) {
            warn!(task = %e.0.request.kind, "Task queue closed, dropping request");
        }
    }

    async fn submit_blocking(&self, request: TaskRequest) -> Result<TaskOutcome> {
        debug!(task = %request.kind, origin = %request.origin_tag, "Submitting task and waiting");
        let (completion, done) = oneshot::channel();
        self.tx
            .send(QueuedTask {
                request,
                completion: Some(completion),
            })
            .map_err(|_| Error::Scheduler("task queue closed".into()))?;
        done.await
            .map_err(|_| Error::Scheduler("task dropped before completion".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::scheduler::TaskKind;

    #[tokio::test]
    async fn submit_enqueues_without_waiting() {
        let (queue, mut rx) = TaskQueue::new();
        queue.submit(TaskRequest::new(TaskKind::RiskLevel, "test"));

        let task = rx.recv().await.unwrap();
        assert_eq!(task.request.kind, TaskKind::RiskLevel);
        assert!(!task.is_awaited());
    }

    #[tokio::test]
    async fn submit_blocking_waits_for_completion() {
        let (queue, mut rx) = TaskQueue::new();
        tokio::spawn(async move {
            let task = rx.recv().await.unwrap();
            task.complete(TaskOutcome::Failed("no network".into()));
        });

        let outcome = queue
            .submit_blocking(TaskRequest::new(TaskKind::RiskLevel, "test"))
            .await
            .unwrap();
        assert_eq!(outcome, TaskOutcome::Failed("no network".into()));
    }

    #[test]
    fn blocking_submit_stays_pending_until_completed() {
        let (queue, mut rx) = TaskQueue::new();
        let mut submit = tokio_test::task::spawn(
            queue.submit_blocking(TaskRequest::new(TaskKind::RiskLevel, "test")),
        );

        tokio_test::assert_pending!(submit.poll());
        let task = rx.try_recv().unwrap();
        assert!(task.is_awaited());
        tokio_test::assert_pending!(submit.poll());

        task.complete(TaskOutcome::Completed);
        assert!(submit.is_woken());
        let outcome = tokio_test::assert_ready_ok!(submit.poll());
        assert_eq!(outcome, TaskOutcome::Completed);
    }

    #[tokio::test]
    async fn dropped_task_is_a_scheduler_error() {
        let (queue, mut rx) = TaskQueue::new();
        tokio::spawn(async move {
            drop(rx.recv().await);
        });

        let result = queue
            .submit_blocking(TaskRequest::new(TaskKind::RiskLevel, "test"))
            .await;
        assert!(matches!(result, Err(Error::Scheduler(_))));
    }

    #[tokio::test]
    async fn closed_queue_rejects_blocking_submit() {
        let (queue, rx) = TaskQueue::new();
        drop(rx);

        queue.submit(TaskRequest::new(TaskKind::RiskLevel, "test"));
        let result = queue
            .submit_blocking(TaskRequest::new(TaskKind::RiskLevel, "test"))
            .await;
        assert!(matches!(result, Err(Error::Scheduler(_))));
    }
}
