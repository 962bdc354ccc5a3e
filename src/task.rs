// # Transfer Task
//
// Single-shot asynchronous unit of work. A task is resolved at most once by
// its producer and observed at most once by its consumer: both ends are
// consumed by the call that crosses them.

use crate::error::{TransferError, TransferOutcome};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Pending outcome of an asynchronous step such as a file pick
#[must_use = "a transfer task does nothing unless awaited or handed to a PickSession"]
pub struct TransferTask<T> {
    rx: oneshot::Receiver<TransferOutcome<T>>,
}

/// Producer side of a [`TransferTask`]
pub struct TaskResolver<T> {
    tx: oneshot::Sender<TransferOutcome<T>>,
}

impl<T> TaskResolver<T> {
    /// Deliver the terminal outcome.
    /// Returns false when nobody is interested in it any more.
    pub fn resolve(self, outcome: TransferOutcome<T>) -> bool {
        self.tx.send(outcome).is_ok()
    }

    /// True once the task side has been dropped
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<T> TransferTask<T> {
    /// Create a task together with the resolver that completes it
    pub fn channel() -> (TaskResolver<T>, TransferTask<T>) {
        let (tx, rx) = oneshot::channel();
        (TaskResolver { tx }, TransferTask { rx })
    }

    /// A task whose outcome is already known
    pub fn ready(outcome: TransferOutcome<T>) -> Self {
        let (resolver, task) = Self::channel();
        resolver.resolve(outcome);
        task
    }

    /// Take the outcome if it has arrived, otherwise get the task back.
    pub fn try_take(mut self) -> Result<TransferOutcome<T>, Self> {
        match self.rx.try_recv() {
            Ok(outcome) => Ok(outcome),
            Err(oneshot::error::TryRecvError::Closed) => Ok(Err(TransferError::Abandoned)),
            Err(oneshot::error::TryRecvError::Empty) => Err(self),
        }
    }
}

impl<T: Send + 'static> TransferTask<T> {
    /// Run `fut` on the current tokio runtime and deliver its output.
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = TransferOutcome<T>> + Send + 'static,
    {
        let (resolver, task) = Self::channel();
        tokio::spawn(async move {
            let outcome = fut.await;
            if !resolver.resolve(outcome) {
                tracing::debug!("Transfer task finished after its consumer went away");
            }
        });
        task
    }
}

impl<T> Future for TransferTask<T> {
    type Output = TransferOutcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(TransferError::Abandoned)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolved_outcome_is_delivered() {
        let (resolver, task) = TransferTask::<u32>::channel();
        assert!(resolver.resolve(Ok(7)));
        assert_eq!(task.await, Ok(7));
    }

    #[tokio::test]
    async fn test_dropped_resolver_is_abandoned() {
        let (resolver, task) = TransferTask::<u32>::channel();
        drop(resolver);
        assert_eq!(task.await, Err(TransferError::Abandoned));
    }

    #[test]
    fn test_try_take_pending_then_ready() {
        let (resolver, task) = TransferTask::<u32>::channel();

        let task = match task.try_take() {
            Err(task) => task,
            Ok(outcome) => panic!("expected pending task, got {:?}", outcome),
        };

        resolver.resolve(Err(TransferError::Cancelled));
        match task.try_take() {
            Ok(outcome) => assert_eq!(outcome, Err(TransferError::Cancelled)),
            Err(_) => panic!("expected resolved task"),
        }
    }

    #[test]
    fn test_resolve_after_task_dropped() {
        let (resolver, task) = TransferTask::<u32>::channel();
        drop(task);
        assert!(resolver.is_abandoned());
        assert!(!resolver.resolve(Ok(1)));
    }

    #[tokio::test]
    async fn test_spawned_future_outcome() {
        let task = TransferTask::spawn(async { Ok::<_, TransferError>("picked".to_string()) });
        assert_eq!(task.await.unwrap(), "picked");
    }

    #[tokio::test]
    async fn test_ready_task() {
        let task = TransferTask::<()>::ready(Err(TransferError::Cancelled));
        assert!(task.await.unwrap_err().is_cancelled());
    }
}
