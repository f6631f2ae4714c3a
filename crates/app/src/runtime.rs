//! Bridge between a synchronous UI thread and the async managers.
//!
//! The UI thread never awaits. It hands futures to [`BackgroundRuntime`]
//! and later polls or waits on the returned [`TaskHandle`], or lets a
//! callback receive the result on a worker thread.

use std::future::Future;

use sgbooks_shared::AppError;
use thiserror::Error;
use tokio::{
    runtime::{Builder, Runtime},
    sync::oneshot,
};

/// Errors surfaced by the runtime bridge.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The runtime could not be started.
    #[error("Failed to start background runtime: {0}")]
    Startup(#[from] std::io::Error),

    /// The task panicked or the runtime shut down before it finished.
    #[error("Background task did not complete")]
    Cancelled,

    /// The result was already taken from the handle.
    #[error("Task result was already taken")]
    AlreadyTaken,
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A multi-threaded tokio runtime owned by the application.
#[derive(Debug)]
pub struct BackgroundRuntime {
    runtime: Runtime,
}

impl BackgroundRuntime {
    /// Starts a runtime with one worker per core.
    pub fn new() -> Result<Self, TaskError> {
        Self::build(None)
    }

    /// Starts a runtime with a fixed number of workers.
    pub fn with_workers(workers: usize) -> Result<Self, TaskError> {
        Self::build(Some(workers.max(1)))
    }

    fn build(workers: Option<usize>) -> Result<Self, TaskError> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name("sgbooks-worker");
        if let Some(workers) = workers {
            builder.worker_threads(workers);
        }
        let runtime = builder.build()?;
        tracing::debug!(?workers, "Background runtime started");
        Ok(Self { runtime })
    }

    /// Runs `future` in the background; the result is collected through the handle.
    pub fn schedule<F, T>(&self, future: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        self.runtime.spawn(async move {
            // The receiver may have been dropped; the result is then discarded.
            let _ = sender.send(future.await);
        });
        TaskHandle {
            receiver: Some(receiver),
        }
    }

    /// Runs `future` in the background and passes its result to `callback`.
    ///
    /// The callback runs on a worker thread, so UI code must marshal the
    /// value back to its own thread.
    pub fn schedule_with_callback<F, T, C>(&self, future: F, callback: C)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        self.runtime.spawn(async move {
            callback(future.await);
        });
    }

    /// Blocks the calling thread until `future` completes.
    ///
    /// Must not be called from inside the runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// The pending result of a scheduled task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Option<oneshot::Receiver<T>>,
}

impl<T> TaskHandle<T> {
    /// Takes the result if the task has finished, without blocking.
    ///
    /// Returns `None` while the task is still running.
    pub fn try_take(&mut self) -> Option<Result<T, TaskError>> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Some(Err(TaskError::AlreadyTaken));
        };
        match receiver.try_recv() {
            Ok(value) => {
                self.receiver = None;
                Some(Ok(value))
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                Some(Err(TaskError::Cancelled))
            }
        }
    }

    /// Blocks until the task finishes.
    ///
    /// Must be called from a thread outside the runtime.
    pub fn wait(mut self) -> Result<T, TaskError> {
        let receiver = self.receiver.take().ok_or(TaskError::AlreadyTaken)?;
        receiver.blocking_recv().map_err(|_| TaskError::Cancelled)
    }
}
