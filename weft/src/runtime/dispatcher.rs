use crate::error::Error;
use crate::promise::{Deferred, Promise};
use crate::runtime::task::{JoinHandle, Task};

use std::future::Future;
use std::sync::Arc;

/// A scheduling target for coroutines.
///
/// Every execution context of the runtime (the parallel pool and each
/// serial context) exposes itself through this trait. A coroutine keeps
/// an `Arc<dyn Schedule>` pointing at the context it was launched on
/// and every resume goes through it, which guarantees that a
/// coroutine never migrates to a different context across a
/// suspend/resume boundary.
pub(crate) trait Schedule: Send + Sync {
    /// Enqueues a runnable coroutine for execution on this context.
    ///
    /// After shutdown the task is silently dropped.
    fn schedule(&self, task: Arc<dyn super::task::Runnable>);
}

/// A handle to an execution context.
///
/// A `Dispatcher` is obtained from [`Runtime::dispatcher`] (the
/// parallel worker pool) or [`Runtime::serial`] (a single-threaded
/// serial context). It is cheap to clone and may be used from any
/// thread, inside or outside the runtime.
///
/// [`Runtime::dispatcher`]: crate::Runtime::dispatcher
/// [`Runtime::serial`]: crate::Runtime::serial
#[derive(Clone)]
pub struct Dispatcher {
    /// Scheduler of the underlying execution context.
    pub(crate) scheduler: Arc<dyn Schedule>,
}

impl Dispatcher {
    /// Launches a coroutine on this execution context.
    ///
    /// The body runs until completion or until its first await point;
    /// every resume happens on this same context. An `Err` returned by
    /// the body marks the coroutine failed; it does not crash the
    /// process, and it is not retried.
    ///
    /// The returned [`JoinHandle`] resolves to the body's `Result`.
    /// Dropping the handle detaches the coroutine; it still runs to
    /// completion.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let handle = dispatcher.launch(async {
    ///     let value = some_deferred.await?;
    ///     Ok(value * 2)
    /// });
    /// ```
    pub fn launch<F, T>(&self, body: F) -> JoinHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let task = Arc::new(Task::new(body, self.scheduler.clone()));
        self.scheduler.schedule(task.clone());

        JoinHandle { task }
    }

    /// Launches a coroutine and returns a [`Deferred`] settled with its
    /// result.
    ///
    /// The coroutine starts eagerly; the deferred can be awaited later,
    /// from any context, by any number of observers. Launching several
    /// coroutines this way and awaiting their deferreds in sequence
    /// takes the `max` of their completion times, not the sum.
    pub fn launch_deferred<F, T>(&self, body: F) -> Deferred<T>
    where
        T: Clone + Send + 'static,
        F: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let (promise, deferred) = Promise::new();

        let _detached = self.launch(async move {
            promise.settle(body.await);
            Ok(())
        });

        deferred
    }
}
