use std::future::Future;
use std::sync::Mutex;
use std::sync::mpsc;

use super::dispatcher::Dispatcher;
use super::executor::core::Executor;
use super::executor::serial::SerialExecutor;
use crate::timer::{Command, Driver, TimerHandle};

use tracing::debug;

/// The main runtime handle.
///
/// `Runtime` owns the process-wide scheduler state:
/// - the parallel execution context (worker pool),
/// - every serial execution context created through [`serial`](Self::serial),
/// - the timer driver that resumes timed suspensions.
///
/// It provides a synchronous entry point via [`block_on`](Self::block_on).
/// Dropping the runtime shuts down all internal components in an
/// orderly fashion.
pub struct Runtime {
    /// The parallel pool.
    executor: Executor,

    /// Serial contexts, in creation order; joined on shutdown.
    serials: Mutex<Vec<SerialExecutor>>,

    /// Handle to the timer driver thread.
    timer: TimerHandle,

    /// Join handle of the timer driver thread.
    timer_thread: Option<std::thread::JoinHandle<()>>,
}

impl Runtime {
    /// Creates a new runtime instance.
    ///
    /// # Arguments
    ///
    /// * `worker_threads` - Number of worker threads in the parallel pool.
    ///
    /// The timer driver is started automatically.
    pub(crate) fn new(worker_threads: usize) -> Self {
        let (timer, timer_thread) = Driver::start();
        let executor = Executor::new(timer.clone(), worker_threads);

        debug!(workers = worker_threads, "runtime started");

        Self {
            executor,
            serials: Mutex::new(Vec::new()),
            timer,
            timer_thread: Some(timer_thread),
        }
    }

    /// Returns a handle to the parallel execution context.
    ///
    /// Coroutines launched through it may run concurrently on any pool
    /// worker, and always resume on the pool.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            scheduler: self.executor.scheduler(),
        }
    }

    /// Creates a serial execution context backed by a single named
    /// worker thread and returns its handle.
    ///
    /// At most one coroutine slice executes on it at a time; launches
    /// and resumes run strictly in submission order. A coroutine
    /// launched on the context resumes on its thread after every await,
    /// so "this state is only ever touched from context X" holds
    /// automatically.
    ///
    /// Each call creates a fresh context; the runtime keeps it alive
    /// until shutdown.
    pub fn serial(&self, name: &str) -> Dispatcher {
        let executor = SerialExecutor::new(name, self.timer.clone());

        debug!(name, "serial context started");

        let dispatcher = Dispatcher {
            scheduler: executor.queue.clone(),
        };

        self.serials.lock().unwrap().push(executor);

        dispatcher
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// This method is typically used as the synchronous entry point of
    /// the runtime (e.g. in `main` or tests).
    ///
    /// Internally, the future is launched on the parallel pool and its
    /// result is sent back through a channel.
    ///
    /// # Panics
    ///
    /// Panics if the runtime shuts down before the future completes.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async {
    ///     42
    /// });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (transmitter, receiver) = mpsc::channel();

        let _detached = self.dispatcher().launch(async move {
            let result = future.await;
            let _ = transmitter.send(result);
            Ok(())
        });

        receiver.recv().expect("block_on failed")
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// This performs the following steps:
    /// 1. Stops task submission and signals every context to shut down
    /// 2. Sends a shutdown command to the timer driver
    /// 3. Joins all worker and driver threads
    fn drop(&mut self) {
        debug!("runtime shutting down");

        self.executor.shutdown();

        let mut serials = self.serials.lock().unwrap();
        for serial in serials.iter() {
            serial.shutdown();
        }

        let _ = self.timer.send(Command::Shutdown);

        self.executor.join();

        for serial in serials.iter_mut() {
            serial.join();
        }
        drop(serials);

        if let Some(handle) = self.timer_thread.take() {
            let _ = handle.join();
        }
    }
}
