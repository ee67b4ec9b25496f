use crate::runtime::dispatcher::Schedule;
use crate::runtime::executor::worker::Worker;
use crate::runtime::work_stealing::injector::Injector;
use crate::runtime::work_stealing::queue::LocalQueue;
use crate::timer::TimerHandle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// The parallel execution context.
///
/// `Executor` owns the pool of worker threads and the global injector
/// queue they feed from. Coroutines launched on it may run concurrently
/// on any worker; two launches have no ordering guarantee relative to
/// each other.
pub(crate) struct Executor {
    injector: Arc<Injector>,
    handles: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Executor {
    /// Creates the pool with `threads` worker threads.
    ///
    /// Each worker receives the timer handle so coroutines running on
    /// it can register timed suspensions.
    pub(crate) fn new(timer: TimerHandle, threads: usize) -> Self {
        let injector = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let locals: Arc<Vec<Arc<LocalQueue>>> =
            Arc::new((0..threads).map(|_| Arc::new(LocalQueue::new())).collect());

        let mut handles = Vec::with_capacity(threads);

        for id in 0..threads {
            let worker = Worker::new(id, locals.clone(), injector.clone());

            let timer = timer.clone();
            let sd = shutdown.clone();

            let handle = thread::Builder::new()
                .name(format!("weft-worker-{id}"))
                .spawn(move || {
                    worker.run(sd, timer);
                })
                .expect("failed to spawn pool worker thread");

            handles.push(handle);
        }

        Self {
            injector,
            handles,
            shutdown,
        }
    }

    /// Scheduler of the pool, used as the resume target of every
    /// coroutine launched on it.
    pub(crate) fn scheduler(&self) -> Arc<dyn Schedule> {
        self.injector.clone()
    }

    /// Signals every worker to stop and drops queued work.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.injector.shutdown();
    }

    /// Joins all worker threads.
    pub(crate) fn join(&mut self) {
        for h in self.handles.drain(..) {
            let _ = h.join();
        }
    }
}
