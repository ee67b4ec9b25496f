use crate::runtime::context::{CURRENT_LOCALS, CURRENT_WORKER_ID, enter_context};
use crate::runtime::task::Runnable;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;
use crate::timer::TimerHandle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A worker thread of the parallel execution context.
///
/// A `Worker` executes runnable coroutines using a work-stealing
/// strategy. Each worker owns a local queue and cooperates with the
/// other workers to balance load.
///
/// The execution order is:
/// 1. Pop from the local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    /// Unique identifier of the worker.
    id: usize,

    /// All local queues (one per worker), used for stealing.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    /// Handle to the global injector queue.
    injector: InjectorHandle,
}

impl Worker {
    /// Creates a new worker.
    ///
    /// # Arguments
    ///
    /// * `id` - Worker identifier
    /// * `locals` - Shared vector of all local queues
    /// * `injector` - Handle to the global injector
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: InjectorHandle,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
        }
    }

    /// Runs the worker event loop.
    ///
    /// The worker repeatedly looks for work until a shutdown signal is
    /// received. While a coroutine executes, the runtime context (timer
    /// handle and the pool's scheduler) is installed for the current
    /// thread, so the coroutine can register timers and spawn onto its
    /// own context.
    pub(crate) fn run(&self, shutdown: Arc<AtomicBool>, timer: TimerHandle) {
        CURRENT_WORKER_ID.with(|id| *id.borrow_mut() = Some(self.id));
        CURRENT_LOCALS.with(|locals| *locals.borrow_mut() = Some(self.locals.clone()));

        loop {
            if shutdown.load(Ordering::Acquire) {
                break;
            }

            if let Some(task) = self.locals[self.id].pop() {
                enter_context(timer.clone(), self.injector.clone(), || {
                    task.run();
                });
                continue;
            }

            if let Some(task) = self.injector.steal() {
                enter_context(timer.clone(), self.injector.clone(), || {
                    task.run();
                });
                continue;
            }

            if let Some(task) = self.try_steal() {
                enter_context(timer.clone(), self.injector.clone(), || {
                    task.run();
                });
                continue;
            }

            self.injector.park();
        }
    }

    /// Attempts to steal a coroutine from another worker's local queue.
    ///
    /// Workers are visited in a round-robin fashion to avoid starvation
    /// and distribute load evenly.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        if len <= 1 {
            return None;
        }

        for i in 0..len {
            let victim = (self.id + i + 1) % len;

            if let Some(task) = self.locals[victim].steal() {
                return Some(task);
            }
        }
        None
    }
}
