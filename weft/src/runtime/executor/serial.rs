use crate::runtime::context::enter_context;
use crate::runtime::dispatcher::Schedule;
use crate::runtime::task::Runnable;
use crate::timer::TimerHandle;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

/// A serial execution context.
///
/// A `SerialExecutor` owns exactly one named worker thread draining a
/// strict-FIFO queue. At most one coroutine slice (a first run or a
/// resume) executes at a time, and slices run in submission order.
/// Because every coroutine launched here keeps the queue as its resume
/// target, the one-at-a-time guarantee holds across suspend/resume
/// boundaries: a coroutine launched on a serial context always comes
/// back to this thread.
pub(crate) struct SerialExecutor {
    /// The queue shared with the worker thread; also the scheduler
    /// handed out to coroutines launched on this context.
    pub(crate) queue: Arc<SerialQueue>,

    /// The single worker thread.
    handle: Option<JoinHandle<()>>,
}

impl SerialExecutor {
    /// Starts a serial context with a named worker thread.
    pub(crate) fn new(name: &str, timer: TimerHandle) -> Self {
        let queue = Arc::new(SerialQueue::new());

        let worker_queue = queue.clone();
        let handle = thread::Builder::new()
            .name(format!("weft-{name}"))
            .spawn(move || {
                run(worker_queue, timer);
            })
            .expect("failed to spawn serial worker thread");

        Self {
            queue,
            handle: Some(handle),
        }
    }

    /// Signals the worker to stop; queued work is dropped.
    pub(crate) fn shutdown(&self) {
        self.queue.shutdown();
    }

    /// Joins the worker thread.
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Worker loop of a serial context.
///
/// Slices execute one at a time, in queue order, with the runtime
/// context (timer handle and this queue as scheduler) installed around
/// each one.
fn run(queue: Arc<SerialQueue>, timer: TimerHandle) {
    while let Some(task) = queue.next() {
        let scheduler: Arc<dyn Schedule> = queue.clone();

        enter_context(timer.clone(), scheduler, || {
            task.run();
        });
    }
}

/// The strict-FIFO queue of a serial context.
///
/// Launches and resumes are appended at the back; the single worker
/// pops from the front. There is no stealing: submission order is the
/// execution order.
pub(crate) struct SerialQueue {
    /// Queued coroutine slices.
    tasks: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Wakes the worker when work arrives or shutdown is signalled.
    condvar: Condvar,

    /// Indicates the context is shutting down.
    shutdown: AtomicBool,
}

impl SerialQueue {
    fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Blocks until a slice is available or shutdown is signalled.
    ///
    /// Returns `None` on shutdown.
    fn next(&self) -> Option<Arc<dyn Runnable>> {
        let mut tasks = self.tasks.lock().unwrap();

        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }

            if let Some(task) = tasks.pop_front() {
                return Some(task);
            }

            tasks = self.condvar.wait(tasks).unwrap();
        }
    }

    /// Signals shutdown and wakes the worker.
    fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }
}

impl Schedule for SerialQueue {
    /// Appends a launch or resume in submission order.
    ///
    /// After shutdown the task is dropped.
    fn schedule(&self, task: Arc<dyn Runnable>) {
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }

        self.tasks.lock().unwrap().push_back(task);
        self.condvar.notify_one();
    }
}
