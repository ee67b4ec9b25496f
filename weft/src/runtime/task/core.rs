use super::JoinHandle;
use super::state::{COMPLETED, FAILED, NOTIFIED, QUEUED, RUNNING, SUSPENDED};
use crate::error::Error;
use crate::runtime::context::{CURRENT_LOCALS, CURRENT_SCHEDULER, CURRENT_WORKER_ID};
use crate::runtime::dispatcher::Schedule;
use crate::runtime::task::waker::make_waker;

use std::cell::UnsafeCell;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// A runnable unit of work that can be executed by a scheduler.
///
/// The `Runnable` trait erases the result type of a coroutine so that
/// an execution context can hold a heterogeneous run queue of
/// `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Executes one slice of the coroutine, typically on a worker thread.
    fn run(self: Arc<Self>);
}

/// A launched coroutine managed by the runtime.
///
/// A `Task` is the container for a coroutine body. It owns the pinned
/// future (the coroutine's preserved execution state across
/// suspensions), the lifecycle state machine, the slot for the terminal
/// result, and the scheduler of the context the coroutine was launched
/// on: the single resume target for its whole life.
pub(crate) struct Task<T> {
    /// The coroutine body.
    ///
    /// Wrapped in `UnsafeCell` for interior mutability during `poll`,
    /// and `Pin<Box<...>>` so the suspended state never moves in memory.
    body: UnsafeCell<Pin<Box<dyn Future<Output = Result<T, Error>> + Send>>>,

    /// Terminal result of the coroutine, stored exactly once.
    pub(crate) result: UnsafeCell<Option<Result<T, Error>>>,

    /// Lifecycle state (QUEUED, RUNNING, SUSPENDED, ...).
    pub(crate) state: AtomicUsize,

    /// Scheduler of the launch context; every resume goes through it.
    scheduler: Arc<dyn Schedule>,

    /// Wakers of `JoinHandle`s awaiting this coroutine.
    pub(crate) waiters: Mutex<Vec<Waker>>,
}

unsafe impl<T> Send for Task<T> {}
unsafe impl<T> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a coroutine from its body, bound to a scheduler.
    ///
    /// The task starts in the `QUEUED` state: created and waiting for
    /// its context to run it for the first time.
    pub(crate) fn new<F>(body: F, scheduler: Arc<dyn Schedule>) -> Self
    where
        F: Future<Output = Result<T, Error>> + Send + 'static,
    {
        Self {
            body: UnsafeCell::new(Box::pin(body)),
            result: UnsafeCell::new(None),
            state: AtomicUsize::new(QUEUED),
            scheduler,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Executes one slice of the coroutine.
    ///
    /// Transitions to `RUNNING`, polls the body, and handles the
    /// outcome:
    /// - `Poll::Pending`: parks as `SUSPENDED`, or re-queues if a
    ///   resume arrived while the slice was running (`NOTIFIED`).
    /// - `Poll::Ready(Ok)`: stores the value, transitions `COMPLETED`.
    /// - `Poll::Ready(Err)`: stores the error, transitions `FAILED`.
    ///
    /// Both terminal transitions wake every joining handle.
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        // Transition to RUNNING. This ensures exclusive access to the UnsafeCell.
        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: the RUNNING state guarantees no other thread is polling this body.
        let poll = unsafe { (&mut *self.body.get()).as_mut().poll(&mut cx) };

        match poll {
            Poll::Pending => {
                // Park as SUSPENDED unless a wake-up occurred during the slice.
                if self
                    .state
                    .compare_exchange(RUNNING, SUSPENDED, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Resumed while running; re-queue on the launch context.
                    self.state.store(QUEUED, Ordering::Release);
                    self.scheduler.schedule(self.clone());
                }
            }
            Poll::Ready(output) => {
                let terminal = if output.is_ok() { COMPLETED } else { FAILED };

                unsafe {
                    *self.result.get() = Some(output);
                }
                self.state.store(terminal, Ordering::Release);

                let waiters = self.waiters.lock().unwrap();
                for w in waiters.iter() {
                    w.wake_by_ref();
                }
            }
        }
    }

    /// Resumes the coroutine.
    ///
    /// A `SUSPENDED` coroutine moves to `QUEUED` and is pushed onto the
    /// scheduler of its launch context. A `RUNNING` coroutine moves to
    /// `NOTIFIED` so it is re-polled right after its current slice.
    /// Resumes on a terminal or already-queued coroutine are absorbed
    /// here; the one-shot suspension cells guarantee that no completion
    /// is ever delivered twice.
    pub(crate) fn wake(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                SUSPENDED => {
                    if self
                        .state
                        .compare_exchange(SUSPENDED, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.scheduler.schedule(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                QUEUED | NOTIFIED | COMPLETED | FAILED => return,
                _ => return,
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }
}

/// Launches a coroutine on the current execution context.
///
/// The coroutine runs on whatever context the caller is executing on: a
/// coroutine spawned from a pool worker stays on the pool, one spawned
/// from a serial context stays serial. On pool workers the task is
/// pushed to the local queue for cache locality; elsewhere it goes
/// through the context's scheduler.
///
/// Use [`Dispatcher::launch`](crate::Dispatcher::launch) to target a
/// specific context instead.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime: there is
/// no suspension mechanism on ordinary threads.
pub fn spawn<F, T>(body: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T, Error>> + Send + 'static,
{
    let scheduler = CURRENT_SCHEDULER.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    let task = Arc::new(Task::new(body, scheduler.clone()));

    // Pool workers push to their local queue for locality.
    let pushed_locally = CURRENT_WORKER_ID.with(|id_cell| {
        let id = *id_cell.borrow();
        if let Some(id) = id {
            CURRENT_LOCALS.with(|locals_cell| {
                if let Some(locals) = locals_cell.borrow().as_ref() {
                    locals[id].push(task.clone());
                    return true;
                }
                false
            })
        } else {
            false
        }
    });

    if !pushed_locally {
        scheduler.schedule(task.clone());
    }

    JoinHandle { task }
}
