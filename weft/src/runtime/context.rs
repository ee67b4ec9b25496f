use crate::runtime::dispatcher::Schedule;
use crate::runtime::work_stealing::queue::LocalQueue;
use crate::timer::TimerHandle;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Thread-local handle to the current timer driver.
    ///
    /// Set when entering the runtime context; allows timed suspensions
    /// (`sleep`, `timeout`) to register timers without explicit
    /// parameter passing.
    pub(crate) static CURRENT_TIMER: RefCell<Option<TimerHandle>> =
        const { RefCell::new(None) };

    /// Thread-local scheduler of the execution context the current
    /// coroutine slice belongs to.
    ///
    /// Used by `spawn` to launch onto the current context, and as the
    /// marker that a runtime context is active at all.
    pub(crate) static CURRENT_SCHEDULER: RefCell<Option<Arc<dyn Schedule>>> =
        const { RefCell::new(None) };

    /// Thread-local identifier of the current pool worker.
    ///
    /// `None` on serial workers and outside the runtime.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// Thread-local references to all pool worker queues.
    ///
    /// Enables the local-push fast path of `spawn` without global
    /// synchronization.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the current thread.
///
/// Temporarily installs the thread-local runtime state (timer handle
/// and the scheduler of the running context) for the duration of the
/// closure `f`, restoring the previous context afterwards.
///
/// This mechanism lets deeply nested runtime components reach shared
/// execution state without passing handles through every API.
///
/// # Returns
///
/// Returns the result of the closure `f`.
pub(crate) fn enter_context<R>(
    timer: TimerHandle,
    scheduler: Arc<dyn Schedule>,
    f: impl FnOnce() -> R,
) -> R {
    CURRENT_TIMER.with(|t| {
        CURRENT_SCHEDULER.with(|s| {
            let prev_t = t.replace(Some(timer));
            let prev_s = s.replace(Some(scheduler));

            let out = f();

            s.replace(prev_s);
            t.replace(prev_t);

            out
        })
    })
}

/// Asserts that a runtime context is active on the current thread.
///
/// Suspension primitives call this on first poll: awaiting outside a
/// coroutine has no resume mechanism and must fail deterministically
/// instead of hanging.
///
/// # Panics
///
/// Panics with `what` if no runtime context is installed.
pub(crate) fn assert_in_runtime(what: &str) {
    CURRENT_SCHEDULER.with(|cell| {
        if cell.borrow().is_none() {
            panic!("{what} outside of a runtime coroutine");
        }
    });
}
