/// Coroutine was created and scheduled, but has not run yet.
///
/// This is the initial state of every launched coroutine: it sits in a
/// run queue waiting for a worker to pick it up. A suspended coroutine
/// that has been resumed also passes through this state.
pub(crate) const QUEUED: usize = 0;

/// Coroutine is currently being executed by a worker.
///
/// At most one worker may observe this state at a time.
pub(crate) const RUNNING: usize = 1;

/// Coroutine is parked at an await point.
///
/// The coroutine holds no worker thread while in this state; it waits
/// for an external event (completion callback, promise settlement,
/// channel activity, timer) to move it back to [`QUEUED`].
pub(crate) const SUSPENDED: usize = 2;

/// Coroutine completed normally.
///
/// The body returned `Ok` and the result is stored. Terminal: the
/// coroutine is never polled again.
pub(crate) const COMPLETED: usize = 3;

/// Coroutine terminated with an error.
///
/// The body returned `Err` and the error is stored for whoever awaits
/// the coroutine's handle. Terminal: the coroutine is never polled
/// again.
pub(crate) const FAILED: usize = 4;

/// Coroutine was woken while it was still running.
///
/// Indicates that a resume arrived during the current execution slice;
/// the coroutine is re-queued as soon as that slice ends.
pub(crate) const NOTIFIED: usize = 5;
