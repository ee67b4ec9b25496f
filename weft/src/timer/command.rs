use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::task::Waker;
use std::time::Instant;

/// Commands accepted by the timer driver thread.
pub(crate) enum Command {
    /// Schedule a wake-up at `deadline`, unless `cancelled` is set by
    /// the time it fires.
    Schedule {
        deadline: Instant,
        waker: Waker,
        cancelled: Arc<AtomicBool>,
    },

    /// Stop the driver thread.
    Shutdown,
}
