use crate::runtime::context::CURRENT_TIMER;
use crate::timer::Command;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Creates a future that completes after the given duration.
///
/// This is the timed suspension of the runtime: the coroutine parks
/// without occupying a worker thread and resumes on its original
/// execution context no earlier than `duration` has elapsed (best
/// effort, not hard real-time).
///
/// # Panics
///
/// Panics if polled outside of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// A future that completes once a specific deadline is reached.
///
/// `Sleep` registers a timer with the runtime's timer driver on first
/// poll. The timer is automatically cancelled if the future is dropped
/// before completion.
///
/// This future is **cancel-safe**: dropping it prevents the timer from
/// waking the coroutine.
pub struct Sleep {
    /// Absolute point in time when the sleep completes.
    deadline: Instant,

    /// Whether the timer has already been registered with the driver.
    registered: bool,

    /// Cancellation flag shared with the driver.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    /// Creates a new `Sleep` future that completes after `duration`.
    ///
    /// The timer is not registered until the future is first polled.
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            deadline: Instant::now() + duration,
            registered: false,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Future for Sleep {
    /// The sleep future produces no value.
    type Output = ();

    /// Polls the sleep future.
    ///
    /// On the first poll, the timer is registered with the driver. The
    /// coroutine is resumed once the deadline is reached or if the
    /// sleep is cancelled.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.cancelled.load(Ordering::Acquire) || Instant::now() >= this.deadline {
            return Poll::Ready(());
        }

        if !this.registered {
            this.registered = true;

            CURRENT_TIMER.with(|cell| {
                let binding = cell.borrow();
                let timer = binding.as_ref().expect("sleep polled outside of runtime");

                let _ = timer.send(Command::Schedule {
                    deadline: this.deadline,
                    waker: cx.waker().clone(),
                    cancelled: this.cancelled.clone(),
                });
            });
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    /// Cancels the timer if the sleep future is dropped before
    /// completion.
    ///
    /// This ensures that no spurious wake-ups occur after the future
    /// has been abandoned.
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
