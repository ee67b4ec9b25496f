use crate::error::Error;
use crate::runtime::task::Task;
use crate::runtime::task::state::{COMPLETED, FAILED};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};

/// A handle to a launched coroutine.
///
/// A `JoinHandle` allows awaiting the terminal result of a coroutine:
/// `Ok` with the body's value, or `Err` with the error that marked the
/// coroutine failed. The failure of a detached coroutine is observable
/// nowhere else: whoever launched it supervises it through this
/// handle, or not at all.
///
/// Dropping the `JoinHandle` does **not** stop the coroutine; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    /// Shared reference to the underlying coroutine.
    pub(crate) task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    /// Returns whether the coroutine has reached a terminal state.
    fn is_terminal(&self) -> bool {
        let state = self.task.state.load(Ordering::Acquire);
        state == COMPLETED || state == FAILED
    }
}

impl<T> Future for JoinHandle<T> {
    /// The terminal result of the coroutine.
    type Output = Result<T, Error>;

    /// Polls the join handle.
    ///
    /// If the coroutine already terminated, its result is returned
    /// immediately. Otherwise the current waker is registered and the
    /// future yields.
    ///
    /// The waker is registered **before** re-checking the state to
    /// avoid missed wake-ups.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.is_terminal() {
            let result = unsafe {
                (*self.task.result.get())
                    .take()
                    .expect("coroutine result already taken")
            };
            return Poll::Ready(result);
        }

        self.task.waiters.lock().unwrap().push(cx.waker().clone());

        if self.is_terminal() {
            let result = unsafe {
                (*self.task.result.get())
                    .take()
                    .expect("coroutine result already taken")
            };
            return Poll::Ready(result);
        }

        Poll::Pending
    }
}
