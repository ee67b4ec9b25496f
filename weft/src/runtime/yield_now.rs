use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that yields execution back to the scheduler exactly once.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    /// Polls the yield future.
    ///
    /// On the first poll, the coroutine suspends after scheduling
    /// itself to be resumed. On the second poll, the future completes.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if !self.0 {
            self.0 = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        Poll::Ready(())
    }
}

/// Yields execution back to the current execution context.
///
/// This allows other coroutines to make progress before the current one
/// continues. The function yields exactly once and, like every
/// suspension, resumes on the context the coroutine was launched on.
///
/// # Examples
///
/// ```rust,ignore
/// async fn step() {
///     // Allow other coroutines to run
///     yield_now().await;
/// }
/// ```
pub async fn yield_now() {
    YieldOnce(false).await
}
