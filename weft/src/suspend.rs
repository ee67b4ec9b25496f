//! Callback-to-suspension bridging.
//!
//! [`suspend`] is the low-level suspension point of the runtime: it
//! turns any single-shot, callback-style asynchronous operation into
//! one suspending call. The coroutine parks at the await point, the
//! operation completes from whatever thread it likes, and the coroutine
//! resumes on the execution context it was launched on with the
//! operation's result.
//!
//! Internally this is a one-shot rendezvous: a single-assignment result
//! cell plus a registered waker, guarded by one mutex.

use crate::error::Error;
use crate::runtime::context;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Suspends the calling coroutine until `operation` completes.
///
/// `operation` is invoked on first poll and handed a one-shot
/// [`Completion`]. The coroutine stays suspended, without blocking its
/// worker thread, until the completion is resolved, then resumes with
/// the resolved `Result`.
///
/// A failed operation surfaces its error at this call site, exactly
/// like a normal error return in sequential code.
///
/// # Panics
///
/// Panics if polled outside of a running runtime: ordinary threads have
/// no suspension mechanism, and the misuse must fail fast rather than
/// hang.
///
/// # Examples
///
/// ```rust,ignore
/// let data = suspend(|completion| {
///     http_get(url, move |response| match response {
///         Ok(body) => completion.succeed(body),
///         Err(e) => completion.fail(Error::operation(e.to_string())),
///     });
/// })
/// .await?;
/// ```
pub fn suspend<T, O>(operation: O) -> Suspend<T, O>
where
    O: FnOnce(Completion<T>),
{
    Suspend {
        cell: Arc::new(Cell::new()),
        operation: Some(operation),
    }
}

/// One-shot capability to complete a suspended call.
///
/// Handed to the wrapped operation by [`suspend`]; resolving it wakes
/// the suspended coroutine. The completing methods consume the
/// capability, so completing twice is not expressible. Dropping a
/// `Completion` without resolving it fails the suspended call with
/// [`Error::Unresolved`] so the coroutine cannot hang.
pub struct Completion<T> {
    cell: Arc<Cell<T>>,
}

impl<T> Completion<T> {
    /// Completes the suspended call with a value.
    pub fn succeed(self, value: T) {
        self.cell.fire(Ok(value));
    }

    /// Completes the suspended call with an error.
    pub fn fail(self, error: Error) {
        self.cell.fire(Err(error));
    }

    /// Completes the suspended call with a ready-made result.
    pub fn resolve(self, result: Result<T, Error>) {
        self.cell.fire(result);
    }
}

impl<T> Drop for Completion<T> {
    /// Fails the suspended call if the capability is discarded
    /// unresolved.
    ///
    /// After a normal `succeed`/`fail`/`resolve` this is a no-op: the
    /// cell accepts only its first assignment.
    fn drop(&mut self) {
        self.cell.fire(Err(Error::Unresolved));
    }
}

/// The one-shot rendezvous cell shared between the suspended coroutine
/// and the completion capability.
struct Cell<T> {
    state: Mutex<CellState<T>>,
}

struct CellState<T> {
    /// Single-assignment result slot.
    result: Option<Result<T, Error>>,

    /// Waker of the suspended coroutine, if it parked before the
    /// operation completed.
    waker: Option<Waker>,
}

impl<T> Cell<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(CellState {
                result: None,
                waker: None,
            }),
        }
    }

    /// Stores the first assigned result and wakes the suspended
    /// coroutine. Later assignments are ignored.
    fn fire(&self, result: Result<T, Error>) {
        let mut state = self.state.lock().unwrap();

        if state.result.is_some() {
            return;
        }

        state.result = Some(result);

        let waker = state.waker.take();
        drop(state);

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Future returned by [`suspend`].
///
/// Runs the wrapped operation on first poll and parks the coroutine
/// until the handed-out [`Completion`] is resolved.
pub struct Suspend<T, O> {
    cell: Arc<Cell<T>>,
    operation: Option<O>,
}

// Moving the future before first poll moves only owned data; nothing
// is self-referential.
impl<T, O> Unpin for Suspend<T, O> {}

impl<T, O> Future for Suspend<T, O>
where
    O: FnOnce(Completion<T>),
{
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(operation) = this.operation.take() {
            context::assert_in_runtime("suspend polled");

            // Register before starting the operation: it may complete
            // synchronously or from another thread immediately.
            this.cell.state.lock().unwrap().waker = Some(cx.waker().clone());

            operation(Completion {
                cell: this.cell.clone(),
            });
        } else {
            let mut state = this.cell.state.lock().unwrap();

            if let Some(result) = state.result.take() {
                return Poll::Ready(result);
            }

            state.waker = Some(cx.waker().clone());
            return Poll::Pending;
        }

        let mut state = this.cell.state.lock().unwrap();

        if let Some(result) = state.result.take() {
            return Poll::Ready(result);
        }

        Poll::Pending
    }
}
