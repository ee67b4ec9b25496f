//! One-shot result containers.
//!
//! A [`Promise`] / [`Deferred`] pair carries a single eventually-available
//! result between the party producing it and any number of consumers.
//! The promise is the write capability, used at most once; the deferred
//! is the read capability, cloneable, awaitable from any coroutine and
//! observable through non-suspending callbacks.
//!
//! A deferred leaves the pending state exactly once. Every observer,
//! suspended waiters and callback subscribers alike, is notified at
//! that moment, with the same terminal value; awaiting an
//! already-settled deferred returns immediately without suspending.

use crate::error::Error;

use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use tracing::warn;

/// Non-suspending observer registered with [`Deferred::on_complete`].
type Callback<T> = Box<dyn FnOnce(&Result<T, Error>) + Send>;

/// Observer bookkeeping while pending, terminal value afterwards.
///
/// The whole transition (storing the result, draining observers) runs
/// under the one mutex guarding this state, so concurrent settles and
/// registrations from different execution contexts never race.
enum State<T> {
    Pending {
        wakers: Vec<Waker>,
        callbacks: Vec<Callback<T>>,
    },
    Settled(Result<T, Error>),
}

struct Shared<T> {
    state: Mutex<State<T>>,
}

impl<T> Shared<T> {
    /// Performs the Pending→Settled transition, returning the drained
    /// observers; `None` if already settled.
    ///
    /// Observers are notified by the caller, outside the lock.
    fn transition(&self, result: Result<T, Error>) -> Option<(Vec<Waker>, Vec<Callback<T>>)> {
        let mut state = self.state.lock().unwrap();

        if matches!(&*state, State::Settled(_)) {
            return None;
        }

        match mem::replace(&mut *state, State::Settled(result)) {
            State::Pending { wakers, callbacks } => Some((wakers, callbacks)),
            State::Settled(_) => unreachable!("checked pending above"),
        }
    }
}

/// Write side of a one-shot result.
///
/// Exactly one `succeed`/`fail`/`settle` call takes effect; later calls
/// are idempotent no-ops that never re-fire observers. The promise is
/// not cloneable: there is one producer. Dropping a still-pending
/// promise settles it with [`Error::Unresolved`] so consumers never
/// hang.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

/// Read side of a one-shot result.
///
/// Cheap to clone; every clone observes the same terminal value.
/// Awaiting a pending deferred suspends the calling coroutine through
/// the regular suspension protocol and resumes on its own execution
/// context once the promise settles.
pub struct Deferred<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    /// Creates a pending promise and its read-only counterpart.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let (promise, deferred) = Promise::new();
    ///
    /// some_async_call(move |value| {
    ///     promise.succeed(value);
    /// });
    ///
    /// let value = deferred.await?;
    /// ```
    pub fn new() -> (Promise<T>, Deferred<T>) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending {
                wakers: Vec::new(),
                callbacks: Vec::new(),
            }),
        });

        (
            Promise {
                shared: shared.clone(),
            },
            Deferred { shared },
        )
    }

    /// Settles the deferred with a value.
    ///
    /// Returns `true` if this call performed the transition, `false` if
    /// the deferred was already settled (the call is then a no-op).
    pub fn succeed(&self, value: T) -> bool
    where
        T: Clone,
    {
        self.settle(Ok(value))
    }

    /// Settles the deferred with an error.
    ///
    /// Returns `true` if this call performed the transition, `false` if
    /// the deferred was already settled (the call is then a no-op).
    pub fn fail(&self, error: Error) -> bool
    where
        T: Clone,
    {
        self.settle(Err(error))
    }

    /// Settles the deferred with a ready-made result.
    ///
    /// All registered observers are notified exactly once, with this
    /// result: callbacks run first (outside the state lock), then every
    /// suspended waiter is woken.
    pub fn settle(&self, result: Result<T, Error>) -> bool
    where
        T: Clone,
    {
        let snapshot = result.clone();

        match self.shared.transition(result) {
            Some((wakers, callbacks)) => {
                for callback in callbacks {
                    callback(&snapshot);
                }
                for waker in wakers {
                    waker.wake();
                }

                true
            }
            None => {
                warn!("promise settled more than once; keeping the first result");
                false
            }
        }
    }
}

impl<T> Drop for Promise<T> {
    /// Settles a still-pending deferred with [`Error::Unresolved`].
    ///
    /// After a normal settle this is a no-op.
    fn drop(&mut self) {
        if let Some((wakers, callbacks)) = self.shared.transition(Err(Error::Unresolved)) {
            let result: Result<T, Error> = Err(Error::Unresolved);

            for callback in callbacks {
                callback(&result);
            }
            for waker in wakers {
                waker.wake();
            }
        }
    }
}

impl<T> Deferred<T> {
    /// Registers a non-suspending completion observer.
    ///
    /// The callback fires exactly once, with the terminal result:
    /// synchronously if the deferred is already settled, otherwise at
    /// transition time. Callbacks never run under the state lock.
    pub fn on_complete<F>(&self, callback: F)
    where
        T: Clone,
        F: FnOnce(&Result<T, Error>) + Send + 'static,
    {
        let settled = {
            let mut state = self.shared.state.lock().unwrap();

            match &mut *state {
                State::Pending { callbacks, .. } => {
                    callbacks.push(Box::new(callback));
                    None
                }
                State::Settled(result) => Some((callback, result.clone())),
            }
        };

        if let Some((callback, snapshot)) = settled {
            callback(&snapshot);
        }
    }

    /// Non-suspending peek at the terminal result.
    ///
    /// Returns `None` while pending.
    pub fn try_result(&self) -> Option<Result<T, Error>>
    where
        T: Clone,
    {
        match &*self.shared.state.lock().unwrap() {
            State::Pending { .. } => None,
            State::Settled(result) => Some(result.clone()),
        }
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone> Future for Deferred<T> {
    /// The terminal result of the promise.
    type Output = Result<T, Error>;

    /// Polls the deferred.
    ///
    /// Settled deferreds resolve immediately, as many times as they are
    /// awaited; pending ones register the coroutine as a waiter and
    /// suspend it.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.state.lock().unwrap();

        match &mut *state {
            State::Settled(result) => Poll::Ready(result.clone()),
            State::Pending { wakers, .. } => {
                wakers.push(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
