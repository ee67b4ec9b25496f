use thiserror::Error;

/// Failure of an awaited asynchronous result.
///
/// This is the error surfaced at await sites: the body of a failed
/// coroutine, a failed [`Completion`](crate::suspend::Completion), or a
/// failed [`Promise`](crate::promise::Promise) all carry it. It is
/// `Clone` because a terminal value is observed by any number of
/// waiters, any number of times.
///
/// Channel-specific failures (capacity, closed) live next to the
/// channel in [`crate::channel`]; misuse of the runtime (awaiting
/// outside a coroutine, spawning outside a runtime) is a deterministic
/// panic, not an error value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The wrapped asynchronous operation reported an error.
    #[error("operation failed: {0}")]
    Operation(String),

    /// The producer side was dropped before supplying a result.
    ///
    /// Raised when a `Completion` or a `Promise` goes away while a
    /// coroutine still awaits it, so the coroutine fails instead of
    /// hanging forever.
    #[error("producer dropped before completing")]
    Unresolved,
}

impl Error {
    /// Convenience constructor for an operation failure.
    pub fn operation(message: impl Into<String>) -> Self {
        Error::Operation(message.into())
    }
}
