use thiserror::Error;

/// Error returned by [`Channel::try_send`](super::Channel::try_send).
///
/// Both variants hand the unsent value back to the caller: a refused
/// value is never silently dropped.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum TrySendError<T> {
    /// The buffer is at capacity (always, for rendezvous channels).
    #[error("channel is full")]
    Full(T),

    /// The channel was closed.
    #[error("channel is closed")]
    Closed(T),
}

impl<T> TrySendError<T> {
    /// Returns the value that could not be sent.
    pub fn into_inner(self) -> T {
        match self {
            TrySendError::Full(value) | TrySendError::Closed(value) => value,
        }
    }
}

/// Error returned by [`Channel::send`](super::Channel::send) when the
/// channel is closed before the value is accepted.
///
/// Carries the unsent value back to the sender.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("channel is closed")]
pub struct SendError<T>(pub T);

/// Error returned by [`Channel::try_recv`](super::Channel::try_recv).
///
/// Note that a suspending receive never fails: after close it yields
/// `None` (end-of-stream) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryRecvError {
    /// The buffer is empty and the channel is still open.
    #[error("channel is empty")]
    Empty,

    /// The channel is closed and fully drained.
    #[error("channel is closed")]
    Closed,
}
