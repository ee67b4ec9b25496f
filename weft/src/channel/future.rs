use super::core::{Channel, ParkedSend};
use super::error::SendError;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future returned by [`Channel::send`].
///
/// Completes immediately when the buffer has room; otherwise the value
/// moves into the channel's parked-sender queue and the coroutine
/// suspends until the value is accepted or the channel closes.
///
/// Cancel-safe: dropping a parked send withdraws its entry, value
/// included, from the channel.
pub struct SendFuture<'a, T> {
    channel: &'a Channel<T>,
    value: Option<T>,
    ticket: Option<u64>,
}

impl<'a, T> SendFuture<'a, T> {
    pub(super) fn new(channel: &'a Channel<T>, value: T) -> Self {
        Self {
            channel,
            value: Some(value),
            ticket: None,
        }
    }
}

// No self-references: the in-flight value is owned, the channel is
// borrowed.
impl<T> Unpin for SendFuture<'_, T> {}

impl<T> Future for SendFuture<'_, T> {
    type Output = Result<(), SendError<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut state = this.channel.shared.state.lock().unwrap();

        // Parked: resolve the settled outcome, or refresh the waker.
        if let Some(ticket) = this.ticket {
            if let Some(outcome) = state.settled_sends.remove(&ticket) {
                this.ticket = None;

                return Poll::Ready(match outcome {
                    Ok(()) => Ok(()),
                    Err(value) => Err(SendError(value)),
                });
            }

            if let Some(entry) = state
                .parked_senders
                .iter_mut()
                .find(|entry| entry.ticket == ticket)
            {
                entry.waker = cx.waker().clone();
            }

            return Poll::Pending;
        }

        let value = this
            .value
            .take()
            .expect("send future polled after completion");

        if state.closed {
            return Poll::Ready(Err(SendError(value)));
        }

        if state.buffer.len() < state.capacity {
            state.buffer.push_back(value);
            state.wake_receivers();

            return Poll::Ready(Ok(()));
        }

        // Full (always, for rendezvous): park with the value.
        let ticket = state.next_ticket;
        state.next_ticket += 1;

        state.parked_senders.push_back(ParkedSend {
            ticket,
            value,
            waker: cx.waker().clone(),
        });
        this.ticket = Some(ticket);

        // A parked sender is a deliverable value for receivers waiting
        // on an empty buffer (the rendezvous hand-off).
        state.wake_receivers();

        Poll::Pending
    }
}

impl<T> Drop for SendFuture<'_, T> {
    /// Withdraws a still-parked entry from the channel.
    ///
    /// A settled entry is removed from the settlement map instead; its
    /// value was already accepted or is discarded with the future.
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket {
            let mut state = self.channel.shared.state.lock().unwrap();

            if state.settled_sends.remove(&ticket).is_none() {
                state.parked_senders.retain(|entry| entry.ticket != ticket);
            }
        }
    }
}

/// Future returned by [`Channel::recv`].
///
/// Resolves with the oldest value, suspending the coroutine while the
/// channel is open and empty; resolves with `None` once the channel is
/// closed and drained.
pub struct RecvFuture<'a, T> {
    channel: &'a Channel<T>,
}

impl<'a, T> RecvFuture<'a, T> {
    pub(super) fn new(channel: &'a Channel<T>) -> Self {
        Self { channel }
    }
}

impl<T> Future for RecvFuture<'_, T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.channel.shared.state.lock().unwrap();

        if let Some(value) = state.pop_value() {
            return Poll::Ready(Some(value));
        }

        if state.closed {
            return Poll::Ready(None);
        }

        state.recv_wakers.push(cx.waker().clone());

        Poll::Pending
    }
}
