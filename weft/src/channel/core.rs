use super::error::{TryRecvError, TrySendError};
use super::future::{RecvFuture, SendFuture};

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::Waker;

use tracing::debug;

/// A bounded FIFO channel between coroutines.
///
/// The handle is cheap to clone; producers and consumers share the same
/// underlying channel. Capacity is fixed at creation and may be `0`
/// (rendezvous: every send completes only when paired with a receive).
///
/// Values are delivered in the order they were accepted. A single
/// producer's emission order is always preserved; with several
/// producers the relative order across producers is unspecified.
pub struct Channel<T> {
    pub(super) shared: Arc<Shared<T>>,
}

/// Channel state behind its single point of mutual exclusion.
///
/// Buffer mutation, parking, settlement and close all happen under this
/// one mutex, so concurrent sends, receives and closes from different
/// execution contexts never race on the internal queues.
pub(super) struct Shared<T> {
    pub(super) state: Mutex<State<T>>,
}

/// A sender parked on a full (or rendezvous) channel.
///
/// The in-flight value moves into the entry: while parked, the value is
/// owned by the channel, which either accepts it (FIFO, as room opens
/// up) or hands it back on close.
pub(super) struct ParkedSend<T> {
    pub(super) ticket: u64,
    pub(super) value: T,
    pub(super) waker: Waker,
}

pub(super) struct State<T> {
    /// Buffered values, oldest first. `buffer.len() <= capacity` always
    /// holds; rendezvous channels never buffer.
    pub(super) buffer: VecDeque<T>,

    /// Fixed capacity of the buffer.
    pub(super) capacity: usize,

    /// Whether `close` was called.
    pub(super) closed: bool,

    /// Ticket source for parked sends.
    pub(super) next_ticket: u64,

    /// Senders suspended on a full channel, in submission order.
    pub(super) parked_senders: VecDeque<ParkedSend<T>>,

    /// Outcomes of parked sends that were taken out of
    /// `parked_senders`: accepted (`Ok`) or refused by close (`Err`
    /// hands the value back). Drained by the owning send future on its
    /// wake-up poll.
    pub(super) settled_sends: HashMap<u64, Result<(), T>>,

    /// Wakers of coroutines suspended on an empty channel.
    pub(super) recv_wakers: Vec<Waker>,
}

impl<T> State<T> {
    /// Takes the next deliverable value, if any.
    ///
    /// Pops the oldest buffered value and back-fills the freed slot
    /// from the oldest parked sender; on an empty buffer, takes a
    /// parked sender's value directly (the rendezvous hand-off).
    pub(super) fn pop_value(&mut self) -> Option<T> {
        if let Some(value) = self.buffer.pop_front() {
            if let Some(parked) = self.parked_senders.pop_front() {
                self.buffer.push_back(parked.value);
                self.settled_sends.insert(parked.ticket, Ok(()));
                parked.waker.wake();
            }

            return Some(value);
        }

        if let Some(parked) = self.parked_senders.pop_front() {
            self.settled_sends.insert(parked.ticket, Ok(()));
            parked.waker.wake();

            return Some(parked.value);
        }

        None
    }

    /// Wakes every coroutine suspended on receive.
    ///
    /// All waiters are woken rather than one: a woken receiver may have
    /// been dropped meanwhile, and a lost wake-up would strand the
    /// remaining waiters.
    pub(super) fn wake_receivers(&mut self) {
        for waker in self.recv_wakers.drain(..) {
            waker.wake();
        }
    }
}

impl<T> Channel<T> {
    /// Creates a channel with the given buffer capacity.
    ///
    /// `capacity` may be `0` for a rendezvous channel.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // a channel whose buffer can store only one element
    /// let channel = Channel::<i32>::new(1);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    buffer: VecDeque::new(),
                    capacity,
                    closed: false,
                    next_ticket: 0,
                    parked_senders: VecDeque::new(),
                    settled_sends: HashMap::new(),
                    recv_wakers: Vec::new(),
                }),
            }),
        }
    }

    /// Sends a value without suspending.
    ///
    /// Appends to the buffer and returns immediately when there is
    /// room. When the buffer is full (always, on a rendezvous channel)
    /// the value comes back in [`TrySendError::Full`]; after close it
    /// comes back in [`TrySendError::Closed`].
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        let mut state = self.shared.state.lock().unwrap();

        if state.closed {
            return Err(TrySendError::Closed(value));
        }

        if state.buffer.len() < state.capacity {
            state.buffer.push_back(value);
            state.wake_receivers();

            return Ok(());
        }

        Err(TrySendError::Full(value))
    }

    /// Sends a value, suspending the calling coroutine while the
    /// channel is full.
    ///
    /// Completes without suspending when there is buffer room. A parked
    /// send completes with `Ok` once its value is accepted (in
    /// submission order), or fails with
    /// [`SendError`](super::SendError), value handed back, if the
    /// channel closes first.
    pub fn send(&self, value: T) -> SendFuture<'_, T> {
        SendFuture::new(self, value)
    }

    /// Receives a value without suspending.
    ///
    /// Pops the oldest value if one is available (admitting the oldest
    /// parked sender into the freed slot). Fails with
    /// [`TryRecvError::Empty`] on an open empty channel and
    /// [`TryRecvError::Closed`] once the channel is closed and drained.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        let mut state = self.shared.state.lock().unwrap();

        if let Some(value) = state.pop_value() {
            return Ok(value);
        }

        if state.closed {
            Err(TryRecvError::Closed)
        } else {
            Err(TryRecvError::Empty)
        }
    }

    /// Receives a value, suspending the calling coroutine while the
    /// channel is empty.
    ///
    /// Resolves with `Some(value)` in FIFO order, or with `None` once
    /// the channel is closed and every buffered value has been drained;
    /// end-of-stream is a clean signal, not an error.
    pub fn recv(&self) -> RecvFuture<'_, T> {
        RecvFuture::new(self)
    }

    /// Closes the channel.
    ///
    /// Idempotent; returns `true` only for the call that performed the
    /// close. Every parked sender is failed (its value handed back),
    /// every parked receiver is woken to drain the buffer and observe
    /// end-of-stream, and all future sends are refused.
    pub fn close(&self) -> bool {
        let mut state = self.shared.state.lock().unwrap();

        if state.closed {
            return false;
        }

        state.closed = true;

        let State {
            parked_senders,
            settled_sends,
            ..
        } = &mut *state;

        for parked in parked_senders.drain(..) {
            settled_sends.insert(parked.ticket, Err(parked.value));
            parked.waker.wake();
        }

        state.wake_receivers();

        debug!("channel closed");

        true
    }

    /// Number of values currently buffered.
    ///
    /// Never exceeds [`capacity`](Self::capacity).
    pub fn len(&self) -> usize {
        self.shared.state.lock().unwrap().buffer.len()
    }

    /// Whether the buffer is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fixed buffer capacity.
    pub fn capacity(&self) -> usize {
        self.shared.state.lock().unwrap().capacity
    }

    /// Whether the channel has been closed.
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().unwrap().closed
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}
