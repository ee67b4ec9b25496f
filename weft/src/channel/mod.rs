//! Bounded FIFO channels between coroutines.
//!
//! A [`Channel`] transfers a stream of values from producer coroutines
//! to consumer coroutines through a buffer of fixed capacity.
//! Conceptually it is a queue that suspends a coroutine receiving from
//! it while it is empty, and a coroutine sending into it while it is
//! full; capacity `0` makes it a rendezvous channel where every send
//! pairs up with a receive.
//!
//! A channel is closed explicitly: receivers drain the remaining
//! buffered values and then observe end-of-stream (`None`), while
//! senders, parked or future, fail with their value handed back.
//!
//! Consuming the stream is a plain loop:
//!
//! ```rust,ignore
//! while let Some(value) = channel.recv().await {
//!     // in producer order, until close
//! }
//! ```

mod core;
mod error;
mod future;

pub use self::core::Channel;
pub use error::{SendError, TryRecvError, TrySendError};
pub use future::{RecvFuture, SendFuture};
