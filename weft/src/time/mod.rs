//! Timed suspension utilities.
//!
//! This module provides the time-related asynchronous primitives that
//! integrate with the runtime's timer driver:
//! - [`sleep`] for suspending a coroutine until a deadline,
//! - [`timeout`] for bounding a future's execution time,
//! - [`instrumented`] for measuring how long a future takes.

mod instrumented;
mod sleep;
mod timeout;

#[doc(inline)]
pub use instrumented::instrumented;

#[doc(inline)]
pub use sleep::sleep;

#[doc(inline)]
pub use timeout::{Elapsed, timeout};
