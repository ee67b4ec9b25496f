//! # Weft
//!
//! **Weft** is a cooperative coroutine runtime for Rust: it lets you
//! write sequential-looking code for operations that are actually
//! asynchronous (callback-style calls, timed delays, streams of values)
//! without ever blocking the thread a coroutine runs on.
//!
//! A coroutine is launched onto an execution context and suspends only
//! at explicit await points; the worker is released while it is parked,
//! and every resume happens on the context it was launched on. Two
//! flavors of context exist:
//!
//! - a **parallel pool** with a work-stealing scheduler, for work that
//!   may run concurrently,
//! - **serial contexts**, single named worker threads that run one
//!   coroutine slice at a time in strict submission order, so "only
//!   touch this state from context X" holds automatically for
//!   everything launched there.
//!
//! On top of the suspension core, Weft provides:
//!
//! - [`suspend`](suspend::suspend) — wrap any single-shot callback API
//!   into one suspending call,
//! - [`Promise`] / [`Deferred`] — one-shot results produced once and
//!   observed by any number of waiters or callbacks,
//! - [`Channel`] — bounded FIFO streams with suspension on full/empty
//!   and an explicit close/end-of-stream signal,
//! - [`time`] — timed suspension (`sleep`), deadlines (`timeout`), and
//!   measurement (`instrumented`),
//! - **Ergonomic macros** like `#[weft::main]`, `#[weft::test]`,
//!   `join!`, and `select!`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use weft::time::sleep;
//! use weft::task;
//!
//! #[weft::main]
//! async fn main() {
//!     // Launch a coroutine on the current context
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(100)).await;
//!         Ok(42)
//!     });
//!
//!     // Await its result
//!     let value = handle.await.unwrap();
//!     assert_eq!(value, 42);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`channel`] — bounded FIFO channels between coroutines
//! - [`promise`] — one-shot promises and deferreds
//! - [`suspend`] — callback-to-suspension bridging
//! - [`time`] — sleep, timeout, and instrumentation
//!
//! ## Getting Started
//!
//! Add Weft to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! weft = { git = "https://github.com/weft-rs/weft", package = "weft" }
//! ```

mod error;
mod runtime;
mod timer;

pub mod channel;
pub mod promise;
pub mod suspend;
pub mod time;

pub use error::Error;

pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;
pub use runtime::{Dispatcher, Runtime};

pub use channel::Channel;
pub use promise::{Deferred, Promise};

pub use weft_macros::*;
