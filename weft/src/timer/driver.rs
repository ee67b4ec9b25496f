use super::command::Command;
use super::entry::TimerEntry;

use std::collections::BinaryHeap;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::debug;

/// Shared handle to the timer driver.
///
/// Cloned into every execution context; suspension primitives send
/// [`Command::Schedule`] through it to register deadlines.
#[derive(Clone)]
pub(crate) struct TimerHandle {
    sender: Sender<Command>,
}

impl TimerHandle {
    /// Sends a command to the driver thread.
    ///
    /// Returns `Err` if the driver already stopped; callers treat that
    /// as a shutdown in progress.
    pub(crate) fn send(&self, command: Command) -> Result<(), ()> {
        self.sender.send(command).map_err(|_| ())
    }
}

/// The timer driver.
///
/// A dedicated thread owning a min-heap of [`TimerEntry`], fed through
/// an mpsc command channel. The thread sleeps until the nearest
/// deadline (or until a command arrives), then fires every due,
/// non-cancelled waker. Resumes still go through each coroutine's own
/// scheduler; the driver never runs coroutine code itself.
pub(crate) struct Driver {
    receiver: Receiver<Command>,
    timers: BinaryHeap<TimerEntry>,
}

impl Driver {
    /// Starts the driver thread and returns its handle.
    pub(crate) fn start() -> (TimerHandle, JoinHandle<()>) {
        let (sender, receiver) = channel();

        let driver = Driver {
            receiver,
            timers: BinaryHeap::new(),
        };

        let handle = thread::Builder::new()
            .name("weft-timer".into())
            .spawn(move || driver.run())
            .expect("failed to spawn timer driver thread");

        (TimerHandle { sender }, handle)
    }

    /// Runs the driver loop until shutdown.
    fn run(mut self) {
        debug!("timer driver started");

        loop {
            self.fire_due();

            // Sleep until the nearest deadline or the next command,
            // whichever comes first.
            let command = match self.timers.peek() {
                Some(next) => {
                    let wait = next.deadline.saturating_duration_since(Instant::now());

                    match self.receiver.recv_timeout(wait) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.receiver.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(Command::Schedule {
                    deadline,
                    waker,
                    cancelled,
                }) => {
                    self.timers.push(TimerEntry {
                        deadline,
                        waker,
                        cancelled,
                    });
                }
                Some(Command::Shutdown) => break,
                None => {}
            }
        }

        debug!("timer driver stopped");
    }

    /// Fires every timer whose deadline has passed.
    ///
    /// Cancelled entries are discarded without waking.
    fn fire_due(&mut self) {
        let now = Instant::now();

        while let Some(timer) = self.timers.peek() {
            if timer.deadline > now {
                break;
            }

            let timer = self.timers.pop().unwrap();

            if timer.cancelled.load(Ordering::Acquire) {
                continue;
            }

            timer.waker.wake();
        }
    }
}
