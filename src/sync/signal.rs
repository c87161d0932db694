use std::error::Error;
use std::fmt;
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

/// Creates a single-use completion and the signal that observes it.
///
/// The completion is handed to the operation; the signal stays with the waiter. Raising the
/// completion consumes it, so a value can be delivered at most once.
///
/// # Examples
///
/// ```
/// use std::thread;
///
/// use future_awaits::sync;
///
/// let (completion, signal) = sync::channel();
///
/// thread::spawn(move || completion.complete(42));
///
/// assert_eq!(signal.wait(None), Ok(42));
/// ```
pub fn channel<T>() -> (Completion<T>, Signal<T>) {
    // One slot is enough: there is exactly one send and it must never block.
    let (sender, receiver) = bounded(1);
    (Completion { sender }, Signal { receiver })
}

/// The sending half of a single-use signal.
///
/// Dropping a completion without raising it tells the waiter that no result will ever come.
pub struct Completion<T> {
    sender: Sender<T>,
}

impl<T> Completion<T> {
    /// Delivers the value and raises the signal.
    ///
    /// If the waiter has already given up, the value is dropped.
    pub fn complete(self, value: T) {
        let _ = self.sender.send(value);
    }
}

impl<T, E> Completion<Result<T, E>> {
    /// Completes with a success value.
    pub fn succeed(self, value: T) {
        self.complete(Ok(value))
    }

    /// Completes with an error.
    pub fn fail(self, err: E) {
        self.complete(Err(err))
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Completion { .. }")
    }
}

/// The receiving half of a single-use signal.
pub struct Signal<T> {
    receiver: Receiver<T>,
}

impl<T> Signal<T> {
    /// Blocks the current thread until the signal is raised or the deadline passes.
    ///
    /// Without a deadline this waits for as long as the completion is alive.
    pub fn wait(self, deadline: Option<Instant>) -> Result<T, WaitError> {
        match deadline {
            Some(deadline) => self.receiver.recv_deadline(deadline).map_err(|err| match err {
                RecvTimeoutError::Timeout => WaitError::TimedOut,
                RecvTimeoutError::Disconnected => WaitError::Abandoned,
            }),
            None => self.receiver.recv().map_err(|_| WaitError::Abandoned),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Signal { .. }")
    }
}

/// An error returned from [`Signal::wait`].
///
/// [`Signal::wait`]: struct.Signal.html#method.wait
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WaitError {
    /// The deadline passed before the signal was raised.
    TimedOut,

    /// The completion was dropped without being raised.
    Abandoned,
}

impl Error for WaitError {}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::TimedOut => f.write_str("signal wait has timed out"),
            WaitError::Abandoned => f.write_str("completion dropped without a value"),
        }
    }
}
