//! Turning callback-style operations into blocking calls.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kv_log_macro::trace;
use log::log_enabled;

use crate::error::BridgeError;
use crate::sync::{self, Completion, WaitError};
use crate::task::{Executor, Inline, RunId};

/// Waits for callback-style operations to complete.
///
/// An `Await` carries two settings: the execution context operations are submitted to, and an
/// optional timeout after which the waiter gives up. By default operations are started inline on
/// the calling thread and the wait is unbounded.
///
/// Giving up never cancels the operation itself; it may still complete later, and its result is
/// then silently discarded.
///
/// # Examples
///
/// ```
/// use std::thread;
/// use std::time::Duration;
///
/// use future_awaits::{Await, BridgeError};
///
/// let fetch = |completion: future_awaits::sync::Completion<Result<u32, String>>| {
///     thread::spawn(move || {
///         thread::sleep(Duration::from_millis(5));
///         completion.succeed(23);
///     });
/// };
///
/// assert_eq!(Await::new().run(fetch), Ok(23));
///
/// let slow = |completion: future_awaits::sync::Completion<Result<u32, String>>| {
///     thread::spawn(move || {
///         thread::sleep(Duration::from_millis(200));
///         completion.succeed(23);
///     });
/// };
///
/// let res = Await::new().timeout(Duration::from_millis(10)).run(slow);
/// assert_eq!(res, Err(BridgeError::TimedOut));
/// ```
#[derive(Clone)]
pub struct Await {
    executor: Arc<dyn Executor>,
    timeout: Option<Duration>,
}

impl Await {
    /// Creates an `Await` that starts operations inline and waits without a deadline.
    pub fn new() -> Await {
        Await {
            executor: Arc::new(Inline),
            timeout: None,
        }
    }

    /// Submits operations to `executor` instead of starting them inline.
    pub fn on<X: Executor + 'static>(mut self, executor: X) -> Await {
        self.executor = Arc::new(executor);
        self
    }

    /// Gives up waiting once `timeout` has passed since the wait began.
    ///
    /// `Duration::MAX` and other timeouts beyond what the clock can represent wait forever.
    pub fn timeout(mut self, timeout: Duration) -> Await {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the execution context operations are submitted to.
    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Computes the deadline for a wait that begins now.
    ///
    /// A timeout too large to be represented as an instant means waiting without a deadline.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.timeout.and_then(|timeout| Instant::now().checked_add(timeout))
    }

    /// Runs a callback-style operation and blocks until it reports its result.
    ///
    /// The operation is handed a [`Completion`] and must eventually raise it with the outcome.
    /// Returns [`BridgeError::TimedOut`] if the timeout passes first and
    /// [`BridgeError::NoResult`] if the completion is dropped without being raised.
    ///
    /// [`Completion`]: sync/struct.Completion.html
    /// [`BridgeError::TimedOut`]: enum.BridgeError.html#variant.TimedOut
    /// [`BridgeError::NoResult`]: enum.BridgeError.html#variant.NoResult
    pub fn run<V, E, F>(&self, op: F) -> Result<V, BridgeError<E>>
    where
        F: FnOnce(Completion<Result<V, E>>) + Send + 'static,
        V: Send + 'static,
        E: Send + 'static,
    {
        let run_id = RunId::generate();
        let deadline = self.deadline();

        trace!("await", {
            run_id: run_id.as_u64(),
            bounded: deadline.is_some(),
        });

        // The signal exists before the operation starts, so even an immediate completion is seen.
        let (completion, signal) = sync::channel();
        self.executor.execute(Box::new(move || op(completion)));

        let res = match signal.wait(deadline) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(BridgeError::Wrapped(err)),
            Err(WaitError::TimedOut) => Err(BridgeError::TimedOut),
            Err(WaitError::Abandoned) => Err(BridgeError::NoResult),
        };

        if log_enabled!(log::Level::Trace) {
            trace!("await completed", {
                run_id: run_id.as_u64(),
                outcome: outcome(&res),
            });
        }

        res
    }
}

impl Default for Await {
    fn default() -> Await {
        Await::new()
    }
}

impl fmt::Debug for Await {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Await")
            .field("timeout", &self.timeout)
            .field("allows_blocking", &self.executor.allows_blocking())
            .finish()
    }
}

/// Runs a callback-style operation inline and blocks until it reports its result.
///
/// This is the same as `Await::new().run(op)`.
///
/// # Examples
///
/// ```
/// use std::thread;
///
/// use future_awaits::block_on;
/// use future_awaits::sync::Completion;
///
/// let res = block_on(|completion: Completion<Result<&str, ()>>| {
///     thread::spawn(move || completion.succeed("hello"));
/// });
///
/// assert_eq!(res, Ok("hello"));
/// ```
pub fn block_on<V, E, F>(op: F) -> Result<V, BridgeError<E>>
where
    F: FnOnce(Completion<Result<V, E>>) + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
{
    Await::new().run(op)
}

/// Names the outcome of a result for log records.
pub(crate) fn outcome<T, E>(res: &Result<T, BridgeError<E>>) -> &'static str {
    match res {
        Ok(_) => "success",
        Err(BridgeError::Wrapped(_)) => "failure",
        Err(BridgeError::TimedOut) => "timed out",
        Err(BridgeError::NoResult) => "no result",
    }
}
