//! Running independent operations concurrently and gathering their results.
//!
//! Every fan-out submits one job per operation to the [`Await`]'s execution context and then
//! blocks until all of them have reported, or until the `Await`'s timeout passes. Two gathering
//! policies exist:
//!
//! * *fail-fast* – the first failure observed decides the outcome; successes are returned in the
//!   order the operations were given, whatever order they finished in.
//! * *omitting errors* – failures are dropped and only the successes are returned, keyed by the
//!   position of their operation.
//!
//! [`Await`]: ../struct.Await.html

use std::collections::BTreeMap;
use std::mem;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kv_log_macro::trace;
use log::log_enabled;

use crate::bridge::{outcome, Await};
use crate::error::{BridgeError, PairError};
use crate::sync::Latch;
use crate::task::{Executor, RunId};
use crate::utils::lock;

/// A boxed operation for the homogeneous fan-out.
///
/// Useful for collecting differently-written closures into one list.
pub type Operation<V, E> = Box<dyn FnOnce() -> Result<V, BridgeError<E>> + Send + 'static>;

/// How a fan-out treats failed operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Policy {
    FailFast,
    OmitErrors,
}

/// The shared state every job of one fan-out writes into.
struct Gather<V, E> {
    successes: Mutex<BTreeMap<usize, V>>,
    failure: Mutex<Option<BridgeError<E>>>,
    latch: Latch,
    policy: Policy,
}

impl<V, E> Gather<V, E> {
    fn has_failed(&self) -> bool {
        lock(&self.failure).is_some()
    }

    fn succeed(&self, index: usize, value: V) {
        lock(&self.successes).insert(index, value);
    }

    fn fail(&self, err: BridgeError<E>) {
        let mut failure = lock(&self.failure);
        match self.policy {
            Policy::FailFast => {
                if failure.is_none() {
                    *failure = Some(err);
                }
            }
            Policy::OmitErrors => *failure = Some(err),
        }
    }
}

/// Checks a job in with the latch when dropped.
///
/// A job that is dropped unrun, or that panics, never sets `reported` and counts as `NoResult`.
struct Ticket<V, E> {
    gather: Arc<Gather<V, E>>,
    reported: bool,
}

impl<V, E> Drop for Ticket<V, E> {
    fn drop(&mut self) {
        if !self.reported {
            self.gather.fail(BridgeError::NoResult);
        }
        self.gather.latch.count_down();
    }
}

/// Runs every operation as its own job and gathers the outcomes by position.
pub(crate) fn scatter<V, E>(
    config: &Await,
    ops: Vec<Operation<V, E>>,
    policy: Policy,
) -> Result<BTreeMap<usize, V>, BridgeError<E>>
where
    V: Send + 'static,
    E: Send + 'static,
{
    let run_id = RunId::generate();
    let deadline = config.deadline();

    trace!("fan-out", {
        run_id: run_id.as_u64(),
        tasks: ops.len() as u64,
        fail_fast: policy == Policy::FailFast,
    });

    let gather = Arc::new(Gather {
        successes: Mutex::new(BTreeMap::new()),
        failure: Mutex::new(None),
        latch: Latch::new(ops.len()),
        policy,
    });

    for (index, op) in ops.into_iter().enumerate() {
        let mut ticket = Ticket {
            gather: gather.clone(),
            reported: false,
        };

        config.executor().execute(Box::new(move || {
            let gather = &ticket.gather;

            // Once the outcome is decided there is no point in starting more work.
            if gather.policy == Policy::FailFast && gather.has_failed() {
                ticket.reported = true;
                return;
            }

            match op() {
                Ok(value) => gather.succeed(index, value),
                Err(err) => gather.fail(err),
            }
            ticket.reported = true;
        }));
    }

    if !gather.latch.wait(deadline) {
        trace!("fan-out timed out", {
            run_id: run_id.as_u64(),
        });
        return Err(BridgeError::TimedOut);
    }

    let successes = mem::take(&mut *lock(&gather.successes));
    let failure = lock(&gather.failure).take();

    let res = match (policy, failure) {
        (Policy::FailFast, Some(err)) => Err(err),
        (Policy::OmitErrors, Some(err)) if successes.is_empty() => Err(err),
        _ => Ok(successes),
    };

    if log_enabled!(log::Level::Trace) {
        trace!("fan-out completed", {
            run_id: run_id.as_u64(),
            outcome: outcome(&res),
        });
    }

    res
}

impl Await {
    /// Runs all operations concurrently and collects their values in order.
    ///
    /// The first failure observed becomes the result; operations that haven't started by then
    /// are skipped. An empty list succeeds with an empty vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread;
    /// use std::time::Duration;
    ///
    /// use future_awaits::task::ThreadPool;
    /// use future_awaits::{Await, Operation};
    ///
    /// # fn main() -> std::io::Result<()> {
    /// let waiter = Await::new().on(ThreadPool::new()?);
    ///
    /// let ops: Vec<Operation<u32, ()>> = vec![
    ///     Box::new(|| {
    ///         thread::sleep(Duration::from_millis(20));
    ///         Ok(1)
    ///     }),
    ///     Box::new(|| Ok(2)),
    /// ];
    ///
    /// assert_eq!(waiter.run_all(ops), Ok(vec![1, 2]));
    /// # Ok(()) }
    /// ```
    pub fn run_all<V, E, I, F>(&self, ops: I) -> Result<Vec<V>, BridgeError<E>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Result<V, BridgeError<E>> + Send + 'static,
        V: Send + 'static,
        E: Send + 'static,
    {
        let ops = ops
            .into_iter()
            .map(|op| Box::new(op) as Operation<V, E>)
            .collect();

        let values = scatter(self, ops, Policy::FailFast)?;
        Ok(values.into_iter().map(|(_, value)| value).collect())
    }

    /// Runs all operations concurrently and collects the successful values by position.
    ///
    /// Failed operations are left out. Only when every operation fails is the last failure
    /// observed returned. An empty list succeeds with an empty map.
    pub fn run_omitting_errors<V, E, I, F>(
        &self,
        ops: I,
    ) -> Result<BTreeMap<usize, V>, BridgeError<E>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Result<V, BridgeError<E>> + Send + 'static,
        V: Send + 'static,
        E: Send + 'static,
    {
        let ops = ops
            .into_iter()
            .map(|op| Box::new(op) as Operation<V, E>)
            .collect();

        scatter(self, ops, Policy::OmitErrors)
    }
}

/// Runs two operations with unrelated value and error types concurrently.
///
/// This is the heterogeneous counterpart of [`Await::run_all`]: the values come back as a tuple,
/// and the error says which of the two operations failed.
///
/// [`Await::run_all`]: struct.Await.html#method.run_all
///
/// # Examples
///
/// ```
/// use future_awaits::task::ThreadPool;
/// use future_awaits::{BridgeError, MultiAwait, PairError};
///
/// # fn main() -> std::io::Result<()> {
/// let waiter = MultiAwait::new().on(ThreadPool::new()?);
///
/// let res = waiter.run(
///     || Ok::<_, BridgeError<()>>(7),
///     || Err::<String, _>(BridgeError::Wrapped("offline")),
/// );
/// assert_eq!(res, Err(BridgeError::Wrapped(PairError::Second("offline"))));
///
/// let res = waiter.run_omitting_errors(
///     || Ok::<_, BridgeError<()>>(7),
///     || Err::<String, _>(BridgeError::Wrapped("offline")),
/// );
/// assert_eq!(res, Ok((Some(7), None)));
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, Default)]
pub struct MultiAwait {
    config: Await,
}

impl MultiAwait {
    /// Creates a `MultiAwait` that runs operations inline and waits without a deadline.
    pub fn new() -> MultiAwait {
        MultiAwait {
            config: Await::new(),
        }
    }

    /// Runs operations on `executor`.
    pub fn on<X: Executor + 'static>(self, executor: X) -> MultiAwait {
        MultiAwait {
            config: self.config.on(executor),
        }
    }

    /// Gives up waiting once `timeout` has passed.
    pub fn timeout(self, timeout: Duration) -> MultiAwait {
        MultiAwait {
            config: self.config.timeout(timeout),
        }
    }

    /// Runs both operations concurrently and pairs up their values.
    ///
    /// The first failure observed becomes the result. Timeouts and missing results reported by
    /// either operation pass through as they are.
    pub fn run<T0, T1, E0, E1, F0, F1>(
        &self,
        op0: F0,
        op1: F1,
    ) -> Result<(T0, T1), BridgeError<PairError<E0, E1>>>
    where
        F0: FnOnce() -> Result<T0, BridgeError<E0>> + Send + 'static,
        F1: FnOnce() -> Result<T1, BridgeError<E1>> + Send + 'static,
        T0: Send + 'static,
        T1: Send + 'static,
        E0: Send + 'static,
        E1: Send + 'static,
    {
        let slots = Arc::new(Mutex::new((None, None)));
        let ops = pair(&slots, op0, op1, Policy::FailFast);

        scatter(&self.config, ops, Policy::FailFast)?;

        let taken = mem::take(&mut *lock(&slots));
        match taken {
            (Some(v0), Some(v1)) => Ok((v0, v1)),
            _ => Err(BridgeError::NoResult),
        }
    }

    /// Runs both operations concurrently, keeping whichever values succeeded.
    ///
    /// Failed operations leave their slot empty. An error is returned only if the wait itself
    /// fails, by timing out or by a job being dropped unrun.
    pub fn run_omitting_errors<T0, T1, E0, E1, F0, F1>(
        &self,
        op0: F0,
        op1: F1,
    ) -> Result<(Option<T0>, Option<T1>), BridgeError<PairError<E0, E1>>>
    where
        F0: FnOnce() -> Result<T0, BridgeError<E0>> + Send + 'static,
        F1: FnOnce() -> Result<T1, BridgeError<E1>> + Send + 'static,
        T0: Send + 'static,
        T1: Send + 'static,
        E0: Send + 'static,
        E1: Send + 'static,
    {
        let slots = Arc::new(Mutex::new((None, None)));
        let ops = pair(&slots, op0, op1, Policy::OmitErrors);

        // Operand failures are swallowed by the jobs, so only the wait itself can fail here.
        scatter(&self.config, ops, Policy::FailFast)?;

        let taken = mem::take(&mut *lock(&slots));
        Ok(taken)
    }
}

impl From<Await> for MultiAwait {
    /// Uses the execution context and timeout of `config`.
    fn from(config: Await) -> MultiAwait {
        MultiAwait { config }
    }
}

type Slots<T0, T1> = Arc<Mutex<(Option<T0>, Option<T1>)>>;

/// Wraps two operations into unit jobs that store their values into a shared pair of slots.
fn pair<T0, T1, E0, E1, F0, F1>(
    slots: &Slots<T0, T1>,
    op0: F0,
    op1: F1,
    policy: Policy,
) -> Vec<Operation<(), PairError<E0, E1>>>
where
    F0: FnOnce() -> Result<T0, BridgeError<E0>> + Send + 'static,
    F1: FnOnce() -> Result<T1, BridgeError<E1>> + Send + 'static,
    T0: Send + 'static,
    T1: Send + 'static,
    E0: Send + 'static,
    E1: Send + 'static,
{
    let first = {
        let slots = slots.clone();
        Box::new(move || match op0() {
            Ok(value) => {
                lock(&slots).0 = Some(value);
                Ok(())
            }
            Err(_) if policy == Policy::OmitErrors => Ok(()),
            Err(err) => Err(err.map(PairError::First)),
        }) as Operation<(), PairError<E0, E1>>
    };

    let second = {
        let slots = slots.clone();
        Box::new(move || match op1() {
            Ok(value) => {
                lock(&slots).1 = Some(value);
                Ok(())
            }
            Err(_) if policy == Policy::OmitErrors => Ok(()),
            Err(err) => Err(err.map(PairError::Second)),
        }) as Operation<(), PairError<E0, E1>>
    };

    vec![first, second]
}
