//! Lazy, memoized results.
//!
//! A [`Future`] wraps a computation that produces a `Result`. Nothing runs until the value is
//! needed; the first access evaluates it, and every later access, from any thread, sees the same
//! cached outcome.
//!
//! Futures compose: [`map`], [`map_err`], [`and_then`] and [`chain`] build new futures from
//! existing ones without evaluating anything, and the functions in [`combine`] join several
//! futures into one future of a tuple, either one after another or in parallel.
//!
//! # Examples
//!
//! ```
//! use future_awaits::Future;
//!
//! let price = Future::<u32, String>::ok(20);
//! let with_tax = price.map(|p| p * 121 / 100);
//!
//! assert!(!with_tax.is_evaluated());
//! assert_eq!(with_tax.get(), Ok(24));
//! ```
//!
//! [`Future`]: struct.Future.html
//! [`map`]: struct.Future.html#method.map
//! [`map_err`]: struct.Future.html#method.map_err
//! [`and_then`]: struct.Future.html#method.and_then
//! [`chain`]: struct.Future.html#method.chain
//! [`combine`]: combine/index.html

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::thread;

use kv_log_macro::{error, trace};
use log::log_enabled;
use once_cell::sync::Lazy;

use crate::bridge::Await;
use crate::error::{BridgeError, PairError};
use crate::sync::Completion;
use crate::task::Executor;

pub mod combine;

type Builder<V, E> = Box<dyn FnOnce() -> Result<V, E> + Send + 'static>;

/// A lazily evaluated, memoized result.
///
/// The builder given at construction runs at most once, on whichever thread first needs the
/// value; concurrent accesses block until it finishes. Cloning a `Future` is cheap and the clone
/// shares the cache, so the builder still runs only once across all clones.
///
/// Accessing the value blocks, so it must not be done from a context that forbids blocking. The
/// callback methods ([`then`], [`on_success`], [`on_failure`]) take care of that on their own.
///
/// If the builder panics, the panic propagates to the thread that forced it, and any later access
/// panics as well.
///
/// [`then`]: #method.then
/// [`on_success`]: #method.on_success
/// [`on_failure`]: #method.on_failure
pub struct Future<V, E> {
    cell: Arc<Lazy<Result<V, E>, Builder<V, E>>>,
}

impl<V, E> Future<V, E>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Creates a future that evaluates `builder` the first time its value is needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// use future_awaits::Future;
    ///
    /// let calls = Arc::new(AtomicUsize::new(0));
    /// let counter = calls.clone();
    ///
    /// let answer = Future::<_, ()>::new(move || {
    ///     counter.fetch_add(1, Ordering::SeqCst);
    ///     Ok(42)
    /// });
    ///
    /// assert_eq!(calls.load(Ordering::SeqCst), 0);
    /// assert_eq!(answer.get(), Ok(42));
    /// assert_eq!(answer.clone().get(), Ok(42));
    /// assert_eq!(calls.load(Ordering::SeqCst), 1);
    /// ```
    pub fn new<F>(builder: F) -> Future<V, E>
    where
        F: FnOnce() -> Result<V, E> + Send + 'static,
    {
        let builder: Builder<V, E> = Box::new(move || {
            let res = builder();
            if log_enabled!(log::Level::Trace) {
                trace!("future evaluated", {
                    success: res.is_ok(),
                });
            }
            res
        });

        Future {
            cell: Arc::new(Lazy::new(builder)),
        }
    }

    /// Creates a future holding an already known result.
    pub fn ready(result: Result<V, E>) -> Future<V, E> {
        Future::new(move || result)
    }

    /// Creates a future holding a success value.
    pub fn ok(value: V) -> Future<V, E> {
        Future::ready(Ok(value))
    }

    /// Creates a future holding an error.
    pub fn err(err: E) -> Future<V, E> {
        Future::ready(Err(err))
    }

    /// Evaluates the future if needed and returns a reference to its result.
    ///
    /// Blocks while the value is being computed.
    pub fn result(&self) -> &Result<V, E> {
        Lazy::force(&self.cell)
    }

    /// Evaluates the future if needed and returns a copy of its result.
    ///
    /// Blocks while the value is being computed.
    pub fn get(&self) -> Result<V, E>
    where
        V: Clone,
        E: Clone,
    {
        self.result().clone()
    }

    /// Returns `true` if the value has already been computed.
    pub fn is_evaluated(&self) -> bool {
        Lazy::get(&self.cell).is_some()
    }

    /// Returns a future that applies `f` to this future's success value.
    ///
    /// Errors pass through unchanged.
    pub fn map<U, F>(&self, f: F) -> Future<U, E>
    where
        F: FnOnce(&V) -> U + Send + 'static,
        U: Send + Sync + 'static,
        E: Clone,
    {
        let this = self.clone();
        Future::new(move || match this.result() {
            Ok(value) => Ok(f(value)),
            Err(err) => Err(err.clone()),
        })
    }

    /// Returns a future that applies `f` to this future's error.
    ///
    /// Success values pass through unchanged.
    pub fn map_err<E2, F>(&self, f: F) -> Future<V, E2>
    where
        F: FnOnce(&E) -> E2 + Send + 'static,
        E2: Send + Sync + 'static,
        V: Clone,
    {
        let this = self.clone();
        Future::new(move || match this.result() {
            Ok(value) => Ok(value.clone()),
            Err(err) => Err(f(err)),
        })
    }

    /// Returns a future that, once this one succeeds, continues with the future `f` returns.
    ///
    /// `f` only runs after this future has been evaluated, and never if it failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use future_awaits::Future;
    ///
    /// let user_id = Future::<u32, &str>::ok(7);
    /// let profile = user_id.and_then(|id| Future::ok(format!("user #{}", id)));
    ///
    /// assert_eq!(profile.get(), Ok("user #7".to_string()));
    /// ```
    pub fn and_then<U, F>(&self, f: F) -> Future<U, E>
    where
        F: FnOnce(&V) -> Future<U, E> + Send + 'static,
        U: Clone + Send + Sync + 'static,
        E: Clone,
    {
        let this = self.clone();
        Future::new(move || match this.result() {
            Ok(value) => f(value).get(),
            Err(err) => Err(err.clone()),
        })
    }

    /// Like [`and_then`], for a continuation with a different error type.
    ///
    /// The resulting error tells which stage failed.
    ///
    /// [`and_then`]: #method.and_then
    pub fn chain<U, E2, F>(&self, f: F) -> Future<U, PairError<E, E2>>
    where
        F: FnOnce(&V) -> Future<U, E2> + Send + 'static,
        U: Clone + Send + Sync + 'static,
        E2: Clone + Send + Sync + 'static,
        E: Clone,
    {
        let this = self.clone();
        Future::new(move || match this.result() {
            Ok(value) => f(value).get().map_err(PairError::Second),
            Err(err) => Err(PairError::First(err.clone())),
        })
    }

    /// Evaluates the future in the background and passes its result to `callback`.
    ///
    /// The callback runs on `executor`. If the executor forbids blocking, the future is evaluated
    /// on a helper thread first and only the callback itself is sent to the executor.
    ///
    /// Returns `self` so that more callbacks can be registered.
    pub fn then<X, F>(&self, executor: &X, callback: F) -> &Future<V, E>
    where
        X: Executor + Clone + 'static,
        F: FnOnce(&Result<V, E>) + Send + 'static,
    {
        let this = self.clone();

        if executor.allows_blocking() || self.is_evaluated() {
            executor.execute(Box::new(move || callback(this.result())));
            return self;
        }

        let executor = executor.clone();
        let spawned = thread::Builder::new()
            .name("future-awaits/then".to_string())
            .spawn(move || {
                this.result();
                executor.execute(Box::new(move || callback(this.result())));
            });

        if let Err(err) = spawned {
            error!("cannot start a thread to evaluate a future", {
                error: err.to_string().as_str(),
            });
        }

        self
    }

    /// Evaluates the future in the background and calls `callback` if it succeeded.
    pub fn on_success<X, F>(&self, executor: &X, callback: F) -> &Future<V, E>
    where
        X: Executor + Clone + 'static,
        F: FnOnce(&V) + Send + 'static,
    {
        self.then(executor, move |res| {
            if let Ok(value) = res {
                callback(value);
            }
        })
    }

    /// Evaluates the future in the background and calls `callback` if it failed.
    ///
    /// For futures built from callback-style operations this includes timeouts and missing
    /// results; see [`on_error`] for the operation's own errors only.
    ///
    /// [`on_error`]: #method.on_error
    pub fn on_failure<X, F>(&self, executor: &X, callback: F) -> &Future<V, E>
    where
        X: Executor + Clone + 'static,
        F: FnOnce(&E) + Send + 'static,
    {
        self.then(executor, move |res| {
            if let Err(err) = res {
                callback(err);
            }
        })
    }
}

impl<V, E> Future<V, BridgeError<E>>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Creates a future that runs a callback-style operation through `config` when evaluated.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread;
    ///
    /// use future_awaits::sync::Completion;
    /// use future_awaits::{Await, Future};
    ///
    /// let lookup = Future::from_callback(&Await::new(), |done: Completion<Result<u16, ()>>| {
    ///     thread::spawn(move || done.succeed(8080));
    /// });
    ///
    /// assert_eq!(lookup.get(), Ok(8080));
    /// ```
    pub fn from_callback<F>(config: &Await, op: F) -> Future<V, BridgeError<E>>
    where
        F: FnOnce(Completion<Result<V, E>>) + Send + 'static,
    {
        let config = config.clone();
        Future::new(move || config.run(op))
    }

    /// Evaluates the future in the background and calls `callback` with the operation's own
    /// error, if it reported one.
    ///
    /// Timeouts and missing results are ignored.
    pub fn on_error<X, F>(&self, executor: &X, callback: F) -> &Future<V, BridgeError<E>>
    where
        X: Executor + Clone + 'static,
        F: FnOnce(&E) + Send + 'static,
    {
        self.then(executor, move |res| {
            if let Err(BridgeError::Wrapped(err)) = res {
                callback(err);
            }
        })
    }
}

impl<V> Future<V, Infallible>
where
    V: Send + Sync + 'static,
{
    /// Evaluates a future that cannot fail and returns a reference to its value.
    pub fn value(&self) -> &V {
        match self.result() {
            Ok(value) => value,
            Err(never) => match *never {},
        }
    }
}

impl<V, E> Clone for Future<V, E> {
    fn clone(&self) -> Future<V, E> {
        Future {
            cell: self.cell.clone(),
        }
    }
}

impl<V, E> From<&Future<V, E>> for Future<V, E> {
    fn from(other: &Future<V, E>) -> Future<V, E> {
        other.clone()
    }
}

impl<V, E> From<Result<V, E>> for Future<V, E>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn from(result: Result<V, E>) -> Future<V, E> {
        Future::ready(result)
    }
}

impl<V: fmt::Debug, E: fmt::Debug> fmt::Debug for Future<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Lazy::get(&self.cell) {
            Some(res) => f.debug_tuple("Future").field(res).finish(),
            None => f.pad("Future { <unevaluated> }"),
        }
    }
}
