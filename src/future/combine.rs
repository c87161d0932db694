//! Joining several futures into one.
//!
//! Two families are provided for two to six futures:
//!
//! * `wait*` evaluates the futures strictly one after another, from left to right. The first
//!   failure ends the chain and the futures after it are never evaluated.
//! * `combine*` evaluates the futures in parallel on the execution context of an [`Await`] and
//!   puts the values back in argument order, whatever order they finished in.
//!
//! Each function has an `_omitting_errors` variant that keeps going past failures and leaves the
//! failed slots empty.
//!
//! [`combine2`] accepts two futures with unrelated error types and reports failures as a
//! [`PairError`]. The other arities share one error type; futures with different error types can
//! be joined after converting them to a common one with [`Future::map_err`].
//!
//! # Examples
//!
//! ```
//! use future_awaits::future::combine;
//! use future_awaits::task::ThreadPool;
//! use future_awaits::{Await, BridgeError, Future};
//!
//! # fn main() -> std::io::Result<()> {
//! let waiter = Await::new().on(ThreadPool::new()?);
//!
//! let id = Future::<u32, &str>::ok(7);
//! let name = Future::<String, &str>::ok("ferris".to_string());
//! let missing = Future::<bool, &str>::err("not found");
//!
//! assert_eq!(combine::wait2(&id, &name).get(), Ok((7, "ferris".to_string())));
//! assert_eq!(
//!     combine::combine3(&waiter, &id, &name, &missing).get(),
//!     Err(BridgeError::Wrapped("not found")),
//! );
//! assert_eq!(
//!     combine::wait3_omitting_errors(&id, &name, &missing).get(),
//!     Ok((Some(7), Some("ferris".to_string()), None)),
//! );
//! # Ok(()) }
//! ```
//!
//! [`Await`]: ../../struct.Await.html
//! [`combine2`]: fn.combine2.html
//! [`PairError`]: ../../enum.PairError.html
//! [`Future::map_err`]: ../struct.Future.html#method.map_err

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::mem;
use std::sync::{Arc, Mutex};

use crate::bridge::Await;
use crate::error::{BridgeError, PairError};
use crate::fan_out::{scatter, MultiAwait, Operation, Policy};
use crate::future::Future;
use crate::utils::lock;

/// Evaluates two futures one after the other and pairs up their values.
pub fn wait2<T0, T1, E>(f0: &Future<T0, E>, f1: &Future<T1, E>) -> Future<(T0, T1), E>
where
    T0: Clone + Send + Sync + 'static,
    T1: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let f1 = f1.clone();
    f0.and_then(move |v0| {
        let v0 = v0.clone();
        f1.map(move |v1| (v0, v1.clone()))
    })
}

/// Each arity chains one more future onto the one below it.
macro_rules! wait_fn {
    (
        $(#[$attr:meta])*
        $name:ident => $prev:ident($($T:ident $f:ident $v:ident),+), $TL:ident $fl:ident $vl:ident
    ) => {
        $(#[$attr])*
        pub fn $name<$($T,)+ $TL, E>(
            $($f: &Future<$T, E>,)+
            $fl: &Future<$TL, E>,
        ) -> Future<($($T,)+ $TL), E>
        where
            $($T: Clone + Send + Sync + 'static,)+
            $TL: Clone + Send + Sync + 'static,
            E: Clone + Send + Sync + 'static,
        {
            let $fl = $fl.clone();
            $prev($($f),+).and_then(move |($($v,)+)| {
                let ($($v,)+) = ($($v.clone(),)+);
                $fl.map(move |$vl| ($($v,)+ $vl.clone()))
            })
        }
    };
}

wait_fn! {
    /// Evaluates three futures one after the other and collects their values.
    wait3 => wait2(T0 f0 v0, T1 f1 v1), T2 f2 v2
}

wait_fn! {
    /// Evaluates four futures one after the other and collects their values.
    wait4 => wait3(T0 f0 v0, T1 f1 v1, T2 f2 v2), T3 f3 v3
}

wait_fn! {
    /// Evaluates five futures one after the other and collects their values.
    wait5 => wait4(T0 f0 v0, T1 f1 v1, T2 f2 v2, T3 f3 v3), T4 f4 v4
}

wait_fn! {
    /// Evaluates six futures one after the other and collects their values.
    wait6 => wait5(T0 f0 v0, T1 f1 v1, T2 f2 v2, T3 f3 v3, T4 f4 v4), T5 f5 v5
}

macro_rules! wait_omitting_errors_fn {
    ($(#[$attr:meta])* $name:ident($($T:ident $f:ident),+)) => {
        $(#[$attr])*
        pub fn $name<$($T,)+ E>(
            $($f: &Future<$T, E>,)+
        ) -> Future<($(Option<$T>,)+), Infallible>
        where
            $($T: Clone + Send + Sync + 'static,)+
            E: Send + Sync + 'static,
        {
            $(let $f = $f.clone();)+
            // Tuple fields are evaluated left to right.
            Future::new(move || Ok(($($f.result().as_ref().ok().cloned(),)+)))
        }
    };
}

wait_omitting_errors_fn! {
    /// Evaluates two futures one after the other, keeping whichever values succeeded.
    wait2_omitting_errors(T0 f0, T1 f1)
}

wait_omitting_errors_fn! {
    /// Evaluates three futures one after the other, keeping whichever values succeeded.
    wait3_omitting_errors(T0 f0, T1 f1, T2 f2)
}

wait_omitting_errors_fn! {
    /// Evaluates four futures one after the other, keeping whichever values succeeded.
    wait4_omitting_errors(T0 f0, T1 f1, T2 f2, T3 f3)
}

wait_omitting_errors_fn! {
    /// Evaluates five futures one after the other, keeping whichever values succeeded.
    wait5_omitting_errors(T0 f0, T1 f1, T2 f2, T3 f3, T4 f4)
}

wait_omitting_errors_fn! {
    /// Evaluates six futures one after the other, keeping whichever values succeeded.
    wait6_omitting_errors(T0 f0, T1 f1, T2 f2, T3 f3, T4 f4, T5 f5)
}

/// Every arity runs one unit job per future through the fan-out and stores each value into its
/// own slot of a shared tuple. These arities share one error type.
macro_rules! combine_fn {
    (
        $(#[$attr:meta])*
        $name:ident,
        $(#[$omit_attr:meta])*
        $omit:ident,
        ($($T:ident $f:ident $idx:tt),+)
    ) => {
        $(#[$attr])*
        pub fn $name<$($T,)+ E>(
            config: &Await,
            $($f: &Future<$T, E>,)+
        ) -> Future<($($T,)+), BridgeError<E>>
        where
            $($T: Clone + Send + Sync + 'static,)+
            E: Clone + Send + Sync + 'static,
        {
            let config = config.clone();
            $(let $f = $f.clone();)+

            Future::new(move || {
                let slots = Arc::new(Mutex::new(($(None::<$T>,)+)));
                let ops: Vec<Operation<(), E>> = vec![$({
                    let slots = slots.clone();
                    Box::new(move || -> Result<(), BridgeError<E>> {
                        let value = $f.get().map_err(BridgeError::Wrapped)?;
                        lock(&slots).$idx = Some(value);
                        Ok(())
                    }) as Operation<(), E>
                },)+];

                scatter(&config, ops, Policy::FailFast)?;

                let mut slots = lock(&slots);
                Ok(($(slots.$idx.take().ok_or(BridgeError::NoResult)?,)+))
            })
        }

        $(#[$omit_attr])*
        pub fn $omit<$($T,)+ E>(
            config: &Await,
            $($f: &Future<$T, E>,)+
        ) -> Future<($(Option<$T>,)+), BridgeError<E>>
        where
            $($T: Clone + Send + Sync + 'static,)+
            E: Send + Sync + 'static,
        {
            let config = config.clone();
            $(let $f = $f.clone();)+

            Future::new(move || {
                let slots = Arc::new(Mutex::new(($(None::<$T>,)+)));
                let ops: Vec<Operation<(), E>> = vec![$({
                    let slots = slots.clone();
                    Box::new(move || {
                        if let Ok(value) = $f.result() {
                            lock(&slots).$idx = Some(value.clone());
                        }
                        Ok(())
                    }) as Operation<(), E>
                },)+];

                // The jobs never fail, so only the wait itself can.
                scatter(&config, ops, Policy::FailFast)?;

                let taken = mem::take(&mut *lock(&slots));
                Ok(taken)
            })
        }
    };
}

/// Evaluates two futures in parallel and pairs up their values.
///
/// The two futures may fail with different error types; the error tells which one failed. The
/// first failure observed becomes the result. Timeouts of `config` apply to waiting for both
/// futures.
///
/// # Examples
///
/// ```
/// use future_awaits::future::combine;
/// use future_awaits::task::ThreadPool;
/// use future_awaits::{Await, BridgeError, Future, PairError};
///
/// # fn main() -> std::io::Result<()> {
/// let waiter = Await::new().on(ThreadPool::new()?);
///
/// let port = Future::<u16, std::num::ParseIntError>::new(|| "8080".parse());
/// let host = Future::<String, &str>::err("unknown host");
///
/// assert_eq!(
///     combine::combine2(&waiter, &port, &host).get(),
///     Err(BridgeError::Wrapped(PairError::Second("unknown host"))),
/// );
/// # Ok(()) }
/// ```
pub fn combine2<T0, T1, E0, E1>(
    config: &Await,
    f0: &Future<T0, E0>,
    f1: &Future<T1, E1>,
) -> Future<(T0, T1), BridgeError<PairError<E0, E1>>>
where
    T0: Clone + Send + Sync + 'static,
    T1: Clone + Send + Sync + 'static,
    E0: Clone + Send + Sync + 'static,
    E1: Clone + Send + Sync + 'static,
{
    let waiter = MultiAwait::from(config.clone());
    let f0 = f0.clone();
    let f1 = f1.clone();

    Future::new(move || {
        waiter.run(
            move || f0.get().map_err(BridgeError::Wrapped),
            move || f1.get().map_err(BridgeError::Wrapped),
        )
    })
}

/// Evaluates two futures in parallel, keeping whichever values succeeded.
///
/// Fails only if waiting for the futures fails.
pub fn combine2_omitting_errors<T0, T1, E0, E1>(
    config: &Await,
    f0: &Future<T0, E0>,
    f1: &Future<T1, E1>,
) -> Future<(Option<T0>, Option<T1>), BridgeError<PairError<E0, E1>>>
where
    T0: Clone + Send + Sync + 'static,
    T1: Clone + Send + Sync + 'static,
    E0: Clone + Send + Sync + 'static,
    E1: Clone + Send + Sync + 'static,
{
    let waiter = MultiAwait::from(config.clone());
    let f0 = f0.clone();
    let f1 = f1.clone();

    Future::new(move || {
        waiter.run_omitting_errors(
            move || f0.get().map_err(BridgeError::Wrapped),
            move || f1.get().map_err(BridgeError::Wrapped),
        )
    })
}

combine_fn! {
    /// Evaluates three futures in parallel and collects their values.
    combine3,
    /// Evaluates three futures in parallel, keeping whichever values succeeded.
    combine3_omitting_errors,
    (T0 f0 0, T1 f1 1, T2 f2 2)
}

combine_fn! {
    /// Evaluates four futures in parallel and collects their values.
    combine4,
    /// Evaluates four futures in parallel, keeping whichever values succeeded.
    combine4_omitting_errors,
    (T0 f0 0, T1 f1 1, T2 f2 2, T3 f3 3)
}

combine_fn! {
    /// Evaluates five futures in parallel and collects their values.
    combine5,
    /// Evaluates five futures in parallel, keeping whichever values succeeded.
    combine5_omitting_errors,
    (T0 f0 0, T1 f1 1, T2 f2 2, T3 f3 3, T4 f4 4)
}

combine_fn! {
    /// Evaluates six futures in parallel and collects their values.
    combine6,
    /// Evaluates six futures in parallel, keeping whichever values succeeded.
    combine6_omitting_errors,
    (T0 f0 0, T1 f1 1, T2 f2 2, T3 f3 3, T4 f4 4, T5 f5 5)
}

/// Evaluates any number of futures of the same type in parallel and collects their values in
/// order.
///
/// The first failure observed becomes the result. An empty list yields an empty vector.
pub fn combine_all<V, E>(config: &Await, futures: &[Future<V, E>]) -> Future<Vec<V>, BridgeError<E>>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let config = config.clone();
    let futures = futures.to_vec();

    Future::new(move || {
        config.run_all(
            futures
                .into_iter()
                .map(|future| move || future.get().map_err(BridgeError::Wrapped)),
        )
    })
}

/// Evaluates any number of futures of the same type in parallel and collects the successful
/// values by position.
///
/// Fails only if every future fails, with the last failure observed.
pub fn combine_all_omitting_errors<V, E>(
    config: &Await,
    futures: &[Future<V, E>],
) -> Future<BTreeMap<usize, V>, BridgeError<E>>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let config = config.clone();
    let futures = futures.to_vec();

    Future::new(move || {
        config.run_omitting_errors(
            futures
                .into_iter()
                .map(|future| move || future.get().map_err(BridgeError::Wrapped)),
        )
    })
}
