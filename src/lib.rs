//! Blocking bridges for callback-style operations.
//!
//! Plenty of APIs report their outcome through a callback instead of returning it. This crate
//! turns such operations into ordinary blocking calls, runs several of them concurrently while
//! keeping their results in order, and offers lazily evaluated, memoized results that can be
//! composed before anything runs.
//!
//! * [`Await`] runs a single operation and waits for its [`Completion`], optionally with a
//!   timeout.
//! * [`Await::run_all`] and [`MultiAwait`] fan operations out to an executor and gather their
//!   results.
//! * [`Future`] is a lazy result that is computed once and shared by every clone.
//!
//! Where work runs is always chosen explicitly through the execution contexts in [`task`].
//!
//! # Examples
//!
//! Wait for an operation that reports on another thread:
//!
//! ```
//! use std::thread;
//! use std::time::Duration;
//!
//! use future_awaits::sync::Completion;
//! use future_awaits::Await;
//!
//! let res = Await::new()
//!     .timeout(Duration::from_secs(5))
//!     .run(|completion: Completion<Result<u32, String>>| {
//!         thread::spawn(move || completion.succeed(42));
//!     });
//!
//! assert_eq!(res, Ok(42));
//! ```
//!
//! Fetch a few values concurrently and combine them:
//!
//! ```
//! use future_awaits::future::combine;
//! use future_awaits::task::ThreadPool;
//! use future_awaits::{Await, Future};
//!
//! # fn main() -> std::io::Result<()> {
//! let waiter = Await::new().on(ThreadPool::new()?);
//!
//! let width = Future::<u32, String>::new(|| Ok(640));
//! let height = Future::<u32, String>::new(|| Ok(480));
//! let area = combine::combine2(&waiter, &width, &height).map(|(w, h)| w * h);
//!
//! assert_eq!(area.get(), Ok(307_200));
//! # Ok(()) }
//! ```
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade with structured key-value pairs. Waits and fan-outs
//! are traced with a per-run id; panicking jobs and failures to start threads are logged as
//! errors.
//!
//! [`Await`]: struct.Await.html
//! [`Await::run_all`]: struct.Await.html#method.run_all
//! [`Completion`]: sync/struct.Completion.html
//! [`MultiAwait`]: struct.MultiAwait.html
//! [`Future`]: future/struct.Future.html
//! [`task`]: task/index.html
//! [`log`]: https://docs.rs/log

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![allow(clippy::type_complexity)]
#![doc(test(attr(deny(rust_2018_idioms))))]

mod utils;

mod bridge;
mod error;
mod fan_out;

pub mod future;
pub mod result;
pub mod sync;
pub mod task;

pub use bridge::{block_on, Await};
pub use error::{BridgeError, PairError};
pub use fan_out::{MultiAwait, Operation};
pub use future::Future;
