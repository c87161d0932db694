//! Synchronization primitives.
//!
//! A callback-style operation is handed a [`Completion`]; whoever needs its result holds the
//! matching [`Signal`] and blocks on it, optionally with a deadline.
//!
//! # Examples
//!
//! ```
//! use std::thread;
//! use std::time::{Duration, Instant};
//!
//! use future_awaits::sync::{self, WaitError};
//!
//! let (completion, signal) = sync::channel::<()>();
//!
//! thread::spawn(move || {
//!     thread::sleep(Duration::from_millis(200));
//!     completion.complete(());
//! });
//!
//! let deadline = Instant::now() + Duration::from_millis(10);
//! assert_eq!(signal.wait(Some(deadline)), Err(WaitError::TimedOut));
//! ```
//!
//! [`Completion`]: struct.Completion.html
//! [`Signal`]: struct.Signal.html

pub use signal::{channel, Completion, Signal, WaitError};

pub(crate) use latch::Latch;

mod latch;
mod signal;
