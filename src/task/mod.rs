//! Execution contexts.
//!
//! Everything in this crate that runs work concurrently does so by submitting [`Job`]s to an
//! [`Executor`]. The executor is always passed in explicitly; there is no process-wide default.
//!
//! * [`Inline`] runs a job right away on the submitting thread.
//! * [`ThreadPool`] runs jobs on an elastic pool of threads that tolerates blocking jobs.
//! * [`SerialQueue`] runs jobs one at a time on a dedicated thread, and can stand in for an
//!   interactive context where blocking is forbidden.
//!
//! # Examples
//!
//! ```
//! use std::sync::mpsc;
//!
//! use future_awaits::task::{Executor, ThreadPool};
//!
//! # fn main() -> std::io::Result<()> {
//! let pool = ThreadPool::builder().name("demo").build()?;
//! let (sender, receiver) = mpsc::channel();
//!
//! for i in 0..4 {
//!     let sender = sender.clone();
//!     pool.execute(Box::new(move || sender.send(i * i).unwrap()));
//! }
//!
//! let mut squares: Vec<i32> = receiver.iter().take(4).collect();
//! squares.sort();
//! assert_eq!(squares, [0, 1, 4, 9]);
//! # Ok(()) }
//! ```
//!
//! [`Job`]: type.Job.html
//! [`Executor`]: trait.Executor.html
//! [`Inline`]: struct.Inline.html
//! [`ThreadPool`]: struct.ThreadPool.html
//! [`SerialQueue`]: struct.SerialQueue.html

pub use builder::Builder;
pub use executor::{Executor, Inline, Job};
pub use pool::ThreadPool;
pub use queue::SerialQueue;

pub(crate) use run_id::RunId;

mod builder;
mod executor;
mod pool;
mod queue;
mod run_id;
