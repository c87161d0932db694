use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use kv_log_macro::error;

use crate::utils::panic_message;

/// A unit of work submitted to an [`Executor`].
///
/// [`Executor`]: trait.Executor.html
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// An execution context that jobs can be submitted to.
///
/// Submission is fire-and-forget: the executor decides when and on which thread a job runs. An
/// executor may also drop a job without running it, for example while shutting down; callers that
/// wait on the job's outcome observe that as "no result".
pub trait Executor: Send + Sync {
    /// Submits a job for execution.
    fn execute(&self, job: Job);

    /// Returns `false` if jobs on this context must never block, as is the case for a UI thread.
    ///
    /// Blocking operations such as forcing a lazy [`Future`] are moved off of such contexts.
    ///
    /// [`Future`]: ../future/struct.Future.html
    fn allows_blocking(&self) -> bool {
        true
    }
}

impl<X: Executor + ?Sized> Executor for Arc<X> {
    #[inline]
    fn execute(&self, job: Job) {
        (**self).execute(job)
    }

    #[inline]
    fn allows_blocking(&self) -> bool {
        (**self).allows_blocking()
    }
}

impl<X: Executor + ?Sized> Executor for &X {
    #[inline]
    fn execute(&self, job: Job) {
        (**self).execute(job)
    }

    #[inline]
    fn allows_blocking(&self) -> bool {
        (**self).allows_blocking()
    }
}

/// Runs every job immediately on the thread that submits it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// use future_awaits::task::{Executor, Inline};
///
/// let ran = Arc::new(AtomicBool::new(false));
/// let flag = ran.clone();
///
/// Inline.execute(Box::new(move || flag.store(true, Ordering::SeqCst)));
/// assert!(ran.load(Ordering::SeqCst));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Inline;

impl Executor for Inline {
    #[inline]
    fn execute(&self, job: Job) {
        job()
    }
}

/// Runs a job on a worker thread, keeping the thread alive if the job panics.
pub(crate) fn run_job(job: Job, context: &str) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        error!("job panicked", {
            context: context,
            message: panic_message(&*payload),
        });
    }
}
