use std::fmt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use kv_log_macro::{error, trace};

use crate::task::executor::run_job;
use crate::task::{Builder, Executor, Job};
use crate::utils::random;

/// An elastic pool of threads for running blocking jobs.
///
/// The pool always keeps one thread waiting for work. When that thread picks up a job, another
/// one is started, so a job that blocks waiting on a sibling job never starves it. Threads that
/// stay idle longer than the configured timeout retire, except for the last one.
///
/// Handles are cheap to clone and all refer to the same pool. Once every handle is dropped, the
/// worker threads finish the jobs already queued and exit.
///
/// # Examples
///
/// ```
/// use std::sync::mpsc;
///
/// use future_awaits::task::{Executor, ThreadPool};
///
/// # fn main() -> std::io::Result<()> {
/// let pool = ThreadPool::new()?;
/// let (sender, receiver) = mpsc::channel();
///
/// pool.execute(Box::new(move || sender.send(1 + 2).unwrap()));
/// assert_eq!(receiver.recv().unwrap(), 3);
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct ThreadPool {
    sender: Sender<Job>,
    shared: Arc<Shared>,
}

/// State shared between the handles and the worker threads.
///
/// Workers never hold a `Sender`, so the channel disconnects once the last handle is gone.
struct Shared {
    receiver: Receiver<Job>,
    name: String,
    idle_timeout: Duration,
    max_threads: usize,

    /// The number of sleeping worker threads.
    sleeping: AtomicUsize,

    /// The number of live worker threads.
    threads: AtomicUsize,
}

impl ThreadPool {
    /// Creates a pool with the default settings.
    pub fn new() -> io::Result<ThreadPool> {
        Builder::new().build()
    }

    /// Returns a builder for configuring a new pool.
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn from_builder(builder: Builder) -> io::Result<ThreadPool> {
        let (sender, receiver) = unbounded();
        let shared = Arc::new(Shared {
            receiver,
            name: builder.name,
            idle_timeout: builder.idle_timeout,
            max_threads: builder.max_threads.max(1),
            sleeping: AtomicUsize::new(0),
            threads: AtomicUsize::new(0),
        });

        // Start a single worker thread waiting for the first job.
        shared.start_thread()?;

        Ok(ThreadPool { sender, shared })
    }

    /// Returns the number of live worker threads.
    pub fn threads(&self) -> usize {
        self.shared.threads.load(Ordering::SeqCst)
    }

    /// Returns the number of worker threads waiting for work.
    pub fn idle_threads(&self) -> usize {
        self.shared.sleeping.load(Ordering::SeqCst)
    }

    /// Returns the name given to the worker threads.
    pub fn name(&self) -> &str {
        &self.shared.name
    }
}

impl Executor for ThreadPool {
    fn execute(&self, job: Job) {
        // The pool owns a receiver for as long as this handle exists, so this cannot fail.
        if self.sender.send(job).is_err() {
            error!("job dropped by a disconnected pool", {
                pool: self.shared.name.as_str(),
            });
        }
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("name", &self.shared.name)
            .field("threads", &self.threads())
            .field("idle_threads", &self.idle_threads())
            .field("queued", &self.sender.len())
            .finish()
    }
}

impl Shared {
    /// Starts a new worker thread that begins life sleeping.
    fn start_thread(self: &Arc<Self>) -> io::Result<()> {
        self.sleeping.fetch_add(1, Ordering::SeqCst);
        self.threads.fetch_add(1, Ordering::SeqCst);

        let shared = self.clone();
        let spawned = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || shared.main_loop());

        if let Err(err) = spawned {
            self.sleeping.fetch_sub(1, Ordering::SeqCst);
            self.threads.fetch_sub(1, Ordering::SeqCst);
            return Err(err);
        }
        Ok(())
    }

    /// Starts another thread unless the pool is at capacity.
    fn grow(self: &Arc<Self>) {
        if self.threads.load(Ordering::SeqCst) >= self.max_threads {
            return;
        }

        if let Err(err) = self.start_thread() {
            error!("cannot start a pool thread", {
                pool: self.name.as_str(),
                error: err.to_string().as_str(),
            });
        }
    }

    fn main_loop(self: Arc<Self>) {
        // Stagger retirement so idle threads don't all exit at the same moment.
        let jitter = self.idle_timeout / 1000 * random(100);
        let timeout = self.idle_timeout + jitter;

        trace!("pool thread started", {
            pool: self.name.as_str(),
            threads: self.threads.load(Ordering::SeqCst) as u64,
        });

        loop {
            let mut job = match self.receiver.recv_timeout(timeout) {
                Ok(job) => job,
                Err(RecvTimeoutError::Disconnected) => {
                    self.sleeping.fetch_sub(1, Ordering::SeqCst);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Check whether this is the last sleeping thread.
                    if self.sleeping.fetch_sub(1, Ordering::SeqCst) == 1 {
                        // If so, keep it so there is always one thread waiting for work.
                        if self
                            .sleeping
                            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
                            .is_ok()
                        {
                            continue;
                        }
                    }
                    break;
                }
            };

            // If there are no sleeping threads left, start one so the next job doesn't wait
            // behind this one.
            if self.sleeping.fetch_sub(1, Ordering::SeqCst) == 1 {
                self.grow();
            }

            loop {
                run_job(job, &self.name);

                // Try taking another job if there are any available.
                job = match self.receiver.try_recv() {
                    Ok(job) => job,
                    Err(_) => break,
                };
            }

            // If there is at least one sleeping thread, stop this thread instead of putting it
            // to sleep.
            if self.sleeping.load(Ordering::SeqCst) > 0 {
                break;
            }

            self.sleeping.fetch_add(1, Ordering::SeqCst);
        }

        self.threads.fetch_sub(1, Ordering::SeqCst);

        trace!("pool thread retired", {
            pool: self.name.as_str(),
        });
    }
}
