use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Sender};
use kv_log_macro::trace;

use crate::task::executor::run_job;
use crate::task::{Executor, Job};

/// A dedicated thread that runs jobs one at a time, in submission order.
///
/// An *interactive* queue stands for a context that must stay responsive, such as a UI thread:
/// it reports that it does not allow blocking, and lazy futures never force their value on it.
///
/// The thread exits once every handle to the queue is dropped and the queued jobs have run.
///
/// # Examples
///
/// ```
/// use std::sync::mpsc;
///
/// use future_awaits::task::{Executor, SerialQueue};
///
/// # fn main() -> std::io::Result<()> {
/// let queue = SerialQueue::new("ordered")?;
/// let (sender, receiver) = mpsc::channel();
///
/// for i in 0..3 {
///     let sender = sender.clone();
///     queue.execute(Box::new(move || sender.send(i).unwrap()));
/// }
///
/// let order: Vec<i32> = receiver.iter().take(3).collect();
/// assert_eq!(order, [0, 1, 2]);
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct SerialQueue {
    sender: Sender<Job>,
    name: Arc<str>,
    interactive: bool,
}

impl SerialQueue {
    /// Starts a queue whose jobs may block.
    pub fn new(name: impl Into<String>) -> io::Result<SerialQueue> {
        SerialQueue::start(name.into(), false)
    }

    /// Starts a queue whose jobs must never block.
    pub fn interactive(name: impl Into<String>) -> io::Result<SerialQueue> {
        SerialQueue::start(name.into(), true)
    }

    fn start(name: String, interactive: bool) -> io::Result<SerialQueue> {
        let (sender, receiver) = unbounded::<Job>();
        let name: Arc<str> = name.into();

        let thread_name = name.clone();
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                trace!("queue thread started", {
                    queue: &*thread_name,
                    interactive: interactive,
                });

                for job in receiver {
                    run_job(job, &thread_name);
                }

                trace!("queue thread stopped", {
                    queue: &*thread_name,
                });
            })?;

        Ok(SerialQueue {
            sender,
            name,
            interactive,
        })
    }

    /// Returns the name of the queue's thread.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this queue was started with [`SerialQueue::interactive`].
    ///
    /// [`SerialQueue::interactive`]: #method.interactive
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl Executor for SerialQueue {
    fn execute(&self, job: Job) {
        // The queue thread holds the receiver until every handle is gone.
        let _ = self.sender.send(job);
    }

    fn allows_blocking(&self) -> bool {
        !self.interactive
    }
}

impl fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialQueue")
            .field("name", &self.name)
            .field("interactive", &self.interactive)
            .field("queued", &self.sender.len())
            .finish()
    }
}
