use std::env;
use std::io;
use std::time::Duration;

use kv_log_macro::warn;

use crate::task::ThreadPool;

/// Environment variable overriding the maximum number of pool threads.
const MAX_THREADS_VAR: &str = "FUTURE_AWAITS_MAX_THREADS";

/// Environment variable overriding the idle timeout of pool threads, in milliseconds.
const IDLE_TIMEOUT_VAR: &str = "FUTURE_AWAITS_IDLE_TIMEOUT_MS";

/// Thread pool builder that configures the settings of a new pool.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use future_awaits::task::Builder;
///
/// # fn main() -> std::io::Result<()> {
/// let pool = Builder::new()
///     .name("fetchers")
///     .idle_timeout(Duration::from_millis(500))
///     .max_threads(64)
///     .build()?;
///
/// assert_eq!(pool.name(), "fetchers");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    pub(crate) name: String,
    pub(crate) idle_timeout: Duration,
    pub(crate) max_threads: usize,
}

impl Builder {
    /// Creates a new builder with the default settings.
    #[inline]
    pub fn new() -> Builder {
        Builder {
            name: "future-awaits/worker".to_string(),
            idle_timeout: Duration::from_secs(1),
            max_threads: 10_000,
        }
    }

    /// Creates a new builder, applying overrides from the environment.
    ///
    /// `FUTURE_AWAITS_MAX_THREADS` sets the maximum number of threads and
    /// `FUTURE_AWAITS_IDLE_TIMEOUT_MS` sets the idle timeout. Values that cannot be parsed are
    /// ignored.
    pub fn from_env() -> Builder {
        let mut builder = Builder::new();

        if let Some(max_threads) = read_var(MAX_THREADS_VAR) {
            builder = builder.max_threads(max_threads as usize);
        }
        if let Some(millis) = read_var(IDLE_TIMEOUT_VAR) {
            builder = builder.idle_timeout(Duration::from_millis(millis));
        }

        builder
    }

    /// Configures the name of the worker threads.
    #[inline]
    pub fn name(mut self, name: impl Into<String>) -> Builder {
        self.name = name.into();
        self
    }

    /// Configures how long a surplus thread waits for work before it exits.
    #[inline]
    pub fn idle_timeout(mut self, timeout: Duration) -> Builder {
        self.idle_timeout = timeout;
        self
    }

    /// Configures the maximum number of threads. Jobs queue up once it is reached.
    #[inline]
    pub fn max_threads(mut self, max_threads: usize) -> Builder {
        self.max_threads = max_threads.max(1);
        self
    }

    /// Starts a pool with the configured settings.
    pub fn build(self) -> io::Result<ThreadPool> {
        ThreadPool::from_builder(self)
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

fn read_var(key: &str) -> Option<u64> {
    let value = env::var(key).ok()?;

    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring invalid environment override", {
                key: key,
                value: value.as_str(),
            });
            None
        }
    }
}
