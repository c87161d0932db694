use std::sync::{Condvar, Mutex};
use std::time::Instant;

use crate::utils::lock;

/// A countdown that releases its waiter once every participant has checked in.
#[derive(Debug)]
pub(crate) struct Latch {
    /// How many participants have not checked in yet.
    remaining: Mutex<usize>,

    /// Notified when `remaining` reaches zero.
    released: Condvar,
}

impl Latch {
    /// Creates a latch waiting for `count` participants.
    pub(crate) fn new(count: usize) -> Latch {
        Latch {
            remaining: Mutex::new(count),
            released: Condvar::new(),
        }
    }

    /// Checks one participant in.
    pub(crate) fn count_down(&self) {
        let mut remaining = lock(&self.remaining);
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.released.notify_all();
        }
    }

    /// Blocks until every participant has checked in.
    ///
    /// Returns `false` if the deadline passed first.
    pub(crate) fn wait(&self, deadline: Option<Instant>) -> bool {
        let mut remaining = lock(&self.remaining);

        while *remaining > 0 {
            remaining = match deadline {
                None => self
                    .released
                    .wait(remaining)
                    .unwrap_or_else(|err| err.into_inner()),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.released
                        .wait_timeout(remaining, deadline - now)
                        .unwrap_or_else(|err| err.into_inner())
                        .0
                }
            };
        }

        true
    }
}
