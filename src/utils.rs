use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if a previous holder panicked.
///
/// Every critical section in this crate only moves data in or out of the guarded value, so a
/// panic can never leave it half-updated.
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns a cheap pseudo-random number below `n`, for spreading out idle-thread retirement.
pub(crate) fn random(n: u32) -> u32 {
    use std::cell::Cell;
    use std::num::Wrapping;

    thread_local! {
        static STATE: Cell<Wrapping<u32>> = Cell::new(Wrapping(0x53DE_55A7));
    }

    STATE.with(|state| {
        // xorshift32
        let mut bits = state.get();
        bits ^= bits << 13;
        bits ^= bits >> 17;
        bits ^= bits << 5;
        state.set(bits);

        // Scale into `0..n` with a widening multiply instead of a division.
        ((u64::from(bits.0) * u64::from(n)) >> 32) as u32
    })
}

/// Returns a printable description of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}

#[cfg(test)]
mod tests {
    use super::random;

    #[test]
    fn random_stays_in_range() {
        for n in [1, 2, 7, 100, u32::MAX].iter().copied() {
            for _ in 0..1000 {
                assert!(random(n) < n);
            }
        }
        assert_eq!(random(0), 0);
    }

    #[test]
    fn random_varies() {
        let first = random(1_000_000);
        assert!((0..100).any(|_| random(1_000_000) != first));
    }
}
