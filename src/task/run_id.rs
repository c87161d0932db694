use crossbeam_utils::atomic::AtomicCell;

/// A unique identifier for one bridge run or fan-out, used to correlate log records.
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub(crate) struct RunId(u64);

impl RunId {
    /// Generates a new `RunId`.
    pub(crate) fn generate() -> RunId {
        static COUNTER: AtomicCell<u64> = AtomicCell::new(1u64);

        RunId(COUNTER.fetch_add(1))
    }

    /// Returns the id as a plain number.
    pub(crate) fn as_u64(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::RunId;

    #[test]
    fn ids_increase() {
        let first = RunId::generate();
        let second = RunId::generate();
        assert_ne!(first, second);
        assert!(second.as_u64() > first.as_u64());
    }
}
