/// Counter of consecutive qualifying frames.
///
/// Pure value type: increments only while the target label keeps appearing,
/// and drops straight back to zero on any gap. No gradual decay.
#[derive(Debug, Default)]
pub struct DebounceCounter {
    count: u32,
}

impl DebounceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more qualifying frame and return the new count.
    pub fn increment(&mut self) -> u32 {
        self.count += 1;
        self.count
    }

    /// Reset the count to zero.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(DebounceCounter::new().count(), 0);
    }

    #[test]
    fn test_increment_returns_new_count() {
        let mut counter = DebounceCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.increment(), 3);
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn test_reset_drops_to_zero() {
        let mut counter = DebounceCounter::new();
        counter.increment();
        counter.increment();
        counter.reset();
        assert_eq!(counter.count(), 0);

        // Counting restarts from scratch after a reset.
        assert_eq!(counter.increment(), 1);
    }
}
