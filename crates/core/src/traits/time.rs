//! Time abstraction for tick-driven timing.
//!
//! Every wait in the control logic is a comparison against a `TimeSource`
//! reading taken once per tick, never a blocking sleep. The host supplies a
//! monotonic clock; tests use [`MockTime`] to step time deterministically.

use core::cell::Cell;

/// Monotonic time source for control loops.
///
/// # Example
///
/// ```
/// use starterbot_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance_ms(20);
/// assert_eq!(time.now_ms(), 20);
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Returns current time in milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u64;

    /// Returns elapsed milliseconds since a reference point.
    ///
    /// Saturates to zero if the reference lies in the future.
    fn elapsed_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

/// Resettable stopwatch measured against tick timestamps.
///
/// The timer does not own a clock. Callers pass the tick's `now_ms`, so one
/// clock reading drives every timer evaluated in the same tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElapsedTimer {
    started_ms: u64,
}

impl ElapsedTimer {
    pub const fn started_at(now_ms: u64) -> Self {
        Self { started_ms: now_ms }
    }

    /// Restart the timer at `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        self.started_ms = now_ms;
    }

    /// Milliseconds since the last reset; zero if `now_ms` precedes it.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    pub fn started_ms(&self) -> u64 {
        self.started_ms
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source with manual advancement.
#[derive(Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

// Safety: MockTime is only used in single-threaded test contexts where Cell
// is safe. The Send + Sync bounds on TimeSource exist for host clocks.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(ms: u64) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set_ms(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the current time by the specified amount.
    pub fn advance_ms(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000);
        assert_eq!(time.now_ms(), 5_000);
    }

    #[test]
    fn mock_time_advance() {
        let time = MockTime::new();
        time.advance_ms(500);
        time.advance_ms(500);
        assert_eq!(time.now_ms(), 1_000);
    }

    #[test]
    fn mock_time_elapsed_since_saturates() {
        let time = MockTime::new();
        time.set_ms(1_000);

        // Reference is in the "future" - should saturate to 0
        assert_eq!(time.elapsed_since(5_000), 0);
        assert_eq!(time.elapsed_since(300), 700);
    }

    #[test]
    fn elapsed_timer_reset() {
        let mut timer = ElapsedTimer::started_at(100);
        assert_eq!(timer.elapsed_ms(350), 250);
        assert_eq!(timer.elapsed_ms(10), 0);

        timer.reset(400);
        assert_eq!(timer.started_ms(), 400);
        assert_eq!(timer.elapsed_ms(1_400), 1_000);
    }
}
