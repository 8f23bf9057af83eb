//! Simulated clock
//!
//! Clones share one counter, so the simulation can advance the clock the
//! controller owns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use starterbot_core::traits::TimeSource;

/// Shared, manually advanced millisecond clock
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_ms: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::Relaxed);
    }
}

impl TimeSource for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let clock = SimClock::new();
        let held = clock.clone();
        clock.advance_ms(40);
        assert_eq!(held.now_ms(), 40);
        held.set_ms(5);
        assert_eq!(clock.elapsed_since(2), 3);
    }
}
