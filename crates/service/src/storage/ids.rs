use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Millisecond-timestamp ids that never repeat within one clock.
///
/// Each id is the current Unix time in milliseconds, bumped past the last
/// issued (or observed) id when the wall clock has not advanced.
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Record an id that already exists so later ids sort after it.
    pub fn observe(&self, id: i64) {
        self.last.fetch_max(id, Ordering::AcqRel);
    }
}
