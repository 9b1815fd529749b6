use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Hands out entry ids derived from the wall-clock millisecond timestamp.
///
/// Two calls inside the same millisecond (or after the clock steps backwards)
/// still get distinct ids: the generator never returns a value that is not
/// strictly greater than the previous one.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    last: AtomicI64,
}

impl EntryIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }

    /// Raises the floor so ids handed out later never collide with ids already
    /// present in a hydrated document.
    pub fn observe(&self, existing_id: &str) {
        if let Ok(n) = existing_id.parse::<i64>() {
            self.last.fetch_max(n, Ordering::AcqRel);
        }
    }
}
