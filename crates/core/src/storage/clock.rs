//! Time source for the path allocator.
//!
//! Date buckets and filename timestamps both come from a single `now()`
//! capture, taken through this trait so tests can pin the date.

use chrono::{DateTime, Utc};

/// Wall-clock abstraction.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
