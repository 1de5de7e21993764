use chrono::{DateTime, Utc};

/// Wall-clock source used for expiry computation.
///
/// Injected rather than read ambiently so that expiry logic is
/// deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
