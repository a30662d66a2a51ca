//! Wall-clock abstraction used to stamp order submissions and status changes.
//!
//! Services never call `Utc::now()` directly: they read time through a
//! [`ClockSource`] so tests can pin timestamps to known values.

use chrono::{DateTime, Utc};

/// Abstraction over the system clock for dependency injection.
///
/// The default implementation ([`SystemClock`]) delegates to [`Utc::now`].
pub trait ClockSource: Send + Sync {
    /// Returns the current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Default clock source that reads the real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant. Handy for tests and replay tooling.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl ClockSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
