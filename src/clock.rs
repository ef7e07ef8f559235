use std::time::Instant;

/// Monotonic time source for lease arithmetic.
///
/// Lease validation only ever compares two readings of the same
/// clock, so the reading is an [`Instant`] rather than wall-clock
/// time; an instant never goes backwards, which keeps the lease
/// window monotonic even across system clock adjustments.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The default clock, reading [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
