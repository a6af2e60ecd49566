//! Expiration bound for blocking operations.

use std::time::{Duration, Instant};

/// How long a blocking operation is willing to wait.
///
/// Every suspension point in this crate accepts a `Timeout`. `Forever` can
/// only be satisfied by the awaited condition becoming true; there is no
/// cancellation of an in-flight wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until the condition is satisfied.
    Forever,
    /// Give up once the given duration has elapsed.
    After(Duration),
}

impl Timeout {
    /// Convenience constructor for millisecond bounds.
    pub fn from_ms(ms: u64) -> Self {
        Self::After(Duration::from_millis(ms))
    }

    /// Absolute deadline for this timeout, or `None` for `Forever`.
    pub(crate) fn deadline(self) -> Option<Instant> {
        match self {
            Self::Forever => None,
            Self::After(duration) => Some(Instant::now() + duration),
        }
    }
}
