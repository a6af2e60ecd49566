//! Output line abstraction

use crate::error::HalResult;

/// Line configuration directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Input (floating)
    Input,
    /// Output (push-pull)
    Output,
}

/// Logic levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level
    Low,
    /// High level
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl Level {
    /// Returns true for [`Level::High`].
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

/// Driver contract for a single output line (object-safe).
///
/// Handles are shared: the init sequence exercises every line during
/// bring-up, after which exactly one actor drives each line. Callers
/// serialize that handover themselves (the demo uses its startup barrier),
/// so implementations only need interior mutability, not external locking.
pub trait OutputLine: Send + Sync {
    /// Whether the underlying device is ready to be configured.
    fn is_ready(&self) -> bool;

    /// Configure the line direction.
    fn configure(&self, direction: Direction) -> HalResult<()>;

    /// Drive the line to the given level.
    fn set_level(&self, level: Level) -> HalResult<()>;
}
