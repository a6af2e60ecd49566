//! Error types shared by HAL implementations

use core::fmt;

/// HAL operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Underlying device is not ready for use
    NotReady,
    /// Pin configuration was rejected by the driver
    ConfigRejected(i32),
    /// Line driven before being configured as an output
    NotConfigured,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "device not ready"),
            Self::ConfigRejected(code) => write!(f, "pin configuration rejected (code {})", code),
            Self::NotConfigured => write!(f, "line not configured as output"),
        }
    }
}

impl std::error::Error for HalError {}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;
