//! Error types for distlock
//!
//! Logical outcomes such as "key already locked" are not errors; they are
//! reported through the result values of the lease manager. The variants here
//! cover malformed input and environment failures only.

/// Application-specific error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DistlockError {
    #[error("invalid lease duration: {0}")]
    InvalidDuration(String),

    #[error("lease duration {requested_ms}ms exceeds the maximum of {max_ms}ms")]
    DurationOutOfRange { requested_ms: u128, max_ms: u128 },

    #[error("invalid duration unit '{0}', expected one of: ns, ms, s")]
    InvalidDurationUnit(String),

    #[error("no tokio runtime available: {0}")]
    RuntimeUnavailable(String),
}

pub type Result<T> = std::result::Result<T, DistlockError>;
