//! Error type for scape callbacks.

use thiserror::Error;

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, ScapeError>;

/// Failures a scape callback can report back to the actuator that called it
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScapeError {
    /// The scape rejected an actuation vector of the wrong length
    #[error("actuation vector has {got} elements, scape expects {expected}")]
    ArityMismatch { expected: usize, got: usize },

    /// The scape's internal state could not produce a result (e.g. an
    /// environment that has already terminated this episode)
    #[error("scape '{scape}' is not accepting input: {reason}")]
    NotAccepting { scape: String, reason: String },
}
