//! Error type for selection operators.

use thiserror::Error;

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Failures a selector can hit when given a degenerate candidate pool
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SelectionError {
    /// A selector was asked to choose from zero candidates
    #[error("no candidates to select from")]
    EmptyPool,

    /// A tournament's requested size exceeds the candidate pool
    #[error("tournament size {requested} exceeds pool size {available}")]
    TournamentTooLarge { requested: usize, available: usize },
}
