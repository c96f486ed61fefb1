//! Error type for the experiment controller (spec.md §4.6, §7).

use thiserror::Error;
use tweann_genotype::ExperimentId;

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, ExperimentError>;

/// Failures the experiment controller can surface
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// The caller asked to run an experiment that has already completed
    /// every configured run
    #[error("experiment {0} has already completed all runs")]
    AlreadyCompleted(ExperimentId),

    /// The population manager failed hard enough to abandon the current run
    #[error("run {run} of experiment {experiment} failed: {source}")]
    RunFailed {
        /// The experiment being run
        experiment: ExperimentId,
        /// 1-based run index that failed
        run: u32,
        /// The underlying population-manager error
        #[source]
        source: tweann_population::PopulationError,
    },

    /// Persistence retries were exhausted (spec.md §7's storage-failure case)
    #[error("storage failure persisting {what} after {attempts} attempts: {source}")]
    StorageExhausted {
        /// What was being persisted
        what: String,
        /// Number of attempts made before giving up
        attempts: u32,
        /// The underlying storage error
        #[source]
        source: tweann_storage::StorageError,
    },

    /// Encoding or decoding a persisted record failed
    #[error("failed to (de)serialize {what}: {reason}")]
    Codec {
        /// What was being encoded or decoded
        what: String,
        /// Failure description
        reason: String,
    },

    /// Writing a report file failed
    #[error("failed to write report file: {0}")]
    Report(#[from] std::io::Error),
}
