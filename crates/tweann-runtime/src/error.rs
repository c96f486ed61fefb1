//! Error type for the live agent runtime.

use thiserror::Error;
use tweann_genotype::{ActuatorId, NeuronId, SensorId};

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Failures that can occur while an agent is running
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    /// A sensor's mailbox was dropped before it could deliver a percept
    #[error("sensor {0} mailbox closed unexpectedly")]
    SensorMailboxClosed(SensorId),

    /// A neuron's mailbox was dropped before it could deliver an input
    #[error("neuron {0} mailbox closed unexpectedly")]
    NeuronMailboxClosed(NeuronId),

    /// An actuator did not receive a fitness report from its scape
    /// within the configured timeout (spec.md §5's 30-second ceiling)
    #[error("actuator {0} timed out waiting for scape fitness")]
    ActuatorTimedOut(ActuatorId),

    /// The underlying scape callback returned an error
    #[error("scape error: {0}")]
    Scape(String),

    /// A structural invariant of the genotype was violated at spawn time
    #[error("genotype error: {0}")]
    Genotype(String),

    /// A mutation operator failed during the tuning phase
    #[error("mutation error: {0}")]
    Mutation(String),
}

impl From<tweann_genotype::GenotypeError> for RuntimeError {
    fn from(err: tweann_genotype::GenotypeError) -> Self {
        RuntimeError::Genotype(err.to_string())
    }
}

impl From<tweann_scape::ScapeError> for RuntimeError {
    fn from(err: tweann_scape::ScapeError) -> Self {
        RuntimeError::Scape(err.to_string())
    }
}

impl From<tweann_mutation::MutationError> for RuntimeError {
    fn from(err: tweann_mutation::MutationError) -> Self {
        RuntimeError::Mutation(err.to_string())
    }
}
