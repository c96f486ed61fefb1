//! Error type for mutation operators.

use thiserror::Error;
use tweann_genotype::{GenotypeError, NeuronId, SourceId, TargetId};

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, MutationError>;

/// Failures an operator can hit when it cannot find a legal mutation site
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MutationError {
    /// The genotype has no neuron to pick a mutation site from
    #[error("genotype has no neurons to mutate")]
    EmptyCortex,

    /// No eligible connection existed for this operator to act on
    #[error("no eligible connection found for this operator")]
    NoEligibleConnection,

    /// Adding this connection would duplicate an existing one
    #[error("connection from {source_id:?} to {target:?} already exists on neuron {neuron}")]
    DuplicateConnection {
        neuron: NeuronId,
        source_id: SourceId,
        target: TargetId,
    },

    /// The allowed-function list in the experiment constraints was empty
    #[error("no allowed {0} configured for this experiment")]
    NoAllowedFunctions(&'static str),

    /// The underlying genotype rejected the resulting structure
    #[error(transparent)]
    Genotype(#[from] GenotypeError),
}
