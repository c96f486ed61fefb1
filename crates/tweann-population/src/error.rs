//! Error type for the population manager's generation loop.

use thiserror::Error;
use tweann_genotype::GenotypeId;

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, PopulationError>;

/// Failures that can halt a generation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PopulationError {
    /// A genotype referenced by the population was missing from the
    /// manager's arena (a bookkeeping bug, never expected in practice)
    #[error("genotype {0} is not present in this population's arena")]
    MissingGenotype(GenotypeId),

    /// Every member of a species crashed during evaluation, leaving no
    /// survivor to found the next generation (spec.md §7's
    /// agent-crash failure floor)
    #[error("species {0} lost every member to evaluation failures")]
    SpeciesExtinct(tweann_genotype::SpeciesId),

    /// A mutation operator failed while building an offspring
    #[error("mutation failed while reproducing: {0}")]
    Mutation(String),

    /// A selection operator failed while choosing parents or survivors
    #[error("selection failed: {0}")]
    Selection(String),
}

impl From<tweann_mutation::MutationError> for PopulationError {
    fn from(err: tweann_mutation::MutationError) -> Self {
        PopulationError::Mutation(err.to_string())
    }
}

impl From<tweann_selection::SelectionError> for PopulationError {
    fn from(err: tweann_selection::SelectionError) -> Self {
        PopulationError::Selection(err.to_string())
    }
}
