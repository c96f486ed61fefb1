//! Selection and speciation operators for TWEANN populations
//! (spec.md §4.5).

#![warn(clippy::all)]

pub mod candidate;
pub mod distance;
pub mod error;
pub mod hof;
pub mod selector;
pub mod speciation;

pub use candidate::Candidate;
pub use distance::topological_distance;
pub use error::{Result, SelectionError};
pub use hof::HallOfFame;
pub use selector::{rank_proportional_select, tournament_select, truncation_select};
pub use speciation::speciate;
