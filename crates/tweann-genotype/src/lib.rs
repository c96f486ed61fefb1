//! Typed genotype, population and experiment data model (spec.md §3).
//!
//! This crate owns every id and struct that makes up an agent's brain
//! and the evolutionary bookkeeping around it; it depends only on
//! `tweann-math` for the pure activation/aggregation/plasticity
//! functions a neuron carries. Mutation, selection and the live actor
//! runtime are built on top of these types in their own crates.

#![warn(clippy::all)]

pub mod cortex;
pub mod error;
pub mod experiment;
pub mod genotype;
pub mod ids;
pub mod neuron;
pub mod population;
pub mod sensor_actuator;
pub mod trace;

pub use cortex::Cortex;
pub use error::{GenotypeError, Result};
pub use experiment::{
    Experiment, ExperimentConstraints, Halt, HeredityType, ProgressFlag, TieBreak, TuningDuration, TuningSelection,
};
pub use genotype::Genotype;
pub use ids::{
    ActuatorId, CortexId, ExperimentId, GenotypeId, NeuronId, PopulationId, SensorId, SourceId, SpeciesId,
    SubstrateCepId, SubstrateCppId, TargetId,
};
pub use neuron::{InputEntry, Neuron};
pub use population::{Population, Species};
pub use sensor_actuator::{Actuator, Sensor, SubstrateCep, SubstrateCpp};
pub use trace::{GenerationTrace, RunTrace, SpeciesTrace};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_reexports_resolve() {
        let _ = crate::Halt::Continue;
        let _ = crate::TieBreak::default();
    }
}
