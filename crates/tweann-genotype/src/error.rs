//! Error type for genotype construction and validation failures.

use crate::ids::{ActuatorId, CortexId, NeuronId, SensorId, SourceId, TargetId};
use thiserror::Error;

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, GenotypeError>;

/// Failures that can arise while building or mutating a genotype graph
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GenotypeError {
    /// A neuron's input references a source that does not exist in the
    /// same cortex (spec.md §8.1 invariant 1)
    #[error("neuron {neuron} has a dangling input reference {source_id:?}")]
    DanglingInput { neuron: NeuronId, source_id: SourceId },

    /// A neuron's output references a target that does not exist in the
    /// same cortex (spec.md §8.1 invariant 2)
    #[error("neuron {neuron} has a dangling output reference {target:?}")]
    DanglingOutput { neuron: NeuronId, target: TargetId },

    /// An input's weight vector length does not match its source's
    /// vector length (spec.md §8.1 invariant 3)
    #[error("neuron {neuron} input from {source_id:?} has {got} weights, source vl is {expected}")]
    WeightLengthMismatch {
        neuron: NeuronId,
        source_id: SourceId,
        expected: usize,
        got: usize,
    },

    /// A neuron attempted to move to an earlier generation than it
    /// already recorded (spec.md §8.1 invariant 4)
    #[error("neuron {neuron} generation would regress from {from} to {to}")]
    GenerationRegression { neuron: NeuronId, from: u64, to: u64 },

    /// A recurrent output is not also present in the plain output list
    /// (spec.md §8.1 invariant 5)
    #[error("neuron {neuron} marks {target:?} recurrent but it is not a declared output")]
    RecurrentOutputNotDeclared { neuron: NeuronId, target: TargetId },

    /// A cortex referenced a neuron/sensor/actuator id that is not in
    /// this genotype's arenas
    #[error("cortex {cortex} references unknown element {element}")]
    UnknownCortexMember { cortex: CortexId, element: String },

    /// Lookup of a neuron that is not present in the arena
    #[error("unknown neuron {0}")]
    UnknownNeuron(NeuronId),

    /// Lookup of a sensor that is not present in the arena
    #[error("unknown sensor {0}")]
    UnknownSensor(SensorId),

    /// Lookup of an actuator that is not present in the arena
    #[error("unknown actuator {0}")]
    UnknownActuator(ActuatorId),
}
