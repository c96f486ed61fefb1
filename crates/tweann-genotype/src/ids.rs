//! Opaque identifiers for every element of the data model (spec.md §3).
//!
//! Every id is a newtype around a monotonically issued `u64` token; the
//! arena that owns an element type is the only thing that mints new
//! ids, so a caller can never forge a reference into a foreign genotype.

use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw token. Only arenas should call this directly.
            pub const fn new(token: u64) -> Self {
                Self(token)
            }

            /// The underlying token
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifies a neuron within its cortex
    NeuronId
);
opaque_id!(
    /// Identifies a sensor within its cortex
    SensorId
);
opaque_id!(
    /// Identifies an actuator within its cortex
    ActuatorId
);
opaque_id!(
    /// Identifies a substrate coordinate-preprocessor element
    SubstrateCppId
);
opaque_id!(
    /// Identifies a substrate coordinate-expression-producer element
    SubstrateCepId
);
opaque_id!(
    /// Identifies a cortex (the set of sensors/neurons/actuators of one agent)
    CortexId
);
opaque_id!(
    /// Identifies a complete agent genotype
    GenotypeId
);
opaque_id!(
    /// Identifies a species within a population
    SpeciesId
);
opaque_id!(
    /// Identifies a population snapshot (one generation's worth of species)
    PopulationId
);
opaque_id!(
    /// Identifies an experiment
    ExperimentId
);

/// A reference to whatever may feed a neuron's input: another neuron, a
/// sensor, or the distinguished bias term (spec.md §3 data model note 6:
/// "bias is a single-weight source whose position in the input order is
/// significant").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceId {
    /// Another neuron in the same cortex
    Neuron(NeuronId),
    /// A sensor in the same cortex
    Sensor(SensorId),
    /// The distinguished bias source, always of vector length one
    Bias,
}

/// A reference to whatever a neuron or substrate element may feed: another
/// neuron or an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetId {
    /// Another neuron in the same cortex
    Neuron(NeuronId),
    /// An actuator in the same cortex
    Actuator(ActuatorId),
}
