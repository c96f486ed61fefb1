//! Sensor, actuator and substrate (CPP/CEP) elements. All four share the
//! same shape (spec.md §3): a name identifying the scape-side function to
//! call, a vector length, the owning scape's identity, and a generation
//! counter — but are kept as distinct types so a neuron's input/output
//! references stay unambiguous at the type level.

use crate::ids::{ActuatorId, CortexId, SensorId, SubstrateCepId, SubstrateCppId};

macro_rules! scape_element {
    ($(#[$meta:meta])* $name:ident, $id:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            id: $id,
            cortex_id: CortexId,
            /// The scape-side function name this element calls
            pub name: String,
            /// Length of the vector this element produces or consumes
            pub vl: usize,
            /// Identity of the scape this element talks to
            pub scape: String,
            generation: u64,
        }

        impl $name {
            /// Construct a new element
            pub fn new(id: $id, cortex_id: CortexId, name: impl Into<String>, vl: usize, scape: impl Into<String>, generation: u64) -> Self {
                Self {
                    id,
                    cortex_id,
                    name: name.into(),
                    vl,
                    scape: scape.into(),
                    generation,
                }
            }

            /// This element's id
            pub fn id(&self) -> $id {
                self.id
            }

            /// The cortex this element belongs to
            pub fn cortex_id(&self) -> CortexId {
                self.cortex_id
            }

            /// The generation this element was last structurally touched at
            pub fn generation(&self) -> u64 {
                self.generation
            }

            /// Advance the generation counter, rejecting regressions
            pub fn set_generation(&mut self, generation: u64) -> Result<(), (u64, u64)> {
                if generation < self.generation {
                    return Err((self.generation, generation));
                }
                self.generation = generation;
                Ok(())
            }
        }
    };
}

scape_element!(
    /// A scape-facing input element (spec.md §3's "Sensor")
    Sensor,
    SensorId
);
scape_element!(
    /// A scape-facing output element (spec.md §3's "Actuator")
    Actuator,
    ActuatorId
);
scape_element!(
    /// A substrate coordinate-preprocessor, used by indirectly-encoded
    /// (HyperNEAT-style) cortices to turn geometry into sensor input
    SubstrateCpp,
    SubstrateCppId
);
scape_element!(
    /// A substrate coordinate-expression-producer, the actuator-side
    /// counterpart of [`SubstrateCpp`]
    SubstrateCep,
    SubstrateCepId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_generation_cannot_regress() {
        let mut s = Sensor::new(SensorId::new(1), CortexId::new(1), "distance", 4, "xor", 0);
        s.set_generation(2).unwrap();
        assert!(s.set_generation(1).is_err());
    }

    #[test]
    fn actuator_carries_vector_length() {
        let a = Actuator::new(ActuatorId::new(1), CortexId::new(1), "move", 2, "pole_balancing", 0);
        assert_eq!(a.vl, 2);
    }
}
