//! The cortex: the set of sensor/neuron/actuator ids that make up one
//! agent's brain (spec.md §3, §4.2).

use crate::ids::{ActuatorId, CortexId, NeuronId, SensorId, SubstrateCepId, SubstrateCppId};

/// The membership roster of one agent's neural network. Element bodies
/// live in the owning [`crate::genotype::Genotype`]'s arenas; a `Cortex`
/// only records which ids belong to it and in what order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cortex {
    id: CortexId,
    /// Sensors feeding this cortex, in declaration order
    pub sensor_ids: Vec<SensorId>,
    /// Neurons, in declaration order
    pub neuron_ids: Vec<NeuronId>,
    /// Actuators driven by this cortex, in declaration order
    pub actuator_ids: Vec<ActuatorId>,
    /// Substrate coordinate-preprocessors, if this cortex is indirectly encoded
    pub substrate_cpp_ids: Vec<SubstrateCppId>,
    /// Substrate coordinate-expression-producers, if indirectly encoded
    pub substrate_cep_ids: Vec<SubstrateCepId>,
}

impl Cortex {
    /// Construct an empty cortex with the given id
    pub fn new(id: CortexId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// This cortex's id
    pub fn id(&self) -> CortexId {
        self.id
    }

    /// Whether this cortex uses indirect (substrate) encoding
    pub fn is_substrate_encoded(&self) -> bool {
        !self.substrate_cpp_ids.is_empty() || !self.substrate_cep_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cortex_has_no_members() {
        let c = Cortex::new(CortexId::new(1));
        assert!(c.neuron_ids.is_empty());
        assert!(!c.is_substrate_encoded());
    }
}
