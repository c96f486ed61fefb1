//! The genotype arena: a safe, opaque-index graph of neurons, sensors and
//! actuators (spec.md §9's "represent the neuron set as an arena with
//! opaque indices" design note).
//!
//! Elements never outlive the arena and edges are stored as ids rather
//! than references, so the graph can contain cycles (recurrent
//! connections) without borrow-checker friction. Ids are minted by a
//! per-arena monotonic counter and are never reused, which keeps stale
//! references from a removed element from ever aliasing a fresh one.

use std::collections::HashMap;

use crate::cortex::Cortex;
use crate::error::{GenotypeError, Result};
use crate::ids::{ActuatorId, CortexId, GenotypeId, NeuronId, SensorId, SourceId, SubstrateCepId, SubstrateCppId, TargetId};
use crate::neuron::Neuron;
use crate::sensor_actuator::{Actuator, Sensor, SubstrateCep, SubstrateCpp};

/// A complete agent: one cortex plus the arenas backing its elements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genotype {
    id: GenotypeId,
    cortex: Cortex,
    neurons: HashMap<NeuronId, Neuron>,
    sensors: HashMap<SensorId, Sensor>,
    actuators: HashMap<ActuatorId, Actuator>,
    substrate_cpps: HashMap<SubstrateCppId, SubstrateCpp>,
    substrate_ceps: HashMap<SubstrateCepId, SubstrateCep>,
    next_token: u64,
}

impl Genotype {
    /// Create an empty genotype with a fresh cortex
    pub fn new(id: GenotypeId, cortex_id: CortexId) -> Self {
        Self {
            id,
            cortex: Cortex::new(cortex_id),
            neurons: HashMap::new(),
            sensors: HashMap::new(),
            actuators: HashMap::new(),
            substrate_cpps: HashMap::new(),
            substrate_ceps: HashMap::new(),
            next_token: 0,
        }
    }

    /// This genotype's id
    pub fn id(&self) -> GenotypeId {
        self.id
    }

    /// Read-only access to the cortex roster
    pub fn cortex(&self) -> &Cortex {
        &self.cortex
    }

    /// Clone this genotype under a fresh id, for reproduction. Internal
    /// element ids are preserved (they are only meaningful relative to
    /// this genotype's own arenas).
    pub fn fork(&self, new_id: GenotypeId) -> Genotype {
        let mut offspring = self.clone();
        offspring.id = new_id;
        offspring
    }

    fn fresh_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    /// Mint a fresh neuron id and insert it, registering it on the cortex roster
    pub fn insert_neuron(&mut self, mut build: impl FnMut(NeuronId) -> Neuron) -> NeuronId {
        let id = NeuronId::new(self.fresh_token());
        self.neurons.insert(id, build(id));
        self.cortex.neuron_ids.push(id);
        id
    }

    /// Mint a fresh sensor id and insert it
    pub fn insert_sensor(&mut self, mut build: impl FnMut(SensorId) -> Sensor) -> SensorId {
        let id = SensorId::new(self.fresh_token());
        self.sensors.insert(id, build(id));
        self.cortex.sensor_ids.push(id);
        id
    }

    /// Mint a fresh actuator id and insert it
    pub fn insert_actuator(&mut self, mut build: impl FnMut(ActuatorId) -> Actuator) -> ActuatorId {
        let id = ActuatorId::new(self.fresh_token());
        self.actuators.insert(id, build(id));
        self.cortex.actuator_ids.push(id);
        id
    }

    /// Mint a fresh substrate CPP id and insert it
    pub fn insert_substrate_cpp(&mut self, mut build: impl FnMut(SubstrateCppId) -> SubstrateCpp) -> SubstrateCppId {
        let id = SubstrateCppId::new(self.fresh_token());
        self.substrate_cpps.insert(id, build(id));
        self.cortex.substrate_cpp_ids.push(id);
        id
    }

    /// Mint a fresh substrate CEP id and insert it
    pub fn insert_substrate_cep(&mut self, mut build: impl FnMut(SubstrateCepId) -> SubstrateCep) -> SubstrateCepId {
        let id = SubstrateCepId::new(self.fresh_token());
        self.substrate_ceps.insert(id, build(id));
        self.cortex.substrate_cep_ids.push(id);
        id
    }

    /// Remove a neuron and every dangling reference to it, from both
    /// other neurons' inputs/outputs and the cortex roster. Mutation
    /// operators use this rather than raw map removal so the arena can
    /// never be left with a dangling edge.
    pub fn remove_neuron(&mut self, id: NeuronId) -> Option<Neuron> {
        let removed = self.neurons.remove(&id)?;
        self.cortex.neuron_ids.retain(|n| *n != id);
        for neuron in self.neurons.values_mut() {
            neuron.inputs.retain(|entry| entry.source != SourceId::Neuron(id));
            neuron.outputs.retain(|t| *t != TargetId::Neuron(id));
            neuron.recurrent_outputs.retain(|t| *t != TargetId::Neuron(id));
        }
        Some(removed)
    }

    /// Borrow a neuron by id
    pub fn neuron(&self, id: NeuronId) -> Result<&Neuron> {
        self.neurons.get(&id).ok_or(GenotypeError::UnknownNeuron(id))
    }

    /// Mutably borrow a neuron by id
    pub fn neuron_mut(&mut self, id: NeuronId) -> Result<&mut Neuron> {
        self.neurons.get_mut(&id).ok_or(GenotypeError::UnknownNeuron(id))
    }

    /// Borrow a sensor by id
    pub fn sensor(&self, id: SensorId) -> Result<&Sensor> {
        self.sensors.get(&id).ok_or(GenotypeError::UnknownSensor(id))
    }

    /// Borrow an actuator by id
    pub fn actuator(&self, id: ActuatorId) -> Result<&Actuator> {
        self.actuators.get(&id).ok_or(GenotypeError::UnknownActuator(id))
    }

    /// All neurons, in cortex declaration order
    pub fn neurons_in_order(&self) -> impl Iterator<Item = &Neuron> {
        self.cortex.neuron_ids.iter().filter_map(|id| self.neurons.get(id))
    }

    /// Number of neurons in this genotype
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// The vector length produced by a source, used to validate weight
    /// vector lengths against invariant 3
    fn source_vl(&self, source: SourceId) -> Option<usize> {
        match source {
            SourceId::Bias => Some(1),
            SourceId::Sensor(id) => self.sensors.get(&id).map(|s| s.vl),
            SourceId::Neuron(_) => Some(1),
        }
    }

    /// Check every structural invariant from spec.md §8.1:
    /// 1. every input reference resolves within this cortex,
    /// 2. every output reference resolves within this cortex,
    /// 3. an input's weight count matches its source's vector length,
    /// 5. recurrent outputs are a subset of declared outputs.
    ///
    /// Invariant 4 (monotonic generation) is enforced procedurally by
    /// [`Neuron::set_generation`] and so needs no snapshot check here.
    /// Invariant 6 (bias ordering) holds by construction: bias is just
    /// another `SourceId` entry and input order is preserved verbatim.
    pub fn validate(&self) -> Result<()> {
        for neuron in self.neurons.values() {
            for entry in &neuron.inputs {
                let source_exists = match entry.source {
                    SourceId::Bias => true,
                    SourceId::Neuron(id) => self.neurons.contains_key(&id),
                    SourceId::Sensor(id) => self.sensors.contains_key(&id),
                };
                if !source_exists {
                    return Err(GenotypeError::DanglingInput {
                        neuron: neuron.id(),
                        source_id: entry.source,
                    });
                }

                if let Some(expected) = self.source_vl(entry.source) {
                    if entry.weights.len() != expected {
                        return Err(GenotypeError::WeightLengthMismatch {
                            neuron: neuron.id(),
                            source_id: entry.source,
                            expected,
                            got: entry.weights.len(),
                        });
                    }
                }
            }

            for target in &neuron.outputs {
                let target_exists = match *target {
                    TargetId::Neuron(id) => self.neurons.contains_key(&id),
                    TargetId::Actuator(id) => self.actuators.contains_key(&id),
                };
                if !target_exists {
                    return Err(GenotypeError::DanglingOutput {
                        neuron: neuron.id(),
                        target: *target,
                    });
                }
            }

            for target in &neuron.recurrent_outputs {
                if !neuron.outputs.contains(target) {
                    return Err(GenotypeError::RecurrentOutputNotDeclared {
                        neuron: neuron.id(),
                        target: *target,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neuron::InputEntry;
    use tweann_math::{Activation, Aggregator, PlasticityRule};

    fn fresh() -> (Genotype, SensorId, ActuatorId) {
        let mut g = Genotype::new(GenotypeId::new(1), CortexId::new(1));
        let sensor = g.insert_sensor(|id| Sensor::new(id, CortexId::new(1), "in", 2, "xor", 0));
        let actuator = g.insert_actuator(|id| Actuator::new(id, CortexId::new(1), "out", 1, "xor", 0));
        (g, sensor, actuator)
    }

    #[test]
    fn freshly_wired_genotype_validates() {
        let (mut g, sensor, actuator) = fresh();
        let n = g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.1, 0.2]));
            n.inputs.push(InputEntry::new(SourceId::Bias, vec![1.0]));
            n.outputs.push(TargetId::Actuator(actuator));
            n
        });
        assert!(g.validate().is_ok());
        assert_eq!(g.neuron_count(), 1);
        let _ = n;
    }

    #[test]
    fn dangling_output_is_rejected() {
        let (mut g, sensor, _actuator) = fresh();
        g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.1, 0.2]));
            n.outputs.push(TargetId::Actuator(ActuatorId::new(999)));
            n
        });
        assert!(matches!(g.validate(), Err(GenotypeError::DanglingOutput { .. })));
    }

    #[test]
    fn weight_length_mismatch_is_rejected() {
        let (mut g, sensor, actuator) = fresh();
        g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.1]));
            n.outputs.push(TargetId::Actuator(actuator));
            n
        });
        assert!(matches!(g.validate(), Err(GenotypeError::WeightLengthMismatch { .. })));
    }

    #[test]
    fn recurrent_output_must_be_declared() {
        let (mut g, sensor, actuator) = fresh();
        g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.1, 0.2]));
            n.outputs.push(TargetId::Actuator(actuator));
            n.recurrent_outputs.push(TargetId::Neuron(NeuronId::new(77)));
            n
        });
        assert!(matches!(g.validate(), Err(GenotypeError::RecurrentOutputNotDeclared { .. })));
    }

    #[test]
    fn removing_a_neuron_scrubs_references_to_it() {
        let (mut g, sensor, actuator) = fresh();
        let a = g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.1, 0.2]));
            n
        });
        let b = g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Neuron(a), vec![0.5]));
            n.outputs.push(TargetId::Actuator(actuator));
            n
        });
        g.remove_neuron(a);
        assert!(g.neuron(a).is_err());
        let remaining = g.neuron(b).unwrap();
        assert!(remaining.inputs.is_empty());
        assert!(g.validate().is_ok());
    }
}
