//! The neuron element: activation/aggregation/plasticity function plus an
//! ordered set of weighted inputs and outputs (spec.md §3, §4.2).

use crate::ids::{CortexId, NeuronId, SourceId, TargetId};
use tweann_math::{Activation, Aggregator, PlasticityRule};

/// One weighted connection from a [`SourceId`] into a neuron. The weight
/// vector's length must equal the source's vector length (vl); a scalar
/// source therefore carries exactly one weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputEntry {
    /// Where this input comes from
    pub source: SourceId,
    /// One weight per element of the source's output vector
    pub weights: Vec<f64>,
    /// Per-weight plasticity parameters, aligned 1:1 with `weights`.
    /// Only consulted by per-weight plasticity rules (`HebbianW`,
    /// `OjasW`); zero elsewhere.
    pub per_weight_params: Vec<f64>,
}

impl InputEntry {
    /// Build an input entry with all per-weight params defaulted to zero
    pub fn new(source: SourceId, weights: Vec<f64>) -> Self {
        let per_weight_params = vec![0.0; weights.len()];
        Self {
            source,
            weights,
            per_weight_params,
        }
    }

    /// Number of weights carried by this input
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether this input carries no weights (never true for a valid genotype)
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// A single evolvable neuron (spec.md §3's "Neuron" element).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neuron {
    id: NeuronId,
    cortex_id: CortexId,
    generation: u64,
    /// The neuron's activation function
    pub activation_fn: Activation,
    /// The neuron's input aggregation function
    pub aggregator_fn: Aggregator,
    /// The plasticity rule applied to this neuron's weights after firing
    pub plasticity_fn: PlasticityRule,
    /// Ordered inputs; order is significant (it is the flattening order
    /// used by per-weight plasticity indexing and by deterministic replay)
    pub inputs: Vec<InputEntry>,
    /// Ordered output targets
    pub outputs: Vec<TargetId>,
    /// Targets that form a feedback loop; always a subset of `outputs`
    pub recurrent_outputs: Vec<TargetId>,
}

impl Neuron {
    /// Construct a neuron with no connections yet
    pub fn new(
        id: NeuronId,
        cortex_id: CortexId,
        generation: u64,
        activation_fn: Activation,
        aggregator_fn: Aggregator,
        plasticity_fn: PlasticityRule,
    ) -> Self {
        Self {
            id,
            cortex_id,
            generation,
            activation_fn,
            aggregator_fn,
            plasticity_fn,
            inputs: Vec::new(),
            outputs: Vec::new(),
            recurrent_outputs: Vec::new(),
        }
    }

    /// This neuron's id
    pub fn id(&self) -> NeuronId {
        self.id
    }

    /// The cortex this neuron belongs to
    pub fn cortex_id(&self) -> CortexId {
        self.cortex_id
    }

    /// The generation this neuron was last structurally touched at
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance this neuron's generation counter. Rejects regressions so
    /// that spec.md §8.1 invariant 4 (monotonic generation) can never be
    /// violated through the public API.
    pub fn set_generation(&mut self, generation: u64) -> Result<(), (u64, u64)> {
        if generation < self.generation {
            return Err((self.generation, generation));
        }
        self.generation = generation;
        Ok(())
    }

    /// Flatten every input's weights into a single ordered vector,
    /// preserving input order. This is the indexing space used by
    /// per-weight plasticity rules and by the runtime's weight-backup
    /// protocol (spec.md §4.3).
    pub fn flat_weights(&self) -> Vec<f64> {
        self.inputs.iter().flat_map(|entry| entry.weights.iter().copied()).collect()
    }

    /// Total number of weights across all inputs
    pub fn weight_count(&self) -> usize {
        self.inputs.iter().map(InputEntry::len).sum()
    }

    /// Overwrite every weight from a flat vector produced by
    /// [`Neuron::flat_weights`] (same order, same length)
    pub fn set_flat_weights(&mut self, flat: &[f64]) {
        let mut cursor = 0;
        for entry in &mut self.inputs {
            let len = entry.weights.len();
            entry.weights.copy_from_slice(&flat[cursor..cursor + len]);
            cursor += len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Neuron {
        let mut n = Neuron::new(
            NeuronId::new(1),
            CortexId::new(1),
            0,
            Activation::Tanh,
            Aggregator::Dot,
            PlasticityRule::None,
        );
        n.inputs.push(InputEntry::new(SourceId::Bias, vec![1.0]));
        n.inputs.push(InputEntry::new(SourceId::Sensor(crate::ids::SensorId::new(1)), vec![0.5, -0.5]));
        n
    }

    #[test]
    fn flat_weights_preserve_input_order() {
        let n = sample();
        assert_eq!(n.flat_weights(), vec![1.0, 0.5, -0.5]);
    }

    #[test]
    fn set_flat_weights_round_trips() {
        let mut n = sample();
        n.set_flat_weights(&[9.0, 1.0, 2.0]);
        assert_eq!(n.inputs[0].weights, vec![9.0]);
        assert_eq!(n.inputs[1].weights, vec![1.0, 2.0]);
    }

    #[test]
    fn generation_cannot_regress() {
        let mut n = sample();
        n.set_generation(5).unwrap();
        assert!(n.set_generation(4).is_err());
        assert_eq!(n.generation(), 5);
    }
}
