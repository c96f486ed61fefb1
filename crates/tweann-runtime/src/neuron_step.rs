//! The pure per-cycle neuron computation: aggregate this step's inputs
//! (in configured order, never arrival order), activate, and apply the
//! neuron's plasticity rule to its weights (spec.md §4.2, §5).

use tweann_genotype::{Neuron, SourceId, TargetId};
use tweann_math::DiffMemory;

use crate::error::{Result, RuntimeError};
use crate::message::NeuronInput;

/// One firing of a neuron: its output value plus the post-plasticity
/// weight vector to persist for the next cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronStepResult {
    pub output: f64,
    pub updated_weights: Vec<f64>,
}

/// Reorder this cycle's received inputs to match the neuron's
/// configured input order, regardless of the order they arrived in
/// (spec.md §4.2's "configured, not arrival, input ordering").
fn ordered_inputs<'a>(neuron: &'a Neuron, received: &'a [NeuronInput]) -> Result<Vec<&'a [f64]>> {
    neuron
        .inputs
        .iter()
        .map(|entry| {
            received
                .iter()
                .find(|msg| msg.source == entry.source)
                .map(|msg| msg.values.as_slice())
                .ok_or(RuntimeError::NeuronMailboxClosed(neuron.id()))
        })
        .collect()
}

/// Run one sense-think-act cycle for a single neuron: aggregate this
/// step's inputs in configured order, apply the activation function,
/// then apply the plasticity rule to every weight using the
/// pre-activation inputs and the post-activation output.
pub fn step(neuron: &Neuron, received: &[NeuronInput], diff_memory: &mut DiffMemory) -> Result<NeuronStepResult> {
    let ordered = ordered_inputs(neuron, received)?;
    let weights: Vec<Vec<f64>> = neuron.inputs.iter().map(|e| e.weights.clone()).collect();
    let inputs: Vec<Vec<f64>> = ordered.iter().map(|s| s.to_vec()).collect();

    let aggregate = neuron
        .aggregator_fn
        .aggregate(&inputs, &weights, diff_memory.previous(), 0.0)
        .map_err(|e| RuntimeError::Genotype(e.to_string()))?;
    let output = neuron.activation_fn.apply(aggregate);

    let mut updated_weights = Vec::with_capacity(neuron.weight_count());
    let mut weight_index = 0;
    for (entry_idx, entry) in neuron.inputs.iter().enumerate() {
        for (w_idx, &w) in entry.weights.iter().enumerate() {
            let x_ij = inputs[entry_idx][w_idx];
            let new_w = neuron.plasticity_fn.update_weight(weight_index, x_ij, output, w, &inputs[entry_idx]);
            updated_weights.push(new_w);
            weight_index += 1;
        }
    }

    diff_memory.record(&inputs);

    Ok(NeuronStepResult { output, updated_weights })
}

/// Build the messages a neuron should forward to its downstream targets
/// after firing: every plain output gets the scalar `output` value.
pub fn fan_out(targets: &[TargetId], output: f64) -> Vec<(TargetId, f64)> {
    targets.iter().map(|t| (*t, output)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tweann_genotype::{CortexId, InputEntry, NeuronId, SensorId};
    use tweann_math::{Activation, Aggregator, PlasticityRule};

    fn neuron() -> Neuron {
        let mut n = Neuron::new(NeuronId::new(1), CortexId::new(1), 0, Activation::Linear, Aggregator::Dot, PlasticityRule::None);
        n.inputs.push(InputEntry::new(SourceId::Sensor(SensorId::new(1)), vec![2.0]));
        n.inputs.push(InputEntry::new(SourceId::Bias, vec![1.0]));
        n
    }

    #[test]
    fn inputs_are_reordered_to_configured_order_not_arrival_order() {
        let n = neuron();
        let received = vec![
            NeuronInput { source: SourceId::Bias, values: vec![1.0] },
            NeuronInput { source: SourceId::Sensor(SensorId::new(1)), values: vec![3.0] },
        ];
        let mut mem = DiffMemory::new();
        let result = step(&n, &received, &mut mem).unwrap();
        assert_eq!(result.output, 2.0 * 3.0 + 1.0 * 1.0);
    }

    #[test]
    fn missing_input_is_an_error() {
        let n = neuron();
        let received = vec![NeuronInput { source: SourceId::Bias, values: vec![1.0] }];
        let mut mem = DiffMemory::new();
        assert!(step(&n, &received, &mut mem).is_err());
    }

    #[test]
    fn fan_out_copies_output_to_every_target() {
        let targets = vec![TargetId::Neuron(NeuronId::new(2)), TargetId::Neuron(NeuronId::new(3))];
        let out = fan_out(&targets, 0.5);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(_, v)| *v == 0.5));
    }
}
