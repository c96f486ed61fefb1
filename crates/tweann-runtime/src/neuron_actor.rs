//! The neuron actor: a tokio task that owns one [`Neuron`]'s mutable
//! state (weights, diff memory) exclusively, communicating only through
//! its mailbox (spec.md §5's "no shared mutable state between actors").

use std::collections::HashMap;
use tokio::sync::mpsc::{Receiver, Sender};

use tweann_genotype::{HeredityType, Neuron, SourceId, TargetId};
use tweann_math::{DiffMemory, WEIGHT_BOUND};

use crate::mailbox::{recv_with_timeout, ACTUATE_TIMEOUT};
use crate::message::{ActuatorMessage, NeuronInput, NeuronMessage};
use crate::neuron_step::step;

/// The value a neuron sends to its recurrent outputs before its first
/// cycle, so a downstream neuron whose only first-cycle input is a
/// recurrent edge has a defined value to aggregate against (spec.md
/// §4.3's startup protocol, invariant 5).
const RESET_OUTPUT: f64 = 0.0;

/// Where a neuron forwards its output once it fires
pub enum Downstream {
    Neuron(Sender<NeuronMessage>),
    Actuator(Sender<ActuatorMessage>),
}

async fn forward(outputs: &HashMap<TargetId, Downstream>, target: &TargetId, source: tweann_genotype::NeuronId, value: f64) {
    if let Some(downstream) = outputs.get(target) {
        match downstream {
            Downstream::Neuron(tx) => {
                let _ = tx.send(NeuronMessage::Input(NeuronInput { source: SourceId::Neuron(source), values: vec![value] })).await;
            }
            Downstream::Actuator(tx) => {
                let _ = tx.send(ActuatorMessage::Input { from: source, values: vec![value] }).await;
            }
        }
    }
}

/// Runs one neuron's sense-think-act loop until it receives
/// [`NeuronMessage::Terminate`] or every upstream mailbox closes.
pub async fn run_neuron(mut neuron: Neuron, mut inbox: Receiver<NeuronMessage>, outputs: HashMap<TargetId, Downstream>) {
    let mut diff_memory = DiffMemory::new();
    let mut buffer: Vec<NeuronInput> = Vec::with_capacity(neuron.inputs.len());
    let mut backup = neuron.flat_weights();
    let mut baseline = backup.clone();

    // init_phase2, step 3: emit the reset-output signal to recurrent
    // targets before entering the receive loop, so a downstream neuron
    // whose only first-cycle input is a recurrent edge is never stuck
    // waiting on a value nothing would otherwise send.
    for target in &neuron.recurrent_outputs {
        forward(&outputs, target, neuron.id(), RESET_OUTPUT).await;
    }

    loop {
        let Some(msg) = recv_with_timeout(&mut inbox, ACTUATE_TIMEOUT).await else {
            log::warn!("neuron {} mailbox timed out, terminating", neuron.id());
            return;
        };

        match msg {
            NeuronMessage::Terminate => return,
            NeuronMessage::ResetPrep => {
                buffer.clear();
                diff_memory.reset();
            }
            NeuronMessage::WeightBackup { heredity, reply } => {
                backup = match heredity {
                    HeredityType::Darwinian => baseline.clone(),
                    HeredityType::Lamarckian => neuron.flat_weights(),
                };
                let _ = reply.send(backup.clone());
            }
            NeuronMessage::WeightRestore => {
                neuron.set_flat_weights(&backup);
                baseline = backup.clone();
            }
            NeuronMessage::WeightPerturb { spread, seed } => {
                use rand::SeedableRng;
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                let probability = tweann_mutation::per_weight_probability(backup.len());
                let mut candidate = backup.clone();
                if probability > 0.0 {
                    tweann_mutation::perturb_flat(&mut candidate, spread, probability, WEIGHT_BOUND, &mut rng);
                }
                neuron.set_flat_weights(&candidate);
                tweann_mutation::perturb_plasticity_params(&mut neuron, &mut rng);
            }
            NeuronMessage::AcceptBaseline => {
                baseline = neuron.flat_weights();
            }
            NeuronMessage::Input(input) => {
                buffer.push(input);
                if buffer.len() < neuron.inputs.len() {
                    continue;
                }

                let result = match step(&neuron, &buffer, &mut diff_memory) {
                    Ok(r) => r,
                    Err(err) => {
                        log::error!("neuron {} step failed: {err}", neuron.id());
                        buffer.clear();
                        continue;
                    }
                };
                neuron.set_flat_weights(&result.updated_weights);
                buffer.clear();

                for target in &neuron.outputs {
                    forward(&outputs, target, neuron.id(), result.output).await;
                }
            }
        }
    }
}
