//! Wires a [`Genotype`] up into a live cortex of tokio tasks: one per
//! sensor, neuron and actuator, connected exactly as the genotype's
//! input/output references describe (spec.md §5's startup protocol:
//! spawn every actor, then let sensors start driving cycles once the
//! exoself issues the first sync).

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tweann_genotype::{Genotype, GenotypeId, NeuronId, SourceId, TargetId};
use tweann_scape::Scape;

use crate::actuator_actor::run_actuator;
use crate::cortex_actor::CortexHandle;
use crate::mailbox::MAILBOX_CAPACITY;
use crate::message::{ActuatorReport, NeuronMessage};
use crate::neuron_actor::{run_neuron, Downstream};
use crate::sensor_actor::run_sensor;

/// Everything an exoself needs to supervise a spawned cortex
pub struct SpawnedCortex {
    pub handle: CortexHandle,
    pub neuron_controls: HashMap<NeuronId, mpsc::Sender<NeuronMessage>>,
    pub tasks: Vec<JoinHandle<()>>,
}

/// Spawn one cortex's worth of actors from `genotype`, using
/// `scape_factory` to build a fresh scape instance for every sensor and
/// actuator (private scapes get one instance each; callers wanting a
/// shared public scape should have `scape_factory` return clones of a
/// handle to the same underlying state).
pub fn spawn_cortex(genotype: &Genotype, agent: GenotypeId, scape_factory: &impl Fn() -> Box<dyn Scape>) -> SpawnedCortex {
    let mut tasks = Vec::new();
    let mut neuron_inboxes = HashMap::new();
    let mut neuron_senders = HashMap::new();
    for &id in &genotype.cortex().neuron_ids {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        neuron_senders.insert(id, tx);
        neuron_inboxes.insert(id, rx);
    }

    let (report_tx, report_rx) = mpsc::channel::<ActuatorReport>(MAILBOX_CAPACITY);
    let mut actuator_senders = HashMap::new();
    for &id in &genotype.cortex().actuator_ids {
        let actuator = genotype.actuator(id).expect("cortex roster is consistent").clone();
        let expected_inputs = genotype
            .neurons_in_order()
            .filter(|n| n.outputs.contains(&TargetId::Actuator(id)))
            .count();
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        actuator_senders.insert(id, tx);
        let scape = scape_factory();
        let report_tx = report_tx.clone();
        tasks.push(tokio::spawn(run_actuator(actuator, agent, expected_inputs, scape, rx, report_tx)));
    }

    for &id in &genotype.cortex().neuron_ids {
        let neuron = genotype.neuron(id).expect("cortex roster is consistent").clone();
        let rx = neuron_inboxes.remove(&id).expect("inbox was just inserted");

        let mut outputs = HashMap::new();
        for target in &neuron.outputs {
            let downstream = match *target {
                TargetId::Neuron(target_id) => neuron_senders.get(&target_id).cloned().map(Downstream::Neuron),
                TargetId::Actuator(target_id) => actuator_senders.get(&target_id).cloned().map(Downstream::Actuator),
            };
            if let Some(downstream) = downstream {
                outputs.insert(*target, downstream);
            }
        }
        tasks.push(tokio::spawn(run_neuron(neuron, rx, outputs)));
    }

    let mut sensor_syncs = Vec::new();
    for &id in &genotype.cortex().sensor_ids {
        let sensor = genotype.sensor(id).expect("cortex roster is consistent").clone();
        let targets: Vec<_> = genotype
            .neurons_in_order()
            .filter(|n| n.inputs.iter().any(|i| i.source == SourceId::Sensor(id)))
            .filter_map(|n| neuron_senders.get(&n.id()).cloned())
            .collect();
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        sensor_syncs.push(tx);
        let scape = scape_factory();
        tasks.push(tokio::spawn(run_sensor(sensor, agent, scape, rx, targets)));
    }

    let expected_reports = genotype.cortex().actuator_ids.len();
    SpawnedCortex {
        handle: CortexHandle { sensor_syncs, actuator_reports: report_rx, expected_reports },
        neuron_controls: neuron_senders,
        tasks,
    }
}
