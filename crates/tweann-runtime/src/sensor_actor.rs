//! The sensor actor: polls its scape once per `Sync` message and
//! forwards the percept to every downstream neuron (spec.md §4.2).

use tokio::sync::mpsc::{Receiver, Sender};

use tweann_genotype::{GenotypeId, Sensor, SourceId};
use tweann_scape::Scape;

use crate::message::{NeuronInput, NeuronMessage, SensorMessage};

/// Runs one sensor's loop until it receives [`SensorMessage::Terminate`]
/// or its mailbox closes.
pub async fn run_sensor(
    sensor: Sensor,
    agent: GenotypeId,
    mut scape: Box<dyn Scape>,
    mut inbox: Receiver<SensorMessage>,
    targets: Vec<Sender<NeuronMessage>>,
) {
    loop {
        match inbox.recv().await {
            None | Some(SensorMessage::Terminate) => {
                let _ = scape.leave(agent);
                return;
            }
            Some(SensorMessage::Sync) => match scape.sense(agent, &sensor.name) {
                Ok(values) => {
                    for target in &targets {
                        let _ = target
                            .send(NeuronMessage::Input(NeuronInput { source: SourceId::Sensor(sensor.id()), values: values.clone() }))
                            .await;
                    }
                }
                Err(err) => log::error!("sensor {} failed: {err}", sensor.id()),
            },
        }
    }
}
