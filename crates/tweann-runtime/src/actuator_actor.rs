//! The actuator actor: gathers this step's values from every neuron
//! that targets it, calls its scape, and waits for a fitness report
//! under the 30-second ceiling (spec.md §5, §6).

use tokio::sync::mpsc::{Receiver, Sender};

use tweann_genotype::{Actuator, GenotypeId, Halt};
use tweann_scape::{ActuationOutcome, Scape};

use crate::mailbox::{recv_with_timeout, ACTUATE_TIMEOUT};
use crate::message::{ActuatorMessage, ActuatorReport};

/// Sum every neuron's contribution element-wise, zero-padding shorter
/// vectors rather than rejecting them (spec.md §5's fitness accumulation rule).
fn accumulate(contributions: &[Vec<f64>]) -> Vec<f64> {
    let width = contributions.iter().map(Vec::len).max().unwrap_or(0);
    let mut total = vec![0.0; width];
    for contribution in contributions {
        for (i, v) in contribution.iter().enumerate() {
            total[i] += v;
        }
    }
    total
}

/// Runs one actuator's loop: accumulate `expected_inputs` neuron
/// contributions, actuate the scape, and report the outcome to `report_to`.
/// Terminates on [`ActuatorMessage::Terminate`], on mailbox closure, or
/// when the scape reports [`Halt::GoalReached`] or [`Halt::Stop`].
pub async fn run_actuator(
    actuator: Actuator,
    agent: GenotypeId,
    expected_inputs: usize,
    mut scape: Box<dyn Scape>,
    mut inbox: Receiver<ActuatorMessage>,
    report_to: Sender<ActuatorReport>,
) {
    let mut buffer: Vec<Vec<f64>> = Vec::with_capacity(expected_inputs.max(1));

    loop {
        let Some(msg) = recv_with_timeout(&mut inbox, ACTUATE_TIMEOUT).await else {
            log::warn!("actuator {} mailbox timed out, terminating", actuator.id());
            return;
        };

        match msg {
            ActuatorMessage::Terminate => {
                let _ = scape.leave(agent);
                return;
            }
            ActuatorMessage::Input { values, .. } => {
                buffer.push(values);
                if buffer.len() < expected_inputs.max(1) {
                    continue;
                }

                let vector = accumulate(&buffer);
                buffer.clear();

                let outcome = match scape.actuate(agent, &actuator.name, &vector) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        log::error!("actuator {} scape call failed: {err}", actuator.id());
                        ActuationOutcome { fitness: Vec::new(), halt: Halt::Stop }
                    }
                };

                let stop = outcome.halt.should_stop();
                let _ = report_to
                    .send(ActuatorReport { actuator: actuator.id(), fitness: outcome.fitness, halt: outcome.halt })
                    .await;

                if stop {
                    let _ = scape.leave(agent);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_zero_pads_shorter_contributions() {
        let contributions = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(accumulate(&contributions), vec![4.0, 2.0]);
    }

    #[test]
    fn accumulate_of_nothing_is_empty() {
        assert_eq!(accumulate(&[]), Vec::<f64>::new());
    }
}
