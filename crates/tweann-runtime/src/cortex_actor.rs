//! The cortex: synchronizes one sense-think-act cycle across a cortex's
//! sensors and actuators, and accumulates the cycle's fitness and halt
//! signal from however many actuators fired (spec.md §4.2, §5).

use tokio::sync::mpsc::{Receiver, Sender};

use tweann_genotype::Halt;

use crate::mailbox::{recv_with_timeout, ACTUATE_TIMEOUT};
use crate::message::{ActuatorReport, SensorMessage};

/// Combine two halt signals, keeping the more severe one
/// (`GoalReached` > `Stop` > `Continue`).
fn combine_halt(a: Halt, b: Halt) -> Halt {
    match (a, b) {
        (Halt::GoalReached, _) | (_, Halt::GoalReached) => Halt::GoalReached,
        (Halt::Stop, _) | (_, Halt::Stop) => Halt::Stop,
        _ => Halt::Continue,
    }
}

/// Element-wise sum, zero-padding the shorter vector rather than
/// rejecting a mismatched length (spec.md §5's fitness accumulation rule).
fn accumulate_fitness(a: &[f64], b: &[f64]) -> Vec<f64> {
    let width = a.len().max(b.len());
    (0..width).map(|i| a.get(i).copied().unwrap_or(0.0) + b.get(i).copied().unwrap_or(0.0)).collect()
}

/// A running cortex: owns the handles needed to drive one evaluation
/// cycle and collect its result.
pub struct CortexHandle {
    pub sensor_syncs: Vec<Sender<SensorMessage>>,
    pub actuator_reports: Receiver<ActuatorReport>,
    pub expected_reports: usize,
}

/// The outcome of one complete sense-think-act cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleResult {
    pub fitness: Vec<f64>,
    pub halt: Halt,
}

impl CortexHandle {
    /// Trigger every sensor and wait for every actuator's report,
    /// combining their fitness and halt signals.
    pub async fn run_cycle(&mut self) -> Option<CycleResult> {
        for sync in &self.sensor_syncs {
            if sync.send(SensorMessage::Sync).await.is_err() {
                return None;
            }
        }

        let mut fitness = Vec::new();
        let mut halt = Halt::Continue;
        for _ in 0..self.expected_reports {
            let report = recv_with_timeout(&mut self.actuator_reports, ACTUATE_TIMEOUT).await?;
            fitness = accumulate_fitness(&fitness, &report.fitness);
            halt = combine_halt(halt, report.halt);
        }

        Some(CycleResult { fitness, halt })
    }

    /// Tell every sensor to terminate
    pub async fn terminate(&self) {
        for sync in &self.sensor_syncs {
            let _ = sync.send(SensorMessage::Terminate).await;
        }
    }
}
