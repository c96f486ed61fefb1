//! Mailbox message types passed between actors. Every actor owns a
//! bounded `tokio::sync::mpsc` mailbox and is addressed only by
//! messages it receives through it (spec.md §9's "mailbox timeouts are
//! explicit" design note: every blocking receive in this crate goes
//! through [`crate::mailbox::recv_with_timeout`] rather than an
//! implicit infinite wait).

use tweann_genotype::{ActuatorId, Halt, HeredityType, NeuronId, SourceId};

/// One step's worth of values arriving at a neuron from a single source
#[derive(Debug, Clone)]
pub struct NeuronInput {
    /// Which configured input this satisfies
    pub source: SourceId,
    /// The value vector carried by this source this step (length
    /// matches the source's vl)
    pub values: Vec<f64>,
}

/// Messages a neuron actor's mailbox accepts. A neuron keeps three
/// weight sets (spec.md §4.3): `current` (the working set baked into
/// its `Neuron`'s inputs), `backup` (the point a tuning attempt anneals
/// around) and `baseline` (weights as of the last accepted attempt).
/// Not `Clone`: `WeightBackup`'s reply channel is a single-use
/// `oneshot::Sender`.
#[derive(Debug)]
pub enum NeuronMessage {
    /// A value arriving from an upstream sensor or neuron
    Input(NeuronInput),
    /// Begin a fresh sense-think-act cycle: clear any partial input
    /// buffer left over from a tuning-phase reset
    ResetPrep,
    /// Snapshot `backup` per the configured heredity rule — Darwinian
    /// assigns `backup := baseline`, Lamarckian assigns
    /// `backup := current` — and reply with the resulting weights
    WeightBackup {
        heredity: HeredityType,
        reply: tokio::sync::oneshot::Sender<Vec<f64>>,
    },
    /// A failed tuning attempt: `current`, `baseline := backup`
    WeightRestore,
    /// Perturb `current := perturb(backup, spread)`
    WeightPerturb { spread: f64, seed: u64 },
    /// A successful tuning attempt: `baseline := current`
    AcceptBaseline,
    /// Shut the actor down
    Terminate,
}

/// Messages a sensor actor's mailbox accepts
#[derive(Debug, Clone)]
pub enum SensorMessage {
    /// Poll the scape once and forward the percept to every target
    Sync,
    Terminate,
}

/// Messages an actuator actor's mailbox accepts
#[derive(Debug, Clone)]
pub enum ActuatorMessage {
    /// A value arriving from an upstream neuron this step
    Input { from: NeuronId, values: Vec<f64> },
    Terminate,
}

/// What an actuator reports back to the cortex once its scape call settles
#[derive(Debug, Clone)]
pub struct ActuatorReport {
    pub actuator: ActuatorId,
    pub fitness: Vec<f64>,
    pub halt: Halt,
}

/// Messages the exoself sends to the cortex it supervises
#[derive(Debug, Clone, Copy)]
pub enum CortexCommand {
    /// Start (or restart) one sense-think-act cycle
    RunCycle,
    Terminate,
}
