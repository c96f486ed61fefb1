//! The scape callback contract (spec.md §6): the interface every
//! environment implementation must satisfy to be driven by a cortex's
//! sensors and actuators.

use tweann_genotype::{GenotypeId, Halt};

use crate::error::Result;

/// Whether a scape is instantiated once per agent (`Private`, the
/// common case — a fresh environment per evaluation) or shared by every
/// agent currently being evaluated (`Public` — a multi-agent arena
/// where agents interact through the scape itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScapeKind {
    /// One instance per evaluated agent
    Private,
    /// One shared instance; agents register with [`Scape::enter`] and
    /// [`Scape::leave`]
    Public,
}

/// The result of one actuation: the fitness earned this step and
/// whether the scape wants the episode to stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ActuationOutcome {
    /// Fitness contribution of this actuation, one element per objective
    pub fitness: Vec<f64>,
    /// Whether the scape considers the episode over
    pub halt: Halt,
}

impl ActuationOutcome {
    /// A continuing outcome with the given (possibly multi-objective) fitness
    pub fn continuing(fitness: Vec<f64>) -> Self {
        Self { fitness, halt: Halt::Continue }
    }

    /// An outcome that stops the episode without reaching the scape's goal
    pub fn stop(fitness: Vec<f64>) -> Self {
        Self { fitness, halt: Halt::Stop }
    }

    /// An outcome that stops the episode because the goal was reached
    pub fn goal_reached(fitness: Vec<f64>) -> Self {
        Self { fitness, halt: Halt::GoalReached }
    }
}

/// The environment contract sensors and actuators are driven through.
/// Implementations are expected to be cheap per call; a scape that must
/// block for any real length of time should offload that work itself
/// rather than stall the actor that is driving it.
pub trait Scape: Send {
    /// A human-readable identity, used in logs and in sensor/actuator
    /// lookups against the genotype's `scape` field
    fn name(&self) -> &str;

    /// Whether this scape is per-agent or shared
    fn kind(&self) -> ScapeKind {
        ScapeKind::Private
    }

    /// Register an agent with the scape before its first sense/actuate
    /// call. The default implementation does nothing, which is correct
    /// for private scapes.
    fn enter(&mut self, _agent: GenotypeId) -> Result<()> {
        Ok(())
    }

    /// Unregister an agent once its episode ends
    fn leave(&mut self, _agent: GenotypeId) -> Result<()> {
        Ok(())
    }

    /// Produce the vector a named sensor should read this step
    fn sense(&mut self, agent: GenotypeId, sensor_name: &str) -> Result<Vec<f64>>;

    /// Apply a named actuator's output vector and report the resulting
    /// fitness and halt signal
    fn actuate(&mut self, agent: GenotypeId, actuator_name: &str, output: &[f64]) -> Result<ActuationOutcome>;

    /// Tear the scape down once every agent has left
    fn terminate(&mut self) -> Result<()> {
        Ok(())
    }
}
