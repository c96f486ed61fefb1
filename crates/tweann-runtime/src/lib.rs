//! The live agent runtime (spec.md §4.2-§4.3, §5): sensor, neuron,
//! actuator and cortex actors, and the exoself supervisor that drives
//! one agent through an evaluation.

#![warn(clippy::all)]

pub mod actuator_actor;
pub mod cortex_actor;
pub mod error;
pub mod exoself;
pub mod mailbox;
pub mod message;
pub mod neuron_actor;
pub mod neuron_step;
pub mod sensor_actor;
pub mod spawn;
pub mod weight_control;

pub use error::{Result, RuntimeError};
pub use exoself::{run_evaluation, EvaluationOutcome, OperatingMode};
pub use spawn::{spawn_cortex, SpawnedCortex};
