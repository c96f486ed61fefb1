//! Structural and weight mutation operators for TWEANN genotypes
//! (spec.md §4.2, §4.3).

#![warn(clippy::all)]

pub mod error;
pub mod operator;
pub mod structural;
pub mod weight;

pub use error::{MutationError, Result};
pub use operator::MutationOperator;
pub use structural::{
    add_connection, add_neuron, disable_connection, enable_connection, mutate_activation_function,
    mutate_aggregation_function, mutate_plasticity_function, remove_connection, remove_neuron,
};
pub use weight::{
    modify_weights, per_weight_probability, perturb_flat, perturb_plasticity_params, spread, weight_backup,
    weight_perturb, weight_restore, WeightBackup,
};
