//! Pure activation, aggregation and plasticity math for TWEANN agents
//!
//! Nothing in this crate touches the network, concurrency or persistence
//! layers; it is the closed-form mathematics every neuron evaluates each
//! cycle, kept separate so it can be property-tested in isolation.

#![warn(clippy::all)]

pub mod activation;
pub mod aggregation;
pub mod error;
pub mod plasticity;

pub use activation::{sat, Activation};
pub use aggregation::{Aggregator, DiffMemory};
pub use error::{MathError, Result};
pub use plasticity::{
    ModParam, NeuromodulationParams, PlasticityRule, SelfModulationVariant, WEIGHT_BOUND,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_reexports_resolve() {
        assert_eq!(Activation::Linear.apply(4.0), 4.0);
        let agg = Aggregator::Dot;
        let result = agg.aggregate(&[vec![1.0]], &[vec![1.0]], None, 0.0).unwrap();
        assert_eq!(result, 1.0);
        let rule = PlasticityRule::None;
        assert_eq!(rule.delta(0, 1.0, 1.0, 0.0, &[]), 0.0);
    }
}
