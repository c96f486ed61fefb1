//! The catalog of structural and parametric mutation operators
//! (spec.md §4.2). Each operator has a canonical name used as the key
//! into `ExperimentConstraints::mutation_probabilities`, since that map
//! lives in `tweann-genotype` and cannot name this crate's enum
//! directly.

/// One mutation operator a population manager may apply to an offspring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOperator {
    /// Insert a neuron by splitting an existing connection
    AddNeuron,
    /// Add a new connection between two unconnected elements
    AddConnection,
    /// Remove an existing connection
    RemoveConnection,
    /// Remove a neuron and every connection touching it
    RemoveNeuron,
    /// Re-add a previously removed connection (the inverse of disable)
    EnableConnection,
    /// Remove a connection without deleting its weight's history
    DisableConnection,
    /// Perturb one or more weights in place
    ModifyWeights,
    /// Swap a neuron's activation function for another allowed one
    MutateActivationFunction,
    /// Swap a neuron's aggregator function for another allowed one
    MutateAggregationFunction,
    /// Swap a neuron's plasticity rule for another allowed one
    MutatePlasticityFunction,
}

impl MutationOperator {
    /// Every operator, in a stable order
    pub const ALL: [MutationOperator; 10] = [
        MutationOperator::AddNeuron,
        MutationOperator::AddConnection,
        MutationOperator::RemoveConnection,
        MutationOperator::RemoveNeuron,
        MutationOperator::EnableConnection,
        MutationOperator::DisableConnection,
        MutationOperator::ModifyWeights,
        MutationOperator::MutateActivationFunction,
        MutationOperator::MutateAggregationFunction,
        MutationOperator::MutatePlasticityFunction,
    ];

    /// The canonical name used as a key into
    /// `ExperimentConstraints::mutation_probabilities`
    pub fn name(self) -> &'static str {
        match self {
            MutationOperator::AddNeuron => "add_neuron",
            MutationOperator::AddConnection => "add_connection",
            MutationOperator::RemoveConnection => "remove_connection",
            MutationOperator::RemoveNeuron => "remove_neuron",
            MutationOperator::EnableConnection => "enable_connection",
            MutationOperator::DisableConnection => "disable_connection",
            MutationOperator::ModifyWeights => "modify_weights",
            MutationOperator::MutateActivationFunction => "mutate_activation_function",
            MutationOperator::MutateAggregationFunction => "mutate_aggregation_function",
            MutationOperator::MutatePlasticityFunction => "mutate_plasticity_function",
        }
    }
}
