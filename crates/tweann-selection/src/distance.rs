//! A topological distance metric between two genotypes, used by
//! speciation to decide whether a genotype belongs to an existing
//! species or should found a new one (spec.md §4.5).
//!
//! This data model carries no historical innovation numbers (NEAT-style
//! gene lineage tracking is a non-goal here), so distance is a
//! structural surrogate: neuron-count difference plus a smaller
//! contribution from total weight-count difference. It is cheap,
//! symmetric, and zero only for genotypes of identical shape.

use tweann_genotype::Genotype;

/// Weight applied to the total-weight-count term relative to the
/// neuron-count term
const WEIGHT_COUNT_FACTOR: f64 = 0.4;

/// Structural distance between two genotypes. Always `>= 0`; `0` only
/// when both have the same neuron count and the same total weight count.
pub fn topological_distance(a: &Genotype, b: &Genotype) -> f64 {
    let neuron_diff = (a.neuron_count() as f64 - b.neuron_count() as f64).abs();
    let weight_diff = (total_weights(a) as f64 - total_weights(b) as f64).abs();
    neuron_diff + WEIGHT_COUNT_FACTOR * weight_diff
}

fn total_weights(genotype: &Genotype) -> usize {
    genotype.neurons_in_order().map(|n| n.weight_count()).sum()
}
