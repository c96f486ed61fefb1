//! The weight-perturbation (tuning) protocol (spec.md §4.3): backing up
//! a neuron's weights before an attempt, perturbing them by a
//! saturating "spread", and restoring the backup if the attempt did not
//! improve fitness.

use rand::Rng;
use tweann_genotype::{Genotype, Neuron, NeuronId};
use tweann_math::{sat, PlasticityRule, WEIGHT_BOUND};

/// A snapshot of one neuron's flattened weight vector, taken before a
/// tuning attempt so it can be restored if the attempt fails to improve
/// fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightBackup {
    neuron: NeuronId,
    weights: Vec<f64>,
}

/// Snapshot `neuron`'s current weights
pub fn weight_backup(neuron: &Neuron) -> WeightBackup {
    WeightBackup {
        neuron: neuron.id(),
        weights: neuron.flat_weights(),
    }
}

/// Restore a neuron to a previously taken backup. Panics in debug builds
/// if `backup` was not taken from this neuron; callers own the pairing.
pub fn weight_restore(neuron: &mut Neuron, backup: &WeightBackup) {
    debug_assert_eq!(neuron.id(), backup.neuron, "backup/neuron mismatch");
    neuron.set_flat_weights(&backup.weights);
}

/// The perturbation magnitude for a neuron of the given `age` (current
/// generation minus the neuron's own `generation`), per spec.md §4.2's
/// `Spread = perturbationRange · π · annealingParam^age` formula.
/// `annealing_param` below 1 tightens perturbations for older neurons.
pub fn spread(perturbation_range: f64, annealing_param: f64, age: u64) -> f64 {
    let age = u32::try_from(age).unwrap_or(u32::MAX);
    perturbation_range * std::f64::consts::PI * annealing_param.powi(age as i32)
}

/// Per-weight perturbation probability for a pool of `total_weights`
/// weights: `1/√totalWeights` (spec.md §4.3), so perturbation attempts
/// touch only a sparse subset rather than every weight at once.
pub fn per_weight_probability(total_weights: usize) -> f64 {
    if total_weights == 0 {
        0.0
    } else {
        (1.0 / (total_weights as f64).sqrt()).min(1.0)
    }
}

/// Perturb a flat weight vector in place, gating each element with
/// `probability` and adding a uniform `[-spread, spread]` delta
/// saturated to `[-bound, bound]`. This is the shared primitive behind
/// `weight_perturb`/`modify_weights`/`perturb_plasticity_params` below
/// and the runtime's mailbox-driven per-neuron tuning protocol.
pub fn perturb_flat(weights: &mut [f64], spread: f64, probability: f64, bound: f64, rng: &mut impl Rng) -> bool {
    let mut touched = false;
    for w in weights {
        if rng.gen_bool(probability) {
            let delta = rng.gen_range(-spread..=spread);
            *w = sat(*w + delta, -bound, bound);
            touched = true;
        }
    }
    touched
}

/// Perturb `neuron`'s own weights in place: each weight is
/// independently touched with probability `1/√totalWeights`, where
/// `totalWeights` is this neuron's own weight count (spec.md §4.3's
/// `weight_perturb(spread)`, driven one neuron at a time by the
/// runtime's `WeightPerturb` mailbox message). A touched weight
/// receives a uniform delta from `[-spread, spread]`, saturated to
/// `WEIGHT_BOUND`.
pub fn weight_perturb(neuron: &mut Neuron, spread: f64, rng: &mut impl Rng) {
    let probability = per_weight_probability(neuron.weight_count());
    if probability <= 0.0 {
        return;
    }
    let mut flat = neuron.flat_weights();
    perturb_flat(&mut flat, spread, probability, WEIGHT_BOUND, rng);
    neuron.set_flat_weights(&flat);
}

/// Perturb a neuron's per-weight plasticity parameters (spec.md §4.3):
/// a larger spread (ten times the weight saturation limit) applied with
/// probability `1/√|params|` over that input's own parameter count.
/// A no-op unless `neuron`'s plasticity rule is one of the per-weight
/// variants (`HebbianW`/`OjasW`) that actually consults them — every
/// other input carries an unused all-zero parameter vector.
pub fn perturb_plasticity_params(neuron: &mut Neuron, rng: &mut impl Rng) {
    if !matches!(neuron.plasticity_fn, PlasticityRule::HebbianW(_) | PlasticityRule::OjasW(_)) {
        return;
    }
    let bound = 10.0 * WEIGHT_BOUND;
    for entry in &mut neuron.inputs {
        if entry.per_weight_params.is_empty() {
            continue;
        }
        let probability = per_weight_probability(entry.per_weight_params.len());
        if probability <= 0.0 {
            continue;
        }
        perturb_flat(&mut entry.per_weight_params, bound, probability, bound, rng);
    }
}

/// The `modify_weights` mutation operator (spec.md §4.2): every weight
/// across every neuron in the genome is independently perturbed with
/// probability `1/√totalWeights`, where `totalWeights` is the genome's
/// total weight count (unlike the tuning-phase `weight_perturb`, which
/// gates against a single neuron's own weight count).
pub fn modify_weights(genotype: &mut Genotype, range: f64, rng: &mut impl Rng) {
    let total: usize = genotype.neurons_in_order().map(Neuron::weight_count).sum();
    let probability = per_weight_probability(total);
    if probability <= 0.0 {
        return;
    }
    let neuron_ids: Vec<_> = genotype.cortex().neuron_ids.clone();
    for id in neuron_ids {
        let Ok(neuron) = genotype.neuron_mut(id) else { continue };
        let mut flat = neuron.flat_weights();
        if perturb_flat(&mut flat, range, probability, WEIGHT_BOUND, rng) {
            neuron.set_flat_weights(&flat);
        }
    }
}
