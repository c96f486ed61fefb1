//! The exoself: the per-agent supervisor that drives a cortex through
//! its operating-mode state machine (active evaluation, tuning-phase
//! annealing, and eventual termination with heredity writeback)
//! (spec.md §4.3).

use std::collections::HashMap;

use rand::Rng;

use tweann_genotype::{
    ExperimentConstraints, Genotype, GenotypeId, Halt, HeredityType, NeuronId, TuningDuration, TuningSelection,
};
use tweann_math::sat;
use tweann_scape::Scape;

use crate::cortex_actor::CycleResult;
use crate::spawn::{spawn_cortex, SpawnedCortex};
use crate::weight_control::{accept_one, anneal_spread, backup_all, backup_one, perturb_one, restore_one};

/// Which phase of the exoself's state machine is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Running normal sense-think-act cycles and accumulating fitness
    Active,
    /// Probing weight perturbations against the active-mode baseline
    Tuning,
    /// The agent's evaluation has ended
    Terminated,
}

/// The final outcome of one full agent evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub fitness: Vec<f64>,
    pub halt: Halt,
    pub tuned_weights: HashMap<NeuronId, Vec<f64>>,
}

/// Resolve how many tuning attempts to run, from the configured
/// duration rule against the neurons and weights eligible for tuning
/// this evaluation (spec.md §4.2).
fn tuning_attempts(duration: TuningDuration, active_neuron_count: usize, active_weight_count: usize) -> u32 {
    match duration {
        TuningDuration::Const(n) => n,
        TuningDuration::NeuronSizeProportional { p } => {
            (20.0 + sat((active_neuron_count as f64).powf(p), 0.0, 100.0)).round().max(1.0) as u32
        }
        TuningDuration::WeightSizeProportional { p } => {
            (10.0 + sat((active_weight_count as f64).powf(p), 0.0, 100.0)).round().max(1.0) as u32
        }
    }
}

/// The age limit (generations since a neuron's own `generation()`) a
/// [`TuningSelection`] strategy restricts its eligible pool to, per
/// spec.md §4.2. `None` admits every age.
fn age_limit(selection: TuningSelection, rng: &mut impl Rng) -> Option<u64> {
    match selection {
        TuningSelection::Dynamic | TuningSelection::DynamicRandom => {
            let u: f64 = rng.gen_range(f64::EPSILON..=1.0);
            Some((1.0 / u).sqrt().round() as u64)
        }
        TuningSelection::Active | TuningSelection::ActiveRandom => Some(3),
        TuningSelection::Current | TuningSelection::CurrentRandom => Some(0),
        TuningSelection::All | TuningSelection::AllRandom => None,
    }
}

fn eligible_pool(ages: &[(NeuronId, u64)], limit: Option<u64>) -> Vec<NeuronId> {
    ages.iter().filter(|(_, age)| limit.map_or(true, |l| *age <= l)).map(|(id, _)| *id).collect()
}

/// Pick which neurons a tuning attempt should perturb this round. The
/// non-random [`TuningSelection`] variants return their whole
/// age-eligible pool; the `*_random` variants keep each pool member
/// independently with probability `1/√|pool|`, forcing one through if
/// none survive the draw (spec.md §4.2).
fn select_tuning_targets(ages: &[(NeuronId, u64)], selection: TuningSelection, rng: &mut impl Rng) -> Vec<NeuronId> {
    if ages.is_empty() {
        return Vec::new();
    }
    let limit = age_limit(selection, rng);
    let pool = eligible_pool(ages, limit);

    match selection {
        TuningSelection::Dynamic | TuningSelection::Active | TuningSelection::Current | TuningSelection::All => pool,
        TuningSelection::DynamicRandom
        | TuningSelection::ActiveRandom
        | TuningSelection::CurrentRandom
        | TuningSelection::AllRandom => {
            if pool.is_empty() {
                return Vec::new();
            }
            let probability = (1.0 / (pool.len() as f64).sqrt()).min(1.0);
            let mut kept: Vec<NeuronId> = pool.iter().copied().filter(|_| rng.gen_bool(probability)).collect();
            if kept.is_empty() {
                kept.push(pool[rng.gen_range(0..pool.len())]);
            }
            kept
        }
    }
}

/// Run one agent's complete evaluation: active cycles interleaved with
/// tuning-phase annealing, until the scape halts the episode or the
/// configured tuning budget is exhausted, applying heredity writeback
/// according to `constraints.heredity_type`.
pub async fn run_evaluation(
    genotype: &Genotype,
    agent: GenotypeId,
    scape_factory: &impl Fn() -> Box<dyn Scape>,
    constraints: &ExperimentConstraints,
    current_generation: u64,
    mut rng: impl Rng,
) -> EvaluationOutcome {
    let SpawnedCortex { mut handle, neuron_controls, tasks } = spawn_cortex(genotype, agent, scape_factory);

    let ages: Vec<(NeuronId, u64)> =
        genotype.neurons_in_order().map(|n| (n.id(), current_generation.saturating_sub(n.generation()))).collect();

    let initial_limit = age_limit(constraints.tuning_selection, &mut rng);
    let active_pool = eligible_pool(&ages, initial_limit);
    let active_weight_count: usize =
        active_pool.iter().filter_map(|id| genotype.neuron(*id).ok()).map(|n| n.weight_count()).sum();
    let max_attempts = tuning_attempts(constraints.tuning_duration, active_pool.len(), active_weight_count);

    let mut mode = OperatingMode::Active;
    let mut total_fitness: Vec<f64> = Vec::new();
    let mut best_fitness = f64::NEG_INFINITY;
    let mut attempt = 0u32;
    let mut final_halt = Halt::Stop;

    'outer: loop {
        match mode {
            OperatingMode::Active => {
                let Some(CycleResult { fitness, halt }) = handle.run_cycle().await else {
                    final_halt = Halt::Stop;
                    break 'outer;
                };
                for (i, v) in fitness.iter().enumerate() {
                    if i >= total_fitness.len() {
                        total_fitness.push(0.0);
                    }
                    total_fitness[i] += v;
                }
                best_fitness = best_fitness.max(total_fitness.first().copied().unwrap_or(0.0));
                final_halt = halt;
                if halt.should_stop() || attempt >= max_attempts {
                    mode = OperatingMode::Terminated;
                } else {
                    mode = OperatingMode::Tuning;
                }
            }
            OperatingMode::Tuning => {
                let targets = select_tuning_targets(&ages, constraints.tuning_selection, &mut rng);

                for &id in &targets {
                    let Some(tx) = neuron_controls.get(&id) else { continue };
                    let _ = backup_one(tx, constraints.heredity_type).await;
                    let age = ages.iter().find(|(nid, _)| *nid == id).map(|(_, a)| *a).unwrap_or(0);
                    let spread = anneal_spread(constraints.perturbation_range, constraints.annealing_param, age);
                    let seed: u64 = rng.gen();
                    let _ = perturb_one(tx, spread, seed).await;
                }

                let Some(CycleResult { fitness, halt }) = handle.run_cycle().await else {
                    final_halt = Halt::Stop;
                    break 'outer;
                };
                let candidate_fitness = fitness.first().copied().unwrap_or(0.0);
                final_halt = halt;

                if candidate_fitness >= best_fitness + constraints.min_pimprovement {
                    best_fitness = candidate_fitness;
                    for &id in &targets {
                        if let Some(tx) = neuron_controls.get(&id) {
                            let _ = accept_one(tx).await;
                        }
                    }
                } else {
                    for &id in &targets {
                        if let Some(tx) = neuron_controls.get(&id) {
                            let _ = restore_one(tx).await;
                        }
                    }
                }

                attempt += 1;
                if halt.should_stop() || attempt >= max_attempts {
                    mode = OperatingMode::Terminated;
                } else {
                    mode = OperatingMode::Active;
                }
            }
            OperatingMode::Terminated => break 'outer,
        }
    }

    handle.terminate().await;
    let tuned_weights = match constraints.heredity_type {
        HeredityType::Lamarckian => backup_all(&neuron_controls, constraints.heredity_type).await,
        HeredityType::Darwinian => HashMap::new(),
    };

    for task in tasks {
        let _ = tokio::time::timeout(std::time::Duration::from_millis(50), task).await;
    }

    EvaluationOutcome { fitness: total_fitness, halt: final_halt, tuned_weights }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ages(pairs: &[(u64, u64)]) -> Vec<(NeuronId, u64)> {
        pairs.iter().map(|&(id, age)| (NeuronId::new(id), age)).collect()
    }

    #[test]
    fn tuning_attempts_const_is_fixed() {
        assert_eq!(tuning_attempts(TuningDuration::Const(7), 100, 100), 7);
    }

    #[test]
    fn tuning_attempts_neuron_proportional_matches_formula() {
        let got = tuning_attempts(TuningDuration::NeuronSizeProportional { p: 0.5 }, 16, 0);
        assert_eq!(got, (20.0 + sat(16f64.powf(0.5), 0.0, 100.0)).round() as u32);
    }

    #[test]
    fn tuning_attempts_weight_proportional_matches_formula() {
        let got = tuning_attempts(TuningDuration::WeightSizeProportional { p: 0.5 }, 0, 400);
        assert_eq!(got, (10.0 + sat(400f64.powf(0.5), 0.0, 100.0)).round() as u32);
    }

    #[test]
    fn current_selection_keeps_only_age_zero() {
        let pool = ages(&[(1, 0), (2, 1), (3, 0)]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut got = select_tuning_targets(&pool, TuningSelection::Current, &mut rng);
        got.sort_by_key(|id| id.raw());
        assert_eq!(got, vec![NeuronId::new(1), NeuronId::new(3)]);
    }

    #[test]
    fn active_selection_keeps_age_at_most_three() {
        let pool = ages(&[(1, 0), (2, 3), (3, 4)]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut got = select_tuning_targets(&pool, TuningSelection::Active, &mut rng);
        got.sort_by_key(|id| id.raw());
        assert_eq!(got, vec![NeuronId::new(1), NeuronId::new(2)]);
    }

    #[test]
    fn all_selection_keeps_every_age() {
        let pool = ages(&[(1, 0), (2, 30), (3, 4)]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut got = select_tuning_targets(&pool, TuningSelection::All, &mut rng);
        got.sort_by_key(|id| id.raw());
        assert_eq!(got, vec![NeuronId::new(1), NeuronId::new(2), NeuronId::new(3)]);
    }

    #[test]
    fn all_random_never_returns_empty_for_a_nonempty_pool() {
        let pool = ages(&[(1, 0)]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let got = select_tuning_targets(&pool, TuningSelection::AllRandom, &mut rng);
            assert!(!got.is_empty());
        }
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_tuning_targets(&[], TuningSelection::All, &mut rng).is_empty());
    }
}
