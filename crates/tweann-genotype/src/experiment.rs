//! The experiment record and its configuration (spec.md §3, §4.6).

use std::collections::HashMap;
use std::time::SystemTime;

use tweann_math::{Activation, Aggregator, PlasticityRule};

use crate::ids::ExperimentId;
use crate::trace::RunTrace;

/// Whether an experiment is still running or has produced its final
/// report (spec.md §6's report file is only written once this flips to
/// `Completed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressFlag {
    /// At least one run remains to be executed or resumed
    #[default]
    InProgress,
    /// Every configured run has completed and the final report was written
    Completed,
}

/// Cortex termination signal propagated up from a scape or tuning
/// controller (SPEC_FULL.md/spec.md §9 redesign note: replaces an
/// integer sentinel with a tagged enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Halt {
    /// Keep running
    Continue,
    /// Stop this evaluation without having reached the experiment's goal
    Stop,
    /// Stop because the scape or controller recognized the goal condition
    GoalReached,
}

impl Halt {
    /// Whether this signal should end the current evaluation
    pub fn should_stop(self) -> bool {
        !matches!(self, Halt::Continue)
    }
}

/// Darwinian (offspring starts from genotype, re-tuned from scratch) vs.
/// Lamarckian (offspring inherits the parent's tuned weights) heredity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeredityType {
    /// Tuned weights are discarded before reproduction
    Darwinian,
    /// Tuned weights are written back into the genotype before reproduction
    Lamarckian,
}

/// How tournament selection breaks a fitness tie (SPEC_FULL.md's
/// resolution of the "tournament tie-break rule" open question: default
/// to preserving the order candidates were drawn in, which is also the
/// cheapest to implement deterministically).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// The first tied candidate drawn into the tournament wins
    #[default]
    FirstInList,
    /// The candidate with fewer neurons wins (a parsimony bias)
    PreferSmaller,
    /// Ties are broken uniformly at random
    Random,
}

/// How long the tuning phase runs before the exoself returns to the
/// active (evaluation) operating mode (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TuningDuration {
    /// A fixed number of tuning attempts
    Const(u32),
    /// `round(20 + sat(activeNeurons^p, 0, 100))` (spec.md §4.2)
    NeuronSizeProportional { p: f64 },
    /// `round(10 + sat(totalActiveWeights^p, 0, 100))` (spec.md §4.2)
    WeightSizeProportional { p: f64 },
}

/// Which neurons a tuning attempt perturbs, as an age limit (generations
/// since a neuron's own `generation()`) over the eligible pool, applied
/// either deterministically or as an independent per-neuron keep
/// probability of `1/√|pool|` (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TuningSelection {
    /// Age limit drawn as `round(√(1/U))` for `U ~ Uniform(0, 1]` each
    /// attempt; every neuron at or under that age is selected
    Dynamic,
    /// Same pool as `Dynamic`, each member kept with probability `1/√|pool|`
    DynamicRandom,
    /// Same pool as `Active`, each member kept with probability `1/√|pool|`
    ActiveRandom,
    /// Same pool as `Current`, each member kept with probability `1/√|pool|`
    CurrentRandom,
    /// Same pool as `All`, each member kept with probability `1/√|pool|`
    AllRandom,
    /// Every neuron of age 3 or younger
    Active,
    /// Every neuron of age 0 (structurally touched this generation)
    Current,
    /// Every neuron in the cortex, regardless of age
    All,
}

/// The fixed configuration an experiment is seeded with; read at
/// population-manager startup and never mutated once a run begins.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConstraints {
    /// Activation functions new connections may draw from
    pub allowed_activations: Vec<Activation>,
    /// Aggregators new neurons may draw from
    pub allowed_aggregators: Vec<Aggregator>,
    /// Plasticity rules `mutate_plasticity_function` may draw from
    pub allowed_plasticity_rules: Vec<PlasticityRule>,
    /// Mutation operator name to selection probability. Kept as a
    /// name-keyed map rather than an enum so this crate does not need
    /// to depend on `tweann-mutation`; the canonical operator names are
    /// defined there.
    pub mutation_probabilities: HashMap<String, f64>,
    /// Darwinian vs. Lamarckian heredity
    pub heredity_type: HeredityType,
    /// Tournament tie-break rule
    pub tie_break: TieBreak,
    /// How long each tuning phase runs
    pub tuning_duration: TuningDuration,
    /// Which weights each tuning attempt touches
    pub tuning_selection: TuningSelection,
    /// Perturbation range (radians) used to compute the saturating
    /// `spread` added to a tuned weight
    pub perturbation_range: f64,
    /// Exponential annealing base applied per neuron age in the tuning
    /// spread formula `perturbation_range * pi * annealing_param^age`;
    /// values below 1 tighten perturbations for older neurons
    pub annealing_param: f64,
    /// Minimum fitness improvement a tuning attempt must show over the
    /// current best before its perturbation is kept rather than restored
    pub min_pimprovement: f64,
    /// Probability that a dropped-back-to tuning annealing step
    /// re-enters a previously abandoned weight configuration, rather
    /// than continuing to anneal the current one (SPEC_FULL.md's
    /// resolution of the `re_entry_probability` open question)
    pub re_entry_probability: f64,
    /// Fraction of each species' population retained in its
    /// hall-of-fame across generations (SPEC_FULL.md's resolution of
    /// the `shof_ratio` open question), in `[0, 1]`
    pub shof_ratio: f64,
    /// Consecutive stagnant generations a species tolerates before culling
    pub stagnation_limit: u64,
    /// Hard cap on generations per run, regardless of fitness
    pub max_generations: u64,
    /// Fitness threshold at which a scape's goal is considered reached
    pub goal_fitness: Option<f64>,
}

impl ExperimentConstraints {
    /// A reasonable starting point: no structural bias, tournament
    /// selection with first-in-list tie-breaking, Darwinian heredity,
    /// constant 50-step tuning phases.
    pub fn defaults() -> Self {
        Self {
            allowed_activations: Activation::ALL.to_vec(),
            allowed_aggregators: Aggregator::ALL.to_vec(),
            allowed_plasticity_rules: vec![PlasticityRule::None, PlasticityRule::Hebbian(0.1), PlasticityRule::Ojas(0.1)],
            mutation_probabilities: HashMap::new(),
            heredity_type: HeredityType::Darwinian,
            tie_break: TieBreak::FirstInList,
            tuning_duration: TuningDuration::Const(50),
            tuning_selection: TuningSelection::DynamicRandom,
            perturbation_range: std::f64::consts::PI,
            annealing_param: 0.9,
            min_pimprovement: 0.0,
            re_entry_probability: 0.05,
            shof_ratio: 0.1,
            stagnation_limit: 20,
            max_generations: 1000,
            goal_fitness: None,
        }
    }
}

/// An experiment: a sequence of independent runs of the same
/// constraints, each evolving a population from scratch (spec.md §3).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Experiment {
    id: ExperimentId,
    /// How many independent runs this experiment is configured for
    pub total_runs: u32,
    /// 1-based index of the run currently executing or about to resume
    pub run_index: u32,
    /// Per-run traces accumulated so far
    pub trace_acc: Vec<RunTrace>,
    /// Whether the experiment has completed every run
    pub progress_flag: ProgressFlag,
    #[cfg_attr(feature = "serde", serde(skip, default = "SystemTime::now"))]
    /// When the experiment was first created
    pub created_at: SystemTime,
    #[cfg_attr(feature = "serde", serde(skip))]
    /// Timestamps of every time this experiment was interrupted
    /// (process restart, crash recovery) before completing
    pub interruptions: Vec<SystemTime>,
    /// The fixed configuration shared by every run
    pub constraints: ExperimentConstraints,
}

impl Experiment {
    /// Start a brand-new experiment at run 1
    pub fn new(id: ExperimentId, total_runs: u32, constraints: ExperimentConstraints) -> Self {
        Self {
            id,
            total_runs,
            run_index: 1,
            trace_acc: Vec::new(),
            progress_flag: ProgressFlag::InProgress,
            created_at: SystemTime::now(),
            interruptions: Vec::new(),
            constraints,
        }
    }

    /// This experiment's id
    pub fn id(&self) -> ExperimentId {
        self.id
    }

    /// Record that this experiment was just resumed after an interruption
    pub fn record_interruption(&mut self, at: SystemTime) {
        self.interruptions.push(at);
    }

    /// Append a completed run's trace and advance to the next run, or
    /// mark the experiment complete if that was the last one
    pub fn complete_run(&mut self, trace: RunTrace) {
        self.trace_acc.push(trace);
        if self.run_index >= self.total_runs {
            self.progress_flag = ProgressFlag::Completed;
        } else {
            self.run_index += 1;
        }
    }

    /// Whether every configured run has completed
    pub fn is_complete(&self) -> bool {
        self.progress_flag == ProgressFlag::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_should_stop_is_false_only_for_continue() {
        assert!(!Halt::Continue.should_stop());
        assert!(Halt::Stop.should_stop());
        assert!(Halt::GoalReached.should_stop());
    }

    #[test]
    fn completing_the_final_run_flips_progress_flag() {
        let mut exp = Experiment::new(ExperimentId::new(1), 2, ExperimentConstraints::defaults());
        exp.complete_run(RunTrace { run_index: 1, generations: Vec::new() });
        assert_eq!(exp.progress_flag, ProgressFlag::InProgress);
        assert_eq!(exp.run_index, 2);
        exp.complete_run(RunTrace { run_index: 2, generations: Vec::new() });
        assert!(exp.is_complete());
    }
}
