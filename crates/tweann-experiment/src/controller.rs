//! The experiment controller: loads or creates an experiment record,
//! drives the population manager through its configured runs, and
//! writes the final report once every run completes (spec.md §4.6).

use std::collections::HashMap;
use std::path::Path;
use std::time::SystemTime;

use rand::Rng;

use tweann_genotype::{Experiment, ExperimentConstraints, ExperimentId, Genotype, GenotypeId, Population, RunTrace};
use tweann_population::PopulationManager;
use tweann_scape::Scape;
use tweann_storage::{Kind, RecordId, Store};

use crate::error::{ExperimentError, Result};
use crate::persistence::{load, persist};
use crate::report::write_report;

/// Seeds a brand-new population at the start of each run. Implementors
/// typically draw from a morphology's sensor/actuator palette (spec.md
/// §6's morphology callback contract); this crate only needs the result.
pub trait PopulationSeed {
    /// Build the genotypes and species partition a fresh run should
    /// start from
    fn seed(&self, rng: &mut dyn rand::RngCore) -> (HashMap<GenotypeId, Genotype>, Population);
}

/// Drive one experiment through all of its configured runs against a
/// persistence store, writing a report file once it completes.
pub struct ExperimentController<'a> {
    store: &'a mut dyn Store,
    morphology_name: String,
}

impl<'a> ExperimentController<'a> {
    /// Build a controller writing to `store`, tagging report output
    /// with `morphology_name` (spec.md §6's per-morphology report files)
    pub fn new(store: &'a mut dyn Store, morphology_name: impl Into<String>) -> Self {
        Self { store, morphology_name: morphology_name.into() }
    }

    /// Load the persisted experiment record, if any
    fn load_experiment(&self, id: ExperimentId) -> Result<Option<Experiment>> {
        load(&*self.store, Kind::Experiment, RecordId::new(id.raw()), "experiment record")
    }

    async fn save_experiment(&mut self, experiment: &Experiment) -> Result<()> {
        persist(self.store, Kind::Experiment, RecordId::new(experiment.id().raw()), "experiment record", experiment).await
    }

    async fn save_trace(&mut self, experiment: ExperimentId, trace: &RunTrace) -> Result<()> {
        let token = experiment.raw() * 10_000 + trace.run_index as u64;
        persist(self.store, Kind::Trace, RecordId::new(token), "run trace", trace).await
    }

    /// Run an experiment to completion: resuming an in-progress record
    /// if one is found, refusing to re-run a completed one, or creating
    /// a fresh record seeded from `constraints` and `total_runs`.
    pub async fn run(
        &mut self,
        id: ExperimentId,
        total_runs: u32,
        constraints: ExperimentConstraints,
        seed: &dyn PopulationSeed,
        scape_factory: &impl Fn() -> Box<dyn Scape>,
        now: SystemTime,
        rng: &mut impl Rng,
    ) -> Result<Experiment> {
        let mut experiment = match self.load_experiment(id)? {
            Some(existing) if existing.is_complete() => {
                return Err(ExperimentError::AlreadyCompleted(id));
            }
            Some(mut resumed) => {
                log::info!("resuming experiment {id} at run {}", resumed.run_index);
                resumed.record_interruption(now);
                resumed
            }
            None => {
                log::info!("starting fresh experiment {id} for {total_runs} runs");
                Experiment::new(id, total_runs, constraints)
            }
        };

        while !experiment.is_complete() {
            let run_index = experiment.run_index;
            let (genotypes, population) = seed.seed(rng);
            let mut manager = PopulationManager::new(genotypes, population, experiment.constraints.clone());

            let mut generations = Vec::new();
            loop {
                let outcome = manager
                    .run_generation(scape_factory, rng)
                    .await
                    .map_err(|source| ExperimentError::RunFailed { experiment: id, run: run_index, source })?;
                generations.push(outcome.trace);
                if outcome.should_stop {
                    break;
                }
            }

            let trace = RunTrace { run_index, generations };
            self.save_trace(id, &trace).await?;
            experiment.complete_run(trace);
            self.save_experiment(&experiment).await?;
        }

        Ok(experiment)
    }

    /// Write the final per-morphology report file for a completed
    /// experiment (spec.md §6)
    pub fn write_report(&self, experiment: &Experiment, path: &Path) -> Result<()> {
        write_report(&self.morphology_name, experiment, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tweann_genotype::{Actuator, CortexId, InputEntry, Neuron, Sensor, SourceId, TargetId};
    use tweann_genotype::{SpeciesId, TuningDuration};
    use tweann_math::{Activation, Aggregator, PlasticityRule};
    use tweann_scape::{ActuationOutcome, ScapeError};
    use tweann_storage::MemoryStore;

    struct ConstantScape;

    impl Scape for ConstantScape {
        fn name(&self) -> &str {
            "constant"
        }
        fn sense(&mut self, _agent: GenotypeId, _sensor_name: &str) -> tweann_scape::Result<Vec<f64>> {
            Ok(vec![1.0])
        }
        fn actuate(&mut self, _agent: GenotypeId, _actuator_name: &str, output: &[f64]) -> tweann_scape::Result<ActuationOutcome> {
            if output.is_empty() {
                return Err(ScapeError::ArityMismatch { expected: 1, got: 0 });
            }
            Ok(ActuationOutcome::stop(vec![output[0]]))
        }
    }

    struct FourGenotypeSeed;

    impl PopulationSeed for FourGenotypeSeed {
        fn seed(&self, _rng: &mut dyn rand::RngCore) -> (HashMap<GenotypeId, Genotype>, Population) {
            let mut genotypes = HashMap::new();
            let mut members = Vec::new();
            for i in 1..=4 {
                let mut g = Genotype::new(GenotypeId::new(i), CortexId::new(1));
                let sensor = g.insert_sensor(|id| Sensor::new(id, CortexId::new(1), "in", 1, "constant", 0));
                let actuator = g.insert_actuator(|id| Actuator::new(id, CortexId::new(1), "out", 1, "constant", 0));
                g.insert_neuron(|id| {
                    let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
                    n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.5]));
                    n.outputs.push(TargetId::Actuator(actuator));
                    n
                });
                genotypes.insert(GenotypeId::new(i), g);
                members.push(GenotypeId::new(i));
            }
            let mut population = Population::new(tweann_genotype::PopulationId::new(1));
            population.species.push(tweann_genotype::Species::founded_by(SpeciesId::new(1), members[0]));
            population.species[0].members = members;
            (genotypes, population)
        }
    }

    #[tokio::test]
    async fn a_fresh_experiment_runs_to_completion_and_persists_its_record() {
        let mut store = MemoryStore::default();
        let mut controller = ExperimentController::new(&mut store, "xor");
        let mut constraints = ExperimentConstraints::defaults();
        constraints.tuning_duration = TuningDuration::Const(1);
        constraints.max_generations = 1;

        let mut rng = StdRng::seed_from_u64(3);
        let experiment = controller
            .run(ExperimentId::new(1), 2, constraints, &FourGenotypeSeed, &|| Box::new(ConstantScape), SystemTime::UNIX_EPOCH, &mut rng)
            .await
            .unwrap();

        assert!(experiment.is_complete());
        assert_eq!(experiment.trace_acc.len(), 2);

        let reloaded: Experiment = load(&store, Kind::Experiment, RecordId::new(1), "experiment record").unwrap().unwrap();
        assert!(reloaded.is_complete());
    }

    #[tokio::test]
    async fn running_an_already_completed_experiment_is_refused() {
        let mut store = MemoryStore::default();
        let mut controller = ExperimentController::new(&mut store, "xor");
        let mut constraints = ExperimentConstraints::defaults();
        constraints.tuning_duration = TuningDuration::Const(1);
        constraints.max_generations = 1;
        let mut rng = StdRng::seed_from_u64(4);

        controller
            .run(ExperimentId::new(2), 1, constraints.clone(), &FourGenotypeSeed, &|| Box::new(ConstantScape), SystemTime::UNIX_EPOCH, &mut rng)
            .await
            .unwrap();

        let result = controller
            .run(ExperimentId::new(2), 1, constraints, &FourGenotypeSeed, &|| Box::new(ConstantScape), SystemTime::UNIX_EPOCH, &mut rng)
            .await;
        assert!(matches!(result, Err(ExperimentError::AlreadyCompleted(_))));
    }
}
