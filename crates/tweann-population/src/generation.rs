//! The population manager's per-generation loop: evaluate every
//! genotype, update species statistics, select survivors, and refill
//! the population through reproduction (spec.md §4.5).

use std::collections::HashMap;

use rand::{Rng, SeedableRng};

use tweann_genotype::{
    ExperimentConstraints, GenerationTrace, Genotype, GenotypeId, Halt, Population, SpeciesId, SpeciesTrace,
};
use tweann_runtime::EvaluationOutcome;
use tweann_scape::Scape;
use tweann_selection::{speciate, topological_distance, truncation_select, tournament_select, Candidate, HallOfFame};

use crate::error::{PopulationError, Result};
use crate::reproduction::reproduce;

/// Structural distance beyond which a genotype founds its own species
/// rather than joining an existing one (spec.md §4.5).
const SPECIATION_THRESHOLD: f64 = 3.0;

/// The population manager: owns the current generation's genotype
/// bodies and the species that partition them.
pub struct PopulationManager {
    pub genotypes: HashMap<GenotypeId, Genotype>,
    pub population: Population,
    pub halls_of_fame: HashMap<SpeciesId, HallOfFame>,
    pub constraints: ExperimentConstraints,
    next_genotype_token: u64,
    next_species_token: u64,
    generation: u64,
}

/// What one generation produced, plus whether the run should stop
pub struct GenerationOutcome {
    pub trace: GenerationTrace,
    pub should_stop: bool,
}

impl PopulationManager {
    /// Seed a population manager with an already-built initial
    /// population of genotypes
    pub fn new(genotypes: HashMap<GenotypeId, Genotype>, population: Population, constraints: ExperimentConstraints) -> Self {
        let next_genotype_token = genotypes.keys().map(|id| id.raw() + 1).max().unwrap_or(0);
        let next_species_token = population.species.iter().map(|s| s.id().raw() + 1).max().unwrap_or(0);
        Self {
            genotypes,
            population,
            halls_of_fame: HashMap::new(),
            constraints,
            next_genotype_token,
            next_species_token,
            generation: 0,
        }
    }

    fn fresh_genotype_id(&mut self) -> GenotypeId {
        let id = GenotypeId::new(self.next_genotype_token);
        self.next_genotype_token += 1;
        id
    }

    /// Evaluate every genotype in the current population, update
    /// species bookkeeping, select survivors, and reproduce a fresh
    /// population of the same total size.
    pub async fn run_generation(&mut self, scape_factory: &impl Fn() -> Box<dyn Scape>, rng: &mut impl Rng) -> Result<GenerationOutcome> {
        let target_size = self.population.size();
        let outcomes = self.evaluate_all(scape_factory, rng).await?;
        self.apply_tuned_weights(&outcomes);

        let candidates: HashMap<GenotypeId, Candidate> = outcomes
            .iter()
            .map(|(&id, outcome)| {
                let neuron_count = self.genotypes.get(&id).map(|g| g.neuron_count()).unwrap_or(0);
                (id, Candidate { id, fitness: outcome.fitness.clone(), neuron_count })
            })
            .collect();

        let mut any_goal_reached = false;
        let mut species_traces = Vec::new();
        for species in &mut self.population.species {
            let members: Vec<&Candidate> = species.members.iter().filter_map(|id| candidates.get(id)).collect();
            if members.is_empty() {
                return Err(PopulationError::SpeciesExtinct(species.id()));
            }

            let mut improved = false;
            for candidate in &members {
                let before = species.champion_fitness.first().copied();
                species.consider_champion(candidate.id, &candidate.fitness);
                if before != species.champion_fitness.first().copied() {
                    improved = true;
                }
            }
            species.advance_generation(improved);

            let hof = self.halls_of_fame.entry(species.id()).or_insert_with(|| {
                HallOfFame::new(HallOfFame::capacity_for(self.constraints.shof_ratio, members.len()))
            });
            for candidate in &members {
                hof.offer((*candidate).clone());
            }

            species_traces.push(species_trace(species.id(), &members, &self.genotypes));

            if outcomes.values().any(|o| o.halt == Halt::GoalReached) {
                any_goal_reached = true;
            }
        }

        let trace = GenerationTrace { generation: self.generation, species: species_traces };

        self.reproduce_generation(&candidates, target_size, rng)?;
        self.generation += 1;

        let should_stop = any_goal_reached
            || self.generation >= self.constraints.max_generations
            || self.population.species.iter().all(|s| s.stagnation >= self.constraints.stagnation_limit);

        Ok(GenerationOutcome { trace, should_stop })
    }

    async fn evaluate_all(&self, scape_factory: &impl Fn() -> Box<dyn Scape>, rng: &mut impl Rng) -> Result<HashMap<GenotypeId, EvaluationOutcome>> {
        let mut results = HashMap::new();
        for id in self.population.all_members() {
            let Some(genotype) = self.genotypes.get(&id) else {
                return Err(PopulationError::MissingGenotype(id));
            };

            // spec.md §7's agent-crash failure floor: a genotype that
            // cannot even validate is scored at zero rather than
            // aborting the whole generation.
            if genotype.validate().is_err() {
                log::warn!("genotype {id} failed validation before evaluation, scoring as crashed");
                results.insert(id, EvaluationOutcome { fitness: vec![0.0], halt: Halt::Stop, tuned_weights: HashMap::new() });
                continue;
            }

            let seed: u64 = rng.gen();
            let sub_rng = rand::rngs::StdRng::seed_from_u64(seed);
            let outcome =
                tweann_runtime::run_evaluation(genotype, id, scape_factory, &self.constraints, self.generation, sub_rng)
                    .await;
            results.insert(id, outcome);
        }
        Ok(results)
    }

    /// Write a Lamarckian evaluation's tuned weights back into the
    /// genotype bodies that survive into the next generation's parent
    /// pool, so reproduction draws from the tuned weights rather than
    /// the pre-evaluation genome (spec.md §4.3's heredity writeback).
    /// A no-op for Darwinian runs, whose outcomes carry empty maps.
    fn apply_tuned_weights(&mut self, outcomes: &HashMap<GenotypeId, EvaluationOutcome>) {
        for (genotype_id, outcome) in outcomes {
            if outcome.tuned_weights.is_empty() {
                continue;
            }
            let Some(genotype) = self.genotypes.get_mut(genotype_id) else { continue };
            for (neuron_id, weights) in &outcome.tuned_weights {
                if let Ok(neuron) = genotype.neuron_mut(*neuron_id) {
                    neuron.set_flat_weights(weights);
                }
            }
        }
    }

    fn reproduce_generation(&mut self, candidates: &HashMap<GenotypeId, Candidate>, target_size: usize, rng: &mut impl Rng) -> Result<()> {
        let per_species_target = (target_size / self.population.species.len().max(1)).max(1);
        let mut next_genotypes = HashMap::new();
        let mut next_species = Vec::new();

        let species_snapshot = self.population.species.clone();
        for species in &species_snapshot {
            let pool: Vec<Candidate> = species.members.iter().filter_map(|id| candidates.get(id).cloned()).collect();
            if pool.is_empty() {
                continue;
            }
            let survivor_count = ((pool.len() as f64) * 0.5).ceil() as usize;
            let survivors = truncation_select(&pool, survivor_count, 1)?;

            let mut members = Vec::new();
            for &survivor in &survivors {
                if let Some(g) = self.genotypes.get(&survivor) {
                    next_genotypes.insert(survivor, g.clone());
                    members.push(survivor);
                }
            }

            while members.len() < per_species_target {
                let parent_id = tournament_select(&pool, pool.len().min(3).max(1), self.constraints.tie_break, rng)?;
                let Some(parent) = self.genotypes.get(&parent_id).cloned() else { continue };
                let offspring_id = self.fresh_genotype_id();
                let offspring = reproduce(&parent, offspring_id, &self.constraints, self.generation + 1, rng)?;
                next_genotypes.insert(offspring_id, offspring);
                members.push(offspring_id);
            }

            next_species.push(species.with_members(members));
        }

        self.genotypes = next_genotypes;

        let genotypes_ref = &self.genotypes;
        let mut token = self.next_species_token;
        let respeciated = speciate(
            genotypes_ref.values(),
            &next_species,
            |id| genotypes_ref.get(&id),
            SPECIATION_THRESHOLD,
            &mut token,
        );
        self.next_species_token = token;
        self.population.species = respeciated;
        Ok(())
    }
}

fn species_trace(species_id: SpeciesId, members: &[&Candidate], genotypes: &HashMap<GenotypeId, Genotype>) -> SpeciesTrace {
    let width = members.iter().map(|c| c.fitness.len()).max().unwrap_or(0);
    let mut avg = vec![0.0; width];
    let mut max = vec![f64::NEG_INFINITY; width];
    let mut min = vec![f64::INFINITY; width];
    for candidate in members {
        for i in 0..width {
            let v = candidate.fitness.get(i).copied().unwrap_or(0.0);
            avg[i] += v;
            max[i] = max[i].max(v);
            min[i] = min[i].min(v);
        }
    }
    for v in &mut avg {
        *v /= members.len().max(1) as f64;
    }

    let avg_neurons = members
        .iter()
        .filter_map(|c| genotypes.get(&c.id).map(|g| g.neuron_count() as f64))
        .sum::<f64>()
        / members.len().max(1) as f64;

    let mut diversity_sum = 0.0;
    let mut pairs = 0u32;
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            if let (Some(a), Some(b)) = (genotypes.get(&members[i].id), genotypes.get(&members[j].id)) {
                diversity_sum += topological_distance(a, b);
                pairs += 1;
            }
        }
    }
    let diversity = if pairs == 0 { 0.0 } else { diversity_sum / pairs as f64 };

    let champion_fitness = members.iter().max_by(|a, b| a.primary_fitness().total_cmp(&b.primary_fitness())).map(|c| c.fitness.clone()).unwrap_or_default();

    SpeciesTrace {
        species_id,
        avg_fitness: avg,
        max_fitness: max,
        min_fitness: min,
        avg_neurons,
        diversity,
        evaluations: members.len() as u64,
        validation_fitness: champion_fitness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tweann_genotype::{Actuator, CortexId, InputEntry, Neuron, Sensor, SourceId, TargetId};
    use tweann_math::{Activation, Aggregator, PlasticityRule};
    use tweann_scape::{ActuationOutcome, ScapeError};

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

    fn seed_genotype(id: u64) -> Genotype {
        let mut g = Genotype::new(GenotypeId::new(id), CortexId::new(1));
        let sensor = g.insert_sensor(|sid| Sensor::new(sid, CortexId::new(1), "in", 1, "constant", 0));
        let actuator = g.insert_actuator(|aid| Actuator::new(aid, CortexId::new(1), "out", 1, "constant", 0));
        g.insert_neuron(|nid| {
            let mut n = Neuron::new(nid, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.5]));
            n.outputs.push(TargetId::Actuator(actuator));
            n
        });
        g
    }

    fn manager() -> PopulationManager {
        let mut genotypes = HashMap::new();
        let mut members = Vec::new();
        for i in 1..=4 {
            genotypes.insert(GenotypeId::new(i), seed_genotype(i));
            members.push(GenotypeId::new(i));
        }
        let mut population = Population::new(tweann_genotype::PopulationId::new(1));
        population.species.push(tweann_genotype::Species::founded_by(SpeciesId::new(1), members[0]));
        population.species[0].members = members;

        let mut constraints = ExperimentConstraints::defaults();
        constraints.tuning_duration = tweann_genotype::TuningDuration::Const(1);
        constraints.max_generations = 3;

        PopulationManager::new(genotypes, population, constraints)
    }

    #[tokio::test]
    async fn a_generation_preserves_population_size_and_produces_a_trace() {
        let mut manager = manager();
        let before = manager.population.size();
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = manager.run_generation(&|| Box::new(ConstantScape), &mut rng).await.unwrap();
        assert_eq!(manager.population.size(), before);
        assert!(!outcome.trace.species.is_empty());
    }

    #[test]
    fn applying_tuned_weights_writes_them_into_the_surviving_genotype() {
        let mut manager = manager();
        let id = GenotypeId::new(1);
        let neuron = manager.genotypes[&id].cortex().neuron_ids[0];
        let mut tuned = HashMap::new();
        tuned.insert(neuron, vec![0.77]);
        let mut outcomes = HashMap::new();
        outcomes.insert(id, EvaluationOutcome { fitness: vec![1.0], halt: Halt::Stop, tuned_weights: tuned });

        manager.apply_tuned_weights(&outcomes);

        assert_eq!(manager.genotypes[&id].neuron(neuron).unwrap().flat_weights(), vec![0.77]);
    }

    #[test]
    fn applying_an_empty_tuned_weights_map_leaves_the_genotype_untouched() {
        let mut manager = manager();
        let id = GenotypeId::new(1);
        let neuron = manager.genotypes[&id].cortex().neuron_ids[0];
        let before = manager.genotypes[&id].neuron(neuron).unwrap().flat_weights();
        let mut outcomes = HashMap::new();
        outcomes.insert(id, EvaluationOutcome { fitness: vec![1.0], halt: Halt::Stop, tuned_weights: HashMap::new() });

        manager.apply_tuned_weights(&outcomes);

        assert_eq!(manager.genotypes[&id].neuron(neuron).unwrap().flat_weights(), before);
    }
}
