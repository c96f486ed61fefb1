//! Per-generation, per-species statistics (spec.md §3's "Trace" element,
//! §6's report file contract). Fitness is always carried as a vector so
//! the same types serve both scalar and multi-objective experiments
//! (SPEC_FULL.md's resolution of the "per-objective vs scalar trace
//! fitness" open question).

use crate::ids::SpeciesId;

/// Summary statistics for one species within one generation
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesTrace {
    /// The species these statistics describe
    pub species_id: SpeciesId,
    /// Element-wise average fitness across the species' evaluated members
    pub avg_fitness: Vec<f64>,
    /// Element-wise maximum fitness
    pub max_fitness: Vec<f64>,
    /// Element-wise minimum fitness
    pub min_fitness: Vec<f64>,
    /// Average neuron count across the species' members
    pub avg_neurons: f64,
    /// A topological diversity measure for the species (see
    /// `tweann-selection`'s distance metric)
    pub diversity: f64,
    /// Scape evaluations consumed producing this generation's statistics
    pub evaluations: u64,
    /// Validation-scape fitness of this generation's best agent, if a
    /// validation scape is configured
    pub validation_fitness: Vec<f64>,
}

/// All species' statistics for one generation
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationTrace {
    /// Generation index within the run, starting at zero
    pub generation: u64,
    /// Per-species statistics, in population order
    pub species: Vec<SpeciesTrace>,
}

impl GenerationTrace {
    /// The element-wise average fitness across every species' average,
    /// weighted equally per species (not per member) — the population-wide
    /// figure the report file prints per generation.
    pub fn population_avg_fitness(&self) -> Vec<f64> {
        average_vectors(self.species.iter().map(|s| s.avg_fitness.as_slice()))
    }

    /// The best `max_fitness` seen by any species this generation
    pub fn population_max_fitness(&self) -> Vec<f64> {
        self.species
            .iter()
            .map(|s| s.max_fitness.first().copied().unwrap_or(f64::NEG_INFINITY))
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| self.species[i].max_fitness.clone())
            .unwrap_or_default()
    }
}

/// All generations recorded for one run of an experiment
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunTrace {
    /// 1-based run index within the experiment
    pub run_index: u32,
    /// One entry per generation completed in this run
    pub generations: Vec<GenerationTrace>,
}

fn average_vectors<'a>(vectors: impl Iterator<Item = &'a [f64]>) -> Vec<f64> {
    let mut sum: Vec<f64> = Vec::new();
    let mut count = 0usize;
    for v in vectors {
        if sum.len() < v.len() {
            sum.resize(v.len(), 0.0);
        }
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
        count += 1;
    }
    if count == 0 {
        return sum;
    }
    for s in &mut sum {
        *s /= count as f64;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(species: Vec<SpeciesTrace>) -> GenerationTrace {
        GenerationTrace { generation: 0, species }
    }

    #[test]
    fn population_avg_is_mean_of_species_averages() {
        let t = trace(vec![
            SpeciesTrace { avg_fitness: vec![1.0, 2.0], ..Default::default() },
            SpeciesTrace { avg_fitness: vec![3.0, 4.0], ..Default::default() },
        ]);
        assert_eq!(t.population_avg_fitness(), vec![2.0, 3.0]);
    }

    #[test]
    fn population_max_picks_the_leading_species() {
        let t = trace(vec![
            SpeciesTrace { max_fitness: vec![1.0], ..Default::default() },
            SpeciesTrace { max_fitness: vec![5.0], ..Default::default() },
        ]);
        assert_eq!(t.population_max_fitness(), vec![5.0]);
    }
}
