//! Per-species hall-of-fame: a bounded archive of a species' best
//! genotypes across generations, sized by `shof_ratio`
//! (`ExperimentConstraints::shof_ratio`, spec.md §9 open question,
//! resolved in SPEC_FULL.md: it is the fraction of the species'
//! current population size retained in the archive, rounded up, with a
//! floor of one so a species never loses its only champion).

use crate::candidate::Candidate;

/// A bounded, fitness-ordered archive of a species' best genotypes
#[derive(Debug, Clone, Default)]
pub struct HallOfFame {
    capacity: usize,
    members: Vec<Candidate>,
}

impl HallOfFame {
    /// An empty archive with room for `capacity` members
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            members: Vec::new(),
        }
    }

    /// The capacity implied by `shof_ratio` for a species currently
    /// holding `population_size` members
    pub fn capacity_for(shof_ratio: f64, population_size: usize) -> usize {
        ((population_size as f64 * shof_ratio).ceil() as usize).max(1)
    }

    /// Offer a candidate for inclusion, evicting the weakest member if
    /// the archive is full and `candidate` beats it
    pub fn offer(&mut self, candidate: Candidate) {
        self.members.push(candidate);
        self.members.sort_by(|a, b| b.primary_fitness().total_cmp(&a.primary_fitness()));
        self.members.truncate(self.capacity);
    }

    /// The archive's current members, fittest first
    pub fn members(&self) -> &[Candidate] {
        &self.members
    }
}
