//! Selection strategies (spec.md §4.5): tournament, rank-proportional
//! and truncation-with-elitism.

use rand::Rng;
use tweann_genotype::{GenotypeId, TieBreak};

use crate::candidate::Candidate;
use crate::error::{Result, SelectionError};

fn break_tie<'a>(a: &'a Candidate, b: &'a Candidate, tie_break: TieBreak, rng: &mut impl Rng) -> &'a Candidate {
    match tie_break {
        TieBreak::FirstInList => a,
        TieBreak::PreferSmaller => {
            if b.neuron_count < a.neuron_count {
                b
            } else {
                a
            }
        }
        TieBreak::Random => {
            if rng.gen_bool(0.5) {
                b
            } else {
                a
            }
        }
    }
}

/// Draw `tournament_size` candidates uniformly at random (with
/// replacement) from `pool` and return the fittest, breaking exact ties
/// per `tie_break`.
pub fn tournament_select(pool: &[Candidate], tournament_size: usize, tie_break: TieBreak, rng: &mut impl Rng) -> Result<GenotypeId> {
    if pool.is_empty() {
        return Err(SelectionError::EmptyPool);
    }
    if tournament_size == 0 || tournament_size > pool.len() {
        return Err(SelectionError::TournamentTooLarge {
            requested: tournament_size,
            available: pool.len(),
        });
    }

    let mut best = &pool[rng.gen_range(0..pool.len())];
    for _ in 1..tournament_size {
        let challenger = &pool[rng.gen_range(0..pool.len())];
        best = match challenger.primary_fitness().partial_cmp(&best.primary_fitness()) {
            Some(std::cmp::Ordering::Greater) => challenger,
            Some(std::cmp::Ordering::Equal) => break_tie(best, challenger, tie_break, rng),
            _ => best,
        };
    }
    Ok(best.id)
}

/// Select one candidate with probability proportional to its rank (not
/// raw fitness, which keeps a single outlier from dominating the draw).
/// Candidates are ranked ascending by primary fitness; rank 1 is worst.
pub fn rank_proportional_select(pool: &[Candidate], rng: &mut impl Rng) -> Result<GenotypeId> {
    if pool.is_empty() {
        return Err(SelectionError::EmptyPool);
    }
    let mut ranked: Vec<&Candidate> = pool.iter().collect();
    ranked.sort_by(|a, b| a.primary_fitness().total_cmp(&b.primary_fitness()));

    let total_rank: u64 = (1..=ranked.len() as u64).sum();
    let mut draw = rng.gen_range(0..total_rank);
    for (i, candidate) in ranked.iter().enumerate() {
        let rank = (i + 1) as u64;
        if draw < rank {
            return Ok(candidate.id);
        }
        draw -= rank;
    }
    Ok(ranked.last().expect("pool is non-empty").id)
}

/// Keep the top `survivors` candidates by primary fitness, always
/// including at least `elitism` of the very best regardless of
/// `survivors` (elitism is a floor, not an addition).
pub fn truncation_select(pool: &[Candidate], survivors: usize, elitism: usize) -> Result<Vec<GenotypeId>> {
    if pool.is_empty() {
        return Err(SelectionError::EmptyPool);
    }
    let mut ranked: Vec<&Candidate> = pool.iter().collect();
    ranked.sort_by(|a, b| b.primary_fitness().total_cmp(&a.primary_fitness()));
    let keep = survivors.max(elitism).min(ranked.len());
    Ok(ranked.into_iter().take(keep).map(|c| c.id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool() -> Vec<Candidate> {
        vec![
            Candidate { id: GenotypeId::new(1), fitness: vec![1.0], neuron_count: 5 },
            Candidate { id: GenotypeId::new(2), fitness: vec![3.0], neuron_count: 3 },
            Candidate { id: GenotypeId::new(3), fitness: vec![2.0], neuron_count: 4 },
        ]
    }

    #[test]
    fn tournament_of_full_pool_always_picks_the_fittest() {
        let mut rng = StdRng::seed_from_u64(1);
        let winner = tournament_select(&pool(), 3, TieBreak::FirstInList, &mut rng).unwrap();
        assert_eq!(winner, GenotypeId::new(2));
    }

    #[test]
    fn truncation_keeps_top_n() {
        let survivors = truncation_select(&pool(), 2, 0).unwrap();
        assert_eq!(survivors, vec![GenotypeId::new(2), GenotypeId::new(3)]);
    }

    #[test]
    fn truncation_elitism_is_a_floor_not_an_addition() {
        let survivors = truncation_select(&pool(), 1, 2).unwrap();
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn rank_proportional_never_returns_an_unknown_id() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let id = rank_proportional_select(&pool(), &mut rng).unwrap();
            assert!(pool().iter().any(|c| c.id == id));
        }
    }
}
