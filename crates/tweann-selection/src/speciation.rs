//! Partition a generation's genotypes into species by topological
//! distance (spec.md §4.5). New species are founded when a genotype's
//! distance to every existing representative exceeds `threshold`.

use tweann_genotype::{Genotype, GenotypeId, Species, SpeciesId};

use crate::distance::topological_distance;

/// Assign every genotype in `genotypes` to the closest existing species
/// (the species containing its first, founding member is used as the
/// representative), founding a fresh species for any genotype whose
/// distance to every representative exceeds `threshold`.
///
/// `next_species_token` is the counter to mint new [`SpeciesId`]s from;
/// callers own id allocation so this function stays pure.
pub fn speciate<'a>(
    genotypes: impl IntoIterator<Item = &'a Genotype>,
    existing: &[Species],
    lookup: impl Fn(GenotypeId) -> Option<&'a Genotype>,
    threshold: f64,
    next_species_token: &mut u64,
) -> Vec<Species> {
    let mut species: Vec<Species> = existing.iter().map(|s| s.with_members(Vec::new())).collect();
    let representatives: Vec<Option<&Genotype>> = existing
        .iter()
        .map(|s| s.members.first().copied().and_then(&lookup))
        .collect();

    for genotype in genotypes {
        let closest = representatives
            .iter()
            .enumerate()
            .filter_map(|(i, rep)| rep.map(|r| (i, topological_distance(genotype, r))))
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        match closest {
            Some((i, distance)) if distance <= threshold => {
                species[i].members.push(genotype.id());
            }
            _ => {
                let id = SpeciesId::new(*next_species_token);
                *next_species_token += 1;
                species.push(Species::founded_by(id, genotype.id()));
            }
        }
    }

    species.retain(|s| !s.members.is_empty());
    species
}
