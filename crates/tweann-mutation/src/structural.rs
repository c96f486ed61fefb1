//! Structural mutation operators: add/remove neurons and connections,
//! and swapping a neuron's activation/aggregation/plasticity function
//! (spec.md §4.2).

use rand::Rng;
use tweann_genotype::{Cortex, ExperimentConstraints, Genotype, InputEntry, Neuron, NeuronId, Sensor, SourceId, TargetId};
use tweann_math::PlasticityRule;

use crate::error::{MutationError, Result};

fn random_neuron_id(cortex: &Cortex, rng: &mut impl Rng) -> Result<NeuronId> {
    if cortex.neuron_ids.is_empty() {
        return Err(MutationError::EmptyCortex);
    }
    let index = rng.gen_range(0..cortex.neuron_ids.len());
    Ok(cortex.neuron_ids[index])
}

/// Insert a fresh neuron by splitting an existing weighted connection
/// into `source -> new -> target`: the new neuron gets a single input
/// of weight `1.0` from `source`, and the original weight moves to the
/// new neuron's single output into `target`.
pub fn add_neuron(genotype: &mut Genotype, constraints: &ExperimentConstraints, generation: u64, rng: &mut impl Rng) -> Result<NeuronId> {
    let host_id = random_neuron_id(genotype.cortex(), rng)?;
    let host = genotype.neuron(host_id)?;
    if host.inputs.is_empty() {
        return Err(MutationError::NoEligibleConnection);
    }
    let input_index = rng.gen_range(0..host.inputs.len());
    let split = host.inputs[input_index].clone();

    let activation = *pick(&constraints.allowed_activations, rng, "activation")?;
    let aggregator = *pick(&constraints.allowed_aggregators, rng, "aggregator")?;
    let cortex_id = genotype.cortex().id();

    let new_id = genotype.insert_neuron(|id| {
        let mut n = Neuron::new(id, cortex_id, generation, activation, aggregator, PlasticityRule::None);
        n.inputs.push(InputEntry::new(split.source, vec![1.0]));
        n.outputs.push(TargetId::Neuron(host_id));
        n
    });

    let host = genotype.neuron_mut(host_id)?;
    host.inputs[input_index] = InputEntry::new(SourceId::Neuron(new_id), split.weights);
    host.set_generation(generation).map_err(|(from, to)| {
        MutationError::Genotype(tweann_genotype::GenotypeError::GenerationRegression { neuron: host_id, from, to })
    })?;

    Ok(new_id)
}

/// Add a brand-new connection from `source` into `target_neuron`,
/// rejecting it if one already exists from that exact source.
pub fn add_connection(genotype: &mut Genotype, target_neuron: NeuronId, source: SourceId, vl: usize, rng: &mut impl Rng) -> Result<()> {
    let neuron = genotype.neuron(target_neuron)?;
    if neuron.inputs.iter().any(|e| e.source == source) {
        return Err(MutationError::DuplicateConnection {
            neuron: target_neuron,
            source_id: source,
            target: TargetId::Neuron(target_neuron),
        });
    }
    let weights: Vec<f64> = (0..vl).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let neuron = genotype.neuron_mut(target_neuron)?;
    neuron.inputs.push(InputEntry::new(source, weights));

    if let SourceId::Neuron(source_id) = source {
        let source_neuron = genotype.neuron_mut(source_id)?;
        if !source_neuron.outputs.contains(&TargetId::Neuron(target_neuron)) {
            source_neuron.outputs.push(TargetId::Neuron(target_neuron));
        }
    }
    Ok(())
}

/// Remove one of `neuron`'s inputs at random
pub fn remove_connection(genotype: &mut Genotype, neuron: NeuronId, rng: &mut impl Rng) -> Result<SourceId> {
    let n = genotype.neuron_mut(neuron)?;
    if n.inputs.is_empty() {
        return Err(MutationError::NoEligibleConnection);
    }
    let index = rng.gen_range(0..n.inputs.len());
    let removed = n.inputs.remove(index).source;

    if let SourceId::Neuron(source_id) = removed {
        if let Ok(source_neuron) = genotype.neuron_mut(source_id) {
            source_neuron.outputs.retain(|t| *t != TargetId::Neuron(neuron));
        }
    }
    Ok(removed)
}

/// Remove a random neuron from the cortex, scrubbing every reference to it
pub fn remove_neuron(genotype: &mut Genotype, rng: &mut impl Rng) -> Result<NeuronId> {
    let id = random_neuron_id(genotype.cortex(), rng)?;
    genotype.remove_neuron(id);
    Ok(id)
}

/// Disable a connection: functionally identical to [`remove_connection`]
/// since this data model carries no inert/disabled weight state, only
/// present/absent connections.
pub fn disable_connection(genotype: &mut Genotype, neuron: NeuronId, rng: &mut impl Rng) -> Result<SourceId> {
    remove_connection(genotype, neuron, rng)
}

/// Re-add a connection from a random sensor or neuron into `neuron`
pub fn enable_connection(genotype: &mut Genotype, neuron: NeuronId, sensors: &[Sensor], rng: &mut impl Rng) -> Result<()> {
    if sensors.is_empty() {
        return Err(MutationError::NoEligibleConnection);
    }
    let sensor = &sensors[rng.gen_range(0..sensors.len())];
    add_connection(genotype, neuron, SourceId::Sensor(sensor.id()), sensor.vl, rng)
}

/// Swap a random neuron's activation function for a different allowed one
pub fn mutate_activation_function(genotype: &mut Genotype, constraints: &ExperimentConstraints, rng: &mut impl Rng) -> Result<()> {
    let id = random_neuron_id(genotype.cortex(), rng)?;
    let choice = *pick(&constraints.allowed_activations, rng, "activation")?;
    genotype.neuron_mut(id)?.activation_fn = choice;
    Ok(())
}

/// Swap a random neuron's aggregator for a different allowed one
pub fn mutate_aggregation_function(genotype: &mut Genotype, constraints: &ExperimentConstraints, rng: &mut impl Rng) -> Result<()> {
    let id = random_neuron_id(genotype.cortex(), rng)?;
    let choice = *pick(&constraints.allowed_aggregators, rng, "aggregator")?;
    genotype.neuron_mut(id)?.aggregator_fn = choice;
    Ok(())
}

/// Swap a random neuron's plasticity rule for a different allowed one
pub fn mutate_plasticity_function(genotype: &mut Genotype, allowed: &[PlasticityRule], rng: &mut impl Rng) -> Result<()> {
    let id = random_neuron_id(genotype.cortex(), rng)?;
    let choice = pick(allowed, rng, "plasticity")?.clone();
    genotype.neuron_mut(id)?.plasticity_fn = choice;
    Ok(())
}

fn pick<'a, T>(options: &'a [T], rng: &mut impl Rng, label: &'static str) -> Result<&'a T> {
    if options.is_empty() {
        return Err(MutationError::NoAllowedFunctions(label));
    }
    Ok(&options[rng.gen_range(0..options.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tweann_genotype::{Actuator, CortexId, GenotypeId};
    use tweann_math::{Activation, Aggregator};

    fn wired() -> (Genotype, ExperimentConstraints) {
        let mut g = Genotype::new(GenotypeId::new(1), CortexId::new(1));
        let sensor = g.insert_sensor(|id| Sensor::new(id, CortexId::new(1), "in", 1, "xor", 0));
        let actuator = g.insert_actuator(|id| Actuator::new(id, CortexId::new(1), "out", 1, "xor", 0));
        g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.5]));
            n.outputs.push(TargetId::Actuator(actuator));
            n
        });
        (g, ExperimentConstraints::defaults())
    }

    #[test]
    fn add_neuron_splits_a_connection_and_stays_valid() {
        let (mut g, constraints) = wired();
        let mut rng = StdRng::seed_from_u64(1);
        add_neuron(&mut g, &constraints, 1, &mut rng).unwrap();
        assert_eq!(g.neuron_count(), 2);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn remove_neuron_leaves_a_valid_genotype() {
        let (mut g, constraints) = wired();
        let mut rng = StdRng::seed_from_u64(2);
        add_neuron(&mut g, &constraints, 1, &mut rng).unwrap();
        remove_neuron(&mut g, &mut rng).unwrap();
        assert!(g.validate().is_ok());
    }

    #[test]
    fn add_connection_rejects_duplicates() {
        let (mut g, _) = wired();
        let neuron = g.cortex().neuron_ids[0];
        let sensor = g.cortex().sensor_ids[0];
        let mut rng = StdRng::seed_from_u64(3);
        let err = add_connection(&mut g, neuron, SourceId::Sensor(sensor), 1, &mut rng).unwrap_err();
        assert!(matches!(err, MutationError::DuplicateConnection { .. }));
    }

    #[test]
    fn mutate_plasticity_function_picks_from_the_allowed_list() {
        let (mut g, _) = wired();
        let allowed = vec![PlasticityRule::Ojas(0.2)];
        let mut rng = StdRng::seed_from_u64(4);
        mutate_plasticity_function(&mut g, &allowed, &mut rng).unwrap();
        let neuron = g.cortex().neuron_ids[0];
        assert_eq!(g.neuron(neuron).unwrap().plasticity_fn, PlasticityRule::Ojas(0.2));
    }

    #[test]
    fn mutate_plasticity_function_rejects_an_empty_allowed_list() {
        let (mut g, _) = wired();
        let mut rng = StdRng::seed_from_u64(5);
        let err = mutate_plasticity_function(&mut g, &[], &mut rng).unwrap_err();
        assert!(matches!(err, MutationError::NoAllowedFunctions("plasticity")));
    }
}
