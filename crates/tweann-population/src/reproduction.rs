//! Build one offspring from a parent genotype by probabilistically
//! applying mutation operators (spec.md §4.5, using the probability
//! table carried in `ExperimentConstraints::mutation_probabilities`).

use rand::Rng;

use tweann_genotype::{ExperimentConstraints, Genotype, GenotypeId};
use tweann_mutation::{
    add_connection, add_neuron, modify_weights, mutate_activation_function, mutate_aggregation_function,
    mutate_plasticity_function, remove_connection, remove_neuron, MutationOperator,
};

use crate::error::Result;

/// Clone `parent` under `offspring_id` and roll each configured
/// mutation operator independently against its probability, applying
/// every operator that hits. Operators that find no eligible site
/// (e.g. `remove_connection` on a neuron with no inputs) are skipped
/// rather than treated as an error.
pub fn reproduce(
    parent: &Genotype,
    offspring_id: GenotypeId,
    constraints: &ExperimentConstraints,
    generation: u64,
    rng: &mut impl Rng,
) -> Result<Genotype> {
    let mut offspring = parent.fork(offspring_id);

    for operator in MutationOperator::ALL {
        let probability = constraints.mutation_probabilities.get(operator.name()).copied().unwrap_or(0.0);
        if probability <= 0.0 || !rng.gen_bool(probability.min(1.0)) {
            continue;
        }

        let outcome = match operator {
            MutationOperator::AddNeuron => add_neuron(&mut offspring, constraints, generation, rng).map(|_| ()),
            MutationOperator::RemoveNeuron => remove_neuron(&mut offspring, rng).map(|_| ()),
            MutationOperator::RemoveConnection | MutationOperator::DisableConnection => {
                pick_wired_neuron(&offspring, rng).map_or(Ok(()), |neuron| remove_connection(&mut offspring, neuron, rng).map(|_| ()))
            }
            MutationOperator::AddConnection | MutationOperator::EnableConnection => {
                add_random_connection(&mut offspring, rng)
            }
            MutationOperator::ModifyWeights => {
                modify_weights(&mut offspring, constraints.perturbation_range, rng);
                Ok(())
            }
            MutationOperator::MutateActivationFunction => mutate_activation_function(&mut offspring, constraints, rng),
            MutationOperator::MutateAggregationFunction => mutate_aggregation_function(&mut offspring, constraints, rng),
            MutationOperator::MutatePlasticityFunction => {
                mutate_plasticity_function(&mut offspring, &constraints.allowed_plasticity_rules, rng)
            }
        };

        if let Err(err) = outcome {
            log::debug!("skipping {:?} on {}: {}", operator, offspring.id(), err);
        }
    }

    Ok(offspring)
}

fn pick_wired_neuron(genotype: &Genotype, rng: &mut impl Rng) -> Option<tweann_genotype::NeuronId> {
    let wired: Vec<_> = genotype.neurons_in_order().filter(|n| !n.inputs.is_empty()).map(|n| n.id()).collect();
    if wired.is_empty() {
        None
    } else {
        Some(wired[rng.gen_range(0..wired.len())])
    }
}

fn add_random_connection(genotype: &mut Genotype, rng: &mut impl Rng) -> tweann_mutation::Result<()> {
    let neuron_ids = &genotype.cortex().neuron_ids;
    let sensor_ids = &genotype.cortex().sensor_ids;
    if neuron_ids.is_empty() || sensor_ids.is_empty() {
        return Ok(());
    }
    let target = neuron_ids[rng.gen_range(0..neuron_ids.len())];
    let sensor_id = sensor_ids[rng.gen_range(0..sensor_ids.len())];
    let vl = genotype.sensor(sensor_id)?.vl;
    match add_connection(genotype, target, tweann_genotype::SourceId::Sensor(sensor_id), vl, rng) {
        Ok(()) | Err(tweann_mutation::MutationError::DuplicateConnection { .. }) => Ok(()),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;
    use tweann_genotype::{Actuator, CortexId, InputEntry, Neuron, Sensor, SourceId, TargetId};
    use tweann_math::{Activation, Aggregator, PlasticityRule};

    fn parent() -> Genotype {
        let mut g = Genotype::new(GenotypeId::new(1), CortexId::new(1));
        let sensor = g.insert_sensor(|id| Sensor::new(id, CortexId::new(1), "in", 1, "xor", 0));
        let actuator = g.insert_actuator(|id| Actuator::new(id, CortexId::new(1), "out", 1, "xor", 0));
        g.insert_neuron(|id| {
            let mut n = Neuron::new(id, CortexId::new(1), 0, Activation::Tanh, Aggregator::Dot, PlasticityRule::None);
            n.inputs.push(InputEntry::new(SourceId::Sensor(sensor), vec![0.1]));
            n.outputs.push(TargetId::Actuator(actuator));
            n
        });
        g
    }

    #[test]
    fn reproduction_with_zero_probabilities_is_an_identical_fork() {
        let p = parent();
        let mut constraints = tweann_genotype::ExperimentConstraints::defaults();
        constraints.mutation_probabilities = HashMap::new();
        let mut rng = StdRng::seed_from_u64(1);
        let offspring = reproduce(&p, GenotypeId::new(2), &constraints, 1, &mut rng).unwrap();
        assert_eq!(offspring.neuron_count(), p.neuron_count());
        assert!(offspring.validate().is_ok());
    }

    #[test]
    fn reproduction_always_yields_a_valid_genotype() {
        let p = parent();
        let mut constraints = tweann_genotype::ExperimentConstraints::defaults();
        for op in MutationOperator::ALL {
            constraints.mutation_probabilities.insert(op.name().to_string(), 1.0);
        }
        let mut rng = StdRng::seed_from_u64(2);
        let offspring = reproduce(&p, GenotypeId::new(2), &constraints, 1, &mut rng).unwrap();
        assert!(offspring.validate().is_ok());
    }
}
