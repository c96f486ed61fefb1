//! Writes the textual, whitespace-separated report file described in
//! spec.md §6: one file per morphology, with a comment-delimited
//! section per statistic, averaged across every completed run of an
//! experiment.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tweann_genotype::{Experiment, GenerationTrace, RunTrace};

use crate::error::Result;

/// Evaluation index step between consecutive generations, per spec.md
/// §6's "Evaluation index is `500 · generationNumber`" convention
const EVALUATIONS_PER_GENERATION: u64 = 500;

struct GenerationStat {
    index: u64,
    avg: f64,
    std: f64,
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    (mean, variance.sqrt())
}

/// Compute one statistic's across-run average and standard deviation at
/// every generation index, by zipping every run's generation list
/// position-by-position (short runs simply stop contributing once
/// exhausted).
fn stat_series(runs: &[RunTrace], extract: impl Fn(&GenerationTrace) -> f64) -> Vec<GenerationStat> {
    let max_generations = runs.iter().map(|r| r.generations.len()).max().unwrap_or(0);
    (0..max_generations)
        .map(|g| {
            let values: Vec<f64> = runs.iter().filter_map(|r| r.generations.get(g)).map(&extract).collect();
            let (avg, std) = mean_and_std(&values);
            GenerationStat { index: g as u64 * EVALUATIONS_PER_GENERATION, avg, std }
        })
        .collect()
}

fn write_section(out: &mut impl Write, comment: &str, series: &[GenerationStat]) -> std::io::Result<()> {
    writeln!(out, "# {comment}")?;
    for point in series {
        writeln!(out, "{} {} {}", point.index, point.avg, point.std)?;
    }
    writeln!(out)
}

/// Write `experiment`'s full report to `path`, prefixing every section
/// comment with `morphology_name` so multiple morphologies' reports
/// stay distinguishable when concatenated.
pub fn write_report(morphology_name: &str, experiment: &Experiment, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    let runs = &experiment.trace_acc;
    let primary = |g: &GenerationTrace| g.population_avg_fitness().first().copied().unwrap_or(0.0);
    let max_fitness = |g: &GenerationTrace| g.population_max_fitness().first().copied().unwrap_or(0.0);
    let min_fitness = |g: &GenerationTrace| {
        g.species.iter().flat_map(|s| s.min_fitness.first().copied()).fold(f64::INFINITY, f64::min)
    };
    let avg_neurons = |g: &GenerationTrace| {
        let (sum, count) = g.species.iter().fold((0.0, 0usize), |(s, c), sp| (s + sp.avg_neurons, c + 1));
        if count == 0 { 0.0 } else { sum / count as f64 }
    };
    let avg_diversity = |g: &GenerationTrace| {
        let (sum, count) = g.species.iter().fold((0.0, 0usize), |(s, c), sp| (s + sp.diversity, c + 1));
        if count == 0 { 0.0 } else { sum / count as f64 }
    };
    let evaluations = |g: &GenerationTrace| g.species.iter().map(|s| s.evaluations).sum::<u64>() as f64;
    let validation_fitness = |g: &GenerationTrace| {
        g.species.iter().flat_map(|s| s.validation_fitness.first().copied()).fold(f64::NEG_INFINITY, f64::max)
    };

    writeln!(out, "# morphology: {morphology_name}")?;
    write_section(&mut out, &format!("{morphology_name} avgFitness"), &stat_series(runs, primary))?;
    write_section(&mut out, &format!("{morphology_name} avgNeurons"), &stat_series(runs, avg_neurons))?;
    write_section(&mut out, &format!("{morphology_name} avgDiversity"), &stat_series(runs, avg_diversity))?;
    write_section(&mut out, &format!("{morphology_name} maxFitness"), &stat_series(runs, max_fitness))?;
    write_section(&mut out, &format!("{morphology_name} avgMax"), &stat_series(runs, max_fitness))?;
    write_section(&mut out, &format!("{morphology_name} avgMin"), &stat_series(runs, min_fitness))?;
    write_section(&mut out, &format!("{morphology_name} evaluations"), &stat_series(runs, evaluations))?;
    write_section(&mut out, &format!("{morphology_name} validationFitness"), &stat_series(runs, validation_fitness))?;

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tweann_genotype::{ExperimentConstraints, ExperimentId, SpeciesId, SpeciesTrace};

    fn sample_experiment() -> Experiment {
        let mut experiment = Experiment::new(ExperimentId::new(1), 1, ExperimentConstraints::defaults());
        let species = SpeciesTrace {
            species_id: SpeciesId::new(1),
            avg_fitness: vec![1.5],
            max_fitness: vec![2.0],
            min_fitness: vec![1.0],
            avg_neurons: 3.0,
            diversity: 0.5,
            evaluations: 4,
            validation_fitness: vec![1.8],
        };
        let generation = GenerationTrace { generation: 0, species: vec![species] };
        experiment.complete_run(RunTrace { run_index: 1, generations: vec![generation] });
        experiment
    }

    #[test]
    fn report_writes_every_section_with_one_data_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xor.report");
        write_report("xor", &sample_experiment(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# xor avgFitness"));
        assert!(contents.contains("0 1.5 0"));
        assert!(contents.contains("# xor validationFitness"));
    }
}
