//! Thin helpers bridging the exoself's tuning loop to neuron mailboxes:
//! wraps `tweann_mutation`'s pure weight-perturbation math as mailbox
//! round-trips (spec.md §4.3's weight_backup/weight_restore/weight_perturb
//! protocol).

use std::collections::HashMap;

use tokio::sync::{mpsc::Sender, oneshot};

use tweann_genotype::{HeredityType, NeuronId};

use crate::message::NeuronMessage;

/// The perturbation magnitude for a neuron of the given `age`,
/// delegating to the pure annealing formula in `tweann-mutation`.
pub fn anneal_spread(perturbation_range: f64, annealing_param: f64, age: u64) -> f64 {
    tweann_mutation::spread(perturbation_range, annealing_param, age)
}

/// Snapshot one neuron's `backup` weight set per `heredity`, returning
/// the resulting backup
pub async fn backup_one(tx: &Sender<NeuronMessage>, heredity: HeredityType) -> Option<Vec<f64>> {
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(NeuronMessage::WeightBackup { heredity, reply: reply_tx }).await.ok()?;
    reply_rx.await.ok()
}

/// Ask one neuron to perturb `current := perturb(backup, spread)`,
/// seeded by `seed` so the attempt is reproducible from an experiment's
/// random seed.
pub async fn perturb_one(tx: &Sender<NeuronMessage>, spread: f64, seed: u64) -> bool {
    tx.send(NeuronMessage::WeightPerturb { spread, seed }).await.is_ok()
}

/// Tell one neuron its current candidate improved fitness: `baseline := current`
pub async fn accept_one(tx: &Sender<NeuronMessage>) -> bool {
    tx.send(NeuronMessage::AcceptBaseline).await.is_ok()
}

/// Tell one neuron its current candidate did not improve fitness:
/// `current`, `baseline := backup`
pub async fn restore_one(tx: &Sender<NeuronMessage>) -> bool {
    tx.send(NeuronMessage::WeightRestore).await.is_ok()
}

/// Snapshot every neuron's current weights into its backup set, for
/// Lamarckian heredity writeback once an evaluation ends.
pub async fn backup_all(neuron_controls: &HashMap<NeuronId, Sender<NeuronMessage>>, heredity: HeredityType) -> HashMap<NeuronId, Vec<f64>> {
    let mut snapshots = HashMap::new();
    for (&id, tx) in neuron_controls {
        if let Some(weights) = backup_one(tx, heredity).await {
            snapshots.insert(id, weights);
        }
    }
    snapshots
}
