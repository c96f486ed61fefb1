//! Input aggregators: reduce a neuron's ordered, per-source input and
//! weight vectors down to the scalar fed into the activation function.

use crate::error::{MathError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of aggregator functions a neuron may be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Aggregator {
    /// Sum of element-wise products across every (input, weight) pair, plus bias
    Dot,
    /// Like `Dot`, but computed on the difference between the current and
    /// previous cycle's input vectors. The previous-input memory is owned
    /// by the caller (the neuron), not by this function: see
    /// `DiffMemory`.
    Diff,
    /// Multiplicative fold across every element-wise product, starting from 1
    Mult,
}

impl Aggregator {
    /// Aggregate `inputs` against `weights`, both given as an ordered list
    /// of per-source vectors in the neuron's configured input order.
    /// `bias` is added once, after aggregation. For `Diff`, `previous`
    /// holds last cycle's `inputs` in the same shape (or `None` on the
    /// first cycle after an agent's rebirth, treated as all zeros).
    pub fn aggregate(
        &self,
        inputs: &[Vec<f64>],
        weights: &[Vec<f64>],
        previous: Option<&[Vec<f64>]>,
        bias: f64,
    ) -> Result<f64> {
        if inputs.len() != weights.len() {
            return Err(MathError::ShapeMismatch {
                inputs: inputs.len(),
                weights: weights.len(),
            });
        }
        for (xs, ws) in inputs.iter().zip(weights.iter()) {
            if xs.len() != ws.len() {
                return Err(MathError::ShapeMismatch {
                    inputs: xs.len(),
                    weights: ws.len(),
                });
            }
        }

        let value = match self {
            Aggregator::Dot => {
                let mut acc = bias;
                for (xs, ws) in inputs.iter().zip(weights.iter()) {
                    for (x, w) in xs.iter().zip(ws.iter()) {
                        acc += x * w;
                    }
                }
                acc
            }
            Aggregator::Diff => {
                let mut acc = bias;
                for (idx, (xs, ws)) in inputs.iter().zip(weights.iter()).enumerate() {
                    for (j, (x, w)) in xs.iter().zip(ws.iter()).enumerate() {
                        let prev = previous
                            .and_then(|p| p.get(idx))
                            .and_then(|v| v.get(j))
                            .copied()
                            .unwrap_or(0.0);
                        acc += (x - prev) * w;
                    }
                }
                acc
            }
            Aggregator::Mult => {
                let mut acc = 1.0;
                for (xs, ws) in inputs.iter().zip(weights.iter()) {
                    for (x, w) in xs.iter().zip(ws.iter()) {
                        acc *= x * w;
                    }
                }
                acc + bias
            }
        };

        Ok(value)
    }

    /// All aggregator functions, in a stable order
    pub const ALL: [Aggregator; 3] = [Aggregator::Dot, Aggregator::Diff, Aggregator::Mult];
}

/// Per-neuron one-slot memory of the previous cycle's input vectors,
/// used by the `Diff` aggregator. This replaces the process-dictionary
/// trick of the original source with an explicit state field that is
/// reset whenever the owning agent is reborn.
#[derive(Debug, Clone, Default)]
pub struct DiffMemory {
    previous: Option<Vec<Vec<f64>>>,
}

impl DiffMemory {
    /// A fresh, empty memory (as at agent birth)
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// The stored previous input, if any cycle has run yet
    pub fn previous(&self) -> Option<&[Vec<f64>]> {
        self.previous.as_deref()
    }

    /// Store this cycle's input as "previous" for the next cycle
    pub fn record(&mut self, inputs: &[Vec<f64>]) {
        self.previous = Some(inputs.to_vec());
    }

    /// Clear the memory, as happens on agent rebirth
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product_sums_with_bias() {
        let inputs = vec![vec![1.0, 2.0], vec![3.0]];
        let weights = vec![vec![0.5, 0.5], vec![1.0]];
        let result = Aggregator::Dot.aggregate(&inputs, &weights, None, 0.25).unwrap();
        assert_eq!(result, 1.0 * 0.5 + 2.0 * 0.5 + 3.0 * 1.0 + 0.25);
    }

    #[test]
    fn mult_product_starts_at_one() {
        let inputs = vec![vec![2.0], vec![3.0]];
        let weights = vec![vec![1.0], vec![1.0]];
        let result = Aggregator::Mult.aggregate(&inputs, &weights, None, 0.0).unwrap();
        assert_eq!(result, 6.0);
    }

    #[test]
    fn diff_product_uses_zero_when_no_previous() {
        let inputs = vec![vec![1.0]];
        let weights = vec![vec![2.0]];
        let result = Aggregator::Diff.aggregate(&inputs, &weights, None, 0.0).unwrap();
        assert_eq!(result, 2.0); // (1.0 - 0.0) * 2.0
    }

    #[test]
    fn diff_product_uses_stored_previous() {
        let mut mem = DiffMemory::new();
        mem.record(&[vec![1.0]]);
        let inputs = vec![vec![4.0]];
        let weights = vec![vec![1.0]];
        let result = Aggregator::Diff
            .aggregate(&inputs, &weights, mem.previous(), 0.0)
            .unwrap();
        assert_eq!(result, 3.0); // (4.0 - 1.0) * 1.0
    }

    #[test]
    fn diff_memory_resets_on_rebirth() {
        let mut mem = DiffMemory::new();
        mem.record(&[vec![9.0]]);
        assert!(mem.previous().is_some());
        mem.reset();
        assert!(mem.previous().is_none());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let inputs = vec![vec![1.0, 2.0]];
        let weights = vec![vec![1.0]];
        assert!(Aggregator::Dot.aggregate(&inputs, &weights, None, 0.0).is_err());
    }
}
