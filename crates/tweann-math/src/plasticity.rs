//! Online plasticity rules: how a synaptic weight changes immediately
//! after its owning neuron fires.
//!
//! Every rule is a variant of [`PlasticityRule`] carrying its own
//! parameters, matched rather than looked up by name (see the dynamic
//! dispatch design note in `DESIGN.md`). All deltas this module computes
//! are meant to be applied as `sat(weight + delta, -2*PI, 2*PI)` by the
//! caller; saturation itself lives in [`crate::activation::sat`] so every
//! plasticity site and every weight-mutation site shares one clamp.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Saturation bound shared by every synaptic weight in the system.
pub const WEIGHT_BOUND: f64 = 2.0 * PI;

/// A scalar plasticity parameter that is either a fixed constant or
/// produced at runtime by an embedded modulatory neuron.
///
/// `self_modulation_v1`..`v6` differ only in which of (H, A, B, C, D) are
/// `Modulatory` rather than `Fixed`; see `DESIGN.md` for the escalating
/// mapping chosen for each variant (not specified by the source text).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModParam {
    /// A constant value, evolved like any other genotype parameter
    Fixed(f64),
    /// Computed each cycle as `tanh(dot(input, weights))` from an
    /// embedded modulatory neuron's weight vector
    Modulatory(Vec<f64>),
}

impl ModParam {
    /// Resolve this parameter against the neuron's current input vector
    pub fn resolve(&self, input: &[f64]) -> f64 {
        match self {
            ModParam::Fixed(v) => *v,
            ModParam::Modulatory(weights) => {
                let dot: f64 = input.iter().zip(weights.iter()).map(|(x, w)| x * w).sum();
                dot.tanh()
            }
        }
    }
}

/// Parameters shared by `neuromodulation` and all `self_modulation_v*`
/// rules: `delta = h * (a*x*y + b*x + c*y + d)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeuromodulationParams {
    /// Overall learning-rate modulator
    pub h: ModParam,
    /// Hebbian (correlation) term coefficient
    pub a: ModParam,
    /// Presynaptic term coefficient
    pub b: ModParam,
    /// Postsynaptic term coefficient
    pub c: ModParam,
    /// Constant offset
    pub d: ModParam,
}

impl NeuromodulationParams {
    /// Build an all-fixed parameter set, as used by plain `neuromodulation`
    pub fn fixed(h: f64, a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            h: ModParam::Fixed(h),
            a: ModParam::Fixed(a),
            b: ModParam::Fixed(b),
            c: ModParam::Fixed(c),
            d: ModParam::Fixed(d),
        }
    }
}

/// Which of the five neuromodulation coefficients `self_modulation_v1`
/// through `v6` drive from embedded modulatory neurons, versus evolved
/// constants. See `DESIGN.md` for the rationale behind this mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelfModulationVariant {
    /// Only H is modulatory
    V1,
    /// H and A are modulatory
    V2,
    /// H, A and B are modulatory
    V3,
    /// H, A, B and C are modulatory
    V4,
    /// All five coefficients are modulatory
    V5,
    /// All five coefficients are modulatory, each with an independent
    /// modulatory neuron rather than a shared one
    V6,
}

/// The closed set of online plasticity rules
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlasticityRule {
    /// No online learning; weights are fixed between tuning events
    None,
    /// Hebbian learning with an independent rate per weight
    HebbianW(Vec<f64>),
    /// Hebbian learning with a single rate shared by the whole neuron
    Hebbian(f64),
    /// Oja's rule with an independent rate per weight
    OjasW(Vec<f64>),
    /// Oja's rule with a single rate shared by the whole neuron
    Ojas(f64),
    /// Neuromodulated plasticity with fixed or modulatory coefficients
    Neuromodulation(NeuromodulationParams),
    /// One of the six self-modulation variants built on the
    /// neuromodulation update form
    SelfModulation(SelfModulationVariant, NeuromodulationParams),
}

impl PlasticityRule {
    /// Compute the weight delta for the weight at `weight_index` in this
    /// neuron's flattened weight list, given the pre-fire input on that
    /// weight (`x_ij`), the neuron's post-fire output (`y`), the full
    /// input vector (needed by modulatory coefficients), and the weight's
    /// current value (needed by Oja's rule).
    pub fn delta(&self, weight_index: usize, x_ij: f64, y: f64, current_weight: f64, input: &[f64]) -> f64 {
        match self {
            PlasticityRule::None => 0.0,
            PlasticityRule::HebbianW(h) => h.get(weight_index).copied().unwrap_or(0.0) * x_ij * y,
            PlasticityRule::Hebbian(h) => h * x_ij * y,
            PlasticityRule::OjasW(h) => {
                let h = h.get(weight_index).copied().unwrap_or(0.0);
                h * y * (x_ij - y * current_weight)
            }
            PlasticityRule::Ojas(h) => h * y * (x_ij - y * current_weight),
            PlasticityRule::Neuromodulation(p) => neuromodulation_delta(p, x_ij, y, input),
            PlasticityRule::SelfModulation(_, p) => neuromodulation_delta(p, x_ij, y, input),
        }
    }

    /// Apply this rule's delta and saturate the result to `[-2*PI, 2*PI]`
    pub fn update_weight(&self, weight_index: usize, x_ij: f64, y: f64, current_weight: f64, input: &[f64]) -> f64 {
        let delta = self.delta(weight_index, x_ij, y, current_weight, input);
        crate::activation::sat(current_weight + delta, -WEIGHT_BOUND, WEIGHT_BOUND)
    }

    /// Number of per-weight H parameters this rule needs, if any
    pub fn per_weight_param_count(&self) -> Option<usize> {
        match self {
            PlasticityRule::HebbianW(h) | PlasticityRule::OjasW(h) => Some(h.len()),
            _ => None,
        }
    }
}

fn neuromodulation_delta(p: &NeuromodulationParams, x: f64, y: f64, input: &[f64]) -> f64 {
    let h = p.h.resolve(input);
    let a = p.a.resolve(input);
    let b = p.b.resolve(input);
    let c = p.c.resolve(input);
    let d = p.d.resolve(input);
    h * (a * x * y + b * x + c * y + d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_changes_weight() {
        assert_eq!(PlasticityRule::None.delta(0, 1.0, 1.0, 0.5, &[1.0]), 0.0);
    }

    #[test]
    fn hebbian_scales_by_presynaptic_and_postsynaptic() {
        let rule = PlasticityRule::Hebbian(0.1);
        assert_eq!(rule.delta(0, 2.0, 3.0, 0.0, &[]), 0.1 * 2.0 * 3.0);
    }

    #[test]
    fn hebbian_w_indexes_into_per_weight_rates() {
        let rule = PlasticityRule::HebbianW(vec![0.1, 0.2, 0.3]);
        assert_eq!(rule.delta(1, 1.0, 1.0, 0.0, &[]), 0.2);
        // out-of-range index is treated as no plasticity for that weight
        assert_eq!(rule.delta(9, 1.0, 1.0, 0.0, &[]), 0.0);
    }

    #[test]
    fn ojas_rule_includes_weight_decay_term() {
        let rule = PlasticityRule::Ojas(1.0);
        let delta = rule.delta(0, 2.0, 0.5, 1.0, &[]);
        assert_eq!(delta, 1.0 * 0.5 * (2.0 - 0.5 * 1.0));
    }

    #[test]
    fn neuromodulation_uses_fixed_coefficients() {
        let params = NeuromodulationParams::fixed(1.0, 1.0, 0.0, 0.0, 0.0);
        let rule = PlasticityRule::Neuromodulation(params);
        // delta = H*(A*x*y) = 1*(1*2*3) = 6
        assert_eq!(rule.delta(0, 2.0, 3.0, 0.0, &[2.0, 3.0]), 6.0);
    }

    #[test]
    fn self_modulation_resolves_modulatory_h_via_tanh_dot() {
        let params = NeuromodulationParams {
            h: ModParam::Modulatory(vec![1.0, 0.0]),
            a: ModParam::Fixed(1.0),
            b: ModParam::Fixed(0.0),
            c: ModParam::Fixed(0.0),
            d: ModParam::Fixed(0.0),
        };
        let rule = PlasticityRule::SelfModulation(SelfModulationVariant::V1, params);
        let input = vec![0.5, 100.0];
        let expected_h = (0.5_f64).tanh();
        let expected = expected_h * (1.0 * 1.0 * 1.0);
        assert!((rule.delta(0, 1.0, 1.0, 0.0, &input) - expected).abs() < 1e-12);
    }

    #[test]
    fn update_weight_saturates_to_two_pi() {
        let rule = PlasticityRule::Hebbian(1_000.0);
        let updated = rule.update_weight(0, 1.0, 1.0, 0.0, &[]);
        assert!(updated <= WEIGHT_BOUND);
        let rule_neg = PlasticityRule::Hebbian(-1_000.0);
        let updated_neg = rule_neg.update_weight(0, 1.0, 1.0, 0.0, &[]);
        assert!(updated_neg >= -WEIGHT_BOUND);
    }

    #[test]
    fn per_weight_param_count_reports_only_for_w_variants() {
        assert_eq!(PlasticityRule::None.per_weight_param_count(), None);
        assert_eq!(
            PlasticityRule::HebbianW(vec![0.1, 0.2]).per_weight_param_count(),
            Some(2)
        );
    }
}
