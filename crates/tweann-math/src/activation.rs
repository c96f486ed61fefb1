//! Closed-set activation functions shared by every neuron
//!
//! Dispatch is a match expression over a tagged enum rather than a
//! symbolic name lookup: see the design note on dynamic dispatch in
//! `DESIGN.md`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Clamp `v` to the closed interval `[lo, hi]`
pub fn sat(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// The saturation window applied before evaluating `sigmoid` and `gaussian`,
/// matching spec.md's explicit `x clamped to [-10, 10]`.
const CLAMP_WINDOW: f64 = 10.0;

/// Threshold used by `trinary` to decide between -1, 0 and 1.
const TRINARY_THRESHOLD: f64 = 0.33;

/// The closed set of activation functions a neuron may be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Activation {
    /// Hyperbolic tangent
    Tanh,
    /// Logistic sigmoid, clamped to x in [-10, 10]
    Sigmoid,
    /// Fast sigmoid-like curve, x / (1 + |x|)
    Sigmoid1,
    /// Rectified linear unit
    Relu,
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Absolute value
    Absolute,
    /// Identity
    Linear,
    /// Signed square: sign(x) * x^2
    Quadratic,
    /// Gaussian bump, x clamped to [-10, 10] before squaring
    Gaussian,
    /// Signed square root: sign(x) * sqrt(|x|)
    Sqrt,
    /// Signed natural log: sign(x) * ln(|x|), with log(0) defined as 0
    Log,
    /// Sign function in {-1, 0, 1}
    Sgn,
    /// Binary step in {0, 1}
    Bin,
    /// Ternary step in {-1, 0, 1}
    Trinary,
}

impl Activation {
    /// Evaluate the activation function at `x`
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => {
                let clamped = sat(x, -CLAMP_WINDOW, CLAMP_WINDOW);
                1.0 / (1.0 + (-clamped).exp())
            }
            Activation::Sigmoid1 => x / (1.0 + x.abs()),
            Activation::Relu => x.max(0.0),
            Activation::Sin => x.sin(),
            Activation::Cos => x.cos(),
            Activation::Absolute => x.abs(),
            Activation::Linear => x,
            Activation::Quadratic => signum(x) * x * x,
            Activation::Gaussian => {
                let clamped = sat(x, -CLAMP_WINDOW, CLAMP_WINDOW);
                (-(clamped * clamped)).exp()
            }
            Activation::Sqrt => signum(x) * x.abs().sqrt(),
            Activation::Log => {
                if x == 0.0 {
                    0.0
                } else {
                    signum(x) * x.abs().ln()
                }
            }
            Activation::Sgn => signum(x),
            Activation::Bin => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Trinary => {
                if x > TRINARY_THRESHOLD {
                    1.0
                } else if x < -TRINARY_THRESHOLD {
                    -1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// All activation functions, in a stable order; used by mutation
    /// operators to draw a random member of the closed set.
    pub const ALL: [Activation; 15] = [
        Activation::Tanh,
        Activation::Sigmoid,
        Activation::Sigmoid1,
        Activation::Relu,
        Activation::Sin,
        Activation::Cos,
        Activation::Absolute,
        Activation::Linear,
        Activation::Quadratic,
        Activation::Gaussian,
        Activation::Sqrt,
        Activation::Log,
        Activation::Sgn,
        Activation::Bin,
        Activation::Trinary,
    ];
}

/// Sign function returning exactly -1, 0 or 1 (unlike `f64::signum`, which
/// never returns 0).
fn signum(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sat_clamps_both_directions() {
        assert_eq!(sat(5.0, -1.0, 1.0), 1.0);
        assert_eq!(sat(-5.0, -1.0, 1.0), -1.0);
        assert_eq!(sat(0.5, -1.0, 1.0), 0.5);
    }

    #[test]
    fn sigmoid_is_bounded_and_clamped() {
        let huge = Activation::Sigmoid.apply(1_000.0);
        let clamped_ref = Activation::Sigmoid.apply(10.0);
        assert_eq!(huge, clamped_ref);
        assert!(huge > 0.0 && huge < 1.0);
    }

    #[test]
    fn sigmoid1_matches_formula() {
        let x = 3.0;
        assert_eq!(Activation::Sigmoid1.apply(x), x / (1.0 + x.abs()));
    }

    #[test]
    fn quadratic_preserves_sign() {
        assert_eq!(Activation::Quadratic.apply(2.0), 4.0);
        assert_eq!(Activation::Quadratic.apply(-2.0), -4.0);
        assert_eq!(Activation::Quadratic.apply(0.0), 0.0);
    }

    #[test]
    fn sqrt_preserves_sign() {
        assert_eq!(Activation::Sqrt.apply(4.0), 2.0);
        assert_eq!(Activation::Sqrt.apply(-4.0), -2.0);
    }

    #[test]
    fn log_of_zero_is_zero() {
        assert_eq!(Activation::Log.apply(0.0), 0.0);
    }

    #[test]
    fn log_preserves_sign() {
        let pos = Activation::Log.apply(std::f64::consts::E);
        assert!((pos - 1.0).abs() < 1e-9);
        let neg = Activation::Log.apply(-std::f64::consts::E);
        assert!((neg + 1.0).abs() < 1e-9);
    }

    #[test]
    fn sgn_returns_exactly_three_values() {
        assert_eq!(Activation::Sgn.apply(5.0), 1.0);
        assert_eq!(Activation::Sgn.apply(-5.0), -1.0);
        assert_eq!(Activation::Sgn.apply(0.0), 0.0);
    }

    #[test]
    fn bin_is_zero_or_one() {
        assert_eq!(Activation::Bin.apply(0.1), 1.0);
        assert_eq!(Activation::Bin.apply(-0.1), 0.0);
        assert_eq!(Activation::Bin.apply(0.0), 0.0);
    }

    #[test]
    fn trinary_has_a_dead_zone() {
        assert_eq!(Activation::Trinary.apply(0.9), 1.0);
        assert_eq!(Activation::Trinary.apply(-0.9), -1.0);
        assert_eq!(Activation::Trinary.apply(0.0), 0.0);
    }

    #[test]
    fn all_contains_every_variant_once() {
        let mut seen = std::collections::HashSet::new();
        for a in Activation::ALL {
            assert!(seen.insert(a));
        }
        assert_eq!(seen.len(), Activation::ALL.len());
    }
}
