//! Error types for the pure math layer

use thiserror::Error;

/// Result type for math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Errors that can occur while evaluating activation, aggregation or
/// plasticity functions
#[derive(Error, Debug)]
pub enum MathError {
    /// Input and weight vectors did not line up
    #[error("aggregation shape mismatch: {inputs} input groups, {weights} weight groups")]
    ShapeMismatch {
        /// Number of input groups supplied
        inputs: usize,
        /// Number of weight groups supplied
        weights: usize,
    },

    /// A per-weight plasticity parameter vector did not match the weight
    /// vector it decorates
    #[error("plasticity parameter length {params} does not match weight count {weights}")]
    ParameterLengthMismatch {
        /// Length of the parameter vector
        params: usize,
        /// Length of the weight vector
        weights: usize,
    },

    /// Invalid parameter value
    #[error("invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },
}

impl MathError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}
