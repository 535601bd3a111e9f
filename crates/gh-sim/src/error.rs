//! Error types for integration and discretization.

use gh_core::GhError;
use thiserror::Error;

/// Errors encountered while constructing or stepping transient state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Numeric divergence in {what} at node {index}: {value}")]
    NumericDivergence {
        what: &'static str,
        index: usize,
        value: f64,
    },

    #[error(transparent)]
    Core(#[from] GhError),
}

pub type SimResult<T> = Result<T, SimError>;

/// Reject a non-finite or non-positive configuration value.
pub fn require_positive(value: f64, what: &'static str) -> SimResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidConfiguration { what })
    }
}

/// Reject a non-finite or negative configuration value.
pub fn require_non_negative(value: f64, what: &'static str) -> SimResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidConfiguration { what })
    }
}

/// Reject a non-finite configuration value.
pub fn require_finite(value: f64, what: &'static str) -> SimResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::InvalidConfiguration { what })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators() {
        assert!(require_positive(1.0, "x").is_ok());
        assert!(require_positive(0.0, "x").is_err());
        assert!(require_positive(f64::NAN, "x").is_err());
        assert!(require_non_negative(0.0, "x").is_ok());
        assert!(require_non_negative(-0.1, "x").is_err());
        assert!(require_non_negative(f64::INFINITY, "x").is_err());
        assert!(require_finite(-1.0, "x").is_ok());
        assert!(require_finite(f64::NAN, "x").is_err());
    }
}
