//! Error types for bond valuation

use std::fmt;

use thiserror::Error;

use crate::solver::SolverError;

/// Result type for valuation operations
pub type ValuationResult<T> = Result<T, ValuationError>;

/// Valuation operation that drove a root-finding solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Yield-to-maturity inversion of an observed price
    ImpliedYield,
    /// Spot curve bootstrap
    Bootstrap,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ImpliedYield => write!(f, "implied yield"),
            Operation::Bootstrap => write!(f, "spot curve bootstrap"),
        }
    }
}

/// Errors raised by pricing, yield solving and bootstrapping
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Caller-supplied input rejected before any discounting
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// The root finder gave up
    #[error("{operation} did not converge{}: {source}", tenor_suffix(.tenor_index))]
    NonConvergence {
        operation: Operation,
        /// Index of the bootstrap instrument that failed, if any
        tenor_index: Option<usize>,
        #[source]
        source: SolverError,
    },

    /// A discount base that is zero or negative, or a non-finite present value
    #[error("Numeric degeneracy: {reason}")]
    NumericDegeneracy { reason: String },
}

fn tenor_suffix(tenor_index: &Option<usize>) -> String {
    match tenor_index {
        Some(index) => format!(" at tenor index {}", index),
        None => String::new(),
    }
}

impl ValuationError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            reason: reason.into(),
        }
    }

    /// True for errors a caller can fix by changing its inputs
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ValuationError::InvalidInput { .. })
    }

    /// Failing bootstrap tenor, when the error came from a curve build
    pub fn tenor_index(&self) -> Option<usize> {
        match self {
            ValuationError::NonConvergence { tenor_index, .. } => *tenor_index,
            _ => None,
        }
    }
}

/// Reject NaN and infinities for a named input
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> ValuationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValuationError::invalid_input(field, format!("must be finite, got {}", value)))
    }
}

/// Reject non-positive (or non-finite) values for a named input
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> ValuationResult<f64> {
    let value = ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValuationError::invalid_input(field, format!("must be positive, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_convergence_message_names_tenor() {
        let err = ValuationError::NonConvergence {
            operation: Operation::Bootstrap,
            tenor_index: Some(3),
            source: SolverError::IterationLimit {
                iterations: 50,
                last_step: 0.25,
            },
        };

        let message = err.to_string();
        assert!(message.starts_with("spot curve bootstrap did not converge at tenor index 3"), "{}", message);
        assert_eq!(err.tenor_index(), Some(3));
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("face_value", 100.0), Ok(100.0));
        assert!(ensure_positive("face_value", 0.0).unwrap_err().is_invalid_input());
        assert!(ensure_positive("face_value", -1.0).is_err());
        assert!(ensure_positive("face_value", f64::NAN).is_err());
        assert!(ensure_finite("yield", f64::INFINITY).is_err());
    }
}
