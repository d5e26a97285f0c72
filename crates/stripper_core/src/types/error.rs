//! Shared error types for Layer 1.
//!
//! This module provides:
//! - `DateError`: invalid dates and failed date arithmetic
//! - `SolverError`: root-finding failures

use thiserror::Error;

/// Date construction and arithmetic errors.
///
/// # Examples
///
/// ```
/// use stripper_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert!(format!("{}", err).contains("2024"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The year/month/day combination does not form a valid calendar date.
    #[error("Invalid date: {year}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component
        day: u32,
    },

    /// Failed to parse a date from its string representation.
    #[error("Failed to parse date: {0}")]
    ParseError(String),

    /// Date arithmetic moved outside the representable range.
    #[error("Date arithmetic overflow: {reason}")]
    Overflow {
        /// Description of the failing operation
        reason: String,
    },
}

/// Root-finding solver errors.
///
/// Numeric context is reported as `f64` regardless of the working
/// floating-point type, so diagnostics stay printable for generic `T`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The supplied bracket does not contain a sign change.
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// The solver did not converge within the iteration budget.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations performed
        iterations: usize,
    },

    /// The objective function returned a non-finite value.
    #[error("Non-finite function value at x = {x}")]
    NonFiniteEvaluation {
        /// Evaluation point that produced the non-finite value
        x: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_display() {
        let err = DateError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29,
        };
        assert_eq!(format!("{}", err), "Invalid date: 2023-02-29");
    }

    #[test]
    fn test_no_bracket_display() {
        let err = SolverError::NoBracket { a: 0.1, b: 0.5 };
        assert!(format!("{}", err).contains("same sign"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = SolverError::MaxIterationsExceeded { iterations: 100 };
        let _: &dyn std::error::Error = &err;
        let err = DateError::ParseError("bad".into());
        let _: &dyn std::error::Error = &err;
    }
}
