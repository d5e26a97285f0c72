//! Error types for Black-76 operations.

use stripper_core::types::SolverError;
use thiserror::Error;

/// Black-76 pricing and inversion errors.
///
/// Numeric context is reported as `f64` regardless of the working
/// floating-point type.
///
/// # Examples
///
/// ```
/// use stripper_models::analytical::Black76Error;
///
/// let err = Black76Error::InvalidForward { forward: -0.01 };
/// assert!(format!("{}", err).contains("-0.01"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Black76Error {
    /// Negative or non-finite standard deviation.
    #[error("Invalid standard deviation: σ√t = {std_dev}")]
    InvalidStdDev {
        /// The offending standard deviation
        std_dev: f64,
    },

    /// Non-positive forward rate; lognormal dynamics require F > 0.
    #[error("Invalid forward: F = {forward}")]
    InvalidForward {
        /// The offending forward
        forward: f64,
    },

    /// Non-positive strike; lognormal dynamics require K > 0.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The offending strike
        strike: f64,
    },

    /// Non-positive annuity supplied to the inversion.
    #[error("Invalid annuity: A = {annuity}")]
    InvalidAnnuity {
        /// The offending annuity
        annuity: f64,
    },

    /// Target price outside the arbitrage bounds of the formula, so no
    /// standard deviation can reproduce it.
    #[error("Price {price} outside feasible range [{lower}, {upper}]")]
    PriceOutOfBounds {
        /// The requested (undiscounted) price
        price: f64,
        /// Intrinsic value, the infimum of attainable prices
        lower: f64,
        /// Supremum of attainable prices
        upper: f64,
    },

    /// The root finder failed.
    #[error("Root finding failed: {0}")]
    Solver(#[from] SolverError),
}
