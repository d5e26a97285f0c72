//! Market data error types.

use crate::types::time::{Date, Tenor};
use thiserror::Error;

/// Market data operation errors.
///
/// Covers volatility surface lookups, index fixings, and discount curve
/// queries. Numeric context is reported as `f64` regardless of the
/// working floating-point type.
///
/// # Examples
///
/// ```
/// use stripper_core::market_data::MarketDataError;
///
/// let err = MarketDataError::UnknownStrike { strike: 0.03 };
/// assert!(format!("{}", err).contains("0.03"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Strike not present on the quoted strike axis.
    #[error("Unknown strike: K = {strike} is not quoted on the surface")]
    UnknownStrike {
        /// The requested strike
        strike: f64,
    },

    /// Requested tenor lies outside the quoted range with extrapolation
    /// disabled.
    #[error("Tenor {tenor} outside quoted range [{min}, {max}] and extrapolation disabled")]
    TenorOutOfRange {
        /// The requested tenor
        tenor: Tenor,
        /// Shortest quoted tenor
        min: Tenor,
        /// Longest quoted tenor
        max: Tenor,
    },

    /// Date precedes the curve or surface reference date.
    #[error("Date {date} precedes reference date {reference}")]
    PastDate {
        /// The requested date
        date: Date,
        /// The reference date
        reference: Date,
    },

    /// Not enough quotes to construct the object.
    #[error("Insufficient data: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of quotes provided
        got: usize,
        /// Minimum required
        need: usize,
    },

    /// Quote grid dimensions disagree with the tenor/strike axes.
    #[error("Quote grid shape mismatch: got {got_rows}x{got_cols}, expected {rows}x{cols}")]
    ShapeMismatch {
        /// Row count of the supplied grid
        got_rows: usize,
        /// Column count of the supplied grid
        got_cols: usize,
        /// Expected row count (number of tenors)
        rows: usize,
        /// Expected column count (number of strikes)
        cols: usize,
    },

    /// The tenor axis is not strictly increasing.
    #[error("Option tenors must be strictly increasing (violation at index {index})")]
    UnsortedTenors {
        /// Index of the first out-of-order element
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenor_out_of_range_display() {
        let err = MarketDataError::TenorOutOfRange {
            tenor: Tenor::years(5),
            min: Tenor::months(6),
            max: Tenor::years(2),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("5Y"));
        assert!(msg.contains("2Y"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = MarketDataError::InsufficientData { got: 1, need: 2 };
        let _: &dyn std::error::Error = &err;
    }
}
