//! Error types for the optionlet bootstrap.

use thiserror::Error;

use stripper_core::market_data::MarketDataError;
use stripper_core::types::time::{Date, Tenor};
use stripper_models::analytical::{Black76Error, OptionType};
use stripper_models::instruments::EngineError;

/// Structural problems detected while wiring a stripper together.
///
/// These are raised at construction time: a stripper that builds
/// successfully has a coherent ladder, strike axis, and switch-strike
/// vector, and can only fail later for numerical or market-data reasons.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The quoted surface does not reach the shortest cap/floor the
    /// bootstrap needs.
    #[error("Surface too short: the first cap/floor spans {required} but the surface only reaches {max_tenor}")]
    SurfaceTooShort {
        /// Length of the shortest bootstrappable instrument (twice the
        /// index period)
        required: Tenor,
        /// Longest quoted surface tenor
        max_tenor: Tenor,
    },

    /// The switch-strike vector is neither empty, a singleton, nor one
    /// entry per optionlet tenor.
    #[error("Switch strike count mismatch: got {got}, expected 0, 1 or {expected}")]
    SwitchStrikeCount {
        /// Number of switch strikes supplied
        got: usize,
        /// Number of optionlet tenors in the ladder
        expected: usize,
    },

    /// The surface quotes no strikes.
    #[error("Surface quotes no strikes")]
    EmptyStrikeAxis,

    /// The surface quotes no tenors.
    #[error("Surface quotes no tenors")]
    EmptyTenorAxis,
}

/// Diagnostic payload of a failed implied-volatility inversion.
///
/// Carries everything needed to reconstruct the offending optionlet
/// without re-running the bootstrap. Diagnostics are reported in `f64`
/// regardless of the working precision.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Optionlet inversion failed: {option_type} fixing {fixing_date}, strike {strike}, \
     ATM {atm_rate}, price {price}, annuity {annuity}: {source}"
)]
pub struct BootstrapFailure {
    /// Fixing date of the optionlet that failed to invert.
    pub fixing_date: Date,
    /// Whether the optionlet was a caplet (call) or floorlet (put).
    pub option_type: OptionType,
    /// Strike of the failed column.
    pub strike: f64,
    /// ATM forward rate at the fixing date.
    pub atm_rate: f64,
    /// Differenced optionlet price handed to the inversion.
    pub price: f64,
    /// Annuity (accrual × discount at fixing) scaling the price.
    pub annuity: f64,
    /// Underlying cause.
    #[source]
    pub source: Black76Error,
}

/// Errors raised by a bootstrap pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StripError {
    /// An optionlet price could not be inverted to a volatility. The
    /// usual cause is a decreasing cumulative price in the input surface
    /// (negative optionlet time value).
    #[error("{0}")]
    Inversion(BootstrapFailure),

    /// Pricing a cumulative cap/floor failed.
    #[error("Cap/floor pricing failed: {0}")]
    Engine(#[from] EngineError),

    /// A surface or curve lookup failed.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_too_short_display() {
        let err = ConfigurationError::SurfaceTooShort {
            required: Tenor::months(6),
            max_tenor: Tenor::months(3),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("6M"));
        assert!(msg.contains("3M"));
    }

    #[test]
    fn test_bootstrap_failure_carries_diagnostics() {
        let failure = BootstrapFailure {
            fixing_date: Date::from_ymd(2025, 3, 14).unwrap(),
            option_type: OptionType::Put,
            strike: 0.02,
            atm_rate: 0.04,
            price: -0.0001,
            annuity: 0.49,
            source: Black76Error::PriceOutOfBounds {
                price: -0.0001,
                lower: 0.0,
                upper: 0.02,
            },
        };
        let msg = format!("{}", StripError::Inversion(failure));
        assert!(msg.contains("put"));
        assert!(msg.contains("2025-03-14"));
        assert!(msg.contains("0.02"));
    }

    #[test]
    fn test_market_data_wrapping() {
        let err: StripError = MarketDataError::UnknownStrike { strike: 0.03 }.into();
        assert!(matches!(err, StripError::MarketData(_)));
    }
}
