//! Error types for cap/floor pricing.

use stripper_core::market_data::MarketDataError;
use stripper_core::types::time::Tenor;
use stripper_core::types::DateError;
use thiserror::Error;

use crate::analytical::Black76Error;

/// Cap/floor pricing engine errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The cumulative length is not a whole number of index periods, or
    /// is shorter than the two periods needed to contain an optionlet.
    #[error("Invalid cap/floor length {length}: must be a multiple of the index tenor {index_tenor} and span at least two periods")]
    InvalidLength {
        /// The requested cumulative length
        length: Tenor,
        /// The index compounding period
        index_tenor: Tenor,
    },

    /// Negative or non-finite flat volatility.
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The offending volatility
        volatility: f64,
    },

    /// A market data lookup failed.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Black-76 valuation failed.
    #[error("Black-76 valuation failed: {0}")]
    Analytical(#[from] Black76Error),

    /// Date arithmetic failed while laying out the fixing schedule.
    #[error("Date arithmetic failed: {0}")]
    Date(#[from] DateError),
}
