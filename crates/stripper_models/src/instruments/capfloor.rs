//! Cap/floor instrument vocabulary and the pricing-adapter contract.
//!
//! A cap (floor) is a strip of calls (puts) on successive forward rates
//! of one index, quoted and priced as a single cumulative instrument.
//! The bootstrap engine never prices anything itself: it hands a
//! (cumulative length, strike, flat volatility, kind) tuple to a
//! [`CapFloorPricingAdapter`] and gets back a [`PricedCapFloor`].

use num_traits::Float;

use stripper_core::types::time::{Date, Tenor};

use super::error::EngineError;
use crate::analytical::OptionType;

/// Which side of the strike the instrument pays on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CapFloorKind {
    /// Pays when the forward rate exceeds the strike.
    Cap,
    /// Pays when the forward rate falls below the strike.
    Floor,
}

impl CapFloorKind {
    /// The per-optionlet option type: caplets are calls, floorlets puts.
    pub fn option_type(&self) -> OptionType {
        match self {
            CapFloorKind::Cap => OptionType::Call,
            CapFloorKind::Floor => OptionType::Put,
        }
    }
}

/// A priced cap/floor instrument handle.
///
/// Carries the cash value plus the two quantities the bootstrap needs
/// from the priced instrument afterwards: the last fixing date (which
/// identifies the final optionlet inside the strip) and the discount
/// factor at that date (which enters the inversion annuity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedCapFloor<T: Float> {
    npv: T,
    last_fixing_date: Date,
    discount_at_fixing: T,
}

impl<T: Float> PricedCapFloor<T> {
    /// Creates a priced handle.
    pub fn new(npv: T, last_fixing_date: Date, discount_at_fixing: T) -> Self {
        Self {
            npv,
            last_fixing_date,
            discount_at_fixing,
        }
    }

    /// Cash value of the instrument.
    pub fn npv(&self) -> T {
        self.npv
    }

    /// Fixing date of the final optionlet in the strip.
    pub fn last_fixing_date(&self) -> Date {
        self.last_fixing_date
    }

    /// Discount factor at the last fixing date.
    pub fn discount_at_fixing(&self) -> T {
        self.discount_at_fixing
    }
}

/// Pricing boundary used by the bootstrap engine.
///
/// Implementations price one cumulative cap/floor at a single flat
/// volatility per call, and expose the index and discount-curve lookups
/// the bootstrap needs alongside (fixing placement, forecast fixings,
/// discount factors). The engine in this crate implements the contract
/// with Black-76; tests substitute instrumented fakes.
pub trait CapFloorPricingAdapter<T: Float> {
    /// Prices the cumulative cap/floor of the given length and strike at
    /// one flat volatility.
    fn price(
        &self,
        cumulative_length: Tenor,
        strike: T,
        volatility: T,
        kind: CapFloorKind,
    ) -> Result<PricedCapFloor<T>, EngineError>;

    /// Fixing date of the final optionlet inside a cumulative instrument
    /// of the given length.
    fn last_fixing_date(&self, cumulative_length: Tenor) -> Result<Date, EngineError>;

    /// Forecast fixing of the underlying index at `date`.
    fn forecast_fixing(&self, date: Date) -> Result<T, EngineError>;

    /// Discount factor at `date` off the curve the priced instruments
    /// carry.
    fn discount(&self, date: Date) -> Result<T, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_option_type() {
        assert_eq!(CapFloorKind::Cap.option_type(), OptionType::Call);
        assert_eq!(CapFloorKind::Floor.option_type(), OptionType::Put);
    }

    #[test]
    fn test_priced_capfloor_accessors() {
        let date = Date::from_ymd(2025, 3, 14).unwrap();
        let priced = PricedCapFloor::new(0.0123_f64, date, 0.97);
        assert_eq!(priced.npv(), 0.0123);
        assert_eq!(priced.last_fixing_date(), date);
        assert_eq!(priced.discount_at_fixing(), 0.97);
    }
}
