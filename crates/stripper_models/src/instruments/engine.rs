//! Flat-volatility Black-76 cap/floor pricing engine.

use std::marker::PhantomData;
use std::sync::Arc;

use num_traits::Float;

use stripper_core::market_data::{DiscountCurve, ForwardRateIndex};
use stripper_core::types::time::{Date, DayCountConvention, Tenor};

use super::capfloor::{CapFloorKind, CapFloorPricingAdapter, PricedCapFloor};
use super::error::EngineError;
use crate::analytical::black76::black_price;

/// Black-76 cap/floor engine over a forward-rate index and a discount
/// curve.
///
/// A cumulative instrument of length `L` on an index of period `P`
/// contains optionlets fixing at `reference + kP` for
/// `k = 1 .. L/P − 1`. The period fixing at the reference date itself is
/// already determined and carries no optionality, so it is excluded;
/// the shortest priceable instrument (`L = 2P`) therefore contains
/// exactly one optionlet. Each optionlet is valued as
///
/// ```text
/// accrual(fixing, fixing+P) × D(fixing) × black(type, K, F(fixing), σ√t)
/// ```
///
/// with one flat volatility `σ` for the whole strip. Cash flows are
/// discounted to the optionlet fixing date, the same annuity the
/// bootstrap inversion uses, so differencing engine prices and
/// inverting the difference are mutually consistent operations.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stripper_core::market_data::{FlatDiscountCurve, FlatForwardIndex};
/// use stripper_core::types::time::{Date, DayCountConvention, Tenor};
/// use stripper_models::instruments::{BlackCapFloorEngine, CapFloorKind, CapFloorPricingAdapter};
///
/// let reference = Date::from_ymd(2024, 6, 14).unwrap();
/// let index = Arc::new(FlatForwardIndex::new(Tenor::months(3), 0.04_f64));
/// let curve = Arc::new(FlatDiscountCurve::new(reference, 0.03, DayCountConvention::Actual365Fixed));
///
/// let engine = BlackCapFloorEngine::new(index, curve, reference, DayCountConvention::Actual365Fixed);
/// let priced = engine.price(Tenor::months(6), 0.05, 0.20, CapFloorKind::Cap).unwrap();
/// assert!(priced.npv() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct BlackCapFloorEngine<T, I, C>
where
    T: Float,
    I: ForwardRateIndex<T>,
    C: DiscountCurve<T>,
{
    index: Arc<I>,
    curve: Arc<C>,
    reference_date: Date,
    day_count: DayCountConvention,
    _numeric: PhantomData<fn() -> T>,
}

impl<T, I, C> BlackCapFloorEngine<T, I, C>
where
    T: Float,
    I: ForwardRateIndex<T>,
    C: DiscountCurve<T>,
{
    /// Creates an engine pricing off the given index and discount curve.
    ///
    /// `reference_date` anchors the fixing schedule; `day_count` converts
    /// schedule dates into accruals and times to fixing.
    pub fn new(
        index: Arc<I>,
        curve: Arc<C>,
        reference_date: Date,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            index,
            curve,
            reference_date,
            day_count,
            _numeric: PhantomData,
        }
    }

    /// Returns the engine's reference date.
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    // Fixing offsets (in index periods) for a cumulative instrument;
    // fails unless the length is a multiple of the index tenor spanning
    // at least two periods.
    fn fixing_offsets(&self, cumulative_length: Tenor) -> Result<std::ops::Range<u32>, EngineError> {
        let index_tenor = self.index.tenor();
        let periods = cumulative_length.div(index_tenor);
        if !cumulative_length.is_multiple_of(index_tenor) || periods < 2 {
            return Err(EngineError::InvalidLength {
                length: cumulative_length,
                index_tenor,
            });
        }
        Ok(1..periods)
    }

    fn fixing_date(&self, offset: u32) -> Result<Date, EngineError> {
        Ok(self
            .reference_date
            .add_months(offset * self.index.tenor().as_months())?)
    }
}

impl<T, I, C> CapFloorPricingAdapter<T> for BlackCapFloorEngine<T, I, C>
where
    T: Float,
    I: ForwardRateIndex<T>,
    C: DiscountCurve<T>,
{
    fn price(
        &self,
        cumulative_length: Tenor,
        strike: T,
        volatility: T,
        kind: CapFloorKind,
    ) -> Result<PricedCapFloor<T>, EngineError> {
        if volatility < T::zero() || !volatility.is_finite() {
            return Err(EngineError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            });
        }

        let offsets = self.fixing_offsets(cumulative_length)?;
        let index_tenor = self.index.tenor();

        let mut npv = T::zero();
        let mut last_fixing = self.reference_date;
        for offset in offsets {
            let fixing = self.fixing_date(offset)?;
            let accrual_end = fixing.add_tenor(index_tenor)?;

            let accrual = T::from(self.day_count.year_fraction(fixing, accrual_end))
                .unwrap_or_else(T::zero);
            let time_to_fixing = self.day_count.year_fraction(self.reference_date, fixing);
            let std_dev = volatility
                * T::from(time_to_fixing.sqrt()).unwrap_or_else(T::zero);

            let forward = self.index.forecast_fixing(fixing)?;
            let discount = self.curve.discount(fixing)?;

            npv = npv
                + accrual * discount * black_price(kind.option_type(), strike, forward, std_dev)?;
            last_fixing = fixing;
        }

        let discount_at_fixing = self.curve.discount(last_fixing)?;
        Ok(PricedCapFloor::new(npv, last_fixing, discount_at_fixing))
    }

    fn last_fixing_date(&self, cumulative_length: Tenor) -> Result<Date, EngineError> {
        let offsets = self.fixing_offsets(cumulative_length)?;
        self.fixing_date(offsets.end - 1)
    }

    fn forecast_fixing(&self, date: Date) -> Result<T, EngineError> {
        Ok(self.index.forecast_fixing(date)?)
    }

    fn discount(&self, date: Date) -> Result<T, EngineError> {
        Ok(self.curve.discount(date)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stripper_core::market_data::{FlatDiscountCurve, FlatForwardIndex};

    const DC: DayCountConvention = DayCountConvention::Actual365Fixed;

    fn reference() -> Date {
        Date::from_ymd(2024, 6, 14).unwrap()
    }

    fn engine(
        rate: f64,
    ) -> BlackCapFloorEngine<f64, FlatForwardIndex<f64>, FlatDiscountCurve<f64>> {
        let index = Arc::new(FlatForwardIndex::new(Tenor::months(3), rate));
        let curve = Arc::new(FlatDiscountCurve::new(reference(), 0.03, DC));
        BlackCapFloorEngine::new(index, curve, reference(), DC)
    }

    // Value of the single optionlet fixing at `reference + offset`, the
    // same arithmetic the engine is expected to perform per period.
    fn single_optionlet(
        eng: &BlackCapFloorEngine<f64, FlatForwardIndex<f64>, FlatDiscountCurve<f64>>,
        offset_months: u32,
        strike: f64,
        vol: f64,
        kind: CapFloorKind,
    ) -> f64 {
        let fixing = reference().add_months(offset_months).unwrap();
        let end = fixing.add_months(3).unwrap();
        let accrual = DC.year_fraction(fixing, end);
        let t = DC.year_fraction(reference(), fixing);
        let forward = eng.forecast_fixing(fixing).unwrap();
        let df = eng.discount(fixing).unwrap();
        accrual
            * df
            * black_price(kind.option_type(), strike, forward, vol * t.sqrt()).unwrap()
    }

    #[test]
    fn test_two_period_instrument_is_one_optionlet() {
        let eng = engine(0.04);
        let priced = eng
            .price(Tenor::months(6), 0.05, 0.20, CapFloorKind::Cap)
            .unwrap();
        let expected = single_optionlet(&eng, 3, 0.05, 0.20, CapFloorKind::Cap);
        assert_relative_eq!(priced.npv(), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_npv_additivity_across_lengths() {
        let eng = engine(0.04);
        let short = eng
            .price(Tenor::months(6), 0.05, 0.20, CapFloorKind::Cap)
            .unwrap();
        let long = eng
            .price(Tenor::months(9), 0.05, 0.20, CapFloorKind::Cap)
            .unwrap();
        let second = single_optionlet(&eng, 6, 0.05, 0.20, CapFloorKind::Cap);
        assert_relative_eq!(long.npv(), short.npv() + second, epsilon = 1e-15);
    }

    #[test]
    fn test_last_fixing_date() {
        let eng = engine(0.04);
        assert_eq!(
            eng.last_fixing_date(Tenor::months(6)).unwrap(),
            reference().add_months(3).unwrap()
        );
        assert_eq!(
            eng.last_fixing_date(Tenor::years(2)).unwrap(),
            reference().add_months(21).unwrap()
        );
    }

    #[test]
    fn test_priced_handle_discount_matches_curve() {
        let eng = engine(0.04);
        let priced = eng
            .price(Tenor::months(9), 0.05, 0.20, CapFloorKind::Cap)
            .unwrap();
        let fixing = reference().add_months(6).unwrap();
        assert_eq!(priced.last_fixing_date(), fixing);
        assert_relative_eq!(
            priced.discount_at_fixing(),
            eng.discount(fixing).unwrap()
        );
    }

    #[test]
    fn test_cap_floor_parity() {
        // cap - floor = sum of accrual * df * (F - K)
        let eng = engine(0.04);
        let length = Tenor::years(1);
        let cap = eng.price(length, 0.05, 0.20, CapFloorKind::Cap).unwrap();
        let floor = eng.price(length, 0.05, 0.20, CapFloorKind::Floor).unwrap();

        let mut expected = 0.0;
        for offset in [3u32, 6, 9] {
            let fixing = reference().add_months(offset).unwrap();
            let end = fixing.add_months(3).unwrap();
            let accrual = DC.year_fraction(fixing, end);
            expected += accrual * eng.discount(fixing).unwrap() * (0.04 - 0.05);
        }
        assert_relative_eq!(cap.npv() - floor.npv(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_volatility_prices_intrinsic() {
        let eng = engine(0.06);
        let priced = eng
            .price(Tenor::months(6), 0.04, 0.0, CapFloorKind::Cap)
            .unwrap();
        let fixing = reference().add_months(3).unwrap();
        let end = fixing.add_months(3).unwrap();
        let expected = DC.year_fraction(fixing, end) * eng.discount(fixing).unwrap() * 0.02;
        assert_relative_eq!(priced.npv(), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_invalid_lengths_rejected() {
        let eng = engine(0.04);
        for bad in [Tenor::months(3), Tenor::months(4), Tenor::months(7)] {
            let err = eng.price(bad, 0.05, 0.2, CapFloorKind::Cap).unwrap_err();
            assert!(matches!(err, EngineError::InvalidLength { .. }), "{}", bad);
        }
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let eng = engine(0.04);
        let err = eng
            .price(Tenor::months(6), 0.05, -0.1, CapFloorKind::Cap)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidVolatility { .. }));
    }
}
