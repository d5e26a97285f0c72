//! Discount curve contract.

use num_traits::Float;

use super::error::MarketDataError;
use crate::types::time::{Date, DayCountConvention};

/// Date-based discount factor lookup.
///
/// The stripping machinery only ever needs `D(reference, date)`; zero
/// rates and forward rates stay with the index collaborator.
pub trait DiscountCurve<T: Float> {
    /// Reference date the discount factors are measured from.
    fn reference_date(&self) -> Date;

    /// Discount factor from the reference date to `date`.
    ///
    /// Fails with [`MarketDataError::PastDate`] for dates before the
    /// reference date.
    fn discount(&self, date: Date) -> Result<T, MarketDataError>;
}

/// Flat continuously-compounded discount curve.
///
/// `D(t) = exp(-r * t)` with `t` measured under the curve's day count
/// convention.
///
/// # Examples
///
/// ```
/// use stripper_core::market_data::{DiscountCurve, FlatDiscountCurve};
/// use stripper_core::types::time::{Date, DayCountConvention};
///
/// let reference = Date::from_ymd(2024, 6, 14).unwrap();
/// let curve = FlatDiscountCurve::new(reference, 0.05_f64, DayCountConvention::Actual365Fixed);
///
/// let df = curve.discount(Date::from_ymd(2025, 6, 14).unwrap()).unwrap();
/// assert!((df - (-0.05_f64).exp()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatDiscountCurve<T: Float> {
    reference_date: Date,
    rate: T,
    day_count: DayCountConvention,
}

impl<T: Float> FlatDiscountCurve<T> {
    /// Creates a flat curve with the given continuously-compounded rate.
    pub fn new(reference_date: Date, rate: T, day_count: DayCountConvention) -> Self {
        Self {
            reference_date,
            rate,
            day_count,
        }
    }

    /// Returns the constant rate.
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> DiscountCurve<T> for FlatDiscountCurve<T> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn discount(&self, date: Date) -> Result<T, MarketDataError> {
        if date < self.reference_date {
            return Err(MarketDataError::PastDate {
                date,
                reference: self.reference_date,
            });
        }
        let t = T::from(self.day_count.year_fraction(self.reference_date, date))
            .unwrap_or_else(T::zero);
        Ok((-self.rate * t).exp())
    }
}
