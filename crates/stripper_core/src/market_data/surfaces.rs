//! Cap/floor term volatility surfaces.
//!
//! The surface quotes one implied volatility per (cumulative instrument
//! tenor, strike) pair. It is the *source* data of an optionlet
//! bootstrap: quotes describe whole cap/floor instruments, not the
//! individual optionlets inside them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use num_traits::Float;

use super::error::MarketDataError;
use super::observable::Versioned;
use crate::types::time::{Date, DayCountConvention, Tenor};

/// Term volatility surface for cap/floor instruments.
///
/// Rows are cumulative instrument tenors (ordered, the last one is the
/// longest quoted tenor), columns are strikes. Lookups pass through the
/// quoted points exactly: whatever interpolation an implementation uses
/// between quoted tenors, a query at a quoted (tenor, strike) pair must
/// return the quote unchanged.
pub trait CapFloorTermVolSurface<T: Float>: Versioned {
    /// Reference date the quoted tenors are measured from.
    fn reference_date(&self) -> Date;

    /// Day count convention for converting dates to year fractions.
    fn day_count(&self) -> DayCountConvention;

    /// Quoted strike axis, ordered and immutable.
    fn strikes(&self) -> &[T];

    /// Quoted cumulative-instrument tenors, strictly increasing.
    fn option_tenors(&self) -> &[Tenor];

    /// Implied volatility of the cap/floor with the given cumulative
    /// tenor and strike.
    ///
    /// With `extrapolate` set, tenors outside the quoted range read the
    /// nearest quoted row flat; otherwise they fail with
    /// [`MarketDataError::TenorOutOfRange`].
    fn volatility(&self, length: Tenor, strike: T, extrapolate: bool)
        -> Result<T, MarketDataError>;
}

/// Quoted cap/floor term volatility grid.
///
/// A concrete [`CapFloorTermVolSurface`] backed by a dense quote matrix.
/// Strike lookups are exact (the stripper only ever queries the quoted
/// strike axis); tenor lookups interpolate linearly in months between
/// quoted rows. Quotes are mutable through a shared reference and every
/// mutation bumps the surface version.
///
/// # Examples
///
/// ```
/// use stripper_core::market_data::{CapFloorTermVolGrid, CapFloorTermVolSurface};
/// use stripper_core::types::time::{Date, DayCountConvention, Tenor};
///
/// let grid = CapFloorTermVolGrid::new(
///     Date::from_ymd(2024, 6, 14).unwrap(),
///     DayCountConvention::Actual365Fixed,
///     vec![Tenor::years(1), Tenor::years(2)],
///     vec![0.02, 0.04],
///     vec![vec![0.20, 0.18], vec![0.22, 0.19]],
/// ).unwrap();
///
/// let vol = grid.volatility(Tenor::years(2), 0.04, false).unwrap();
/// assert_eq!(vol, 0.19);
/// ```
#[derive(Debug)]
pub struct CapFloorTermVolGrid<T: Float> {
    reference_date: Date,
    day_count: DayCountConvention,
    tenors: Vec<Tenor>,
    strikes: Vec<T>,
    // Row-major: quotes[row * n_strikes + col]
    quotes: RwLock<Vec<T>>,
    version: AtomicU64,
}

impl<T: Float> CapFloorTermVolGrid<T> {
    /// Creates a grid from per-tenor quote rows.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if the tenor or strike axis is empty
    /// - `UnsortedTenors` if tenors are not strictly increasing
    /// - `ShapeMismatch` if the quote matrix does not match the axes
    pub fn new(
        reference_date: Date,
        day_count: DayCountConvention,
        tenors: Vec<Tenor>,
        strikes: Vec<T>,
        quotes: Vec<Vec<T>>,
    ) -> Result<Self, MarketDataError> {
        if tenors.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        if strikes.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        if let Some(index) = (1..tenors.len()).find(|&i| tenors[i] <= tenors[i - 1]) {
            return Err(MarketDataError::UnsortedTenors { index });
        }
        if quotes.len() != tenors.len() || quotes.iter().any(|row| row.len() != strikes.len()) {
            return Err(MarketDataError::ShapeMismatch {
                got_rows: quotes.len(),
                got_cols: quotes.first().map_or(0, Vec::len),
                rows: tenors.len(),
                cols: strikes.len(),
            });
        }

        let flat = quotes.into_iter().flatten().collect();
        Ok(Self {
            reference_date,
            day_count,
            tenors,
            strikes,
            quotes: RwLock::new(flat),
            version: AtomicU64::new(0),
        })
    }

    /// Creates a grid quoting the same volatility everywhere.
    pub fn flat(
        reference_date: Date,
        day_count: DayCountConvention,
        tenors: Vec<Tenor>,
        strikes: Vec<T>,
        volatility: T,
    ) -> Result<Self, MarketDataError> {
        let rows = vec![vec![volatility; strikes.len()]; tenors.len()];
        Self::new(reference_date, day_count, tenors, strikes, rows)
    }

    /// Replaces the quote at an exact (tenor, strike) pair and bumps the
    /// surface version.
    pub fn set_volatility(
        &self,
        tenor: Tenor,
        strike: T,
        volatility: T,
    ) -> Result<(), MarketDataError> {
        let row = self.tenor_index(tenor)?;
        let col = self.strike_index(strike)?;
        {
            let mut quotes = self.write_quotes();
            quotes[row * self.strikes.len() + col] = volatility;
        }
        self.version.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn tenor_index(&self, tenor: Tenor) -> Result<usize, MarketDataError> {
        self.tenors
            .iter()
            .position(|&t| t == tenor)
            .ok_or(MarketDataError::TenorOutOfRange {
                tenor,
                min: self.tenors[0],
                max: *self.tenors.last().expect("non-empty by construction"),
            })
    }

    fn strike_index(&self, strike: T) -> Result<usize, MarketDataError> {
        self.strikes
            .iter()
            .position(|&s| s == strike)
            .ok_or(MarketDataError::UnknownStrike {
                strike: strike.to_f64().unwrap_or(f64::NAN),
            })
    }

    fn read_quotes(&self) -> Vec<T> {
        match self.quotes.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write_quotes(&self) -> std::sync::RwLockWriteGuard<'_, Vec<T>> {
        match self.quotes.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Float> Versioned for CapFloorTermVolGrid<T> {
    fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl<T: Float> CapFloorTermVolSurface<T> for CapFloorTermVolGrid<T> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn strikes(&self) -> &[T] {
        &self.strikes
    }

    fn option_tenors(&self) -> &[Tenor] {
        &self.tenors
    }

    fn volatility(
        &self,
        length: Tenor,
        strike: T,
        extrapolate: bool,
    ) -> Result<T, MarketDataError> {
        let col = self.strike_index(strike)?;
        let quotes = self.read_quotes();
        let n_strikes = self.strikes.len();
        let at = |row: usize| quotes[row * n_strikes + col];

        let min = self.tenors[0];
        let max = *self.tenors.last().expect("non-empty by construction");

        if length < min || length > max {
            if extrapolate {
                return Ok(if length < min { at(0) } else { at(self.tenors.len() - 1) });
            }
            return Err(MarketDataError::TenorOutOfRange {
                tenor: length,
                min,
                max,
            });
        }

        // Inside the quoted range: exact row if quoted, otherwise
        // linear in months between the bracketing rows.
        match self.tenors.iter().position(|&t| t >= length) {
            Some(i) if self.tenors[i] == length => Ok(at(i)),
            Some(i) => {
                let lo = self.tenors[i - 1].as_months() as f64;
                let hi = self.tenors[i].as_months() as f64;
                let w = T::from((length.as_months() as f64 - lo) / (hi - lo))
                    .unwrap_or_else(T::zero);
                Ok(at(i - 1) + w * (at(i) - at(i - 1)))
            }
            None => unreachable!("length <= max guarantees a bracketing tenor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_grid() -> CapFloorTermVolGrid<f64> {
        CapFloorTermVolGrid::new(
            Date::from_ymd(2024, 6, 14).unwrap(),
            DayCountConvention::Actual365Fixed,
            vec![Tenor::months(6), Tenor::years(1), Tenor::years(2)],
            vec![0.02, 0.04, 0.06],
            vec![
                vec![0.25, 0.22, 0.21],
                vec![0.23, 0.20, 0.19],
                vec![0.21, 0.18, 0.17],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_exact_tenor_lookup() {
        let grid = sample_grid();
        assert_eq!(grid.volatility(Tenor::years(1), 0.04, false).unwrap(), 0.20);
        assert_eq!(grid.volatility(Tenor::months(6), 0.02, false).unwrap(), 0.25);
    }

    #[test]
    fn test_interpolated_tenor_lookup() {
        let grid = sample_grid();
        // 9M sits halfway between 6M and 1Y in months
        let vol = grid.volatility(Tenor::months(9), 0.04, false).unwrap();
        assert_relative_eq!(vol, 0.21);
    }

    #[test]
    fn test_unknown_strike() {
        let grid = sample_grid();
        let err = grid.volatility(Tenor::years(1), 0.03, false).unwrap_err();
        assert!(matches!(err, MarketDataError::UnknownStrike { .. }));
    }

    #[test]
    fn test_out_of_range_without_extrapolation() {
        let grid = sample_grid();
        let err = grid.volatility(Tenor::years(5), 0.04, false).unwrap_err();
        assert!(matches!(err, MarketDataError::TenorOutOfRange { .. }));
    }

    #[test]
    fn test_flat_extrapolation() {
        let grid = sample_grid();
        assert_eq!(grid.volatility(Tenor::years(5), 0.04, true).unwrap(), 0.18);
        assert_eq!(grid.volatility(Tenor::months(3), 0.04, true).unwrap(), 0.22);
    }

    #[test]
    fn test_set_volatility_bumps_version() {
        let grid = sample_grid();
        let v0 = grid.version();
        grid.set_volatility(Tenor::years(1), 0.04, 0.50).unwrap();
        assert_eq!(grid.version(), v0 + 1);
        assert_eq!(grid.volatility(Tenor::years(1), 0.04, false).unwrap(), 0.50);
    }

    #[test]
    fn test_set_volatility_unknown_tenor() {
        let grid = sample_grid();
        let err = grid.set_volatility(Tenor::months(9), 0.04, 0.5).unwrap_err();
        assert!(matches!(err, MarketDataError::TenorOutOfRange { .. }));
        // Failed writes must not invalidate
        assert_eq!(grid.version(), 0);
    }

    #[test]
    fn test_constructor_rejects_unsorted_tenors() {
        let err = CapFloorTermVolGrid::new(
            Date::from_ymd(2024, 6, 14).unwrap(),
            DayCountConvention::Actual365Fixed,
            vec![Tenor::years(1), Tenor::months(6)],
            vec![0.02],
            vec![vec![0.2], vec![0.2]],
        )
        .unwrap_err();
        assert_eq!(err, MarketDataError::UnsortedTenors { index: 1 });
    }

    #[test]
    fn test_constructor_rejects_shape_mismatch() {
        let err = CapFloorTermVolGrid::new(
            Date::from_ymd(2024, 6, 14).unwrap(),
            DayCountConvention::Actual365Fixed,
            vec![Tenor::years(1)],
            vec![0.02, 0.04],
            vec![vec![0.2]],
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_flat_constructor() {
        let grid = CapFloorTermVolGrid::flat(
            Date::from_ymd(2024, 6, 14).unwrap(),
            DayCountConvention::Actual365Fixed,
            vec![Tenor::months(6), Tenor::years(1)],
            vec![0.02, 0.04],
            0.20,
        )
        .unwrap();
        assert_eq!(grid.volatility(Tenor::months(6), 0.04, false).unwrap(), 0.20);
        assert_eq!(grid.volatility(Tenor::months(9), 0.02, false).unwrap(), 0.20);
    }
}
