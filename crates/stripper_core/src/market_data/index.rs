//! Forward-rate index contract.
//!
//! The index collaborator supplies two things to the stripping
//! machinery: its compounding period (which sets the optionlet spacing)
//! and forecast fixings for future dates (which provide the at-the-money
//! forward rate per optionlet).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use num_traits::Float;

use super::error::MarketDataError;
use super::observable::Versioned;
use crate::types::time::{Date, Tenor};

/// A floating-rate index such as a 3M term rate.
///
/// Fixing-date placement is plain month arithmetic from the surface
/// reference date; holiday calendars are out of scope for this layer.
pub trait ForwardRateIndex<T: Float>: Versioned {
    /// The index compounding period (e.g. 3M).
    fn tenor(&self) -> Tenor;

    /// Forecast fixing of the index for a future fixing date.
    fn forecast_fixing(&self, fixing: Date) -> Result<T, MarketDataError>;
}

/// Index forecasting a constant simply-compounded forward rate.
///
/// The rate is mutable through a shared reference; every mutation bumps
/// the index version so dependent caches invalidate.
///
/// # Examples
///
/// ```
/// use stripper_core::market_data::{FlatForwardIndex, ForwardRateIndex, Versioned};
/// use stripper_core::types::time::{Date, Tenor};
///
/// let index = FlatForwardIndex::new(Tenor::months(3), 0.035_f64);
/// let fixing = Date::from_ymd(2025, 3, 14).unwrap();
/// assert_eq!(index.forecast_fixing(fixing).unwrap(), 0.035);
///
/// index.set_rate(0.04);
/// assert_eq!(index.version(), 1);
/// ```
#[derive(Debug)]
pub struct FlatForwardIndex<T: Float> {
    tenor: Tenor,
    rate: RwLock<T>,
    version: AtomicU64,
}

impl<T: Float> FlatForwardIndex<T> {
    /// Creates an index with the given compounding period and flat rate.
    pub fn new(tenor: Tenor, rate: T) -> Self {
        Self {
            tenor,
            rate: RwLock::new(rate),
            version: AtomicU64::new(0),
        }
    }

    /// Returns the flat forward rate.
    pub fn rate(&self) -> T {
        match self.rate.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replaces the flat forward rate and bumps the version.
    pub fn set_rate(&self, rate: T) {
        match self.rate.write() {
            Ok(mut guard) => *guard = rate,
            Err(poisoned) => *poisoned.into_inner() = rate,
        }
        self.version.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: Float> Versioned for FlatForwardIndex<T> {
    fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl<T: Float> ForwardRateIndex<T> for FlatForwardIndex<T> {
    fn tenor(&self) -> Tenor {
        self.tenor
    }

    fn forecast_fixing(&self, _fixing: Date) -> Result<T, MarketDataError> {
        Ok(self.rate())
    }
}
