//! Time types and day count conventions for financial calculations.
//!
//! This module provides:
//! - `Date`: type-safe date wrapper around `chrono::NaiveDate`
//! - `Tenor`: whole-month periods such as `3M` or `2Y`
//! - `DayCountConvention`: industry-standard day count conventions
//!
//! # Examples
//!
//! ```
//! use stripper_core::types::time::{Date, DayCountConvention, Tenor};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = start.add_months(6).unwrap();
//!
//! let yf = DayCountConvention::Actual360.year_fraction(start, end);
//! assert!((yf - 182.0 / 360.0).abs() < 1e-12);
//!
//! assert_eq!(Tenor::months(3) + Tenor::months(3), Tenor::months(6));
//! ```

use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around `chrono::NaiveDate`.
///
/// Provides ISO 8601 parsing/formatting, day differences, and checked
/// month arithmetic, which is the only date arithmetic the stripping
/// machinery needs (tenor grids are whole-month).
///
/// # Examples
///
/// ```
/// use stripper_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a `Date` from year, month, and day components.
    ///
    /// Returns `Err(DateError::InvalidDate)` for impossible calendar dates
    /// such as February 30th.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from an ISO 8601 string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying `NaiveDate`.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Advances the date by a whole number of calendar months.
    ///
    /// End-of-month days clamp the way `chrono` clamps them (Jan 31 + 1M
    /// = Feb 29 in a leap year).
    ///
    /// # Examples
    ///
    /// ```
    /// use stripper_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2024, 1, 31).unwrap();
    /// assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
    /// ```
    pub fn add_months(self, months: u32) -> Result<Self, DateError> {
        self.0
            .checked_add_months(Months::new(months))
            .map(Date)
            .ok_or_else(|| DateError::Overflow {
                reason: format!("adding {} months to {}", months, self),
            })
    }

    /// Advances the date by a tenor.
    pub fn add_tenor(self, tenor: Tenor) -> Result<Self, DateError> {
        self.add_months(tenor.as_months())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> i64 {
        (self.0 - other.0).num_days()
    }
}

/// Whole-month period, the quoting unit of cap/floor tenor grids.
///
/// Tenors are stored as a month count; `2Y` and `24M` compare equal.
/// Ordering follows the month count, so tenor ladders can be checked
/// for strict monotonicity directly.
///
/// # Examples
///
/// ```
/// use stripper_core::types::time::Tenor;
///
/// let quarter = Tenor::months(3);
/// let two_years = Tenor::years(2);
///
/// assert!(quarter < two_years);
/// assert_eq!(format!("{}", quarter), "3M");
/// assert_eq!(format!("{}", two_years), "2Y");
/// assert_eq!(two_years.as_months(), 24);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tenor {
    months: u32,
}

impl Tenor {
    /// Creates a tenor of `n` months.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`; a zero-length tenor is never meaningful for
    /// an accrual period or an instrument length.
    pub fn months(n: u32) -> Self {
        assert!(n > 0, "tenor must be at least one month");
        Self { months: n }
    }

    /// Creates a tenor of `n` years.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn years(n: u32) -> Self {
        Self::months(n * 12)
    }

    /// Returns the tenor as a whole number of months.
    pub fn as_months(&self) -> u32 {
        self.months
    }

    /// Returns `true` if this tenor is an exact multiple of `other`.
    pub fn is_multiple_of(&self, other: Tenor) -> bool {
        self.months % other.months == 0
    }

    /// Returns how many copies of `other` fit into this tenor,
    /// discarding any remainder.
    pub fn div(&self, other: Tenor) -> u32 {
        self.months / other.months
    }
}

impl Add for Tenor {
    type Output = Tenor;

    fn add(self, other: Tenor) -> Tenor {
        Tenor {
            months: self.months + other.months,
        }
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months % 12 == 0 {
            write!(f, "{}Y", self.months / 12)
        } else {
            write!(f, "{}M", self.months)
        }
    }
}

/// Industry-standard day count conventions.
///
/// Used to convert a pair of dates into a year fraction for accrual
/// and time-to-expiry calculations.
///
/// # Examples
///
/// ```
/// use stripper_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 4, 1).unwrap();
///
/// let yf = DayCountConvention::Actual360.year_fraction(start, end);
/// assert!((yf - 91.0 / 360.0).abs() < 1e-12);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual days divided by 360.
    Actual360,
    /// Actual days divided by 365, ignoring leap years.
    #[default]
    Actual365Fixed,
    /// 30/360 US convention with day-of-month clamping.
    Thirty360,
}

impl DayCountConvention {
    /// Returns the conventional name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Actual365Fixed => "ACT/365F",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Computes the year fraction between two dates.
    ///
    /// Negative if `end` precedes `start`.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Actual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Actual365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Thirty360 => {
                let d1 = start.day().min(30) as i64;
                let d2 = if d1 == 30 {
                    end.day().min(30) as i64
                } else {
                    end.day() as i64
                };
                let days = 360 * (end.year() - start.year()) as i64
                    + 30 * (end.month() as i64 - start.month() as i64)
                    + (d2 - d1);
                days as f64 / 360.0
            }
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
