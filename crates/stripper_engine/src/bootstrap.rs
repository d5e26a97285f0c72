//! The sequential bootstrap pass.
//!
//! One pass turns a quoted cap/floor term volatility surface into
//! per-optionlet volatilities: per-tenor quantities are precomputed once
//! per row, then each strike column is bootstrapped independently as an
//! ordered fold over the tenor rows, differencing cumulative prices and
//! inverting each difference for the optionlet standard deviation.
//! Columns never exchange state, so with the `parallel` feature they run
//! under rayon.

use std::time::Instant;

use ndarray::Array2;
use num_traits::Float;

use stripper_core::market_data::CapFloorTermVolSurface;
use stripper_core::math::solvers::SolverConfig;
use stripper_core::types::time::Date;
use stripper_models::analytical::implied_std_dev;
use stripper_models::instruments::{
    CapFloorKind, CapFloorPricingAdapter, EngineError, PricedCapFloor,
};

use crate::error::{BootstrapFailure, StripError};
use crate::ladder::TenorLadder;

/// Source of the per-optionlet accrual fraction.
///
/// The accrual enters the annuity that scales each optionlet price
/// before inversion. The default derives it from the actual period
/// dates under the surface's day count; `Fixed` pins it to a constant,
/// which reproduces systems that hard-code a half-year accrual for
/// semi-annual-style stripping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccrualPeriods<T: Float> {
    /// Year fraction of each optionlet period under the surface day count.
    FromDayCount,
    /// The same constant accrual for every row.
    Fixed(T),
}

impl<T: Float> Default for AccrualPeriods<T> {
    fn default() -> Self {
        AccrualPeriods::FromDayCount
    }
}

/// All state derived by one bootstrap pass.
///
/// Grids are row-major with one row per ladder tenor and one column per
/// quoted strike; per-tenor vectors hold the strike-independent
/// quantities. A `StrippedGrids` is immutable once built; consumers
/// share it behind an `Arc` handed out by the stripper's cache.
#[derive(Debug, Clone)]
pub struct StrippedGrids<T: Float> {
    fixing_dates: Vec<Date>,
    accrual_periods: Vec<T>,
    times_to_fixing: Vec<T>,
    atm_forward_rates: Vec<T>,
    capfloor_vols: Array2<T>,
    capfloor_prices: Array2<T>,
    optionlet_prices: Array2<T>,
    optionlet_std_devs: Array2<T>,
    optionlet_vols: Array2<T>,
    priced_capfloors: Array2<PricedCapFloor<T>>,
}

impl<T: Float> StrippedGrids<T> {
    /// Optionlet fixing dates, one per tenor row.
    pub fn fixing_dates(&self) -> &[Date] {
        &self.fixing_dates
    }

    /// Accrual fraction of each optionlet period.
    pub fn accrual_periods(&self) -> &[T] {
        &self.accrual_periods
    }

    /// Year fraction from the reference date to each fixing.
    pub fn times_to_fixing(&self) -> &[T] {
        &self.times_to_fixing
    }

    /// ATM forward rate at each fixing date.
    pub fn atm_forward_rates(&self) -> &[T] {
        &self.atm_forward_rates
    }

    /// Cumulative cap/floor volatilities read off the source surface.
    pub fn capfloor_volatilities(&self) -> &Array2<T> {
        &self.capfloor_vols
    }

    /// Cumulative cap/floor prices at the quoted volatilities.
    pub fn capfloor_prices(&self) -> &Array2<T> {
        &self.capfloor_prices
    }

    /// Differenced per-optionlet prices.
    pub fn optionlet_prices(&self) -> &Array2<T> {
        &self.optionlet_prices
    }

    /// Implied optionlet standard deviations (σ√t).
    pub fn optionlet_std_devs(&self) -> &Array2<T> {
        &self.optionlet_std_devs
    }

    /// Annualized optionlet volatilities, the bootstrap's main output.
    pub fn optionlet_volatilities(&self) -> &Array2<T> {
        &self.optionlet_vols
    }

    /// Priced cap/floor handles, one per (tenor, strike) cell.
    pub fn priced_capfloors(&self) -> &Array2<PricedCapFloor<T>> {
        &self.priced_capfloors
    }
}

/// Borrowed inputs of one bootstrap pass.
pub(crate) struct PassInputs<'a, T, S, P>
where
    T: Float,
    S: CapFloorTermVolSurface<T>,
    P: CapFloorPricingAdapter<T>,
{
    pub surface: &'a S,
    pub pricer: &'a P,
    pub ladder: &'a TenorLadder,
    pub strikes: &'a [T],
    pub switch_strikes: &'a [T],
    pub accruals: AccrualPeriods<T>,
    pub solver: SolverConfig<T>,
    pub first_guess: T,
}

// Strike-independent quantities of one tenor row.
#[derive(Debug, Clone, Copy)]
struct RowContext<T: Float> {
    fixing_date: Date,
    accrual: T,
    time_to_fixing: T,
    atm_forward: T,
    annuity: T,
}

// Per-column fold output, assembled into grids afterwards.
struct ColumnResult<T: Float> {
    capfloor_vols: Vec<T>,
    capfloor_prices: Vec<T>,
    optionlet_prices: Vec<T>,
    optionlet_std_devs: Vec<T>,
    optionlet_vols: Vec<T>,
    priced: Vec<PricedCapFloor<T>>,
}

impl<T: Float> ColumnResult<T> {
    fn with_capacity(rows: usize) -> Self {
        Self {
            capfloor_vols: Vec::with_capacity(rows),
            capfloor_prices: Vec::with_capacity(rows),
            optionlet_prices: Vec::with_capacity(rows),
            optionlet_std_devs: Vec::with_capacity(rows),
            optionlet_vols: Vec::with_capacity(rows),
            priced: Vec::with_capacity(rows),
        }
    }
}

fn precompute_rows<T, S, P>(
    inputs: &PassInputs<'_, T, S, P>,
) -> Result<Vec<RowContext<T>>, StripError>
where
    T: Float,
    S: CapFloorTermVolSurface<T>,
    P: CapFloorPricingAdapter<T>,
{
    let day_count = inputs.surface.day_count();
    let reference = inputs.surface.reference_date();
    let index_tenor = inputs.ladder.index_tenor();

    inputs
        .ladder
        .capfloor_lengths()
        .iter()
        .map(|&length| {
            let fixing_date = inputs.pricer.last_fixing_date(length)?;
            let accrual = match inputs.accruals {
                AccrualPeriods::Fixed(a) => a,
                AccrualPeriods::FromDayCount => {
                    let period_end = fixing_date
                        .add_tenor(index_tenor)
                        .map_err(EngineError::from)?;
                    T::from(day_count.year_fraction(fixing_date, period_end))
                        .unwrap_or_else(T::zero)
                }
            };
            let time_to_fixing = T::from(day_count.year_fraction(reference, fixing_date))
                .unwrap_or_else(T::zero);
            let atm_forward = inputs.pricer.forecast_fixing(fixing_date)?;
            let discount = inputs.pricer.discount(fixing_date)?;

            Ok(RowContext {
                fixing_date,
                accrual,
                time_to_fixing,
                atm_forward,
                annuity: accrual * discount,
            })
        })
        .collect()
}

// Ordered fold down one strike column: price the cumulative instrument
// at each row, difference against the previous row's price, and invert
// the difference for the optionlet standard deviation, warm-starting
// each solve from the previous row's solution.
fn bootstrap_column<T, S, P>(
    inputs: &PassInputs<'_, T, S, P>,
    rows: &[RowContext<T>],
    col: usize,
) -> Result<ColumnResult<T>, StripError>
where
    T: Float,
    S: CapFloorTermVolSurface<T>,
    P: CapFloorPricingAdapter<T>,
{
    let strike = inputs.strikes[col];
    let mut out = ColumnResult::with_capacity(rows.len());
    let mut prev_price = T::zero();
    let mut prev_std_dev = T::zero();

    for (i, row) in rows.iter().enumerate() {
        let length = inputs.ladder.capfloor_lengths()[i];
        // Strikes strictly below the switch strike strip from floors,
        // everything at or above from caps.
        let kind = if strike < inputs.switch_strikes[i] {
            CapFloorKind::Floor
        } else {
            CapFloorKind::Cap
        };

        let capfloor_vol = inputs.surface.volatility(length, strike, true)?;
        let priced = inputs.pricer.price(length, strike, capfloor_vol, kind)?;
        let capfloor_price = priced.npv();
        let optionlet_price = capfloor_price - prev_price;

        let guess = if i == 0 {
            inputs.first_guess * row.time_to_fixing.sqrt()
        } else {
            prev_std_dev
        };
        let std_dev = implied_std_dev(
            kind.option_type(),
            strike,
            row.atm_forward,
            optionlet_price,
            row.annuity,
            guess,
            inputs.solver,
        )
        .map_err(|source| {
            StripError::Inversion(BootstrapFailure {
                fixing_date: row.fixing_date,
                option_type: kind.option_type(),
                strike: strike.to_f64().unwrap_or(f64::NAN),
                atm_rate: row.atm_forward.to_f64().unwrap_or(f64::NAN),
                price: optionlet_price.to_f64().unwrap_or(f64::NAN),
                annuity: row.annuity.to_f64().unwrap_or(f64::NAN),
                source,
            })
        })?;
        let optionlet_vol = std_dev / row.time_to_fixing.sqrt();

        out.capfloor_vols.push(capfloor_vol);
        out.capfloor_prices.push(capfloor_price);
        out.optionlet_prices.push(optionlet_price);
        out.optionlet_std_devs.push(std_dev);
        out.optionlet_vols.push(optionlet_vol);
        out.priced.push(priced);

        prev_price = capfloor_price;
        prev_std_dev = std_dev;
    }

    Ok(out)
}

#[cfg(feature = "parallel")]
fn bootstrap_columns<T, S, P>(
    inputs: &PassInputs<'_, T, S, P>,
    rows: &[RowContext<T>],
) -> Result<Vec<ColumnResult<T>>, StripError>
where
    T: Float + Send + Sync,
    S: CapFloorTermVolSurface<T> + Sync,
    P: CapFloorPricingAdapter<T> + Sync,
{
    use rayon::prelude::*;

    (0..inputs.strikes.len())
        .into_par_iter()
        .map(|col| bootstrap_column(inputs, rows, col))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn bootstrap_columns<T, S, P>(
    inputs: &PassInputs<'_, T, S, P>,
    rows: &[RowContext<T>],
) -> Result<Vec<ColumnResult<T>>, StripError>
where
    T: Float + Send + Sync,
    S: CapFloorTermVolSurface<T> + Sync,
    P: CapFloorPricingAdapter<T> + Sync,
{
    (0..inputs.strikes.len())
        .map(|col| bootstrap_column(inputs, rows, col))
        .collect()
}

/// Runs one full bootstrap pass over every (tenor, strike) cell.
///
/// The first failure aborts the pass; no partial grid is ever produced.
pub(crate) fn run_pass<T, S, P>(
    inputs: &PassInputs<'_, T, S, P>,
) -> Result<StrippedGrids<T>, StripError>
where
    T: Float + Send + Sync,
    S: CapFloorTermVolSurface<T> + Sync,
    P: CapFloorPricingAdapter<T> + Sync,
{
    let started = Instant::now();
    let rows = precompute_rows(inputs)?;
    let cols = bootstrap_columns(inputs, &rows)?;

    let shape = (rows.len(), inputs.strikes.len());
    let grids = StrippedGrids {
        fixing_dates: rows.iter().map(|r| r.fixing_date).collect(),
        accrual_periods: rows.iter().map(|r| r.accrual).collect(),
        times_to_fixing: rows.iter().map(|r| r.time_to_fixing).collect(),
        atm_forward_rates: rows.iter().map(|r| r.atm_forward).collect(),
        capfloor_vols: Array2::from_shape_fn(shape, |(i, j)| cols[j].capfloor_vols[i]),
        capfloor_prices: Array2::from_shape_fn(shape, |(i, j)| cols[j].capfloor_prices[i]),
        optionlet_prices: Array2::from_shape_fn(shape, |(i, j)| cols[j].optionlet_prices[i]),
        optionlet_std_devs: Array2::from_shape_fn(shape, |(i, j)| cols[j].optionlet_std_devs[i]),
        optionlet_vols: Array2::from_shape_fn(shape, |(i, j)| cols[j].optionlet_vols[i]),
        priced_capfloors: Array2::from_shape_fn(shape, |(i, j)| cols[j].priced[i]),
    };

    tracing::debug!(
        rows = shape.0,
        cols = shape.1,
        elapsed_us = started.elapsed().as_micros() as u64,
        "bootstrap pass complete"
    );
    Ok(grids)
}
