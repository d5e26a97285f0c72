//! The optionlet stripper and its lazy recompute cache.

use std::sync::{Arc, RwLock};

use num_traits::Float;

use stripper_core::market_data::{
    CapFloorTermVolSurface, EvaluationDate, ForwardRateIndex, Versioned,
};
use stripper_core::math::solvers::SolverConfig;
use stripper_core::types::time::{Date, Tenor};
use stripper_models::instruments::CapFloorPricingAdapter;

use crate::bootstrap::{run_pass, AccrualPeriods, PassInputs, StrippedGrids};
use crate::error::{ConfigurationError, StripError};
use crate::ladder::{normalize_switch_strikes, TenorLadder};

/// Switch strike separating floor-stripped from cap-stripped columns
/// when the caller supplies none.
pub const DEFAULT_SWITCH_STRIKE: f64 = 0.04;

/// Volatility seeding the very first inversion of each column.
pub const DEFAULT_FIRST_GUESS: f64 = 0.14;

// Collaborator versions a cached result was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InputVersions {
    surface: u64,
    index: u64,
    evaluation_date: u64,
}

#[derive(Debug)]
struct CacheEntry<T: Float> {
    versions: InputVersions,
    grids: Arc<StrippedGrids<T>>,
}

/// Bootstraps cap/floor term volatilities into per-optionlet implied
/// volatilities, recomputing lazily when an input changes.
///
/// Construction wires the collaborators together and validates the
/// configuration (ladder, strike axis, switch strikes); no numerical
/// work happens until the first derived read. Results are cached
/// against the version counters of the surface, the index, and the
/// evaluation date: reads while every version matches return the same
/// shared [`StrippedGrids`] without recomputation, and any collaborator
/// mutation makes the next read recompute from scratch.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stripper_core::market_data::{CapFloorTermVolGrid, FlatDiscountCurve, FlatForwardIndex};
/// use stripper_core::types::time::{Date, DayCountConvention, Tenor};
/// use stripper_engine::OptionletStripper;
/// use stripper_models::instruments::BlackCapFloorEngine;
///
/// let reference = Date::from_ymd(2024, 6, 14).unwrap();
/// let day_count = DayCountConvention::Actual365Fixed;
///
/// let surface = Arc::new(CapFloorTermVolGrid::flat(
///     reference,
///     day_count,
///     vec![Tenor::months(6), Tenor::years(1), Tenor::years(2)],
///     vec![0.02, 0.04, 0.06],
///     0.20,
/// ).unwrap());
/// let index = Arc::new(FlatForwardIndex::new(Tenor::months(3), 0.04_f64));
/// let curve = Arc::new(FlatDiscountCurve::new(reference, 0.03, day_count));
/// let pricer = Arc::new(BlackCapFloorEngine::new(
///     Arc::clone(&index), curve, reference, day_count,
/// ));
///
/// let stripper = OptionletStripper::new(surface, index, pricer, &[]).unwrap();
/// let grids = stripper.results().unwrap();
///
/// // A flat term surface strips to flat optionlet volatilities.
/// assert!((grids.optionlet_volatilities()[(0, 1)] - 0.20).abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct OptionletStripper<T, S, I, P>
where
    T: Float,
    S: CapFloorTermVolSurface<T>,
    I: ForwardRateIndex<T>,
    P: CapFloorPricingAdapter<T>,
{
    surface: Arc<S>,
    index: Arc<I>,
    pricer: Arc<P>,
    evaluation_date: Arc<EvaluationDate>,
    ladder: TenorLadder,
    strikes: Vec<T>,
    switch_strikes: Vec<T>,
    accruals: AccrualPeriods<T>,
    solver: SolverConfig<T>,
    first_guess: T,
    cache: RwLock<Option<CacheEntry<T>>>,
}

impl<T, S, I, P> OptionletStripper<T, S, I, P>
where
    T: Float + Send + Sync,
    S: CapFloorTermVolSurface<T> + Sync,
    I: ForwardRateIndex<T>,
    P: CapFloorPricingAdapter<T> + Sync,
{
    /// Creates a stripper over a surface, an index, and a pricing
    /// adapter.
    ///
    /// `switch_strikes` may be empty (broadcasts
    /// [`DEFAULT_SWITCH_STRIKE`]), a singleton, or one entry per
    /// optionlet tenor. The evaluation date starts at the surface's
    /// reference date; use [`Self::with_evaluation_date`] to share an
    /// externally owned handle instead.
    ///
    /// # Errors
    ///
    /// Fails fast on structural problems: a surface too short to hold
    /// the first cap/floor, empty strike or tenor axes, or a
    /// switch-strike vector of the wrong length.
    pub fn new(
        surface: Arc<S>,
        index: Arc<I>,
        pricer: Arc<P>,
        switch_strikes: &[T],
    ) -> Result<Self, ConfigurationError> {
        let evaluation_date = Arc::new(EvaluationDate::new(surface.reference_date()));
        Self::with_evaluation_date(surface, index, pricer, switch_strikes, evaluation_date)
    }

    /// Like [`Self::new`], but watching an externally shared evaluation
    /// date.
    pub fn with_evaluation_date(
        surface: Arc<S>,
        index: Arc<I>,
        pricer: Arc<P>,
        switch_strikes: &[T],
        evaluation_date: Arc<EvaluationDate>,
    ) -> Result<Self, ConfigurationError> {
        let strikes = surface.strikes().to_vec();
        if strikes.is_empty() {
            return Err(ConfigurationError::EmptyStrikeAxis);
        }
        let max_tenor = *surface
            .option_tenors()
            .last()
            .ok_or(ConfigurationError::EmptyTenorAxis)?;

        let ladder = TenorLadder::build(index.tenor(), max_tenor)?;
        let default_switch = T::from(DEFAULT_SWITCH_STRIKE).unwrap_or_else(T::zero);
        let switch_strikes =
            normalize_switch_strikes(switch_strikes, ladder.len(), default_switch)?;

        Ok(Self {
            surface,
            index,
            pricer,
            evaluation_date,
            ladder,
            strikes,
            switch_strikes,
            accruals: AccrualPeriods::default(),
            solver: SolverConfig::default(),
            first_guess: T::from(DEFAULT_FIRST_GUESS).unwrap_or_else(T::zero),
            cache: RwLock::new(None),
        })
    }

    /// Replaces the accrual-period source.
    pub fn with_accrual_periods(mut self, accruals: AccrualPeriods<T>) -> Self {
        self.accruals = accruals;
        self
    }

    /// Replaces the inversion solver configuration.
    pub fn with_solver_config(mut self, solver: SolverConfig<T>) -> Self {
        self.solver = solver;
        self
    }

    /// Replaces the volatility seeding each column's first inversion.
    pub fn with_first_guess(mut self, first_guess: T) -> Self {
        self.first_guess = first_guess;
        self
    }

    /// The source surface.
    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// The underlying index.
    pub fn index(&self) -> &Arc<I> {
        &self.index
    }

    /// The pricing adapter.
    pub fn pricer(&self) -> &Arc<P> {
        &self.pricer
    }

    /// The watched evaluation-date handle.
    pub fn evaluation_date(&self) -> &Arc<EvaluationDate> {
        &self.evaluation_date
    }

    /// Strike axis captured from the surface at construction.
    pub fn strikes(&self) -> &[T] {
        &self.strikes
    }

    /// Normalized switch strikes, one per optionlet tenor.
    pub fn switch_strikes(&self) -> &[T] {
        &self.switch_strikes
    }

    /// Optionlet fixing tenors, one per grid row.
    pub fn optionlet_tenors(&self) -> &[Tenor] {
        self.ladder.optionlet_tenors()
    }

    /// Cumulative cap/floor lengths, one per grid row.
    pub fn capfloor_lengths(&self) -> &[Tenor] {
        self.ladder.capfloor_lengths()
    }

    fn input_versions(&self) -> InputVersions {
        InputVersions {
            surface: self.surface.version(),
            index: self.index.version(),
            evaluation_date: self.evaluation_date.version(),
        }
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Option<CacheEntry<T>>> {
        match self.cache.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Option<CacheEntry<T>>> {
        match self.cache.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the stripped grids, recomputing first if any watched
    /// input changed since the cached pass.
    ///
    /// Reads against an unchanged set of inputs share one
    /// `Arc<StrippedGrids>`, bit-identical across calls. Versions are
    /// captured before the pass starts, so a mutation that lands while
    /// the pass is running leaves the fresh entry already stale and the
    /// next read recomputes again. A failed pass leaves the cache empty.
    ///
    /// # Errors
    ///
    /// [`StripError`] from the first failing cell of the pass; no
    /// partial grid is retained.
    pub fn results(&self) -> Result<Arc<StrippedGrids<T>>, StripError> {
        let current = self.input_versions();
        if let Some(entry) = self.read_cache().as_ref() {
            if entry.versions == current {
                tracing::trace!("stripped grids cache hit");
                return Ok(Arc::clone(&entry.grids));
            }
        }

        let mut cache = self.write_cache();
        // Another thread may have recomputed while we waited.
        let current = self.input_versions();
        if let Some(entry) = cache.as_ref() {
            if entry.versions == current {
                return Ok(Arc::clone(&entry.grids));
            }
        }

        tracing::debug!(
            surface_version = current.surface,
            index_version = current.index,
            evaluation_date_version = current.evaluation_date,
            "recomputing stripped grids"
        );
        let inputs = PassInputs {
            surface: self.surface.as_ref(),
            pricer: self.pricer.as_ref(),
            ladder: &self.ladder,
            strikes: &self.strikes,
            switch_strikes: &self.switch_strikes,
            accruals: self.accruals,
            solver: self.solver,
            first_guess: self.first_guess,
        };
        match run_pass(&inputs) {
            Ok(grids) => {
                let grids = Arc::new(grids);
                *cache = Some(CacheEntry {
                    versions: current,
                    grids: Arc::clone(&grids),
                });
                Ok(grids)
            }
            Err(err) => {
                *cache = None;
                Err(err)
            }
        }
    }

    /// Optionlet fixing dates, recomputing if stale.
    pub fn fixing_dates(&self) -> Result<Vec<Date>, StripError> {
        Ok(self.results()?.fixing_dates().to_vec())
    }

    /// ATM forward rates per fixing, recomputing if stale.
    pub fn atm_forward_rates(&self) -> Result<Vec<T>, StripError> {
        Ok(self.results()?.atm_forward_rates().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stripper_core::market_data::{
        CapFloorTermVolGrid, FlatDiscountCurve, FlatForwardIndex,
    };
    use stripper_core::types::time::DayCountConvention;
    use stripper_models::instruments::BlackCapFloorEngine;

    const DC: DayCountConvention = DayCountConvention::Actual365Fixed;

    type FlatStripper = OptionletStripper<
        f64,
        CapFloorTermVolGrid<f64>,
        FlatForwardIndex<f64>,
        BlackCapFloorEngine<f64, FlatForwardIndex<f64>, FlatDiscountCurve<f64>>,
    >;

    fn reference() -> Date {
        Date::from_ymd(2024, 6, 14).unwrap()
    }

    fn flat_stripper(switch_strikes: &[f64]) -> FlatStripper {
        let surface = Arc::new(
            CapFloorTermVolGrid::flat(
                reference(),
                DC,
                vec![Tenor::months(6), Tenor::years(1), Tenor::years(2)],
                vec![0.02, 0.04, 0.06],
                0.20,
            )
            .unwrap(),
        );
        let index = Arc::new(FlatForwardIndex::new(Tenor::months(3), 0.04));
        let curve = Arc::new(FlatDiscountCurve::new(reference(), 0.03, DC));
        let pricer = Arc::new(BlackCapFloorEngine::new(
            Arc::clone(&index),
            curve,
            reference(),
            DC,
        ));
        OptionletStripper::new(surface, index, pricer, switch_strikes).unwrap()
    }

    #[test]
    fn test_ladder_axes_exposed() {
        let stripper = flat_stripper(&[]);
        assert_eq!(stripper.optionlet_tenors().len(), 7);
        assert_eq!(stripper.capfloor_lengths()[0], Tenor::months(6));
        assert_eq!(stripper.strikes(), &[0.02, 0.04, 0.06]);
    }

    #[test]
    fn test_default_switch_strike_broadcast() {
        let stripper = flat_stripper(&[]);
        assert_eq!(stripper.switch_strikes(), &[DEFAULT_SWITCH_STRIKE; 7]);
    }

    #[test]
    fn test_switch_strike_count_rejected() {
        let surface = Arc::new(
            CapFloorTermVolGrid::flat(
                reference(),
                DC,
                vec![Tenor::years(1)],
                vec![0.04],
                0.20,
            )
            .unwrap(),
        );
        let index = Arc::new(FlatForwardIndex::new(Tenor::months(3), 0.04));
        let curve = Arc::new(FlatDiscountCurve::new(reference(), 0.03, DC));
        let pricer = Arc::new(BlackCapFloorEngine::new(
            Arc::clone(&index),
            curve,
            reference(),
            DC,
        ));
        // 1Y on a 3M index gives 3 rows; 2 switch strikes cannot map
        let err = OptionletStripper::new(surface, index, pricer, &[0.03, 0.05]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::SwitchStrikeCount { got: 2, expected: 3 }
        );
    }

    #[test]
    fn test_surface_too_short_at_construction() {
        let surface = Arc::new(
            CapFloorTermVolGrid::flat(reference(), DC, vec![Tenor::months(3)], vec![0.04], 0.20)
                .unwrap(),
        );
        let index = Arc::new(FlatForwardIndex::new(Tenor::months(3), 0.04));
        let curve = Arc::new(FlatDiscountCurve::new(reference(), 0.03, DC));
        let pricer = Arc::new(BlackCapFloorEngine::new(
            Arc::clone(&index),
            curve,
            reference(),
            DC,
        ));
        let err = OptionletStripper::new(surface, index, pricer, &[]).unwrap_err();
        assert!(matches!(err, ConfigurationError::SurfaceTooShort { .. }));
    }

    #[test]
    fn test_repeated_reads_share_one_result() {
        let stripper = flat_stripper(&[]);
        let first = stripper.results().unwrap();
        let second = stripper.results().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_builder_setters() {
        let stripper = flat_stripper(&[])
            .with_first_guess(0.25)
            .with_solver_config(SolverConfig::high_precision())
            .with_accrual_periods(AccrualPeriods::Fixed(0.25));
        // Still strips successfully with overridden knobs
        let grids = stripper.results().unwrap();
        assert_eq!(grids.accrual_periods(), &[0.25; 7]);
    }
}
