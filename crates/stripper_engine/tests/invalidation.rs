//! Laziness, idempotence, and invalidation of the recompute cache,
//! observed through an instrumented surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stripper_core::market_data::{
    CapFloorTermVolGrid, CapFloorTermVolSurface, FlatDiscountCurve, FlatForwardIndex,
    MarketDataError, Versioned,
};
use stripper_core::types::time::{Date, DayCountConvention, Tenor};
use stripper_engine::OptionletStripper;
use stripper_models::instruments::BlackCapFloorEngine;

const DC: DayCountConvention = DayCountConvention::Actual365Fixed;

fn reference() -> Date {
    Date::from_ymd(2024, 6, 14).unwrap()
}

// Surface wrapper counting volatility queries; versioning and quotes
// delegate to the wrapped grid.
struct CountingSurface {
    grid: Arc<CapFloorTermVolGrid<f64>>,
    queries: AtomicUsize,
}

impl CountingSurface {
    fn new(grid: Arc<CapFloorTermVolGrid<f64>>) -> Self {
        Self {
            grid,
            queries: AtomicUsize::new(0),
        }
    }

    fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Versioned for CountingSurface {
    fn version(&self) -> u64 {
        self.grid.version()
    }
}

impl CapFloorTermVolSurface<f64> for CountingSurface {
    fn reference_date(&self) -> Date {
        self.grid.reference_date()
    }

    fn day_count(&self) -> DayCountConvention {
        self.grid.day_count()
    }

    fn strikes(&self) -> &[f64] {
        self.grid.strikes()
    }

    fn option_tenors(&self) -> &[Tenor] {
        self.grid.option_tenors()
    }

    fn volatility(
        &self,
        length: Tenor,
        strike: f64,
        extrapolate: bool,
    ) -> Result<f64, MarketDataError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.grid.volatility(length, strike, extrapolate)
    }
}

struct Fixture {
    grid: Arc<CapFloorTermVolGrid<f64>>,
    surface: Arc<CountingSurface>,
    index: Arc<FlatForwardIndex<f64>>,
    stripper: OptionletStripper<
        f64,
        CountingSurface,
        FlatForwardIndex<f64>,
        BlackCapFloorEngine<f64, FlatForwardIndex<f64>, FlatDiscountCurve<f64>>,
    >,
}

fn fixture() -> Fixture {
    let grid = Arc::new(
        CapFloorTermVolGrid::flat(
            reference(),
            DC,
            vec![Tenor::months(6), Tenor::years(1), Tenor::years(2)],
            vec![0.02, 0.04, 0.06],
            0.20,
        )
        .unwrap(),
    );
    let surface = Arc::new(CountingSurface::new(Arc::clone(&grid)));
    let index = Arc::new(FlatForwardIndex::new(Tenor::months(3), 0.04));
    let curve = Arc::new(FlatDiscountCurve::new(reference(), 0.03, DC));
    let pricer = Arc::new(BlackCapFloorEngine::new(
        Arc::clone(&index),
        curve,
        reference(),
        DC,
    ));
    let stripper = OptionletStripper::new(
        Arc::clone(&surface),
        Arc::clone(&index),
        pricer,
        &[],
    )
    .unwrap();
    Fixture {
        grid,
        surface,
        index,
        stripper,
    }
}

// One query per (tenor, strike) cell: 7 rows x 3 strikes.
const QUERIES_PER_PASS: usize = 21;

#[test]
fn construction_does_no_numerical_work() {
    let f = fixture();
    assert_eq!(f.surface.query_count(), 0);
}

#[test]
fn repeated_reads_query_the_surface_once() {
    let f = fixture();
    let first = f.stripper.results().unwrap();
    assert_eq!(f.surface.query_count(), QUERIES_PER_PASS);

    let second = f.stripper.results().unwrap();
    assert_eq!(f.surface.query_count(), QUERIES_PER_PASS);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn surface_mutation_invalidates() {
    let f = fixture();
    let before = f.stripper.results().unwrap();

    // Mild bump: a steep downward vol slope would be a genuine
    // arbitrage in the quotes and fail the pass instead.
    f.grid.set_volatility(Tenor::years(1), 0.04, 0.21).unwrap();
    let after = f.stripper.results().unwrap();

    assert_eq!(f.surface.query_count(), 2 * QUERIES_PER_PASS);
    assert!(!Arc::ptr_eq(&before, &after));
    // The bumped quote flows into the recomputed grids
    assert!(
        after.optionlet_volatilities()[(2, 1)] > before.optionlet_volatilities()[(2, 1)]
    );
}

#[test]
fn index_mutation_invalidates() {
    let f = fixture();
    let before = f.stripper.results().unwrap();

    f.index.set_rate(0.05);
    let after = f.stripper.results().unwrap();

    assert_eq!(f.surface.query_count(), 2 * QUERIES_PER_PASS);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.atm_forward_rates(), &[0.05; 7]);
}

#[test]
fn evaluation_date_mutation_invalidates() {
    let f = fixture();
    let before = f.stripper.results().unwrap();

    // Setting the evaluation date always bumps its version, even when
    // the date itself is unchanged.
    f.stripper.evaluation_date().set(reference());
    let after = f.stripper.results().unwrap();

    assert_eq!(f.surface.query_count(), 2 * QUERIES_PER_PASS);
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn mutation_without_read_does_not_recompute() {
    let f = fixture();
    f.stripper.results().unwrap();
    assert_eq!(f.surface.query_count(), QUERIES_PER_PASS);

    // Three invalidations, zero reads: still only the original pass
    f.grid.set_volatility(Tenor::years(1), 0.04, 0.21).unwrap();
    f.index.set_rate(0.045);
    f.stripper.evaluation_date().set(reference());
    assert_eq!(f.surface.query_count(), QUERIES_PER_PASS);

    // A single read then recomputes exactly once
    f.stripper.results().unwrap();
    assert_eq!(f.surface.query_count(), 2 * QUERIES_PER_PASS);
}
