//! # stripper_engine: Optionlet Volatility Bootstrap
//!
//! ## Layer 3 (Engine) Role
//!
//! stripper_engine turns quoted cap/floor term volatilities into
//! per-optionlet implied volatilities:
//! - `ladder`: tenor ladder construction and switch-strike normalization
//! - `bootstrap`: the sequential per-column bootstrap pass and its
//!   output grids
//! - `stripper`: [`OptionletStripper`], the lazily recomputing facade
//!   over surface, index, and pricing adapter
//! - `error`: configuration and bootstrap error types
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use stripper_core::market_data::{CapFloorTermVolGrid, FlatDiscountCurve, FlatForwardIndex};
//! use stripper_core::types::time::{Date, DayCountConvention, Tenor};
//! use stripper_engine::OptionletStripper;
//! use stripper_models::instruments::BlackCapFloorEngine;
//!
//! let reference = Date::from_ymd(2024, 6, 14).unwrap();
//! let day_count = DayCountConvention::Actual365Fixed;
//!
//! let surface = Arc::new(CapFloorTermVolGrid::flat(
//!     reference,
//!     day_count,
//!     vec![Tenor::years(1), Tenor::years(2)],
//!     vec![0.03, 0.05],
//!     0.18,
//! ).unwrap());
//! let index = Arc::new(FlatForwardIndex::new(Tenor::months(6), 0.04_f64));
//! let curve = Arc::new(FlatDiscountCurve::new(reference, 0.03, day_count));
//! let pricer = Arc::new(BlackCapFloorEngine::new(
//!     Arc::clone(&index), curve, reference, day_count,
//! ));
//!
//! let stripper = OptionletStripper::new(surface, index, pricer, &[]).unwrap();
//! let grids = stripper.results().unwrap();
//! assert_eq!(grids.optionlet_volatilities().nrows(), 3);
//! ```
//!
//! With the `parallel` feature, strike columns bootstrap under rayon.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod bootstrap;
pub mod error;
pub mod ladder;
pub mod stripper;

pub use bootstrap::{AccrualPeriods, StrippedGrids};
pub use error::{BootstrapFailure, ConfigurationError, StripError};
pub use ladder::{normalize_switch_strikes, TenorLadder};
pub use stripper::{OptionletStripper, DEFAULT_FIRST_GUESS, DEFAULT_SWITCH_STRIKE};
