//! # stripper_core: Foundation for the Optionlet Stripper
//!
//! ## Layer 1 (Foundation) Role
//!
//! stripper_core serves as the bottom layer of the 3-layer workspace, providing:
//! - Time types: `Date`, `DayCountConvention`, `Tenor` (`types::time`)
//! - Error types: `DateError`, `SolverError` (`types::error`)
//! - Root-finding solvers: `BrentSolver`, `SolverConfig` (`math::solvers`)
//! - Market-data contracts and reference implementations (`market_data`):
//!   cap/floor term volatility surfaces, forward-rate indices, discount
//!   curves, and the versioned-collaborator machinery used for lazy
//!   recomputation
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other stripper_* crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Structured error types
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use stripper_core::types::time::{Date, DayCountConvention, Tenor};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let fixing = start.add_months(6).unwrap();
//! let yf = DayCountConvention::Actual365Fixed.year_fraction(start, fixing);
//! assert!((yf - 0.4986).abs() < 1e-3);
//!
//! let tenor = Tenor::months(3);
//! assert_eq!(format!("{}", tenor), "3M");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
