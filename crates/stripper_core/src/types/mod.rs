//! Core type definitions.
//!
//! This module provides:
//! - `time`: `Date`, `Tenor`, and day count conventions
//! - `error`: shared error types (`DateError`, `SolverError`)

pub mod error;
pub mod time;

pub use error::{DateError, SolverError};
pub use time::{Date, DayCountConvention, Tenor};
