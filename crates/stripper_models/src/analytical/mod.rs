//! Analytical formulas.
//!
//! This module provides:
//! - `distributions`: standard normal CDF/PDF
//! - `black76`: Black-76 forward option pricing and implied
//!   standard-deviation inversion
//! - `error`: `Black76Error`

pub mod black76;
pub mod distributions;
pub mod error;

pub use black76::{black_price, implied_std_dev, OptionType};
pub use error::Black76Error;
