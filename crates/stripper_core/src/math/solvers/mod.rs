//! Root-finding solvers.
//!
//! This module provides:
//! - [`SolverConfig`]: shared tolerance/iteration settings
//! - [`BrentSolver`]: bracketing root finder without derivatives

mod brent;
mod config;

pub use brent::BrentSolver;
pub use config::SolverConfig;
