//! Numerical routines.
//!
//! Currently hosts the root-finding solvers used for implied
//! standard-deviation inversion.

pub mod solvers;
