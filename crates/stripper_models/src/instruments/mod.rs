//! Cap/floor instruments and pricing.
//!
//! This module provides:
//! - `capfloor`: instrument vocabulary ([`CapFloorKind`],
//!   [`PricedCapFloor`]) and the [`CapFloorPricingAdapter`] contract
//!   consumed by the bootstrap engine
//! - `engine`: [`BlackCapFloorEngine`], a flat-volatility Black-76
//!   implementation of the adapter
//! - `error`: [`EngineError`]

pub mod capfloor;
pub mod engine;
pub mod error;

pub use capfloor::{CapFloorKind, CapFloorPricingAdapter, PricedCapFloor};
pub use engine::BlackCapFloorEngine;
pub use error::EngineError;
