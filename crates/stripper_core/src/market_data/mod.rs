//! Market data contracts and reference implementations.
//!
//! This module provides:
//! - `observable`: version counters for lazy-recompute invalidation
//! - `surfaces`: cap/floor term volatility surface contract and a quoted grid
//! - `index`: forward-rate index contract and a flat-forward implementation
//! - `curves`: discount curve contract and a flat implementation
//! - `error`: `MarketDataError`

pub mod curves;
pub mod error;
pub mod index;
pub mod observable;
pub mod surfaces;

pub use curves::{DiscountCurve, FlatDiscountCurve};
pub use error::MarketDataError;
pub use index::{FlatForwardIndex, ForwardRateIndex};
pub use observable::{EvaluationDate, Versioned};
pub use surfaces::{CapFloorTermVolGrid, CapFloorTermVolSurface};
