//! # stripper_models: Cap/Floor Analytics
//!
//! Layer 2 of the volstrip-rust workspace.
//!
//! This crate provides:
//! - Black-76 forward option formulas and the implied standard-deviation
//!   inversion (`analytical`)
//! - The cap/floor instrument vocabulary, the pricing-adapter contract
//!   consumed by the bootstrap engine, and a flat-volatility Black
//!   cap/floor engine implementing it (`instruments`)
//!
//! ## Design Principles
//!
//! - Formulas are generic over `num_traits::Float`
//! - Pricing is injected through the [`instruments::CapFloorPricingAdapter`]
//!   trait, so the bootstrap engine never commits to a pricing model
//! - Errors carry reproduction context as plain `f64` diagnostics

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
