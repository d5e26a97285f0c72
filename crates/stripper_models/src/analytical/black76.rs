//! Black-76 forward option pricing and implied standard deviation.
//!
//! All quantities here are *undiscounted and per unit annuity*: the
//! caller scales by `accrual × discount factor`. Prices therefore depend
//! only on the option type, strike, forward, and the total standard
//! deviation `σ√t`, which is exactly the quantity the optionlet
//! bootstrap solves for.
//!
//! ## Mathematical Formulas
//!
//! **Call**: F·N(d₁) - K·N(d₂)
//! **Put**:  K·N(-d₂) - F·N(-d₁)
//!
//! Where d₁ = ln(F/K)/s + s/2, d₂ = d₁ - s, s = σ√t.

use num_traits::Float;
use std::fmt;

use stripper_core::math::solvers::{BrentSolver, SolverConfig};

use super::distributions::norm_cdf;
use super::error::Black76Error;

/// Forward option type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Call on the forward rate (caplet).
    Call,
    /// Put on the forward rate (floorlet).
    Put,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Degenerate standard deviations below this threshold price as intrinsic.
const MIN_STD_DEV: f64 = 1e-12;

/// Maximum number of bracket-expansion steps in the inversion.
const MAX_BRACKET_STEPS: usize = 60;

// Core formula, inputs already validated, std_dev >= 0.
fn black_core<T: Float>(option_type: OptionType, strike: T, forward: T, std_dev: T) -> T {
    let zero = T::zero();
    if std_dev < T::from(MIN_STD_DEV).unwrap() {
        let intrinsic = match option_type {
            OptionType::Call => forward - strike,
            OptionType::Put => strike - forward,
        };
        return intrinsic.max(zero);
    }

    let half = T::from(0.5).unwrap();
    let d1 = (forward / strike).ln() / std_dev + half * std_dev;
    let d2 = d1 - std_dev;

    match option_type {
        OptionType::Call => forward * norm_cdf(d1) - strike * norm_cdf(d2),
        OptionType::Put => strike * norm_cdf(-d2) - forward * norm_cdf(-d1),
    }
}

/// Black-76 value of a forward option, undiscounted, per unit annuity.
///
/// # Arguments
///
/// * `strike` - Strike rate (K > 0)
/// * `forward` - Forward rate (F > 0)
/// * `std_dev` - Total standard deviation σ√t (≥ 0); zero degenerates
///   to intrinsic value
///
/// # Examples
///
/// ```
/// use stripper_models::analytical::{black_price, OptionType};
///
/// // ATM: call = F * (2N(s/2) - 1)
/// let value = black_price(OptionType::Call, 0.04_f64, 0.04, 0.2).unwrap();
/// assert!((value - 0.0031862).abs() < 1e-6);
/// ```
pub fn black_price<T: Float>(
    option_type: OptionType,
    strike: T,
    forward: T,
    std_dev: T,
) -> Result<T, Black76Error> {
    let zero = T::zero();
    if !(forward > zero) || !forward.is_finite() {
        return Err(Black76Error::InvalidForward {
            forward: forward.to_f64().unwrap_or(f64::NAN),
        });
    }
    if !(strike > zero) || !strike.is_finite() {
        return Err(Black76Error::InvalidStrike {
            strike: strike.to_f64().unwrap_or(f64::NAN),
        });
    }
    if std_dev < zero || !std_dev.is_finite() {
        return Err(Black76Error::InvalidStdDev {
            std_dev: std_dev.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(black_core(option_type, strike, forward, std_dev))
}

/// Inverts the Black-76 formula for the standard deviation σ√t that
/// reproduces `price`.
///
/// Solves `annuity × black(option_type, strike, forward, s) = price`
/// for `s`. The Black price is strictly increasing in `s`, so the root
/// is unique; `guess` seeds the bracket (warm-starting from a
/// neighbouring solution keeps the bracket tight and the solve cheap).
///
/// # Errors
///
/// - [`Black76Error::PriceOutOfBounds`] when the target price lies below
///   intrinsic value (negative time value) or at/above the large-vol
///   supremum (F for calls, K for puts) — no standard deviation can
///   reproduce such a price
/// - [`Black76Error::Solver`] if the root finder fails
///
/// # Examples
///
/// ```
/// use stripper_models::analytical::{black_price, implied_std_dev, OptionType};
/// use stripper_core::math::solvers::SolverConfig;
///
/// let annuity = 0.49;
/// let price = annuity * black_price(OptionType::Call, 0.05_f64, 0.04, 0.14).unwrap();
///
/// let s = implied_std_dev(
///     OptionType::Call, 0.05, 0.04, price, annuity, 0.1, SolverConfig::default(),
/// ).unwrap();
/// assert!((s - 0.14).abs() < 1e-6);
/// ```
pub fn implied_std_dev<T: Float>(
    option_type: OptionType,
    strike: T,
    forward: T,
    price: T,
    annuity: T,
    guess: T,
    config: SolverConfig<T>,
) -> Result<T, Black76Error> {
    let zero = T::zero();
    if !(annuity > zero) || !annuity.is_finite() {
        return Err(Black76Error::InvalidAnnuity {
            annuity: annuity.to_f64().unwrap_or(f64::NAN),
        });
    }
    // Validates forward/strike as a side effect.
    let intrinsic = black_price(option_type, strike, forward, zero)?;

    let target = price / annuity;
    let upper = match option_type {
        OptionType::Call => forward,
        OptionType::Put => strike,
    };

    if target < intrinsic || target >= upper {
        return Err(Black76Error::PriceOutOfBounds {
            price: target.to_f64().unwrap_or(f64::NAN),
            lower: intrinsic.to_f64().unwrap_or(f64::NAN),
            upper: upper.to_f64().unwrap_or(f64::NAN),
        });
    }
    if target - intrinsic < config.tolerance {
        return Ok(zero);
    }

    let objective = |s: T| black_core(option_type, strike, forward, s) - target;

    // Geometric bracket expansion around the warm-start guess; the
    // objective is monotone, so a sign change pins the unique root.
    let two = T::from(2.0).unwrap();
    let mut lo = if guess.is_finite() && guess > zero {
        guess
    } else {
        T::from(0.1).unwrap()
    };
    let mut hi = lo;

    let mut steps = 0;
    while objective(lo) > zero && steps < MAX_BRACKET_STEPS {
        lo = lo / two;
        steps += 1;
    }
    steps = 0;
    while objective(hi) < zero && steps < MAX_BRACKET_STEPS {
        hi = hi * two;
        steps += 1;
    }

    let solver = BrentSolver::new(config);
    let root = solver.find_root(objective, lo, hi)?;
    Ok(root)
}
