//! Standard normal distribution functions.
//!
//! Generic over `T: Float` so the same code serves `f64` and `f32`.

use num_traits::Float;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Complementary error function via the Abramowitz and Stegun 7.1.26
/// polynomial (maximum error 1.5e-7 for all x).
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let one = T::one();
    let abs_x = x.abs();

    let a1 = T::from(0.254829592).unwrap();
    let a2 = T::from(-0.284496736).unwrap();
    let a3 = T::from(1.421413741).unwrap();
    let a4 = T::from(-1.453152027).unwrap();
    let a5 = T::from(1.061405429).unwrap();
    let p = T::from(0.3275911).unwrap();

    let t = one / (one + p * abs_x);
    let poly = a1 + t * (a2 + t * (a3 + t * (a4 + t * a5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    // erfc(-x) = 2 - erfc(x)
    if x < T::zero() {
        T::from(2.0).unwrap() - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// Φ(x) = 0.5 * erfc(-x / √2), accurate to about 1e-7 for all finite x.
///
/// # Examples
///
/// ```
/// use stripper_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let sqrt_2 = T::from(std::f64::consts::SQRT_2).unwrap();
    let half = T::from(0.5).unwrap();
    half * erfc_approx(-x / sqrt_2)
}

/// Standard normal probability density function.
///
/// φ(x) = exp(-x²/2) / √(2π).
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let frac = T::from(FRAC_1_SQRT_2PI).unwrap();
    let half = T::from(0.5).unwrap();
    frac * (-half * x * x).exp()
}
