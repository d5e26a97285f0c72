//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection, secant, and inverse quadratic interpolation for
/// robust derivative-free root finding. Converges for any continuous
/// function given a valid bracket, which makes it the right inversion
/// primitive for implied standard deviations: the Black price is
/// monotone in the standard deviation, so a sign-changing bracket pins
/// the unique root.
///
/// # Example
///
/// ```
/// use stripper_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Creates a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Creates a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Finds a root of `f` in the bracket `[a, b]`.
    ///
    /// Requires `f(a)` and `f(b)` to have opposite signs.
    ///
    /// # Errors
    ///
    /// - `SolverError::NoBracket` if the endpoints have the same sign
    /// - `SolverError::NonFiniteEvaluation` if `f` returns NaN/inf
    /// - `SolverError::MaxIterationsExceeded` on failure to converge
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = Self::eval(&f, a)?;
        let mut fb = Self::eval(&f, b)?;

        if fa * fb > T::zero() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Keep |f(a)| >= |f(b)| so b is the best estimate
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        let tol = self.config.tolerance;

        for _ in 0..self.config.max_iterations {
            if fb.abs() < tol {
                return Ok(b);
            }

            let m = (c - b) / two;
            if m.abs() <= tol {
                return Ok(b);
            }

            // Try interpolation; fall back to bisection when the step
            // would be unreliable.
            let mut use_bisection = true;
            if fa != fc && fb != fc {
                // Inverse quadratic interpolation
                let r = fb / fc;
                let s = fb / fa;
                let t = fa / fc;
                let p = s * (t * (r - t) * (c - b) - (T::one() - r) * (b - a));
                let q = (t - T::one()) * (r - T::one()) * (s - T::one());
                if p.abs() < (three * m * q).abs() / two && p.abs() < (e * q).abs() / two {
                    e = d;
                    d = p / q;
                    use_bisection = false;
                }
            } else if fb != fa {
                // Secant step
                let s = fb / fa;
                let p = two * m * s;
                let q = T::one() - s;
                if p.abs() < (three * m * q).abs() / two && p.abs() < (e * q).abs() / two {
                    e = d;
                    d = p / q;
                    use_bisection = false;
                }
            }

            if use_bisection {
                d = m;
                e = m;
            }

            a = b;
            fa = fb;

            if d.abs() > tol {
                b = b + d;
            } else {
                b = b + if m > T::zero() { tol } else { -tol };
            }

            fb = Self::eval(&f, b)?;

            // Re-establish a sign-changing bracket between b and c
            if (fb > T::zero()) == (fc > T::zero()) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }

            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    fn eval<F>(f: &F, x: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let fx = f(x);
        if fx.is_finite() {
            Ok(fx)
        } else {
            Err(SolverError::NonFiniteEvaluation {
                x: x.to_f64().unwrap_or(f64::NAN),
            })
        }
    }
}
