//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// Provides the convergence tolerance and iteration limit shared by all
/// solver implementations.
///
/// # Example
///
/// ```
/// use stripper_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
///
/// let custom = SolverConfig::new(1e-12, 200);
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance: the solver stops when `|f(x)| < tolerance`.
    pub tolerance: T,

    /// Maximum number of iterations before giving up with
    /// `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default configuration: tolerance 1e-10, 100 iterations.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap(),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Creates a configuration with the specified values.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Configuration with tighter tolerance (1e-14) and more iterations (500).
    pub fn high_precision() -> Self {
        Self {
            tolerance: T::from(1e-14).unwrap(),
            max_iterations: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert!((config.tolerance - 1e-10).abs() < 1e-15);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_zero_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(0.0, 100);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_zero_iterations_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(1e-10, 0);
    }

    #[test]
    fn test_high_precision_config() {
        let config: SolverConfig<f64> = SolverConfig::high_precision();
        assert!(config.tolerance < 1e-12);
        assert!(config.max_iterations >= 500);
    }
}
