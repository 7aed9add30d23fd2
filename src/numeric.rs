//! Numeric calculus for functions without a closed form.
//!
//! This module provides the kernels behind `Equation::derive` and `Equation::integrate`:
//!
//! - Forward-difference differentiation: `(f(x + eps) - f(x)) / eps`
//! - Riemann sums sampled at the left edge, midpoint or right edge of each step
//! - The trapezoid rule, reusing the previous sample on every step
//!
//! Sample points are `lower + i * eps` for every `i` with a sample strictly below
//! `upper`. When `lower > upper` the bounds are swapped, the sum is accumulated as
//! usual and the result is negated, so `integrate(f, a, b) == -integrate(f, b, a)`
//! holds exactly for every method and step size.
//!
//! # Example
//!
//! ```
//! use polyeq::numeric::{integrate, IntegrationMethod, NumericOptions};
//!
//! let options = NumericOptions::default().with_method(IntegrationMethod::Middle);
//! let area = integrate(&|x: f64| x, 0.0, 2.0, &options).unwrap();
//! assert!((area - 2.0).abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::errors::EquationError;

/// Default step size for numeric differentiation and integration.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// Selects the sampling scheme of a numeric integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntegrationMethod {
    /// Rectangles sampled at the left edge of each step
    Left,
    /// Rectangles sampled at the midpoint of each step
    Middle,
    /// Rectangles sampled at the right edge of each step
    Right,
    /// Average of consecutive samples
    #[default]
    Trapezoid,
}

impl IntegrationMethod {
    /// All methods, in selector order.
    pub const ALL: [IntegrationMethod; 4] = [
        IntegrationMethod::Left,
        IntegrationMethod::Middle,
        IntegrationMethod::Right,
        IntegrationMethod::Trapezoid,
    ];

    /// Returns the lowercase name accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            IntegrationMethod::Left => "left",
            IntegrationMethod::Middle => "middle",
            IntegrationMethod::Right => "right",
            IntegrationMethod::Trapezoid => "trapezoid",
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegrationMethod {
    type Err = EquationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(IntegrationMethod::Left),
            "middle" | "mid" => Ok(IntegrationMethod::Middle),
            "right" => Ok(IntegrationMethod::Right),
            "trapezoid" => Ok(IntegrationMethod::Trapezoid),
            _ => Err(EquationError::InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<u8> for IntegrationMethod {
    type Error = EquationError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(selector as usize)
            .copied()
            .ok_or_else(|| EquationError::InvalidMethod(selector.to_string()))
    }
}

/// Step size and method used by numeric calculus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericOptions {
    /// Step size; must be finite and positive
    pub epsilon: f64,
    /// Sampling scheme for integrals
    pub method: IntegrationMethod,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            method: IntegrationMethod::default(),
        }
    }
}

impl NumericOptions {
    /// Creates options from a step size and a method. Nothing is checked until
    /// the options are used; see [`NumericOptions::validate`].
    pub fn new(epsilon: f64, method: IntegrationMethod) -> Self {
        Self { epsilon, method }
    }

    /// Returns a copy with the step size replaced.
    pub fn with_epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    /// Returns a copy with the integration method replaced.
    pub fn with_method(self, method: IntegrationMethod) -> Self {
        Self { method, ..self }
    }

    /// Rejects step sizes that would never terminate the integration loop.
    pub fn validate(&self) -> Result<(), EquationError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(EquationError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// Forward-difference derivative of `f` at `x`.
pub fn forward_difference<F>(f: &F, x: f64, epsilon: f64) -> f64
where
    F: Fn(f64) -> f64 + ?Sized,
{
    (f(x + epsilon) - f(x)) / epsilon
}

/// Numerically integrates `f` from `lower` to `upper`.
///
/// # Arguments
/// * `f` - The integrand
/// * `lower` - Lower bound; may exceed `upper`
/// * `upper` - Upper bound
/// * `options` - Step size and sampling method
///
/// # Returns
/// * `Result<f64, EquationError>` - The approximate integral
///
/// # Errors
/// Returns `EquationError::InvalidEpsilon` if the step size is not finite and positive,
/// and `EquationError::InvalidBound` if either bound is infinite or NaN.
pub fn integrate<F>(
    f: &F,
    lower: f64,
    upper: f64,
    options: &NumericOptions,
) -> Result<f64, EquationError>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    options.validate()?;
    for bound in [lower, upper] {
        if !bound.is_finite() {
            return Err(EquationError::InvalidBound(bound));
        }
    }

    let (lower, upper, sign) = if lower > upper {
        (upper, lower, -1.0)
    } else {
        (lower, upper, 1.0)
    };

    let eps = options.epsilon;
    let mut sum = 0.0;
    let mut steps: u64 = 0;

    match options.method {
        IntegrationMethod::Left => {
            let mut x = lower;
            while x < upper {
                sum += f(x) * eps;
                steps += 1;
                x = lower + steps as f64 * eps;
            }
        }
        IntegrationMethod::Middle => {
            let mut x = lower;
            while x < upper {
                sum += f(x + eps / 2.0) * eps;
                steps += 1;
                x = lower + steps as f64 * eps;
            }
        }
        IntegrationMethod::Right => {
            let mut x = lower;
            while x < upper {
                sum += f(x + eps) * eps;
                steps += 1;
                x = lower + steps as f64 * eps;
            }
        }
        IntegrationMethod::Trapezoid => {
            let mut x = lower;
            let mut previous = f(x);
            while x < upper {
                let next = f(x + eps);
                sum += eps / 2.0 * (previous + next);
                previous = next;
                steps += 1;
                x = lower + steps as f64 * eps;
            }
        }
    }

    trace!(
        "integrated [{lower}, {upper}] with {} in {steps} steps of {eps}",
        options.method
    );

    Ok(sign * sum)
}
