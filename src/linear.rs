//! Linear functions `m*x + b`.
//!
//! `Linear` also represents constant functions (`m == 0`); it is never collapsed into
//! a different shape. Its derivative is the one exception to closed-form calculus in
//! the exact types: there is no dedicated constant type, so `derive` returns an opaque
//! [`Equation`] wrapping the slope.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::equation::Equation;
use crate::format::format_terms;
use crate::polynomial::Polynomial;
use crate::quadratic::Quadratic;

/// A linear function `m*x + b`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Linear {
    /// Slope
    pub m: f64,
    /// Intercept
    pub b: f64,
}

impl Linear {
    /// Creates `m*x + b`.
    pub fn new(m: f64, b: f64) -> Self {
        Self { m, b }
    }

    /// The constant function `c`.
    pub fn constant(c: f64) -> Self {
        Self { m: 0.0, b: c }
    }

    /// Evaluates `m*x + b`.
    pub fn eval(&self, x: f64) -> f64 {
        self.m * x + self.b
    }

    /// Returns the x-intercept `-b / m`.
    ///
    /// The division is not guarded: a zero slope yields an infinity, or NaN when the
    /// intercept is zero as well.
    pub fn root(&self) -> f64 {
        -self.b / self.m
    }

    /// Returns the constant derivative `m` as an opaque equation.
    pub fn derive(&self) -> Equation {
        Equation::constant(self.m)
    }

    /// Computes the indefinite integral `m/2 x^2 + b x + C`.
    pub fn integrate(&self) -> Quadratic {
        Quadratic::new(self.m / 2.0, self.b, 0.0).with_integration_constant()
    }

    /// Computes the definite integral from `lower` to `upper` in closed form.
    pub fn integrate_between(&self, lower: f64, upper: f64) -> f64 {
        self.to_polynomial().integrate_between(lower, upper)
    }

    /// Coefficients in ascending order, untrimmed.
    pub fn terms(&self) -> [f64; 2] {
        [self.b, self.m]
    }

    pub fn to_polynomial(&self) -> Polynomial {
        Polynomial::from_ascending(self.terms().to_vec())
    }
}

impl fmt::Display for Linear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_terms(&self.terms(), false, f.precision()))
    }
}

impl Add for Linear {
    type Output = Linear;

    fn add(self, rhs: Linear) -> Linear {
        Linear::new(self.m + rhs.m, self.b + rhs.b)
    }
}

impl Sub for Linear {
    type Output = Linear;

    fn sub(self, rhs: Linear) -> Linear {
        Linear::new(self.m - rhs.m, self.b - rhs.b)
    }
}

impl Mul for Linear {
    type Output = Quadratic;

    fn mul(self, rhs: Linear) -> Quadratic {
        Quadratic::new(
            self.m * rhs.m,
            self.m * rhs.b + self.b * rhs.m,
            self.b * rhs.b,
        )
    }
}

impl Neg for Linear {
    type Output = Linear;

    fn neg(self) -> Linear {
        Linear::new(-self.m, -self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval() {
        let line = Linear::new(2.0, 3.0);
        assert_eq!(line.eval(0.0), 3.0);
        assert_eq!(line.eval(-1.5), 0.0);
    }

    #[test]
    fn test_root() {
        assert_eq!(Linear::new(2.0, -4.0).root(), 2.0);
    }

    #[test]
    fn test_root_with_zero_slope() {
        assert_eq!(Linear::new(0.0, 3.0).root(), f64::NEG_INFINITY);
        assert_eq!(Linear::new(0.0, -3.0).root(), f64::INFINITY);
        assert!(Linear::new(0.0, 0.0).root().is_nan());
    }

    #[test]
    fn test_derive_is_opaque_constant() {
        let slope = Linear::new(2.5, -1.0).derive();
        assert_eq!(slope.eval(0.0), 2.5);
        assert_eq!(slope.eval(1e6), 2.5);
    }

    #[test]
    fn test_integrate() {
        let integral = Linear::new(4.0, 1.0).integrate();
        assert_eq!((integral.a(), integral.b(), integral.c()), (2.0, 1.0, 0.0));
        assert_eq!(integral.to_string(), "2x^2 + x + C");
        assert_eq!(Linear::new(4.0, 1.0).integrate_between(0.0, 1.0), 3.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Linear::new(2.0, 3.0);
        let b = Linear::new(-1.0, 1.0);
        assert_eq!(a + b, Linear::new(1.0, 4.0));
        assert_eq!(a - b, Linear::new(3.0, 2.0));
        assert_eq!(-a, Linear::new(-2.0, -3.0));

        // (2x + 3)(-x + 1) = -2x^2 - x + 3
        let product = a * b;
        assert_eq!((product.a(), product.b(), product.c()), (-2.0, -1.0, 3.0));
    }

    #[test]
    fn test_constant_stays_linear() {
        let c = Linear::constant(1.0);
        assert_eq!(c.m, 0.0);
        assert_eq!(c.to_string(), "1");
        assert_eq!(c.to_polynomial().order(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Linear::new(2.0, 3.0).to_string(), "2x + 3");
        assert_eq!(Linear::new(-1.0, 0.0).to_string(), "- x");
        assert_eq!(format!("{:.2}", Linear::new(0.5, -2.0)), "0.50x - 2.00");
    }
}
