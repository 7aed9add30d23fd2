//! Quadratic functions `a*x^2 + b*x + c` with closed-form real roots.
//!
//! A zero leading coefficient is not redirected to linear root finding: the quadratic
//! formula divides by `2a` and the resulting infinities or NaNs are returned as-is.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::format::format_terms;
use crate::linear::Linear;
use crate::polynomial::{IntegrationConstant, Polynomial};

/// A quadratic function `a*x^2 + b*x + c`.
///
/// Values are immutable; the `with_*` methods return fresh copies. Replacing `c`
/// clears a pending integration constant left behind by [`Linear::integrate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadratic {
    a: f64,
    b: f64,
    c: f64,
    constant: Option<IntegrationConstant>,
}

impl Quadratic {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            a,
            b,
            c,
            constant: None,
        }
    }

    pub(crate) fn with_integration_constant(mut self) -> Self {
        self.constant = Some(IntegrationConstant);
        self
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn with_a(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn with_b(self, b: f64) -> Self {
        Self { b, ..self }
    }

    /// Replaces the constant term and drops the pending integration constant.
    pub fn with_c(self, c: f64) -> Self {
        Self {
            c,
            constant: None,
            ..self
        }
    }

    /// Returns the pending integration constant marker, if any.
    pub fn integration_constant(&self) -> Option<IntegrationConstant> {
        self.constant
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    /// `b^2 - 4ac`
    pub fn discriminant(&self) -> f64 {
        self.b * self.b - 4.0 * self.a * self.c
    }

    /// Returns the real roots, largest-numerator root first.
    ///
    /// - positive discriminant: `[(-b + sqrt(d)) / 2a, (-b - sqrt(d)) / 2a]`
    /// - zero discriminant: `[-b / 2a]`
    /// - negative discriminant: no real roots
    ///
    /// # Example
    /// ```
    /// # use polyeq::Quadratic;
    /// assert_eq!(Quadratic::new(1.0, -3.0, 2.0).real_roots(), vec![2.0, 1.0]);
    /// assert_eq!(Quadratic::new(1.0, 2.0, 1.0).real_roots(), vec![-1.0]);
    /// assert!(Quadratic::new(1.0, 0.0, 1.0).real_roots().is_empty());
    /// ```
    pub fn real_roots(&self) -> Vec<f64> {
        let discriminant = self.discriminant();
        if discriminant > 0.0 {
            let root = discriminant.sqrt();
            vec![
                (-self.b + root) / (2.0 * self.a),
                (-self.b - root) / (2.0 * self.a),
            ]
        } else if discriminant == 0.0 {
            vec![-self.b / (2.0 * self.a)]
        } else {
            Vec::new()
        }
    }

    /// Returns the turning point `(x, f(x))`.
    pub fn vertex(&self) -> (f64, f64) {
        let x = -self.b / (2.0 * self.a);
        (x, self.eval(x))
    }

    pub fn derive(&self) -> Linear {
        Linear::new(2.0 * self.a, self.b)
    }

    /// Computes the indefinite integral, a cubic marked with a pending constant.
    pub fn integrate(&self) -> Polynomial {
        self.to_polynomial().integrate()
    }

    /// Computes the definite integral from `lower` to `upper` in closed form.
    pub fn integrate_between(&self, lower: f64, upper: f64) -> f64 {
        self.to_polynomial().integrate_between(lower, upper)
    }

    /// Coefficients in ascending order, untrimmed.
    pub fn terms(&self) -> [f64; 3] {
        [self.c, self.b, self.a]
    }

    pub fn to_polynomial(&self) -> Polynomial {
        Polynomial::from_ascending(self.terms().to_vec())
    }
}

impl PartialEq for Quadratic {
    fn eq(&self, other: &Self) -> bool {
        self.terms() == other.terms()
    }
}

impl fmt::Display for Quadratic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_terms(
            &self.terms(),
            self.constant.is_some(),
            f.precision(),
        ))
    }
}

impl From<Linear> for Quadratic {
    fn from(line: Linear) -> Self {
        Quadratic::new(0.0, line.m, line.b)
    }
}

impl Add for Quadratic {
    type Output = Quadratic;

    fn add(self, rhs: Quadratic) -> Quadratic {
        Quadratic::new(self.a + rhs.a, self.b + rhs.b, self.c + rhs.c)
    }
}

impl Sub for Quadratic {
    type Output = Quadratic;

    fn sub(self, rhs: Quadratic) -> Quadratic {
        Quadratic::new(self.a - rhs.a, self.b - rhs.b, self.c - rhs.c)
    }
}

impl Mul for Quadratic {
    type Output = Polynomial;

    fn mul(self, rhs: Quadratic) -> Polynomial {
        &self.to_polynomial() * &rhs.to_polynomial()
    }
}

impl Neg for Quadratic {
    type Output = Quadratic;

    fn neg(self) -> Quadratic {
        Quadratic::new(-self.a, -self.b, -self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_roots() {
        let q = Quadratic::new(1.0, -3.0, 2.0);
        assert_eq!(q.discriminant(), 1.0);
        assert_eq!(q.real_roots(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_double_root() {
        let q = Quadratic::new(1.0, 2.0, 1.0);
        assert_eq!(q.discriminant(), 0.0);
        assert_eq!(q.real_roots(), vec![-1.0]);
    }

    #[test]
    fn test_no_real_roots() {
        let q = Quadratic::new(1.0, 0.0, 1.0);
        assert_eq!(q.discriminant(), -4.0);
        assert!(q.real_roots().is_empty());
    }

    #[test]
    fn test_zero_leading_coefficient_is_not_linear() {
        // 2x - 4 has the root 2, but the quadratic formula divides by 2a = 0
        let q = Quadratic::new(0.0, 2.0, -4.0);
        let roots = q.real_roots();
        assert_eq!(roots.len(), 2);
        assert!(roots[0].is_nan());
        assert_eq!(roots[1], f64::NEG_INFINITY);
    }

    #[test]
    fn test_eval_and_vertex() {
        let q = Quadratic::new(2.0, -4.0, 1.0);
        assert_eq!(q.eval(3.0), 7.0);
        assert_eq!(q.vertex(), (1.0, -1.0));
    }

    #[test]
    fn test_derive() {
        assert_eq!(Quadratic::new(3.0, 2.0, 1.0).derive(), Linear::new(6.0, 2.0));
    }

    #[test]
    fn test_integrate() {
        let cubic = Quadratic::new(3.0, 2.0, 1.0).integrate();
        assert_eq!(cubic.terms(), &[0.0, 1.0, 1.0, 1.0]);
        assert_eq!(cubic.to_string(), "x^3 + x^2 + x + C");
        assert_eq!(Quadratic::new(3.0, 2.0, 1.0).integrate_between(0.0, 1.0), 3.0);
    }

    #[test]
    fn test_with_c_clears_marker() {
        let integral = Linear::new(2.0, 0.0).integrate();
        assert_eq!(integral.to_string(), "x^2 + C");

        let kept = integral.with_b(1.0);
        assert!(kept.integration_constant().is_some());

        let fixed = integral.with_c(5.0);
        assert!(fixed.integration_constant().is_none());
        assert_eq!(fixed.to_string(), "x^2 + 5");
    }

    #[test]
    fn test_marker_ignored_by_equality() {
        let integral = Linear::new(2.0, 0.0).integrate();
        assert_eq!(integral, Quadratic::new(1.0, 0.0, 0.0));
        assert_eq!(integral.eval(3.0), 9.0);
    }

    #[test]
    fn test_arithmetic() {
        let p = Quadratic::new(1.0, 2.0, 3.0);
        let q = Quadratic::new(1.0, -2.0, 0.0);
        assert_eq!(p + q, Quadratic::new(2.0, 0.0, 3.0));
        assert_eq!(p - q, Quadratic::new(0.0, 4.0, 3.0));
        assert_eq!(-p, Quadratic::new(-1.0, -2.0, -3.0));
        assert_eq!((p * q).terms(), &[0.0, -6.0, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Quadratic::new(1.0, -3.0, 2.0).to_string(), "x^2 - 3x + 2");
        assert_eq!(Quadratic::new(0.0, 0.0, 0.0).to_string(), "0");
    }
}
