//! Dense single-variable polynomials of arbitrary degree.
//!
//! This module provides the `Polynomial` type, which stores its coefficients in
//! ascending order (index `i` holds the coefficient of `x^i`) and keeps them trimmed:
//! the highest stored coefficient is never zero, and the zero polynomial is the
//! empty sequence.
//!
//! # Features
//!
//! - Exact addition, subtraction and multiplication (discrete convolution)
//! - Exact derivative, indefinite integral and closed-form definite integral
//! - Incremental-power evaluation, reproduced bit-for-bit by the JIT backend
//! - Canonical formatting, with a `+ C` marker after indefinite integration
//!
//! Division is intentionally not symbolic: `p / q` yields an opaque [`Equation`]
//! that divides the two evaluations pointwise.
//!
//! # Example
//!
//! ```
//! use polyeq::{Polynomial, TermOrder};
//!
//! let p = Polynomial::new(vec![1.0, 2.0, 0.0, 0.0], TermOrder::Ascending);
//! assert_eq!(p.order(), 1);
//! assert_eq!(p.terms(), &[1.0, 2.0]);
//!
//! let square = &p * &p; // (2x + 1)^2
//! assert_eq!(square.to_string(), "4x^2 + 4x + 1");
//! assert_eq!(p.integrate().derive(), p);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use itertools::{EitherOrBoth, Itertools};

use crate::builder::compile_terms;
use crate::equation::Equation;
use crate::errors::EquationError;
use crate::format::format_terms;
use crate::numeric::{self, NumericOptions};

/// Orientation of a coefficient sequence handed to [`Polynomial::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermOrder {
    /// Index `i` holds the coefficient of `x^i`
    #[default]
    Ascending,
    /// The first entry holds the coefficient of the highest power
    Descending,
}

/// Marker for an integration constant that has not been chosen yet.
///
/// Only affects formatting (`... + C`); it takes no part in equality, ordering,
/// evaluation or arithmetic, and arithmetic results never carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntegrationConstant;

/// A dense polynomial with trimmed, ascending coefficients.
#[derive(Debug, Clone, Default)]
pub struct Polynomial {
    terms: Vec<f64>,
    constant: Option<IntegrationConstant>,
}

impl Polynomial {
    /// Creates a polynomial from a coefficient sequence.
    ///
    /// # Arguments
    /// * `terms` - The coefficients
    /// * `order` - Whether `terms` starts at the constant or at the highest power
    ///
    /// # Example
    /// ```
    /// # use polyeq::{Polynomial, TermOrder};
    /// let p = Polynomial::new(vec![3.0, 0.0, 1.0], TermOrder::Descending);
    /// assert_eq!(p.terms(), &[1.0, 0.0, 3.0]);
    /// ```
    pub fn new(mut terms: Vec<f64>, order: TermOrder) -> Self {
        if order == TermOrder::Descending {
            terms.reverse();
        }
        Self::from_terms(terms)
    }

    /// Builds a polynomial from coefficients listed constant term first.
    pub fn from_ascending(terms: Vec<f64>) -> Self {
        Self::new(terms, TermOrder::Ascending)
    }

    /// Builds a polynomial from coefficients listed highest power first.
    pub fn from_descending(terms: Vec<f64>) -> Self {
        Self::new(terms, TermOrder::Descending)
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    fn from_terms(mut terms: Vec<f64>) -> Self {
        trim(&mut terms);
        Self {
            terms,
            constant: None,
        }
    }

    pub(crate) fn with_constant(mut self) -> Self {
        self.constant = Some(IntegrationConstant);
        self
    }

    /// Returns the trimmed coefficients in ascending order.
    pub fn terms(&self) -> &[f64] {
        &self.terms
    }

    /// Coefficient of `x^degree`; zero beyond the stored terms.
    pub fn coefficient(&self, degree: usize) -> f64 {
        self.terms.get(degree).copied().unwrap_or(0.0)
    }

    /// Highest power with a non-zero coefficient. The zero polynomial reports 0.
    pub fn order(&self) -> usize {
        self.terms.len().saturating_sub(1)
    }

    /// True if every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the pending integration constant marker, if any.
    pub fn integration_constant(&self) -> Option<IntegrationConstant> {
        self.constant
    }

    /// Evaluates the polynomial at `x`.
    ///
    /// The power of `x` is carried from term to term rather than recomputed, and
    /// the compiled form from [`Polynomial::compile`] performs the same operations
    /// in the same order.
    pub fn eval(&self, x: f64) -> f64 {
        let mut result = 0.0;
        let mut power = 1.0;
        for &coeff in &self.terms {
            result += coeff * power;
            power *= x;
        }
        result
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_terms(self.terms.iter().map(|c| c * factor).collect())
    }

    /// Computes the exact derivative.
    pub fn derive(&self) -> Self {
        Self::from_terms(
            self.terms
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| i as f64 * c)
                .collect(),
        )
    }

    /// Computes the indefinite integral with a zero constant term.
    ///
    /// The result is marked with a pending integration constant, shown as `+ C`
    /// when formatted.
    pub fn integrate(&self) -> Self {
        let terms = std::iter::once(0.0)
            .chain(
                self.terms
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c / (i + 1) as f64),
            )
            .collect();
        Self::from_terms(terms).with_constant()
    }

    /// Computes the definite integral from `lower` to `upper` in closed form.
    pub fn integrate_between(&self, lower: f64, upper: f64) -> f64 {
        let mut sum = 0.0;
        let mut lower_power = lower;
        let mut upper_power = upper;
        for (i, coeff) in self.terms.iter().enumerate() {
            sum += coeff / (i + 1) as f64 * (upper_power - lower_power);
            lower_power *= lower;
            upper_power *= upper;
        }
        sum
    }

    /// Approximates the definite integral with the numeric kernels.
    ///
    /// Mostly useful to cross-check [`Polynomial::integrate_between`].
    pub fn integrate_numeric(
        &self,
        lower: f64,
        upper: f64,
        options: &NumericOptions,
    ) -> Result<f64, EquationError> {
        numeric::integrate(&|x| self.eval(x), lower, upper, options)
    }

    /// JIT-compiles the polynomial into an opaque [`Equation`].
    ///
    /// # Errors
    /// Returns `EquationError::Build` if Cranelift cannot target the host or fails
    /// to emit the function.
    pub fn compile(&self) -> Result<Equation, EquationError> {
        let fun = compile_terms(&self.terms)?;
        Ok(Equation::from_parts(fun, format!("jit({self})")))
    }

    /// Formats the polynomial with a fixed number of decimals.
    pub fn to_string_with(&self, precision: usize) -> String {
        format_terms(&self.terms, self.constant.is_some(), Some(precision))
    }
}

/// Drops trailing zero coefficients.
pub(crate) fn trim(terms: &mut Vec<f64>) {
    while terms.last() == Some(&0.0) {
        terms.pop();
    }
}

/// Orders two coefficient sequences by degree, then from the highest term down.
pub(crate) fn compare_terms(a: &[f64], b: &[f64]) -> Option<Ordering> {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {
            for (x, y) in a.iter().rev().zip(b.iter().rev()) {
                match x.partial_cmp(y)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(Ordering::Equal)
        }
        other => Some(other),
    }
}

fn combine(a: &[f64], b: &[f64], op: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter()
        .zip_longest(b.iter())
        .map(|pair| match pair {
            EitherOrBoth::Both(x, y) => op(*x, *y),
            EitherOrBoth::Left(x) => op(*x, 0.0),
            EitherOrBoth::Right(y) => op(0.0, *y),
        })
        .collect()
}

fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl PartialOrd for Polynomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare_terms(&self.terms, &other.terms)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_terms(
            &self.terms,
            self.constant.is_some(),
            f.precision(),
        ))
    }
}

impl From<Vec<f64>> for Polynomial {
    fn from(terms: Vec<f64>) -> Self {
        Self::from_ascending(terms)
    }
}

impl From<f64> for Polynomial {
    fn from(constant: f64) -> Self {
        Self::from_terms(vec![constant])
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::from_terms(combine(&self.terms, &rhs.terms, |x, y| x + y))
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::from_terms(combine(&self.terms, &rhs.terms, |x, y| x - y))
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::from_terms(convolve(&self.terms, &rhs.terms))
    }
}

impl Div for &Polynomial {
    type Output = Equation;

    fn div(self, rhs: &Polynomial) -> Equation {
        Equation::from(self.clone()) / Equation::from(rhs.clone())
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial::from_terms(self.terms.iter().map(|c| -c).collect())
    }
}

macro_rules! forward_owned_ops {
    ($($trait:ident, $method:ident, $output:ty);* $(;)?) => {
        $(
            impl $trait for Polynomial {
                type Output = $output;

                fn $method(self, rhs: Polynomial) -> $output {
                    (&self).$method(&rhs)
                }
            }
        )*
    };
}

forward_owned_ops! {
    Add, add, Polynomial;
    Sub, sub, Polynomial;
    Mul, mul, Polynomial;
    Div, div, Equation;
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(terms: &[f64]) -> Polynomial {
        Polynomial::from_ascending(terms.to_vec())
    }

    #[test]
    fn test_trimming() {
        let p = poly(&[1.0, 2.0, 0.0, 0.0]);
        assert_eq!(p.order(), 1);
        assert_eq!(p.terms(), &[1.0, 2.0]);

        let zero = poly(&[0.0, 0.0]);
        assert!(zero.is_zero());
        assert_eq!(zero.terms(), &[] as &[f64]);
        assert_eq!(zero.order(), 0);
    }

    #[test]
    fn test_descending() {
        let p = Polynomial::new(vec![0.0, 3.0, 2.0, 1.0], TermOrder::Descending);
        assert_eq!(p, poly(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_eval() {
        let p = poly(&[1.0, 0.0, 2.0, 3.0]);
        assert_eq!(p.eval(2.0), 1.0 + 8.0 + 24.0);
        assert_eq!(Polynomial::zero().eval(5.0), 0.0);
    }

    #[test]
    fn test_eval_matches_incremental_powers() {
        let p = poly(&[0.1, -0.7, 1.3, 2.9, -0.05]);
        let x = 1.37;
        let mut expected = 0.0;
        let mut power = 1.0;
        for c in [0.1, -0.7, 1.3, 2.9, -0.05] {
            expected += c * power;
            power *= x;
        }
        assert_eq!(p.eval(x).to_bits(), expected.to_bits());
    }

    #[test]
    fn test_add_sub() {
        let a = poly(&[1.0, 2.0, 3.0]);
        let b = poly(&[4.0, 5.0]);
        assert_eq!(&a + &b, poly(&[5.0, 7.0, 3.0]));
        assert_eq!(&b - &a, poly(&[3.0, 3.0, -3.0]));
        // cancelling the leading term trims the result
        assert_eq!((&a - &poly(&[0.0, 0.0, 3.0])).order(), 1);
        assert!((&a - &a).is_zero());
    }

    #[test]
    fn test_multiply() {
        let p = poly(&[1.0, 1.0]);
        assert_eq!(&p * &p, poly(&[1.0, 2.0, 1.0]));
        assert_eq!(
            poly(&[1.0, 2.0, 3.0]) * poly(&[-1.0, 0.0, 1.0]),
            poly(&[-1.0, -2.0, -2.0, 2.0, 3.0])
        );
        assert!((&p * &Polynomial::zero()).is_zero());
    }

    #[test]
    fn test_divide_is_numeric() {
        let numerator = poly(&[-1.0, 0.0, 1.0]);
        let denominator = poly(&[1.0, 1.0]);
        let quotient = &numerator / &denominator;
        assert_eq!(quotient.eval(3.0), 2.0);
        assert!(quotient.eval(-1.0).is_nan());
    }

    #[test]
    fn test_derive() {
        assert_eq!(poly(&[1.0, 0.0, 2.0, 3.0]).derive(), poly(&[0.0, 4.0, 9.0]));
        assert!(poly(&[7.0]).derive().is_zero());
        assert!(Polynomial::zero().derive().is_zero());
    }

    #[test]
    fn test_integrate() {
        let p = poly(&[3.0, 4.0, 3.0]);
        let integral = p.integrate();
        assert_eq!(integral.terms(), &[0.0, 3.0, 2.0, 1.0]);
        assert_eq!(integral.integration_constant(), Some(IntegrationConstant));
        assert_eq!(integral.to_string(), "x^3 + 2x^2 + 3x + C");
    }

    #[test]
    fn test_derive_integrate_roundtrip() {
        for terms in [
            vec![],
            vec![5.0],
            vec![1.0, -2.0, 0.5],
            vec![0.0, 0.0, 0.0, 4.0, -8.0],
        ] {
            let p = Polynomial::from_ascending(terms);
            assert_eq!(p.integrate().derive(), p);
        }
    }

    #[test]
    fn test_marker_ignored_by_equality_and_arithmetic() {
        let p = poly(&[0.0, 2.0]);
        let integral = poly(&[4.0]).integrate();
        assert_eq!(integral, p.scale(2.0));
        let sum = &integral + &p;
        assert_eq!(sum.integration_constant(), None);
        assert_eq!(sum.to_string(), "6x");
    }

    #[test]
    fn test_integrate_between() {
        let p = poly(&[1.0, 0.0, 3.0]);
        assert_eq!(p.integrate_between(0.0, 2.0), 2.0 + 8.0);
        assert_eq!(p.integrate_between(2.0, 0.0), -10.0);
        assert_eq!(p.integrate_between(1.5, 1.5), 0.0);
    }

    #[test]
    fn test_numeric_agrees_with_closed_form() {
        let p = poly(&[1.0, -2.0, 0.5]);
        let exact = p.integrate_between(-1.0, 3.0);
        let approx = p
            .integrate_numeric(-1.0, 3.0, &NumericOptions::default())
            .unwrap();
        assert!((exact - approx).abs() < 1e-3);
    }

    #[test]
    fn test_negation() {
        assert_eq!(-poly(&[1.0, -2.0]), poly(&[-1.0, 2.0]));
    }

    #[test]
    fn test_ordering() {
        assert!(poly(&[0.0, 0.0, 1.0]) > poly(&[9.0, 9.0]));
        assert!(poly(&[0.0, 2.0]) > poly(&[5.0, 1.0]));
        assert!(poly(&[1.0, 2.0]) < poly(&[2.0, 2.0]));
    }

    #[test]
    fn test_display() {
        assert_eq!(poly(&[1.0, 0.0, 2.0, 3.0]).to_string(), "3x^3 + 2x^2 + 1");
        assert_eq!(format!("{:.1}", poly(&[0.26, -1.5])), "- 1.5x + 0.3");
        assert_eq!(poly(&[0.5, 1.0]).to_string_with(2), "x + 0.50");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }
}
