//! The unified real-function algebra.
//!
//! This module ties the four function shapes together:
//!
//! - `RealFunction`: the common "evaluable real function" capability
//! - `Function`: a closed tagged union over `Linear`, `Quadratic`, `Polynomial` and
//!   opaque `Equation`s, with operators dispatched by exhaustive pattern matching
//! - Widening conversions (`From`) and fallible narrowing conversions (`TryFrom`)
//! - Cross-type equality and ordering that compare the trimmed coefficient sequence,
//!   so `Linear(2, 3) == Quadratic(0, 2, 3) == Polynomial([3, 2])`
//!
//! # Promotion
//!
//! Addition and subtraction return the wider of the two exact shapes. Multiplication
//! returns the narrowest shape that can hold the product: `Linear * Linear` is a
//! `Quadratic`, every other product of exact shapes is a `Polynomial`. Division, and
//! any operation involving an opaque equation, yields an opaque equation.
//!
//! # Example
//!
//! ```
//! use polyeq::{Function, Linear, Quadratic, Polynomial};
//!
//! let line = Function::from(Linear::new(1.0, 1.0));
//! let square = line.clone() * line.clone();
//! assert!(matches!(square, Function::Quadratic(_)));
//! assert_eq!(square, Function::from(Polynomial::from_ascending(vec![1.0, 2.0, 1.0])));
//!
//! let sum = square + Function::from(Quadratic::new(1.0, 0.0, 0.0));
//! assert_eq!(sum.to_string(), "2x^2 + 2x + 1");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use log::debug;
use rayon::prelude::*;

use crate::backends::vector::Vector;
use crate::equation::Equation;
use crate::errors::EquationError;
use crate::linear::Linear;
use crate::numeric::NumericOptions;
use crate::polynomial::{compare_terms, Polynomial};
use crate::quadratic::Quadratic;

/// A single-variable real function that can be evaluated pointwise.
pub trait RealFunction {
    /// Evaluates the function at `x`.
    fn eval(&self, x: f64) -> f64;
}

impl RealFunction for Linear {
    fn eval(&self, x: f64) -> f64 {
        Linear::eval(self, x)
    }
}

impl RealFunction for Quadratic {
    fn eval(&self, x: f64) -> f64 {
        Quadratic::eval(self, x)
    }
}

impl RealFunction for Polynomial {
    fn eval(&self, x: f64) -> f64 {
        Polynomial::eval(self, x)
    }
}

impl RealFunction for Equation {
    fn eval(&self, x: f64) -> f64 {
        Equation::eval(self, x)
    }
}

impl RealFunction for Function {
    fn eval(&self, x: f64) -> f64 {
        Function::eval(self, x)
    }
}

/// Any representable single-variable real function.
#[derive(Debug, Clone)]
pub enum Function {
    /// `m*x + b`
    Linear(Linear),
    /// `a*x^2 + b*x + c`
    Quadratic(Quadratic),
    /// Dense polynomial of arbitrary degree
    Polynomial(Polynomial),
    /// Opaque callable without a closed form
    Opaque(Equation),
}

use Function as F;

impl Function {
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            F::Linear(line) => line.eval(x),
            F::Quadratic(quadratic) => quadratic.eval(x),
            F::Polynomial(polynomial) => polynomial.eval(x),
            F::Opaque(equation) => equation.eval(x),
        }
    }

    /// Evaluates the function at every input in parallel.
    ///
    /// # Example
    /// ```
    /// # use polyeq::{Function, Linear};
    /// let f = Function::from(Linear::new(2.0, 1.0));
    /// assert_eq!(f.eval_batch(&vec![0.0, 1.0, 2.0]), vec![1.0, 3.0, 5.0]);
    /// ```
    pub fn eval_batch<V: Vector>(&self, xs: &V) -> V {
        let input = xs.as_slice();
        let mut out = V::zeros(xs.len());
        out.as_mut_slice()
            .par_iter_mut()
            .zip(input[..].par_iter())
            .for_each(|(y, &x)| *y = self.eval(x));
        out
    }

    /// Returns true unless the function is opaque.
    pub fn is_symbolic(&self) -> bool {
        !matches!(self, F::Opaque(_))
    }

    /// True degree of the function, ignoring zero leading coefficients.
    ///
    /// Returns `None` for opaque equations.
    pub fn order(&self) -> Option<usize> {
        match self {
            F::Linear(line) => Some(true_order(&line.terms())),
            F::Quadratic(quadratic) => Some(true_order(&quadratic.terms())),
            F::Polynomial(polynomial) => Some(polynomial.order()),
            F::Opaque(_) => None,
        }
    }

    /// Widens an exact function into a polynomial; `None` for opaque equations.
    pub fn to_polynomial(&self) -> Option<Polynomial> {
        match self {
            F::Linear(line) => Some(Polynomial::from(*line)),
            F::Quadratic(quadratic) => Some(Polynomial::from(*quadratic)),
            F::Polynomial(polynomial) => Some(polynomial.clone()),
            F::Opaque(_) => None,
        }
    }

    /// Lifts the function into an opaque equation.
    pub fn into_equation(self) -> Equation {
        match self {
            F::Linear(line) => Equation::from(line),
            F::Quadratic(quadratic) => Equation::from(quadratic),
            F::Polynomial(polynomial) => Equation::from(polynomial),
            F::Opaque(equation) => equation,
        }
    }

    /// Differentiates the function.
    ///
    /// Exact shapes are differentiated in closed form, except `Linear`, whose constant
    /// derivative comes back as an opaque equation. Opaque equations use a forward
    /// difference with the default step size.
    pub fn derive(&self) -> Function {
        match self {
            F::Linear(line) => F::Opaque(line.derive()),
            F::Quadratic(quadratic) => F::Linear(quadratic.derive()),
            F::Polynomial(polynomial) => F::Polynomial(polynomial.derive()),
            F::Opaque(equation) => F::Opaque(equation.derive()),
        }
    }

    /// Computes the indefinite integral of an exact function.
    ///
    /// # Errors
    /// Returns `EquationError::NotSymbolic` for opaque equations.
    pub fn integrate(&self) -> Result<Function, EquationError> {
        match self {
            F::Linear(line) => Ok(F::Quadratic(line.integrate())),
            F::Quadratic(quadratic) => Ok(F::Polynomial(quadratic.integrate())),
            F::Polynomial(polynomial) => Ok(F::Polynomial(polynomial.integrate())),
            F::Opaque(equation) => Err(EquationError::NotSymbolic(format!(
                "indefinite integral of {equation}"
            ))),
        }
    }

    /// Computes the definite integral from `lower` to `upper`.
    ///
    /// Closed form for exact shapes; opaque equations use the default numeric options.
    pub fn integrate_between(&self, lower: f64, upper: f64) -> Result<f64, EquationError> {
        self.integrate_with(lower, upper, &NumericOptions::default())
    }

    /// Computes the definite integral from `lower` to `upper`.
    ///
    /// `options` only applies to opaque equations; exact shapes are always integrated
    /// in closed form.
    pub fn integrate_with(
        &self,
        lower: f64,
        upper: f64,
        options: &NumericOptions,
    ) -> Result<f64, EquationError> {
        match self {
            F::Linear(line) => Ok(line.integrate_between(lower, upper)),
            F::Quadratic(quadratic) => Ok(quadratic.integrate_between(lower, upper)),
            F::Polynomial(polynomial) => Ok(polynomial.integrate_between(lower, upper)),
            F::Opaque(equation) => equation.integrate_with(lower, upper, options),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            F::Linear(line) => fmt::Display::fmt(line, f),
            F::Quadratic(quadratic) => fmt::Display::fmt(quadratic, f),
            F::Polynomial(polynomial) => fmt::Display::fmt(polynomial, f),
            F::Opaque(equation) => fmt::Display::fmt(equation, f),
        }
    }
}

/// Strips trailing zero coefficients without allocating.
fn trimmed(terms: &[f64]) -> &[f64] {
    let end = terms.iter().rposition(|c| *c != 0.0).map_or(0, |i| i + 1);
    &terms[..end]
}

fn true_order(terms: &[f64]) -> usize {
    trimmed(terms).len().saturating_sub(1)
}

fn check_order(
    order: usize,
    from: &'static str,
    to: &'static str,
    max: usize,
) -> Result<(), EquationError> {
    if order > max {
        debug!("refusing to narrow {from} of order {order} into {to}");
        return Err(EquationError::OrderExceeded {
            from,
            to,
            order,
            max,
        });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
//  Widening
// ────────────────────────────────────────────────────────────────────────────

impl From<Linear> for Polynomial {
    fn from(line: Linear) -> Self {
        line.to_polynomial()
    }
}

impl From<Quadratic> for Polynomial {
    fn from(quadratic: Quadratic) -> Self {
        let polynomial = quadratic.to_polynomial();
        match quadratic.integration_constant() {
            Some(_) => polynomial.with_constant(),
            None => polynomial,
        }
    }
}

impl From<Linear> for Function {
    fn from(line: Linear) -> Self {
        F::Linear(line)
    }
}

impl From<Quadratic> for Function {
    fn from(quadratic: Quadratic) -> Self {
        F::Quadratic(quadratic)
    }
}

impl From<Polynomial> for Function {
    fn from(polynomial: Polynomial) -> Self {
        F::Polynomial(polynomial)
    }
}

impl From<Equation> for Function {
    fn from(equation: Equation) -> Self {
        F::Opaque(equation)
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Narrowing
// ────────────────────────────────────────────────────────────────────────────

impl TryFrom<&Polynomial> for Quadratic {
    type Error = EquationError;

    fn try_from(polynomial: &Polynomial) -> Result<Self, Self::Error> {
        check_order(polynomial.order(), "Polynomial", "Quadratic", 2)?;
        let quadratic = Quadratic::new(
            polynomial.coefficient(2),
            polynomial.coefficient(1),
            polynomial.coefficient(0),
        );
        Ok(match polynomial.integration_constant() {
            Some(_) => quadratic.with_integration_constant(),
            None => quadratic,
        })
    }
}

impl TryFrom<Polynomial> for Quadratic {
    type Error = EquationError;

    fn try_from(polynomial: Polynomial) -> Result<Self, Self::Error> {
        Quadratic::try_from(&polynomial)
    }
}

impl TryFrom<&Polynomial> for Linear {
    type Error = EquationError;

    fn try_from(polynomial: &Polynomial) -> Result<Self, Self::Error> {
        check_order(polynomial.order(), "Polynomial", "Linear", 1)?;
        Ok(Linear::new(polynomial.coefficient(1), polynomial.coefficient(0)))
    }
}

impl TryFrom<Polynomial> for Linear {
    type Error = EquationError;

    fn try_from(polynomial: Polynomial) -> Result<Self, Self::Error> {
        Linear::try_from(&polynomial)
    }
}

impl TryFrom<Quadratic> for Linear {
    type Error = EquationError;

    fn try_from(quadratic: Quadratic) -> Result<Self, Self::Error> {
        check_order(true_order(&quadratic.terms()), "Quadratic", "Linear", 1)?;
        Ok(Linear::new(quadratic.b(), quadratic.c()))
    }
}

impl TryFrom<Function> for Polynomial {
    type Error = EquationError;

    fn try_from(function: Function) -> Result<Self, Self::Error> {
        match function {
            F::Opaque(equation) => Err(EquationError::NotSymbolic(format!(
                "conversion of {equation} into Polynomial"
            ))),
            F::Linear(line) => Ok(Polynomial::from(line)),
            F::Quadratic(quadratic) => Ok(Polynomial::from(quadratic)),
            F::Polynomial(polynomial) => Ok(polynomial),
        }
    }
}

impl TryFrom<Function> for Quadratic {
    type Error = EquationError;

    fn try_from(function: Function) -> Result<Self, Self::Error> {
        match function {
            F::Linear(line) => Ok(Quadratic::from(line)),
            F::Quadratic(quadratic) => Ok(quadratic),
            F::Polynomial(polynomial) => Quadratic::try_from(&polynomial),
            F::Opaque(equation) => Err(EquationError::NotSymbolic(format!(
                "conversion of {equation} into Quadratic"
            ))),
        }
    }
}

impl TryFrom<Function> for Linear {
    type Error = EquationError;

    fn try_from(function: Function) -> Result<Self, Self::Error> {
        match function {
            F::Linear(line) => Ok(line),
            F::Quadratic(quadratic) => Linear::try_from(quadratic),
            F::Polynomial(polynomial) => Linear::try_from(&polynomial),
            F::Opaque(equation) => Err(EquationError::NotSymbolic(format!(
                "conversion of {equation} into Linear"
            ))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Equality and ordering
// ────────────────────────────────────────────────────────────────────────────

macro_rules! impl_cross_cmp {
    ($($lhs:ty, $rhs:ty);* $(;)?) => {
        $(
            impl PartialEq<$rhs> for $lhs {
                fn eq(&self, other: &$rhs) -> bool {
                    trimmed(&self.terms()) == trimmed(&other.terms())
                }
            }

            impl PartialOrd<$rhs> for $lhs {
                fn partial_cmp(&self, other: &$rhs) -> Option<Ordering> {
                    compare_terms(trimmed(&self.terms()), trimmed(&other.terms()))
                }
            }
        )*
    };
}

impl_cross_cmp! {
    Linear, Quadratic;
    Quadratic, Linear;
    Linear, Polynomial;
    Polynomial, Linear;
    Quadratic, Polynomial;
    Polynomial, Quadratic;
}

impl PartialOrd for Linear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare_terms(trimmed(&self.terms()), trimmed(&other.terms()))
    }
}

impl PartialOrd for Quadratic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare_terms(trimmed(&self.terms()), trimmed(&other.terms()))
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (F::Opaque(a), F::Opaque(b)) => a.ptr_eq(b),
            (F::Opaque(_), _) | (_, F::Opaque(_)) => false,
            (a, b) => a.to_polynomial() == b.to_polynomial(),
        }
    }
}

impl PartialOrd for Function {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (F::Opaque(a), F::Opaque(b)) if a.ptr_eq(b) => Some(Ordering::Equal),
            (F::Opaque(_), _) | (_, F::Opaque(_)) => None,
            (a, b) => compare_terms(a.to_polynomial()?.terms(), b.to_polynomial()?.terms()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Arithmetic
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Additive {
    Add,
    Sub,
}

impl Additive {
    fn apply<T>(self, a: T, b: T) -> T
    where
        T: Add<Output = T> + Sub<Output = T>,
    {
        match self {
            Additive::Add => a + b,
            Additive::Sub => a - b,
        }
    }
}

fn additive(lhs: Function, rhs: Function, op: Additive) -> Function {
    match (lhs, rhs) {
        (F::Linear(a), F::Linear(b)) => F::Linear(op.apply(a, b)),
        (F::Linear(a), F::Quadratic(b)) => F::Quadratic(op.apply(a.into(), b)),
        (F::Quadratic(a), F::Linear(b)) => F::Quadratic(op.apply(a, b.into())),
        (F::Quadratic(a), F::Quadratic(b)) => F::Quadratic(op.apply(a, b)),
        (F::Linear(a), F::Polynomial(b)) => F::Polynomial(op.apply(a.into(), b)),
        (F::Quadratic(a), F::Polynomial(b)) => F::Polynomial(op.apply(a.into(), b)),
        (F::Polynomial(a), F::Linear(b)) => F::Polynomial(op.apply(a, b.into())),
        (F::Polynomial(a), F::Quadratic(b)) => F::Polynomial(op.apply(a, b.into())),
        (F::Polynomial(a), F::Polynomial(b)) => F::Polynomial(op.apply(a, b)),
        (a @ F::Opaque(_), b) | (a, b @ F::Opaque(_)) => {
            F::Opaque(op.apply(a.into_equation(), b.into_equation()))
        }
    }
}

fn multiply(lhs: Function, rhs: Function) -> Function {
    match (lhs, rhs) {
        (F::Linear(a), F::Linear(b)) => F::Quadratic(a * b),
        (F::Quadratic(a), F::Quadratic(b)) => F::Polynomial(a * b),
        (F::Linear(a), F::Quadratic(b)) => {
            F::Polynomial(Polynomial::from(a) * Polynomial::from(b))
        }
        (F::Quadratic(a), F::Linear(b)) => {
            F::Polynomial(Polynomial::from(a) * Polynomial::from(b))
        }
        (F::Linear(a), F::Polynomial(b)) => F::Polynomial(Polynomial::from(a) * b),
        (F::Quadratic(a), F::Polynomial(b)) => F::Polynomial(Polynomial::from(a) * b),
        (F::Polynomial(a), F::Linear(b)) => F::Polynomial(a * Polynomial::from(b)),
        (F::Polynomial(a), F::Quadratic(b)) => F::Polynomial(a * Polynomial::from(b)),
        (F::Polynomial(a), F::Polynomial(b)) => F::Polynomial(a * b),
        (a @ F::Opaque(_), b) | (a, b @ F::Opaque(_)) => {
            F::Opaque(a.into_equation() * b.into_equation())
        }
    }
}

impl Add for Function {
    type Output = Function;

    fn add(self, rhs: Function) -> Function {
        additive(self, rhs, Additive::Add)
    }
}

impl Sub for Function {
    type Output = Function;

    fn sub(self, rhs: Function) -> Function {
        additive(self, rhs, Additive::Sub)
    }
}

impl Mul for Function {
    type Output = Function;

    fn mul(self, rhs: Function) -> Function {
        multiply(self, rhs)
    }
}

impl Div for Function {
    type Output = Function;

    fn div(self, rhs: Function) -> Function {
        F::Opaque(self.into_equation() / rhs.into_equation())
    }
}

impl Neg for Function {
    type Output = Function;

    fn neg(self) -> Function {
        match self {
            F::Linear(line) => F::Linear(-line),
            F::Quadratic(quadratic) => F::Quadratic(-quadratic),
            F::Polynomial(polynomial) => F::Polynomial(-polynomial),
            F::Opaque(equation) => F::Opaque(-equation),
        }
    }
}

macro_rules! forward_ref_ops {
    ($($trait:ident, $method:ident);* $(;)?) => {
        $(
            impl $trait<&Function> for &Function {
                type Output = Function;

                fn $method(self, rhs: &Function) -> Function {
                    $trait::$method(self.clone(), rhs.clone())
                }
            }
        )*
    };
}

forward_ref_ops! {
    Add, add;
    Sub, sub;
    Mul, mul;
    Div, div;
}

impl Add<f64> for Function {
    type Output = Function;

    fn add(self, rhs: f64) -> Function {
        self + F::Linear(Linear::constant(rhs))
    }
}

impl Sub<f64> for Function {
    type Output = Function;

    fn sub(self, rhs: f64) -> Function {
        self - F::Linear(Linear::constant(rhs))
    }
}

impl Mul<f64> for Function {
    type Output = Function;

    /// Scales the function without changing its shape.
    fn mul(self, rhs: f64) -> Function {
        match self {
            F::Linear(line) => F::Linear(Linear::new(line.m * rhs, line.b * rhs)),
            F::Quadratic(q) => {
                F::Quadratic(Quadratic::new(q.a() * rhs, q.b() * rhs, q.c() * rhs))
            }
            F::Polynomial(polynomial) => F::Polynomial(polynomial.scale(rhs)),
            F::Opaque(equation) => F::Opaque(equation * rhs),
        }
    }
}

impl Div<f64> for Function {
    type Output = Function;

    fn div(self, rhs: f64) -> Function {
        self / F::Opaque(Equation::constant(rhs))
    }
}
