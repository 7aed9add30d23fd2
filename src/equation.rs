//! Opaque real functions with numeric calculus.
//!
//! This module provides the `Equation` type, which wraps any `f64 -> f64` callable.
//! It is the fallback shape of the algebra: whenever an operation has no closed form
//! (division, combining with another opaque function, differentiating a `Linear`),
//! the result is an `Equation` that evaluates its operands pointwise.
//!
//! # Features
//!
//! - Pointwise `+`, `-`, `*`, `/` with other equations or constants, and negation
//! - Forward-difference differentiation with a configurable step size
//! - Left, middle and right Riemann sums and the trapezoid rule
//! - Parsing of expressions in the single variable `x` using evalexpr
//!
//! # Example
//!
//! ```
//! use polyeq::Equation;
//!
//! let f = Equation::parse("x^2 + 1").unwrap();
//! let g = Equation::new(|x| 2.0 * x);
//! let h = f.clone() * g; // (x^2 + 1) * 2x
//! assert_eq!(h.eval(2.0), 20.0);
//!
//! let area = f.integrate(0.0, 3.0).unwrap(); // 9 + 3
//! assert!((area - 12.0).abs() < 1e-3);
//! ```
//!
//! Composition never simplifies: `f - f` is still evaluated as two calls and a
//! subtraction.

use std::sync::Arc;

use colored::Colorize;
use evalexpr::{
    build_operator_tree, ContextWithMutableVariables, DefaultNumericTypes, HashMapContext, Value,
};
use itertools::Itertools;

use crate::errors::EquationError;
use crate::function::RealFunction;
use crate::linear::Linear;
use crate::numeric::{self, NumericOptions, DEFAULT_EPSILON};
use crate::polynomial::Polynomial;
use crate::quadratic::Quadratic;
use crate::types::RealFn;

/// Name of the free variable in parsed expressions.
pub const VARIABLE: &str = "x";

/// An opaque single-variable real function.
///
/// The callable is shared behind an `Arc` and never mutated, so cloning is cheap
/// and composed equations can capture their operands by value.
#[derive(Clone)]
pub struct Equation {
    description: String,
    fun: RealFn,
}

impl std::fmt::Debug for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "    {}: {}", "Equation".cyan(), self.description)?;
        writeln!(f, "    {}: {}", "Kind".cyan(), "opaque")?;
        write!(f, "}}")
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

impl Equation {
    /// Wraps a callable.
    ///
    /// # Example
    /// ```
    /// # use polyeq::Equation;
    /// let wave = Equation::new(f64::sin);
    /// assert_eq!(wave.eval(0.0), 0.0);
    /// ```
    pub fn new<F>(fun: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(fun), "f(x)".to_string())
    }

    /// Wraps a callable under a human-readable name used by `Display`.
    pub fn named<F>(description: impl Into<String>, fun: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(fun), description.into())
    }

    pub(crate) fn from_parts(fun: RealFn, description: String) -> Self {
        Self { description, fun }
    }

    /// The constant function `c`.
    pub fn constant(c: f64) -> Self {
        Self::named(c.to_string(), move |_| c)
    }

    /// The identity function `x`.
    pub fn identity() -> Self {
        Self::named(VARIABLE, |x| x)
    }

    /// Lifts any evaluable function into an opaque equation, keeping its `Display` form.
    ///
    /// # Example
    /// ```
    /// # use polyeq::{Equation, Quadratic};
    /// let eq = Equation::from_function(Quadratic::new(1.0, 0.0, -4.0));
    /// assert_eq!(eq.to_string(), "x^2 - 4");
    /// assert_eq!(eq.eval(2.0), 0.0);
    /// ```
    pub fn from_function<F>(function: F) -> Self
    where
        F: RealFunction + std::fmt::Display + Send + Sync + 'static,
    {
        Self::named(function.to_string(), move |x| function.eval(x))
    }

    /// Parses an expression in the single variable `x`.
    ///
    /// Any syntax accepted by evalexpr is allowed, including its builtin functions
    /// such as `math::sin`. An evaluation error at a given point (for example a
    /// value of the wrong type) evaluates to NaN.
    ///
    /// # Errors
    /// Returns `EquationError::Parse` if the string is not a valid expression and
    /// `EquationError::VariableNotFound` if it references variables other than `x`.
    pub fn parse(expression: &str) -> Result<Self, EquationError> {
        let node = build_operator_tree::<DefaultNumericTypes>(expression)?;

        let unknown: Vec<&str> = node
            .iter_variable_identifiers()
            .filter(|name| *name != VARIABLE)
            .unique()
            .sorted()
            .collect();
        if !unknown.is_empty() {
            return Err(EquationError::VariableNotFound(unknown.join(", ")));
        }

        let fun = move |x: f64| {
            let mut context = HashMapContext::<DefaultNumericTypes>::new();
            if context
                .set_value(VARIABLE.to_string(), Value::Float(x))
                .is_err()
            {
                return f64::NAN;
            }
            node.eval_number_with_context(&context).unwrap_or(f64::NAN)
        };

        Ok(Self::named(expression.trim(), fun))
    }

    /// Evaluates the function at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        (self.fun)(x)
    }

    /// Returns the wrapped callable.
    pub fn fun(&self) -> &RealFn {
        &self.fun
    }

    /// Human-readable name of the equation, as written by `Display`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if both equations share the same underlying callable.
    pub fn ptr_eq(&self, other: &Equation) -> bool {
        Arc::ptr_eq(&self.fun, &other.fun)
    }

    /// Forward-difference derivative with the default step size.
    pub fn derive(&self) -> Equation {
        self.derive_with(DEFAULT_EPSILON)
    }

    /// Forward-difference derivative `(f(x + eps) - f(x)) / eps`.
    ///
    /// The step size is not validated; a zero step yields NaN everywhere.
    pub fn derive_with(&self, epsilon: f64) -> Equation {
        let fun = Arc::clone(&self.fun);
        Self::named(format!("d/dx {}", self.description), move |x| {
            numeric::forward_difference(&*fun, x, epsilon)
        })
    }

    /// Integrates from `lower` to `upper` with the default step size and method.
    pub fn integrate(&self, lower: f64, upper: f64) -> Result<f64, EquationError> {
        self.integrate_with(lower, upper, &NumericOptions::default())
    }

    /// Integrates from `lower` to `upper`.
    ///
    /// # Arguments
    /// * `lower` - Lower bound; may exceed `upper`, which negates the result
    /// * `upper` - Upper bound
    /// * `options` - Step size and sampling method
    ///
    /// # Errors
    /// Returns `EquationError::InvalidEpsilon` if the step size is not finite and positive,
    /// and `EquationError::InvalidBound` if either bound is infinite or NaN.
    pub fn integrate_with(
        &self,
        lower: f64,
        upper: f64,
        options: &NumericOptions,
    ) -> Result<f64, EquationError> {
        numeric::integrate(&*self.fun, lower, upper, options)
    }

    fn combine(self, rhs: Equation, symbol: &str, op: fn(f64, f64) -> f64) -> Equation {
        let description = format!("({} {symbol} {})", self.description, rhs.description);
        let (lhs, rhs) = (self.fun, rhs.fun);
        Self::named(description, move |x| op(lhs(x), rhs(x)))
    }
}

impl From<Polynomial> for Equation {
    fn from(polynomial: Polynomial) -> Self {
        Self::named(polynomial.to_string(), move |x| polynomial.eval(x))
    }
}

impl From<Quadratic> for Equation {
    fn from(quadratic: Quadratic) -> Self {
        Self::named(quadratic.to_string(), move |x| quadratic.eval(x))
    }
}

impl From<Linear> for Equation {
    fn from(line: Linear) -> Self {
        Self::named(line.to_string(), move |x| line.eval(x))
    }
}

macro_rules! impl_pointwise_ops {
    ($($trait:ident, $method:ident, $symbol:literal);* $(;)?) => {
        $(
            impl std::ops::$trait for Equation {
                type Output = Equation;

                fn $method(self, rhs: Equation) -> Equation {
                    self.combine(rhs, $symbol, |a, b| std::ops::$trait::$method(a, b))
                }
            }

            impl std::ops::$trait<&Equation> for &Equation {
                type Output = Equation;

                fn $method(self, rhs: &Equation) -> Equation {
                    std::ops::$trait::$method(self.clone(), rhs.clone())
                }
            }

            impl std::ops::$trait<f64> for Equation {
                type Output = Equation;

                fn $method(self, rhs: f64) -> Equation {
                    std::ops::$trait::$method(self, Equation::constant(rhs))
                }
            }
        )*
    };
}

impl_pointwise_ops! {
    Add, add, "+";
    Sub, sub, "-";
    Mul, mul, "*";
    Div, div, "/";
}

impl std::ops::Neg for Equation {
    type Output = Equation;

    fn neg(self) -> Equation {
        let fun = self.fun;
        Self::named(format!("-{}", self.description), move |x| -fun(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::IntegrationMethod;

    #[test]
    fn test_wrap_and_eval() {
        let eq = Equation::new(|x| 3.0 * x - 1.0);
        assert_eq!(eq.eval(2.0), 5.0);
        assert_eq!(Equation::constant(4.5).eval(-100.0), 4.5);
        assert_eq!(Equation::identity().eval(7.0), 7.0);
    }

    #[test]
    fn test_pointwise_arithmetic() {
        let f = Equation::new(|x| x * x);
        let g = Equation::new(|x| x + 1.0);
        assert_eq!((&f + &g).eval(2.0), 7.0);
        assert_eq!((&f - &g).eval(2.0), 1.0);
        assert_eq!((&f * &g).eval(2.0), 12.0);
        assert_eq!((&f / &g).eval(2.0), 4.0 / 3.0);
        assert_eq!((-f.clone()).eval(3.0), -9.0);
        assert_eq!((f.clone() + 1.0).eval(3.0), 10.0);
        assert_eq!((f / 2.0).eval(3.0), 4.5);
    }

    #[test]
    fn test_division_by_zero_propagates() {
        let eq = Equation::constant(1.0) / Equation::identity();
        assert_eq!(eq.eval(0.0), f64::INFINITY);
    }

    #[test]
    fn test_derive() {
        let square = Equation::new(|x| x * x);
        let slope = square.derive();
        // forward difference of x^2 is 2x + eps
        assert!((slope.eval(3.0) - 6.001).abs() < 1e-9);

        let fine = square.derive_with(1e-6);
        assert!((fine.eval(3.0) - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_integrate_identity_all_methods() {
        let identity = Equation::identity();
        let eps = 1e-3;
        for method in IntegrationMethod::ALL {
            let options = NumericOptions::new(eps, method);
            let forward = identity.integrate_with(0.0, 2.0, &options).unwrap();
            let backward = identity.integrate_with(2.0, 0.0, &options).unwrap();
            assert!((forward - 2.0).abs() <= 2.0 * eps, "{method}: {forward}");
            assert_eq!(forward, -backward, "{method}");
        }
    }

    #[test]
    fn test_integrate_invalid_epsilon() {
        let options = NumericOptions::default().with_epsilon(0.0);
        assert!(Equation::identity().integrate_with(0.0, 1.0, &options).is_err());
    }

    #[test]
    fn test_integrate_infinite_bound() {
        let eq = Equation::identity();
        assert!(matches!(
            eq.integrate(f64::NEG_INFINITY, 0.0),
            Err(EquationError::InvalidBound(b)) if b == f64::NEG_INFINITY
        ));
    }

    #[test]
    fn test_accessors() {
        let eq = Equation::named("cube", |x| x * x * x);
        assert_eq!(eq.description(), "cube");
        assert_eq!(eq.description(), eq.to_string());
        assert_eq!(Equation::new(f64::exp).description(), "f(x)");

        let fun = Arc::clone(eq.fun());
        assert_eq!(fun(2.0), 8.0);
        assert!(eq.ptr_eq(&Equation::from_parts(fun, "copy".to_string())));
    }

    #[test]
    fn test_parse() {
        let eq = Equation::parse("x^2").unwrap();
        assert_eq!(eq.eval(3.0), 9.0);
        assert_eq!(eq.to_string(), "x^2");

        let eq = Equation::parse("2 * x + 1").unwrap();
        assert_eq!(eq.eval(1.5), 4.0);
    }

    #[test]
    fn test_parse_unknown_variable() {
        match Equation::parse("x + y * z") {
            Err(EquationError::VariableNotFound(names)) => assert_eq!(names, "y, z"),
            other => panic!("expected VariableNotFound, got {other:?}"),
        }
    }

    #[test]
    #[should_panic]
    fn test_parse_invalid() {
        let _ = Equation::parse("2 * x + )").expect("Invalid expression");
    }

    #[test]
    fn test_from_exact_types() {
        let eq = Equation::from(Polynomial::from_ascending(vec![1.0, 0.0, 1.0]));
        assert_eq!(eq.eval(2.0), 5.0);
        assert_eq!(eq.to_string(), "x^2 + 1");
        assert_eq!(Equation::from(Linear::new(2.0, 1.0)).eval(1.0), 3.0);
        assert_eq!(Equation::from(Quadratic::new(1.0, 0.0, 0.0)).eval(-3.0), 9.0);
    }

    #[test]
    fn test_debug_and_display_formatting() {
        let eq = Equation::named("sin", f64::sin) + Equation::constant(1.0);

        let debug_output = format!("{:?}", eq);
        assert!(debug_output.contains("Equation"));
        assert!(debug_output.contains("(sin + 1)"));

        assert_eq!(format!("{}", eq), "(sin + 1)");
    }

    #[test]
    fn test_equation_clone() {
        let eq = Equation::new(|x| x.exp());
        let cloned = eq.clone();
        assert!(eq.ptr_eq(&cloned));
        assert_eq!(eq.eval(1.0), cloned.eval(1.0));
        assert!(!eq.ptr_eq(&Equation::new(|x| x.exp())));
    }
}
