//! Exact polynomial algebra and numeric calculus for single-variable real functions.
//!
//! This crate represents real functions of one variable in four shapes: [`Linear`],
//! [`Quadratic`], dense [`Polynomial`]s and opaque [`Equation`]s (arbitrary closures, or
//! expressions parsed with [evalexpr](https://github.com/ISibboI/evalexpr)). The
//! [`Function`] enum unifies them and dispatches arithmetic with automatic promotion.
//!
//! # Features
//!
//! - Exact addition, subtraction, multiplication and calculus on polynomial shapes
//! - Closed-form roots for linear and quadratic functions
//! - Forward-difference derivatives and four numeric integration methods for opaque
//!   equations
//! - Canonical formatting, e.g. `3x^2 - x + 1`, with `+ C` after indefinite integration
//! - JIT compilation of polynomials through
//!   [Cranelift](https://github.com/bytecodealliance/wasmtime/tree/main/cranelift)
//! - Parallel batch evaluation over `Vec`, arrays, and optionally ndarray/nalgebra vectors
//!
//! # Example
//!
//! ```rust
//! use polyeq::{Equation, Function, Linear, Polynomial, Quadratic};
//!
//! let q = Quadratic::new(1.0, -3.0, 2.0);
//! assert_eq!(q.real_roots(), vec![2.0, 1.0]);
//!
//! let p = Polynomial::from_descending(vec![3.0, -1.0, 1.0]);
//! assert_eq!(p.to_string(), "3x^2 - x + 1");
//!
//! let sum = Function::from(Linear::new(1.0, 0.0)) + Function::from(q);
//! assert_eq!(sum.to_string(), "x^2 - 2x + 2");
//!
//! let sine = Equation::parse("math::sin(x)").unwrap();
//! let area = sine.integrate(0.0, std::f64::consts::PI).unwrap();
//! assert!((area - 2.0).abs() < 1e-3);
//! ```

pub use equation::Equation;
pub use errors::{BuilderError, EquationError};
pub use function::{Function, RealFunction};
pub use linear::Linear;
pub use numeric::{IntegrationMethod, NumericOptions};
pub use polynomial::{IntegrationConstant, Polynomial, TermOrder};
pub use quadratic::Quadratic;

pub mod prelude {
    pub use crate::backends::vector::Vector;
    pub use crate::builder::compile_terms;
    pub use crate::equation::Equation;
    pub use crate::function::{Function, RealFunction};
    pub use crate::linear::Linear;
    pub use crate::numeric::{IntegrationMethod, NumericOptions};
    pub use crate::polynomial::{Polynomial, TermOrder};
    pub use crate::quadratic::Quadratic;
}

/// Container types accepted by batch evaluation
pub mod backends {
    pub mod vector;
}
/// JIT compilation of polynomials using Cranelift
pub mod builder;
/// Opaque equations backed by closures or parsed expressions
pub mod equation;
/// Error types for the various failure modes
pub mod errors;
/// Canonical term formatting
pub mod format;
/// The unified function algebra, conversions and cross-type comparisons
pub mod function;
/// Linear functions
pub mod linear;
/// Numeric differentiation and integration
pub mod numeric;
/// Dense polynomials
pub mod polynomial;
/// Quadratic functions
pub mod quadratic;
/// Type aliases for shared callables
pub mod types;
