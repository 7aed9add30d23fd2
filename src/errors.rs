//! Error types for the polyeq crate.
//!
//! This module defines the failure modes of the equation engine. The main error types are:
//!
//! - `EquationError`: High-level errors when working with functions and equations
//! - `BuilderError`: Errors during JIT compilation with Cranelift
//!
//! Arithmetic edge cases such as a zero slope in `Linear::root` are deliberately not
//! errors; they follow IEEE-754 infinity/NaN propagation.

use cranelift_codegen::CodegenError;
use cranelift_module::ModuleError;
use evalexpr::{DefaultNumericTypes, EvalexprError};
use thiserror::Error;

/// Errors that can occur during JIT compilation of coefficient sequences.
///
/// This enum represents the failure modes in the process of lowering a polynomial
/// into machine code using Cranelift as the JIT compiler backend.
#[derive(Error, Debug)]
pub enum BuilderError {
    /// Error when the target machine architecture is not supported
    #[error("host machine is not supported: {0}")]
    HostMachineNotSupported(String),
    /// Error when a Cranelift setting could not be applied
    #[error("invalid compiler setting: {0}")]
    Settings(String),
    /// Error during Cranelift code generation
    #[error("codegen error: {0}")]
    CodegenError(CodegenError),
    /// Error in the Cranelift JIT module
    #[error("module error: {0}")]
    ModuleError(ModuleError),
    /// Error when defining the JIT function
    #[error("function error: {0}")]
    FunctionError(String),
    /// Error when declaring the JIT function
    #[error("declaration error: {0}")]
    DeclarationError(String),
}

/// High-level errors that can occur when working with real functions.
///
/// Every failure is synchronous and surfaced to the caller immediately; nothing in
/// the crate retries or falls back to a default.
#[derive(Debug, Error)]
pub enum EquationError {
    /// Error when a numeric integration method selector is not recognised
    #[error("Invalid integration method: {0}")]
    InvalidMethod(String),
    /// Error when the numeric step size is zero, negative or not finite
    #[error("Invalid step size: {0} (must be finite and positive)")]
    InvalidEpsilon(f64),
    /// Error when an integration bound is infinite or NaN
    #[error("Invalid integration bound: {0} (must be finite)")]
    InvalidBound(f64),
    /// Error when a narrowing conversion would drop non-zero high-degree terms
    #[error("Cannot convert {from} of order {order} into {to} (maximum order {max})")]
    OrderExceeded {
        from: &'static str,
        to: &'static str,
        order: usize,
        max: usize,
    },
    /// Error when a closed-form operation is requested of an opaque function
    #[error("Operation requires a symbolic function: {0}")]
    NotSymbolic(String),
    /// Error when a parsed expression references variables other than `x`
    #[error("Variable not found in equation: {0}")]
    VariableNotFound(String),
    /// Error when parsing an expression string with evalexpr
    #[error("Failed to parse expression")]
    Parse(#[from] EvalexprError<DefaultNumericTypes>),
    /// Error when JIT compiling a coefficient sequence
    #[error("Failed to build JIT function")]
    Build(#[from] BuilderError),
}
