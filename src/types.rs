use std::sync::Arc;

/// Type alias for a single-variable real function held by an `Equation`.
///
/// This represents a function that:
/// - Takes a single f64 argument
/// - Returns a single f64 result
/// - Is both Send and Sync for thread safety
pub type RealFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Type alias for a JIT-compiled coefficient sequence.
///
/// Same shape as [`RealFn`], but backed by native code emitted by Cranelift.
pub type JITFunction = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
