//! This module lowers polynomial coefficient sequences into native code.
//! It uses Cranelift as the backend compiler.
//!
//! The emitted function is straight-line code with the loop over coefficients
//! unrolled at compile time. It performs exactly the multiplications and additions
//! of `Polynomial::eval`, in the same order, so both produce bit-identical results.
//!
//! The main entry point is `compile_terms()`.

use std::sync::Arc;

use crate::{
    errors::{BuilderError, EquationError},
    types::JITFunction,
};
use cranelift::prelude::*;
use cranelift_codegen::Context;
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{Linkage, Module};
use isa::TargetIsa;
use log::debug;

/// Compiles an ascending coefficient sequence into a JIT function of one variable.
///
/// # Arguments
/// * `terms` - Coefficients in ascending order; index `i` multiplies `x^i`
///
/// # Returns
/// A thread-safe function evaluating the polynomial at `x`.
///
/// # Errors
/// Returns an EquationError if Cranelift cannot target the host or fails to
/// emit the function.
pub fn compile_terms(terms: &[f64]) -> Result<JITFunction, EquationError> {
    let isa = create_isa()?;
    let (mut module, mut ctx) = create_module_and_context(isa);
    build_function_body(&mut ctx, terms);
    let raw_fn = compile_and_finalize(&mut module, &mut ctx)?;

    debug!("compiled polynomial with {} terms", terms.len());

    Ok(Arc::new(move |x: f64| raw_fn(x)))
}

fn set_flag(
    builder: &mut settings::Builder,
    name: &str,
    value: &str,
) -> Result<(), BuilderError> {
    builder
        .set(name, value)
        .map_err(|err| BuilderError::Settings(format!("{name}={value}: {err}")))
}

/// Creates an Instruction Set Architecture (ISA) target for code generation.
///
/// # Errors
/// Returns a BuilderError if the host machine architecture is not supported or
/// the code generation flags are rejected.
///
/// Optimizes for speed; the IR verifier only runs in debug builds.
pub(crate) fn create_isa() -> Result<Arc<dyn TargetIsa>, BuilderError> {
    let mut flag_builder = settings::builder();

    let target_triple = target_lexicon::Triple::host();
    let is_x86 = matches!(
        target_triple.architecture,
        target_lexicon::Architecture::X86_64
    );

    if is_x86 {
        set_flag(&mut flag_builder, "use_colocated_libcalls", "true")?;
        set_flag(&mut flag_builder, "is_pic", "true")?;
    } else {
        set_flag(&mut flag_builder, "use_colocated_libcalls", "false")?;
        set_flag(&mut flag_builder, "is_pic", "false")?;
    }

    set_flag(&mut flag_builder, "opt_level", "speed")?;
    #[cfg(debug_assertions)]
    set_flag(&mut flag_builder, "enable_verifier", "true")?;
    #[cfg(not(debug_assertions))]
    set_flag(&mut flag_builder, "enable_verifier", "false")?;

    let isa_builder = cranelift_native::builder()
        .map_err(|msg| BuilderError::HostMachineNotSupported(msg.to_string()))?;

    isa_builder
        .finish(settings::Flags::new(flag_builder))
        .map_err(BuilderError::CodegenError)
}

/// Creates a new JIT module and a function context with the signature
/// `fn(f64) -> f64`.
pub(crate) fn create_module_and_context(isa: Arc<dyn TargetIsa>) -> (JITModule, Context) {
    let builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
    let module = JITModule::new(builder);
    let mut ctx = module.make_context();

    let mut sig = module.make_signature();
    sig.params.push(AbiParam::new(types::F64));
    sig.returns.push(AbiParam::new(types::F64));
    ctx.func.signature = sig;

    (module, ctx)
}

/// Emits `result += c * power; power *= x` for every coefficient.
fn build_function_body(ctx: &mut Context, terms: &[f64]) {
    let mut builder_ctx = FunctionBuilderContext::new();
    let mut func_builder = FunctionBuilder::new(&mut ctx.func, &mut builder_ctx);

    let entry_block = func_builder.create_block();
    func_builder.switch_to_block(entry_block);
    let x = func_builder.append_block_param(entry_block, types::F64);

    let mut result = func_builder.ins().f64const(0.0);
    let mut power = func_builder.ins().f64const(1.0);
    for &coeff in terms {
        let coeff = func_builder.ins().f64const(coeff);
        let term = func_builder.ins().fmul(coeff, power);
        result = func_builder.ins().fadd(result, term);
        power = func_builder.ins().fmul(power, x);
    }
    func_builder.ins().return_(&[result]);

    func_builder.seal_block(entry_block);
    func_builder.finalize();
}

/// Declares, defines and finalizes the function, returning a callable pointer.
///
/// # Errors
/// Returns a BuilderError if declaration, definition or finalization fails.
fn compile_and_finalize(
    module: &mut JITModule,
    ctx: &mut Context,
) -> Result<extern "C" fn(f64) -> f64, BuilderError> {
    let func_id = module
        .declare_function("polynomial", Linkage::Local, &ctx.func.signature)
        .map_err(|msg| BuilderError::DeclarationError(msg.to_string()))?;

    module
        .define_function(func_id, ctx)
        .map_err(|msg| BuilderError::FunctionError(msg.to_string()))?;

    module.clear_context(ctx);
    module
        .finalize_definitions()
        .map_err(BuilderError::ModuleError)?;

    // SAFETY: the function was compiled with the host calling convention and the
    // signature fn(f64) -> f64. The module is never freed, so the code stays mapped.
    let func = unsafe {
        std::mem::transmute::<*const u8, extern "C" fn(f64) -> f64>(
            module.get_finalized_function(func_id),
        )
    };
    Ok(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial;

    #[test]
    fn test_compiled_matches_interpreted() {
        let terms = [0.1, -0.7, 1.3, 2.9, -0.05];
        let f = compile_terms(&terms).unwrap();
        let p = Polynomial::from_ascending(terms.to_vec());
        for x in [-3.5, -1.0, 0.0, 0.37, 1.37, 12.0] {
            assert_eq!(f(x).to_bits(), p.eval(x).to_bits(), "x = {x}");
        }
    }

    #[test]
    fn test_empty_terms() {
        let f = compile_terms(&[]).unwrap();
        assert_eq!(f(42.0), 0.0);
    }

    #[test]
    fn test_constant() {
        let f = compile_terms(&[7.5]).unwrap();
        assert_eq!(f(-1e9), 7.5);
    }

    #[test]
    fn test_thread_safe() {
        let f = compile_terms(&[1.0, 1.0]).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let f = f.clone();
                std::thread::spawn(move || f(i as f64))
            })
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
