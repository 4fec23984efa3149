//! Restricted script engine for author-supplied procedures

use crate::io::configuration::{
    MAX_SCRIPT_ARRAY_SIZE, MAX_SCRIPT_CALL_LEVELS, MAX_SCRIPT_EXPR_DEPTH,
    MAX_SCRIPT_FUNCTION_EXPR_DEPTH, MAX_SCRIPT_MAP_SIZE, MAX_SCRIPT_OPERATIONS,
    MAX_SCRIPT_STRING_SIZE,
};
use crate::io::error::{GameError, Result, procedure_error};
use crate::procedure::discovery::{Callable, resolve_callable};
use crate::procedure::stats::Stats;
use rhai::{AST, Dynamic, Engine, EvalAltResult, FuncArgs, ParseError, Scope};
use tracing::debug;

/// Script engine with host access removed and resource limits applied
///
/// The engine is built without module imports, `eval` is disabled, and
/// `print`/`debug` output is routed into the log. Operation count, call depth,
/// expression nesting and collection sizes are capped so a runaway procedure
/// fails instead of hanging the round.
pub struct Sandbox {
    engine: Engine,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

/// A compiled procedure together with the callable it resolves to
pub struct CompiledProcedure {
    ast: AST,
    callable: Callable,
}

impl CompiledProcedure {
    /// The callable that will be invoked
    pub const fn callable(&self) -> &Callable {
        &self.callable
    }
}

impl Sandbox {
    /// Build the restricted engine
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(MAX_SCRIPT_OPERATIONS);
        engine.set_max_call_levels(MAX_SCRIPT_CALL_LEVELS);
        // Fixed here so nesting limits do not vary with the build profile
        engine.set_max_expr_depths(MAX_SCRIPT_EXPR_DEPTH, MAX_SCRIPT_FUNCTION_EXPR_DEPTH);
        engine.set_max_array_size(MAX_SCRIPT_ARRAY_SIZE);
        engine.set_max_map_size(MAX_SCRIPT_MAP_SIZE);
        engine.set_max_string_size(MAX_SCRIPT_STRING_SIZE);
        engine.disable_symbol("eval");
        engine.on_print(|msg| debug!(target: "rhai", "{msg}"));
        engine.on_debug(|msg, _source, position| {
            debug!(target: "rhai", %position, "{msg}");
        });
        Stats::register(&mut engine);
        Self { engine }
    }

    /// Compile procedure text and resolve the callable to invoke
    ///
    /// The canonical name wins; otherwise the last function declared in the
    /// text is used. Resolution is best-effort and order-dependent.
    ///
    /// # Errors
    ///
    /// Returns a procedure execution error if the text does not parse
    /// or declares no function at all
    pub fn compile(
        &self,
        procedure: &'static str,
        text: &str,
        canonical: &str,
    ) -> Result<CompiledProcedure> {
        let ast = self
            .engine
            .compile(text)
            .map_err(|e| parse_failure(procedure, &e))?;
        let callable = resolve_callable(&ast, text, canonical).ok_or_else(|| {
            procedure_error(
                procedure,
                &format!("no callable found; declare `fn {canonical}(...)`"),
                None,
            )
        })?;
        debug!(procedure, callable = %callable.name, arity = callable.arity, "resolved procedure");
        Ok(CompiledProcedure { ast, callable })
    }

    /// Invoke a compiled procedure in a fresh scope
    ///
    /// # Errors
    ///
    /// Returns a procedure execution error if the call raises, exceeds a
    /// limit, or the argument count does not match the declaration
    pub fn call(
        &self,
        procedure: &'static str,
        compiled: &CompiledProcedure,
        args: impl FuncArgs,
    ) -> Result<Dynamic> {
        let mut scope = Scope::new();
        self.engine
            .call_fn::<Dynamic>(&mut scope, &compiled.ast, &compiled.callable.name, args)
            .map_err(|e| runtime_failure(procedure, &e))
    }
}

/// Read a script value as a number, accepting integers and floats
pub fn as_number(value: &Dynamic) -> Option<f64> {
    value
        .as_float()
        .ok()
        .or_else(|| value.as_int().ok().map(|v| v as f64))
}

fn parse_failure(procedure: &'static str, err: &ParseError) -> GameError {
    procedure_error(procedure, err, err.position().line())
}

fn runtime_failure(procedure: &'static str, err: &EvalAltResult) -> GameError {
    procedure_error(procedure, err, err.position().line())
}
