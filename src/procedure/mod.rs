//! Execution of author-supplied procedures inside a restricted script engine
//!
//! Procedures are plain `rhai` source. They see only the arguments passed to
//! them and a [`stats::Stats`] sampling handle; the host file system, module
//! imports and `eval` are unavailable.

/// Callable resolution by canonical name or declaration order
pub mod discovery;
/// Data generation with fallback substitution
pub mod runner;
/// Restricted script engine construction and invocation
pub mod sandbox;
/// Random sampling library exposed to procedures
pub mod stats;

pub use runner::ProcedureRunner;
pub use sandbox::Sandbox;
pub use stats::Stats;
