//! Input/output: configuration, errors, logging and the command-line surface

/// Command-line parsing and command execution
pub mod cli;
/// Constants and the runtime game configuration
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Progress display for simulations
pub mod progress;
