//! Engine for the visual line-up and Rorschach inference protocols
//!
//! A player is shown several scatter plots: one drawn from an author-supplied
//! data generator, the rest null datasets made by permuting its y values.
//! Spotting the true plot advances the player to a noisier round; the first
//! mistake ends the session.

#![forbid(unsafe_code)]

/// Plot set assembly for both protocols
pub mod assembly;
/// Points, datasets and the null-hypothesis permutation
pub mod data;
/// Difficulty progression, session state machine and lifecycle events
pub mod game;
/// Configuration, error handling, logging and command-line interface
pub mod io;
/// Normal approximations for calibration reports
pub mod math;
/// Sandboxed execution of author-supplied procedures
pub mod procedure;

pub use io::error::{GameError, Result};
