//! Noise level progression between Lineup rounds

use crate::io::configuration::{
    DEFAULT_NOISE_STEP, PROGRESSION_FALLBACK_FACTOR, PROGRESSION_FUNCTION,
};
use crate::io::error::{GameError, Result, procedure_error};
use crate::procedure::sandbox::{Sandbox, as_number};
use crate::procedure::stats::Stats;
use rand::Rng;
use rhai::FLOAT;
use tracing::warn;

const PROCEDURE: &str = "progression";

/// Computes the next round's noise level
///
/// Without a procedure the level grows by a fixed step. With one, the
/// procedure's `update(level)` result is used as-is, even if it lowers the
/// level. A failing procedure yields `level * 1.1` instead of the default
/// step, which marks that a procedure was present but broken.
pub struct Progressor {
    sandbox: Sandbox,
    last_error: Option<GameError>,
}

impl Default for Progressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Progressor {
    /// Create a progressor with a fresh sandbox
    pub fn new() -> Self {
        Self {
            sandbox: Sandbox::new(),
            last_error: None,
        }
    }

    /// Next noise level, absorbing procedure failures
    pub fn next_level<R: Rng>(
        &mut self,
        procedure_text: Option<&str>,
        current_level: f64,
        rng: &mut R,
    ) -> f64 {
        let Some(text) = procedure_text else {
            self.last_error = None;
            return default_next_level(current_level);
        };
        match self.try_next_level(text, current_level, rng) {
            Ok(level) => {
                self.last_error = None;
                level
            }
            Err(err) => {
                warn!(error = %err, current_level, "progression failed, applying growth factor");
                self.last_error = Some(err);
                current_level * PROGRESSION_FALLBACK_FACTOR
            }
        }
    }

    /// Run a progression procedure without masking its failure
    ///
    /// The procedure receives the current level and, if it declares a second
    /// parameter, a [`Stats`] handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure fails to compile or run, or returns
    /// something other than a finite number
    pub fn try_next_level<R: Rng>(
        &self,
        procedure_text: &str,
        current_level: f64,
        rng: &mut R,
    ) -> Result<f64> {
        let compiled = self
            .sandbox
            .compile(PROCEDURE, procedure_text, PROGRESSION_FUNCTION)?;
        let level = current_level as FLOAT;
        let output = match compiled.callable().arity {
            1 => self.sandbox.call(PROCEDURE, &compiled, (level,))?,
            2 => self
                .sandbox
                .call(PROCEDURE, &compiled, (level, Stats::from_rng(rng)))?,
            arity => {
                return Err(procedure_error(
                    PROCEDURE,
                    &format!(
                        "`{}` takes {arity} parameters; expected (level) or (level, stats)",
                        compiled.callable().name
                    ),
                    None,
                ));
            }
        };
        let next = as_number(&output).ok_or_else(|| GameError::Progression {
            reason: format!("returned {}, not a number", output.type_name()),
        })?;
        if next.is_finite() {
            Ok(next)
        } else {
            Err(GameError::Progression {
                reason: format!("returned non-finite level {next}"),
            })
        }
    }

    /// Failure recorded by the most recent [`Self::next_level`] call
    pub const fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }
}

/// Fixed-step escalation used when no procedure is configured
pub const fn default_next_level(current_level: f64) -> f64 {
    current_level + DEFAULT_NOISE_STEP
}
