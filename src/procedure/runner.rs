use crate::data::{DataPoint, Dataset};
use crate::io::configuration::GENERATOR_FUNCTION;
use crate::io::error::{GameError, Result, generation_error, invalid_parameter, procedure_error};
use crate::procedure::sandbox::{Sandbox, as_number};
use crate::procedure::stats::Stats;
use rand::Rng;
use rhai::{Array, Dynamic, FLOAT, INT, Map};
use tracing::{debug, warn};

const PROCEDURE: &str = "generator";

/// Runs data generation procedures and absorbs their failures
///
/// Any failure of the author's procedure (parse error, missing callable,
/// runtime error, malformed output) is logged and replaced by a dataset of
/// uniformly random points, so a round is never lost to bad user code.
/// The most recent failure stays readable through [`Self::last_error`].
pub struct ProcedureRunner {
    sandbox: Sandbox,
    last_error: Option<GameError>,
}

impl Default for ProcedureRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcedureRunner {
    /// Create a runner with a fresh sandbox
    pub fn new() -> Self {
        Self {
            sandbox: Sandbox::new(),
            last_error: None,
        }
    }

    /// Generate a dataset, substituting the uniform fallback on failure
    pub fn generate<R: Rng>(
        &mut self,
        procedure_text: &str,
        count: usize,
        noise_level: f64,
        rng: &mut R,
    ) -> Dataset {
        match self.try_generate(procedure_text, count, noise_level, rng) {
            Ok(dataset) => {
                self.last_error = None;
                dataset
            }
            Err(err) => {
                warn!(error = %err, count, noise_level, "generator failed, substituting uniform data");
                self.last_error = Some(err);
                fallback_dataset(count, rng)
            }
        }
    }

    /// Generate a dataset, returning the failure instead of masking it
    ///
    /// The procedure receives `count`, `noise_level` and a [`Stats`] handle,
    /// as many of them as its declaration accepts, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `count` is zero
    /// - the procedure does not compile or declares no function
    /// - the procedure raises or exceeds a sandbox limit
    /// - the result is not an array of numeric point items
    pub fn try_generate<R: Rng>(
        &self,
        procedure_text: &str,
        count: usize,
        noise_level: f64,
        rng: &mut R,
    ) -> Result<Dataset> {
        if count == 0 {
            return Err(invalid_parameter(
                "count",
                &count,
                &"at least one point must be requested",
            ));
        }
        let compiled = self
            .sandbox
            .compile(PROCEDURE, procedure_text, GENERATOR_FUNCTION)?;
        let n = count as INT;
        let noise = noise_level as FLOAT;
        let stats = Stats::from_rng(rng);
        let output = match compiled.callable().arity {
            0 => self.sandbox.call(PROCEDURE, &compiled, ())?,
            1 => self.sandbox.call(PROCEDURE, &compiled, (n,))?,
            2 => self.sandbox.call(PROCEDURE, &compiled, (n, noise))?,
            3 => self.sandbox.call(PROCEDURE, &compiled, (n, noise, stats))?,
            arity => {
                return Err(procedure_error(
                    PROCEDURE,
                    &format!(
                        "`{}` takes {arity} parameters; expected (count, noise, stats)",
                        compiled.callable().name
                    ),
                    None,
                ));
            }
        };
        dataset_from_dynamic(output, count)
    }

    /// Failure recorded by the most recent [`Self::generate`] call
    pub const fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    /// Whether the most recent [`Self::generate`] call returned fallback data
    pub const fn used_fallback(&self) -> bool {
        self.last_error.is_some()
    }

    /// Sandbox the runner executes procedures in
    pub const fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }
}

/// Dataset of `count` points drawn uniformly from the unit square
pub fn fallback_dataset<R: Rng>(count: usize, rng: &mut R) -> Dataset {
    (0..count)
        .map(|_| DataPoint::new(rng.random::<f64>(), rng.random::<f64>()))
        .collect()
}

/// Convert a procedure's return value into a dataset
///
/// Accepts an array whose items are either maps with numeric `x` and `y`
/// entries or arrays whose first two entries are numeric. A length other
/// than `expected` is tolerated with a warning; an empty result is not.
///
/// # Errors
///
/// Returns a generation error naming the first offending index, or without
/// an index when the value is not an array at all or is empty
pub fn dataset_from_dynamic(value: Dynamic, expected: usize) -> Result<Dataset> {
    let type_name = value.type_name();
    let items = value.try_cast::<Array>().ok_or_else(|| {
        generation_error(None, &format!("expected an array of points, got {type_name}"))
    })?;
    if items.is_empty() {
        return Err(generation_error(None, &"procedure returned no points"));
    }
    if items.len() != expected {
        warn!(
            returned = items.len(),
            expected, "generator returned an unexpected number of points"
        );
    }

    let points = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| point_from_dynamic(index, item))
        .collect::<Result<Vec<_>>>()?;
    debug!(points = points.len(), "generator output validated");
    Ok(Dataset::new(points))
}

fn point_from_dynamic(index: usize, item: Dynamic) -> Result<DataPoint> {
    let type_name = item.type_name();
    let (x, y) = if item.is_map() {
        let map = item
            .try_cast::<Map>()
            .ok_or_else(|| generation_error(Some(index), &"unreadable map"))?;
        (
            coordinate(index, "x", map.get("x"))?,
            coordinate(index, "y", map.get("y"))?,
        )
    } else if item.is_array() {
        let pair = item
            .try_cast::<Array>()
            .ok_or_else(|| generation_error(Some(index), &"unreadable array"))?;
        (
            coordinate(index, "x", pair.first())?,
            coordinate(index, "y", pair.get(1))?,
        )
    } else {
        return Err(generation_error(
            Some(index),
            &format!("expected #{{x, y}} or [x, y], got {type_name}"),
        ));
    };
    Ok(DataPoint::new(x, y))
}

fn coordinate(index: usize, field: &str, value: Option<&Dynamic>) -> Result<f64> {
    let value =
        value.ok_or_else(|| generation_error(Some(index), &format!("missing field `{field}`")))?;
    let number = as_number(value).ok_or_else(|| {
        generation_error(
            Some(index),
            &format!("field `{field}` is {}, not a number", value.type_name()),
        )
    })?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(generation_error(
            Some(index),
            &format!("field `{field}` is not finite"),
        ))
    }
}
