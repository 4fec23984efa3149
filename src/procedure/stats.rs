//! Random sampling library handed to procedures as a read-only handle

use crate::procedure::sandbox::as_number;
use rand::distr::{Bernoulli, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Exp, Normal, Poisson};
use rhai::{Dynamic, Engine, EvalAltResult, FLOAT, INT, Position};
use std::cell::RefCell;
use std::rc::Rc;

/// Sampling handle with its own generator, seeded from the caller's source
///
/// Cloning shares the underlying generator, so draws made through any clone
/// advance the same stream.
#[derive(Clone)]
pub struct Stats {
    rng: Rc<RefCell<StdRng>>,
}

impl Stats {
    /// Derive a handle from a caller-supplied random source
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self::seeded(rng.random())
    }

    /// Handle with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Rc::new(RefCell::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Uniform draw from [0, 1)
    pub fn random(&self) -> f64 {
        self.rng.borrow_mut().random::<f64>()
    }

    /// Uniform draw from [low, high]
    ///
    /// # Errors
    ///
    /// Returns a message if the bounds are reversed or not finite
    pub fn uniform(&self, low: f64, high: f64) -> Result<f64, String> {
        let dist = Uniform::new_inclusive(low, high)
            .map_err(|e| format!("uniform({low}, {high}): {e}"))?;
        Ok(dist.sample(&mut *self.rng.borrow_mut()))
    }

    /// Normal draw with the given mean and standard deviation
    ///
    /// # Errors
    ///
    /// Returns a message if the standard deviation is negative or not finite
    pub fn normal(&self, mean: f64, sd: f64) -> Result<f64, String> {
        let dist = Normal::new(mean, sd).map_err(|e| format!("normal({mean}, {sd}): {e}"))?;
        Ok(dist.sample(&mut *self.rng.borrow_mut()))
    }

    /// Exponential draw with the given rate
    ///
    /// # Errors
    ///
    /// Returns a message if the rate is negative or NaN
    pub fn exponential(&self, rate: f64) -> Result<f64, String> {
        let dist = Exp::new(rate).map_err(|e| format!("exponential({rate}): {e}"))?;
        Ok(dist.sample(&mut *self.rng.borrow_mut()))
    }

    /// Poisson draw with the given mean
    ///
    /// # Errors
    ///
    /// Returns a message if the mean is not positive and finite
    pub fn poisson(&self, lambda: f64) -> Result<f64, String> {
        let dist = Poisson::new(lambda).map_err(|e| format!("poisson({lambda}): {e}"))?;
        Ok(dist.sample(&mut *self.rng.borrow_mut()))
    }

    /// Bernoulli draw with success probability `p`
    ///
    /// # Errors
    ///
    /// Returns a message if `p` lies outside [0, 1]
    pub fn bernoulli(&self, p: f64) -> Result<bool, String> {
        let dist = Bernoulli::new(p).map_err(|e| format!("bernoulli({p}): {e}"))?;
        Ok(dist.sample(&mut *self.rng.borrow_mut()))
    }

    /// Uniform integer from the inclusive range [low, high]
    ///
    /// # Errors
    ///
    /// Returns a message if `low > high`
    pub fn int_between(&self, low: i64, high: i64) -> Result<i64, String> {
        let dist = Uniform::new_inclusive(low, high)
            .map_err(|e| format!("int_between({low}, {high}): {e}"))?;
        Ok(dist.sample(&mut *self.rng.borrow_mut()))
    }

    /// Register the `Stats` type and its methods on a script engine
    pub fn register(engine: &mut Engine) {
        engine.register_type_with_name::<Self>("Stats");
        engine.register_fn("random", |stats: &mut Self| -> FLOAT { stats.random() });
        engine.register_fn(
            "uniform",
            |stats: &mut Self, low: Dynamic, high: Dynamic| -> ScriptResult<FLOAT> {
                lift(stats.uniform(number(&low, "low")?, number(&high, "high")?))
            },
        );
        engine.register_fn(
            "normal",
            |stats: &mut Self, mean: Dynamic, sd: Dynamic| -> ScriptResult<FLOAT> {
                lift(stats.normal(number(&mean, "mean")?, number(&sd, "sd")?))
            },
        );
        engine.register_fn(
            "exponential",
            |stats: &mut Self, rate: Dynamic| -> ScriptResult<FLOAT> {
                lift(stats.exponential(number(&rate, "rate")?))
            },
        );
        engine.register_fn(
            "poisson",
            |stats: &mut Self, lambda: Dynamic| -> ScriptResult<FLOAT> {
                lift(stats.poisson(number(&lambda, "lambda")?))
            },
        );
        engine.register_fn(
            "bernoulli",
            |stats: &mut Self, p: Dynamic| -> ScriptResult<bool> {
                lift(stats.bernoulli(number(&p, "p")?))
            },
        );
        engine.register_fn(
            "int_between",
            |stats: &mut Self, low: INT, high: INT| -> ScriptResult<INT> {
                lift(stats.int_between(low, high))
            },
        );
    }
}

type ScriptResult<T> = Result<T, Box<EvalAltResult>>;

fn runtime_error(message: String) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(message.into(), Position::NONE))
}

fn lift<T>(result: Result<T, String>) -> ScriptResult<T> {
    result.map_err(runtime_error)
}

fn number(value: &Dynamic, name: &str) -> ScriptResult<f64> {
    as_number(value).ok_or_else(|| {
        runtime_error(format!(
            "{name} must be a number, got {}",
            value.type_name()
        ))
    })
}
