//! Game constants, runtime configuration and its TOML loader

use crate::io::error::{Result, WithContext, invalid_parameter};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Noise level a session starts from when none is configured
pub const DEFAULT_INITIAL_NOISE_LEVEL: f64 = 0.5;

/// Additive step used when no progression procedure is supplied
pub const DEFAULT_NOISE_STEP: f64 = 0.1;

// Multiplicative on purpose, so a broken procedure is distinguishable from a missing one
/// Growth factor applied when a progression procedure fails
pub const PROGRESSION_FALLBACK_FACTOR: f64 = 1.1;

/// Chance that a Rorschach screen contains the true pattern
pub const DEFAULT_INCLUSION_PROBABILITY: f64 = 0.2;

/// Plots shown per screen
pub const DEFAULT_PLOT_COUNT: usize = 20;

/// Points generated per plot
pub const DEFAULT_POINTS_PER_PLOT: usize = 50;

/// Fixed seed for reproducible sessions
pub const DEFAULT_SEED: u64 = 42;

// Procedure resolution
/// Canonical name of the data generation callable
pub const GENERATOR_FUNCTION: &str = "generate";
/// Canonical name of the difficulty update callable
pub const PROGRESSION_FUNCTION: &str = "update";

// Sandbox limits
/// Maximum script operations per procedure call
pub const MAX_SCRIPT_OPERATIONS: u64 = 2_000_000;
/// Maximum nested function call depth inside a procedure
pub const MAX_SCRIPT_CALL_LEVELS: usize = 32;
/// Maximum expression nesting at the top level of a procedure
pub const MAX_SCRIPT_EXPR_DEPTH: usize = 128;
/// Maximum expression nesting inside a function body
pub const MAX_SCRIPT_FUNCTION_EXPR_DEPTH: usize = 64;
/// Maximum array length a procedure may build
pub const MAX_SCRIPT_ARRAY_SIZE: usize = 100_000;
/// Maximum object map size a procedure may build
pub const MAX_SCRIPT_MAP_SIZE: usize = 1_000;
/// Maximum string length a procedure may build
pub const MAX_SCRIPT_STRING_SIZE: usize = 10_000;

/// Generator used when the configuration does not provide one
///
/// A linear trend whose vertical scatter grows with the noise level.
pub const DEFAULT_GENERATOR: &str = r"
fn generate(n, noise, stats) {
    let points = [];
    for i in 0..n {
        let x = stats.uniform(0.0, 1.0);
        let y = 2.0 * x + 1.0 + stats.normal(0.0, noise);
        points.push(#{ x: x, y: y });
    }
    points
}
";

/// Immutable session configuration supplied by the setup collaborator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of points in every plot (R)
    #[serde(default = "GameConfig::default_points_per_plot")]
    pub points_per_plot: usize,
    /// Number of plots on every screen (N)
    #[serde(default = "GameConfig::default_plot_count")]
    pub plot_count: usize,
    /// Source text of the data generation procedure
    #[serde(default = "GameConfig::default_generator")]
    pub generator: String,
    /// Source text of the difficulty update procedure
    #[serde(default)]
    pub progression: Option<String>,
    /// Noise level of the first Lineup round and of the Rorschach screen
    #[serde(default = "GameConfig::default_initial_noise_level")]
    pub initial_noise_level: f64,
    /// Probability that a Rorschach screen includes the true pattern
    #[serde(default = "GameConfig::default_inclusion_probability")]
    pub rorschach_inclusion_probability: f64,
    /// Optional cap on completed Lineup rounds; unlimited when absent
    #[serde(default)]
    pub round_limit: Option<u32>,
}

impl GameConfig {
    const fn default_points_per_plot() -> usize {
        DEFAULT_POINTS_PER_PLOT
    }

    const fn default_plot_count() -> usize {
        DEFAULT_PLOT_COUNT
    }

    fn default_generator() -> String {
        DEFAULT_GENERATOR.to_string()
    }

    const fn default_initial_noise_level() -> f64 {
        DEFAULT_INITIAL_NOISE_LEVEL
    }

    const fn default_inclusion_probability() -> f64 {
        DEFAULT_INCLUSION_PROBABILITY
    }

    /// Configuration with the given generator and defaults elsewhere
    pub fn with_generator(generator: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            ..Self::default()
        }
    }

    /// Check the constraints shared by both protocols; procedure text is not inspected
    ///
    /// A single plot is accepted here, since a Rorschach screen of one plot
    /// is well defined.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - `plot_count` is zero
    /// - `points_per_plot` is zero
    /// - the initial noise level is not finite
    /// - the inclusion probability lies outside [0, 1]
    /// - the round limit is zero
    pub fn validate_screen(&self) -> Result<()> {
        if self.plot_count == 0 {
            return Err(invalid_parameter(
                "plot_count",
                &self.plot_count,
                &"at least one plot is required",
            ));
        }
        if self.points_per_plot == 0 {
            return Err(invalid_parameter(
                "points_per_plot",
                &self.points_per_plot,
                &"must be positive",
            ));
        }
        if !self.initial_noise_level.is_finite() {
            return Err(invalid_parameter(
                "initial_noise_level",
                &self.initial_noise_level,
                &"must be a finite number",
            ));
        }
        validate_probability(self.rorschach_inclusion_probability)?;
        if self.round_limit == Some(0) {
            return Err(invalid_parameter(
                "round_limit",
                &0,
                &"must be positive when set",
            ));
        }
        Ok(())
    }

    /// Check everything a Lineup round or session needs
    ///
    /// # Errors
    ///
    /// Returns a configuration error if [`Self::validate_screen`] fails or
    /// `plot_count` is below 2 (a Lineup needs at least one decoy)
    pub fn validate(&self) -> Result<()> {
        self.validate_screen()?;
        if self.plot_count < 2 {
            return Err(invalid_parameter(
                "plot_count",
                &self.plot_count,
                &"at least two plots are required",
            ));
        }
        Ok(())
    }

    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema
    /// or the resulting values fail validation
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate_screen()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path, "read config")?;
        let config: Self = toml::from_str(&text).with_path(path, "parse config")?;
        config.validate_screen()?;
        Ok(config)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            points_per_plot: DEFAULT_POINTS_PER_PLOT,
            plot_count: DEFAULT_PLOT_COUNT,
            generator: DEFAULT_GENERATOR.to_string(),
            progression: None,
            initial_noise_level: DEFAULT_INITIAL_NOISE_LEVEL,
            rorschach_inclusion_probability: DEFAULT_INCLUSION_PROBABILITY,
            round_limit: None,
        }
    }
}

/// Check that a probability lies in [0, 1]
///
/// # Errors
///
/// Returns a configuration error for NaN or out-of-range values
pub fn validate_probability(probability: f64) -> Result<()> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(invalid_parameter(
            "inclusion_probability",
            &probability,
            &"must lie in [0, 1]",
        ))
    }
}
