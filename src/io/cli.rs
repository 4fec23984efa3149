//! Command-line interface for generating screens and running chance baselines

use crate::assembly::PlotSet;
use crate::game::api::GameCore;
use crate::game::events::{JsonLinesObserver, SessionEvent, SessionObserver};
use crate::game::simulation::{measure_inclusion, simulate_guessing};
use crate::io::configuration::{DEFAULT_SEED, GameConfig};
use crate::io::error::{Result, WithContext};
use crate::io::progress::ProgressReporter;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "lineup")]
#[command(
    author,
    version,
    about = "Generate visual inference line-ups from scripted data generators"
)]
/// Command-line arguments for the line-up engine
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Game configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Generator procedure file (.rhai), overriding the configuration
    #[arg(short, long, global = true)]
    pub generator: Option<PathBuf>,

    /// Progression procedure file (.rhai), overriding the configuration
    #[arg(short, long, global = true)]
    pub progression: Option<PathBuf>,

    /// Random seed for reproducible screens
    #[arg(short, long, global = true, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Suppress progress output and informational logs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Append session events as JSON lines to this file
    #[arg(short, long, global = true)]
    pub events: Option<PathBuf>,
}

/// Operations offered by the tool
#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// Assemble one Lineup screen and print it as JSON
    Lineup {
        /// Position of the true plot (random when omitted)
        #[arg(short, long)]
        true_position: Option<usize>,

        /// Noise level (configured initial level when omitted)
        #[arg(short, long, allow_hyphen_values = true)]
        noise: Option<f64>,
    },
    /// Assemble one Rorschach screen and print it as JSON
    Rorschach {
        /// Inclusion probability (configured value when omitted)
        #[arg(long)]
        probability: Option<f64>,
    },
    /// Print the noise level following LEVEL
    Advance {
        /// Current noise level
        #[arg(allow_hyphen_values = true)]
        level: f64,
    },
    /// Measure chance baselines for the configured generator
    Simulate {
        /// Blind-guessing Lineup sessions to play
        #[arg(long, default_value_t = 200)]
        sessions: usize,

        /// Rorschach screens to assemble
        #[arg(long, default_value_t = 1000)]
        screens: usize,
    },
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Resolve the configuration file and procedure overrides
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced file cannot be read or the
    /// resulting configuration is invalid
    pub fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(path) = &self.generator {
            config.generator = read_procedure(path)?;
        }
        if let Some(path) = &self.progression {
            config.progression = Some(read_procedure(path)?);
        }
        config.validate_screen()?;
        Ok(config)
    }
}

fn read_procedure(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_path(path, "read procedure")
}

#[derive(Serialize)]
struct LineupOutput<'a> {
    true_position: usize,
    noise_level: f64,
    plot_set: &'a PlotSet,
}

#[derive(Serialize)]
struct RorschachOutput<'a> {
    probability: f64,
    true_position: Option<usize>,
    plot_set: &'a PlotSet,
}

#[derive(Serialize)]
struct AdvanceOutput {
    level: f64,
    next_level: f64,
    fallback: bool,
}

/// Executes a parsed command against a seeded game core
pub struct CommandProcessor {
    cli: Cli,
    core: GameCore<StdRng>,
}

impl CommandProcessor {
    /// Create a processor with a core seeded from the CLI
    pub fn new(cli: Cli) -> Self {
        let core = GameCore::seeded(cli.seed);
        Self { cli, core }
    }

    /// Run the command, writing its JSON result to stdout
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, screen assembly, the
    /// event log, or writing the result fails
    pub fn process(&mut self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.process_to(&mut out)
    }

    /// Run the command, writing its JSON result to `out`
    ///
    /// # Errors
    ///
    /// Same as [`Self::process`]
    pub fn process_to(&mut self, out: &mut dyn Write) -> Result<()> {
        let config = self.cli.resolve_config()?;
        let mut observer = self.open_event_log()?;

        match self.cli.command.clone() {
            Command::Lineup {
                true_position,
                noise,
            } => {
                let true_position = true_position
                    .unwrap_or_else(|| self.core.draw_true_position(config.plot_count));
                let noise_level = noise.unwrap_or(config.initial_noise_level);
                let plot_set =
                    self.core
                        .generate_lineup_round(&config, true_position, noise_level)?;
                observer.on_event(&SessionEvent::RoundStarted {
                    round: 1,
                    noise_level,
                    true_position,
                    plot_set: plot_set.clone(),
                })?;
                write_json(
                    out,
                    &LineupOutput {
                        true_position,
                        noise_level,
                        plot_set: &plot_set,
                    },
                )
            }
            Command::Rorschach { probability } => {
                let probability = probability.unwrap_or(config.rorschach_inclusion_probability);
                let plot_set = self.core.generate_rorschach_screen(&config, probability)?;
                observer.on_event(&SessionEvent::RorschachShown {
                    noise_level: config.initial_noise_level,
                    plot_set: plot_set.clone(),
                })?;
                write_json(
                    out,
                    &RorschachOutput {
                        probability,
                        true_position: plot_set.true_position(),
                        plot_set: &plot_set,
                    },
                )
            }
            Command::Advance { level } => {
                let next_level = self.core.advance_noise_level(&config, level);
                write_json(
                    out,
                    &AdvanceOutput {
                        level,
                        next_level,
                        fallback: self.core.progressor().last_error().is_some(),
                    },
                )
            }
            Command::Simulate { sessions, screens } => {
                self.simulate(&config, sessions, screens, &mut *observer, out)
            }
        }
    }

    fn simulate(
        &mut self,
        config: &GameConfig,
        sessions: usize,
        screens: usize,
        observer: &mut dyn SessionObserver,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut progress = self
            .cli
            .should_show_progress()
            .then(ProgressReporter::new);
        let guessing_stage = progress
            .as_mut()
            .map(|p| p.add_stage("sessions", sessions));
        let inclusion_stage = progress.as_mut().map(|p| p.add_stage("screens", screens));

        let guessing = simulate_guessing(config, sessions, &mut self.core, observer, |done| {
            if let (Some(p), Some(stage)) = (&progress, guessing_stage) {
                p.update(stage, done);
            }
        })?;
        if let (Some(p), Some(stage)) = (&progress, guessing_stage) {
            p.complete(stage);
        }

        let inclusion = measure_inclusion(config, screens, &mut self.core, |done| {
            if let (Some(p), Some(stage)) = (&progress, inclusion_stage) {
                p.update(stage, done);
            }
        })?;
        if let Some(p) = progress.as_ref() {
            p.finish();
        }

        info!(
            mean_score = guessing.mean_score,
            expected_score = guessing.expected_score,
            observed_rate = inclusion.observed_rate,
            p_value = inclusion.p_value,
            "simulation finished"
        );
        write_json(
            out,
            &serde_json::json!({ "guessing": guessing, "inclusion": inclusion }),
        )
    }

    fn open_event_log(&self) -> Result<Box<dyn SessionObserver>> {
        match &self.cli.events {
            Some(path) => {
                let file: File = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_path(path, "open event log")?;
                Ok(Box::new(JsonLinesObserver::new(BufWriter::new(file))))
            }
            None => Ok(Box::new(())),
        }
    }
}

fn write_json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}
