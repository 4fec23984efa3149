//! Boundary operations consumed by the UI and persistence collaborators

use crate::assembly::{PlotSet, assemble_lineup, assemble_rorschach};
use crate::game::difficulty::Progressor;
use crate::io::configuration::GameConfig;
use crate::io::error::Result;
use crate::procedure::ProcedureRunner;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Owns the procedure runners and the random source shared by every draw
///
/// Shuffles, Bernoulli draws, position draws and the procedures' sampling
/// handles all derive from the one `rng`, so a seeded source reproduces a
/// whole session exactly.
pub struct GameCore<R: Rng> {
    runner: ProcedureRunner,
    progressor: Progressor,
    rng: R,
}

impl GameCore<StdRng> {
    /// Core driven by a seeded standard generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameCore<R> {
    /// Core driven by the given random source
    pub fn new(rng: R) -> Self {
        Self {
            runner: ProcedureRunner::new(),
            progressor: Progressor::new(),
            rng,
        }
    }

    /// Plot set for one Lineup round
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid configuration or an
    /// out-of-range true position
    pub fn generate_lineup_round(
        &mut self,
        config: &GameConfig,
        true_position: usize,
        noise_level: f64,
    ) -> Result<PlotSet> {
        assemble_lineup(
            config,
            true_position,
            noise_level,
            &mut self.runner,
            &mut self.rng,
        )
    }

    /// Plot set for a Rorschach screen at the configured initial noise level
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid configuration or
    /// probability
    pub fn generate_rorschach_screen(
        &mut self,
        config: &GameConfig,
        inclusion_probability: f64,
    ) -> Result<PlotSet> {
        assemble_rorschach(
            config,
            inclusion_probability,
            config.initial_noise_level,
            &mut self.runner,
            &mut self.rng,
        )
    }

    /// Noise level for the round after `current_level`
    pub fn advance_noise_level(&mut self, config: &GameConfig, current_level: f64) -> f64 {
        self.progressor
            .next_level(config.progression.as_deref(), current_level, &mut self.rng)
    }

    /// Uniform true position in `1..=plot_count`
    pub fn draw_true_position(&mut self, plot_count: usize) -> usize {
        self.rng.random_range(1..=plot_count.max(1))
    }

    /// Uniform selection in `1..=plot_count`, as a player guessing blindly would make
    pub fn draw_guess(&mut self, plot_count: usize) -> usize {
        self.draw_true_position(plot_count)
    }

    /// Runner used for data generation, for its diagnostics
    pub const fn runner(&self) -> &ProcedureRunner {
        &self.runner
    }

    /// Progressor used between rounds, for its diagnostics
    pub const fn progressor(&self) -> &Progressor {
        &self.progressor
    }
}
