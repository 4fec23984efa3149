//! Chance baselines: blind-guessing sessions and Rorschach inclusion rates
//!
//! A player who guesses uniformly is correct with probability `q = 1/N`, so
//! the number of rounds cleared before the first mistake is geometric with
//! mean `q / (1 - q)`. Scores near that value mean the generator's pattern is
//! invisible at the played noise levels.

use crate::game::api::GameCore;
use crate::game::events::SessionObserver;
use crate::game::state::{Event, GameState, Protocol, Stage};
use crate::io::configuration::GameConfig;
use crate::io::error::Result;
use crate::math::probability::binomial_two_sided_p_value;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

/// Scores of blind-guessing sessions against the geometric expectation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GuessingReport {
    /// Sessions played
    pub sessions: usize,
    /// Mean rounds cleared before the session ended
    pub mean_score: f64,
    /// Expected mean under uniform guessing
    pub expected_score: f64,
    /// Highest score reached
    pub best_score: u32,
    /// Mean noise level at session end
    pub mean_final_noise_level: f64,
}

/// Empirical inclusion rate of the true pattern on Rorschach screens
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InclusionReport {
    /// Screens assembled
    pub screens: usize,
    /// Screens that contained the true pattern
    pub screens_with_truth: usize,
    /// Configured inclusion probability
    pub probability: f64,
    /// Observed inclusion rate
    pub observed_rate: f64,
    /// Two-sided p-value of the observed count under the configured probability
    pub p_value: f64,
}

/// Expected rounds cleared by a player guessing among `plot_count` plots
pub fn expected_guessing_score(plot_count: usize) -> f64 {
    if plot_count < 2 {
        return f64::INFINITY;
    }
    let q = 1.0 / plot_count as f64;
    q / (1.0 - q)
}

/// Play `sessions` Lineup sessions with uniformly random picks
///
/// `on_session` is called after every finished session, for progress display.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the observer fails
pub fn simulate_guessing<R: Rng>(
    config: &GameConfig,
    sessions: usize,
    core: &mut GameCore<R>,
    observer: &mut dyn SessionObserver,
    mut on_session: impl FnMut(usize),
) -> Result<GuessingReport> {
    config.validate()?;
    let mut total_score = 0u64;
    let mut total_noise = 0.0;
    let mut best_score = 0;

    for session in 0..sessions {
        let mut state = GameState::new()
            .apply(Event::Configure(config.clone()), core, observer)?
            .apply(Event::Choose(Protocol::Lineup), core, observer)?;
        while matches!(state.stage(), Stage::Lineup { .. }) {
            let position = core.draw_guess(config.plot_count);
            state = state.apply(
                Event::Select {
                    position,
                    elapsed: Duration::ZERO,
                },
                core,
                observer,
            )?;
        }
        total_score += u64::from(state.score());
        total_noise += state.noise_level();
        best_score = best_score.max(state.score());
        on_session(session + 1);
    }

    let played = sessions.max(1) as f64;
    Ok(GuessingReport {
        sessions,
        mean_score: total_score as f64 / played,
        expected_score: expected_guessing_score(config.plot_count),
        best_score,
        mean_final_noise_level: total_noise / played,
    })
}

/// Assemble `screens` Rorschach screens and measure how often the truth appears
///
/// # Errors
///
/// Returns an error if the configuration is invalid
pub fn measure_inclusion<R: Rng>(
    config: &GameConfig,
    screens: usize,
    core: &mut GameCore<R>,
    mut on_screen: impl FnMut(usize),
) -> Result<InclusionReport> {
    let probability = config.rorschach_inclusion_probability;
    let mut screens_with_truth = 0;
    for screen in 0..screens {
        let plot_set = core.generate_rorschach_screen(config, probability)?;
        if plot_set.true_count() > 0 {
            screens_with_truth += 1;
        }
        on_screen(screen + 1);
    }

    Ok(InclusionReport {
        screens,
        screens_with_truth,
        probability,
        observed_rate: screens_with_truth as f64 / screens.max(1) as f64,
        p_value: binomial_two_sided_p_value(screens, probability, screens_with_truth),
    })
}
