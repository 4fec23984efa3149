//! Session stages and the transitions between them
//!
//! A session is an immutable [`GameState`]; every transition consumes it and
//! returns the next one, so the state machine is a function of
//! `(state, event)` plus the random source held by [`GameCore`].
//!
//! ```text
//! Setup -> ProtocolSelection -> Rorschach -> Lineup -> Results -> Setup
//!                           \______________/   ^  |
//!                                              |__| correct answer
//! ```

use crate::assembly::PlotSet;
use crate::game::api::GameCore;
use crate::game::events::{SessionEvent, SessionObserver, Termination};
use crate::io::configuration::GameConfig;
use crate::io::error::{GameError, Result, invalid_parameter};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

/// Protocol chosen after setup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    /// Calibration screen, then the Lineup
    Rorschach,
    /// Straight to the Lineup
    Lineup,
}

/// Input driving the state machine
#[derive(Clone, Debug)]
pub enum Event {
    /// Configuration submitted from the setup form
    Configure(GameConfig),
    /// Protocol picked on the selection screen
    Choose(Protocol),
    /// Leave the Rorschach screen for the Lineup
    Continue,
    /// Player picked a plot
    Select {
        /// 1-based position picked
        position: usize,
        /// Time from screen display to the pick
        elapsed: Duration,
    },
    /// Start over from setup
    Restart,
}

impl Event {
    const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Choose(_) => "choose",
            Self::Continue => "continue",
            Self::Select { .. } => "select",
            Self::Restart => "restart",
        }
    }
}

/// Values a screen is guaranteed stable against
///
/// A Lineup plot set is regenerated only when one of these changes; anything
/// else (a re-render, a repeated read) must reuse the assembled set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundKey {
    /// 1-based round number
    pub round: u32,
    /// Noise level of the round
    pub noise_level: f64,
}

/// One assembled Lineup round
#[derive(Clone, Debug, PartialEq)]
pub struct LineupRound {
    /// 1-based round number
    pub round: u32,
    /// Noise level the true dataset was generated at
    pub noise_level: f64,
    /// Position holding the true dataset
    pub true_position: usize,
    /// Screen for this round
    pub plot_set: PlotSet,
}

impl LineupRound {
    /// Change-detection key of this round
    pub const fn key(&self) -> RoundKey {
        RoundKey {
            round: self.round,
            noise_level: self.noise_level,
        }
    }
}

/// Outcome shown on the results screen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSummary {
    /// Rounds answered correctly
    pub score: u32,
    /// Noise level when the session ended
    pub final_noise_level: f64,
    /// What ended the session
    pub termination: Termination,
}

/// Screen the session is on
#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    /// Waiting for a configuration
    Setup,
    /// Waiting for a protocol choice
    ProtocolSelection,
    /// Showing a calibration screen
    Rorschach {
        /// Screen being shown
        screen: PlotSet,
    },
    /// Showing a Lineup round
    Lineup {
        /// Round being played
        round: LineupRound,
    },
    /// Showing the final score
    Results {
        /// Session outcome
        summary: SessionSummary,
    },
}

impl Stage {
    /// Short stage name for logs and errors
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::ProtocolSelection => "protocol_selection",
            Self::Rorschach { .. } => "rorschach",
            Self::Lineup { .. } => "lineup",
            Self::Results { .. } => "results",
        }
    }
}

/// Immutable snapshot of a session
///
/// Score, round number and noise level are written only by transitions.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    stage: Stage,
    config: Option<GameConfig>,
    score: u32,
    noise_level: f64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh session waiting for setup
    pub const fn new() -> Self {
        Self {
            stage: Stage::Setup,
            config: None,
            score: 0,
            noise_level: 0.0,
        }
    }

    /// Current stage
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Configuration accepted at setup
    pub const fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    /// Rounds answered correctly so far
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Noise level for the current or next round
    pub const fn noise_level(&self) -> f64 {
        self.noise_level
    }

    /// Round in progress, if on a Lineup screen
    pub const fn lineup_round(&self) -> Option<&LineupRound> {
        match &self.stage {
            Stage::Lineup { round } => Some(round),
            _ => None,
        }
    }

    /// Change-detection key of the round in progress
    pub const fn round_key(&self) -> Option<RoundKey> {
        match &self.stage {
            Stage::Lineup { round } => Some(round.key()),
            _ => None,
        }
    }

    /// Apply one event, producing the next state
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the event is not accepted in the current stage
    /// - the submitted configuration is invalid
    /// - a selected position lies outside the screen
    /// - the observer fails to record a notification
    ///
    /// `self` is left untouched, so a failed event keeps the session where it was.
    pub fn apply<R: Rng>(
        &self,
        event: Event,
        core: &mut GameCore<R>,
        observer: &mut dyn SessionObserver,
    ) -> Result<Self> {
        let stage_name = self.stage.name();
        let event_name = event.name();
        let next = match (self.stage.clone(), event) {
            (Stage::Setup, Event::Configure(config)) => Self::configure(config, observer),
            (Stage::ProtocolSelection, Event::Choose(Protocol::Lineup))
            | (Stage::Rorschach { .. }, Event::Continue) => {
                self.clone().enter_lineup(1, core, observer)
            }
            (Stage::ProtocolSelection, Event::Choose(Protocol::Rorschach)) => {
                self.clone().enter_rorschach(core, observer)
            }
            (Stage::Lineup { round }, Event::Select { position, elapsed }) => {
                self.clone().select(round, position, elapsed, core, observer)
            }
            (Stage::Results { .. }, Event::Restart) => Ok(Self::new()),
            _ => Err(GameError::InvalidTransition {
                stage: stage_name,
                event: event_name,
            }),
        }?;
        debug!(from = stage_name, to = next.stage.name(), event = event_name, "transition");
        Ok(next)
    }

    fn configure(config: GameConfig, observer: &mut dyn SessionObserver) -> Result<Self> {
        config.validate()?;
        observer.on_event(&SessionEvent::SessionStarted {
            config: config.clone(),
        })?;
        Ok(Self {
            stage: Stage::ProtocolSelection,
            noise_level: config.initial_noise_level,
            config: Some(config),
            score: 0,
        })
    }

    fn enter_rorschach<R: Rng>(
        self,
        core: &mut GameCore<R>,
        observer: &mut dyn SessionObserver,
    ) -> Result<Self> {
        let config = self.require_config()?;
        let screen =
            core.generate_rorschach_screen(config, config.rorschach_inclusion_probability)?;
        observer.on_event(&SessionEvent::RorschachShown {
            noise_level: config.initial_noise_level,
            plot_set: screen.clone(),
        })?;
        Ok(Self {
            stage: Stage::Rorschach { screen },
            ..self
        })
    }

    fn enter_lineup<R: Rng>(
        self,
        round_number: u32,
        core: &mut GameCore<R>,
        observer: &mut dyn SessionObserver,
    ) -> Result<Self> {
        let config = self.require_config()?;
        let true_position = core.draw_true_position(config.plot_count);
        let plot_set = core.generate_lineup_round(config, true_position, self.noise_level)?;
        observer.on_event(&SessionEvent::RoundStarted {
            round: round_number,
            noise_level: self.noise_level,
            true_position,
            plot_set: plot_set.clone(),
        })?;
        let round = LineupRound {
            round: round_number,
            noise_level: self.noise_level,
            true_position,
            plot_set,
        };
        Ok(Self {
            stage: Stage::Lineup { round },
            ..self
        })
    }

    fn select<R: Rng>(
        self,
        round: LineupRound,
        position: usize,
        elapsed: Duration,
        core: &mut GameCore<R>,
        observer: &mut dyn SessionObserver,
    ) -> Result<Self> {
        let config = self.require_config()?;
        if !(1..=config.plot_count).contains(&position) {
            return Err(invalid_parameter(
                "selected_position",
                &position,
                &format!("must lie in 1..={}", config.plot_count),
            ));
        }

        let correct = position == round.true_position;
        observer.on_event(&SessionEvent::RoundSelected {
            round: round.round,
            selected_position: position,
            correct,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        })?;

        if !correct {
            return self.finish(Termination::Mistake, observer);
        }

        let score = self.score + 1;
        let noise_level = core.advance_noise_level(config, self.noise_level);
        let advanced = Self {
            score,
            noise_level,
            ..self
        };
        if advanced
            .config
            .as_ref()
            .and_then(|c| c.round_limit)
            .is_some_and(|limit| round.round >= limit)
        {
            return advanced.finish(Termination::RoundLimit, observer);
        }
        advanced.enter_lineup(round.round + 1, core, observer)
    }

    fn finish(self, termination: Termination, observer: &mut dyn SessionObserver) -> Result<Self> {
        let summary = SessionSummary {
            score: self.score,
            final_noise_level: self.noise_level,
            termination,
        };
        observer.on_event(&SessionEvent::SessionEnded {
            score: summary.score,
            final_noise_level: summary.final_noise_level,
            termination,
        })?;
        info!(
            score = summary.score,
            final_noise_level = summary.final_noise_level,
            ?termination,
            "session ended"
        );
        Ok(Self {
            stage: Stage::Results { summary },
            ..self
        })
    }

    fn require_config(&self) -> Result<&GameConfig> {
        self.config.as_ref().ok_or(GameError::InvalidTransition {
            stage: self.stage.name(),
            event: "missing configuration",
        })
    }
}
