//! Session lifecycle notifications and the round records built from them

use crate::assembly::PlotSet;
use crate::io::configuration::GameConfig;
use crate::io::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Why a session reached its results
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The player picked a decoy
    Mistake,
    /// The configured round limit was reached without a mistake
    RoundLimit,
}

/// Notification emitted at a session or round boundary
///
/// Round-start events carry the full plot set so a collaborator can
/// reproduce exactly what was on screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Configuration accepted at setup
    SessionStarted {
        /// Snapshot of the configuration used for the session
        config: GameConfig,
    },
    /// A Rorschach screen was shown
    RorschachShown {
        /// Noise level the screen was generated at
        noise_level: f64,
        /// Every plot on the screen
        plot_set: PlotSet,
    },
    /// A Lineup round began
    RoundStarted {
        /// 1-based round number
        round: u32,
        /// Noise level the true dataset was generated at
        noise_level: f64,
        /// Position holding the true dataset
        true_position: usize,
        /// Every plot on the screen
        plot_set: PlotSet,
    },
    /// The player answered a Lineup round
    RoundSelected {
        /// 1-based round number
        round: u32,
        /// Position the player picked
        selected_position: usize,
        /// Whether it was the true position
        correct: bool,
        /// Response latency in milliseconds
        elapsed_ms: u64,
    },
    /// The session reached its results
    SessionEnded {
        /// Rounds answered correctly
        score: u32,
        /// Noise level when the session ended
        final_noise_level: f64,
        /// What ended the session
        termination: Termination,
    },
}

/// Receives lifecycle notifications from the session state machine
pub trait SessionObserver {
    /// Handle one notification
    ///
    /// # Errors
    ///
    /// Returns an error if the observer fails to record the event; the
    /// transition that emitted it fails with the same error
    fn on_event(&mut self, event: &SessionEvent) -> Result<()>;
}

impl SessionObserver for () {
    fn on_event(&mut self, _event: &SessionEvent) -> Result<()> {
        Ok(())
    }
}

/// Complete record of one answered Lineup round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number
    pub round: u32,
    /// Noise level the round was generated at
    pub noise_level: f64,
    /// Position holding the true dataset
    pub true_position: usize,
    /// Screen shown to the player
    pub plot_set: PlotSet,
    /// Position the player picked
    pub selected_position: usize,
    /// Whether the pick was correct
    pub correct: bool,
    /// Response latency in milliseconds
    pub elapsed_ms: u64,
}

/// Keeps every event and pairs round starts with their selections
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    /// Every event received, in order
    pub events: Vec<SessionEvent>,
    /// Finalized round records, in order
    pub rounds: Vec<RoundRecord>,
    pending: Option<(u32, f64, usize, PlotSet)>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Final score reported by the session end event, if the session ended
    pub fn final_score(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|event| match event {
            SessionEvent::SessionEnded { score, .. } => Some(*score),
            _ => None,
        })
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&mut self, event: &SessionEvent) -> Result<()> {
        match event {
            SessionEvent::RoundStarted {
                round,
                noise_level,
                true_position,
                plot_set,
            } => {
                self.pending = Some((*round, *noise_level, *true_position, plot_set.clone()));
            }
            SessionEvent::RoundSelected {
                round,
                selected_position,
                correct,
                elapsed_ms,
            } => {
                if let Some((started, noise_level, true_position, plot_set)) = self.pending.take() {
                    if started == *round {
                        self.rounds.push(RoundRecord {
                            round: started,
                            noise_level,
                            true_position,
                            plot_set,
                            selected_position: *selected_position,
                            correct: *correct,
                            elapsed_ms: *elapsed_ms,
                        });
                    }
                }
            }
            _ => {}
        }
        self.events.push(event.clone());
        Ok(())
    }
}

/// Writes each event as one JSON line
pub struct JsonLinesObserver<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesObserver<W> {
    /// Log events to `writer`
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SessionObserver for JsonLinesObserver<W> {
    fn on_event(&mut self, event: &SessionEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
