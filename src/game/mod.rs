//! Round control: difficulty progression, session state and lifecycle events

/// Boundary operations exposed to the UI and persistence collaborators
pub mod api;
/// Noise level updates between Lineup rounds
pub mod difficulty;
/// Lifecycle notifications and round records
pub mod events;
/// Baseline simulations with a guessing player
pub mod simulation;
/// Stage transitions over immutable session records
pub mod state;

pub use api::GameCore;
pub use difficulty::Progressor;
pub use events::{RecordingObserver, RoundRecord, SessionEvent, SessionObserver, Termination};
pub use state::{Event, GameState, LineupRound, Protocol, RoundKey, SessionSummary, Stage};
