//! Tests for session stages and transitions

#[cfg(test)]
mod tests {
    use lineup::GameError;
    use lineup::game::{
        Event, GameCore, GameState, Protocol, RecordingObserver, SessionEvent, SessionObserver,
        Stage, Termination,
    };
    use lineup::io::configuration::GameConfig;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn config() -> GameConfig {
        GameConfig {
            plot_count: 4,
            points_per_plot: 10,
            ..GameConfig::default()
        }
    }

    fn select(position: usize) -> Event {
        Event::Select {
            position,
            elapsed: Duration::from_millis(1_200),
        }
    }

    fn started(
        config: GameConfig,
        core: &mut GameCore<StdRng>,
        observer: &mut RecordingObserver,
    ) -> GameState {
        GameState::new()
            .apply(Event::Configure(config), core, observer)
            .and_then(|state| state.apply(Event::Choose(Protocol::Lineup), core, observer))
            .expect("Failed to start session")
    }

    struct RejectingObserver;

    impl SessionObserver for RejectingObserver {
        fn on_event(&mut self, _event: &SessionEvent) -> lineup::io::error::Result<()> {
            Err(GameError::Progression {
                reason: "observer rejected event".to_string(),
            })
        }
    }

    fn true_position(state: &GameState) -> usize {
        state
            .lineup_round()
            .map(|round| round.true_position)
            .expect("Expected a Lineup round")
    }

    fn wrong_position(state: &GameState) -> usize {
        if true_position(state) == 1 { 2 } else { 1 }
    }

    // Tests configuration moves setup to protocol selection
    // Verified by skipping validation on configure
    #[test]
    fn test_configure() {
        let mut core = GameCore::seeded(1);
        let mut observer = RecordingObserver::new();

        let state = GameState::new()
            .apply(Event::Configure(config()), &mut core, &mut observer)
            .expect("Failed to configure");

        assert_eq!(state.stage(), &Stage::ProtocolSelection);
        assert_eq!(state.config(), Some(&config()));
        assert!((state.noise_level() - 0.5).abs() < f64::EPSILON);
        assert!(matches!(
            observer.events.first(),
            Some(SessionEvent::SessionStarted { .. })
        ));
    }

    // Tests invalid configurations keep the session in setup
    // Verified by accepting any configuration
    #[test]
    fn test_invalid_configuration_rejected() {
        let mut core = GameCore::seeded(2);
        let bad = GameConfig {
            plot_count: 1,
            ..config()
        };

        let result = GameState::new().apply(Event::Configure(bad), &mut core, &mut ());

        assert!(matches!(result, Err(GameError::Configuration { .. })));
    }

    // Tests the first Lineup round starts at the initial noise level
    // Verified by advancing noise before round one
    #[test]
    fn test_first_round() {
        let mut core = GameCore::seeded(3);
        let mut observer = RecordingObserver::new();

        let state = started(config(), &mut core, &mut observer);
        let key = state.round_key().expect("Expected a round key");

        assert_eq!(key.round, 1);
        assert!((key.noise_level - 0.5).abs() < f64::EPSILON);
        assert_eq!(state.score(), 0);
        let round = state.lineup_round().expect("Expected a round");
        assert_eq!(round.plot_set.true_position(), Some(round.true_position));
    }

    // Tests a correct pick scores and advances the noise level
    // Verified by not incrementing the score
    #[test]
    fn test_correct_selection_advances() {
        let mut core = GameCore::seeded(4);
        let mut observer = RecordingObserver::new();
        let state = started(config(), &mut core, &mut observer);

        let position = true_position(&state);
        let next = state
            .apply(select(position), &mut core, &mut observer)
            .expect("Failed to select");

        assert_eq!(next.score(), 1);
        assert!((next.noise_level() - 0.6).abs() < 1e-12);
        assert_eq!(next.round_key().map(|key| key.round), Some(2));
        assert_eq!(observer.rounds.len(), 1);
        assert!(observer.rounds[0].correct);
        assert_eq!(observer.rounds[0].elapsed_ms, 1_200);
    }

    // Tests a wrong pick ends the session with the current score
    // Verified by continuing after a mistake
    #[test]
    fn test_wrong_selection_ends_session() {
        let mut core = GameCore::seeded(5);
        let mut observer = RecordingObserver::new();
        let state = started(config(), &mut core, &mut observer);

        let position = wrong_position(&state);
        let ended = state
            .apply(select(position), &mut core, &mut observer)
            .expect("Failed to select");

        match ended.stage() {
            Stage::Results { summary } => {
                assert_eq!(summary.score, 0);
                assert_eq!(summary.termination, Termination::Mistake);
                assert!((summary.final_noise_level - 0.5).abs() < f64::EPSILON);
            }
            other => panic!("expected results, got {}", other.name()),
        }
        assert_eq!(observer.final_score(), Some(0));
    }

    // Tests out-of-range selections are rejected
    // Verified by treating them as wrong answers
    #[test]
    fn test_out_of_range_selection_rejected() {
        let mut core = GameCore::seeded(6);
        let mut observer = RecordingObserver::new();
        let state = started(config(), &mut core, &mut observer);

        for position in [0, 5] {
            let result = state.apply(select(position), &mut core, &mut ());
            assert!(matches!(
                result,
                Err(GameError::Configuration {
                    parameter: "selected_position",
                    ..
                })
            ));
        }
    }

    // Tests the round limit ends a perfect session
    // Verified by ignoring the round limit
    #[test]
    fn test_round_limit() {
        let mut core = GameCore::seeded(7);
        let mut observer = RecordingObserver::new();
        let limited = GameConfig {
            round_limit: Some(2),
            ..config()
        };
        let mut state = started(limited, &mut core, &mut observer);

        for _ in 0..2 {
            let position = true_position(&state);
            state = state
                .apply(select(position), &mut core, &mut observer)
                .expect("Failed to select");
        }

        assert!(matches!(
            state.stage(),
            Stage::Results { summary } if summary.score == 2
                && summary.termination == Termination::RoundLimit
        ));
    }

    // Tests the Rorschach screen precedes round one
    // Verified by entering the Lineup directly
    #[test]
    fn test_rorschach_protocol() {
        let mut core = GameCore::seeded(8);
        let mut observer = RecordingObserver::new();

        let rorschach = GameState::new()
            .apply(Event::Configure(config()), &mut core, &mut observer)
            .and_then(|s| s.apply(Event::Choose(Protocol::Rorschach), &mut core, &mut observer))
            .expect("Failed to enter rorschach");

        assert!(matches!(rorschach.stage(), Stage::Rorschach { screen } if screen.len() == 4));

        let lineup = rorschach
            .apply(Event::Continue, &mut core, &mut observer)
            .expect("Failed to continue");

        assert_eq!(lineup.round_key().map(|key| key.round), Some(1));
        assert_eq!(lineup.score(), 0);
    }

    // Tests events outside their stage are rejected
    // Verified by ignoring unexpected events
    #[test]
    fn test_invalid_transitions() {
        let mut core = GameCore::seeded(9);

        let setup = GameState::new();
        assert!(matches!(
            setup.apply(Event::Continue, &mut core, &mut ()),
            Err(GameError::InvalidTransition {
                stage: "setup",
                event: "continue"
            })
        ));
        assert!(setup.apply(select(1), &mut core, &mut ()).is_err());

        let selection = GameState::new()
            .apply(Event::Configure(config()), &mut core, &mut ())
            .expect("Failed to configure");
        assert!(selection.apply(Event::Restart, &mut core, &mut ()).is_err());
    }

    // Tests restart returns to a blank setup
    // Verified by carrying the score into the new session
    #[test]
    fn test_restart() {
        let mut core = GameCore::seeded(10);
        let mut observer = RecordingObserver::new();
        let state = started(config(), &mut core, &mut observer);
        let position = wrong_position(&state);

        let restarted = state
            .apply(select(position), &mut core, &mut observer)
            .and_then(|s| s.apply(Event::Restart, &mut core, &mut observer))
            .expect("Failed to restart");

        assert_eq!(restarted, GameState::new());
    }

    // Tests repeated reads of a round return the same screen
    // Verified by regenerating the plot set on read
    #[test]
    fn test_round_is_stable_between_reads() {
        let mut core = GameCore::seeded(11);
        let mut observer = RecordingObserver::new();
        let state = started(config(), &mut core, &mut observer);

        let first = state.lineup_round().cloned();
        let second = state.lineup_round().cloned();

        assert_eq!(first, second);
        assert_eq!(state.round_key(), first.map(|round| round.key()));
    }

    // Tests a failing observer leaves the session where it was
    // Verified by consuming the state on apply
    #[test]
    fn test_observer_failure_keeps_state() {
        let mut core = GameCore::seeded(12);
        let mut observer = RecordingObserver::new();
        let state = started(config(), &mut core, &mut observer);
        let before = state.clone();
        let position = true_position(&state);

        let result = state.apply(select(position), &mut core, &mut RejectingObserver);

        assert!(matches!(result, Err(GameError::Progression { .. })));
        assert_eq!(state, before);
        let resumed = state
            .apply(select(position), &mut core, &mut observer)
            .expect("Failed to select after a rejected event");
        assert_eq!(resumed.score(), 1);
    }
}
