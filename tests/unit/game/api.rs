//! Tests for the boundary operations of the game core

#[cfg(test)]
mod tests {
    use lineup::game::GameCore;
    use lineup::io::configuration::GameConfig;

    fn config() -> GameConfig {
        GameConfig {
            plot_count: 5,
            points_per_plot: 10,
            ..GameConfig::default()
        }
    }

    // Tests a Lineup round hides the truth at the requested position
    // Verified by drawing the position inside the core
    #[test]
    fn test_generate_lineup_round() {
        let mut core = GameCore::seeded(1);

        let plot_set = core
            .generate_lineup_round(&config(), 5, 0.3)
            .expect("Failed to generate round");

        assert_eq!(plot_set.len(), 5);
        assert_eq!(plot_set.true_position(), Some(5));
        assert!(!core.runner().used_fallback());
    }

    // Tests a Rorschach screen honors the given probability
    // Verified by reading the probability from the configuration
    #[test]
    fn test_generate_rorschach_screen() {
        let mut core = GameCore::seeded(2);
        let config = GameConfig {
            rorschach_inclusion_probability: 1.0,
            ..config()
        };

        let plot_set = core
            .generate_rorschach_screen(&config, 0.0)
            .expect("Failed to generate screen");

        assert_eq!(plot_set.true_count(), 0);
        assert_eq!(plot_set.len(), 5);
    }

    // Tests a single-plot Rorschach screen is accepted for both branches
    // Verified by requiring two plots for every screen
    #[test]
    fn test_single_plot_rorschach_screen() {
        let mut core = GameCore::seeded(3);
        let config = GameConfig {
            plot_count: 1,
            ..config()
        };

        let hidden = core
            .generate_rorschach_screen(&config, 0.0)
            .expect("Failed to generate screen without the truth");
        let shown = core
            .generate_rorschach_screen(&config, 1.0)
            .expect("Failed to generate screen with the truth");

        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden.true_count(), 0);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown.true_position(), Some(1));
        assert!(core.generate_lineup_round(&config, 1, 0.0).is_err());
    }

    // Tests progression delegates to the configured procedure
    // Verified by ignoring the configured procedure
    #[test]
    fn test_advance_noise_level() {
        let mut core = GameCore::seeded(3);
        let default_config = config();
        let doubling = GameConfig {
            progression: Some("fn update(level) { level * 2.0 }".to_string()),
            ..config()
        };
        let broken = GameConfig {
            progression: Some("fn update(level) { throw 1; }".to_string()),
            ..config()
        };

        assert!((core.advance_noise_level(&default_config, 0.5) - 0.6).abs() < 1e-12);
        assert!((core.advance_noise_level(&doubling, 0.5) - 1.0).abs() < 1e-12);
        assert!((core.advance_noise_level(&broken, 0.5) - 0.55).abs() < 1e-12);
        assert!(core.progressor().last_error().is_some());
    }

    // Tests drawn positions cover the full range
    // Verified by drawing from 0..plot_count
    #[test]
    fn test_draw_true_position_range() {
        let mut core = GameCore::seeded(4);
        let mut seen = [false; 4];

        for _ in 0..400 {
            let position = core.draw_true_position(4);
            assert!((1..=4).contains(&position));
            if let Some(flag) = seen.get_mut(position - 1) {
                *flag = true;
            }
        }

        assert!(seen.iter().all(|&flag| flag));
    }

    // Tests equal seeds reproduce identical screens
    // Verified by seeding one core differently
    #[test]
    fn test_seeded_cores_reproduce_screens() {
        let mut first = GameCore::seeded(99);
        let mut second = GameCore::seeded(99);

        for _ in 0..3 {
            let a = first
                .generate_lineup_round(&config(), 2, 0.4)
                .expect("Failed to generate round");
            let b = second
                .generate_lineup_round(&config(), 2, 0.4)
                .expect("Failed to generate round");
            assert_eq!(a, b);
        }
    }
}
