//! Tests for Rorschach screen assembly

#[cfg(test)]
mod tests {
    use lineup::GameError;
    use lineup::assembly::assemble_rorschach;
    use lineup::assembly::rorschach::rorschach_from_truth;
    use lineup::data::Dataset;
    use lineup::io::configuration::GameConfig;
    use lineup::procedure::ProcedureRunner;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const NOISE_AS_Y: &str = r"
fn generate(n, noise) {
    let points = [];
    for i in 0..n {
        points.push([i.to_float(), noise]);
    }
    points
}
";

    fn config(plot_count: usize) -> GameConfig {
        GameConfig {
            plot_count,
            points_per_plot: 6,
            ..GameConfig::with_generator(NOISE_AS_Y)
        }
    }

    fn truth() -> Dataset {
        Dataset::from_columns(&[0.0, 1.0, 2.0, 3.0], &[5.0, 6.0, 7.0, 8.0])
    }

    // Tests probability zero never shows the truth
    // Verified by drawing with probability one
    #[test]
    fn test_probability_zero_excludes_truth() {
        let mut runner = ProcedureRunner::new();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            let plot_set = assemble_rorschach(&config(4), 0.0, 0.5, &mut runner, &mut rng)
                .expect("Failed to assemble");
            assert_eq!(plot_set.true_count(), 0);
            assert_eq!(plot_set.len(), 4);
            assert!(plot_set.has_contiguous_positions());
        }
    }

    // Tests probability one always shows exactly one truth
    // Verified by appending the truth after all decoys
    #[test]
    fn test_probability_one_includes_truth() {
        let mut runner = ProcedureRunner::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut positions = std::collections::HashSet::new();

        for _ in 0..200 {
            let plot_set = assemble_rorschach(&config(4), 1.0, 0.5, &mut runner, &mut rng)
                .expect("Failed to assemble");
            assert_eq!(plot_set.true_count(), 1);
            assert_eq!(plot_set.len(), 4);
            assert!(plot_set.has_contiguous_positions());
            positions.extend(plot_set.true_position());
        }

        assert_eq!(positions.len(), 4, "truth landed only at {positions:?}");
    }

    // Tests the empirical inclusion rate tracks the probability
    // Verified by inverting the Bernoulli draw
    #[test]
    fn test_inclusion_rate_matches_probability() {
        let mut runner = ProcedureRunner::new();
        let mut rng = StdRng::seed_from_u64(3);
        let screens = 2_000;

        let included = (0..screens)
            .filter(|_| {
                assemble_rorschach(&config(3), 0.3, 0.5, &mut runner, &mut rng)
                    .is_ok_and(|plot_set| plot_set.true_count() == 1)
            })
            .count();

        let rate = included as f64 / f64::from(screens);
        assert!((rate - 0.3).abs() < 0.05, "observed rate {rate}");
    }

    // Tests the truth is generated at the initial noise level
    // Verified by passing the current round noise instead
    #[test]
    fn test_generated_at_initial_noise() {
        let mut runner = ProcedureRunner::new();
        let mut rng = StdRng::seed_from_u64(4);

        let plot_set = assemble_rorschach(&config(3), 1.0, 0.75, &mut runner, &mut rng)
            .expect("Failed to assemble");

        for slot in plot_set.slots() {
            assert!(slot.dataset.ys().iter().all(|y| (y - 0.75).abs() < f64::EPSILON));
        }
    }

    // Tests out-of-range probabilities are configuration errors
    // Verified by clamping the probability
    #[test]
    fn test_invalid_probability_rejected() {
        let mut runner = ProcedureRunner::new();
        let mut rng = StdRng::seed_from_u64(5);

        for probability in [-0.1, 1.1, f64::NAN] {
            let result = assemble_rorschach(&config(3), probability, 0.5, &mut runner, &mut rng);
            assert!(matches!(result, Err(GameError::Configuration { .. })));
        }
    }

    // Tests a single-plot screen holds either the truth or one decoy
    // Verified by adding a decoy alongside the truth
    #[test]
    fn test_single_plot_screen() {
        let mut rng = StdRng::seed_from_u64(6);

        let shown = rorschach_from_truth(&truth(), 1, true, &mut rng);
        let hidden = rorschach_from_truth(&truth(), 1, false, &mut rng);

        assert_eq!(shown.len(), 1);
        assert_eq!(shown.true_position(), Some(1));
        assert_eq!(shown.get(1).map(|slot| &slot.dataset), Some(&truth()));
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden.true_count(), 0);
    }

    // Tests decoys keep the true xs
    // Verified by permuting xs as well
    #[test]
    fn test_decoys_share_true_xs() {
        let mut rng = StdRng::seed_from_u64(7);

        let plot_set = rorschach_from_truth(&truth(), 5, false, &mut rng);

        assert!(plot_set.slots().iter().all(|slot| slot.dataset.xs() == truth().xs()));
    }
}
