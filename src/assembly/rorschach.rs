use crate::assembly::plot_set::PlotSet;
use crate::data::{Dataset, permute};
use crate::io::configuration::{GameConfig, validate_probability};
use crate::io::error::Result;
use crate::procedure::ProcedureRunner;
use rand::Rng;
use tracing::debug;

/// Build a Rorschach screen that contains the true dataset with probability `p`
///
/// The true dataset is generated at the initial noise level; difficulty never
/// escalates here. A Bernoulli draw decides whether it is shown. If not, all
/// `plot_count` plots are independent permutations. If so, `plot_count - 1`
/// permutations are drawn, the true dataset is inserted at a uniform position
/// and positions are renumbered to stay contiguous.
///
/// # Errors
///
/// Returns a configuration error if the configuration is invalid or
/// `inclusion_probability` lies outside [0, 1]
pub fn assemble_rorschach<R: Rng>(
    config: &GameConfig,
    inclusion_probability: f64,
    initial_noise_level: f64,
    runner: &mut ProcedureRunner,
    rng: &mut R,
) -> Result<PlotSet> {
    config.validate_screen()?;
    validate_probability(inclusion_probability)?;

    let truth = runner.generate(
        &config.generator,
        config.points_per_plot,
        initial_noise_level,
        rng,
    );
    let show_true = rng.random_bool(inclusion_probability);
    let plot_set = rorschach_from_truth(&truth, config.plot_count, show_true, rng);

    debug!(
        plots = plot_set.len(),
        show_true,
        true_position = plot_set.true_position(),
        "assembled rorschach screen"
    );
    Ok(plot_set)
}

/// Arrange decoys and (optionally) the true dataset into a screen
///
/// `plot_count` may be 1, in which case the screen holds either the true
/// dataset alone or a single decoy.
pub fn rorschach_from_truth<R: Rng>(
    truth: &Dataset,
    plot_count: usize,
    show_true: bool,
    rng: &mut R,
) -> PlotSet {
    let decoy_count = if show_true {
        plot_count.saturating_sub(1)
    } else {
        plot_count
    };
    let mut labeled: Vec<_> = (0..decoy_count)
        .map(|_| (permute(truth, rng), false))
        .collect();

    if show_true {
        let insert_at = rng.random_range(1..=plot_count.max(1));
        labeled.insert(insert_at - 1, (truth.clone(), true));
    }

    PlotSet::from_labeled(labeled)
}
