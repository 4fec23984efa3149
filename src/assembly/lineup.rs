use crate::assembly::plot_set::PlotSet;
use crate::data::permute;
use crate::io::configuration::GameConfig;
use crate::io::error::{Result, invalid_parameter};
use crate::procedure::ProcedureRunner;
use rand::Rng;
use tracing::debug;

/// Build a Lineup screen with the true dataset at `true_position`
///
/// One dataset is generated at `noise_level`; every other position receives
/// its own independent permutation of it.
///
/// # Errors
///
/// Returns a configuration error if the configuration is invalid or
/// `true_position` lies outside `1..=plot_count`. Generator failures never
/// surface here; they are absorbed by the runner.
pub fn assemble_lineup<R: Rng>(
    config: &GameConfig,
    true_position: usize,
    noise_level: f64,
    runner: &mut ProcedureRunner,
    rng: &mut R,
) -> Result<PlotSet> {
    config.validate()?;
    if !(1..=config.plot_count).contains(&true_position) {
        return Err(invalid_parameter(
            "true_position",
            &true_position,
            &format!("must lie in 1..={}", config.plot_count),
        ));
    }

    let truth = runner.generate(&config.generator, config.points_per_plot, noise_level, rng);
    let plot_set = PlotSet::from_labeled((1..=config.plot_count).map(|position| {
        if position == true_position {
            (truth.clone(), true)
        } else {
            (permute(&truth, rng), false)
        }
    }));

    debug!(
        plots = plot_set.len(),
        true_position,
        noise_level,
        fallback = runner.used_fallback(),
        "assembled lineup"
    );
    Ok(plot_set)
}
