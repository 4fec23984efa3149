//! Assembly of labeled plot sets for the Lineup and Rorschach protocols

/// Lineup screens with exactly one true plot
pub mod lineup;
/// Labeled slots and contiguous position bookkeeping
pub mod plot_set;
/// Rorschach screens with a Bernoulli-included true plot
pub mod rorschach;

pub use lineup::assemble_lineup;
pub use plot_set::{PlotSet, PlotSlot};
pub use rorschach::assemble_rorschach;
