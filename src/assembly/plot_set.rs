//! Labeled plot slots and the screens built from them

use crate::data::Dataset;
use serde::{Deserialize, Serialize};

/// One plot on a screen
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotSlot {
    /// 1-based position, unique within its plot set
    pub position: usize,
    /// Points drawn in this plot
    pub dataset: Dataset,
    /// Whether this is the unpermuted dataset
    pub is_true_pattern: bool,
}

/// Every plot on one screen, in position order
///
/// Built once per screen and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotSet {
    slots: Vec<PlotSlot>,
}

impl PlotSet {
    /// Number each dataset by its order, starting at 1
    pub fn from_labeled<I>(datasets: I) -> Self
    where
        I: IntoIterator<Item = (Dataset, bool)>,
    {
        let slots = datasets
            .into_iter()
            .enumerate()
            .map(|(index, (dataset, is_true_pattern))| PlotSlot {
                position: index + 1,
                dataset,
                is_true_pattern,
            })
            .collect();
        Self { slots }
    }

    /// Slots in position order
    pub fn slots(&self) -> &[PlotSlot] {
        &self.slots
    }

    /// Number of plots
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the screen has no plots
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at a 1-based position
    pub fn get(&self, position: usize) -> Option<&PlotSlot> {
        position
            .checked_sub(1)
            .and_then(|index| self.slots.get(index))
    }

    /// Position of the first true slot, if any
    pub fn true_position(&self) -> Option<usize> {
        self.slots
            .iter()
            .find(|slot| slot.is_true_pattern)
            .map(|slot| slot.position)
    }

    /// Number of slots marked true
    pub fn true_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_true_pattern).count()
    }

    /// Whether positions run 1..=len with no gaps or duplicates
    pub fn has_contiguous_positions(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(index, slot)| slot.position == index + 1)
    }
}
