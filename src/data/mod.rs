//! Point and dataset types plus the null-hypothesis permutation
//!
//! This module contains:
//! - Coordinate pairs and ordered datasets
//! - The y-axis permutation that produces decoy datasets

/// Coordinate pairs and ordered point sequences
pub mod dataset;
/// Marginal-preserving shuffles for null datasets
pub mod permutation;

pub use dataset::{DataPoint, Dataset};
pub use permutation::permute;
