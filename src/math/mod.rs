//! Mathematical utilities for calibration reports

/// Normal approximations for binomial tail probabilities
pub mod probability;
