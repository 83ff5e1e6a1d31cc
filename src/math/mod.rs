//! Mathematical utilities for the bias calculation

/// Binomial distribution: mass, cumulative and tail probabilities
pub mod probability;
/// Log-gamma and regularized incomplete beta functions
pub mod special;
