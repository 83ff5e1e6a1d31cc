//! Bias statistics: validated inputs, tail probabilities and summaries

/// Tail probabilities, preference ratio and the bias calculator
pub mod bias;
/// Validation of appointment counts and fractions
pub mod inputs;
/// Statistics table and JSON summary
pub mod summary;
