//! Estimate bias in appointment processes from the binomial distribution
//!
//! Given `n` appointments, the number `n_e` a group would expect under a fair
//! process and the number `n_a` it actually received, the crate computes how
//! likely an outcome at least as extreme would be by chance, the preference
//! ratio between the group and everyone else, and the probability that future
//! appointments at the observed rate would look fair. Results come with a
//! two-panel figure that can be saved as PNG or SVG.

#![forbid(unsafe_code)]

/// Bias statistics and the calculator
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Special functions and the binomial distribution
pub mod math;
/// Figure layout and rendering
pub mod plot;

pub use analysis::bias::{BiasCalculator, BiasResult, Tail, binomial_bias};
pub use analysis::inputs::{BiasInputs, Share};
pub use io::error::{BiasError, Result};
pub use plot::figure::{Figure, PlotOptions};
