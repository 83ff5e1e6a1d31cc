//! Input/output: configuration, errors, command line and file export

/// Command-line parsing and the runner for single and batch calculations
pub mod cli;
/// Statistical constants and runtime defaults
pub mod configuration;
/// Error types and scenario context
pub mod error;
/// Figure export to PNG and SVG
pub mod image;
/// Progress bars for batches of scenarios
pub mod progress;
/// Batch scenario files and manuscript presets
pub mod scenarios;
