//! Error types and scenario context for bias calculations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all bias operations
#[derive(Debug)]
pub enum BiasError {
    /// An input violates the domain constraints on `n`, `n_e` or `n_a`
    ///
    /// Covers values that are out of range, negative, non-finite, or
    /// fractional where a whole count is required
    InvalidInput {
        /// Name of the offending input
        parameter: &'static str,
        /// Value as supplied by the caller
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A derived probability escaped `[0, 1]` or stopped being finite
    NumericalDomain {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// A line of a batch scenario file could not be parsed
    InvalidScenario {
        /// One-based line number in the scenario file
        line: usize,
        /// Description of what's wrong with the line
        reason: String,
    },

    /// A scenario failed; carries the label of the scenario
    Scenario {
        /// Label of the failing scenario
        label: String,
        /// Underlying error
        source: Box<BiasError>,
    },

    /// Failed to encode statistics as JSON
    Serialization {
        /// Underlying serializer error
        source: serde_json::Error,
    },

    /// Failed to encode or save a rendered figure
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for BiasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid input '{parameter}' = '{value}': {reason}")
            }
            Self::NumericalDomain { operation, reason } => {
                write!(f, "Numerical domain error in {operation}: {reason}")
            }
            Self::InvalidScenario { line, reason } => {
                write!(f, "Invalid scenario on line {line}: {reason}")
            }
            Self::Scenario { label, source } => {
                write!(f, "Scenario '{label}' failed: {source}")
            }
            Self::Serialization { source } => {
                write!(f, "Failed to serialize statistics: {source}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export figure to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for BiasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source } => Some(source),
            Self::Scenario { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convenience type alias for bias results
pub type Result<T> = std::result::Result<T, BiasError>;

impl BiasError {
    /// True for errors caused by the caller's inputs rather than the environment
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::InvalidInput { .. } | Self::InvalidScenario { .. } => true,
            Self::Scenario { source, .. } => source.is_invalid_input(),
            _ => false,
        }
    }
}

/// Attaches the label of the scenario being processed to an error
pub trait WithScenario<T> {
    /// Wrap any error in a [`BiasError::Scenario`] carrying `label`
    ///
    /// # Errors
    ///
    /// Propagates the original error wrapped with the scenario label
    fn with_scenario(self, label: &str) -> Result<T>;
}

impl<T, E> WithScenario<T> for std::result::Result<T, E>
where
    E: Into<BiasError>,
{
    fn with_scenario(self, label: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            // Keep the innermost label when scenarios nest
            error @ BiasError::Scenario { .. } => error,
            error => BiasError::Scenario {
                label: label.to_string(),
                source: Box::new(error),
            },
        })
    }
}

impl From<image::ImageError> for BiasError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageExport {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for BiasError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid input error
pub fn invalid_input(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> BiasError {
    BiasError::InvalidInput {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a numerical domain error
pub fn numerical_domain(operation: &'static str, reason: &impl ToString) -> BiasError {
    BiasError::NumericalDomain {
        operation,
        reason: reason.to_string(),
    }
}
