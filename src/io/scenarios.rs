//! Named bias scenarios, from batch files or the manuscript presets

use crate::analysis::inputs::{BiasInputs, Share};
use crate::io::error::{BiasError, Result, WithScenario};
use std::path::{Component, Path};

/// One labelled set of inputs
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Name used for output files and error messages
    pub label: String,
    /// Total number of appointments
    pub n: u64,
    /// Expected share of the group
    pub expected: Share,
    /// Actual share of the group
    pub actual: Share,
}

impl Scenario {
    /// Create a scenario
    pub fn new(label: impl Into<String>, n: u64, expected: Share, actual: Share) -> Self {
        Self {
            label: label.into(),
            n,
            expected,
            actual,
        }
    }

    /// Validate the scenario's inputs
    ///
    /// # Errors
    ///
    /// Returns the `InvalidInput` error of [`BiasInputs::new`], wrapped with the label
    pub fn to_inputs(&self) -> Result<BiasInputs> {
        BiasInputs::new(self.n, self.expected, self.actual).with_scenario(&self.label)
    }
}

/// The six figures of the manuscript
///
/// Coin toss, die roll, then sexism and racism among venture capitalists and
/// in the combined data set.
pub fn paper_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("coin", 10, Share::Fraction(0.5), Share::Count(2.0)),
        Scenario::new("die", 12, Share::Fraction(1.0 / 6.0), Share::Count(2.0)),
        Scenario::new("vc-sexism", 40, Share::Fraction(0.5), Share::Count(13.0)),
        Scenario::new("vc-racism", 40, Share::Fraction(0.5), Share::Count(1.0)),
        Scenario::new("combined-sexism", 39, Share::Fraction(0.5), Share::Count(19.0)),
        Scenario::new("combined-racism", 38, Share::Fraction(0.38), Share::Count(2.0)),
    ]
}

/// Parse scenarios written one per line as `label n expected actual`
///
/// Blank lines and everything after `#` are ignored. `expected` and `actual`
/// follow the [`Share`] syntax. Labels name output files, so they must be a
/// plain file stem.
///
/// # Errors
///
/// Returns `InvalidScenario` with the one-based line number of the first
/// malformed line, including labels with path separators or `..`
pub fn parse_scenarios(text: &str) -> Result<Vec<Scenario>> {
    let mut scenarios = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let [label, n, expected, actual] = fields.as_slice() else {
            return Err(BiasError::InvalidScenario {
                line,
                reason: format!(
                    "expected 4 fields `label n expected actual`, found {}",
                    fields.len()
                ),
            });
        };

        check_label(line, label)?;
        let n = n.parse::<u64>().map_err(|e| BiasError::InvalidScenario {
            line,
            reason: format!("total '{n}' is not a whole number: {e}"),
        })?;
        let share = |name: &str, value: &str| {
            value
                .parse::<Share>()
                .map_err(|e| BiasError::InvalidScenario {
                    line,
                    reason: format!("{name} '{value}': {e}"),
                })
        };

        scenarios.push(Scenario::new(
            *label,
            n,
            share("expected", expected)?,
            share("actual", actual)?,
        ));
    }

    Ok(scenarios)
}

// A label must stay inside the output directory once joined to it
fn check_label(line: usize, label: &str) -> Result<()> {
    let mut components = Path::new(label).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !label.contains(['/', '\\']);

    if plain {
        Ok(())
    } else {
        Err(BiasError::InvalidScenario {
            line,
            reason: format!("label '{label}' must be a file name without directories"),
        })
    }
}

/// Read and parse a batch scenario file
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read, or the errors of
/// [`parse_scenarios`]
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let text = std::fs::read_to_string(path).map_err(|e| BiasError::FileSystem {
        path: path.to_path_buf(),
        operation: "read scenarios",
        source: e,
    })?;
    let scenarios = parse_scenarios(&text)?;
    tracing::debug!(path = %path.display(), count = scenarios.len(), "loaded scenarios");
    Ok(scenarios)
}
