//! Parameter/value statistics table with significant-figure formatting

use crate::analysis::bias::{BiasResult, Tail};
use crate::io::configuration::SIGNIFICANT_FIGURES;
use crate::io::error::{BiasError, Result};
use serde::Serialize;
use std::fmt;

/// Format a number with a fixed number of significant figures
///
/// Mirrors the `%g` conversion: trailing zeros are dropped, and scientific
/// notation is used for exponents below -4 or at least `figures`.
pub fn format_significant(value: f64, figures: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value.abs() < f64::MIN_POSITIVE {
        return "0".to_string();
    }

    let figures = figures.max(1);
    // Rounding first settles the exponent, e.g. 9.996 -> 1.00e1
    let scientific = format!("{:.*e}", figures - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= figures as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction_zeros(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (figures as i32 - 1 - exponent).max(0) as usize;
        trim_fraction_zeros(&format!("{value:.decimals$}"))
    }
}

fn trim_fraction_zeros(number: &str) -> String {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        number.to_string()
    }
}

/// Headline statistics of a bias calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Total number of appointments
    pub n: u64,
    /// Expected appointments of the group under a fair process
    pub expected: f64,
    /// Actual appointments of the group
    pub actual: u64,
    /// Expected fraction of appointments
    pub f_expected: f64,
    /// Actual fraction of appointments
    pub f_actual: f64,
    /// Lower bound of the 95% interval under a fair process
    pub expected_low: u64,
    /// Upper bound of the 95% interval under a fair process
    pub expected_high: u64,
    /// Tail the probability was summed over
    pub tail: Tail,
    /// Tail probability of the actual count
    pub tail_probability: f64,
    /// Preference ratio; serialized as `null` when infinite
    pub bias: f64,
    /// Probability that future appointments at the actual rate look fair
    pub p_future: f64,
}

impl From<&BiasResult> for Summary {
    fn from(result: &BiasResult) -> Self {
        let (expected_low, expected_high) = result.expected_interval;
        Self {
            n: result.inputs.total(),
            expected: result.inputs.expected(),
            actual: result.inputs.actual(),
            f_expected: result.inputs.f_expected(),
            f_actual: result.inputs.f_actual(),
            expected_low,
            expected_high,
            tail: result.tail,
            tail_probability: result.tail_probability,
            bias: result.bias,
            p_future: result.p_future,
        }
    }
}

impl Summary {
    /// Parameter names paired with their formatted values
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let sig = |value: f64| format_significant(value, SIGNIFICANT_FIGURES);
        vec![
            ("n", self.n.to_string()),
            ("expected", sig(self.expected)),
            ("actual", self.actual.to_string()),
            ("f_expected", sig(self.f_expected)),
            ("f_actual", sig(self.f_actual)),
            ("expected_low", self.expected_low.to_string()),
            ("expected_high", self.expected_high.to_string()),
            (self.tail.label(), sig(self.tail_probability)),
            ("bias", sig(self.bias)),
            ("p_future", sig(self.p_future)),
        ]
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the summary cannot be encoded
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| BiasError::Serialization { source })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let width = rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .chain(std::iter::once("Parameter".len()))
            .max()
            .unwrap_or(0);

        writeln!(f, "{:<width$}  Value", "Parameter")?;
        for (name, value) in &rows {
            // Pad by characters so labels with ≤ and ≥ stay aligned
            let padding = width - name.chars().count();
            writeln!(f, "{name}{:padding$}  {value}", "")?;
        }
        Ok(())
    }
}
