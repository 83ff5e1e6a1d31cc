//! Validation of appointment counts and fractions

use crate::io::configuration::MAX_TOTAL;
use crate::io::error::{BiasError, Result, invalid_input};
use num_traits::ToPrimitive;
use std::fmt;
use std::str::FromStr;

/// A group's share of the appointments, as a count or as a fraction of the total
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Share {
    /// Absolute number of appointments
    Count(f64),
    /// Fraction of the total number of appointments, in `[0, 1]`
    Fraction(f64),
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Fraction(fraction) => write!(f, "{fraction} of total"),
        }
    }
}

impl FromStr for Share {
    type Err = BiasError;

    /// Parses `"7"` as a count, `"0.35"` or `"35%"` as a fraction
    ///
    /// A value written with a decimal point is a fraction only when it lies
    /// strictly between 0 and 1; `"3.0"` is still a count.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent
                .trim()
                .parse()
                .map_err(|e| invalid_input("share", &s, &e))?;
            return Ok(Self::Fraction(value / 100.0));
        }

        let value: f64 = trimmed
            .parse()
            .map_err(|e| invalid_input("share", &s, &e))?;
        if trimmed.contains('.') && value > 0.0 && value < 1.0 {
            Ok(Self::Fraction(value))
        } else {
            Ok(Self::Count(value))
        }
    }
}

/// Validated inputs of a single bias calculation
///
/// Guarantees `n ≥ 1`, `0 ≤ expected ≤ n` and `actual ≤ n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasInputs {
    n: u64,
    expected: f64,
    actual: u64,
}

impl BiasInputs {
    /// Build inputs from shares of `n` appointments
    ///
    /// An expected fraction gives a possibly fractional expected count. An
    /// actual fraction is rounded to the nearest whole appointment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `n` is zero or above [`MAX_TOTAL`], a
    /// count is negative, not finite or exceeds `n`, a fraction lies outside
    /// `[0, 1]`, or the actual count is not a whole number
    pub fn new(n: u64, expected: Share, actual: Share) -> Result<Self> {
        check_total(n)?;
        let total = n as f64;

        let expected = match expected {
            Share::Count(count) => count,
            Share::Fraction(fraction) => check_fraction("f_e", fraction)? * total,
        };
        let actual = match actual {
            Share::Count(count) => whole_count("n_a", count)?,
            Share::Fraction(fraction) => {
                whole_count("n_a", (check_fraction("f_a", fraction)? * total).round())?
            }
        };

        Self::validated(n, expected, actual)
    }

    /// Build inputs from absolute counts
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` under the same conditions as [`BiasInputs::new`]
    pub fn from_counts(n: u64, expected: f64, actual: u64) -> Result<Self> {
        check_total(n)?;
        Self::validated(n, expected, actual)
    }

    /// Build inputs from raw numbers, as typed by a user
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `n` or `actual` is negative or fractional,
    /// in addition to the conditions of [`BiasInputs::new`]
    pub fn from_values(n: f64, expected: f64, actual: f64) -> Result<Self> {
        let total = whole_count("n", n)?;
        Self::new(total, Share::Count(expected), Share::Count(actual))
    }

    fn validated(n: u64, expected: f64, actual: u64) -> Result<Self> {
        if !expected.is_finite() {
            return Err(invalid_input("n_e", &expected, &"must be finite"));
        }
        if expected < 0.0 {
            return Err(invalid_input("n_e", &expected, &"must not be negative"));
        }
        if expected > n as f64 {
            return Err(invalid_input(
                "n_e",
                &expected,
                &format!("must not exceed the total number of appointments ({n})"),
            ));
        }
        if actual > n {
            return Err(invalid_input(
                "n_a",
                &actual,
                &format!("must not exceed the total number of appointments ({n})"),
            ));
        }
        Ok(Self {
            n,
            expected,
            actual,
        })
    }

    /// Total number of appointments
    pub const fn total(&self) -> u64 {
        self.n
    }

    /// Expected number of appointments of the group under a fair process
    pub const fn expected(&self) -> f64 {
        self.expected
    }

    /// Actual number of appointments of the group
    pub const fn actual(&self) -> u64 {
        self.actual
    }

    /// Expected fraction `f_e = n_e / n`, the null success probability
    pub fn f_expected(&self) -> f64 {
        self.expected / self.n as f64
    }

    /// Actual fraction `f_a = n_a / n`
    pub fn f_actual(&self) -> f64 {
        self.actual as f64 / self.n as f64
    }
}

/// Convert a user-supplied number into a whole count
///
/// # Errors
///
/// Returns `InvalidInput` if `value` is not finite, negative, fractional, or
/// too large to represent
pub fn whole_count(parameter: &'static str, value: f64) -> Result<u64> {
    if !value.is_finite() {
        return Err(invalid_input(parameter, &value, &"must be finite"));
    }
    if value < 0.0 {
        return Err(invalid_input(parameter, &value, &"must not be negative"));
    }
    if value.fract() > 0.0 {
        return Err(invalid_input(parameter, &value, &"must be a whole number"));
    }
    value
        .to_u64()
        .ok_or_else(|| invalid_input(parameter, &value, &"is too large"))
}

fn check_total(n: u64) -> Result<()> {
    if n == 0 {
        return Err(invalid_input(
            "n",
            &n,
            &"there must be at least one appointment",
        ));
    }
    if n > MAX_TOTAL {
        return Err(invalid_input(
            "n",
            &n,
            &format!("at most {MAX_TOTAL} appointments are supported"),
        ));
    }
    Ok(())
}

fn check_fraction(parameter: &'static str, fraction: f64) -> Result<f64> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(invalid_input(parameter, &fraction, &"must lie in [0, 1]"));
    }
    Ok(fraction)
}
