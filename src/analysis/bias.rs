//! Tail probabilities and the preference ratio of an appointment process

use crate::analysis::inputs::BiasInputs;
use crate::io::configuration::{INTERVAL_STD_DEVIATIONS, TWO_SIDED_RELATIVE_TOLERANCE};
use crate::io::error::{Result, numerical_domain};
use crate::math::probability::Binomial;
use crate::plot::figure::{Figure, PlotOptions};
use bitvec::vec::BitVec;
use clap::ValueEnum;
use ndarray::Array1;
use serde::Serialize;

/// Which tail of the fair-process distribution is summed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tail {
    /// P(X ≤ n_a): evidence that the group is under-appointed
    #[default]
    Lower,
    /// P(X ≥ n_a): evidence that the group is over-appointed
    Upper,
    /// Lower when `n_a ≤ n_e`, otherwise upper
    TowardObserved,
    /// Probability of any outcome no more likely than `n_a`
    TwoSided,
}

impl Tail {
    /// Replace [`Tail::TowardObserved`] with the concrete tail it selects
    pub fn resolve(self, inputs: &BiasInputs) -> Self {
        match self {
            Self::TowardObserved if inputs.actual() as f64 <= inputs.expected() => Self::Lower,
            Self::TowardObserved => Self::Upper,
            tail => tail,
        }
    }

    /// Label of the probability, as shown in tables and figures
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lower => "P(n ≤ n_a)",
            Self::Upper => "P(n ≥ n_a)",
            Self::TowardObserved => "P(n toward n_a)",
            Self::TwoSided => "P(two-sided)",
        }
    }
}

/// Outcome of a bias calculation
#[derive(Debug, Clone)]
pub struct BiasResult {
    /// Validated inputs
    pub inputs: BiasInputs,
    /// Tail that was summed, never [`Tail::TowardObserved`]
    pub tail: Tail,
    /// Probability of the observed count or one more extreme under a fair process
    pub tail_probability: f64,
    /// Preference ratio `B`; 1 is neutral, above 1 disfavours the group
    pub bias: f64,
    /// Gaussian 95% interval of appointments under a fair process
    pub expected_interval: (u64, u64),
    /// Gaussian 95% interval of appointments at the observed rate
    pub actual_interval: (u64, u64),
    /// Probability that future appointments at the observed rate look fair
    pub p_future: f64,
    /// P(X = k) for k in `0..=n` under the fair process
    pub expected_pmf: Array1<f64>,
    /// P(X = k) for k in `0..=n` at the observed rate
    pub actual_pmf: Array1<f64>,
}

impl BiasResult {
    /// Marks the counts whose mass makes up [`BiasResult::tail_probability`]
    pub fn tail_region(&self) -> BitVec {
        let actual = self.inputs.actual() as usize;
        match self.tail {
            Tail::Lower | Tail::TowardObserved => {
                (0..self.expected_pmf.len()).map(|k| k <= actual).collect()
            }
            Tail::Upper => (0..self.expected_pmf.len()).map(|k| k >= actual).collect(),
            Tail::TwoSided => {
                let observed = self.expected_pmf.get(actual).copied().unwrap_or(0.0);
                let threshold = observed * (1.0 + TWO_SIDED_RELATIVE_TOLERANCE);
                self.expected_pmf.iter().map(|&mass| mass <= threshold).collect()
            }
        }
    }

    /// Marks the counts inside the fair-process interval, as summed by `p_future`
    pub fn future_region(&self) -> BitVec {
        let (low, high) = self.expected_interval;
        (0..self.actual_pmf.len() as u64)
            .map(|k| (low..=high).contains(&k))
            .collect()
    }
}

/// Preference ratio of the group relative to everyone else
///
/// `B = [(n - n_a)/(n - n_e)] / [n_a / n_e]`, computed as
/// `n_e (n - n_a) / (n_a (n - n_e))`. A zero denominator gives infinity, or 1
/// when the numerator is zero as well (observation matches a degenerate
/// expectation).
pub fn preference_ratio(inputs: &BiasInputs) -> f64 {
    let n = inputs.total() as f64;
    let expected = inputs.expected();
    let actual = inputs.actual() as f64;

    let numerator = expected * (n - actual);
    let denominator = actual * (n - expected);
    if denominator > 0.0 {
        numerator / denominator
    } else if numerator > 0.0 {
        f64::INFINITY
    } else {
        1.0
    }
}

/// Computes bias statistics and figures for appointment outcomes
#[derive(Debug, Clone, Default)]
pub struct BiasCalculator {
    tail: Tail,
    plot_options: PlotOptions,
}

impl BiasCalculator {
    /// Create a calculator summing the given tail
    pub fn new(tail: Tail) -> Self {
        Self {
            tail,
            plot_options: PlotOptions::default(),
        }
    }

    /// Use the given options when plotting
    #[must_use]
    pub fn with_plot_options(mut self, plot_options: PlotOptions) -> Self {
        self.plot_options = plot_options;
        self
    }

    /// Tail summed by this calculator
    pub const fn tail(&self) -> Tail {
        self.tail
    }

    /// Compute the tail probability, preference ratio and distributions
    ///
    /// # Errors
    ///
    /// Returns `NumericalDomain` if a derived probability leaves `[0, 1]`
    pub fn calculate(&self, inputs: &BiasInputs) -> Result<BiasResult> {
        let n = inputs.total();
        let actual = inputs.actual();
        let fair = Binomial::new(n, inputs.f_expected())?;
        let observed = Binomial::new(n, inputs.f_actual())?;

        let tail = self.tail.resolve(inputs);
        let tail_probability = checked_probability(
            "tail probability",
            match tail {
                Tail::Upper => fair.sf(actual),
                Tail::TwoSided => fair.two_sided(actual),
                Tail::Lower | Tail::TowardObserved => fair.cdf(actual),
            },
        )?;

        let expected_interval = fair.normal_interval(INTERVAL_STD_DEVIATIONS)?;
        let actual_interval = observed.normal_interval(INTERVAL_STD_DEVIATIONS)?;
        let p_future = checked_probability(
            "future probability",
            observed.interval_mass(expected_interval.0, expected_interval.1),
        )?;
        let bias = preference_ratio(inputs);

        tracing::debug!(
            n,
            expected = inputs.expected(),
            actual,
            ?tail,
            tail_probability,
            bias,
            p_future,
            "calculated binomial bias"
        );

        Ok(BiasResult {
            inputs: *inputs,
            tail,
            tail_probability,
            bias,
            expected_interval,
            actual_interval,
            p_future,
            expected_pmf: fair.pmf_vector(),
            actual_pmf: observed.pmf_vector(),
        })
    }

    /// Lay out the two-panel figure of a result
    pub fn plot(&self, result: &BiasResult) -> Figure {
        Figure::from_result(result, &self.plot_options)
    }

    /// Calculate and plot in one step
    ///
    /// # Errors
    ///
    /// Propagates errors from [`BiasCalculator::calculate`]
    pub fn assess(&self, inputs: &BiasInputs) -> Result<(BiasResult, Figure)> {
        let result = self.calculate(inputs)?;
        let figure = self.plot(&result);
        Ok((result, figure))
    }
}

/// Calculate and plot the bias of `n_a` observed against `n_e` expected out of `n`
///
/// The lower tail is used when `tail` is `None`.
///
/// # Errors
///
/// Returns `InvalidInput` for inputs outside their domain and
/// `NumericalDomain` if a derived probability leaves `[0, 1]`
pub fn binomial_bias(
    n: u64,
    n_e: f64,
    n_a: u64,
    tail: Option<Tail>,
) -> Result<(BiasResult, Figure)> {
    let inputs = BiasInputs::from_counts(n, n_e, n_a)?;
    BiasCalculator::new(tail.unwrap_or_default()).assess(&inputs)
}

fn checked_probability(operation: &'static str, value: f64) -> Result<f64> {
    // Allow for rounding in sums of many terms
    const SLACK: f64 = 1e-9;
    if !value.is_finite() || !(-SLACK..=1.0 + SLACK).contains(&value) {
        return Err(numerical_domain(
            operation,
            &format!("probability {value} is outside [0, 1]"),
        ));
    }
    Ok(value.clamp(0.0, 1.0))
}
