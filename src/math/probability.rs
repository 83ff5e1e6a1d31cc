use crate::io::configuration::TWO_SIDED_RELATIVE_TOLERANCE;
use crate::io::error::{Result, invalid_input, numerical_domain};
use crate::math::special::{ln_choose, regularized_incomplete_beta};
use ndarray::Array1;

/// Binomial distribution of successes in `n` independent trials
///
/// Every probability is evaluated in log space or through the regularized
/// incomplete beta function, so large `n` neither overflows nor underflows
/// to a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    /// Create a distribution with `n` trials and success probability `p`
    ///
    /// # Errors
    ///
    /// Returns `NumericalDomain` if `p` is not finite or lies outside `[0, 1]`
    pub fn new(n: u64, p: f64) -> Result<Self> {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(numerical_domain(
                "binomial distribution",
                &format!("success probability {p} is outside [0, 1]"),
            ));
        }
        Ok(Self { n, p })
    }

    /// Number of trials
    pub const fn trials(&self) -> u64 {
        self.n
    }

    /// Success probability of a single trial
    pub const fn probability(&self) -> f64 {
        self.p
    }

    /// Expected number of successes
    pub fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }

    /// Standard deviation of the number of successes
    pub fn std_dev(&self) -> f64 {
        (self.mean() * (1.0 - self.p)).sqrt()
    }

    /// P(X = k)
    pub fn pmf(&self, k: u64) -> f64 {
        if k > self.n {
            return 0.0;
        }
        // Degenerate distributions put all mass on one end
        if self.p <= 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p >= 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }

        let successes = k as f64;
        let failures = (self.n - k) as f64;
        let ln_pmf = successes.mul_add(self.p.ln(), failures * (-self.p).ln_1p())
            + ln_choose(self.n, k);
        ln_pmf.exp()
    }

    /// P(X ≤ k)
    pub fn cdf(&self, k: u64) -> f64 {
        if k >= self.n {
            return 1.0;
        }
        if self.p <= 0.0 {
            return 1.0;
        }
        if self.p >= 1.0 {
            return 0.0;
        }
        regularized_incomplete_beta(1.0 - self.p, (self.n - k) as f64, k as f64 + 1.0)
    }

    /// P(X ≥ k)
    pub fn sf(&self, k: u64) -> f64 {
        if k == 0 {
            return 1.0;
        }
        if k > self.n {
            return 0.0;
        }
        if self.p <= 0.0 {
            return 0.0;
        }
        if self.p >= 1.0 {
            return 1.0;
        }
        regularized_incomplete_beta(self.p, k as f64, (self.n - k + 1) as f64)
    }

    /// Probability of an outcome no more likely than `k`
    ///
    /// Sums P(X = j) over every `j` whose mass does not exceed P(X = k),
    /// allowing a small relative tolerance so outcomes tied with `k` count.
    pub fn two_sided(&self, k: u64) -> f64 {
        let threshold = self.pmf(k) * (1.0 + TWO_SIDED_RELATIVE_TOLERANCE);
        let total: f64 = (0..=self.n)
            .map(|j| self.pmf(j))
            .filter(|&mass| mass <= threshold)
            .sum();
        total.min(1.0)
    }

    /// Probability mass over the full support `0..=n`
    pub fn pmf_vector(&self) -> Array1<f64> {
        (0..=self.n).map(|k| self.pmf(k)).collect()
    }

    /// Gaussian interval `mean ± z·σ` snapped inwards to whole counts
    ///
    /// The lower bound is rounded up and the upper bound rounded down, then
    /// both are clamped to `[0, n]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `z` is negative or not finite
    pub fn normal_interval(&self, z: f64) -> Result<(u64, u64)> {
        if !z.is_finite() || z < 0.0 {
            return Err(invalid_input("z", &z, &"must be a finite, non-negative width"));
        }
        let mean = self.mean();
        let spread = z * self.std_dev();
        let n = self.n as f64;

        let low = (mean - spread).ceil().clamp(0.0, n) as u64;
        let high = (mean + spread).floor().clamp(0.0, n) as u64;
        Ok((low, high))
    }

    /// Total probability of `low..=high`
    ///
    /// Summed term by term so tiny masses do not cancel.
    pub fn interval_mass(&self, low: u64, high: u64) -> f64 {
        let high = high.min(self.n);
        if low > high {
            return 0.0;
        }
        let total: f64 = (low..=high).map(|k| self.pmf(k)).sum();
        total.min(1.0)
    }
}
