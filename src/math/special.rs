use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

const BETA_CF_EPSILON: f64 = 1e-15;
const BETA_CF_TINY: f64 = 1e-300;
const BETA_CF_MAX_ITERATIONS: usize = 10_000;

/// Natural logarithm of the gamma function for `x > 0`
///
/// Lanczos approximation (g = 7, nine coefficients) with the reflection
/// formula below one half. Relative error is around 1e-15 across the range
/// used for binomial coefficients.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        return PI.ln() - (PI * x).sin().abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let (head, tail) = LANCZOS_COEFFICIENTS.split_at(1);
    let series = tail
        .iter()
        .enumerate()
        .fold(head.first().copied().unwrap_or(1.0), |acc, (i, &c)| {
            acc + c / (x + i as f64 + 1.0)
        });
    let t = x + LANCZOS_G + 0.5;

    0.5f64.mul_add((2.0 * PI).ln(), (x + 0.5) * t.ln()) - t + series.ln()
}

/// Natural logarithm of the binomial coefficient `C(n, k)`
///
/// Returns negative infinity when `k > n`. Exact zero for the trivial
/// coefficients so that the edges of a distribution stay exact.
pub fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0 || k == n {
        return 0.0;
    }
    let n = n as f64;
    let k = k as f64;
    ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
}

/// Natural logarithm of the beta function `B(a, b)`
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Regularized incomplete beta function `I_x(a, b)` for `a, b > 0`
///
/// Evaluated with the modified Lentz continued fraction, switching to the
/// symmetry `I_x(a, b) = 1 - I_{1-x}(b, a)` past the mean so the fraction
/// converges quickly. Values of `x` outside `[0, 1]` are clamped.
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(1.0 - x, b, a);
    }

    // x^a (1-x)^b / (a B(a, b)), in log space
    let ln_prefactor = a.mul_add(x.ln(), b * (1.0 - x).ln()) - ln_beta(a, b) - a.ln();

    (ln_prefactor.exp() * beta_continued_fraction(x, a, b)).clamp(0.0, 1.0)
}

fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let guard = |v: f64| if v.abs() < BETA_CF_TINY { BETA_CF_TINY } else { v };

    let mut c = 1.0_f64;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=BETA_CF_MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(aa.mul_add(d, 1.0));
        c = guard(1.0 + aa / c);
        h *= d * c;

        // Odd step
        let aa = -((a + m) * (qab + m) * x) / ((a + m2) * (qap + m2));
        d = 1.0 / guard(aa.mul_add(d, 1.0));
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < BETA_CF_EPSILON {
            return h;
        }
    }

    tracing::warn!(
        x,
        a,
        b,
        iterations = BETA_CF_MAX_ITERATIONS,
        "incomplete beta continued fraction did not converge"
    );
    h
}
