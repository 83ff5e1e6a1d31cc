//! Tests for the binomial distribution: mass, tails, intervals

#[cfg(test)]
mod tests {
    use binomialbias::math::probability::Binomial;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn binomial(n: u64, p: f64) -> Binomial {
        Binomial::new(n, p).expect("valid distribution")
    }

    // Tests construction rejects probabilities outside [0, 1]
    // Verified by accepting NaN
    #[test]
    fn test_new_rejects_bad_probability() {
        assert!(Binomial::new(10, -0.1).is_err());
        assert!(Binomial::new(10, 1.1).is_err());
        assert!(Binomial::new(10, f64::NAN).is_err());
        assert!(Binomial::new(10, 0.0).is_ok());
        assert!(Binomial::new(10, 1.0).is_ok());
    }

    // Tests the mass function of a fair coin against exact values
    // Verified by swapping the success and failure exponents
    #[test]
    fn test_pmf_fair_coin() {
        let dist = binomial(10, 0.5);
        assert!((dist.pmf(0) - 1.0 / 1024.0).abs() < 1e-15);
        assert!((dist.pmf(5) - 252.0 / 1024.0).abs() < 1e-13);
        assert!(dist.pmf(11).abs() < f64::EPSILON);
    }

    // Tests degenerate distributions put all mass on one end
    // Verified by evaluating ln(0) in the log-space path
    #[test]
    fn test_degenerate_probabilities() {
        let never = binomial(5, 0.0);
        assert!((never.pmf(0) - 1.0).abs() < f64::EPSILON);
        assert!(never.pmf(1).abs() < f64::EPSILON);
        assert!((never.cdf(0) - 1.0).abs() < f64::EPSILON);
        assert!(never.sf(1).abs() < f64::EPSILON);

        let always = binomial(5, 1.0);
        assert!((always.pmf(5) - 1.0).abs() < f64::EPSILON);
        assert!(always.cdf(4).abs() < f64::EPSILON);
        assert!((always.sf(5) - 1.0).abs() < f64::EPSILON);
    }

    // Tests the lower tail of the default committee example
    // Verified by using I_p instead of I_{1-p}
    #[test]
    fn test_cdf_committee_example() {
        let dist = binomial(20, 0.5);
        assert!((dist.cdf(7) - 0.131_587_982).abs() < 1e-6);
        assert!((dist.cdf(20) - 1.0).abs() < f64::EPSILON);
        assert!((dist.cdf(25) - 1.0).abs() < f64::EPSILON);
    }

    // Tests the upper tail includes k itself
    // Verified by summing from k + 1
    #[test]
    fn test_sf_includes_k() {
        let dist = binomial(100, 0.3);
        assert!((dist.sf(45) - 0.001_085_746).abs() < 1e-8);
        assert!((dist.sf(0) - 1.0).abs() < f64::EPSILON);
        assert!(dist.sf(101).abs() < f64::EPSILON);
    }

    // Tests the two-sided probability counts tied outcomes on both sides
    // Verified by removing the relative tolerance
    #[test]
    fn test_two_sided_symmetric() {
        let dist = binomial(20, 0.5);
        assert!((dist.two_sided(7) - 0.263_175_964).abs() < 1e-6);
        assert!((dist.two_sided(10) - 1.0).abs() < 1e-12);
        assert!((dist.two_sided(7) - dist.two_sided(13)).abs() < 1e-12);
    }

    // Tests the interval snaps inwards and clamps to the support
    // Verified by rounding the lower bound down
    #[test]
    fn test_normal_interval() {
        assert_eq!(binomial(20, 0.5).normal_interval(2.0).ok(), Some((6, 14)));
        assert_eq!(binomial(10, 0.2).normal_interval(2.0).ok(), Some((0, 4)));
        assert_eq!(binomial(20, 0.0).normal_interval(2.0).ok(), Some((0, 0)));
        assert_eq!(binomial(20, 1.0).normal_interval(2.0).ok(), Some((20, 20)));
        assert!(binomial(20, 0.5).normal_interval(-1.0).is_err());
        assert!(binomial(20, 0.5).normal_interval(f64::INFINITY).is_err());
    }

    // Tests tiny interval masses are not lost to cancellation
    // Verified by computing the mass as cdf(high) - cdf(low - 1)
    #[test]
    fn test_interval_mass_tiny() {
        let dist = binomial(40, 1.0 / 40.0);
        let mass = dist.interval_mass(14, 26);
        assert!(mass > 0.0);
        assert!((mass - 4.683_285e-13).abs() / 4.683_285e-13 < 1e-5);
        assert!(dist.interval_mass(5, 3).abs() < f64::EPSILON);
    }

    // Tests random distributions for normalization and tail consistency
    // Verified by dropping the final term of pmf_vector
    #[test]
    fn test_random_distributions_consistent() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let n = rng.random_range(1..=400_u64);
            let p = rng.random_range(0.0..=1.0_f64);
            let dist = binomial(n, p);

            let total: f64 = dist.pmf_vector().sum();
            assert!((total - 1.0).abs() < 1e-9, "n={n} p={p}: mass {total}");

            let k = rng.random_range(0..=n);
            let lower = dist.cdf(k);
            let upper = dist.sf(k);
            assert!((0.0..=1.0).contains(&lower));
            assert!((0.0..=1.0).contains(&upper));
            // P(X ≤ k) + P(X ≥ k) counts P(X = k) twice
            assert!((lower + upper - 1.0 - dist.pmf(k)).abs() < 1e-9);

            let two_sided = dist.two_sided(k);
            assert!(two_sided >= dist.pmf(k) - 1e-15 && two_sided <= 1.0);
        }
    }

    // Tests large totals stay finite and normalized
    // Verified by evaluating the mass without logarithms
    #[test]
    fn test_large_total() {
        let dist = binomial(1_000_000, 0.3);
        assert!((dist.pmf_vector().sum() - 1.0).abs() < 1e-9);
        assert!((dist.cdf(300_000) - 0.5).abs() < 0.01);
        assert!(dist.cdf(290_000) < 1e-40);
    }
}
