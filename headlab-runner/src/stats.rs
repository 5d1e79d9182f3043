//! Statistics primitives for the correlation evaluator.
//!
//! Implements from first principles:
//! - Lanczos approximation for ln(Gamma)
//! - Regularized incomplete beta function (Lentz continued fraction)
//! - Student's t-distribution CDF
//! - Pearson correlation with a two-sided p-value (H0: rho = 0)
//!
//! The p-value comes from the exact t transform `t = r * sqrt((n-2)/(1-r^2))`
//! with n-2 degrees of freedom, which assumes bivariate normality. On daily
//! sentiment/return data that assumption is loose; treat the p-values as a
//! screening signal, not a literal false-positive probability.

// ─── Math primitives ─────────────────────────────────────────────────

/// Lanczos approximation for ln(Gamma(x)), g=7, n=9.
fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        // Reflection formula: Gamma(x) * Gamma(1-x) = pi / sin(pi*x)
        let log_pi = std::f64::consts::PI.ln();
        let sin_val = (std::f64::consts::PI * x).sin();
        if sin_val.abs() < 1e-300 {
            return f64::INFINITY;
        }
        return log_pi - sin_val.abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &c) in COEFFICIENTS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }

    let t = x + G + 0.5;
    let log_sqrt_2pi = (2.0 * std::f64::consts::PI).sqrt().ln();

    log_sqrt_2pi + (t.ln() * (x + 0.5)) - t + sum.ln()
}

/// Regularized incomplete beta function I_x(a, b) via continued fraction
/// (modified Lentz's algorithm).
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x == 1.0 {
        return 1.0;
    }

    // Symmetry relation for faster convergence when x is large
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(b, a, 1.0 - x);
    }

    // Prefix: x^a * (1-x)^b / (a * B(a,b))
    let ln_prefix = a * x.ln() + b * (1.0 - x).ln() - ln_gamma(a) - ln_gamma(b) + ln_gamma(a + b)
        - a.ln();
    let prefix = ln_prefix.exp();

    let max_iter = 200;
    let epsilon = 1e-14;
    let tiny = 1e-30;

    let mut c = 1.0_f64;
    let mut d = 1.0 - (a + b) * x / (a + 1.0);
    if d.abs() < tiny {
        d = tiny;
    }
    d = 1.0 / d;
    let mut f = d;

    for m in 1..=max_iter {
        let m_f64 = m as f64;

        // Even step
        let numerator_even =
            m_f64 * (b - m_f64) * x / ((a + 2.0 * m_f64 - 1.0) * (a + 2.0 * m_f64));

        d = 1.0 + numerator_even * d;
        if d.abs() < tiny {
            d = tiny;
        }
        c = 1.0 + numerator_even / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        f *= c * d;

        // Odd step
        let numerator_odd = -((a + m_f64) * (a + b + m_f64) * x)
            / ((a + 2.0 * m_f64) * (a + 2.0 * m_f64 + 1.0));

        d = 1.0 + numerator_odd * d;
        if d.abs() < tiny {
            d = tiny;
        }
        c = 1.0 + numerator_odd / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = c * d;
        f *= delta;

        if (delta - 1.0).abs() < epsilon {
            break;
        }
    }

    prefix * f
}

/// Student's t-distribution CDF: P(T <= t) for df degrees of freedom.
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if df <= 0.0 {
        return f64::NAN;
    }
    if t == 0.0 {
        return 0.5;
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }

    let x = df / (df + t * t);
    let ib = regularized_incomplete_beta(df / 2.0, 0.5, x);

    if t > 0.0 {
        1.0 - 0.5 * ib
    } else {
        0.5 * ib
    }
}

// ─── Pearson correlation ─────────────────────────────────────────────

/// Pearson correlation coefficient with a two-sided p-value under
/// H0: rho = 0.
///
/// Returns `(NaN, NaN)` instead of failing when the statistic is undefined:
/// fewer than 2 observations, mismatched lengths, or zero variance in either
/// input. With exactly 2 observations and a defined coefficient the p-value
/// is 1.0 (no degrees of freedom to test against). The coefficient is
/// clamped to [-1, 1] against floating-point drift; |r| = 1 yields p = 0.
///
/// The two inputs must be pair-wise aligned by position (the aligner's job).
pub fn pearson(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return (f64::NAN, f64::NAN);
    }

    let n_f = n as f64;
    let mean_x = xs.iter().sum::<f64>() / n_f;
    let mean_y = ys.iter().sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // Constant input: the coefficient is undefined, not an error
    if var_x < 1e-300 || var_y < 1e-300 {
        return (f64::NAN, f64::NAN);
    }

    let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);

    if n == 2 {
        return (r, 1.0);
    }
    if r.abs() >= 1.0 {
        return (r, 0.0);
    }

    let df = n_f - 2.0;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let p = 2.0 * (1.0 - t_cdf(t.abs(), df));
    (r, p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ln_gamma_matches_known_values() {
        // Gamma(5) = 24
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
        // Gamma(0.5) = sqrt(pi)
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn t_cdf_is_symmetric_around_zero() {
        for df in [1.0, 5.0, 30.0] {
            for t in [0.5, 1.0, 2.5] {
                let upper = t_cdf(t, df);
                let lower = t_cdf(-t, df);
                assert!((upper + lower - 1.0).abs() < 1e-10, "df={df} t={t}");
            }
        }
        assert_eq!(t_cdf(0.0, 10.0), 0.5);
    }

    #[test]
    fn t_cdf_matches_tabulated_values() {
        // t = 2.228, df = 10 is the 97.5th percentile
        assert!((t_cdf(2.228, 10.0) - 0.975).abs() < 1e-3);
        // t = 1.645, df -> large approaches the normal 95th percentile
        assert!((t_cdf(1.645, 1000.0) - 0.95).abs() < 2e-3);
    }

    #[test]
    fn perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let (r, p) = pearson(&xs, &ys);
        assert!((r - 1.0).abs() < 1e-12);
        assert_eq!(p, 0.0);

        let neg: Vec<f64> = ys.iter().map(|y| -y).collect();
        let (r, _) = pearson(&xs, &neg);
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_moderate_correlation() {
        // Reference values: r = 0.8, p ≈ 0.10405
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 5.0];
        let (r, p) = pearson(&xs, &ys);
        assert!((r - 0.8).abs() < 1e-12);
        assert!((p - 0.10405).abs() < 1e-3, "p was {p}");
    }

    #[test]
    fn fewer_than_two_observations_is_nan() {
        assert!(pearson(&[], &[]).0.is_nan());
        let (r, p) = pearson(&[1.0], &[2.0]);
        assert!(r.is_nan() && p.is_nan());
    }

    #[test]
    fn mismatched_lengths_is_nan() {
        let (r, p) = pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(r.is_nan() && p.is_nan());
    }

    #[test]
    fn zero_variance_is_nan_not_error() {
        let (r, p) = pearson(&[1.0, 1.0, 1.0], &[0.01, 0.02, -0.01]);
        assert!(r.is_nan() && p.is_nan());
    }

    #[test]
    fn two_observations_defined_r_p_is_one() {
        let (r, p) = pearson(&[1.0, 2.0], &[5.0, 3.0]);
        assert!((r + 1.0).abs() < 1e-12);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn symmetry_in_arguments() {
        let xs = [0.5, -0.2, 0.8, 0.1];
        let ys = [0.01, 0.02, -0.01, 0.03];
        let (r1, p1) = pearson(&xs, &ys);
        let (r2, p2) = pearson(&ys, &xs);
        assert!((r1 - r2).abs() < 1e-12);
        assert!((p1 - p2).abs() < 1e-12);
    }
}
