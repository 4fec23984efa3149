//! Normal approximations used to judge observed rates against configured ones

use std::f64::consts::SQRT_2;

/// Abramowitz and Stegun 7.1.26 coefficients, highest order first
const ERF_COEFFICIENTS: [f64; 5] = [
    1.061_405_429,
    -1.453_152_027,
    1.421_413_741,
    -0.284_496_736,
    0.254_829_592,
];
const ERF_P: f64 = 0.327_591_1;

/// Error function, absolute error below 1.5e-7
pub fn erf(x: f64) -> f64 {
    let t = 1.0 / ERF_P.mul_add(x.abs(), 1.0);
    let polynomial = ERF_COEFFICIENTS
        .iter()
        .fold(0.0_f64, |acc, &c| acc.mul_add(t, c))
        * t;
    let magnitude = polynomial.mul_add(-(-x * x).exp(), 1.0);
    magnitude.copysign(x)
}

/// Standard normal cumulative distribution function
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// Two-sided p-value for observing `k` successes in `n` Bernoulli(`p`) trials
///
/// Uses the continuity-corrected normal approximation. Degenerate
/// probabilities (0 or 1) return 1 when `k` equals the only possible count
/// and 0 otherwise.
pub fn binomial_two_sided_p_value(n: usize, p: f64, k: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    let n_f64 = n as f64;
    let mean = n_f64 * p;
    let deviation = (k as f64 - mean).abs();
    let std_dev = (n_f64 * p * (1.0 - p)).sqrt();

    if std_dev <= 0.0 {
        return if deviation < 0.5 { 1.0 } else { 0.0 };
    }

    let z = (deviation - 0.5).max(0.0) / std_dev;
    (2.0 * (1.0 - normal_cdf(z))).clamp(0.0, 1.0)
}
