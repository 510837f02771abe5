//! `f64` special functions behind the gamma-family primitives.
//!
//! Γ, ln Γ and erfc come from `libm`; the polygamma functions use upward
//! recurrence into the asymptotic series.

use std::f64::consts::PI;

/// Arguments are shifted up to this bound before the asymptotic series.
const ASYMPTOTIC_FROM: f64 = 10.0;

#[inline]
fn is_pole(x: f64) -> bool {
    x <= 0.0 && x == x.floor()
}

/// ln Γ(x), NaN where Γ(x) is negative.
pub(crate) fn lgamma(x: f64) -> f64 {
    let (v, sign) = libm::lgamma_r(x);
    if sign < 0 {
        f64::NAN
    } else {
        v
    }
}

pub(crate) fn gamma(x: f64) -> f64 {
    libm::tgamma(x)
}

/// Multivariate log-gamma `ln Γ_k(x) = k(k-1)/4 ln π + Σ_j ln Γ(x + (1-j)/2)`.
pub(crate) fn mlgamma(x: f64, k: u32) -> f64 {
    let kf = f64::from(k);
    let mut r = kf * (kf - 1.0) / 4.0 * PI.ln();
    for j in half_steps(k) {
        r += libm::lgamma(x + j);
    }
    r
}

/// Offsets `(1 - j)/2` for `j = 1..=k`.
pub(crate) fn half_steps(k: u32) -> impl Iterator<Item = f64> {
    (0..k).map(|j| -f64::from(j) / 2.0)
}

/// ψ(x) = Γ'(x)/Γ(x). NaN at the poles.
pub(crate) fn digamma(x: f64) -> f64 {
    if is_pole(x) {
        return f64::NAN;
    }
    if x < 0.0 {
        // reflection: ψ(x) = ψ(1 - x) - π cot(πx)
        return digamma(1.0 - x) - PI / (PI * x).tan();
    }
    let (mut x, mut acc) = (x, 0.0);
    while x < ASYMPTOTIC_FROM {
        acc -= 1.0 / x;
        x += 1.0;
    }
    let z = 1.0 / (x * x);
    acc + x.ln()
        - 0.5 / x
        - z * (1.0 / 12.0 - z * (1.0 / 120.0 - z * (1.0 / 252.0 - z * (1.0 / 240.0 - z / 132.0))))
}

/// ψ₁(x), the derivative of [`digamma`]. NaN at the poles.
pub(crate) fn trigamma(x: f64) -> f64 {
    if is_pole(x) {
        return f64::NAN;
    }
    if x < 0.0 {
        // reflection: ψ₁(x) + ψ₁(1 - x) = π² / sin²(πx)
        let s = (PI * x).sin();
        return PI * PI / (s * s) - trigamma(1.0 - x);
    }
    let (mut x, mut acc) = (x, 0.0);
    while x < ASYMPTOTIC_FROM {
        acc += 1.0 / (x * x);
        x += 1.0;
    }
    let z = 1.0 / (x * x);
    acc + 1.0 / x
        + 0.5 * z
        + z / x
            * (1.0 / 6.0 - z * (1.0 / 30.0 - z * (1.0 / 42.0 - z * (1.0 / 30.0 - z * 5.0 / 66.0))))
}

/// ln erfc(x) without underflow for large `x`.
pub(crate) fn log_erfc(x: f64) -> f64 {
    if x.abs() < 0.5 {
        (-libm::erf(x)).ln_1p()
    } else if x < 26.0 {
        libm::erfc(x).ln()
    } else {
        // erfc(x) = e^{-x²}/(x√π) · (1 + Σ_k (-1)^k (2k-1)!! / (2x²)^k)
        let w = 1.0 / (2.0 * x * x);
        let (mut term, mut sum) = (1.0, 0.0);
        for k in 1..=6 {
            term *= -f64::from(2 * k - 1) * w;
            sum += term;
        }
        -x * x - (x * PI.sqrt()).ln() + sum.ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn digamma_reference_values() {
        // ψ(1) = -γ
        assert_relative_eq!(digamma(1.0), -0.577_215_664_901_532_9, max_relative = 1e-13);
        assert_relative_eq!(digamma(0.5), -1.963_510_026_021_423_5, max_relative = 1e-13);
        assert_relative_eq!(digamma(-0.5), 0.036_489_973_978_576_5, max_relative = 1e-11);
        assert!(digamma(-2.0).is_nan());
    }

    #[test]
    fn trigamma_reference_values() {
        // ψ₁(1) = π²/6
        assert_relative_eq!(trigamma(1.0), PI * PI / 6.0, max_relative = 1e-13);
        assert_relative_eq!(trigamma(0.5), PI * PI / 2.0, max_relative = 1e-13);
        assert!(trigamma(0.0).is_nan());
    }

    #[test]
    fn log_erfc_branches_agree() {
        for &x in &[-3.0, -0.2, 0.0, 0.3, 1.7, 9.0] {
            assert_relative_eq!(log_erfc(x), libm::erfc(x).ln(), epsilon = 1e-15, max_relative = 1e-13);
        }
        // continuity across the asymptotic switch
        let (lo, hi) = (log_erfc(25.999_999), log_erfc(26.0));
        assert_relative_eq!(lo, hi, max_relative = 1e-6);
        assert!(log_erfc(40.0).is_finite());
    }

    #[test]
    fn lgamma_is_nan_where_gamma_is_negative() {
        assert_relative_eq!(lgamma(5.0), 24.0_f64.ln(), max_relative = 1e-14);
        assert!(lgamma(-0.5).is_nan());
        assert!(lgamma(-1.5).is_finite());
    }

    #[test]
    fn mlgamma_of_one_is_lgamma() {
        assert_relative_eq!(mlgamma(3.2, 1), libm::lgamma(3.2), max_relative = 1e-15);
        // Γ_2(x) = √π Γ(x) Γ(x - 1/2)
        let expected = 0.5 * PI.ln() + libm::lgamma(3.2) + libm::lgamma(2.7);
        assert_relative_eq!(mlgamma(3.2, 2), expected, max_relative = 1e-14);
    }
}
