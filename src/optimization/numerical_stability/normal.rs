//! Standard-normal helpers and variance guards for the EI acquisition.
//!
//! Provides the density and cumulative distribution of the standard
//! normal in the exact form the acquisition function relies on:
//!
//! - [`std_normal_pdf`]: `φ(u) = exp(−u²/2) / √(2π)`.
//! - [`std_normal_cdf`]: `Φ(u) = 0.5 · erfc(−u/√2)`. The complementary
//!   error function keeps full relative precision deep in the lower tail,
//!   where `1 − 0.5·erfc(u/√2)` would cancel to zero.
//! - [`VARIANCE_FLOOR`] and [`clip_variance`]: guard against zero or
//!   slightly negative predictive variances coming out of a surrogate.
use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Lower clip applied to predictive variances before taking square roots.
pub const VARIANCE_FLOOR: f64 = 1e-10;

/// Standard normal density `φ(u)`.
pub fn std_normal_pdf(u: f64) -> f64 {
    (-0.5 * u * u).exp() / (2.0 * PI).sqrt()
}

/// Standard normal CDF `Φ(u)` in complementary-error-function form.
pub fn std_normal_cdf(u: f64) -> f64 {
    0.5 * erfc(-u * FRAC_1_SQRT_2)
}

/// Clip a variance to `[VARIANCE_FLOOR, ∞)`.
///
/// `NaN` inputs are mapped to the floor as well, so downstream square
/// roots and divisions always see a strictly positive value.
pub fn clip_variance(v: f64) -> f64 {
    if v >= VARIANCE_FLOOR { v } else { VARIANCE_FLOOR }
}
