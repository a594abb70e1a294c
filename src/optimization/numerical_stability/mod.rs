//! numerical_stability — guarded scalar helpers for the acquisition layer.
//!
//! Purpose
//! -------
//! Collect the small numerical primitives the Expected Improvement
//! computation depends on, so that the acquisition code can assume
//! well-conditioned `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - Standard-normal density and CDF (`std_normal_pdf`, `std_normal_cdf`),
//!   the latter in complementary-error-function form for tail precision.
//! - A variance floor (`VARIANCE_FLOOR`, `clip_variance`) that turns zero,
//!   negative or `NaN` predictive variances into a tiny positive value.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`normal`] compare the erfc-based CDF with a reference
//!   normal distribution and check the lower tail and the variance guard.

pub mod normal;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::normal::{VARIANCE_FLOOR, clip_variance, std_normal_cdf, std_normal_pdf};

pub mod prelude {
    pub use super::normal::{VARIANCE_FLOOR, clip_variance, std_normal_cdf, std_normal_pdf};
}
