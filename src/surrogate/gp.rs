//! surrogate::gp — fixed-hyperparameter Gaussian process surrogate.
//!
//! Purpose
//! -------
//! Provide a compact Gaussian process regression model implementing
//! [`SurrogateModel`], with analytic predictive gradients, so the batch
//! selector can be driven end-to-end without an external modelling
//! library.
//!
//! Key behaviors
//! -------------
//! - Isotropic squared-exponential kernel
//!   `k(x, x') = σ² · exp(−‖x − x'‖² / (2ℓ²))`.
//! - Outputs are centred on their sample mean, which acts as the constant
//!   prior mean; the kernel matrix `K + (σₙ² + jitter)·I` is factorized once
//!   with `nalgebra`'s Cholesky.
//! - Noiseless prediction:
//!   `μ(x) = ȳ + k*ᵀα`, `v(x) = σ² − k*ᵀ K⁻¹ k*`, with `α = K⁻¹(y − ȳ)`.
//! - Predictive gradients:
//!   `∂k_i/∂x = −k_i (x − x_i) / ℓ²`, `∂μ/∂x = Σ_i ∂k_i/∂x · α_i`,
//!   `∂v/∂x = −2 Σ_i ∂k_i/∂x · (K⁻¹k*)_i`.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one observation, finite inputs and outputs, and strictly
//!   positive lengthscale and signal variance; noise variance ≥ 0.
//! - Hyperparameters are fixed at construction; there is no marginal
//!   likelihood optimization.
//!
//! Testing notes
//! -------------
//! - Unit tests check interpolation at training points, variance collapse
//!   at (noise-free) observations, and the predictive gradients against
//!   central finite differences.
use crate::{
    optimization::errors::{OptError, OptResult},
    surrogate::SurrogateModel,
};
use nalgebra::{DMatrix, DVector, Dyn, linalg::Cholesky};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Diagonal jitter added to the kernel matrix on top of the noise variance.
pub const KERNEL_JITTER: f64 = 1e-10;

/// Kernel hyperparameters of a [`GaussianProcess`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpParams {
    pub lengthscale: f64,
    pub signal_variance: f64,
    pub noise_variance: f64,
}

impl GpParams {
    /// Construct validated hyperparameters.
    ///
    /// # Errors
    /// [`OptError::InvalidKernelParam`] if `lengthscale` or
    /// `signal_variance` is not finite and > 0, or `noise_variance` is not
    /// finite and ≥ 0.
    pub fn new(lengthscale: f64, signal_variance: f64, noise_variance: f64) -> OptResult<Self> {
        if !lengthscale.is_finite() || lengthscale <= 0.0 {
            return Err(OptError::InvalidKernelParam { name: "lengthscale", value: lengthscale });
        }
        if !signal_variance.is_finite() || signal_variance <= 0.0 {
            return Err(OptError::InvalidKernelParam {
                name: "signal_variance",
                value: signal_variance,
            });
        }
        if !noise_variance.is_finite() || noise_variance < 0.0 {
            return Err(OptError::InvalidKernelParam {
                name: "noise_variance",
                value: noise_variance,
            });
        }
        Ok(Self { lengthscale, signal_variance, noise_variance })
    }
}

impl Default for GpParams {
    fn default() -> Self {
        Self { lengthscale: 0.2, signal_variance: 1.0, noise_variance: 1e-6 }
    }
}

/// A Gaussian process fitted to a fixed set of observations.
#[derive(Debug, Clone)]
pub struct GaussianProcess {
    x_train: Array2<f64>,
    y_train: Array1<f64>,
    y_mean: f64,
    params: GpParams,
    cholesky: Cholesky<f64, Dyn>,
    alpha: DVector<f64>,
}

impl GaussianProcess {
    /// fit — factorize the kernel matrix for the given observations.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Array2<f64>`
    ///   `n × dim` observed inputs, `n ≥ 1`, `dim ≥ 1`.
    /// - `y`: `Array1<f64>`
    ///   Length-`n` observed outputs.
    /// - `params`: `GpParams`
    ///   Fixed kernel hyperparameters.
    ///
    /// Errors
    /// ------
    /// - `OptError::NoObservations` if `n == 0`.
    /// - `OptError::InvalidShape` if `dim == 0`.
    /// - `OptError::ObservationLengthMismatch` if `y.len() != n`.
    /// - `OptError::InvalidObservation` on the first non-finite entry
    ///   (flat row-major index for inputs, offset by `n · dim` for outputs).
    /// - `OptError::CholeskyFailed` if the kernel matrix is not positive
    ///   definite (e.g. duplicated inputs with zero noise).
    pub fn fit(x: Array2<f64>, y: Array1<f64>, params: GpParams) -> OptResult<Self> {
        let (n, dim) = x.dim();
        if n == 0 || y.is_empty() {
            return Err(OptError::NoObservations);
        }
        if dim == 0 {
            return Err(OptError::InvalidShape { len: x.len(), dim });
        }
        if y.len() != n {
            return Err(OptError::ObservationLengthMismatch { inputs: n, outputs: y.len() });
        }
        for (index, &value) in x.iter().chain(y.iter()).enumerate() {
            if !value.is_finite() {
                return Err(OptError::InvalidObservation { index, value });
            }
        }

        let y_mean = y.mean().unwrap_or(0.0);
        let k = DMatrix::from_fn(n, n, |i, j| {
            let kij = sq_exp(x.row(i), x.row(j), &params);
            if i == j { kij + params.noise_variance + KERNEL_JITTER } else { kij }
        });
        let cholesky = Cholesky::new(k).ok_or(OptError::CholeskyFailed)?;
        let centred = DVector::from_iterator(n, y.iter().map(|&v| v - y_mean));
        let alpha = cholesky.solve(&centred);

        Ok(Self { x_train: x, y_train: y, y_mean, params, cholesky, alpha })
    }

    pub fn params(&self) -> &GpParams {
        &self.params
    }

    fn check_candidates(&self, x: &ArrayView2<'_, f64>) -> OptResult<()> {
        let dim = self.x_train.ncols();
        if x.ncols() != dim {
            return Err(OptError::CandidateDimMismatch { expected: dim, found: x.ncols() });
        }
        Ok(())
    }

    fn kernel_vector(&self, x: ArrayView1<'_, f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.x_train.nrows(),
            self.x_train.rows().into_iter().map(|xi| sq_exp(x, xi, &self.params)),
        )
    }
}

impl SurrogateModel for GaussianProcess {
    fn observed_inputs(&self) -> ArrayView2<'_, f64> {
        self.x_train.view()
    }

    fn observed_outputs(&self) -> ArrayView1<'_, f64> {
        self.y_train.view()
    }

    fn predict_noiseless(&self, x: ArrayView2<'_, f64>) -> OptResult<(Array1<f64>, Array1<f64>)> {
        self.check_candidates(&x)?;
        let k = x.nrows();
        let mut mean = Array1::zeros(k);
        let mut var = Array1::zeros(k);
        for (r, row) in x.rows().into_iter().enumerate() {
            let k_star = self.kernel_vector(row);
            let v = self.cholesky.solve(&k_star);
            mean[r] = self.y_mean + k_star.dot(&self.alpha);
            var[r] = self.params.signal_variance - k_star.dot(&v);
        }
        Ok((mean, var))
    }

    fn predictive_gradients(
        &self, x: ArrayView2<'_, f64>,
    ) -> OptResult<(Array2<f64>, Array2<f64>)> {
        self.check_candidates(&x)?;
        let (k, dim) = x.dim();
        let inv_l2 = 1.0 / (self.params.lengthscale * self.params.lengthscale);
        let mut dmu = Array2::zeros((k, dim));
        let mut dvar = Array2::zeros((k, dim));
        for (r, row) in x.rows().into_iter().enumerate() {
            let k_star = self.kernel_vector(row);
            let kinv_k = self.cholesky.solve(&k_star);
            for (i, xi) in self.x_train.rows().into_iter().enumerate() {
                for d in 0..dim {
                    let dk = -k_star[i] * (row[d] - xi[d]) * inv_l2;
                    dmu[[r, d]] += dk * self.alpha[i];
                    dvar[[r, d]] -= 2.0 * dk * kinv_k[i];
                }
            }
        }
        Ok((dmu, dvar))
    }
}

fn sq_exp(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, params: &GpParams) -> f64 {
    let r2: f64 = a.iter().zip(b.iter()).map(|(p, q)| (p - q) * (p - q)).sum();
    params.signal_variance * (-0.5 * r2 / (params.lengthscale * params.lengthscale)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Fitting validation, interpolation behavior, and predictive gradients
    // of the reference Gaussian process.
    // -------------------------------------------------------------------------

    fn two_point_gp() -> GaussianProcess {
        let params = GpParams::new(0.3, 1.0, 0.0).expect("valid params");
        GaussianProcess::fit(array![[0.2], [0.8]], array![1.0, -1.0], params)
            .expect("fit should succeed")
    }

    #[test]
    // Purpose
    // -------
    // A noise-free GP interpolates its observations and its variance
    // collapses there.
    //
    // Given
    // -----
    // - Observations {(0.2, 1.0), (0.8, -1.0)}, zero noise.
    //
    // Expect
    // ------
    // - μ(x_i) ≈ y_i and v(x_i) ≈ 0 at both training inputs.
    fn predict_noiseless_interpolates_training_points() {
        // Arrange
        let gp = two_point_gp();

        // Act
        let (mean, var) = gp.predict_noiseless(array![[0.2], [0.8]].view()).unwrap();

        // Assert
        assert_relative_eq!(mean[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(mean[1], -1.0, epsilon = 1e-6);
        assert!(var[0].abs() < 1e-6);
        assert!(var[1].abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Far from the data the GP reverts to its prior.
    //
    // Expect
    // ------
    // - Mean ≈ ȳ = 0 and variance ≈ σ² = 1 at x = 10.
    fn predict_noiseless_reverts_to_prior_far_from_data() {
        let gp = two_point_gp();
        let (mean, var) = gp.predict_noiseless(array![[10.0]].view()).unwrap();
        assert_relative_eq!(mean[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(var[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Analytic predictive gradients agree with central differences of the
    // predictive moments.
    //
    // Given
    // -----
    // - A 2-D GP on three points and a probe away from the data.
    //
    // Expect
    // ------
    // - Both ∂μ/∂x and ∂v/∂x match central differences to 1e-6.
    fn predictive_gradients_match_central_differences() {
        // Arrange
        let params = GpParams::new(0.5, 2.0, 1e-4).unwrap();
        let x = array![[0.1, 0.9], [0.5, 0.4], [0.8, 0.2]];
        let gp = GaussianProcess::fit(x, array![0.3, -0.7, 1.1], params).unwrap();
        let probe = array![[0.35, 0.6]];
        let h = 1e-6;

        // Act
        let (dmu, dvar) = gp.predictive_gradients(probe.view()).unwrap();

        // Assert
        for d in 0..2 {
            let mut plus = probe.clone();
            let mut minus = probe.clone();
            plus[[0, d]] += h;
            minus[[0, d]] -= h;
            let (mp, vp) = gp.predict_noiseless(plus.view()).unwrap();
            let (mm, vm) = gp.predict_noiseless(minus.view()).unwrap();
            assert_relative_eq!(dmu[[0, d]], (mp[0] - mm[0]) / (2.0 * h), epsilon = 1e-6);
            assert_relative_eq!(dvar[[0, d]], (vp[0] - vm[0]) / (2.0 * h), epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Invalid inputs are rejected with specific errors.
    fn fit_rejects_empty_mismatched_and_non_finite_data() {
        let params = GpParams::default();
        assert_eq!(
            GaussianProcess::fit(Array2::zeros((0, 1)), Array1::zeros(0), params).unwrap_err(),
            OptError::NoObservations
        );
        assert_eq!(
            GaussianProcess::fit(array![[0.1], [0.2]], array![1.0], params).unwrap_err(),
            OptError::ObservationLengthMismatch { inputs: 2, outputs: 1 }
        );
        assert!(matches!(
            GaussianProcess::fit(array![[0.1], [0.2]], array![1.0, f64::NAN], params),
            Err(OptError::InvalidObservation { index: 3, .. })
        ));
        assert!(matches!(
            GpParams::new(0.0, 1.0, 0.0),
            Err(OptError::InvalidKernelParam { name: "lengthscale", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Candidates must match the training input width.
    fn predict_rejects_wrong_candidate_width() {
        let gp = two_point_gp();
        assert_eq!(
            gp.predict_noiseless(array![[0.1, 0.2]].view()).unwrap_err(),
            OptError::CandidateDimMismatch { expected: 1, found: 2 }
        );
    }
}
