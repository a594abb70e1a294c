//! random_ei — batch selection for Bayesian optimization with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! batch selection to Python via the `random_ei` extension module. A batch is
//! one point maximizing Expected Improvement (found by multi-restart bounded
//! L-BFGS) followed by points drawn uniformly from the search box.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`acquisition`, `batch`, `domain`,
//!   `optimization`, `surrogate`) as the public crate surface.
//! - Define the `RandomEI` `#[pyclass]` and the `#[pymodule]` initializer for
//!   the `random_ei` Python extension when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Every crate error is an [`optimization::errors::OptError`]; at the PyO3
//!   boundary it becomes a Python `ValueError`.
//!
//! Conventions
//! -----------
//! - Candidate points are rows of `k × dim` matrices; bounds are per-dimension
//!   `(low, high)` pairs.
//! - The random generator is injected by the caller (or seeded via
//!   [`batch::select_batch`]); nothing in the crate holds global RNG state.
//!
//! Downstream usage
//! ----------------
//! - Rust callers implement [`surrogate::SurrogateModel`] for their model and
//!   call [`batch::BatchSelector::select`] or [`batch::select_batch`].
//! - Python callers construct `RandomEI(x, y, bounds, ...)` and call
//!   `select(seed=None)` to obtain a 2-D numpy array.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/integration_random_ei_pipeline.rs`
//!   runs the full selection path on a reference Gaussian process.

pub mod acquisition;
pub mod batch;
pub mod domain;
pub mod optimization;
pub mod surrogate;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

#[cfg(feature = "python-bindings")]
use crate::{
    batch::{Batch, BatchOptions, OptimizerConfig, select_batch},
    domain::Bounds,
    optimization::local_solver::{LineSearcher, SolverOptions, Tolerances},
    surrogate::gp::{GaussianProcess, GpParams},
};

/// RandomEI — Python-facing batch selector over a reference Gaussian process.
///
/// Purpose
/// -------
/// Let Python callers go from observed data to the next batch of points in
/// one object: the constructor fits a fixed-hyperparameter
/// [`GaussianProcess`] and validates the selection options; `select` runs
/// [`select_batch`].
///
/// Parameters
/// ----------
/// Constructed from Python via `RandomEI(x, y, bounds, batch_size=1, ...)`:
/// - `x`: `numpy.ndarray` of shape `(n, dim)`, observed inputs.
/// - `y`: `numpy.ndarray` of shape `(n,)`, observed objective values.
/// - `bounds`: sequence of `dim` `(low, high)` pairs.
/// - `batch_size`, `restarts`: batch rows and acquisition restarts (≥ 1).
/// - `lengthscale`, `signal_variance`, `noise_variance`: GP hyperparameters.
/// - `tol_grad`, `tol_cost`, `max_iter`, `max_fun_evals`, `line_searcher`,
///   `lbfgs_mem`: local solver settings; omitted values take the solver
///   defaults.
///
/// Fields
/// ------
/// - `model`: fitted [`GaussianProcess`].
/// - `options`: validated [`BatchOptions`].
/// - `last`: most recent [`Batch`], kept for the diagnostic getters.
///
/// Notes
/// -----
/// - Native Rust code should use [`select_batch`] or
///   [`batch::BatchSelector`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "random_ei", unsendable)]
pub struct RandomEI {
    model: GaussianProcess,
    options: BatchOptions,
    last: Option<Batch>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl RandomEI {
    #[new]
    #[pyo3(
        signature = (
            x,
            y,
            bounds,
            batch_size = 1,
            restarts = 5,
            lengthscale = None,
            signal_variance = None,
            noise_variance = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            max_fun_evals = None,
            line_searcher = None,
            lbfgs_mem = None,
        ),
        text_signature = "(x, y, bounds, /, batch_size=1, restarts=5, lengthscale=0.2, \
                          signal_variance=1.0, noise_variance=1e-6, tol_grad=None, \
                          tol_cost=None, max_iter=None, max_fun_evals=None, \
                          line_searcher='MoreThuente', lbfgs_mem=None)"
    )]
    pub fn new<'py>(
        x: PyReadonlyArray2<'py, f64>, y: PyReadonlyArray1<'py, f64>, bounds: Vec<(f64, f64)>,
        batch_size: usize, restarts: usize, lengthscale: Option<f64>,
        signal_variance: Option<f64>, noise_variance: Option<f64>, tol_grad: Option<f64>,
        tol_cost: Option<f64>, max_iter: Option<usize>, max_fun_evals: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    ) -> PyResult<Self> {
        let defaults = GpParams::default();
        let params = GpParams::new(
            lengthscale.unwrap_or(defaults.lengthscale),
            signal_variance.unwrap_or(defaults.signal_variance),
            noise_variance.unwrap_or(defaults.noise_variance),
        )?;
        let model =
            GaussianProcess::fit(x.as_array().to_owned(), y.as_array().to_owned(), params)?;

        let solver = extract_solver_opts(
            tol_grad,
            tol_cost,
            max_iter,
            max_fun_evals,
            line_searcher,
            lbfgs_mem,
        )?;
        let optimizer = OptimizerConfig::new(restarts, solver)?;
        let options = BatchOptions::new(Bounds::new(bounds)?, batch_size, optimizer)?;

        Ok(RandomEI { model, options, last: None })
    }

    /// Select the next batch; returns a `(batch_size, dim)` array whose first
    /// row maximizes Expected Improvement.
    #[pyo3(signature = (seed = None), text_signature = "(self, /, seed=None)")]
    pub fn select<'py>(
        &mut self, py: Python<'py>, seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let batch = select_batch(&self.model, &self.options, seed)?;
        let points = batch.points.clone().into_pyarray(py);
        self.last = Some(batch);
        Ok(points)
    }

    /// Expected Improvement at the optimized point of the last batch.
    #[getter]
    pub fn best_ei(&self) -> PyResult<f64> {
        self.last_batch().map(|batch| -batch.optimum.value)
    }

    /// Restart that produced the optimized point of the last batch.
    #[getter]
    pub fn best_restart(&self) -> PyResult<usize> {
        self.last_batch().map(|batch| batch.optimum.best_restart)
    }

    #[getter]
    pub fn batch_size(&self) -> usize {
        self.options.batch_size
    }

    #[getter]
    pub fn restarts(&self) -> usize {
        self.options.optimizer.restarts
    }
}

#[cfg(feature = "python-bindings")]
impl RandomEI {
    fn last_batch(&self) -> PyResult<&Batch> {
        self.last
            .as_ref()
            .ok_or_else(|| PyValueError::new_err("no batch has been selected yet"))
    }
}

#[cfg(feature = "python-bindings")]
fn extract_solver_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    max_fun_evals: Option<usize>, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<SolverOptions> {
    use std::str::FromStr;

    let defaults = Tolerances::default();
    let tols = Tolerances::new(
        tol_grad.or(defaults.tol_grad),
        tol_cost.or(defaults.tol_cost),
        max_iter.or(defaults.max_iter),
        max_fun_evals.or(defaults.max_fun_evals),
    )?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => LineSearcher::MoreThuente,
    };
    Ok(SolverOptions::new(tols, ls, false, lbfgs_mem)?)
}

/// random_ei — PyO3 module initializer for the Python extension.
///
/// Registers the `RandomEI` class. Invoked by Python when importing the
/// compiled extension; not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn random_ei<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<RandomEI>()?;
    Ok(())
}
