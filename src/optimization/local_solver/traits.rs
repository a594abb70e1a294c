//! Public API surface for bounded local minimization.
//!
//! - [`Objective`]: joint value/gradient oracle the solver minimizes.
//! - [`LocalSolver`]: seam over "run one bounded local solve from `θ₀`".
//! - [`SolverOptions`] and [`Tolerances`]: configuration for the solver.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`LocalOutcome`]: normalized result of one local solve.
//!
//! Convention: the solver *minimizes* the oracle's cost directly; no sign
//! flips happen in this layer. An acquisition that should be maximized is
//! negated by its own module before it gets here.
use crate::{
    domain::Bounds,
    optimization::{
        errors::{OptError, OptResult},
        local_solver::{
            Cost, FnEvalMap, Grad, Theta,
            validation::{
                validate_theta_hat, validate_value, verify_max_fun_evals, verify_max_iter,
                verify_tol_cost, verify_tol_grad,
            },
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Value-and-gradient oracle minimized by a local solver.
///
/// Required:
/// - `value_and_grad(&Theta) -> OptResult<(Cost, Grad)>`: evaluate the
///   cost and its gradient in one pass. Both are usually produced by the
///   same model queries, so they are never requested separately.
/// - `check(&Theta) -> OptResult<()>`: reject a starting point the oracle
///   cannot evaluate (wrong length, empty model, ...). Called once before
///   the solve starts.
pub trait Objective {
    fn value_and_grad(&self, theta: &Theta) -> OptResult<(Cost, Grad)>;
    fn check(&self, theta: &Theta) -> OptResult<()>;
}

/// One bounded local solve.
///
/// Implementations minimize `objective` inside `bounds` starting from
/// `theta0` and either return a validated [`LocalOutcome`] or an error for
/// the whole solve. The multi-start layer treats every error as a failed
/// restart, so implementations should not retry internally.
pub trait LocalSolver {
    fn minimize<O: Objective + ?Sized>(
        &self, objective: &O, theta0: Theta, bounds: &Bounds, opts: &SolverOptions,
    ) -> OptResult<LocalOutcome>;
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Solver-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances, iteration and evaluation limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size; `None` uses
///   [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM).
///
/// Default:
/// - `tols`: `tol_grad = 1e-5`, `tol_cost = 2.220446049250313e-9`,
///   `max_iter = 15000`, `max_fun_evals = 15000`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None`
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl SolverOptions {
    /// Create a new set of solver options.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and limits used by the local solver.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
/// - `max_fun_evals`: cap on oracle evaluations; once reached, the solve
///   stops and reports the best point evaluated so far.
///
/// Any field can be `None` but **at least one** must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
    pub max_fun_evals: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all four are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] / [`OptError::InvalidMaxFunEvals`] for
    ///   a zero limit.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        max_fun_evals: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() && max_fun_evals.is_none()
        {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        verify_max_iter(max_iter)?;
        verify_max_fun_evals(max_fun_evals)?;
        Ok(Self { tol_grad, tol_cost, max_iter, max_fun_evals })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            tol_grad: Some(1e-5),
            tol_cost: Some(1e7 * f64::EPSILON),
            max_iter: Some(15_000),
            max_fun_evals: Some(15_000),
        }
    }
}

/// Canonical result of one local solve.
///
/// - `theta_hat`: best point found, inside the bounds.
/// - `value`: cost at `theta_hat`.
/// - `converged`: `true` if argmin reported convergence (or the start was
///   already stationary); `false` for iteration caps and soft stops.
/// - `status`: human-readable termination status string.
/// - `iterations`: optimizer iterations, when argmin got to report them.
/// - `fn_evals`: argmin's counters (`cost_count`, `gradient_count`, ...),
///   empty for soft stops.
/// - `oracle_evals`: distinct oracle evaluations performed by the adapter.
/// - `grad_norm`: norm of the projected gradient at `theta_hat`, if known.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: Option<usize>,
    pub fn_evals: FnEvalMap,
    pub oracle_evals: usize,
    pub grad_norm: Option<f64>,
}

impl LocalOutcome {
    /// Build a validated [`LocalOutcome`].
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, stop: StopReason, iterations: Option<u64>,
        fn_evals: FnEvalMap, oracle_evals: usize, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = stop.describe();
        let iterations = iterations.map(|it| it as usize);
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, oracle_evals, grad_norm })
    }
}

/// Why a local solve stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// argmin finished and reported this status.
    Solver(TerminationStatus),
    /// The initial point already satisfied the gradient tolerance.
    Stationary,
    /// The oracle ran into `max_fun_evals`.
    BudgetExhausted,
    /// The line search could not make further progress.
    Stalled(String),
}

impl StopReason {
    fn describe(self) -> (bool, String) {
        match self {
            StopReason::Solver(status) => {
                let converged = matches!(
                    status,
                    TerminationStatus::Terminated(TerminationReason::SolverConverged)
                        | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
                );
                (converged, status.to_string())
            }
            StopReason::Stationary => (true, "Stationary at start".to_string()),
            StopReason::BudgetExhausted => {
                (false, "Function evaluation budget exhausted".to_string())
            }
            StopReason::Stalled(text) => (false, format!("Line search stalled: {text}")),
        }
    }
}
