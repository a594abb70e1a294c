use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- SolverOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// Maximum function evaluations needs to be positive.
    InvalidMaxFunEvals {
        max_fun_evals: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Batch configuration ----
    /// Bounds must describe at least one dimension.
    EmptyBounds,
    /// A bound pair is non-finite or has `low > high`.
    InvalidBounds {
        index: usize,
        low: f64,
        high: f64,
        reason: &'static str,
    },
    /// Bounds dimension does not match the surrogate input dimension.
    BoundsDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Batch size must be at least one.
    InvalidBatchSize {
        batch_size: usize,
    },
    /// Restart count must be at least one.
    InvalidRestarts {
        restarts: usize,
    },

    // ---- Acquisition ----
    /// Flat candidate length is not a positive multiple of the input dimension.
    InvalidShape {
        len: usize,
        dim: usize,
    },
    /// Candidate matrix width does not match the surrogate input dimension.
    CandidateDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Surrogate model ----
    /// The surrogate holds no observations, so `fmin` is undefined.
    NoObservations,
    /// Observed inputs and outputs disagree on the number of rows.
    ObservationLengthMismatch {
        inputs: usize,
        outputs: usize,
    },
    /// A surrogate prediction came back with an unexpected shape.
    ModelShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Kernel hyperparameters need to be finite and positive.
    InvalidKernelParam {
        name: &'static str,
        value: f64,
    },
    /// Observed values need to be finite.
    InvalidObservation {
        index: usize,
        value: f64,
    },
    /// Kernel matrix is not positive definite.
    CholeskyFailed,

    // ---- Cost function ----
    /// Acquisition values or gradients came out non-finite despite clipping.
    NumericalInstability {
        what: &'static str,
        index: usize,
        value: f64,
    },
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },
    /// Local solve hit its function-evaluation budget.
    EvaluationBudgetExhausted {
        max_fun_evals: usize,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    /// A single local solve failed.
    SolverFailure {
        restart: usize,
        reason: String,
    },
    /// Every acquisition restart failed.
    NoFeasibleCandidate {
        restarts: usize,
        last_reason: String,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- SolverOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidMaxFunEvals { max_fun_evals, reason } => {
                write!(f, "Invalid maximum function evaluations {max_fun_evals}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Batch configuration ----
            OptError::EmptyBounds => {
                write!(f, "Bounds must contain at least one dimension")
            }
            OptError::InvalidBounds { index, low, high, reason } => {
                write!(f, "Invalid bounds ({low}, {high}) for dimension {index}: {reason}")
            }
            OptError::BoundsDimMismatch { expected, found } => {
                write!(f, "Bounds dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidBatchSize { batch_size } => {
                write!(f, "Invalid batch size {batch_size}: must be at least 1")
            }
            OptError::InvalidRestarts { restarts } => {
                write!(f, "Invalid restart count {restarts}: must be at least 1")
            }

            // ---- Acquisition ----
            OptError::InvalidShape { len, dim } => {
                write!(f, "Invalid candidate shape: length {len} is not a positive multiple of {dim}")
            }
            OptError::CandidateDimMismatch { expected, found } => {
                write!(f, "Candidate dimension mismatch: expected {expected}, found {found}")
            }

            // ---- Surrogate model ----
            OptError::NoObservations => {
                write!(f, "Surrogate model has no observations")
            }
            OptError::ObservationLengthMismatch { inputs, outputs } => {
                write!(f, "Observation length mismatch: {inputs} inputs, {outputs} outputs")
            }
            OptError::ModelShapeMismatch { what, expected, found } => {
                write!(f, "Surrogate returned {what} with shape {found:?}, expected {expected:?}")
            }
            OptError::InvalidKernelParam { name, value } => {
                write!(f, "Invalid kernel parameter {name} = {value}: must be finite and > 0")
            }
            OptError::InvalidObservation { index, value } => {
                write!(f, "Invalid observation at index {index}: {value}, must be finite")
            }
            OptError::CholeskyFailed => {
                write!(f, "Kernel matrix is not positive definite")
            }

            // ---- Cost function ----
            OptError::NumericalInstability { what, index, value } => {
                write!(f, "Numerical instability: {what} at index {index} is {value}")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::EvaluationBudgetExhausted { max_fun_evals } => {
                write!(f, "Function evaluation budget of {max_fun_evals} exhausted")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }
            OptError::SolverFailure { restart, reason } => {
                write!(f, "Local solve for restart {restart} failed: {reason}")
            }
            OptError::NoFeasibleCandidate { restarts, last_reason } => {
                write!(
                    f,
                    "No feasible candidate: all {restarts} acquisition restarts failed (last: {last_reason})"
                )
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own oracle come back wrapped; unwrap them first.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

/// Surface crate errors to Python as `ValueError` carrying the message.
#[cfg(feature = "python-bindings")]
impl From<OptError> for pyo3::PyErr {
    fn from(err: OptError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
