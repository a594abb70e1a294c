//! batch::options — validated configuration for batch selection.
//!
//! - [`OptimizerConfig`]: number of acquisition restarts plus the options
//!   forwarded to every local solve.
//! - [`BatchOptions`]: search box, batch size and optimizer configuration
//!   for one selection call.
//!
//! Both are plain immutable values checked once on construction; nothing
//! in the selection path mutates them.
use crate::{
    domain::Bounds,
    optimization::{
        errors::{OptError, OptResult},
        local_solver::SolverOptions,
    },
};

/// Default number of acquisition restarts.
pub const DEFAULT_RESTARTS: usize = 5;

/// Multi-start configuration.
///
/// Fields:
/// - `restarts`: number of independent local solves (≥ 1).
/// - `solver`: options forwarded verbatim to each local solve.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub restarts: usize,
    pub solver: SolverOptions,
}

impl OptimizerConfig {
    /// # Errors
    /// [`OptError::InvalidRestarts`] if `restarts == 0`.
    pub fn new(restarts: usize, solver: SolverOptions) -> OptResult<Self> {
        if restarts == 0 {
            return Err(OptError::InvalidRestarts { restarts });
        }
        Ok(Self { restarts, solver })
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { restarts: DEFAULT_RESTARTS, solver: SolverOptions::default() }
    }
}

/// Configuration of one batch selection.
///
/// Fields:
/// - `bounds`: the search box; its dimension must match the surrogate.
/// - `batch_size`: rows in the returned batch (≥ 1).
/// - `optimizer`: restart count and solver options.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub bounds: Bounds,
    pub batch_size: usize,
    pub optimizer: OptimizerConfig,
}

impl BatchOptions {
    /// # Errors
    /// [`OptError::InvalidBatchSize`] if `batch_size == 0`.
    pub fn new(bounds: Bounds, batch_size: usize, optimizer: OptimizerConfig) -> OptResult<Self> {
        if batch_size == 0 {
            return Err(OptError::InvalidBatchSize { batch_size });
        }
        Ok(Self { bounds, batch_size, optimizer })
    }
}
