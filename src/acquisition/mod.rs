//! acquisition — Expected Improvement and its solver-facing flat view.
//!
//! - [`ei::expected_improvement`]: negated EI values and analytic gradients
//!   for a `k × dim` candidate matrix.
//! - [`flat::expected_improvement_flat`]: the same on a flat vector of
//!   stacked points, with the gradient flattened back.
//! - [`flat::AcquisitionObjective`]: the flat evaluation packaged as a
//!   local-solver [`Objective`](crate::optimization::local_solver::Objective).

pub mod ei;
pub mod flat;

pub use self::ei::expected_improvement;
pub use self::flat::{AcquisitionObjective, expected_improvement_flat};
