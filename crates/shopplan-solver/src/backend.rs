//! The solver oracle interface
//!
//! A backend receives an immutable [`ModelDescriptor`] and a
//! [`SolveOptions`] and blocks until it reaches a terminal status or the
//! time budget elapses. There is no cancellation beyond the up-front time
//! limit and no automatic retry with an alternate backend.

use crate::cp::PumpkinBackend;
use crate::model::ModelDescriptor;
use shopplan_core::{Objective, SolveError, SolveStatus};
use std::time::Duration;

/// Explicit per-solve configuration. Replaces any notion of a process-wide
/// default solver selection.
#[derive(Clone, Debug)]
pub struct SolveOptions {
    /// Backend name, resolved by [`backend_by_name`]
    pub backend: String,
    /// Wall-clock budget for the solve call
    pub time_limit: Duration,
    /// Relative optimality gap for MIP-style backends; the CP backend
    /// proves optimality exactly and ignores it
    pub mip_gap: f64,
    /// Optimization criterion, consumed at model-build time
    pub objective: Objective,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            backend: "pumpkin".to_string(),
            time_limit: Duration::from_secs(10),
            mip_gap: 0.0,
            objective: Objective::Makespan,
        }
    }
}

/// Outcome of one solve invocation.
#[derive(Clone, Debug)]
pub struct SolveResult {
    /// Terminal status
    pub status: SolveStatus,
    /// Value per declared variable, indexed by `VarId`; present exactly
    /// when the status carries a solution
    pub assignment: Option<Vec<i64>>,
    /// Objective value of the returned assignment
    pub objective_value: Option<i64>,
    /// Name of the backend that produced this result
    pub backend: &'static str,
    /// Wall time spent inside the oracle
    pub elapsed: Duration,
}

impl SolveResult {
    /// Whether an assignment is available to decode
    pub fn has_incumbent(&self) -> bool {
        self.assignment.is_some()
    }

    /// True when an incumbent exists but optimality was not proven within
    /// the time budget
    pub fn degraded_optimality(&self) -> bool {
        self.status == SolveStatus::Feasible
    }
}

/// A solver oracle: accepts a mathematical program, returns a status and,
/// if applicable, variable assignments.
pub trait SolverBackend: Send + Sync {
    /// Backend name as used on the command line
    fn name(&self) -> &'static str;

    /// Run the oracle to a terminal status. Blocking; the only cancellation
    /// mechanism is `options.time_limit`.
    fn solve(&self, model: &ModelDescriptor, options: &SolveOptions) -> SolveResult;
}

/// Resolve a backend by name.
///
/// Fails with `SolveError::BackendUnavailable` naming the attempted
/// backend; callers wanting a different one must re-invoke explicitly.
pub fn backend_by_name(name: &str) -> Result<Box<dyn SolverBackend>, SolveError> {
    match name {
        "pumpkin" | "cp" => Ok(Box::new(PumpkinBackend)),
        other => Err(SolveError::BackendUnavailable(other.to_string())),
    }
}

/// Resolve the configured backend and run a single blocking solve.
pub fn solve(model: &ModelDescriptor, options: &SolveOptions) -> Result<SolveResult, SolveError> {
    let backend = backend_by_name(&options.backend)?;
    Ok(backend.solve(model, options))
}
