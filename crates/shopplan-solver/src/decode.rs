//! Solution decoding
//!
//! Reads the oracle's variable assignment back into domain terms through
//! the descriptor's task-variable table.

use crate::backend::SolveResult;
use crate::model::ModelDescriptor;
use shopplan_core::{DecodeError, Schedule, ScheduledTask};
use std::collections::BTreeMap;

/// Decode a solve result into a [`Schedule`].
///
/// Fails with `DecodeError::NotSolved` unless the result's status is
/// `Optimal` or `Feasible`.
pub fn decode_schedule(
    model: &ModelDescriptor,
    result: &SolveResult,
) -> Result<Schedule, DecodeError> {
    if !result.status.has_solution() {
        return Err(DecodeError::NotSolved(result.status));
    }
    let Some(values) = &result.assignment else {
        return Err(DecodeError::NotSolved(result.status));
    };

    let mut tasks = BTreeMap::new();
    for tv in &model.tasks {
        let start = values[tv.start.0];
        let end = start + tv.duration;
        let lateness = tv.due.map_or(0, |due| (end - due).max(0));
        tasks.insert(
            tv.task.clone(),
            ScheduledTask {
                task_id: tv.task.clone(),
                machine: tv.machine.clone(),
                start,
                end,
                lateness,
            },
        );
    }

    let objective_value = result
        .objective_value
        .unwrap_or_else(|| values[model.objective.var.0]);

    Ok(Schedule {
        tasks,
        objective: model.objective.kind,
        objective_value,
        status: result.status,
    })
}
