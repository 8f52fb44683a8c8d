//! Precedence graph construction and validation
//!
//! A cyclic precedence graph handed to the solver surfaces as an opaque
//! infeasibility proof after an expensive search. Detecting the cycle here,
//! before any model is built, turns that into a cheap and precise error.

use shopplan_core::{InstanceError, Task, TaskId};
use std::collections::{HashMap, VecDeque};

/// The finish-to-start precedence relation over an instance's tasks,
/// flattened to index-based edges and validated to be acyclic.
#[derive(Debug)]
pub struct PrecedenceGraph {
    /// Edges as (predecessor index, successor index) into the task slice
    pub edges: Vec<(usize, usize)>,
    /// Task IDs in a valid topological order
    pub topo_order: Vec<TaskId>,
}

impl PrecedenceGraph {
    /// Build and validate the precedence graph for a task slice.
    ///
    /// Fails with `UnknownPredecessor` for dangling references and
    /// `CyclicPrecedence` when the edges do not form a DAG.
    pub fn build(tasks: &[Task]) -> Result<Self, InstanceError> {
        let index: HashMap<&str, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        let mut edges = Vec::new();
        for (succ, task) in tasks.iter().enumerate() {
            for pred_id in &task.predecessors {
                let Some(&pred) = index.get(pred_id.as_str()) else {
                    return Err(InstanceError::UnknownPredecessor {
                        task: task.id.clone(),
                        predecessor: pred_id.clone(),
                    });
                };
                edges.push((pred, succ));
            }
        }

        let topo_order = topological_sort(tasks, &edges)?;

        Ok(Self { edges, topo_order })
    }
}

/// Kahn's algorithm; the residual tasks on failure are exactly the ones
/// involved in (or downstream of) a cycle.
fn topological_sort(tasks: &[Task], edges: &[(usize, usize)]) -> Result<Vec<TaskId>, InstanceError> {
    let mut in_degree = vec![0usize; tasks.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];

    for &(pred, succ) in edges {
        in_degree[succ] += 1;
        successors[pred].push(succ);
    }

    let mut queue: VecDeque<usize> = (0..tasks.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(tasks.len());
    let mut visited = vec![false; tasks.len()];

    while let Some(node) = queue.pop_front() {
        visited[node] = true;
        order.push(tasks[node].id.clone());

        for &succ in &successors[node] {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    if order.len() != tasks.len() {
        let remaining: Vec<TaskId> = tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| !visited[*i])
            .map(|(_, t)| t.id.clone())
            .collect();
        return Err(InstanceError::CyclicPrecedence { tasks: remaining });
    }

    Ok(order)
}
