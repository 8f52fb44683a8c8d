//! Pumpkin constraint-programming adapter
//!
//! Translates a [`ModelDescriptor`] into Pumpkin solver calls:
//!
//! - Bounded domains become bounded integers, sparse slot domains become
//!   sparse integers
//! - `LinearGe` declarations post as `greater_than_or_equals` over scaled
//!   views
//! - A `Disjunctive` pair posts as a two-task unit cumulative (two
//!   unit-demand tasks on a unit-capacity resource cannot overlap)
//! - `Cumulative` declarations map directly onto the cumulative global
//!
//! Optimization runs linear SAT-UNSAT search under a wall-clock budget.
//! A root-level conflict while posting is already a proof of infeasibility
//! and short-circuits the search.

use crate::backend::{SolveOptions, SolveResult, SolverBackend};
use crate::model::{ConstraintDecl, ModelDescriptor, VarDomain};
use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::TransformableVariable;
use pumpkin_solver::Solver;
use shopplan_core::SolveStatus;
use std::time::Instant;

/// The Pumpkin CP oracle.
#[derive(Debug, Default, Clone, Copy)]
pub struct PumpkinBackend;

impl SolverBackend for PumpkinBackend {
    fn name(&self) -> &'static str {
        "pumpkin"
    }

    fn solve(&self, model: &ModelDescriptor, options: &SolveOptions) -> SolveResult {
        let start_time = Instant::now();
        let mut solver = Solver::default();

        // Declare every descriptor variable
        let domains: Vec<_> = model
            .vars
            .iter()
            .map(|decl| match &decl.domain {
                VarDomain::Bounded { lb, ub } => {
                    solver.new_bounded_integer(*lb as i32, *ub as i32)
                }
                VarDomain::Sparse { values } => {
                    let values: Vec<i32> = values.iter().map(|&v| v as i32).collect();
                    solver.new_sparse_integer(values)
                }
            })
            .collect();

        let constraint_tag = solver.new_constraint_tag();

        let infeasible = |elapsed| SolveResult {
            status: SolveStatus::Infeasible,
            assignment: None,
            objective_value: None,
            backend: "pumpkin",
            elapsed,
        };

        // Post every constraint declaration; a posting error is a
        // root-level conflict, i.e. proven infeasibility
        for constraint in &model.constraints {
            let conflict = match constraint {
                ConstraintDecl::LinearGe { terms, rhs } => {
                    let vars: Vec<_> = terms
                        .iter()
                        .map(|t| domains[t.var.0].scaled(t.coeff as i32))
                        .collect();
                    solver
                        .add_constraint(cp::greater_than_or_equals(
                            vars,
                            *rhs as i32,
                            constraint_tag,
                        ))
                        .post()
                        .is_err()
                }
                ConstraintDecl::Disjunctive {
                    first,
                    first_duration,
                    second,
                    second_duration,
                } => solver
                    .add_constraint(cp::cumulative(
                        vec![domains[first.0], domains[second.0]],
                        vec![*first_duration as i32, *second_duration as i32],
                        vec![1, 1],
                        1,
                        constraint_tag,
                    ))
                    .post()
                    .is_err(),
                ConstraintDecl::Cumulative {
                    starts,
                    durations,
                    demands,
                    capacity,
                } => {
                    let starts: Vec<_> = starts.iter().map(|v| domains[v.0]).collect();
                    let durations: Vec<i32> = durations.iter().map(|&d| d as i32).collect();
                    let demands: Vec<i32> = demands.iter().map(|&d| d as i32).collect();
                    solver
                        .add_constraint(cp::cumulative(
                            starts,
                            durations,
                            demands,
                            *capacity as i32,
                            constraint_tag,
                        ))
                        .post()
                        .is_err()
                }
            };
            if conflict {
                return infeasible(start_time.elapsed());
            }
        }

        // Minimize the objective variable under the time budget
        let objective_var = domains[model.objective.var.0];
        let mut brancher = solver.default_brancher();
        let mut termination = TimeBudget::starting_now(options.time_limit);

        fn noop_callback<B>(_: &Solver, _: pumpkin_solver::results::SolutionReference, _: &B) {}
        let result = solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(OptimisationDirection::Minimise, objective_var, noop_callback),
        );

        let (status, solution) = match result {
            OptimisationResult::Optimal(solution) => (SolveStatus::Optimal, Some(solution)),
            // Found an incumbent but ran out of budget before proving it
            OptimisationResult::Satisfiable(solution) => (SolveStatus::Feasible, Some(solution)),
            OptimisationResult::Unsatisfiable => (SolveStatus::Infeasible, None),
            OptimisationResult::Unknown => (SolveStatus::TimedOut, None),
        };

        let assignment: Option<Vec<i64>> = solution.map(|solution| {
            domains
                .iter()
                .map(|&var| solution.get_integer_value(var) as i64)
                .collect()
        });
        let objective_value = assignment
            .as_ref()
            .map(|values| values[model.objective.var.0]);

        SolveResult {
            status,
            assignment,
            objective_value,
            backend: "pumpkin",
            elapsed: start_time.elapsed(),
        }
    }
}
