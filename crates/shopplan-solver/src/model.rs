//! Model construction
//!
//! Translates a validated `Shop` into an immutable [`ModelDescriptor`]: a
//! tagged collection of variable declarations, constraint declarations, and
//! one objective declaration. The descriptor is backend-agnostic; the
//! adapter layer turns it into solver calls.
//!
//! Formulation notes:
//! - One integer start-time variable per task. Machines with shift windows
//!   restrict the start to a sparse set of slot-aligned values where the
//!   whole duration fits inside a single day's window; machines without
//!   windows get the plain bounded domain `[release, horizon - duration]`.
//! - Non-overlap on capacity-1 machines is declared as an explicit
//!   disjunctive pair per conflicting task pair (A before B, or B before A),
//!   resolved by the solver. Capacity-k machines get one cumulative
//!   declaration with unit demands.
//! - No big-M constant appears anywhere in the descriptor.

use crate::backend::SolveOptions;
use crate::graph::PrecedenceGraph;
use shopplan_core::{InstanceError, Machine, MachineId, Objective, Shop, TaskId};
use std::collections::HashMap;

// ============================================================================
// Descriptor types
// ============================================================================

/// Index of a variable declaration within a [`ModelDescriptor`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Domain of an integer decision variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarDomain {
    /// Contiguous range `lb..=ub`
    Bounded { lb: i64, ub: i64 },
    /// Explicit value set, ascending
    Sparse { values: Vec<i64> },
}

/// A declared integer decision variable
#[derive(Clone, Debug)]
pub struct VarDecl {
    /// Diagnostic name, e.g. `start[Job1-Cutting]`
    pub name: String,
    pub domain: VarDomain,
}

/// One term of a linear constraint: `coeff * var`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinTerm {
    pub var: VarId,
    pub coeff: i64,
}

/// A declared constraint
#[derive(Clone, Debug)]
pub enum ConstraintDecl {
    /// `sum(coeff_i * var_i) >= rhs`
    LinearGe { terms: Vec<LinTerm>, rhs: i64 },
    /// Either `first` finishes before `second` starts, or the other way
    /// around; the solver picks the ordering.
    Disjunctive {
        first: VarId,
        first_duration: i64,
        second: VarId,
        second_duration: i64,
    },
    /// At most `capacity` units demanded concurrently
    Cumulative {
        starts: Vec<VarId>,
        durations: Vec<i64>,
        demands: Vec<i64>,
        capacity: i64,
    },
}

/// The single objective: minimize `var`
#[derive(Clone, Copy, Debug)]
pub struct ObjectiveDecl {
    pub var: VarId,
    pub kind: Objective,
}

/// Per-task decode table entry
#[derive(Clone, Debug)]
pub struct TaskVar {
    pub task: TaskId,
    pub machine: MachineId,
    pub duration: i64,
    pub start: VarId,
    pub due: Option<i64>,
    pub weight: i64,
}

/// An immutable, backend-agnostic mathematical program.
///
/// Built once per solve cycle; solving never mutates it.
#[derive(Clone, Debug)]
pub struct ModelDescriptor {
    /// Instance name, carried through for reporting
    pub name: String,
    /// Planning horizon in minutes
    pub horizon: i64,
    pub vars: Vec<VarDecl>,
    pub constraints: Vec<ConstraintDecl>,
    pub objective: ObjectiveDecl,
    /// Task-to-variable table used by schedule decoding
    pub tasks: Vec<TaskVar>,
}

impl ModelDescriptor {
    /// Look up a variable declaration
    pub fn var(&self, id: VarId) -> &VarDecl {
        &self.vars[id.0]
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Translate a shop into a [`ModelDescriptor`] using the objective selected
/// in `options`. Validation and cycle detection run before any declaration
/// is produced.
pub fn build_model(shop: &Shop, options: &SolveOptions) -> Result<ModelDescriptor, InstanceError> {
    let mut builder = ModelBuilder::new(shop)?;
    builder.add_precedence_constraints();
    builder.add_capacity_constraints();
    builder.set_objective(options.objective);
    Ok(builder.finish())
}

/// Step-wise model construction over a validated shop.
#[derive(Debug)]
pub struct ModelBuilder<'a> {
    shop: &'a Shop,
    graph: PrecedenceGraph,
    vars: Vec<VarDecl>,
    constraints: Vec<ConstraintDecl>,
    tasks: Vec<TaskVar>,
    objective: Option<ObjectiveDecl>,
}

impl<'a> ModelBuilder<'a> {
    /// Validate the shop, check the precedence graph, and declare one start
    /// variable per task.
    pub fn new(shop: &'a Shop) -> Result<Self, InstanceError> {
        validate(shop)?;
        let graph = PrecedenceGraph::build(&shop.tasks)?;

        let mut builder = Self {
            shop,
            graph,
            vars: Vec::new(),
            constraints: Vec::new(),
            tasks: Vec::with_capacity(shop.tasks.len()),
            objective: None,
        };
        builder.add_start_variables()?;
        Ok(builder)
    }

    fn new_var(&mut self, name: String, domain: VarDomain) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(VarDecl { name, domain });
        id
    }

    /// One start variable per task, with the domain dictated by release
    /// time, horizon, and the machine calendar.
    fn add_start_variables(&mut self) -> Result<(), InstanceError> {
        for task in &self.shop.tasks {
            // validate() guarantees the machine exists
            let machine = self.shop.machine(&task.machine).unwrap();
            let domain = start_domain(task, machine, self.shop)?;
            let start = VarId(self.vars.len());
            self.vars.push(VarDecl {
                name: format!("start[{}]", task.id),
                domain,
            });
            self.tasks.push(TaskVar {
                task: task.id.clone(),
                machine: task.machine.clone(),
                duration: task.duration,
                start,
                due: task.due,
                weight: task.weight,
            });
        }
        Ok(())
    }

    /// For each edge (A, B): `start(B) - start(A) >= duration(A)`.
    pub fn add_precedence_constraints(&mut self) {
        for &(pred, succ) in &self.graph.edges {
            let pred_var = self.tasks[pred].start;
            let succ_var = self.tasks[succ].start;
            let pred_duration = self.tasks[pred].duration;
            self.constraints.push(ConstraintDecl::LinearGe {
                terms: vec![
                    LinTerm { var: succ_var, coeff: 1 },
                    LinTerm { var: pred_var, coeff: -1 },
                ],
                rhs: pred_duration,
            });
        }
    }

    /// Non-overlap per machine: disjunctive pairs for capacity 1, one
    /// cumulative with unit demands for capacity > 1.
    pub fn add_capacity_constraints(&mut self) {
        for machine in &self.shop.machines {
            let on_machine: Vec<usize> = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, tv)| tv.machine == machine.id)
                .map(|(i, _)| i)
                .collect();

            if on_machine.len() as i64 <= machine.capacity {
                // All tasks may run concurrently; nothing to enforce
                continue;
            }

            if machine.capacity == 1 {
                for (a, &i) in on_machine.iter().enumerate() {
                    for &j in &on_machine[a + 1..] {
                        self.constraints.push(ConstraintDecl::Disjunctive {
                            first: self.tasks[i].start,
                            first_duration: self.tasks[i].duration,
                            second: self.tasks[j].start,
                            second_duration: self.tasks[j].duration,
                        });
                    }
                }
            } else {
                self.constraints.push(ConstraintDecl::Cumulative {
                    starts: on_machine.iter().map(|&i| self.tasks[i].start).collect(),
                    durations: on_machine.iter().map(|&i| self.tasks[i].duration).collect(),
                    demands: vec![1; on_machine.len()],
                    capacity: machine.capacity,
                });
            }
        }
    }

    /// Declare the objective variable and its defining constraints.
    pub fn set_objective(&mut self, kind: Objective) {
        let horizon = self.shop.horizon_minutes;
        let objective = match kind {
            Objective::Makespan => {
                let makespan = self.new_var(
                    "makespan".to_string(),
                    VarDomain::Bounded { lb: 0, ub: horizon },
                );
                // makespan >= start + duration, for every task
                for i in 0..self.tasks.len() {
                    let tv = &self.tasks[i];
                    let (start, duration) = (tv.start, tv.duration);
                    self.constraints.push(ConstraintDecl::LinearGe {
                        terms: vec![
                            LinTerm { var: makespan, coeff: 1 },
                            LinTerm { var: start, coeff: -1 },
                        ],
                        rhs: duration,
                    });
                }
                ObjectiveDecl { var: makespan, kind }
            }
            Objective::TotalLateness | Objective::WeightedTardiness => {
                // lateness[i] >= end[i] - due[i], floored at 0 by the domain
                let mut sum_terms = Vec::new();
                let mut z_upper = 0i64;
                for i in 0..self.tasks.len() {
                    let tv = &self.tasks[i];
                    let Some(due) = tv.due else { continue };
                    let upper = horizon - due;
                    if upper <= 0 {
                        // Due at or past the horizon: the task cannot be late
                        continue;
                    }
                    let (task, start, duration, weight) =
                        (tv.task.clone(), tv.start, tv.duration, tv.weight);
                    let lateness = self.new_var(
                        format!("lateness[{task}]"),
                        VarDomain::Bounded { lb: 0, ub: upper },
                    );
                    self.constraints.push(ConstraintDecl::LinearGe {
                        terms: vec![
                            LinTerm { var: lateness, coeff: 1 },
                            LinTerm { var: start, coeff: -1 },
                        ],
                        rhs: duration - due,
                    });
                    let coeff = match kind {
                        Objective::WeightedTardiness => weight,
                        _ => 1,
                    };
                    sum_terms.push(LinTerm { var: lateness, coeff: -coeff });
                    z_upper += coeff * upper;
                }

                let z = self.new_var(
                    "objective".to_string(),
                    VarDomain::Bounded { lb: 0, ub: z_upper },
                );
                if !sum_terms.is_empty() {
                    // z >= sum(coeff * lateness)
                    let mut terms = vec![LinTerm { var: z, coeff: 1 }];
                    terms.extend(sum_terms);
                    self.constraints.push(ConstraintDecl::LinearGe { terms, rhs: 0 });
                }
                ObjectiveDecl { var: z, kind }
            }
        };
        self.objective = Some(objective);
    }

    /// Seal the descriptor. Falls back to the makespan objective when
    /// [`set_objective`](Self::set_objective) was never called.
    pub fn finish(mut self) -> ModelDescriptor {
        if self.objective.is_none() {
            self.set_objective(Objective::Makespan);
        }
        ModelDescriptor {
            name: self.shop.name.clone(),
            horizon: self.shop.horizon_minutes,
            vars: self.vars,
            constraints: self.constraints,
            objective: self.objective.unwrap(),
            tasks: self.tasks,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate(shop: &Shop) -> Result<(), InstanceError> {
    let horizon = shop.horizon_minutes;

    if shop.slot_minutes <= 0 {
        return Err(InstanceError::NonPositiveSlot(shop.slot_minutes));
    }

    let mut machine_ids = HashMap::new();
    for machine in &shop.machines {
        if machine_ids.insert(machine.id.as_str(), ()).is_some() {
            return Err(InstanceError::DuplicateMachine(machine.id.clone()));
        }
        if machine.capacity <= 0 {
            return Err(InstanceError::NonPositiveCapacity {
                machine: machine.id.clone(),
                capacity: machine.capacity,
            });
        }
        for w in &machine.windows {
            if w.start < 0 || w.end <= w.start || w.end > shopplan_core::MINUTES_PER_DAY {
                return Err(InstanceError::InvalidWindow {
                    machine: machine.id.clone(),
                    start: w.start,
                    end: w.end,
                });
            }
        }
    }

    let mut task_ids = HashMap::new();
    for task in &shop.tasks {
        if task_ids.insert(task.id.as_str(), ()).is_some() {
            return Err(InstanceError::DuplicateTask(task.id.clone()));
        }
        if task.duration <= 0 {
            return Err(InstanceError::NonPositiveDuration {
                task: task.id.clone(),
                duration: task.duration,
            });
        }
        if task.release < 0 {
            return Err(InstanceError::NegativeRelease {
                task: task.id.clone(),
                release: task.release,
            });
        }
        if task.weight < 0 {
            return Err(InstanceError::NegativeWeight {
                task: task.id.clone(),
                weight: task.weight,
            });
        }
        if task.duration > horizon {
            return Err(InstanceError::DurationExceedsHorizon {
                task: task.id.clone(),
                duration: task.duration,
                horizon,
            });
        }
        if task.release >= horizon {
            return Err(InstanceError::ReleaseBeyondHorizon {
                task: task.id.clone(),
                release: task.release,
                horizon,
            });
        }
        if !machine_ids.contains_key(task.machine.as_str()) {
            return Err(InstanceError::UnknownMachine {
                task: task.id.clone(),
                machine: task.machine.clone(),
            });
        }
    }

    Ok(())
}

/// Start-time domain for a task under its machine's calendar.
fn start_domain(
    task: &shopplan_core::Task,
    machine: &Machine,
    shop: &Shop,
) -> Result<VarDomain, InstanceError> {
    let horizon = shop.horizon_minutes;

    if machine.windows.is_empty() {
        let lb = task.release;
        let ub = horizon - task.duration;
        if lb > ub {
            return Err(InstanceError::NoFeasibleStart {
                task: task.id.clone(),
                machine: machine.id.clone(),
            });
        }
        return Ok(VarDomain::Bounded { lb, ub });
    }

    // Slot-aligned starts inside a single day's window, duration included
    let mut values = Vec::new();
    let days = (horizon + shopplan_core::MINUTES_PER_DAY - 1) / shopplan_core::MINUTES_PER_DAY;
    for day in 0..days {
        let offset = day * shopplan_core::MINUTES_PER_DAY;
        for w in &machine.windows {
            let mut t = w.start;
            while t + task.duration <= w.end {
                let abs = offset + t;
                if abs >= task.release && abs + task.duration <= horizon {
                    values.push(abs);
                }
                t += shop.slot_minutes;
            }
        }
    }
    values.sort_unstable();

    if values.is_empty() {
        return Err(InstanceError::NoFeasibleStart {
            task: task.id.clone(),
            machine: machine.id.clone(),
        });
    }
    Ok(VarDomain::Sparse { values })
}

// ============================================================================
// Tests
// ============================================================================
