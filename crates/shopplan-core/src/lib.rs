//! # shopplan-core
//!
//! Core domain model for the shopplan scheduling engine.
//!
//! This crate provides:
//! - Problem types: `Shop`, `Task`, `Machine`, `ShiftWindow`
//! - Solution types: `Schedule`, `ScheduledTask`, `SolveStatus`
//! - The `Objective` selector and the error taxonomy
//!
//! All times are integer minutes measured from the start of the planning
//! horizon. A `Shop` spans `horizon_minutes` of planning time; machine
//! shift windows are expressed in minutes from midnight and repeat daily.
//!
//! ## Example
//!
//! ```rust
//! use shopplan_core::{Machine, Shop, Task};
//!
//! let mut shop = Shop::new("Demo").horizon_days(2);
//! shop.machines.push(Machine::new("mill").window(480, 960));
//! shop.tasks.push(Task::new("rough").on("mill").duration_hours(2));
//! shop.tasks.push(
//!     Task::new("finish")
//!         .on("mill")
//!         .duration_hours(1)
//!         .after("rough"),
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task
pub type TaskId = String;

/// Unique identifier for a machine
pub type MachineId = String;

/// Minutes in one planning day
pub const MINUTES_PER_DAY: i64 = 1440;

// ============================================================================
// Task
// ============================================================================

/// One unit of work, processed without preemption on a single machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Machine this task must run on
    pub machine: MachineId,
    /// Processing duration in minutes (must be positive)
    pub duration: i64,
    /// Tasks that must finish before this one may start
    #[serde(default)]
    pub predecessors: Vec<TaskId>,
    /// Earliest start, minutes from the horizon start
    #[serde(default)]
    pub release: i64,
    /// Due date in minutes; drives the lateness objectives
    #[serde(default)]
    pub due: Option<i64>,
    /// Tardiness weight (only used by the weighted-tardiness objective)
    #[serde(default = "default_weight")]
    pub weight: i64,
    /// Job label for grouping related tasks in reports
    #[serde(default)]
    pub job: Option<String>,
}

fn default_weight() -> i64 {
    1
}

impl Task {
    /// Create a new task with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            machine: String::new(),
            duration: 0,
            predecessors: Vec::new(),
            release: 0,
            due: None,
            weight: 1,
            job: None,
        }
    }

    /// Set the task name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Assign the machine this task runs on
    pub fn on(mut self, machine: impl Into<String>) -> Self {
        self.machine = machine.into();
        self
    }

    /// Set the processing duration in minutes
    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.duration = minutes;
        self
    }

    /// Set the processing duration in hours
    pub fn duration_hours(self, hours: i64) -> Self {
        self.duration_minutes(hours * 60)
    }

    /// Add a finish-to-start predecessor
    pub fn after(mut self, predecessor: impl Into<String>) -> Self {
        self.predecessors.push(predecessor.into());
        self
    }

    /// Set the earliest start time in minutes
    pub fn release(mut self, minutes: i64) -> Self {
        self.release = minutes;
        self
    }

    /// Set the due date in minutes
    pub fn due(mut self, minutes: i64) -> Self {
        self.due = Some(minutes);
        self
    }

    /// Set the tardiness weight
    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    /// Attach a job label
    pub fn job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }
}

// ============================================================================
// Machine
// ============================================================================

/// A daily working window in minutes from midnight, end exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start: i64,
    pub end: i64,
}

impl ShiftWindow {
    /// Window length in minutes
    pub fn minutes(&self) -> i64 {
        self.end - self.start
    }
}

/// A capacity-constrained resource that processes tasks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Machine {
    /// Unique identifier
    pub id: MachineId,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Number of tasks the machine can process concurrently (>= 1)
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    /// Daily working windows; empty means available around the clock
    #[serde(default)]
    pub windows: Vec<ShiftWindow>,
}

fn default_capacity() -> i64 {
    1
}

impl Machine {
    /// Create a new machine with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            capacity: 1,
            windows: Vec::new(),
        }
    }

    /// Set the machine name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the concurrent-task capacity
    pub fn capacity(mut self, capacity: i64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Add a daily working window (minutes from midnight, end exclusive)
    pub fn window(mut self, start: i64, end: i64) -> Self {
        self.windows.push(ShiftWindow { start, end });
        self
    }

    /// Total working minutes per day (full day when no windows are declared)
    pub fn minutes_per_day(&self) -> i64 {
        if self.windows.is_empty() {
            MINUTES_PER_DAY
        } else {
            self.windows.iter().map(ShiftWindow::minutes).sum()
        }
    }
}

// ============================================================================
// Shop (problem instance)
// ============================================================================

/// A complete problem instance: tasks, machines, and the planning horizon.
///
/// Instances are immutable input data for the duration of a solve; solving
/// never mutates the shop, and re-solving with a modified shop produces an
/// entirely new `Schedule`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shop {
    /// Human-readable name
    pub name: String,
    /// Planning horizon in minutes
    #[serde(default = "default_horizon_minutes")]
    pub horizon_minutes: i64,
    /// Start-time granularity inside shift windows, in minutes
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: i64,
    /// All tasks in the instance
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// All machines in the instance
    #[serde(default)]
    pub machines: Vec<Machine>,
}

fn default_horizon_minutes() -> i64 {
    MINUTES_PER_DAY
}

fn default_slot_minutes() -> i64 {
    60
}

impl Shop {
    /// Create a new empty shop with a one-day horizon
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            horizon_minutes: MINUTES_PER_DAY,
            slot_minutes: 60,
            tasks: Vec::new(),
            machines: Vec::new(),
        }
    }

    /// Set the planning horizon in whole days
    pub fn horizon_days(mut self, days: i64) -> Self {
        self.horizon_minutes = days * MINUTES_PER_DAY;
        self
    }

    /// Set the planning horizon in minutes
    pub fn horizon_minutes(mut self, minutes: i64) -> Self {
        self.horizon_minutes = minutes;
        self
    }

    /// Set the slot granularity in minutes
    pub fn slot_minutes(mut self, minutes: i64) -> Self {
        self.slot_minutes = minutes;
        self
    }

    /// Get a task by ID
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a machine by ID
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }
}

// ============================================================================
// Objective
// ============================================================================

/// The optimization criterion. Exactly one objective is active per solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Minimize the completion time of the last task
    #[default]
    Makespan,
    /// Minimize the sum over tasks of `max(0, end - due)`
    TotalLateness,
    /// Minimize the sum over tasks of `weight * max(0, end - due)`
    WeightedTardiness,
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Objective::Makespan => write!(f, "makespan"),
            Objective::TotalLateness => write!(f, "total-lateness"),
            Objective::WeightedTardiness => write!(f, "weighted-tardiness"),
        }
    }
}

/// Error for unrecognized objective names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown objective '{0}' (expected makespan, total-lateness, or weighted-tardiness)")]
pub struct UnknownObjective(pub String);

impl std::str::FromStr for Objective {
    type Err = UnknownObjective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "makespan" => Ok(Objective::Makespan),
            "total-lateness" | "total_lateness" | "lateness" => Ok(Objective::TotalLateness),
            "weighted-tardiness" | "weighted_tardiness" | "tardiness" => {
                Ok(Objective::WeightedTardiness)
            }
            other => Err(UnknownObjective(other.to_string())),
        }
    }
}

// ============================================================================
// Solve Status
// ============================================================================

/// Terminal status of a solve invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// An optimal assignment was found and proven
    Optimal,
    /// A feasible incumbent was found but optimality is unproven
    Feasible,
    /// The solver proved that no feasible assignment exists
    Infeasible,
    /// The objective is unbounded (LP/MIP backends only)
    Unbounded,
    /// The time budget elapsed before any incumbent was found
    TimedOut,
    /// The backend failed internally
    SolverError,
}

impl SolveStatus {
    /// Whether a variable assignment accompanies this status
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
            SolveStatus::TimedOut => write!(f, "TimedOut"),
            SolveStatus::SolverError => write!(f, "SolverError"),
        }
    }
}

// ============================================================================
// Schedule (result)
// ============================================================================

/// A task with its solved start and end times.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Task ID
    pub task_id: TaskId,
    /// Machine the task runs on
    pub machine: MachineId,
    /// Start time in minutes
    pub start: i64,
    /// End time in minutes; always `start + duration`
    pub end: i64,
    /// `max(0, end - due)`, zero for tasks without a due date
    pub lateness: i64,
}

/// The result of solving a shop: a read-only assignment of start and end
/// times, keyed by task ID (and therefore iterated in task-id order).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Scheduled tasks in task-id order
    pub tasks: BTreeMap<TaskId, ScheduledTask>,
    /// Objective that was optimized
    pub objective: Objective,
    /// Value of the objective in the returned assignment
    pub objective_value: i64,
    /// Terminal solver status (`Optimal` or `Feasible`)
    pub status: SolveStatus,
}

impl Schedule {
    /// Completion time of the last task
    pub fn makespan(&self) -> i64 {
        self.tasks.values().map(|t| t.end).max().unwrap_or(0)
    }

    /// Whether the assignment was proven optimal
    pub fn proven_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid instance data, reported before the solver is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("task '{task}': duration must be positive (got {duration} minutes)")]
    NonPositiveDuration { task: TaskId, duration: i64 },

    #[error("task '{task}': release time must be non-negative (got {release})")]
    NegativeRelease { task: TaskId, release: i64 },

    #[error("task '{task}': weight must be non-negative (got {weight})")]
    NegativeWeight { task: TaskId, weight: i64 },

    #[error("task '{task}': duration of {duration} minutes exceeds the {horizon} minute horizon")]
    DurationExceedsHorizon {
        task: TaskId,
        duration: i64,
        horizon: i64,
    },

    #[error("task '{task}': release time {release} is past the {horizon} minute horizon")]
    ReleaseBeyondHorizon {
        task: TaskId,
        release: i64,
        horizon: i64,
    },

    #[error("task '{task}' references unknown machine '{machine}'")]
    UnknownMachine { task: TaskId, machine: MachineId },

    #[error("task '{task}' depends on unknown task '{predecessor}'")]
    UnknownPredecessor { task: TaskId, predecessor: TaskId },

    #[error("duplicate task id '{0}'")]
    DuplicateTask(TaskId),

    #[error("duplicate machine id '{0}'")]
    DuplicateMachine(MachineId),

    #[error("machine '{machine}': capacity must be positive (got {capacity})")]
    NonPositiveCapacity { machine: MachineId, capacity: i64 },

    #[error("machine '{machine}': invalid shift window {start}..{end}")]
    InvalidWindow {
        machine: MachineId,
        start: i64,
        end: i64,
    },

    #[error("slot granularity must be positive (got {0} minutes)")]
    NonPositiveSlot(i64),

    #[error("task '{task}' has no feasible start slot on machine '{machine}'")]
    NoFeasibleStart { task: TaskId, machine: MachineId },

    #[error("cycle detected involving tasks: {tasks:?}")]
    CyclicPrecedence { tasks: Vec<TaskId> },
}

/// Failure to reach or run a solver backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("solver backend '{0}' is not available")]
    BackendUnavailable(String),

    #[error("solver backend failed: {0}")]
    Backend(String),
}

/// Failure to decode a schedule out of a solve result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no assignment to decode: solver status was {0}")]
    NotSolved(SolveStatus),
}

// ============================================================================
// Tests
// ============================================================================
