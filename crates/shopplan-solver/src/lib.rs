//! # shopplan-solver
//!
//! Everything between a `Shop` instance and a `Schedule`:
//!
//! - Precedence graph validation (cycle detection before any solver call)
//! - Translation of an instance into an immutable [`ModelDescriptor`]
//! - The narrow [`SolverBackend`] oracle interface and the Pumpkin adapter
//! - Decoding a [`SolveResult`] back into a [`shopplan_core::Schedule`]
//! - Post-hoc auditing of a schedule against every model invariant
//!
//! The solver itself is an external oracle: this crate builds the
//! mathematical program and interprets the answer, but implements no search
//! of its own.
//!
//! ## Example
//!
//! ```rust,no_run
//! use shopplan_core::{Machine, Shop, Task};
//! use shopplan_solver::{build_model, decode_schedule, solve, SolveOptions};
//!
//! let mut shop = Shop::new("Demo");
//! shop.machines.push(Machine::new("mill"));
//! shop.tasks.push(Task::new("a").on("mill").duration_minutes(30));
//!
//! let options = SolveOptions::default();
//! let model = build_model(&shop, &options)?;
//! let result = solve(&model, &options)?;
//! let schedule = decode_schedule(&model, &result)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod backend;
mod check;
mod cp;
mod decode;
mod graph;
mod model;

pub use backend::{backend_by_name, solve, SolveOptions, SolveResult, SolverBackend};
pub use check::{check_schedule, Violation, ViolationKind};
pub use cp::PumpkinBackend;
pub use decode::decode_schedule;
pub use graph::PrecedenceGraph;
pub use model::{
    build_model, ConstraintDecl, LinTerm, ModelBuilder, ModelDescriptor, ObjectiveDecl, TaskVar,
    VarDecl, VarDomain, VarId,
};
