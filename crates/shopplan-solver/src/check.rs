//! Schedule auditing
//!
//! Re-checks a decoded schedule against every model invariant: duration
//! linkage, release times, precedence edges, per-machine concurrency
//! against capacity, and shift-window containment. Used by the test suite
//! and the CLI's `--check` flag.

use shopplan_core::{Schedule, Shop, TaskId};

/// Categories of audit findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// `end != start + duration`
    DurationLinkage,
    /// `start < release`
    ReleaseViolated,
    /// A successor starts before its predecessor ends
    PrecedenceViolated,
    /// More tasks active on a machine than its capacity allows
    CapacityExceeded,
    /// A task does not fit inside one of its machine's daily windows
    OutsideWindow,
    /// The schedule misses a task or names an unknown one
    TaskMismatch,
}

/// One audit finding.
#[derive(Debug, Clone)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Audit a schedule against its shop. Returns every finding rather than
/// stopping at the first.
pub fn check_schedule(shop: &Shop, schedule: &Schedule) -> Vec<Violation> {
    let mut violations = Vec::new();

    for task in &shop.tasks {
        let Some(scheduled) = schedule.tasks.get(&task.id) else {
            violations.push(Violation::new(
                ViolationKind::TaskMismatch,
                format!("task '{}' is missing from the schedule", task.id),
            ));
            continue;
        };

        if scheduled.end != scheduled.start + task.duration {
            violations.push(Violation::new(
                ViolationKind::DurationLinkage,
                format!(
                    "task '{}': end {} != start {} + duration {}",
                    task.id, scheduled.end, scheduled.start, task.duration
                ),
            ));
        }

        if scheduled.start < task.release {
            violations.push(Violation::new(
                ViolationKind::ReleaseViolated,
                format!(
                    "task '{}' starts at {} before its release time {}",
                    task.id, scheduled.start, task.release
                ),
            ));
        }

        for pred_id in &task.predecessors {
            let Some(pred) = schedule.tasks.get(pred_id) else {
                continue;
            };
            if scheduled.start < pred.end {
                violations.push(Violation::new(
                    ViolationKind::PrecedenceViolated,
                    format!(
                        "task '{}' starts at {} before predecessor '{}' ends at {}",
                        task.id, scheduled.start, pred_id, pred.end
                    ),
                ));
            }
        }
    }

    for id in schedule.tasks.keys() {
        if shop.task(id).is_none() {
            violations.push(Violation::new(
                ViolationKind::TaskMismatch,
                format!("schedule names unknown task '{id}'"),
            ));
        }
    }

    check_capacity(shop, schedule, &mut violations);
    check_windows(shop, schedule, &mut violations);

    violations
}

/// Event sweep per machine: ends release capacity before coincident starts
/// claim it, so back-to-back intervals do not count as overlapping.
fn check_capacity(shop: &Shop, schedule: &Schedule, violations: &mut Vec<Violation>) {
    for machine in &shop.machines {
        let mut events: Vec<(i64, i64, &TaskId)> = Vec::new();
        for scheduled in schedule.tasks.values() {
            if scheduled.machine == machine.id {
                events.push((scheduled.start, 1, &scheduled.task_id));
                events.push((scheduled.end, -1, &scheduled.task_id));
            }
        }
        events.sort_by_key(|&(time, delta, _)| (time, delta));

        let mut active = 0i64;
        for (time, delta, task_id) in events {
            active += delta;
            if active > machine.capacity {
                violations.push(Violation::new(
                    ViolationKind::CapacityExceeded,
                    format!(
                        "machine '{}': {} tasks active at minute {} (capacity {}, at task '{}')",
                        machine.id, active, time, machine.capacity, task_id
                    ),
                ));
            }
        }
    }
}

fn check_windows(shop: &Shop, schedule: &Schedule, violations: &mut Vec<Violation>) {
    for scheduled in schedule.tasks.values() {
        let Some(machine) = shop.machine(&scheduled.machine) else {
            continue;
        };
        if machine.windows.is_empty() {
            continue;
        }

        let day = scheduled.start.div_euclid(shopplan_core::MINUTES_PER_DAY);
        let offset = day * shopplan_core::MINUTES_PER_DAY;
        let fits = machine.windows.iter().any(|w| {
            scheduled.start >= offset + w.start && scheduled.end <= offset + w.end
        });
        if !fits {
            violations.push(Violation::new(
                ViolationKind::OutsideWindow,
                format!(
                    "task '{}' ({}..{}) falls outside the working windows of machine '{}'",
                    scheduled.task_id, scheduled.start, scheduled.end, scheduled.machine
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopplan_core::{Machine, Objective, Schedule, ScheduledTask, Shop, SolveStatus, Task};
    use std::collections::BTreeMap;

    fn shop_one_machine() -> Shop {
        let mut shop = Shop::new("test");
        shop.machines.push(Machine::new("m"));
        shop.tasks.push(Task::new("a").on("m").duration_minutes(10));
        shop.tasks
            .push(Task::new("b").on("m").duration_minutes(10).after("a"));
        shop
    }

    fn schedule_of(entries: &[(&str, &str, i64, i64)]) -> Schedule {
        let mut tasks = BTreeMap::new();
        for &(id, machine, start, end) in entries {
            tasks.insert(
                id.to_string(),
                ScheduledTask {
                    task_id: id.to_string(),
                    machine: machine.to_string(),
                    start,
                    end,
                    lateness: 0,
                },
            );
        }
        Schedule {
            tasks,
            objective: Objective::Makespan,
            objective_value: 0,
            status: SolveStatus::Optimal,
        }
    }

    #[test]
    fn clean_schedule_has_no_violations() {
        let shop = shop_one_machine();
        let schedule = schedule_of(&[("a", "m", 0, 10), ("b", "m", 10, 20)]);
        assert!(check_schedule(&shop, &schedule).is_empty());
    }

    #[test]
    fn overlap_on_serial_machine_is_flagged() {
        let mut shop = Shop::new("test");
        shop.machines.push(Machine::new("m"));
        shop.tasks.push(Task::new("a").on("m").duration_minutes(10));
        shop.tasks.push(Task::new("b").on("m").duration_minutes(10));

        let schedule = schedule_of(&[("a", "m", 0, 10), ("b", "m", 5, 15)]);
        let violations = check_schedule(&shop, &schedule);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::CapacityExceeded));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let mut shop = Shop::new("test");
        shop.machines.push(Machine::new("m"));
        shop.tasks.push(Task::new("a").on("m").duration_minutes(10));
        shop.tasks.push(Task::new("b").on("m").duration_minutes(10));

        let schedule = schedule_of(&[("a", "m", 0, 10), ("b", "m", 10, 20)]);
        assert!(check_schedule(&shop, &schedule).is_empty());
    }

    #[test]
    fn capacity_two_allows_two_concurrent() {
        let mut shop = Shop::new("test");
        shop.machines.push(Machine::new("m").capacity(2));
        for id in ["a", "b", "c"] {
            shop.tasks.push(Task::new(id).on("m").duration_minutes(10));
        }

        let two_wide = schedule_of(&[("a", "m", 0, 10), ("b", "m", 0, 10), ("c", "m", 10, 20)]);
        assert!(check_schedule(&shop, &two_wide).is_empty());

        let three_wide = schedule_of(&[("a", "m", 0, 10), ("b", "m", 0, 10), ("c", "m", 5, 15)]);
        assert!(check_schedule(&shop, &three_wide)
            .iter()
            .any(|v| v.kind == ViolationKind::CapacityExceeded));
    }

    #[test]
    fn precedence_violation_is_flagged() {
        let shop = shop_one_machine();
        let schedule = schedule_of(&[("a", "m", 10, 20), ("b", "m", 0, 10)]);
        assert!(check_schedule(&shop, &schedule)
            .iter()
            .any(|v| v.kind == ViolationKind::PrecedenceViolated));
    }

    #[test]
    fn release_violation_is_flagged() {
        let mut shop = Shop::new("test");
        shop.machines.push(Machine::new("m"));
        shop.tasks
            .push(Task::new("a").on("m").duration_minutes(10).release(50));

        let schedule = schedule_of(&[("a", "m", 0, 10)]);
        assert!(check_schedule(&shop, &schedule)
            .iter()
            .any(|v| v.kind == ViolationKind::ReleaseViolated));
    }

    #[test]
    fn window_containment_is_checked() {
        let mut shop = Shop::new("test");
        shop.machines.push(Machine::new("m").window(480, 960));
        shop.tasks.push(Task::new("a").on("m").duration_minutes(60));

        let inside = schedule_of(&[("a", "m", 480, 540)]);
        assert!(check_schedule(&shop, &inside).is_empty());

        let outside = schedule_of(&[("a", "m", 930, 990)]);
        assert!(check_schedule(&shop, &outside)
            .iter()
            .any(|v| v.kind == ViolationKind::OutsideWindow));
    }

    #[test]
    fn missing_task_is_flagged() {
        let shop = shop_one_machine();
        let schedule = schedule_of(&[("a", "m", 0, 10)]);
        assert!(check_schedule(&shop, &schedule)
            .iter()
            .any(|v| v.kind == ViolationKind::TaskMismatch));
    }
}
