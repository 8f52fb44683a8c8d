//! Console schedule report
//!
//! Per-task rows in task-id order, the objective value, and per-machine
//! utilization over the planning horizon.

use shopplan_core::{Objective, Schedule, Shop, MINUTES_PER_DAY};

/// Render a minute offset as `Day d hh:mm`.
fn format_minutes(t: i64) -> String {
    let day = t / MINUTES_PER_DAY + 1;
    let mins = t % MINUTES_PER_DAY;
    format!("Day {} {:02}:{:02}", day, mins / 60, mins % 60)
}

/// Print the schedule table, objective value, and machine utilization.
pub fn print_schedule(shop: &Shop, schedule: &Schedule) {
    println!();
    println!("Final Schedule:");
    for task in schedule.tasks.values() {
        println!(
            "{:<16} | Machine: {:<12} | Start: {:>5} ({}) | End: {:>5} ({})",
            task.task_id,
            task.machine,
            task.start,
            format_minutes(task.start),
            task.end,
            format_minutes(task.end),
        );
    }

    println!();
    println!(
        "Objective ({}) = {}",
        schedule.objective, schedule.objective_value
    );
    let makespan = schedule.makespan();
    println!(
        "Total makespan = {} minutes ({:.1} hours)",
        makespan,
        makespan as f64 / 60.0
    );
    if schedule.objective != Objective::Makespan {
        let late: Vec<_> = schedule
            .tasks
            .values()
            .filter(|t| t.lateness > 0)
            .collect();
        if late.is_empty() {
            println!("All tasks meet their due dates.");
        } else {
            for task in late {
                println!("{} is {} minutes late", task.task_id, task.lateness);
            }
        }
    }

    println!();
    println!("Machine Utilization:");
    let days = shop.horizon_minutes as f64 / MINUTES_PER_DAY as f64;
    for machine in &shop.machines {
        let busy: i64 = shop
            .tasks
            .iter()
            .filter(|t| t.machine == machine.id)
            .map(|t| t.duration)
            .sum();
        let available = machine.minutes_per_day() as f64 * days;
        let utilization = if available > 0.0 {
            busy as f64 / available * 100.0
        } else {
            0.0
        };
        println!(
            "{}: {:.2}% utilization ({} minutes)",
            machine.id, utilization, busy
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_formatting() {
        assert_eq!(format_minutes(0), "Day 1 00:00");
        assert_eq!(format_minutes(480), "Day 1 08:00");
        assert_eq!(format_minutes(1440 + 605), "Day 2 10:05");
    }
}
