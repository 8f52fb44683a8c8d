//! shopplan CLI - Finite-Capacity Shop Scheduling
//!
//! Command-line interface for building the scheduling model, handing it to
//! the solver oracle, and printing the resulting schedule.

use anyhow::{bail, Context, Result};
use clap::Parser;
use shopplan_core::{Objective, Shop};
use shopplan_solver::{build_model, check_schedule, decode_schedule, solve, SolveOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod example;
mod report;

#[derive(Parser)]
#[command(name = "shopplan")]
#[command(author, version, about = "Finite-capacity shop scheduling", long_about = None)]
struct Cli {
    /// Problem instance as JSON (runs the built-in factory example if omitted)
    #[arg(value_name = "FILE")]
    instance: Option<std::path::PathBuf>,

    /// Solver backend
    #[arg(short, long, default_value = "pumpkin")]
    solver: String,

    /// Objective: makespan, total-lateness, or weighted-tardiness
    #[arg(short, long, default_value = "makespan")]
    objective: String,

    /// Time limit in seconds
    #[arg(short, long, default_value_t = 10)]
    time_limit: u64,

    /// Relative optimality gap for MIP-style backends
    #[arg(long, default_value_t = 0.0)]
    mip_gap: f64,

    /// Audit the decoded schedule against every constraint
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; -v / -vv override RUST_LOG
    let filter = match cli.verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let shop: Shop = match &cli.instance {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading instance {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing instance {}", path.display()))?
        }
        None => example::factory_shop(),
    };

    let objective = Objective::from_str(&cli.objective)?;
    let options = SolveOptions {
        backend: cli.solver.clone(),
        time_limit: Duration::from_secs(cli.time_limit),
        mip_gap: cli.mip_gap,
        objective,
    };

    tracing::info!(shop = %shop.name, tasks = shop.tasks.len(), %objective, "building model");
    let model = build_model(&shop, &options)?;
    tracing::debug!(
        vars = model.vars.len(),
        constraints = model.constraints.len(),
        "model built"
    );

    let result = solve(&model, &options)?;
    tracing::info!(status = %result.status, elapsed_ms = result.elapsed.as_millis() as u64, "solve finished");

    println!(
        "Status: {} (backend: {}, {} ms)",
        result.status,
        result.backend,
        result.elapsed.as_millis()
    );

    if !result.status.has_solution() {
        println!("No schedule produced.");
        std::process::exit(1);
    }
    if result.degraded_optimality() {
        println!("Warning: time limit reached; best incumbent shown, optimality unproven.");
    }

    let schedule = decode_schedule(&model, &result)?;
    report::print_schedule(&shop, &schedule);

    if cli.check {
        let violations = check_schedule(&shop, &schedule);
        if violations.is_empty() {
            println!("Check passed: schedule satisfies all constraints.");
        } else {
            for v in &violations {
                eprintln!("violation: {}", v.message);
            }
            bail!("schedule failed {} constraint check(s)", violations.len());
        }
    }

    Ok(())
}
