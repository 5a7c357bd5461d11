// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::dag::{
    DagGraph, LayerPlan, LayeredScheduler, RunReport, ScheduleError, Task, plan_layers,
};
use crate::errors::DagrunError;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - dry-run planning
/// - the layered scheduler with shell command bodies
/// - the run summary and cycle diagnostics
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?
        .with_overrides(args.single_entry_point, args.skip_on_failed_dependency);

    let root_dir = config_root_dir(&config_path);
    let tasks = cfg.tasks(&root_dir);
    let options = cfg.scheduler_options();

    if args.dry_run {
        let plan = plan_layers(&tasks, &options.validation).map_err(DagrunError::from)?;
        print_dry_run(&tasks, &plan);
        return Ok(());
    }

    let graph = DagGraph::from_tasks(&tasks);
    info!(
        entry_points = ?graph.entry_points(),
        tasks = tasks.len(),
        "loaded task graph"
    );

    let scheduler = LayeredScheduler::new(options);
    let report = match scheduler.run(tasks).await {
        Ok(report) => report,
        Err(err) => {
            if let ScheduleError::CycleDetected {
                ref unrun,
                ref report,
            } = err
            {
                print_summary(report);
                print_cycle_diagnostics(&graph, unrun);
            }
            return Err(DagrunError::from(err).into());
        }
    };

    print_summary(&report);

    let unsuccessful = report.unsuccessful();
    if !unsuccessful.is_empty() {
        return Err(anyhow!(
            "{} of {} task(s) did not succeed: {}",
            unsuccessful.len(),
            report.attempted(),
            unsuccessful.join(", ")
        ));
    }

    Ok(())
}

/// Directory commands run in by default.
///
/// - If the config path has a non-empty parent (e.g. "configs/Dagrun.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Dagrun.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Dry-run output: the planned layers, commands are not executed.
fn print_dry_run(tasks: &[Task], plan: &LayerPlan) {
    let graph = DagGraph::from_tasks(tasks);

    println!("dagrun dry-run");
    println!("  entry points: {:?}", graph.entry_points());
    println!();

    println!("layers ({}):", plan.layers.len());
    for (index, layer) in plan.layers.iter().enumerate() {
        println!("  {index}: {}", layer.join(", "));
        for name in layer {
            let deps = graph.dependencies_of(name);
            if !deps.is_empty() {
                println!("      {name} after: {:?}", deps);
            }
        }
    }

    if !plan.is_complete() {
        println!();
        println!("never reached ({}):", plan.unplaceable.len());
        print_cycle_diagnostics(&graph, &plan.unplaceable);
    }

    debug!("dry-run complete (no execution)");
}

fn print_summary(report: &RunReport) {
    println!("dagrun summary");
    for (index, layer) in report.layers().iter().enumerate() {
        println!("  layer {index}:");
        for name in layer {
            if let Some(record) = report.record_of(name) {
                println!(
                    "    {name}: {} ({:.2?})",
                    record.outcome, record.elapsed
                );
            }
        }
    }
}

fn print_cycle_diagnostics(graph: &DagGraph, unrun: &[String]) {
    for group in graph.cyclic_groups(unrun) {
        println!("  cycle: {}", group.join(" <-> "));
    }
    let blocked = graph.blocked_behind_cycles(unrun);
    if !blocked.is_empty() {
        println!("  blocked behind a cycle: {}", blocked.join(", "));
    }
}
