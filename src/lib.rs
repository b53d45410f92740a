// src/lib.rs

//! Dependency-aware task orchestration.
//!
//! Declare named tasks with their prerequisites, then let the
//! [`Scheduler`](engine::Scheduler) run each task exactly once, in
//! dependency order, starting independent tasks together:
//!
//! ```no_run
//! use flowdag::dag::TaskGraph;
//! use flowdag::engine::{RunOutcome, Scheduler};
//!
//! # async fn demo() -> flowdag::errors::Result<()> {
//! let graph = TaskGraph::<i64>::builder()
//!     .root("A", |_, done| done.success_one(1))
//!     .task("B", ["A"], |input, done| {
//!         let a = input
//!             .as_ref()
//!             .and_then(|r| r.get("A"))
//!             .and_then(|v| v.single().copied())
//!             .unwrap_or_default();
//!         done.success_one(a + 1)
//!     })
//!     .build()?;
//!
//! if let RunOutcome::Completed(results) = Scheduler::default().execute(graph).await? {
//!     println!("{results:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::FlowFile;
use crate::config::topological_order;
use crate::engine::{RunOutcome, Scheduler, SchedulerOptions};
use crate::exec::build_graph;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - pipeline loading and validation
/// - graph construction
/// - the scheduler run
/// - result reporting
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let flow = load_and_validate(&config_path)
        .with_context(|| format!("loading pipeline '{}'", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&flow)?;
        return Ok(());
    }

    let options = SchedulerOptions {
        max_concurrency: args.max_concurrency.or_else(|| {
            flow.config
                .max_concurrency
                .and_then(NonZeroUsize::new)
        }),
    };

    let graph = build_graph(&flow)?;
    let scheduler = Scheduler::new(options);

    match scheduler.execute(graph).await? {
        RunOutcome::Completed(results) => {
            info!(steps = results.len(), "pipeline finished");
            for (name, value) in &results {
                debug!(step = %name, values = value.len(), "step result");
            }
            Ok(())
        }
        RunOutcome::Failed(failure) => {
            for (name, value) in &failure.partial {
                debug!(step = %name, values = value.len(), "partial result");
            }
            let step = failure.task;
            Err(failure.error.context(format!("step `{step}` failed")))
        }
        RunOutcome::Canceled => {
            warn!("pipeline canceled; no results delivered");
            Ok(())
        }
    }
}

/// Simple dry-run output: print steps, deps, logic and execution order.
fn print_dry_run(flow: &FlowFile) -> Result<()> {
    println!("flowdag dry-run");
    match flow.config.max_concurrency {
        Some(n) => println!("  config.max_concurrency = {n}"),
        None => println!("  config.max_concurrency = unlimited"),
    }
    println!();

    println!("steps ({}):", flow.steps.len());
    for step in &flow.steps {
        println!("  - {}", step.name);
        if !step.dependencies().is_empty() {
            println!("      depends_on: {:?}", step.dependencies());
        }
        if step.shell {
            println!("      shell: true");
        }
        for line in &step.logic {
            println!("      logic: {line}");
        }
    }
    println!();

    let order = topological_order(&flow.steps)?;
    println!("order: {}", order.join(" -> "));

    debug!("dry-run complete (no execution)");
    Ok(())
}
