// src/engine/mod.rs

//! Execution engine for flowdag.
//!
//! This module ties together:
//! - the per-run state machine ([`run_state`]) that owns the ready queue,
//!   dependency counters, listeners and results
//! - the completion signal ([`signal`]) handed to each task body
//! - the async shell ([`runtime`]) that starts ready tasks and feeds their
//!   completions back into the state machine
//!
//! The state machine is synchronous and does no IO, so it can be stepped
//! by hand in tests.

use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::types::{Results, TaskValue};

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Input handed to a task body: a shared snapshot of the results
/// accumulated so far for tasks with dependencies, `None` for tasks without.
///
/// Every task of one dispatch batch sees the same snapshot.
pub type TaskInput<V> = Option<Arc<Results<V>>>;

/// Outcome a task reports through its [`CompletionSignal`].
#[derive(Debug)]
pub enum Completion<V> {
    /// The task finished and produced zero, one or several values.
    Success(TaskValue<V>),
    /// The task failed. `partial` is stored under the task's own name in the
    /// results delivered with the error.
    Failure {
        error: anyhow::Error,
        partial: TaskValue<V>,
    },
    /// Stop the whole run without delivering any outcome.
    Cancel,
}

/// Events flowing from task bodies into the run loop.
#[derive(Debug)]
pub enum RunEvent<V> {
    /// A task reported an outcome.
    TaskCompleted {
        task: TaskName,
        completion: Completion<V>,
    },
    /// A task's signal was dropped without being used.
    SignalDropped { task: TaskName },
}

/// Options for a scheduler run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerOptions {
    /// Maximum number of tasks in flight at once.
    ///
    /// `None` (the default) starts every ready task immediately, so the
    /// effective ceiling is the number of tasks in the graph.
    pub max_concurrency: Option<NonZeroUsize>,
}

pub mod outcome;
pub mod run_state;
pub mod runtime;
pub mod signal;

pub use outcome::{RunOutcome, TaskFailure};
pub use run_state::{RunState, RunStep};
pub use runtime::Scheduler;
pub use signal::CompletionSignal;
