// src/dag/task_info.rs

//! Per-run task lifecycle and dispatch types.

use crate::engine::{TaskInput, TaskName};

/// Read-only view of a task's state within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    /// Waiting on at least one dependency.
    Pending,
    /// All dependencies succeeded; queued to start.
    Ready,
    /// Work has been invoked and has not reported yet.
    Running,
    Succeeded,
    Failed,
    /// The task reported cancellation.
    Canceled,
}

/// A task the run state wants started now.
#[derive(Debug, Clone)]
pub struct ScheduledTask<V> {
    pub name: TaskName,
    /// Accumulated results for tasks with dependencies, `None` otherwise.
    pub input: TaskInput<V>,
}
