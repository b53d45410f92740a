// src/engine/outcome.rs

//! Terminal outcome of a run.

use std::fmt;

use crate::engine::TaskName;
use crate::types::Results;

/// The single terminal outcome of a scheduler run.
#[derive(Debug)]
pub enum RunOutcome<V> {
    /// Every task succeeded.
    Completed(Results<V>),
    /// The first task failure observed.
    Failed(TaskFailure<V>),
    /// A task canceled the run. Nothing is delivered on this path.
    Canceled,
}

impl<V> RunOutcome<V> {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, RunOutcome::Canceled)
    }

    /// Convert into the callback form: `Some(Ok(results))`,
    /// `Some(Err(failure))`, or `None` when the run was canceled.
    pub fn into_result(self) -> Option<Result<Results<V>, TaskFailure<V>>> {
        match self {
            RunOutcome::Completed(results) => Some(Ok(results)),
            RunOutcome::Failed(failure) => Some(Err(failure)),
            RunOutcome::Canceled => None,
        }
    }
}

/// The first task error of a run, with the results gathered so far.
#[derive(Debug)]
pub struct TaskFailure<V> {
    /// The task that failed.
    pub task: TaskName,
    pub error: anyhow::Error,
    /// Results of every task that completed before the failure, plus the
    /// failing task's partial value under its own name.
    pub partial: Results<V>,
}

impl<V> fmt::Display for TaskFailure<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task `{}` failed: {}", self.task, self.error)
    }
}
