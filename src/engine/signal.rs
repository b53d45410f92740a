// src/engine/signal.rs

//! One-shot completion handle given to every task body.

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{Completion, RunEvent, TaskName};
use crate::types::TaskValue;

/// Reports the outcome of one task back to the run loop.
///
/// Every reporting method consumes the signal, so a task can report at most
/// once. The signal is `Send` and may be moved to another task or thread to
/// report later. Dropping it without reporting fails the task with
/// [`crate::errors::FlowError::SignalDropped`].
///
/// Reporting after the run has already finished (because another task
/// failed or canceled) is silently discarded.
pub struct CompletionSignal<V> {
    task: TaskName,
    tx: Option<mpsc::UnboundedSender<RunEvent<V>>>,
}

impl<V> CompletionSignal<V> {
    pub(crate) fn new(task: TaskName, tx: mpsc::UnboundedSender<RunEvent<V>>) -> Self {
        Self { task, tx: Some(tx) }
    }

    /// Report an explicit [`Completion`].
    pub fn complete(mut self, completion: Completion<V>) {
        let Some(tx) = self.tx.take() else {
            return;
        };

        let event = RunEvent::TaskCompleted {
            task: self.task.clone(),
            completion,
        };
        if tx.send(event).is_err() {
            debug!(task = %self.task, "run already finished; discarding completion");
        }
    }

    /// Succeed with any number of values (`Vec`, `Option` or a [`TaskValue`]).
    pub fn success(self, values: impl Into<TaskValue<V>>) {
        self.complete(Completion::Success(values.into()));
    }

    /// Succeed with exactly one value.
    pub fn success_one(self, value: V) {
        self.complete(Completion::Success(TaskValue::Single(value)));
    }

    /// Succeed without producing a value.
    pub fn success_none(self) {
        self.complete(Completion::Success(TaskValue::Empty));
    }

    /// Fail without a partial value.
    pub fn fail(self, error: impl Into<anyhow::Error>) {
        self.fail_with(error, TaskValue::Empty);
    }

    /// Fail, keeping `partial` in the results delivered with the error.
    pub fn fail_with(self, error: impl Into<anyhow::Error>, partial: impl Into<TaskValue<V>>) {
        self.complete(Completion::Failure {
            error: error.into(),
            partial: partial.into(),
        });
    }

    /// Stop the whole run. No outcome is delivered to the caller.
    pub fn cancel(self) {
        self.complete(Completion::Cancel);
    }
}

impl<V> Drop for CompletionSignal<V> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(RunEvent::SignalDropped {
                task: std::mem::take(&mut self.task),
            });
        }
    }
}

impl<V> fmt::Debug for CompletionSignal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("task", &self.task)
            .field("used", &self.tx.is_none())
            .finish()
    }
}
