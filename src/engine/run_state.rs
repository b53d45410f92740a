// src/engine/run_state.rs

//! Pure per-run state machine.
//!
//! [`RunState`] consumes [`RunEvent`]s and decides which tasks start next
//! and when the run is over. It has no channels and performs no IO; the
//! async shell in [`crate::engine::runtime`] drives it.

use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dag::{ScheduledTask, TaskGraph, TaskRunState};
use crate::engine::outcome::{RunOutcome, TaskFailure};
use crate::engine::{Completion, RunEvent, SchedulerOptions, TaskName};
use crate::errors::FlowError;
use crate::types::{Results, TaskValue};

/// Result of asking the run state what to do next.
#[derive(Debug)]
pub enum RunStep<V> {
    /// Start these tasks, then wait for the next event. May be empty when
    /// every in-flight slot is taken.
    Dispatch(Vec<ScheduledTask<V>>),
    /// The run is over.
    Finished(RunOutcome<V>),
}

#[derive(Debug)]
struct TaskEntry {
    has_dependencies: bool,
    state: TaskRunState,
}

/// Mutable state of one execution of a task graph.
#[derive(Debug)]
pub struct RunState<V> {
    tasks: HashMap<TaskName, TaskEntry>,
    ready: VecDeque<TaskName>,
    /// Unsatisfied dependency count per pending task.
    remaining: HashMap<TaskName, usize>,
    /// Dependents to notify when a task succeeds, once per dependency listing.
    listeners: HashMap<TaskName, Vec<TaskName>>,
    /// Shared with the inputs of dispatched tasks; copied on write only while
    /// one of them still holds it.
    results: Arc<Results<V>>,
    in_flight: usize,
    max_concurrency: Option<NonZeroUsize>,
    canceled: bool,
    has_error: bool,
}

impl<V: Clone> RunState<V> {
    /// Seed the run: zero-dependency tasks are ready, every other task
    /// registers itself as a listener on each of its dependencies.
    pub fn seed(graph: &TaskGraph<V>, options: &SchedulerOptions) -> Self {
        let mut state = Self {
            tasks: HashMap::with_capacity(graph.len()),
            ready: VecDeque::new(),
            remaining: HashMap::new(),
            listeners: HashMap::new(),
            results: Arc::new(Results::new()),
            in_flight: 0,
            max_concurrency: options.max_concurrency,
            canceled: false,
            has_error: false,
        };

        for name in graph.tasks() {
            let deps = graph.dependencies_of(name);
            if deps.is_empty() {
                state.ready.push_back(name.to_string());
                state.tasks.insert(
                    name.to_string(),
                    TaskEntry {
                        has_dependencies: false,
                        state: TaskRunState::Ready,
                    },
                );
                continue;
            }

            state.remaining.insert(name.to_string(), deps.len());
            for dep in deps {
                state
                    .listeners
                    .entry(dep.clone())
                    .or_default()
                    .push(name.to_string());
            }
            state.tasks.insert(
                name.to_string(),
                TaskEntry {
                    has_dependencies: true,
                    state: TaskRunState::Pending,
                },
            );
        }

        debug!(
            tasks = state.tasks.len(),
            ready = state.ready.len(),
            "run state seeded"
        );
        state
    }

    /// Drain step: finish the run if nothing is ready or in flight,
    /// otherwise hand out every ready task the concurrency limit allows.
    pub fn next_dispatch(&mut self) -> RunStep<V> {
        if self.canceled {
            return RunStep::Finished(RunOutcome::Canceled);
        }
        if self.has_error {
            // The failure was already returned from `apply`; nothing new may start.
            return RunStep::Dispatch(Vec::new());
        }

        if self.ready.is_empty() && self.in_flight == 0 {
            info!(tasks = self.results.len(), "all tasks completed");
            let results = std::mem::take(&mut self.results);
            let results = Arc::try_unwrap(results).unwrap_or_else(|shared| (*shared).clone());
            return RunStep::Finished(RunOutcome::Completed(results));
        }

        let mut batch = Vec::new();
        while self.has_free_slot() {
            let Some(name) = self.ready.pop_front() else {
                break;
            };
            let Some(entry) = self.tasks.get_mut(&name) else {
                warn!(task = %name, "ready task missing from run state; skipping");
                continue;
            };

            entry.state = TaskRunState::Running;
            self.in_flight += 1;

            let input = if entry.has_dependencies {
                Some(Arc::clone(&self.results))
            } else {
                None
            };

            debug!(task = %name, in_flight = self.in_flight, "dispatching task");
            batch.push(ScheduledTask { name, input });
        }

        RunStep::Dispatch(batch)
    }

    /// Apply one event. Returns the terminal outcome if this event ended
    /// the run.
    pub fn apply(&mut self, event: RunEvent<V>) -> Option<RunOutcome<V>> {
        let (task, completion) = match event {
            RunEvent::TaskCompleted { task, completion } => (task, completion),
            RunEvent::SignalDropped { task } => {
                let error = FlowError::SignalDropped(task.clone());
                (
                    task,
                    Completion::Failure {
                        error: error.into(),
                        partial: TaskValue::Empty,
                    },
                )
            }
        };

        if self.canceled || self.has_error {
            debug!(task = %task, "run already terminated; discarding completion");
            return None;
        }

        match self.tasks.get(&task).map(|e| e.state) {
            Some(TaskRunState::Running) => {}
            Some(state) => {
                warn!(task = %task, ?state, "completion for task that is not running; ignoring");
                return None;
            }
            None => {
                warn!(task = %task, "completion for unknown task; ignoring");
                return None;
            }
        }

        self.in_flight -= 1;

        match completion {
            Completion::Cancel => {
                info!(task = %task, "task canceled the run");
                self.set_state(&task, TaskRunState::Canceled);
                self.canceled = true;
                Some(RunOutcome::Canceled)
            }
            Completion::Failure { error, partial } => {
                warn!(task = %task, error = %error, "task failed; no further tasks will start");
                self.set_state(&task, TaskRunState::Failed);
                self.has_error = true;
                self.listeners.clear();
                self.ready.clear();

                let mut snapshot = (*self.results).clone();
                snapshot.insert(task.clone(), partial);

                Some(RunOutcome::Failed(TaskFailure {
                    task,
                    error,
                    partial: snapshot,
                }))
            }
            Completion::Success(value) => {
                debug!(task = %task, values = value.len(), "task succeeded");
                self.set_state(&task, TaskRunState::Succeeded);
                Arc::make_mut(&mut self.results).insert(task.clone(), value);
                self.notify_listeners(&task);
                None
            }
        }
    }

    /// State of `task` in this run, or `None` if it is not part of the graph.
    pub fn task_state(&self, task: &str) -> Option<TaskRunState> {
        self.tasks.get(task).map(|e| e.state)
    }

    /// Number of tasks whose work has been invoked but has not reported.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Number of tasks waiting for a free slot.
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    /// Results stored so far.
    pub fn results(&self) -> &Results<V> {
        &self.results
    }

    fn has_free_slot(&self) -> bool {
        match self.max_concurrency {
            Some(limit) => self.in_flight < limit.get(),
            None => true,
        }
    }

    fn set_state(&mut self, task: &str, state: TaskRunState) {
        if let Some(entry) = self.tasks.get_mut(task) {
            entry.state = state;
        }
    }

    /// Decrement the counter of each dependent of `task`, queueing those that
    /// reach zero.
    fn notify_listeners(&mut self, task: &str) {
        let Some(dependents) = self.listeners.remove(task) else {
            return;
        };

        for dependent in dependents {
            let Some(count) = self.remaining.get_mut(&dependent) else {
                continue;
            };
            *count -= 1;
            if *count > 0 {
                continue;
            }

            self.remaining.remove(&dependent);
            debug!(task = %dependent, unblocked_by = %task, "dependencies satisfied; task ready");
            self.set_state(&dependent, TaskRunState::Ready);
            self.ready.push_back(dependent);
        }
    }
}
