// src/engine/runtime.rs

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dag::{check_acyclic, ScheduledTask, TaskGraph, Work};
use crate::engine::outcome::{RunOutcome, TaskFailure};
use crate::engine::run_state::{RunState, RunStep};
use crate::engine::signal::CompletionSignal;
use crate::engine::{RunEvent, SchedulerOptions, TaskName};
use crate::errors::{FlowError, Result};
use crate::types::Results;

/// Runs task graphs.
///
/// The scheduler is the async shell around [`RunState`]: it starts the
/// tasks the state machine hands out and feeds their completion events back
/// in, one at a time, until the run finishes. All run state lives inside a
/// single call to [`Scheduler::execute`].
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    options: SchedulerOptions,
}

impl Scheduler {
    pub fn new(options: SchedulerOptions) -> Self {
        Self { options }
    }

    /// Execute every task of `graph` and return the terminal outcome.
    ///
    /// Fails synchronously with [`FlowError::CyclicDependency`] before any
    /// task runs if the graph cannot be fully resolved. Otherwise returns
    /// as soon as the outcome is known: when every task succeeded, at the
    /// first failure, or at the first cancellation. Tasks still in flight
    /// at that point are not aborted; whatever they report later is
    /// discarded.
    pub async fn execute<V>(&self, graph: TaskGraph<V>) -> Result<RunOutcome<V>>
    where
        V: Clone + Send + 'static,
    {
        check_acyclic(&graph)?;

        info!(
            tasks = graph.len(),
            max_concurrency = ?self.options.max_concurrency,
            "run starting"
        );

        let mut state = RunState::seed(&graph, &self.options);
        let mut works = graph.into_works();
        let (tx, mut rx) = mpsc::unbounded_channel::<RunEvent<V>>();

        loop {
            match state.next_dispatch() {
                RunStep::Finished(outcome) => {
                    log_outcome(&outcome);
                    return Ok(outcome);
                }
                RunStep::Dispatch(batch) => {
                    let mut applied = false;
                    for task in batch {
                        start_task(&mut works, task, &tx);

                        // Apply what the body already reported, so a synchronous
                        // failure or cancel stops the rest of the batch.
                        while let Ok(event) = rx.try_recv() {
                            applied = true;
                            if let Some(outcome) = state.apply(event) {
                                log_outcome(&outcome);
                                return Ok(outcome);
                            }
                        }
                    }
                    if applied {
                        continue;
                    }
                }
            }

            // We hold `tx`, so the channel cannot close while we wait.
            let Some(event) = rx.recv().await else {
                return Err(FlowError::Other(anyhow::anyhow!(
                    "run event channel closed unexpectedly"
                )));
            };

            if let Some(outcome) = state.apply(event) {
                log_outcome(&outcome);
                return Ok(outcome);
            }
        }
    }

    /// Execute `graph` and hand the outcome to `on_complete`.
    ///
    /// `on_complete` receives `Ok(results)` when every task succeeded and
    /// `Err(failure)` for the first task failure. When a task cancels the
    /// run, `on_complete` is **not** called at all.
    pub async fn run<V, F>(&self, graph: TaskGraph<V>, on_complete: F) -> Result<()>
    where
        V: Clone + Send + 'static,
        F: FnOnce(std::result::Result<Results<V>, TaskFailure<V>>),
    {
        match self.execute(graph).await?.into_result() {
            Some(result) => on_complete(result),
            None => debug!("run canceled; completion callback not invoked"),
        }
        Ok(())
    }
}

/// Invoke the body of one scheduled task with a fresh completion signal.
fn start_task<V>(
    works: &mut HashMap<TaskName, Work<V>>,
    task: ScheduledTask<V>,
    tx: &mpsc::UnboundedSender<RunEvent<V>>,
) {
    let ScheduledTask { name, input } = task;

    let Some(work) = works.remove(&name) else {
        error!(task = %name, "task body already consumed; refusing to start it twice");
        return;
    };

    info!(task = %name, "starting task");

    let signal = CompletionSignal::new(name.clone(), tx.clone());
    // A panicking body drops its signal while unwinding, which reports the
    // task as failed.
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || work(input, signal))) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic payload>".to_string());
        error!(task = %name, panic = %message, "task body panicked");
    }
}

fn log_outcome<V>(outcome: &RunOutcome<V>) {
    match outcome {
        RunOutcome::Completed(results) => {
            info!(tasks = results.len(), "run completed");
        }
        RunOutcome::Failed(failure) => {
            error!(task = %failure.task, error = %failure.error, "run failed");
        }
        RunOutcome::Canceled => {
            info!("run canceled");
        }
    }
}
