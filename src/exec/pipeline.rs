// src/exec/pipeline.rs

//! Turn a validated pipeline file into a runnable task graph.

use anyhow::anyhow;
use tracing::{debug, info};

use crate::config::{FlowFile, StepConfig};
use crate::dag::TaskGraph;
use crate::engine::{CompletionSignal, TaskInput};
use crate::errors::Result;
use crate::exec::shell::run_shell_line;

/// Build a task graph with one task per step.
///
/// Echo steps succeed with their `logic` lines as values. Shell steps
/// succeed with the stdout lines of all their commands.
pub fn build_graph(flow: &FlowFile) -> Result<TaskGraph<String>> {
    let mut builder = TaskGraph::<String>::builder();

    for step in &flow.steps {
        let deps = step.dependencies().to_vec();
        let step = step.clone();
        builder = builder.task(step.name.clone(), deps, move |input, signal| {
            run_step(step, input, signal)
        });
    }

    builder.build()
}

fn run_step(step: StepConfig, input: TaskInput<String>, signal: CompletionSignal<String>) {
    if let Some(upstream) = &input {
        debug!(step = %step.name, upstream = upstream.len(), "step received upstream results");
    }

    if step.shell {
        tokio::spawn(run_shell_step(step, signal));
    } else {
        for line in &step.logic {
            info!(step = %step.name, "{}", line);
            println!("{line}");
        }
        signal.success(step.logic);
    }
}

async fn run_shell_step(step: StepConfig, signal: CompletionSignal<String>) {
    let mut captured = Vec::new();

    for line in &step.logic {
        match run_shell_line(&step.name, line).await {
            Ok(output) => {
                captured.extend(output.stdout);
                if !output.success {
                    signal.fail_with(
                        anyhow!(
                            "step `{}` command `{}` exited with code {}",
                            step.name,
                            line,
                            output.code
                        ),
                        captured,
                    );
                    return;
                }
            }
            Err(err) => {
                signal.fail_with(err, captured);
                return;
            }
        }
    }

    signal.success(captured);
}
