// tests/pipeline_run.rs

mod common;
use crate::common::{TestResult, init_tracing, with_timeout};

use flowdag::engine::{RunOutcome, Scheduler};
use flowdag::exec::build_graph;
use flowdag::types::TaskValue;
use flowdag_test_utils::builders::{FlowFileBuilder, StepConfigBuilder};

#[tokio::test]
async fn echo_steps_succeed_with_their_logic_lines() -> TestResult {
    init_tracing();

    let flow = FlowFileBuilder::new()
        .with_step(StepConfigBuilder::new("prepare").logic("mkdir out").build())
        .with_step(
            StepConfigBuilder::new("report")
                .depends_on("prepare")
                .logic("collect")
                .logic("summarize")
                .build(),
        )
        .with_step(StepConfigBuilder::new("noop").build())
        .build();

    let graph = build_graph(&flow)?;
    assert_eq!(graph.dependencies_of("report"), ["prepare".to_string()]);

    let outcome = with_timeout(Scheduler::default().execute(graph)).await?;
    let RunOutcome::Completed(results) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(results["prepare"], TaskValue::Single("mkdir out".to_string()));
    assert_eq!(
        results["report"],
        TaskValue::Many(vec!["collect".to_string(), "summarize".to_string()])
    );
    assert_eq!(results["noop"], TaskValue::Empty);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn shell_steps_capture_stdout() -> TestResult {
    init_tracing();

    let flow = FlowFileBuilder::new()
        .with_step(
            StepConfigBuilder::new("hello")
                .shell(true)
                .logic("echo hello")
                .logic("printf 'a\\nb\\n'")
                .build(),
        )
        .build();

    let outcome = with_timeout(Scheduler::default().execute(build_graph(&flow)?)).await?;
    let RunOutcome::Completed(results) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(
        results["hello"].clone().into_vec(),
        vec!["hello".to_string(), "a".to_string(), "b".to_string()]
    );
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn failing_shell_step_stops_the_pipeline_with_partial_output() -> TestResult {
    init_tracing();

    let flow = FlowFileBuilder::new()
        .with_step(
            StepConfigBuilder::new("flaky")
                .shell(true)
                .logic("echo started")
                .logic("exit 3")
                .logic("echo unreachable")
                .build(),
        )
        .with_step(
            StepConfigBuilder::new("after")
                .depends_on("flaky")
                .logic("never printed")
                .build(),
        )
        .build();

    let outcome = with_timeout(Scheduler::default().execute(build_graph(&flow)?)).await?;
    let RunOutcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.task, "flaky");
    assert!(failure.error.to_string().contains("exited with code 3"));
    assert_eq!(failure.partial["flaky"], TaskValue::Single("started".to_string()));
    assert!(!failure.partial.contains_key("after"));
    Ok(())
}
