#![allow(dead_code)]

use flowdag::dag::TaskGraph;
use flowdag::engine::{RunOutcome, Scheduler, SchedulerOptions};

pub use flowdag_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Execute `graph` with default options under the test timeout.
pub async fn execute<V>(graph: TaskGraph<V>) -> RunOutcome<V>
where
    V: Clone + Send + 'static,
{
    execute_with(graph, SchedulerOptions::default()).await
}

pub async fn execute_with<V>(graph: TaskGraph<V>, options: SchedulerOptions) -> RunOutcome<V>
where
    V: Clone + Send + 'static,
{
    with_timeout(Scheduler::new(options).execute(graph))
        .await
        .expect("graph should pass the pre-run check")
}

/// Read a single `i64` result for `task` out of a results map.
pub fn value_of(results: &flowdag::types::Results<i64>, task: &str) -> i64 {
    *results
        .get(task)
        .and_then(|v| v.single())
        .unwrap_or_else(|| panic!("no single value for task {task}"))
}
