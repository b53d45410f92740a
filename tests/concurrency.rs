// tests/concurrency.rs

mod common;
use crate::common::{TestResult, execute_with, init_tracing, with_timeout};

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flowdag::dag::TaskGraph;
use flowdag::engine::{CompletionSignal, RunOutcome, Scheduler, SchedulerOptions};
use tokio::sync::mpsc;

/// Graph of `n` independent roots whose signals are handed to the test.
fn handoff_graph(
    n: usize,
    running: &Arc<AtomicUsize>,
    peak: &Arc<AtomicUsize>,
) -> (TaskGraph<i64>, mpsc::UnboundedReceiver<CompletionSignal<i64>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut builder = TaskGraph::<i64>::builder();
    for i in 0..n {
        let tx = tx.clone();
        let running = Arc::clone(running);
        let peak = Arc::clone(peak);
        builder = builder.root(format!("job{i}"), move |_, done| {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tx.send(done).expect("test holds the receiver");
        });
    }
    (builder.build().expect("roots only"), rx)
}

#[tokio::test]
async fn independent_tasks_are_all_in_flight_together_by_default() -> TestResult {
    init_tracing();
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (graph, mut signals) = handoff_graph(5, &running, &peak);

    let run = tokio::spawn(async move { Scheduler::default().execute(graph).await });

    // All five bodies are invoked before any of them reports.
    let mut held = Vec::new();
    for _ in 0..5 {
        held.push(with_timeout(signals.recv()).await.expect("signal"));
    }
    assert_eq!(peak.load(Ordering::SeqCst), 5);

    for (i, done) in held.into_iter().enumerate() {
        running.fetch_sub(1, Ordering::SeqCst);
        done.success_one(i as i64);
    }

    let outcome = with_timeout(run).await??;
    let RunOutcome::Completed(results) = outcome else {
        panic!("expected completion");
    };
    assert_eq!(results.len(), 5);
    Ok(())
}

#[tokio::test]
async fn max_concurrency_caps_in_flight_tasks() -> TestResult {
    init_tracing();
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (graph, mut signals) = handoff_graph(6, &running, &peak);

    let options = SchedulerOptions {
        max_concurrency: NonZeroUsize::new(2),
    };
    let run = tokio::spawn(async move { Scheduler::new(options).execute(graph).await });

    for i in 0..6 {
        let done = with_timeout(signals.recv()).await.expect("signal");
        assert!(running.load(Ordering::SeqCst) <= 2);
        running.fetch_sub(1, Ordering::SeqCst);
        done.success_one(i);
    }

    let outcome = with_timeout(run).await??;
    assert!(outcome.is_completed());
    assert_eq!(peak.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn limit_of_one_serializes_a_diamond() -> TestResult {
    init_tracing();
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut builder = TaskGraph::<i64>::builder();
    let decls: [(&str, &[&str]); 4] = [
        ("top", &[]),
        ("left", &["top"]),
        ("right", &["top"]),
        ("bottom", &["left", "right"]),
    ];
    for (name, deps) in decls {
        let running = Arc::clone(&running);
        let peak = Arc::clone(&peak);
        builder = builder.task(name, deps.iter().copied(), move |_, done| {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                running.fetch_sub(1, Ordering::SeqCst);
                done.success_none();
            });
        });
    }

    let options = SchedulerOptions {
        max_concurrency: NonZeroUsize::new(1),
    };
    let outcome = execute_with(builder.build()?, options).await;
    assert!(outcome.is_completed());
    assert_eq!(peak.load(Ordering::SeqCst), 1);
    Ok(())
}
