use std::sync::{Arc, Mutex};

use flowdag::engine::TaskName;
use flowdag::types::Results;

/// Shared, ordered log of task starts and finishes.
///
/// Clone it into task bodies; every clone writes to the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(TaskName),
    Finished(TaskName),
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self, task: &str) {
        self.events.lock().unwrap().push(Event::Started(task.to_string()));
    }

    pub fn finished(&self, task: &str) {
        self.events.lock().unwrap().push(Event::Finished(task.to_string()));
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Names of started tasks, in start order.
    pub fn start_order(&self) -> Vec<TaskName> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Started(name) => Some(name),
                Event::Finished(_) => None,
            })
            .collect()
    }

    pub fn was_started(&self, task: &str) -> bool {
        self.start_order().iter().any(|name| name == task)
    }

    /// Position of `task`'s start in the log.
    pub fn start_index(&self, task: &str) -> Option<usize> {
        self.events()
            .iter()
            .position(|e| matches!(e, Event::Started(name) if name == task))
    }

    /// Position of `task`'s finish in the log.
    pub fn finish_index(&self, task: &str) -> Option<usize> {
        self.events()
            .iter()
            .position(|e| matches!(e, Event::Finished(name) if name == task))
    }
}

/// Captures every invocation of a run's completion callback.
#[derive(Debug, Clone)]
pub struct CallbackProbe<V> {
    calls: Arc<Mutex<Vec<Result<Results<V>, (String, Results<V>)>>>>,
}

impl<V> Default for CallbackProbe<V> {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<V: Clone> CallbackProbe<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback suitable for `Scheduler::run` that records its argument,
    /// keeping the error as its display string.
    pub fn callback(
        &self,
    ) -> impl FnOnce(Result<Results<V>, flowdag::engine::TaskFailure<V>>) + use<V> {
        let calls = Arc::clone(&self.calls);
        move |result| {
            let recorded = result.map_err(|f| (f.error.to_string(), f.partial));
            calls.lock().unwrap().push(recorded);
        }
    }

    pub fn calls(&self) -> Vec<Result<Results<V>, (String, Results<V>)>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}
