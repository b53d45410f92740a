// src/dag/graph.rs

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::engine::{CompletionSignal, TaskInput, TaskName};
use crate::errors::{FlowError, Result};

/// Body of a task.
///
/// Called exactly once with the accumulated results (for tasks that have
/// dependencies) and a one-shot [`CompletionSignal`]. The body may report
/// its outcome before returning or hand the signal off and report later.
pub type Work<V> = Box<dyn FnOnce(TaskInput<V>, CompletionSignal<V>) + Send + 'static>;

/// A single task declaration: name, ordered dependency list, and body.
pub struct TaskSpec<V> {
    pub name: TaskName,
    pub dependencies: Vec<TaskName>,
    pub work: Work<V>,
}

impl<V> TaskSpec<V> {
    pub fn new<N, D, F>(name: N, dependencies: D, work: F) -> Self
    where
        N: Into<TaskName>,
        D: IntoIterator,
        D::Item: Into<TaskName>,
        F: FnOnce(TaskInput<V>, CompletionSignal<V>) + Send + 'static,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            work: Box::new(work),
        }
    }
}

impl<V> fmt::Debug for TaskSpec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Internal node structure: stores immediate deps, dependents and the body.
struct TaskNode<V> {
    /// Direct dependencies, verbatim and in declaration order.
    deps: Vec<TaskName>,
    /// Direct dependents. A dependent appears once per time it lists this
    /// task, so edge counts line up with dependency counts.
    dependents: Vec<TaskName>,
    work: Work<V>,
}

/// Validated task table keyed by task name.
///
/// Every dependency refers to a declared task. Acyclicity is not assumed;
/// it is checked by [`crate::dag::check_acyclic`] before a run starts.
pub struct TaskGraph<V> {
    nodes: HashMap<TaskName, TaskNode<V>>,
    /// Task names in declaration order.
    order: Vec<TaskName>,
}

impl<V> TaskGraph<V> {
    /// Start declaring a graph.
    pub fn builder() -> TaskGraphBuilder<V> {
        TaskGraphBuilder::new()
    }

    /// Number of declared tasks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Return all task names, in declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Immediate dependencies of a task, as declared.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks that list this one as a dependency).
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Take the task bodies out of the graph, keyed by name.
    pub(crate) fn into_works(self) -> HashMap<TaskName, Work<V>> {
        self.nodes
            .into_iter()
            .map(|(name, node)| (name, node.work))
            .collect()
    }
}

impl<V> fmt::Debug for TaskGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in &self.order {
            map.entry(name, &self.dependencies_of(name));
        }
        map.finish()
    }
}

/// Collects task declarations and turns them into a [`TaskGraph`].
pub struct TaskGraphBuilder<V> {
    specs: Vec<TaskSpec<V>>,
}

impl<V> Default for TaskGraphBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TaskGraphBuilder<V> {
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Declare a task with the given dependencies.
    pub fn task<N, D, F>(mut self, name: N, dependencies: D, work: F) -> Self
    where
        N: Into<TaskName>,
        D: IntoIterator,
        D::Item: Into<TaskName>,
        F: FnOnce(TaskInput<V>, CompletionSignal<V>) + Send + 'static,
    {
        self.specs.push(TaskSpec::new(name, dependencies, work));
        self
    }

    /// Declare a task with no dependencies.
    pub fn root<N, F>(self, name: N, work: F) -> Self
    where
        N: Into<TaskName>,
        F: FnOnce(TaskInput<V>, CompletionSignal<V>) + Send + 'static,
    {
        self.task(name, Vec::<TaskName>::new(), work)
    }

    /// Add a prepared declaration.
    pub fn add(&mut self, spec: TaskSpec<V>) -> &mut Self {
        self.specs.push(spec);
        self
    }

    /// Validate the declarations and build the graph.
    ///
    /// Fails if a name is declared twice or if any task lists a dependency
    /// that is not declared. Cycles are *not* detected here.
    pub fn build(self) -> Result<TaskGraph<V>> {
        let mut declared: HashSet<&str> = HashSet::with_capacity(self.specs.len());
        for spec in &self.specs {
            if !declared.insert(spec.name.as_str()) {
                return Err(FlowError::DuplicateTask(spec.name.clone()));
            }
        }

        for spec in &self.specs {
            if let Some(missing) = spec
                .dependencies
                .iter()
                .find(|dep| !declared.contains(dep.as_str()))
            {
                return Err(FlowError::MissingDependency {
                    task: spec.name.clone(),
                    dependency: missing.clone(),
                    declared: spec.dependencies.clone(),
                });
            }
        }

        let mut order = Vec::with_capacity(self.specs.len());
        let mut nodes: HashMap<TaskName, TaskNode<V>> = HashMap::with_capacity(self.specs.len());

        // First pass: create nodes with their dependency lists.
        for spec in self.specs {
            order.push(spec.name.clone());
            nodes.insert(
                spec.name,
                TaskNode {
                    deps: spec.dependencies,
                    dependents: Vec::new(),
                    work: spec.work,
                },
            );
        }

        // Second pass: populate dependents based on deps.
        for name in &order {
            let deps = nodes.get(name).map(|n| n.deps.clone()).unwrap_or_default();
            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(name.clone());
                }
            }
        }

        debug!(tasks = order.len(), "task graph built");

        Ok(TaskGraph { nodes, order })
    }
}
