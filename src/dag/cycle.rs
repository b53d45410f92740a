// src/dag/cycle.rs

//! Pre-run acyclicity and reachability check (Kahn's algorithm).

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dag::TaskGraph;
use crate::errors::{FlowError, Result};

/// Verify that every task of `graph` can eventually become ready.
///
/// Repeatedly resolves tasks whose dependencies are all resolved, starting
/// from the zero-dependency tasks. If some tasks never resolve, they sit on
/// or behind a cycle and the graph is rejected with
/// [`FlowError::CyclicDependency`] listing them (sorted).
pub fn check_acyclic<V>(graph: &TaskGraph<V>) -> Result<()> {
    let mut remaining: HashMap<&str, usize> = HashMap::with_capacity(graph.len());
    let mut worklist: Vec<&str> = Vec::new();

    for name in graph.tasks() {
        let deps = graph.dependencies_of(name).len();
        if deps == 0 {
            worklist.push(name);
        } else {
            remaining.insert(name, deps);
        }
    }

    let mut resolved = 0usize;
    while let Some(current) = worklist.pop() {
        resolved += 1;
        for dependent in graph.dependents_of(current) {
            if let Some(count) = remaining.get_mut(dependent.as_str()) {
                *count -= 1;
                if *count == 0 {
                    worklist.push(dependent.as_str());
                }
            }
        }
    }

    if resolved < graph.len() {
        let mut unresolved: Vec<String> = remaining
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, _)| name.to_string())
            .collect();
        unresolved.sort();

        warn!(
            resolved,
            total = graph.len(),
            ?unresolved,
            "dependency graph cannot be fully resolved"
        );
        return Err(FlowError::CyclicDependency { unresolved });
    }

    debug!(resolved, "dependency graph is acyclic");
    Ok(())
}
