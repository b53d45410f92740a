// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{FlowFile, RawFlowFile, StepConfig};
use crate::errors::{FlowError, Result};

impl TryFrom<RawFlowFile> for FlowFile {
    type Error = FlowError;

    fn try_from(raw: RawFlowFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_flow(&raw)?;
        Ok(FlowFile::new_unchecked(raw.config, raw.steps))
    }
}

fn validate_raw_flow(flow: &RawFlowFile) -> Result<()> {
    ensure_has_steps(flow)?;
    validate_global_config(flow)?;
    validate_step_names(flow)?;
    validate_step_dependencies(flow)?;
    topological_order(&flow.steps)?;
    Ok(())
}

fn ensure_has_steps(flow: &RawFlowFile) -> Result<()> {
    if flow.steps.is_empty() {
        return Err(FlowError::ConfigError(
            "pipeline must contain at least one [[steps]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(flow: &RawFlowFile) -> Result<()> {
    if flow.config.max_concurrency == Some(0) {
        return Err(FlowError::ConfigError(
            "[config].max_concurrency must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_step_names(flow: &RawFlowFile) -> Result<()> {
    let mut seen = HashSet::new();
    for step in &flow.steps {
        if step.name.trim().is_empty() {
            return Err(FlowError::ConfigError(
                "every [[steps]] needs a non-empty `name`".to_string(),
            ));
        }
        if !seen.insert(step.name.as_str()) {
            return Err(FlowError::ConfigError(format!(
                "step '{}' is defined more than once",
                step.name
            )));
        }
    }
    Ok(())
}

fn validate_step_dependencies(flow: &RawFlowFile) -> Result<()> {
    let names: HashSet<&str> = flow.steps.iter().map(|s| s.name.as_str()).collect();

    for step in &flow.steps {
        for dep in step.dependencies() {
            if !names.contains(dep.as_str()) {
                return Err(FlowError::ConfigError(format!(
                    "step '{}' has unknown dependency '{}' in `depends_on`",
                    step.name, dep
                )));
            }
            if dep == &step.name {
                return Err(FlowError::ConfigError(format!(
                    "step '{}' cannot depend on itself in `depends_on`",
                    step.name
                )));
            }
        }
    }
    Ok(())
}

/// Topologically sort the steps (dependencies first).
///
/// Edge direction: dep -> step, so for `depends_on = ["A"]` on step `B`
/// we add edge A -> B.
pub fn topological_order(steps: &[StepConfig]) -> Result<Vec<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for step in steps {
        graph.add_node(step.name.as_str());
    }
    for step in steps {
        for dep in step.dependencies() {
            graph.add_edge(dep.as_str(), step.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
        Err(cycle) => Err(FlowError::ConfigError(format!(
            "cycle detected in step graph involving step '{}'",
            cycle.node_id()
        ))),
    }
}
