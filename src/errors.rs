// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::engine::TaskName;

#[derive(Error, Debug)]
pub enum FlowError {
    /// A task lists a dependency that was never declared.
    #[error("task `{task}` has non-existent dependency `{dependency}` in [{}]", .declared.join(", "))]
    MissingDependency {
        task: TaskName,
        dependency: TaskName,
        declared: Vec<TaskName>,
    },

    #[error("task `{0}` was declared more than once")]
    DuplicateTask(TaskName),

    /// The dependency relation has a cycle, or a component that can never
    /// become ready.
    #[error("cannot execute tasks due to a recursive dependency (unresolved: {})", .unresolved.join(", "))]
    CyclicDependency { unresolved: Vec<TaskName> },

    #[error("task `{0}` dropped its completion signal without reporting an outcome")]
    SignalDropped(TaskName),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
