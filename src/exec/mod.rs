// src/exec/mod.rs

//! Pipeline step execution.
//!
//! - [`pipeline`] builds a [`crate::dag::TaskGraph`] from a pipeline file,
//!   one task per step.
//! - [`shell`] runs a single shell instruction with `tokio::process` and
//!   captures its stdout.

pub mod pipeline;
pub mod shell;

pub use pipeline::build_graph;
pub use shell::{run_shell_line, ShellOutput};
