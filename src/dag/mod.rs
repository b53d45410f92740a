// src/dag/mod.rs

//! Task graph construction and validation.
//!
//! - [`graph`] holds the declared tasks and their adjacency.
//! - [`cycle`] contains the pre-run Kahn's-algorithm check.
//! - [`task_info`] provides the per-run task state and dispatch types.

pub mod cycle;
pub mod graph;
pub mod task_info;

pub use cycle::check_acyclic;
pub use graph::{TaskGraph, TaskGraphBuilder, TaskSpec, Work};
pub use task_info::{ScheduledTask, TaskRunState};
