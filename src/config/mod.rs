// src/config/mod.rs

//! Pipeline definition loading and validation.
//!
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a pipeline file from disk (`loader.rs`).
//! - Validate structure and dependency correctness (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, FlowFile, RawFlowFile, StepConfig};
pub use validate::topological_order;
