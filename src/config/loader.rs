// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{FlowFile, RawFlowFile};
use crate::errors::Result;

/// Load a pipeline file from a given path and return the raw `RawFlowFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawFlowFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let flow: RawFlowFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), steps = flow.steps.len(), "pipeline file parsed");

    Ok(flow)
}

/// Load a pipeline file from path and validate it.
///
/// Checks for:
/// - at least one step and unique step names,
/// - unknown or self-referencing `depends_on` entries,
/// - dependency cycles,
/// - basic `[config]` sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FlowFile> {
    let raw = load_from_path(&path)?;
    let flow = FlowFile::try_from(raw)?;
    Ok(flow)
}

/// Default pipeline path: `Flowdag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Flowdag.toml")
}
