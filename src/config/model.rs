// src/config/model.rs

use serde::Deserialize;

/// Pipeline definition as read from a TOML file.
///
/// ```toml
/// [config]
/// max_concurrency = 4
///
/// [[steps]]
/// name = "fetch"
/// logic = ["download sources"]
///
/// [[steps]]
/// name = "build"
/// depends_on = ["fetch"]
/// logic = ["cargo build --release"]
/// shell = true
/// ```
///
/// This is the unvalidated form; convert it with `FlowFile::try_from`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawFlowFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Steps from `[[steps]]`, in file order.
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// A validated pipeline definition.
///
/// Guarantees: at least one step, unique non-empty names, every
/// `depends_on` entry names a step, no step depends on itself, and the
/// dependency relation is acyclic.
#[derive(Debug, Clone)]
pub struct FlowFile {
    pub config: ConfigSection,
    pub steps: Vec<StepConfig>,
}

impl FlowFile {
    pub(crate) fn new_unchecked(config: ConfigSection, steps: Vec<StepConfig>) -> Self {
        Self { config, steps }
    }

    /// Look up a step by name.
    pub fn step_named(&self, name: &str) -> Option<&StepConfig> {
        self.steps.iter().find(|s| s.name == name)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigSection {
    /// Maximum number of steps running at once. Unset means no limit.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

/// `[[steps]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    pub name: String,

    /// Steps that must succeed before this one starts.
    #[serde(default)]
    pub depends_on: Option<Vec<String>>,

    /// Instructions carried out by the step, in order.
    #[serde(default)]
    pub logic: Vec<String>,

    /// If true, each `logic` line is run as a shell command; otherwise it
    /// is only echoed.
    #[serde(default)]
    pub shell: bool,
}

impl StepConfig {
    /// Dependency list with `None` treated as empty.
    pub fn dependencies(&self) -> &[String] {
        self.depends_on.as_deref().unwrap_or(&[])
    }
}
