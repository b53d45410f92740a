#![allow(dead_code)]

use flowdag::config::{ConfigSection, FlowFile, RawFlowFile, StepConfig};

/// Builder for `FlowFile` to simplify test setup.
pub struct FlowFileBuilder {
    flow: RawFlowFile,
}

impl FlowFileBuilder {
    pub fn new() -> Self {
        Self {
            flow: RawFlowFile {
                config: ConfigSection::default(),
                steps: Vec::new(),
            },
        }
    }

    pub fn with_step(mut self, step: StepConfig) -> Self {
        self.flow.steps.push(step);
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.flow.config.max_concurrency = Some(limit);
        self
    }

    /// The unvalidated file, for tests that exercise validation.
    pub fn raw(self) -> RawFlowFile {
        self.flow
    }

    pub fn build(self) -> FlowFile {
        FlowFile::try_from(self.flow).expect("Failed to build valid pipeline from builder")
    }
}

impl Default for FlowFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `StepConfig`.
pub struct StepConfigBuilder {
    step: StepConfig,
}

impl StepConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            step: StepConfig {
                name: name.to_string(),
                depends_on: None,
                logic: Vec::new(),
                shell: false,
            },
        }
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.step
            .depends_on
            .get_or_insert_with(Vec::new)
            .push(dep.to_string());
        self
    }

    pub fn logic(mut self, line: &str) -> Self {
        self.step.logic.push(line.to_string());
        self
    }

    pub fn shell(mut self, val: bool) -> Self {
        self.step.shell = val;
        self
    }

    pub fn build(self) -> StepConfig {
        self.step
    }
}
