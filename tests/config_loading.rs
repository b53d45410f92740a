// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use tempfile::NamedTempFile;
use flowdag::cli::CliArgs;
use flowdag::config::{default_config_path, load_and_validate, topological_order, FlowFile};
use flowdag::errors::FlowError;
use flowdag_test_utils::builders::{FlowFileBuilder, StepConfigBuilder};

fn write_flow(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_steps_in_file_order_with_defaults() {
    let file = write_flow(
        r#"
[config]
max_concurrency = 3

[[steps]]
name = "fetch"
logic = ["download", "unpack"]

[[steps]]
name = "build"
depends_on = ["fetch"]
logic = ["make"]
shell = true
"#,
    );

    let flow = load_and_validate(file.path()).unwrap();

    assert_eq!(flow.config.max_concurrency, Some(3));
    assert_eq!(flow.steps.len(), 2);
    let fetch = flow.step_named("fetch").unwrap();
    assert!(fetch.depends_on.is_none());
    assert!(fetch.dependencies().is_empty());
    assert!(!fetch.shell);
    assert_eq!(fetch.logic, vec!["download", "unpack"]);
    let build = flow.step_named("build").unwrap();
    assert_eq!(build.dependencies(), ["fetch".to_string()]);
    assert!(build.shell);
}

#[test]
fn unknown_dependency_returns_config_error() {
    let file = write_flow(
        r#"
[[steps]]
name = "A"
depends_on = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlowError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn cycle_returns_config_error() {
    let file = write_flow(
        r#"
[[steps]]
name = "A"
depends_on = ["B"]

[[steps]]
name = "B"
depends_on = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlowError::ConfigError(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains('A') || msg.contains('B'));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn structural_problems_are_rejected() {
    let empty = FlowFile::try_from(FlowFileBuilder::new().raw()).unwrap_err();
    assert!(empty.to_string().contains("at least one"));

    let duplicate = FlowFile::try_from(
        FlowFileBuilder::new()
            .with_step(StepConfigBuilder::new("A").build())
            .with_step(StepConfigBuilder::new("A").build())
            .raw(),
    )
    .unwrap_err();
    assert!(duplicate.to_string().contains("more than once"));

    let self_dep = FlowFile::try_from(
        FlowFileBuilder::new()
            .with_step(StepConfigBuilder::new("A").depends_on("A").build())
            .raw(),
    )
    .unwrap_err();
    assert!(self_dep.to_string().contains("itself"));

    let zero_limit = FlowFile::try_from(
        FlowFileBuilder::new()
            .with_max_concurrency(0)
            .with_step(StepConfigBuilder::new("A").build())
            .raw(),
    )
    .unwrap_err();
    assert!(zero_limit.to_string().contains("max_concurrency"));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_flow("[[step]\nname = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(FlowError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(FlowError::IoError(_))));
}

#[test]
fn topological_order_puts_dependencies_first() {
    let flow = FlowFileBuilder::new()
        .with_step(StepConfigBuilder::new("deploy").depends_on("test").build())
        .with_step(StepConfigBuilder::new("build").build())
        .with_step(StepConfigBuilder::new("test").depends_on("build").build())
        .build();

    let order = topological_order(&flow.steps).unwrap();
    assert_eq!(order, vec!["build", "test", "deploy"]);
}

#[test]
fn steps_key_holds_the_step_list() {
    let file = write_flow(
        r#"
[[steps]]
name = "only"
logic = ["hello"]
"#,
    );

    let flow = load_and_validate(file.path()).unwrap();
    assert_eq!(flow.steps.len(), 1);
    assert_eq!(flow.steps[0].logic, vec!["hello".to_string()]);
}

#[test]
fn cli_falls_back_to_default_pipeline_path() {
    let args = CliArgs::try_parse_from(["flowdag"]).unwrap();
    assert!(args.config.is_none());
    assert_eq!(default_config_path(), PathBuf::from("Flowdag.toml"));

    let args = CliArgs::try_parse_from(["flowdag", "--config", "ci/flow.toml"]).unwrap();
    assert_eq!(args.config, Some(PathBuf::from("ci/flow.toml")));
}
