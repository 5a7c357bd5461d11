use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;

use dagrun::cli::CliArgs;
use dagrun::config::{ConfigFile, DEFAULT_CONFIG_FILE, load_and_validate};
use dagrun::dag::{ValidationError, plan_layers};
use dagrun::errors::DagrunError;
use dagrun_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn diamond_demo_loads_and_plans_three_layers() -> TestResult {
    let cfg = load_and_validate(demo("diamond.toml"))?;

    assert!(cfg.config().require_single_entry_point);
    assert!(!cfg.config().skip_on_failed_dependency);
    assert_eq!(cfg.task_configs().len(), 4);
    assert_eq!(cfg.task_configs()["D"].after, vec!["B".to_string(), "C".to_string()]);
    let options = cfg.scheduler_options();
    assert!(options.validation.require_single_entry_point);

    let plan = plan_layers(&cfg.tasks(&demo("")), &options.validation)?;
    assert!(plan.is_complete());
    assert_eq!(
        plan.layers,
        vec![
            vec!["A".to_string()],
            vec!["B".to_string(), "C".to_string()],
            vec!["D".to_string()],
        ]
    );

    Ok(())
}

#[test]
fn cyclic_demo_loads_but_cannot_be_fully_planned() -> TestResult {
    let cfg = load_and_validate(demo("cycle.toml"))?;

    let plan = plan_layers(&cfg.tasks(&demo("")), &cfg.scheduler_options().validation)?;
    assert_eq!(plan.layers, vec![vec!["first".to_string()]]);
    assert_eq!(plan.unplaceable, vec!["second".to_string(), "third".to_string()]);

    Ok(())
}

#[test]
fn unknown_dependency_returns_validation_error() {
    let file = write_config(
        r#"
[task.A]
cmd = "echo A"
after = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(DagrunError::Validation(ValidationError::UnknownDependency { task, dependency })) => {
            assert_eq!(task, "A");
            assert_eq!(dependency, "NonExistent");
        }
        Err(e) => panic!("Expected UnknownDependency, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn two_roots_rejected_when_config_requires_single_entry_point() {
    let file = write_config(
        r#"
[config]
require_single_entry_point = true

[task.A]
cmd = "echo A"

[task.B]
cmd = "echo B"
"#,
    );

    let result = load_and_validate(file.path());
    assert!(matches!(
        result,
        Err(DagrunError::Validation(ValidationError::MultipleEntryPoints(_)))
    ));
}

#[test]
fn empty_config_is_rejected() {
    let file = write_config("[config]\n");

    match load_and_validate(file.path()) {
        Err(DagrunError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn unknown_keys_are_a_toml_error() {
    let file = write_config(
        r#"
[task.A]
cmd = "echo A"
needs = ["B"]
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(DagrunError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let missing = "/definitely/not/here/Dagrun.toml";

    match load_and_validate(missing) {
        Err(DagrunError::IoError { path, source }) => {
            assert_eq!(path, PathBuf::from(missing));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected IoError, got {other:?}"),
    }
}

#[test]
fn builder_config_converts_to_tasks() {
    let cfg = ConfigFileBuilder::new()
        .with_task("fetch", TaskConfigBuilder::new("echo fetch").build())
        .with_task(
            "build",
            TaskConfigBuilder::new("echo build")
                .after("fetch")
                .env("PROFILE", "release")
                .build(),
        )
        .build();

    let tasks = cfg.tasks(&PathBuf::from("."));
    let build = tasks
        .iter()
        .find(|t| t.name() == "build")
        .expect("build task exists");
    assert!(build.dependencies().contains("fetch"));
    assert!(tasks.iter().any(|t| t.name() == "fetch" && t.is_entry_point()));
}

#[test]
fn empty_command_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_task("A", TaskConfigBuilder::new("   ").build())
        .build_raw();

    match ConfigFile::try_from(raw) {
        Err(DagrunError::ConfigError(msg)) => assert!(msg.contains("empty `cmd`")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn overrides_only_turn_flags_on() {
    let cfg = ConfigFileBuilder::new()
        .skip_on_failed_dependency(true)
        .with_task("A", TaskConfigBuilder::new("echo A").build())
        .build()
        .with_overrides(true, false);

    assert!(cfg.config().require_single_entry_point);
    assert!(cfg.config().skip_on_failed_dependency);
}

#[test]
fn cli_defaults_to_the_default_config_file() {
    let args = CliArgs::try_parse_from(["dagrun"]).unwrap();
    assert_eq!(args.config, DEFAULT_CONFIG_FILE);
    assert!(!args.dry_run);
}
