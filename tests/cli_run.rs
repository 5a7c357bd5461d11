#![cfg(unix)]

use std::fs;
use std::path::PathBuf;

use dagrun::cli::CliArgs;
use dagrun::dag::ScheduleError;
use dagrun::errors::DagrunError;
use dagrun_test_utils::{init_tracing, with_timeout};
use tempfile::tempdir;

fn args_for(config: impl Into<PathBuf>) -> CliArgs {
    CliArgs {
        config: config.into().to_string_lossy().into_owned(),
        log_level: None,
        dry_run: false,
        single_entry_point: false,
        skip_on_failed_dependency: false,
    }
}

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[tokio::test]
async fn diamond_demo_runs_to_completion() {
    init_tracing();
    let result = with_timeout(dagrun::run(args_for(demo("diamond.toml")))).await;
    assert!(result.is_ok(), "unexpected error: {result:?}");
}

#[tokio::test]
async fn unsuccessful_task_makes_the_run_an_error() {
    init_tracing();
    let err = with_timeout(dagrun::run(args_for(demo("fail-fast.toml"))))
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("did not succeed"), "got: {msg}");
    assert!(msg.contains("check"), "got: {msg}");
}

#[tokio::test]
async fn cycle_demo_surfaces_cycle_detected() {
    init_tracing();
    let err = with_timeout(dagrun::run(args_for(demo("cycle.toml"))))
        .await
        .unwrap_err();

    match err.downcast_ref::<DagrunError>() {
        Some(DagrunError::Schedule(ScheduleError::CycleDetected { unrun, .. })) => {
            assert_eq!(unrun, &vec!["second".to_string(), "third".to_string()]);
        }
        other => panic!("expected CycleDetected, got {other:?}"),
    }
}

#[tokio::test]
async fn dry_run_executes_nothing() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = dir.path().join("Dagrun.toml");
    fs::write(
        &config,
        r#"
[task.make]
cmd = "touch made.txt"
"#,
    )
    .unwrap();

    let mut args = args_for(&config);
    args.dry_run = true;
    with_timeout(dagrun::run(args)).await.unwrap();

    assert!(!dir.path().join("made.txt").exists());
}

#[tokio::test]
async fn commands_run_in_the_config_directory() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = dir.path().join("Dagrun.toml");
    fs::write(
        &config,
        r#"
[task.make]
cmd = "touch made.txt"

[task.check]
cmd = "test -f made.txt"
after = ["make"]
"#,
    )
    .unwrap();

    with_timeout(dagrun::run(args_for(&config))).await.unwrap();

    assert!(dir.path().join("made.txt").exists());
}

#[tokio::test]
async fn single_entry_point_flag_rejects_two_roots() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = dir.path().join("Dagrun.toml");
    fs::write(
        &config,
        r#"
[task.left]
cmd = "touch left.txt"

[task.right]
cmd = "touch right.txt"
"#,
    )
    .unwrap();

    let mut args = args_for(&config);
    args.single_entry_point = true;
    let err = with_timeout(dagrun::run(args)).await.unwrap_err();

    assert!(err.to_string().contains("entry point"), "got: {err}");
    assert!(!dir.path().join("left.txt").exists());
    assert!(!dir.path().join("right.txt").exists());
}
