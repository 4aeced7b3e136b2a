//! Integration tests for the `reqlock` binary
//!
//! Covers argument validation, exit codes and the dry-run/write paths
//! against a mock package index.

mod common;

use common::{MockFile, MockIndex, TestProject};
use predicates::prelude::*;
use std::process::{Command, Output};

/// Run reqlock inside the project, isolated from the user's config
fn run_reqlock(project: &TestProject, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reqlock"));
    cmd.current_dir(project.path())
        .env("HOME", project.path())
        .env("XDG_CONFIG_HOME", project.path().join("config"))
        .env_remove("REQLOCK_INDEX_URL")
        .env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute reqlock")
}

/// Run reqlock off the async runtime so the mock server keeps serving
async fn run_reqlock_async(project: &TestProject, args: &[&str]) -> Output {
    let dir = project.path();
    let args: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
    tokio::task::spawn_blocking(move || {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_reqlock"));
        cmd.current_dir(&dir)
            .env("HOME", &dir)
            .env("XDG_CONFIG_HOME", dir.join("config"))
            .env_remove("REQLOCK_INDEX_URL")
            .env_remove("RUST_LOG")
            .args(&args);
        cmd.output().expect("Failed to execute reqlock")
    })
    .await
    .expect("reqlock task panicked")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_no_packages_is_usage_error() {
    let project = TestProject::new();
    project.create_file("requirements.txt", "");

    let output = run_reqlock(&project, &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(predicate::str::contains("at least one package").eval(&stderr(&output)));
}

#[test]
fn test_update_all_with_packages_is_usage_error() {
    let project = TestProject::new();
    project.create_file("requirements.txt", "");

    let output = run_reqlock(&project, &["--update-all", "hashin"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(predicate::str::contains("--update-all").eval(&stderr(&output)));
}

#[test]
fn test_interactive_without_update_all_is_usage_error() {
    let project = TestProject::new();
    project.create_file("requirements.txt", "");

    let output = run_reqlock(&project, &["-i", "hashin"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(predicate::str::contains("--interactive").eval(&stderr(&output)));
}

#[test]
fn test_invalid_python_version_is_usage_error() {
    let project = TestProject::new();
    project.create_file("requirements.txt", "");

    let output = run_reqlock(&project, &["-p", "three", "hashin"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(predicate::str::starts_with("✗").eval(&stderr(&output)));
}

#[test]
fn test_unknown_algorithm_is_rejected() {
    let project = TestProject::new();
    let output = run_reqlock(&project, &["-a", "md5", "hashin"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_version_flag() {
    let project = TestProject::new();
    let output = run_reqlock(&project, &["--version"]);

    assert!(output.status.success());
    assert!(predicate::str::contains(env!("CARGO_PKG_VERSION")).eval(&stdout(&output)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_prints_diff_and_keeps_file() {
    let index = MockIndex::start().await;
    index
        .add_package("foo", &[("1.0", vec![MockFile::published("foo-1.0.tar.gz", "aa")])])
        .await;

    let project = TestProject::new();
    project.create_file("requirements.txt", "foo==0.9\n");

    let output = run_reqlock_async(
        &project,
        &["foo", "--dry-run", "--index-url", &index.index_url()],
    )
    .await;

    assert!(output.status.success(), "{}", stderr(&output));
    let diff = stdout(&output);
    assert!(predicate::str::starts_with("--- Old\n+++ New\n").eval(&diff), "{diff}");
    assert!(diff.contains("+foo==1.0 \\\n"));
    assert_eq!(project.read_file("requirements.txt"), "foo==0.9\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_writes_requirements_file() {
    let index = MockIndex::start().await;
    index
        .add_package(
            "foo",
            &[(
                "1.2.3",
                vec![
                    MockFile::published("foo-1.2.3.tar.gz", "b2"),
                    MockFile::published("foo-1.2.3-py3-none-any.whl", "a1"),
                ],
            )],
        )
        .await;

    let project = TestProject::new();
    project.create_file("reqs.txt", "# pinned\n");

    let output = run_reqlock_async(
        &project,
        &["foo==1.2.3", "-r", "reqs.txt", "--index-url", &index.index_url()],
    )
    .await;

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(predicate::str::contains("foo==1.2.3 added").eval(&stderr(&output)));
    assert_eq!(
        project.read_file("reqs.txt"),
        "# pinned\nfoo==1.2.3 \\\n    --hash=sha256:a1 \\\n    --hash=sha256:b2\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_package_exits_with_one() {
    let index = MockIndex::start().await;
    index.add_missing("doesnotexist").await;

    let project = TestProject::new();
    project.create_file("requirements.txt", "foo==0.9\n");

    let output = run_reqlock_async(
        &project,
        &["doesnotexist", "--index-url", &index.index_url()],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(predicate::str::starts_with("✗").eval(&err), "{err}");
    assert!(err.contains("doesnotexist"));
    assert_eq!(project.read_file("requirements.txt"), "foo==0.9\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_index_url_from_environment() {
    let index = MockIndex::start().await;
    index
        .add_package("foo", &[("1.0", vec![MockFile::published("foo-1.0.tar.gz", "aa")])])
        .await;

    let project = TestProject::new();
    project.create_file("requirements.txt", "");

    let dir = project.path();
    let index_url = index.index_url();
    let output = tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_reqlock"))
            .current_dir(&dir)
            .env("HOME", &dir)
            .env("XDG_CONFIG_HOME", dir.join("config"))
            .env("REQLOCK_INDEX_URL", index_url)
            .arg("foo")
            .output()
            .expect("Failed to execute reqlock")
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        project.read_file("requirements.txt"),
        "foo==1.0 \\\n    --hash=sha256:aa\n"
    );
}
