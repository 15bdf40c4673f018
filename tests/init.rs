use crate::common::command::{init_repository_dir, repository_dir, run_gitlet_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_gitlet_directory_silently(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout("");

    assert!(repository_dir.path().join(".gitlet").is_dir());
    assert!(repository_dir.path().join(".gitlet").join("repository").is_file());
}

#[rstest]
fn new_repository_starts_with_root_commit_on_master(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(
                r"^===\ncommit [0-9a-f]{40}\nDate: Thu Jan 1 00:00:00 1970 \+0000\ninitial commit\n\n$",
            )
            .unwrap(),
        );

    run_gitlet_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== Branches ===\n*master\n\n"));
}

#[rstest]
fn root_commit_is_identical_across_repositories(repository_dir: TempDir) {
    let other_dir = TempDir::new().expect("Failed to create temp dir");

    for dir in [repository_dir.path(), other_dir.path()] {
        run_gitlet_command(dir, &["init"]).assert().success();
    }

    let first = common::command::head_commit_id(repository_dir.path());
    let second = common::command::head_commit_id(other_dir.path());

    pretty_assertions::assert_eq!(first, second);
}

#[rstest]
fn second_init_is_refused_and_leaves_state_alone(init_repository_dir: TempDir) {
    let snapshot = common::read_snapshot(init_repository_dir.path());

    run_gitlet_command(init_repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout("A gitlet version-control system already exists in the current directory.\n");

    pretty_assertions::assert_eq!(common::read_snapshot(init_repository_dir.path()), snapshot);
}

#[rstest]
#[case::status(&["status"])]
#[case::log(&["log"])]
#[case::add(&["add", "a.txt"])]
#[case::commit(&["commit", "message"])]
#[case::branch(&["branch", "dev"])]
#[case::merge(&["merge", "dev"])]
fn commands_outside_a_repository_are_refused(repository_dir: TempDir, #[case] args: &[&str]) {
    run_gitlet_command(repository_dir.path(), args)
        .assert()
        .success()
        .stdout("Not in an initialized Gitlet directory.\n");

    assert!(!repository_dir.path().join(".gitlet").exists());
}

#[rstest]
fn missing_subcommand_is_a_usage_error(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &[])
        .assert()
        .failure();
}
