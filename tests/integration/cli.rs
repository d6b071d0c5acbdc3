use assert_cmd::Command;
use predicates::prelude::*;
use run_template::core::USAGE;
use run_template::test_utils::database_release;

use super::run_template_cmd;

#[test]
fn test_two_arguments_prints_usage() {
    let mut cmd = Command::cargo_bin("run_template").unwrap();
    cmd.args(["consumer", "does-not-exist.yml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(USAGE));
}

#[test]
fn test_no_arguments_prints_usage() {
    let mut cmd = Command::cargo_bin("run_template").unwrap();
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "USAGE: run_template <job_name> <manifest_filename> <template_name>",
        ));
}

#[test]
fn test_four_arguments_prints_usage() {
    let mut cmd = Command::cargo_bin("run_template").unwrap();
    cmd.args(["a", "b", "c", "d"]).assert().failure().code(1).stderr(predicate::str::contains(USAGE));
}

#[test]
fn test_help_succeeds() {
    let mut cmd = Command::cargo_bin("run_template").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<JOB_NAME>"))
        .stdout(predicate::str::contains("--release-dir"));
}

#[test]
fn test_missing_manifest_file_fails() {
    let fixture = database_release().unwrap();
    let missing = fixture.path().join("nope.yml");

    run_template_cmd(&fixture, &["consumer", missing.to_str().unwrap(), "config/db.yml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("nope.yml"));
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let fixture = database_release().unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["-v", "consumer", manifest.to_str().unwrap(), "config/db.yml"])
        .assert()
        .success()
        .stdout("address: localhost\nport: 5432\n")
        .stderr(predicate::str::contains("DEBUG"));
}
