use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn slsdist_cmd() -> Command {
    Command::cargo_bin("slsdist").unwrap()
}

#[test]
fn test_classify_orderable() {
    slsdist_cmd()
        .args(["classify", "1.2.3-rc1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orderable"))
        .stdout(predicate::str::is_match(r"matcher\s+false").unwrap())
        .stdout(predicate::str::is_match(r"valid\s+true").unwrap());
}

#[test]
fn test_classify_matcher() {
    slsdist_cmd()
        .args(["classify", "2.x.x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.x.x: matcher"))
        .stdout(predicate::str::is_match(r"matcher\s+true").unwrap());
}

#[test]
fn test_classify_invalid() {
    slsdist_cmd()
        .args(["classify", "1.x.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn test_help_lists_commands() {
    slsdist_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest"))
        .stdout(predicate::str::contains("classify"));
}
