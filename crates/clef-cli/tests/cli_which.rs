use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn clef_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clef").unwrap();
    cmd.env("CLEF_HOME", home);
    cmd
}

fn install(home: &Path, id: &str) {
    let dir = home.join("packages").join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.ly"), "%\n").unwrap();
}

#[test]
fn test_which_prints_highest_matching_version_dir() {
    let home = TempDir::new().unwrap();
    install(home.path(), "a@0.2");
    install(home.path(), "a@0.10");

    clef_cmd(home.path())
        .args(["which", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a@0.10"));
}

#[test]
fn test_which_honors_version_requirements() {
    let home = TempDir::new().unwrap();
    install(home.path(), "a@0.1");
    install(home.path(), "a@0.2");

    clef_cmd(home.path())
        .args(["which", "a@~>0.1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a@0.1"))
        .stdout(predicate::str::contains("a@0.2").not());
}

#[test]
fn test_which_unknown_package_fails() {
    let home = TempDir::new().unwrap();

    clef_cmd(home.path())
        .args(["which", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No installed package matches"));
}
