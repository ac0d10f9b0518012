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

#[test]
fn test_use_sets_default_version() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("lilyponds/2.24.1")).unwrap();
    fs::create_dir_all(home.path().join("lilyponds/2.19.83")).unwrap();

    clef_cmd(home.path())
        .args(["use", "2.19.83"])
        .assert()
        .success();

    let settings = fs::read_to_string(home.path().join("settings.toml")).unwrap();
    assert!(settings.contains("default = \"2.19.83\""));

    clef_cmd(home.path())
        .args(["list", "lilypond"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* 2.19.83"))
        .stdout(predicate::str::contains("  2.24.1"));
}

#[test]
fn test_use_rejects_uninstalled_version() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("lilyponds/2.24.1")).unwrap();

    clef_cmd(home.path())
        .args(["use", "9.9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed"));
}
