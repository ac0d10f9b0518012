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

fn install(home: &Path, id: &str, source: &str) {
    let dir = home.join("packages").join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.ly"), source).unwrap();
}

#[test]
fn test_list_groups_packages_by_name() {
    let home = TempDir::new().unwrap();
    install(home.path(), "a@0.2", "% a\n");
    install(home.path(), "a@0.10", "% a\n");
    install(home.path(), "b@0.3", "% b\n");

    clef_cmd(home.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a\n   a@0.2\n   a@0.10\n"))
        .stdout(predicate::str::contains("b\n   b@0.3\n"));
}

#[test]
fn test_list_filters_by_pattern() {
    let home = TempDir::new().unwrap();
    install(home.path(), "a@0.1", "% a\n");
    install(home.path(), "b@0.3", "% b\n");

    clef_cmd(home.path())
        .args(["list", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b@0.3"))
        .stdout(predicate::str::contains("a@0.1").not());
}

#[test]
fn test_list_empty_store() {
    let home = TempDir::new().unwrap();

    clef_cmd(home.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages installed."));
}

#[test]
fn test_list_lilypond_marks_default() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("lilyponds/2.24.1")).unwrap();
    fs::create_dir_all(home.path().join("lilyponds/2.19.83")).unwrap();

    clef_cmd(home.path())
        .args(["list", "lilypond"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  2.19.83"))
        .stdout(predicate::str::contains("* 2.24.1"));
}

#[test]
fn test_list_lilypond_empty() {
    let home = TempDir::new().unwrap();

    clef_cmd(home.path())
        .args(["list", "lilypond"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No LilyPond versions installed."));
}
