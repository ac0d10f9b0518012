use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
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

fn user_file(home: &Path, name: &str, source: &str) -> PathBuf {
    let dir = home.join("files");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_wrap_writes_wrapper_under_home() {
    let home = TempDir::new().unwrap();
    install(home.path(), "a@0.1", "% a\n");
    let song = user_file(home.path(), "song.ly", "\\require \"a\"\n");

    let assert = clef_cmd(home.path())
        .arg("wrap")
        .arg(&song)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrappers"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let wrapper = PathBuf::from(stdout.trim());
    assert!(wrapper.starts_with(home.path()));

    let content = fs::read_to_string(&wrapper).unwrap();
    assert!(content.contains("hash-set! clef:package-refs \"a\" \"a\""));
    assert!(content.contains("song.ly"));
}

#[test]
fn test_wrap_without_references_prints_original() {
    let home = TempDir::new().unwrap();
    let song = user_file(home.path(), "plain.ly", "music = { c d e }\n");

    clef_cmd(home.path())
        .arg("wrap")
        .arg(&song)
        .assert()
        .success()
        .stdout(predicate::str::contains("plain.ly"))
        .stdout(predicate::str::contains("wrappers").not());
}

#[test]
fn test_wrap_always_wraps_plain_files() {
    let home = TempDir::new().unwrap();
    let song = user_file(home.path(), "plain.ly", "music = { c d e }\n");

    clef_cmd(home.path())
        .arg("wrap")
        .arg(&song)
        .arg("--always")
        .assert()
        .success()
        .stdout(predicate::str::contains("wrappers"));
}
