//! End-to-end tests for the `archetype` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn archetype() -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("archetype");
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

/// A bear archetype with one static file and two templates.
fn bear_archetype(root: &Path) -> PathBuf {
    let source = root.join("bear");
    fs::create_dir_all(source.join("static/gamma")).unwrap();
    fs::create_dir_all(source.join("templates/ro")).unwrap();
    fs::write(source.join("static/gamma/delta.txt"), "Delta").unwrap();
    fs::write(source.join("templates/omicron.txt"), "Hello, <%= name %>!").unwrap();
    fs::write(
        source.join("templates/ro/omega.md"),
        "<%= name %> --- <%= age %>\n",
    )
    .unwrap();
    source
}

#[test]
fn help_lists_commands() {
    archetype()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reify"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    archetype()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn reify_writes_the_target() {
    let temp = TempDir::new().unwrap();
    let source = bear_archetype(temp.path());
    let target = temp.path().join("out");

    archetype()
        .current_dir(temp.path())
        .arg("reify")
        .arg(&source)
        .arg(&target)
        .args(["--set", "name=Yogi", "--set", "age=36"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files written"));

    assert_eq!(fs::read_to_string(target.join("gamma/delta.txt")).unwrap(), "Delta");
    assert_eq!(
        fs::read_to_string(target.join("omicron.txt")).unwrap(),
        "Hello, Yogi!"
    );
    assert_eq!(
        fs::read_to_string(target.join("ro/omega.md")).unwrap(),
        "Yogi --- 36\n"
    );
}

#[test]
fn reify_reads_metadata_file() {
    let temp = TempDir::new().unwrap();
    let source = bear_archetype(temp.path());
    let target = temp.path().join("out");
    let metadata = temp.path().join("bear.json");
    fs::write(&metadata, r#"{"name": "Boo-Boo", "age": 12}"#).unwrap();

    archetype()
        .current_dir(temp.path())
        .arg("reify")
        .arg(&source)
        .arg(&target)
        .arg("--metadata")
        .arg(&metadata)
        .args(["--set", "age=13"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(target.join("ro/omega.md")).unwrap(),
        "Boo-Boo --- 13\n"
    );
}

#[test]
fn missing_source_exits_with_not_found() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");

    archetype()
        .current_dir(temp.path())
        .arg("reify")
        .arg(temp.path().join("<INEXISTING>"))
        .arg(&target)
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "The source directory does not exist",
        ))
        .stderr(predicate::str::contains("Suggestions:"));

    assert!(!target.exists());
}

#[test]
fn undefined_reference_is_a_user_error() {
    let temp = TempDir::new().unwrap();
    let source = bear_archetype(temp.path());

    archetype()
        .current_dir(temp.path())
        .arg("reify")
        .arg(&source)
        .arg(temp.path().join("out"))
        .args(["--set", "name=Yogi"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ro/omega.md"))
        .stderr(predicate::str::contains("'age' is not defined"));
}

#[test]
fn dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let source = bear_archetype(temp.path());
    let target = temp.path().join("out");

    archetype()
        .current_dir(temp.path())
        .arg("reify")
        .arg(&source)
        .arg(&target)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("copy    gamma/delta.txt"))
        .stdout(predicate::str::contains("render  omicron.txt"));

    assert!(!target.exists());
}

#[test]
fn malformed_set_is_rejected() {
    archetype()
        .args(["reify", "a", "b", "--set", "name"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn config_reflects_environment() {
    let temp = TempDir::new().unwrap();

    archetype()
        .current_dir(temp.path())
        .arg("config")
        .env("ARCHETYPE_REIFY__ENCODING", "latin1")
        .assert()
        .success()
        .stdout(predicate::str::contains("encoding = \"latin1\""));
}

#[test]
fn explicit_config_file_must_exist() {
    let temp = TempDir::new().unwrap();

    archetype()
        .current_dir(temp.path())
        .args(["--config", "missing.toml", "config"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn config_file_sets_encoding() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("latin");
    fs::create_dir_all(source.join("templates")).unwrap();
    fs::write(source.join("templates/menu.txt"), b"Caf\xe9 <%= name %>").unwrap();
    fs::write(
        temp.path().join("archetype.toml"),
        "[reify]\nencoding = \"latin1\"\n",
    )
    .unwrap();

    archetype()
        .current_dir(temp.path())
        .args(["--config", "archetype.toml", "reify"])
        .arg(&source)
        .arg(temp.path().join("out"))
        .args(["--set", "name=Yogi"])
        .assert()
        .success();

    assert_eq!(
        fs::read(temp.path().join("out/menu.txt")).unwrap(),
        b"Caf\xe9 Yogi".to_vec()
    );
}

#[test]
fn completions_for_bash() {
    archetype()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archetype"));
}

#[test]
fn no_color_accepts_any_value() {
    for value in ["1", "anything", "true", "0", ""] {
        archetype()
            .env("NO_COLOR", value)
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("[reify]"))
            .stdout(predicate::str::contains("\u{1b}[").not());
    }
}

#[test]
fn no_color_does_not_break_reify() {
    let temp = TempDir::new().unwrap();
    let source = bear_archetype(temp.path());

    archetype()
        .env("NO_COLOR", "anything")
        .current_dir(temp.path())
        .arg("reify")
        .arg(&source)
        .arg(temp.path().join("out"))
        .args(["--set", "name=Yogi", "--set", "age=36"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files written"));
}

#[test]
fn dotted_set_reaches_nested_template_paths() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("ranger");
    fs::create_dir_all(source.join("templates")).unwrap();
    fs::write(
        source.join("templates/badge.txt"),
        "<%= owner.name %> of <%= owner.park %>",
    )
    .unwrap();
    let target = temp.path().join("out");

    archetype()
        .current_dir(temp.path())
        .arg("reify")
        .arg(&source)
        .arg(&target)
        .args(["--set", "owner.name=Ranger Smith", "--set", "owner.park=Jellystone"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(target.join("badge.txt")).unwrap(),
        "Ranger Smith of Jellystone"
    );
}
