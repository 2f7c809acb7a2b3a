//! Integration tests for the `phpgrep` binary.
//!
//! Each test lays out a small project in a temporary directory and runs the
//! binary from inside it, so reported paths are relative and stable.

use std::fs;
use std::path::Path;

use anyhow::Result;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const SERVICE: &str = "<?php
function load($ids, $cache) {
    if (in_array($ids, $cache)) {
        return null;
    }
    $cache = $cache;
    return IN_ARRAY(1, $ids, true);
}
";

const LEGACY: &str = "<?php
$x = $x;
";

#[fixture]
fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("temp dir: {err}"));
    write(dir.path(), "src/service.php", SERVICE);
    write(dir.path(), "src/legacy/old.php", LEGACY);
    write(dir.path(), "src/broken.php", "<?php function (\n");
    write(dir.path(), "README.md", "in_array($a, $b)\n");
    dir
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|err| panic!("mkdir: {err}"));
    }
    fs::write(&path, contents).unwrap_or_else(|err| panic!("write {relative}: {err}"));
}

#[rstest]
fn prints_matches_with_locations(project: TempDir) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args(["in_array($x, $y)", "src"]);

    command
        .assert()
        .success()
        .stdout("src/service.php:3:9: in_array($ids, $cache)\n");
}

#[rstest]
fn sequence_wildcards_and_case_folding(project: TempDir) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args([r#"in_array(${"*"})"#, "src"]);

    command.assert().success().stdout(
        "src/service.php:3:9: in_array($ids, $cache)\n\
         src/service.php:7:12: IN_ARRAY(1, $ids, true)\n",
    );
}

#[rstest]
fn case_sensitive_flag_disables_folding(project: TempDir) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args(["--case-sensitive", "IN_ARRAY($a, $b, $c)", "src"]);

    command
        .assert()
        .success()
        .stdout("src/service.php:7:12: IN_ARRAY(1, $ids, true)\n");
}

#[rstest]
fn captures_flag_prints_bindings(project: TempDir) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args(["--captures", "$v = $v", "src/service.php"]);

    command
        .assert()
        .success()
        .stdout("src/service.php:6:5: $cache = $cache\n  $v = $cache\n");
}

#[rstest]
fn json_format_emits_one_object_per_match(project: TempDir) -> Result<()> {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args(["--format", "json", "$v = $v", "src"]);

    let output = command.assert().success().get_output().stdout.clone();
    let records: Vec<serde_json::Value> = String::from_utf8(output)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    assert_eq!(
        records,
        vec![
            serde_json::json!({
                "path": "src/legacy/old.php",
                "line": 2,
                "column": 1,
                "text": "$x = $x",
                "captures": [{ "name": "v", "text": "$x" }],
            }),
            serde_json::json!({
                "path": "src/service.php",
                "line": 6,
                "column": 5,
                "text": "$cache = $cache",
                "captures": [{ "name": "v", "text": "$cache" }],
            }),
        ]
    );
    Ok(())
}

#[rstest]
fn limit_stops_the_search(project: TempDir) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args(["--limit", "1", r#"in_array(${"*"})"#, "src"]);

    command
        .assert()
        .success()
        .stdout("src/service.php:3:9: in_array($ids, $cache)\n");
}

#[rstest]
fn no_matches_exit_with_status_one(project: TempDir) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args(["array_map($f, $xs)", "src"]);

    command.assert().code(1).stdout("");
}

#[rstest]
fn unparseable_files_are_skipped_with_a_warning(project: TempDir) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command
        .current_dir(project.path())
        .args(["return null", "src"]);

    command
        .assert()
        .success()
        .stdout(contains("src/service.php:4:9: return null;"))
        .stderr(contains("skipping file that failed to parse"));
}

#[rstest]
#[case(&["$x +", "src"], "invalid pattern")]
#[case(&["f()", "missing"], "failed to read missing")]
#[case(&["--log-filter", "phpgrep=loud", "f()", "src"], "invalid log filter")]
fn errors_exit_with_status_two(
    project: TempDir,
    #[case] args: &[&str],
    #[case] message: &str,
) {
    let mut command = cargo_bin_cmd!("phpgrep");
    command.current_dir(project.path()).args(args);

    command.assert().code(2).stderr(contains(message));
}

#[test]
fn help_is_printed_to_stdout() {
    let mut command = cargo_bin_cmd!("phpgrep");
    command.arg("--help");

    command
        .assert()
        .success()
        .stdout(contains("--case-sensitive"));
}
