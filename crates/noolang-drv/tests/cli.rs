//! End-to-end CLI tests (spec.md §6), grounded on `faxc-drv`'s
//! `tests/e2e/cli_tests.rs` shape: spawn the real binary with `assert_cmd`,
//! assert on its stdout/exit code, using `tempfile` for scratch `.noo`
//! files rather than checked-in fixtures.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn noolang() -> Command {
    Command::cargo_bin("noolang").unwrap()
}

fn write_source(source: &str) -> NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::Builder::new().suffix(".noo").tempfile().unwrap();
    write!(file, "{source}").unwrap();
    file
}

#[test]
fn eval_prints_arithmetic_result() {
    noolang()
        .arg("--eval")
        .arg("1 + 2 * 3")
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));
}

#[test]
fn eval_short_flag_agrees_with_long() {
    noolang().arg("-e").arg("1 + 2").assert().success().stdout(predicate::str::contains("3"));
}

#[test]
fn file_mode_evaluates_and_prints_final_value() {
    let file = write_source("double = fn x => x * 2; double 21");
    noolang().arg(file.path()).assert().success().stdout(predicate::str::contains("42"));
}

#[test]
fn type_error_exits_nonzero() {
    noolang().arg("--eval").arg("1 + \"two\"").assert().failure().code(1);
}

#[test]
fn undefined_variable_exits_nonzero_with_message() {
    noolang()
        .arg("--eval")
        .arg("thisNameDoesNotExist")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Undefined variable"));
}

#[test]
fn tokens_mode_lists_tokens() {
    noolang()
        .arg("--tokens")
        .arg("1 + 2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Number").and(predicate::str::contains("Operator")));
}

#[test]
fn tokens_file_mode_reads_from_disk() {
    let file = write_source("1 + 2");
    noolang()
        .arg("--tokens-file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Number"));
}

#[test]
fn ast_mode_prints_json() {
    noolang()
        .arg("--ast")
        .arg("1 + 2")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"node\": \"Binary\""));
}

#[test]
fn ast_file_mode_reads_from_disk() {
    let file = write_source("fn x => x");
    noolang()
        .arg("--ast-file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"node\": \"Function\""));
}

#[test]
fn conflicting_mode_flags_exit_nonzero() {
    noolang().arg("--eval").arg("1").arg("main.noo").assert().failure().code(1);
}

#[test]
fn repl_evaluates_one_line_and_persists_a_binding() {
    noolang()
        .write_stdin("x = 5\nx + 1\n.quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("6 : Float"));
}

#[test]
fn repl_help_command_lists_commands() {
    noolang()
        .write_stdin(".help\n.quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(".clear-env"));
}

#[test]
fn repl_survives_a_type_error_and_keeps_prompting() {
    noolang()
        .write_stdin("y = 1\ny + \"oops\"\ny + 1\n.quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 : Float"));
}
