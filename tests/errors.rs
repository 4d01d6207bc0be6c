use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    Command::cargo_bin("bf").unwrap()
}

#[test]
fn unbalanced_loops_fail_before_execution() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-s")
        .arg("++>+++++[[->+<]")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("loop openings/closing"));
}

#[test]
fn pointer_underflow_fails_with_no_output() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-s")
        .arg("++++++++<<<<")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("array index can't be less than zero"));
}

#[test]
fn nul_byte_reports_its_position() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"++\x00+").unwrap();

    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-f")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("illegal character NUL at 0:2"));
}

#[test]
fn empty_program_is_rejected() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-s")
        .arg("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no commands to run"));
}

#[test]
fn empty_file_is_rejected() {
    let file = tempfile::NamedTempFile::new().unwrap();

    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-f")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no commands to run"));
}

#[test]
fn missing_file_reports_the_path() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-f")
        .arg("no-such-program.bf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-program.bf"));
}

#[test]
fn missing_source_is_a_usage_error() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .assert()
        .code(2);
}

#[test]
fn string_and_file_together_are_a_usage_error() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-s")
        .arg("+")
        .arg("-f")
        .arg("program.bf")
        .assert()
        .code(2);
}

#[test]
fn unparsable_input_value_fails() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("-s")
        .arg(",.")
        .write_stdin("twelve\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid input"));
}
