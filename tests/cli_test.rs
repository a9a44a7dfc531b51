/*!
 * Binary Tests
 * Exit codes and stream discipline of `hello_handoff` and `matrix_reader`
 */

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output};

fn hello_handoff(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hello_handoff"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("hello_handoff runs")
}

fn matrix_reader(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_matrix_reader"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("matrix_reader runs")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_prints_one_line_per_thread() {
    for strategy in ["auto", "futex", "condvar", "spin"] {
        let output = hello_handoff(&["5", "--strategy", strategy]);
        assert_eq!(output.status.code(), Some(0), "{}", strategy);

        let lines = stdout_lines(&output);
        assert_eq!(lines.len(), 5);

        let words: Vec<&str> = lines
            .iter()
            .map(|line| line.split_once(": ").map_or("", |(_, rest)| rest))
            .collect();
        assert_eq!(words, ["hello!", "world!", "hello!", "world!", "hello!"]);
    }
}

#[test]
fn test_zero_threads_prints_nothing() {
    let output = hello_handoff(&["0"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_count_fails_without_output() {
    for arg in ["abc", "-3", "12x"] {
        let output = hello_handoff(&[arg]);
        assert_eq!(output.status.code(), Some(2), "{}", arg);
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid number of threads"));
    }
}

#[test]
fn test_unknown_strategy_is_usage_error() {
    let output = hello_handoff(&["2", "--strategy", "semaphore"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_matrix_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "3 3\nabcdef\n.#.\n##\n").unwrap();

    let output = matrix_reader(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "abc\n.#.\n##\n");
}

#[test]
fn test_matrix_accepts_latin1_bytes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"2 3\nab\xff\ncd\n").unwrap();

    let output = matrix_reader(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"ab\xff\ncd\n".to_vec());
}

#[test]
fn test_failure_reported_once() {
    let output = hello_handoff(&["abc"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Invalid number of threads").count(), 1, "{}", stderr);
}

#[test]
fn test_matrix_bad_header() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "0 4\n").unwrap();

    let output = matrix_reader(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid row count"));
}

#[test]
fn test_matrix_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.txt");

    let output = matrix_reader(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}
