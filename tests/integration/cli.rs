//! Running the `tsodex` binary end to end.
//!
//! Startup failures exit 1 with a single `error:` line on stderr. The REPL
//! prompts with `> `, prints one line per query and exits 0 at end of input.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use super::common::{patch_u32, sample_fixture, two_term_fixture, write_temp};

fn run_tsodex(index: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tsodex"))
        .arg("--index")
        .arg(index)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tsodex");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

/// Exit status 1 and exactly one `error:` line that doesn't repeat itself.
fn assert_startup_failure(output: &Output, expected: &str) -> String {
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "{stderr}");
    assert!(lines[0].starts_with("error: failed to load index: "), "{stderr}");
    assert_eq!(lines[0].matches(expected).count(), 1, "{stderr}");
    stderr
}

// ============================================================================
// STARTUP FAILURES
// ============================================================================

#[test]
fn test_missing_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tsodex(&dir.path().join("nope.dat"), &["repl"], "");
    let stderr = assert_startup_failure(&output, "nope.dat");
    assert!(stderr.contains("can't open"), "{stderr}");
}

#[test]
fn test_truncated_file_exits_1() {
    let mut bytes = two_term_fixture().build();
    bytes.pop();
    let file = write_temp(&bytes);
    let output = run_tsodex(file.path(), &["repl"], "");
    let stderr = assert_startup_failure(&output, "(truncated?)");
    assert!(stderr.contains("invalid index file: header declares file size"), "{stderr}");
}

#[test]
fn test_bad_magic_exits_1() {
    let mut bytes = two_term_fixture().build();
    patch_u32(&mut bytes, 0, u32::from_le_bytes(*b"XSOD"));
    let file = write_temp(&bytes);
    let output = run_tsodex(file.path(), &["repl"], "");
    assert_startup_failure(&output, "unexpected magic");
}

// ============================================================================
// REPL
// ============================================================================

#[test]
fn test_repl_prints_one_line_per_query() {
    let file = write_temp(&sample_fixture().build());
    let output = run_tsodex(file.path(), &["repl"], "the quick Rust\n  \n");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "> Word count: 3, token count: 2, tokens: [2, 0]\n\
         > Word count: 0, token count: 0, tokens: []\n\
         > \n"
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn test_repl_is_the_default_command() {
    let file = write_temp(&sample_fixture().build());
    let output = run_tsodex(file.path(), &[], "search\r\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("> Word count: 1, token count: 1, tokens: [1]\n"),
        "{stdout}"
    );
}

#[test]
fn test_repl_json_lines() {
    let file = write_temp(&sample_fixture().build());
    let output = run_tsodex(file.path(), &["--json", "repl"], "rust the\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "{stdout}");
    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["word_count"], 2);
    assert_eq!(value["term_ids"], serde_json::json!([0, 2]));
}
