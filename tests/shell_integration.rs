//! End-to-end tests that drive the compiled `dsh` binary over stdin/stdout,
//! the way a real terminal session would.

use std::io::Write;
use std::process::{Command, Stdio};

fn run(dir: &std::path::Path, script: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dsh"))
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn dsh");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();

    let output = child.wait_with_output().expect("failed to wait on dsh");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn echo_prints_its_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), "echo hello world\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "hello world\n");
}

#[test]
fn pipeline_counts_lines() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "").unwrap();
    std::fs::write(dir.path().join("b.txt"), "").unwrap();
    let (code, stdout, _) = run(dir.path(), "ls | wc -l\n");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2");
}

#[test]
fn redirection_writes_and_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(
        dir.path(),
        "echo hello > out.txt\ncat < out.txt\n",
    );
    assert_eq!(code, 0);
    assert_eq!(stdout, "hello\n");
}

#[test]
fn append_redirection_keeps_earlier_content() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(
        dir.path(),
        "echo one > out.txt\necho two >> out.txt\ncat out.txt\n",
    );
    assert_eq!(code, 0);
    assert_eq!(stdout, "one\ntwo\n");
}

#[test]
fn unknown_command_reports_not_found_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run(dir.path(), "nosuchcommand\necho still-alive\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("nosuchcommand"));
    assert_eq!(stdout, "still-alive\n");
}

#[test]
fn unknown_command_records_status_127() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), "nosuchcommand\nprintenv '?'\n");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "127");
}

#[test]
fn unknown_command_mid_pipeline_lets_other_stages_finish() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run(dir.path(), "nosuchcommand | wc -l\n");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0");
    assert!(stderr.contains("nosuchcommand"));
}

#[test]
fn quoted_pipe_character_is_literal() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), r#"echo "a | b""#.to_string().as_str());
    assert_eq!(code, 0);
    assert_eq!(stdout, "a | b\n");
}

#[test]
fn glob_with_no_match_is_left_literal() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), "echo *.nonexistent-extension\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "*.nonexistent-extension\n");
}

#[test]
fn cd_updates_pwd_and_oldpwd() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let (code, stdout, _) = run(dir.path(), "cd sub\npwd\n");
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("sub"));
}

#[test]
fn exit_with_explicit_code_terminates_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), "exit 7\necho never\n");
    assert_eq!(code, 7);
    assert_eq!(stdout, "");
}

#[test]
fn trailing_eof_without_newline_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), "echo last");
    assert_eq!(code, 0);
    assert_eq!(stdout, "last\n");
}
