//! Runs the `extauth` binary against real standard streams.

#![cfg(unix)]

use std::io::{Read, Write};
use std::process::{Command, Output, Stdio};

fn extauth(config: &tempfile::NamedTempFile) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_extauth"));
    command
        .env("EXTAUTH_CONFIG", config.path())
        .env_remove("RUST_LOG")
        .stderr(Stdio::piped());
    command
}

fn empty_config() -> tempfile::NamedTempFile {
    tempfile::NamedTempFile::new().unwrap()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn answers_over_pipes_and_exits_on_eof() {
    let config = empty_config();
    let mut child = extauth(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"\x00\x12auth:bob:ex.com:pw").unwrap();
    drop(stdin);

    let mut response = Vec::new();
    child
        .stdout
        .take()
        .unwrap()
        .read_to_end(&mut response)
        .unwrap();
    let status = child.wait().unwrap();

    // No backend is configured, so the answer is always false.
    assert_eq!(response, [0x00, 0x02, 0x00, 0x00]);
    assert!(status.success());
}

#[test]
fn stdin_on_dev_null_fails_to_bind() {
    let config = empty_config();
    let output = extauth(&config)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr_of(&output).contains("failed to bind stdin"));
}

#[test]
fn stdout_on_dev_null_fails_to_bind() {
    let config = empty_config();
    let output = extauth(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("failed to bind stdout"));
}
