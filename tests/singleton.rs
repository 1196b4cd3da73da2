//! Multi-process tests for the single-instance guarantee.
//!
//! These tests drive the compiled `solo` binary: two real launches racing for
//! one identifier, SIGKILL crash recovery, exit codes, and status probing.
//! Child processes hold the lock while waiting for Enter on stdin, so a test
//! keeps a holder alive by keeping its stdin pipe open and stops it
//! gracefully by writing a newline.

use serial_test::serial;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdout, Command, Stdio};
use tempfile::TempDir;

fn solo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_solo"))
}

/// Abstract names are host-global; derive them from the test PID so
/// concurrent test runs don't collide.
fn socket_name(tag: &str) -> String {
    format!("solo.itest.{}.{}", std::process::id(), tag)
}

/// Spawn `solo run` with the given target args and wait until it reports the
/// lock acquired. The returned reader must stay alive as long as the child
/// runs, so the child never hits a closed stdout pipe.
fn spawn_holder(args: &[&str]) -> (Child, BufReader<ChildStdout>) {
    let mut child = solo()
        .arg("run")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn holder");

    let mut reader = BufReader::new(child.stdout.take().unwrap());
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).unwrap();
        assert_ne!(n, 0, "holder exited before acquiring the lock");
        if line.contains("lock acquired") {
            break;
        }
    }

    (child, reader)
}

/// Stop a holder gracefully (Enter on stdin) and assert a clean exit.
fn stop_holder(mut child: Child, mut reader: BufReader<ChildStdout>) {
    child.stdin.take().unwrap().write_all(b"\n").unwrap();
    let status = child.wait().unwrap();

    let mut rest = String::new();
    reader.read_to_string(&mut rest).unwrap();

    assert!(status.success(), "holder exited with {:?}", status.code());
    assert!(rest.contains("lock released"));
}

#[test]
#[serial]
fn second_launch_is_rejected_file_backend() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.lock");
    let path_str = path.to_str().unwrap();

    let (holder, reader) = spawn_holder(&["--backend", "file", "--path", path_str]);

    // A second launch must fail fast without doing any work.
    let second = solo()
        .args(["run", "--backend", "file", "--path", path_str])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(second.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("already running"), "stderr: {}", stderr);

    stop_holder(holder, reader);

    // After a clean shutdown the identifier is free again.
    let third = solo()
        .args(["run", "--backend", "file", "--path", path_str])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(third.status.code(), Some(0));
}

#[test]
#[serial]
fn second_launch_is_rejected_socket_backend() {
    let name = socket_name("reject");

    let (holder, reader) = spawn_holder(&["--backend", "socket", "--name", &name]);

    let second = solo()
        .args(["run", "--backend", "socket", "--name", &name])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(second.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&second.stderr).contains("already running"));

    stop_holder(holder, reader);
}

#[test]
#[serial]
fn sigkill_releases_file_lock() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.lock");
    let path_str = path.to_str().unwrap();

    let (mut holder, _reader) = spawn_holder(&["--backend", "file", "--path", path_str]);
    let holder_pid = holder.id();

    // Forced kill: no release code runs, the artifact stays on disk.
    holder.kill().unwrap();
    holder.wait().unwrap();
    assert!(path.exists());

    // The kernel dropped the lock with the process, so the stale artifact
    // does not block the next instance.
    let status = solo()
        .args(["status", "--backend", "file", "--path", path_str])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("not running"), "stdout: {}", stdout);

    let (next, reader) = spawn_holder(&["--backend", "file", "--path", path_str]);
    assert_ne!(next.id(), holder_pid);
    stop_holder(next, reader);
}

#[test]
#[serial]
fn sigkill_releases_socket_lock() {
    let name = socket_name("crash");

    let (mut holder, _reader) = spawn_holder(&["--backend", "socket", "--name", &name]);
    holder.kill().unwrap();
    holder.wait().unwrap();

    let (next, reader) = spawn_holder(&["--backend", "socket", "--name", &name]);
    stop_holder(next, reader);
}

#[test]
#[serial]
fn artifact_records_holder_pid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.lock");
    let path_str = path.to_str().unwrap();

    let (holder, reader) = spawn_holder(&["--backend", "file", "--path", path_str]);

    // Exactly the holder's decimal PID, newline-terminated.
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, format!("{}\n", holder.id()));

    stop_holder(holder, reader);

    // Clean shutdown removes the artifact.
    assert!(!path.exists());
}

#[test]
#[serial]
fn status_reports_holder_and_freedom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.lock");
    let path_str = path.to_str().unwrap();

    // Free identifier.
    let free = solo()
        .args(["status", "--backend", "file", "--path", path_str, "--json"])
        .output()
        .unwrap();
    assert_eq!(free.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&free.stdout).unwrap();
    assert_eq!(report["running"], false);

    // Held identifier: reports the holder PID, without breaking the lock.
    let (holder, reader) = spawn_holder(&["--backend", "file", "--path", path_str]);
    let held = solo()
        .args(["status", "--backend", "file", "--path", path_str, "--json"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&held.stdout).unwrap();
    assert_eq!(report["running"], true);
    assert_eq!(report["pid"], holder.id());
    assert_eq!(report["backend"], "file");

    let second = solo()
        .args(["run", "--backend", "file", "--path", path_str])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(second.status.code(), Some(2));

    stop_holder(holder, reader);
}

#[test]
#[serial]
fn status_probes_socket_backend() {
    let name = socket_name("status");

    let free = solo()
        .args(["status", "--backend", "socket", "--name", &name])
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&free.stdout).contains("not running"));

    let (holder, reader) = spawn_holder(&["--backend", "socket", "--name", &name]);
    let held = solo()
        .args(["status", "--backend", "socket", "--name", &name])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&held.stdout);
    assert!(stdout.contains("running"), "stdout: {}", stdout);
    assert!(!stdout.contains("not running"), "stdout: {}", stdout);

    stop_holder(holder, reader);
}
