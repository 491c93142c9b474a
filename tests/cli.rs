//! Command-line tests for the `capnp-probe` binary
//!
//! These run the built executable and check its exit status and output.
//! A real Cap'n Proto install is not required: detection is only checked
//! for clean failure and cleanup.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn probe_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_capnp-probe"))
}

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".tmp_test_projects")
        .join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

#[test]
fn test_help_lists_commands() {
    let output = Command::new(probe_binary()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["detect", "flags", "doctor"] {
        assert!(stdout.contains(cmd), "help should mention {cmd}:\n{stdout}");
    }
}

#[test]
fn test_flags_for_host() {
    let output = Command::new(probe_binary())
        .args(["flags", "--compiler", "gcc"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    if cfg!(windows) {
        assert!(!stdout.contains("--std=c++14"));
    } else {
        assert!(stdout.contains("posix-std"));
        assert!(stdout.contains("--std=c++14"));
    }
}

#[test]
fn test_unknown_compiler_fails() {
    let output = Command::new(probe_binary())
        .args(["flags", "--compiler", "turbo-c"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown compiler"), "stderr: {stderr}");
}

#[test]
fn test_detect_with_broken_source_fails_cleanly() {
    let dir = test_dir("broken_source");
    let source = dir.join("broken.cpp");
    fs::write(&source, "this is not C++\n").unwrap();

    let output = Command::new(probe_binary())
        .arg("detect")
        .arg("--source")
        .arg(&source)
        .arg("--json")
        .env("TMPDIR", &dir)
        .output()
        .unwrap();

    assert!(
        !output.status.success(),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cap'n Proto detection failed"), "stderr: {stderr}");

    let leftovers: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("capnp-probe-"))
        .collect();
    assert!(leftovers.is_empty(), "temporary directory left behind");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_detect_with_missing_config_fails() {
    let output = Command::new(probe_binary())
        .args(["detect", "--config", "/nonexistent/capnp-probe.toml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"), "stderr: {stderr}");
}
