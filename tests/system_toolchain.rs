//! Builds against the host's real GCC.
//!
//! Each test returns early when `g++` is not on PATH, so machines without a
//! C++ toolchain still pass. Nothing here needs Cap'n Proto installed: the
//! sources are small stand-ins that print the expected output.

#![cfg(target_os = "linux")]

use capnp_probe::options::CompilerOptions;
use capnp_probe::platform::PlatformInfo;
use capnp_probe::probe::{ProbeError, ProbeSource, Prober};
use capnp_probe::toolchain::{CommandCompiler, Compiler, CompilerType, Toolchain};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn system_gxx() -> Option<PathBuf> {
    let output = Command::new("which").arg("g++").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// (major, minor) from `ldd --version`, or None on non-glibc hosts.
fn glibc_version() -> Option<(u32, u32)> {
    let output = Command::new("ldd").arg("--version").output().ok()?;
    let text = String::from_utf8_lossy(&output.stdout);
    let first = text.lines().next()?;
    if !first.contains("GNU libc") && !first.contains("GLIBC") {
        return None;
    }
    let (major, minor) = first.split_whitespace().last()?.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn has_builtin_timer() -> bool {
    glibc_version().is_some_and(|v| v >= (2, 34))
}

fn gcc_checker(cxx: PathBuf, dir: &Path) -> CommandCompiler {
    let toolchain = Toolchain::new_simple(CompilerType::GCC, cxx, "host".into());
    CommandCompiler::new(
        toolchain,
        &CompilerOptions::default(),
        dir,
        &PlatformInfo::current(),
    )
}

fn leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("capnp-probe-"))
        .collect()
}

fn gcc_options() -> CompilerOptions {
    CompilerOptions {
        compiler: Some(CompilerType::GCC),
        ..Default::default()
    }
}

#[test]
fn test_detects_version_with_host_gcc() {
    if system_gxx().is_none() {
        eprintln!("g++ not found, skipping");
        return;
    }
    let parent = tempfile::tempdir().unwrap();
    let source = parent.path().join("custom.cpp");
    fs::write(
        &source,
        "#include <cstdio>\nint main() { std::printf(\"vers:1.2.3\\n\"); return 0; }\n",
    )
    .unwrap();

    let result = Prober::system()
        .with_source(ProbeSource::File(source.clone()))
        .test_build_in(parent.path(), gcc_options())
        .unwrap();

    assert_eq!(result.version.components(), &[1, 2, 3]);
    assert_eq!(result.settings.compiler, Some(CompilerType::GCC));
    assert!(
        result
            .settings
            .extra_compile_args
            .contains(&"--std=c++14".to_string())
    );
    if has_builtin_timer() {
        assert!(
            !result.settings.libraries.contains(&"rt".to_string()),
            "glibc provides timer_create, rt should not be linked"
        );
    }

    assert!(leftovers(parent.path()).is_empty(), "temporary directory left behind");
    assert!(source.exists());
}

#[test]
fn test_nonzero_exit_keeps_output() {
    if system_gxx().is_none() {
        eprintln!("g++ not found, skipping");
        return;
    }
    let parent = tempfile::tempdir().unwrap();
    let source = parent.path().join("failing.cpp");
    fs::write(
        &source,
        "#include <cstdio>\n\
         int main() { std::printf(\"out\\n\"); std::fprintf(stderr, \"err\\n\"); return 2; }\n",
    )
    .unwrap();

    let err = Prober::system()
        .with_source(ProbeSource::File(source))
        .test_build_in(parent.path(), gcc_options())
        .unwrap_err();

    match err {
        ProbeError::ExecutionFailed {
            code,
            stdout,
            stderr,
        } => {
            assert_eq!(code, Some(2));
            assert_eq!(stdout, "out\n");
            assert_eq!(stderr, "err\n");
        }
        other => panic!("expected ExecutionFailed, got {other:?}"),
    }
    assert!(leftovers(parent.path()).is_empty());
}

#[test]
fn test_has_function_with_host_gcc() {
    let Some(gxx) = system_gxx() else {
        eprintln!("g++ not found, skipping");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let checker = gcc_checker(gxx, dir.path());

    assert!(checker.has_function("getpid"));
    assert!(!checker.has_function("capnp_probe_no_such_symbol"));
    if has_builtin_timer() {
        assert!(checker.has_function("timer_create"));
    }
}

#[test]
fn test_has_function_through_versioned_cxx_driver() {
    let Some(gxx) = system_gxx() else {
        eprintln!("g++ not found, skipping");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let bin = dir.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    let versioned = bin.join("g++-99");
    std::os::unix::fs::symlink(&gxx, &versioned).unwrap();

    let work = dir.path().join("work");
    fs::create_dir_all(&work).unwrap();
    let checker = gcc_checker(versioned.clone(), &work);

    // no gcc-99 exists, so the C check runs through the C++ driver
    assert_eq!(
        Toolchain::new_simple(CompilerType::GCC, versioned.clone(), "host".into()).cc_path,
        versioned
    );
    assert!(checker.has_function("getpid"));
    if has_builtin_timer() {
        assert!(checker.has_function("timer_create"));
    }
}
