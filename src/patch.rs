//! Install-name patching for freshly linked binaries.
//!
//! On macOS the linker records each dylib's install name in the executable.
//! When that name is relative (a library built in place, not yet installed)
//! the binary cannot start until the name is re-anchored to the library
//! directory it was linked from. Elsewhere there is nothing to do.

use crate::platform::PlatformInfo;
use crate::probe::ProbeError;
use log::debug;
use regex::Regex;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

pub trait LibraryPathPatcher {
    fn patch(&self, executable: &Path, library_dirs: &[PathBuf]) -> Result<(), ProbeError>;
}

/// Leaves binaries untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPatcher;

impl LibraryPathPatcher for NoopPatcher {
    fn patch(&self, _executable: &Path, _library_dirs: &[PathBuf]) -> Result<(), ProbeError> {
        Ok(())
    }
}

/// Rewrites relative dylib install names with `otool` and `install_name_tool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallNamePatcher;

impl LibraryPathPatcher for InstallNamePatcher {
    fn patch(&self, executable: &Path, library_dirs: &[PathBuf]) -> Result<(), ProbeError> {
        let listing = tool_output("otool", &[OsStr::new("-L"), executable.as_os_str()])?;

        for lib in linked_libraries(&listing) {
            if lib.starts_with('@') || lib.starts_with('/') {
                continue;
            }
            if let Some(real) = find_library(&lib, library_dirs) {
                debug!("Rewriting install name {} -> {}", lib, real.display());
                tool_output(
                    "install_name_tool",
                    &[
                        OsStr::new("-change"),
                        OsStr::new(&lib),
                        real.as_os_str(),
                        executable.as_os_str(),
                    ],
                )?;
            }
        }
        Ok(())
    }
}

/// Pick the patcher for a platform.
pub fn patcher_for(platform: &PlatformInfo) -> Box<dyn LibraryPathPatcher> {
    if platform.is_macos() {
        Box::new(InstallNamePatcher)
    } else {
        Box::new(NoopPatcher)
    }
}

fn tool_output(tool: &str, args: &[&OsStr]) -> Result<String, ProbeError> {
    let output = Command::new(tool)
        .args(args)
        .output()
        .map_err(|e| ProbeError::PathPatchFailed(format!("could not run {}: {}", tool, e)))?;
    if !output.status.success() {
        return Err(ProbeError::PathPatchFailed(format!(
            "{} failed: {}",
            tool,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

static OTOOL_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(\S+)\s+\(compatibility version").expect("static regex")
});

/// Install names from `otool -L` output. The first line names the binary
/// itself and is skipped.
pub fn linked_libraries(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| OTOOL_ENTRY.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Later directories take precedence over earlier ones.
pub fn find_library(lib: &str, library_dirs: &[PathBuf]) -> Option<PathBuf> {
    library_dirs
        .iter()
        .rev()
        .map(|dir| dir.join(lib))
        .find(|candidate| candidate.exists())
}
