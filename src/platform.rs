//! Host platform description.
//!
//! Everything the prober decides from the environment (default compiler,
//! architecture flags, the Linux capability check, install-name patching)
//! reads a [`PlatformInfo`] value instead of querying globals, so tests can
//! describe any host.

use crate::toolchain::CompilerType;
use serde::Serialize;
use std::fmt;

/// Operating system families the prober distinguishes between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TargetOs {
    Linux,
    MacOs,
    Solaris,
    Windows,
    Other(String),
}

impl TargetOs {
    /// Map a `std::env::consts::OS` style name to a family.
    pub fn from_name(name: &str) -> Self {
        match name {
            "linux" => TargetOs::Linux,
            "macos" | "darwin" => TargetOs::MacOs,
            "solaris" | "illumos" | "sunos" => TargetOs::Solaris,
            "windows" => TargetOs::Windows,
            other => TargetOs::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOs::Linux => write!(f, "linux"),
            TargetOs::MacOs => write!(f, "macos"),
            TargetOs::Solaris => write!(f, "solaris"),
            TargetOs::Windows => write!(f, "windows"),
            TargetOs::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Pointer width of the process doing the probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WordSize {
    Bits32,
    Bits64,
}

impl fmt::Display for WordSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordSize::Bits32 => write!(f, "32bit"),
            WordSize::Bits64 => write!(f, "64bit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub os: TargetOs,
    pub word_size: WordSize,
    /// Processor name, e.g. `x86_64`, `aarch64` or `powerpc`.
    pub processor: String,
}

impl PlatformInfo {
    pub fn new(os: TargetOs, word_size: WordSize, processor: impl Into<String>) -> Self {
        Self {
            os,
            word_size,
            processor: processor.into(),
        }
    }

    /// Describe the platform this process was built for.
    pub fn current() -> Self {
        let word_size = if cfg!(target_pointer_width = "32") {
            WordSize::Bits32
        } else {
            WordSize::Bits64
        };
        Self::new(
            TargetOs::from_name(std::env::consts::OS),
            word_size,
            std::env::consts::ARCH,
        )
    }

    pub fn is_windows(&self) -> bool {
        self.os == TargetOs::Windows
    }

    pub fn is_linux(&self) -> bool {
        self.os == TargetOs::Linux
    }

    pub fn is_macos(&self) -> bool {
        self.os == TargetOs::MacOs
    }

    /// Compiler used when the caller did not ask for one.
    pub fn default_compiler(&self) -> CompilerType {
        match self.os {
            TargetOs::Windows => CompilerType::MSVC,
            TargetOs::MacOs => CompilerType::Clang,
            _ => CompilerType::GCC,
        }
    }

    /// File name of an executable called `stem` on this platform.
    pub fn executable_name(&self, stem: &str) -> String {
        if self.is_windows() {
            format!("{}.exe", stem)
        } else {
            stem.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_names() {
        assert_eq!(TargetOs::from_name("linux"), TargetOs::Linux);
        assert_eq!(TargetOs::from_name("darwin"), TargetOs::MacOs);
        assert_eq!(TargetOs::from_name("macos"), TargetOs::MacOs);
        assert_eq!(TargetOs::from_name("illumos"), TargetOs::Solaris);
        assert_eq!(
            TargetOs::from_name("freebsd"),
            TargetOs::Other("freebsd".to_string())
        );
    }

    #[test]
    fn test_default_compiler_per_os() {
        let windows = PlatformInfo::new(TargetOs::Windows, WordSize::Bits64, "x86_64");
        let mac = PlatformInfo::new(TargetOs::MacOs, WordSize::Bits64, "aarch64");
        let linux = PlatformInfo::new(TargetOs::Linux, WordSize::Bits64, "x86_64");
        assert_eq!(windows.default_compiler(), CompilerType::MSVC);
        assert_eq!(mac.default_compiler(), CompilerType::Clang);
        assert_eq!(linux.default_compiler(), CompilerType::GCC);
    }

    #[test]
    fn test_executable_name() {
        let windows = PlatformInfo::new(TargetOs::Windows, WordSize::Bits32, "x86");
        let linux = PlatformInfo::new(TargetOs::Linux, WordSize::Bits64, "x86_64");
        assert_eq!(windows.executable_name("vers"), "vers.exe");
        assert_eq!(linux.executable_name("vers"), "vers");
    }

    #[test]
    fn test_current_matches_build_target() {
        let platform = PlatformInfo::current();
        assert_eq!(platform.processor, std::env::consts::ARCH);
        assert_eq!(platform.is_windows(), cfg!(windows));
    }
}
