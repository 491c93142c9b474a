use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported compiler types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum CompilerType {
    /// Microsoft Visual C++ (cl.exe)
    #[serde(rename = "msvc", alias = "MSVC")]
    MSVC,
    /// Clang with MSVC compatibility (clang-cl.exe)
    #[serde(rename = "clang-cl", alias = "ClangCL")]
    ClangCL,
    /// Clang/LLVM (clang++ or clang)
    #[serde(rename = "clang", alias = "Clang")]
    Clang,
    /// GNU Compiler Collection (g++ or gcc)
    #[serde(rename = "gcc", alias = "GCC")]
    GCC,
}

impl CompilerType {
    pub fn is_msvc_compatible(&self) -> bool {
        matches!(self, CompilerType::MSVC | CompilerType::ClangCL)
    }

    /// Executable names for (C compiler, C++ compiler, linker).
    pub fn executables(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            CompilerType::MSVC => ("cl", "cl", "link"),
            CompilerType::ClangCL => ("clang-cl", "clang-cl", "link"),
            CompilerType::Clang => ("clang", "clang++", "clang++"),
            CompilerType::GCC => ("gcc", "g++", "g++"),
        }
    }
}

impl fmt::Display for CompilerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompilerType::MSVC => "msvc",
            CompilerType::ClangCL => "clang-cl",
            CompilerType::Clang => "clang",
            CompilerType::GCC => "gcc",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for CompilerType {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "msvc" | "cl" | "cl.exe" => Ok(CompilerType::MSVC),
            "clang-cl" | "clangcl" => Ok(CompilerType::ClangCL),
            "clang" | "clang++" => Ok(CompilerType::Clang),
            // distutils calls the generic Unix driver "unix" and MinGW "mingw32"
            "gcc" | "g++" | "unix" | "mingw32" => Ok(CompilerType::GCC),
            other => Err(ToolchainError::UnknownCompiler(other.to_string())),
        }
    }
}

/// Represents a located compiler toolchain
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Type of compiler
    pub compiler_type: CompilerType,

    /// Path (or bare name resolved through PATH) of the C compiler
    pub cc_path: PathBuf,

    /// Path of the C++ compiler
    pub cxx_path: PathBuf,

    /// Path of the linker (same as the C++ driver for GCC/Clang)
    pub linker_path: PathBuf,

    /// First line of `--version`, or "unknown"
    pub version: String,
}

impl Toolchain {
    /// Creates a toolchain where the C compiler is derived from the C++ one
    pub fn new_simple(compiler_type: CompilerType, cxx_path: PathBuf, version: String) -> Self {
        let (cc, cxx, _) = compiler_type.executables();
        let cc_path = match cxx_path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name == cxx => cxx_path.with_file_name(cc),
            _ => cxx_path.clone(),
        };

        let linker_path = if compiler_type.is_msvc_compatible() {
            PathBuf::from(compiler_type.executables().2)
        } else {
            cxx_path.clone()
        };

        Self {
            compiler_type,
            cc_path,
            cxx_path,
            linker_path,
            version,
        }
    }
}

/// Error type for toolchain operations
#[derive(Debug)]
pub enum ToolchainError {
    /// No suitable toolchain found
    NotFound(String),
    /// A compiler name that maps to no known toolchain
    UnknownCompiler(String),
    /// IO error
    IoError(std::io::Error),
}

impl fmt::Display for ToolchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolchainError::NotFound(msg) => write!(f, "Toolchain not found: {}", msg),
            ToolchainError::UnknownCompiler(name) => write!(
                f,
                "Unknown compiler '{}' (expected msvc, clang-cl, clang or gcc)",
                name
            ),
            ToolchainError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ToolchainError {}

impl From<std::io::Error> for ToolchainError {
    fn from(e: std::io::Error) -> Self {
        ToolchainError::IoError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_aliases() {
        assert_eq!("cl.exe".parse::<CompilerType>().unwrap(), CompilerType::MSVC);
        assert_eq!("MSVC".parse::<CompilerType>().unwrap(), CompilerType::MSVC);
        assert_eq!(
            "clang-cl".parse::<CompilerType>().unwrap(),
            CompilerType::ClangCL
        );
        assert_eq!("clang++".parse::<CompilerType>().unwrap(), CompilerType::Clang);
        assert_eq!("unix".parse::<CompilerType>().unwrap(), CompilerType::GCC);
        assert_eq!("mingw32".parse::<CompilerType>().unwrap(), CompilerType::GCC);
        assert!("tcc".parse::<CompilerType>().is_err());
    }

    #[test]
    fn test_new_simple_derives_paths() {
        let tc = Toolchain::new_simple(
            CompilerType::GCC,
            PathBuf::from("/usr/bin/g++"),
            "g++ 13.2".to_string(),
        );
        assert_eq!(tc.cc_path, PathBuf::from("/usr/bin/gcc"));
        assert_eq!(tc.linker_path, PathBuf::from("/usr/bin/g++"));

        let msvc = Toolchain::new_simple(CompilerType::MSVC, PathBuf::from("cl"), "19".into());
        assert_eq!(msvc.cc_path, PathBuf::from("cl"));
        assert_eq!(msvc.linker_path, PathBuf::from("link"));
    }

    #[test]
    fn test_serde_names() {
        let kind: CompilerType = serde_json::from_str("\"clang-cl\"").unwrap();
        assert_eq!(kind, CompilerType::ClangCL);
        assert_eq!(serde_json::to_string(&CompilerType::GCC).unwrap(), "\"gcc\"");
    }
}
