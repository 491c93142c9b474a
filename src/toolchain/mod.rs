//! Toolchain discovery and the compiler seam used by the prober.
//!
//! [`Compiler`] is what the prober talks to. [`SystemCompilers`] builds real
//! ones by locating a compiler on this machine and driving it as a child
//! process; tests substitute their own [`CompilerFactory`].

pub mod command;
pub mod types;

pub use command::{CommandCompiler, SystemCompilers};
pub use types::{CompilerType, Toolchain, ToolchainError};

use crate::options::CompilerOptions;
use crate::probe::ProbeError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A compiler bound to one set of options and one output directory.
pub trait Compiler {
    fn compiler_type(&self) -> &CompilerType;

    fn library_dirs(&self) -> &[PathBuf];

    /// Compile `sources`, returning the object files produced.
    ///
    /// `extra_args` is the whole extra flag list in order: platform pre flags
    /// are already folded in front of the caller's flags and post flags after
    /// them (see [`crate::policy::PlatformFlags::apply`]).
    fn compile(&self, sources: &[PathBuf], extra_args: &[String])
    -> Result<Vec<PathBuf>, ProbeError>;

    /// Link `objects` into an executable. `output` has no extension; the
    /// returned path is the file actually written. `extra_args` is ordered
    /// the same way as for [`Compiler::compile`].
    fn link_executable(
        &self,
        objects: &[PathBuf],
        output: &Path,
        extra_args: &[String],
    ) -> Result<PathBuf, ProbeError>;

    /// Whether a program calling `symbol` compiles and links.
    fn has_function(&self, symbol: &str) -> bool;
}

pub trait CompilerFactory {
    fn create(
        &self,
        kind: &CompilerType,
        options: &CompilerOptions,
        output_dir: &Path,
    ) -> Result<Box<dyn Compiler>, ProbeError>;
}

/// Locate the executables for `kind` on this machine.
///
/// `CXX` (and `CC` for the C driver) override the search when set.
pub fn locate_toolchain(kind: &CompilerType) -> Result<Toolchain, ToolchainError> {
    let (_, cxx, _) = kind.executables();

    let cxx_path = match std::env::var("CXX") {
        Ok(env_cxx) if !env_cxx.is_empty() => PathBuf::from(env_cxx),
        _ => find_in_path(cxx).ok_or_else(|| {
            ToolchainError::NotFound(format!("'{}' is not on PATH. Install {} or set CXX.", cxx, kind))
        })?,
    };

    let version = compiler_version(&cxx_path, kind);
    let mut toolchain = Toolchain::new_simple(kind.clone(), cxx_path, version);

    if let Ok(env_cc) = std::env::var("CC")
        && !env_cc.is_empty()
    {
        toolchain.cc_path = PathBuf::from(env_cc);
    }

    Ok(toolchain)
}

fn find_in_path(cmd: &str) -> Option<PathBuf> {
    let finder = if cfg!(windows) { "where" } else { "which" };
    let output = Command::new(finder).arg(cmd).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| PathBuf::from(line.trim()))
}

fn compiler_version(path: &Path, kind: &CompilerType) -> String {
    let mut cmd = Command::new(path);
    // cl prints its banner on stderr when given no input
    if *kind != CompilerType::MSVC {
        cmd.arg("--version");
    }
    cmd.output()
        .map(|o| {
            let text = if o.stdout.is_empty() { o.stderr } else { o.stdout };
            String::from_utf8_lossy(&text)
                .lines()
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string()
        })
        .unwrap_or_else(|_| "unknown".to_string())
}
