//! Compiler options threaded through a probe.

use crate::toolchain::CompilerType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings used to compile and link the probe program.
///
/// Every list defaults to empty. The prober only ever appends to these lists
/// (platform flags, the `rt` library) and stops touching them once
/// compilation starts; the final value is reported in
/// [`ProbeResult::settings`](crate::ProbeResult).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub compiler: Option<CompilerType>,
    pub include_dirs: Vec<PathBuf>,
    pub library_dirs: Vec<PathBuf>,
    pub libraries: Vec<String>,
    pub extra_compile_args: Vec<String>,
    pub extra_link_args: Vec<String>,
}

impl CompilerOptions {
    /// Merge `other` into `self`: lists are extended, `compiler` is replaced
    /// when `other` names one.
    pub fn extend(&mut self, other: CompilerOptions) {
        if other.compiler.is_some() {
            self.compiler = other.compiler;
        }
        self.include_dirs.extend(other.include_dirs);
        self.library_dirs.extend(other.library_dirs);
        self.libraries.extend(other.libraries);
        self.extra_compile_args.extend(other.extra_compile_args);
        self.extra_link_args.extend(other.extra_link_args);
    }
}
