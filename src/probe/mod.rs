//! The version prober.
//!
//! A probe copies a tiny C++ program into a scratch directory, builds it
//! against the caller's compiler settings, runs it and decodes what it
//! prints. The scratch directory is removed on every exit path.

mod error;
mod workdir;

pub use error::{BuildStage, ProbeError};
pub use workdir::{WorkDirGuard, erase_dir};

use crate::options::CompilerOptions;
use crate::output::{LibraryVersion, parse_output, take_version};
use crate::patch::{LibraryPathPatcher, patcher_for};
use crate::platform::PlatformInfo;
use crate::policy::PlatformFlags;
use crate::runner::{ProcessRunner, SystemRunner};
use crate::toolchain::{CompilerFactory, CompilerType, SystemCompilers};
use log::{debug, error, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name the probe source is staged under.
pub const PROBE_SOURCE_NAME: &str = "vers.cpp";

/// Default probe program: prints `vers:MAJOR.MINOR.MICRO` from `capnp/common.h`.
pub const BUNDLED_PROBE_SOURCE: &str = include_str!("../../assets/vers.cpp");

/// Symbol whose absence on Linux means librt must be linked.
const TIMER_SYMBOL: &str = "timer_create";
const REALTIME_LIBRARY: &str = "rt";

/// Where the probe program comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProbeSource {
    #[default]
    Bundled,
    File(PathBuf),
}

impl ProbeSource {
    /// Place the source in `dir` under [`PROBE_SOURCE_NAME`].
    pub fn stage(&self, dir: &Path) -> Result<PathBuf, ProbeError> {
        let dest = dir.join(PROBE_SOURCE_NAME);
        let result = match self {
            ProbeSource::Bundled => fs::write(&dest, BUNDLED_PROBE_SOURCE),
            ProbeSource::File(src) => fs::copy(src, &dest).map(|_| ()),
        };
        result.map_err(|e| ProbeError::Stage {
            path: dest.clone(),
            source: e,
        })?;
        Ok(dest)
    }
}

/// Outcome of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub version: LibraryVersion,
    /// Options the probe was finally built with, resolved compiler included.
    pub settings: CompilerOptions,
}

pub struct Prober {
    platform: PlatformInfo,
    source: ProbeSource,
    compilers: Box<dyn CompilerFactory>,
    runner: Box<dyn ProcessRunner>,
    patcher: Box<dyn LibraryPathPatcher>,
}

impl Prober {
    /// A prober for `platform` that drives real compilers and processes.
    pub fn new(platform: PlatformInfo) -> Self {
        let patcher = patcher_for(&platform);
        let compilers = SystemCompilers::new(platform.clone());
        Self {
            platform,
            source: ProbeSource::default(),
            compilers: Box::new(compilers),
            runner: Box::new(SystemRunner::default()),
            patcher,
        }
    }

    /// A prober for the machine this process runs on.
    pub fn system() -> Self {
        Self::new(PlatformInfo::current())
    }

    pub fn with_source(mut self, source: ProbeSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_compilers(mut self, compilers: impl CompilerFactory + 'static) -> Self {
        self.compilers = Box::new(compilers);
        self
    }

    pub fn with_runner(mut self, runner: impl ProcessRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_patcher(mut self, patcher: impl LibraryPathPatcher + 'static) -> Self {
        self.patcher = Box::new(patcher);
        self
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    /// Explicit choice first, then the options, then the platform default.
    pub fn resolve_compiler(
        &self,
        explicit: Option<CompilerType>,
        options: &CompilerOptions,
    ) -> CompilerType {
        explicit
            .or_else(|| options.compiler.clone())
            .unwrap_or_else(|| self.platform.default_compiler())
    }

    /// Compile, link and run the probe inside `working_dir`.
    ///
    /// `working_dir` should be an empty directory owned by the caller; it is
    /// deleted before this returns, on success and on failure.
    pub fn probe(
        &self,
        working_dir: &Path,
        compiler: Option<CompilerType>,
        options: CompilerOptions,
    ) -> Result<ProbeResult, ProbeError> {
        let guard = WorkDirGuard::new(working_dir);
        self.run_probe(guard.path(), compiler, options)
    }

    fn run_probe(
        &self,
        dir: &Path,
        compiler: Option<CompilerType>,
        mut options: CompilerOptions,
    ) -> Result<ProbeResult, ProbeError> {
        let kind = self.resolve_compiler(compiler, &options);
        debug!("Probing in {} with {}", dir.display(), kind);

        let source = self.source.stage(dir)?;

        let flags = PlatformFlags::for_platform(&self.platform, &kind);
        debug!("Platform rules: {:?}", flags.rules);
        flags.apply(&mut options);

        if self.platform.is_linux() {
            let checker = self
                .compilers
                .create(&kind, &CompilerOptions::default(), dir)?;
            if !checker.has_function(TIMER_SYMBOL) {
                debug!("{} not found, linking lib{}", TIMER_SYMBOL, REALTIME_LIBRARY);
                options.libraries.push(REALTIME_LIBRARY.to_string());
            }
        }

        let cc = self.compilers.create(&kind, &options, dir)?;
        let objects = cc.compile(&[source.clone()], &options.extra_compile_args)?;
        let executable =
            cc.link_executable(&objects, &source.with_extension(""), &options.extra_link_args)?;

        self.patcher.patch(&executable, cc.library_dirs())?;

        let run = self.runner.run(&executable, &[])?;
        if !run.success() {
            error!(
                "Error running version detection script:\n{}\n{}",
                run.stdout, run.stderr
            );
            return Err(ProbeError::ExecutionFailed {
                code: run.code,
                stdout: run.stdout,
                stderr: run.stderr,
            });
        }

        let mut props = parse_output(&run.stdout)?;
        let version = take_version(&mut props, &run.stdout)?;

        options.compiler = Some(kind);
        Ok(ProbeResult {
            version,
            settings: options,
        })
    }

    /// Probe in a fresh temporary directory with the default toolchain.
    pub fn test_build(&self, options: CompilerOptions) -> Result<ProbeResult, ProbeError> {
        self.test_build_at(None, options)
    }

    /// Like [`Prober::test_build`], with the temporary directory created
    /// inside `parent`.
    pub fn test_build_in(
        &self,
        parent: &Path,
        options: CompilerOptions,
    ) -> Result<ProbeResult, ProbeError> {
        self.test_build_at(Some(parent), options)
    }

    fn test_build_at(
        &self,
        parent: Option<&Path>,
        options: CompilerOptions,
    ) -> Result<ProbeResult, ProbeError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("capnp-probe-");
        let tmp = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| ProbeError::Stage {
            path: parent.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
            source: e,
        })?;

        info!("Configure: Autodetecting Cap'n Proto settings...");
        let result = self.probe(tmp.path(), None, options);
        // the probe already removed the directory; dropping the handle covers any leftovers
        drop(tmp);

        if let Ok(detected) = &result {
            info!("Cap'n Proto version detected: {}", detected.version);
        }
        result
    }
}
