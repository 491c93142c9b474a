//! Process-driven compiler: builds command lines in GCC/Clang or MSVC style
//! and runs them with `std::process::Command`.

use super::{Compiler, CompilerFactory, CompilerType, Toolchain, locate_toolchain};
use crate::options::CompilerOptions;
use crate::platform::PlatformInfo;
use crate::probe::{BuildStage, ProbeError};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Factory that locates real toolchains on this machine.
#[derive(Debug, Clone)]
pub struct SystemCompilers {
    platform: PlatformInfo,
}

impl SystemCompilers {
    pub fn new(platform: PlatformInfo) -> Self {
        Self { platform }
    }
}

impl Default for SystemCompilers {
    fn default() -> Self {
        Self::new(PlatformInfo::current())
    }
}

impl CompilerFactory for SystemCompilers {
    fn create(
        &self,
        kind: &CompilerType,
        options: &CompilerOptions,
        output_dir: &Path,
    ) -> Result<Box<dyn Compiler>, ProbeError> {
        let toolchain = locate_toolchain(kind)?;
        debug!(
            "Using toolchain {} ({})",
            toolchain.cxx_path.display(),
            toolchain.version
        );
        Ok(Box::new(CommandCompiler::new(
            toolchain,
            options,
            output_dir,
            &self.platform,
        )))
    }
}

#[derive(Debug, Clone)]
pub struct CommandCompiler {
    toolchain: Toolchain,
    include_dirs: Vec<PathBuf>,
    library_dirs: Vec<PathBuf>,
    libraries: Vec<String>,
    output_dir: PathBuf,
    platform: PlatformInfo,
}

impl CommandCompiler {
    pub fn new(
        toolchain: Toolchain,
        options: &CompilerOptions,
        output_dir: &Path,
        platform: &PlatformInfo,
    ) -> Self {
        Self {
            toolchain,
            include_dirs: options.include_dirs.clone(),
            library_dirs: options.library_dirs.clone(),
            libraries: options.libraries.clone(),
            output_dir: output_dir.to_path_buf(),
            platform: platform.clone(),
        }
    }

    fn is_msvc(&self) -> bool {
        self.toolchain.compiler_type.is_msvc_compatible()
    }

    /// Object file path for a source, placed in the output directory.
    pub fn object_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "object".to_string());
        let ext = if self.is_msvc() { "obj" } else { "o" };
        self.output_dir.join(format!("{}.{}", stem, ext))
    }

    /// Executable path the linker writes for `output`.
    pub fn executable_path(&self, output: &Path) -> PathBuf {
        if self.is_msvc() {
            return output.with_extension("exe");
        }
        let stem = output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        output.with_file_name(self.platform.executable_name(&stem))
    }

    pub fn compile_args(&self, source: &Path, object: &Path, extra_args: &[String]) -> Vec<String> {
        let mut args = Vec::new();

        if self.is_msvc() {
            args.push("/nologo".to_string());
            args.push("/c".to_string());
            args.push("/EHsc".to_string()); // Standard C++ exceptions
            args.push(source.to_string_lossy().to_string());
            args.push(format!("/Fo{}", object.to_string_lossy()));
            for dir in &self.include_dirs {
                args.push(format!("/I{}", dir.display()));
            }
        } else {
            args.push("-c".to_string());
            args.push(source.to_string_lossy().to_string());
            args.push("-o".to_string());
            args.push(object.to_string_lossy().to_string());
            for dir in &self.include_dirs {
                args.push(format!("-I{}", dir.display()));
            }
        }

        args.extend(extra_args.iter().cloned());
        args
    }

    pub fn link_args(&self, objects: &[PathBuf], executable: &Path, extra_args: &[String]) -> Vec<String> {
        let mut args = Vec::new();

        if self.is_msvc() {
            args.push("/nologo".to_string());
            args.extend(objects.iter().map(|o| o.to_string_lossy().to_string()));
            args.push(format!("/OUT:{}", executable.to_string_lossy()));
            for dir in &self.library_dirs {
                args.push(format!("/LIBPATH:{}", dir.display()));
            }
            for lib in &self.libraries {
                args.push(format!("{}.lib", lib));
            }
        } else {
            args.extend(objects.iter().map(|o| o.to_string_lossy().to_string()));
            args.push("-o".to_string());
            args.push(executable.to_string_lossy().to_string());
            for dir in &self.library_dirs {
                args.push(format!("-L{}", dir.display()));
            }
            for lib in &self.libraries {
                args.push(format!("-l{}", lib));
            }
        }

        args.extend(extra_args.iter().cloned());
        args
    }
}

/// C program referencing `symbol`. The C driver may be a C++ front end
/// (`CXX=g++-13` leaves no separate C driver), so the declaration keeps C
/// linkage either way.
fn function_check_source(symbol: &str) -> String {
    format!(
        "#ifdef __cplusplus\nextern \"C\"\n#endif\nchar {symbol}(void);\n\
         int main(void) {{\n    return (int) {symbol}();\n}}\n"
    )
}

fn run_tool(program: &Path, args: &[String], stage: BuildStage) -> Result<(), ProbeError> {
    let command = format!("{} {}", program.display(), args.join(" "));
    debug!("Running: {}", command);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ProbeError::CompileFailed {
            stage,
            command: command.clone(),
            output: format!("failed to execute: {}", e),
        })?;

    if !output.status.success() {
        // MSVC reports diagnostics on stdout
        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(ProbeError::CompileFailed {
            stage,
            command,
            output: text.trim().to_string(),
        });
    }
    Ok(())
}

impl Compiler for CommandCompiler {
    fn compiler_type(&self) -> &CompilerType {
        &self.toolchain.compiler_type
    }

    fn library_dirs(&self) -> &[PathBuf] {
        &self.library_dirs
    }

    fn compile(&self, sources: &[PathBuf], extra_args: &[String]) -> Result<Vec<PathBuf>, ProbeError> {
        let mut objects = Vec::with_capacity(sources.len());
        for source in sources {
            let object = self.object_path(source);
            let args = self.compile_args(source, &object, extra_args);
            run_tool(&self.toolchain.cxx_path, &args, BuildStage::Compile)?;
            objects.push(object);
        }
        Ok(objects)
    }

    fn link_executable(
        &self,
        objects: &[PathBuf],
        output: &Path,
        extra_args: &[String],
    ) -> Result<PathBuf, ProbeError> {
        let executable = self.executable_path(output);
        let args = self.link_args(objects, &executable, extra_args);
        run_tool(&self.toolchain.linker_path, &args, BuildStage::Link)?;
        Ok(executable)
    }

    fn has_function(&self, symbol: &str) -> bool {
        let source = self.output_dir.join(format!("{}_check.c", symbol));
        if fs::write(&source, function_check_source(symbol)).is_err() {
            return false;
        }

        let object = self.object_path(&source);
        let compiled = run_tool(
            &self.toolchain.cc_path,
            &self.compile_args(&source, &object, &[]),
            BuildStage::Compile,
        );
        if compiled.is_err() {
            return false;
        }

        let executable = self.executable_path(&self.output_dir.join(format!("{}_check", symbol)));
        let linker = if self.is_msvc() {
            &self.toolchain.linker_path
        } else {
            &self.toolchain.cc_path
        };
        let found = run_tool(
            linker,
            &self.link_args(&[object], &executable, &[]),
            BuildStage::Link,
        )
        .is_ok();
        debug!("Symbol {} {}", symbol, if found { "found" } else { "missing" });
        found
    }
}
