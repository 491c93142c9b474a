//! `capnp-probe detect`: run a test build and report the version.

use crate::config::load_config;
use crate::options::CompilerOptions;
use crate::probe::{ProbeResult, ProbeSource, Prober};
use crate::runner::SystemRunner;
use crate::ui::{Table, list};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use semver::VersionReq;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct DetectArgs {
    pub config: Option<PathBuf>,
    pub compiler: Option<String>,
    pub include_dirs: Vec<PathBuf>,
    pub library_dirs: Vec<PathBuf>,
    pub libraries: Vec<String>,
    pub compile_args: Vec<String>,
    pub link_args: Vec<String>,
    pub source: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub require: Option<String>,
    pub json: bool,
}

impl DetectArgs {
    /// Config file values first, command-line values appended after them.
    pub fn resolve_options(&self, base: CompilerOptions) -> Result<CompilerOptions> {
        let mut options = base;
        options.extend(CompilerOptions {
            compiler: super::parse_compiler(self.compiler.as_deref())?,
            include_dirs: self.include_dirs.clone(),
            library_dirs: self.library_dirs.clone(),
            libraries: self.libraries.clone(),
            extra_compile_args: self.compile_args.clone(),
            extra_link_args: self.link_args.clone(),
        });
        Ok(options)
    }
}

/// Returns `false` when a `--require` constraint is not met.
pub fn run_detect(args: &DetectArgs) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let options = args.resolve_options(config.compiler.clone())?;

    let requirement = args
        .require
        .as_deref()
        .map(VersionReq::parse)
        .transpose()
        .context("Invalid --require version requirement")?;

    let source = match &args.source {
        Some(path) => ProbeSource::File(path.clone()),
        None => config.probe.probe_source(),
    };
    let timeout = args
        .timeout_secs
        .map(Duration::from_secs)
        .or_else(|| config.probe.timeout());

    let prober = Prober::system()
        .with_source(source)
        .with_runner(SystemRunner::with_timeout(timeout));

    let spinner = (!args.json).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Autodetecting Cap'n Proto settings...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = prober.test_build(options);
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let detected = result.context("Cap'n Proto detection failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detected)?);
    } else {
        print_summary(&detected);
    }

    if let Some(req) = requirement {
        let found = detected.version.to_semver();
        if !req.matches(&found) {
            if !args.json {
                println!(
                    "{} Cap'n Proto {} does not satisfy '{}'",
                    "x".red(),
                    detected.version,
                    req
                );
            }
            return Ok(false);
        }
        if !args.json {
            println!("{} Satisfies '{}'", "✓".green(), req);
        }
    }

    Ok(true)
}

fn print_summary(detected: &ProbeResult) {
    println!(
        "{} Cap'n Proto version detected: {}",
        "✓".green(),
        detected.version.to_string().bold()
    );

    let settings = &detected.settings;
    let paths = |dirs: &[PathBuf]| -> String {
        list(&dirs.iter().map(|d| d.display().to_string()).collect::<Vec<_>>())
    };

    let mut table = Table::new(&["Setting", "Value"]);
    table.add_row(vec![
        "compiler".into(),
        settings
            .compiler
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into()),
    ]);
    table.add_row(vec!["include_dirs".into(), paths(&settings.include_dirs)]);
    table.add_row(vec!["library_dirs".into(), paths(&settings.library_dirs)]);
    table.add_row(vec!["libraries".into(), list(&settings.libraries)]);
    table.add_row(vec![
        "extra_compile_args".into(),
        list(&settings.extra_compile_args),
    ]);
    table.add_row(vec!["extra_link_args".into(), list(&settings.extra_link_args)]);
    table.print();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::CompilerType;

    #[test]
    fn test_cli_values_follow_config_values() {
        let args = DetectArgs {
            compiler: Some("clang++".into()),
            libraries: vec!["kj".into()],
            include_dirs: vec![PathBuf::from("/cli/include")],
            ..Default::default()
        };
        let base = CompilerOptions {
            compiler: Some(CompilerType::GCC),
            libraries: vec!["capnp".into()],
            include_dirs: vec![PathBuf::from("/cfg/include")],
            ..Default::default()
        };
        let options = args.resolve_options(base).unwrap();
        assert_eq!(options.compiler, Some(CompilerType::Clang));
        assert_eq!(options.libraries, vec!["capnp", "kj"]);
        assert_eq!(
            options.include_dirs,
            vec![PathBuf::from("/cfg/include"), PathBuf::from("/cli/include")]
        );
    }

    #[test]
    fn test_config_compiler_kept_without_flag() {
        let base = CompilerOptions {
            compiler: Some(CompilerType::MSVC),
            ..Default::default()
        };
        let options = DetectArgs::default().resolve_options(base).unwrap();
        assert_eq!(options.compiler, Some(CompilerType::MSVC));
    }

    #[test]
    fn test_bad_compiler_name() {
        let args = DetectArgs {
            compiler: Some("turbo-c".into()),
            ..Default::default()
        };
        assert!(args.resolve_options(CompilerOptions::default()).is_err());
    }
}
